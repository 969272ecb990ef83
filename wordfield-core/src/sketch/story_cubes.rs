/// A fixed story visualized with three hard-coded terms.

use rand::rngs::StdRng;
use rand::Rng;

use super::{camera_at, FrameTime, Sketch};
use crate::color::Color;
use crate::placement::{instance_geometry, populate_group, SearchTerm, TermStats};
use crate::scene::{DirectionalLight, Scene};
use crate::text::TokenizedText;

pub const STORY: &str = "In the town of Brindle, there was a cat named Whiskers who roamed \
the streets like a king. Whiskers was known for his sharp green eyes and his long grey fur \
that flowed like a cloak. One night, a terrible storm swept through Brindle, and a small child \
was lost in the dark. It was Whiskers, with his glowing green eyes and sleek grey fur, who \
found the child and led her home. From that day forward, Whiskers was no longer just a cat, \
he was the quiet hero of Brindle.";

pub struct StoryCubes<R = StdRng> {
    terms: Vec<SearchTerm>,
    stats: Vec<TermStats>,
    rng: R,
}

impl<R: Rng> StoryCubes<R> {
    pub fn new(rng: R) -> Self {
        let terms = vec![
            SearchTerm::new("brindle", Color::from_hex(0x0000ff)),
            SearchTerm::new("whiskers", Color::from_hex(0x808080)),
            SearchTerm::new("eyes", Color::from_hex(0xadff2f)),
        ];
        Self {
            terms,
            stats: Vec::new(),
            rng,
        }
    }

    pub fn stats(&self) -> &[TermStats] {
        &self.stats
    }
}

impl<R: Rng> Sketch for StoryCubes<R> {
    fn name(&self) -> &'static str {
        "story-cubes"
    }

    fn build(&mut self) -> Scene {
        let mut scene = Scene::new(camera_at(0.0, 12.0, -20.0));
        scene.background = Some(Color::BLACK);
        scene.light = DirectionalLight::new(Color::from_hex(0x404040), 100.0);

        let text = TokenizedText::new(STORY);
        let geometry = instance_geometry();
        self.stats = self
            .terms
            .iter()
            .map(|term| {
                let group = scene.add_group(None);
                populate_group(
                    &mut scene,
                    group,
                    &geometry,
                    text.tokens(),
                    term,
                    &mut self.rng,
                )
            })
            .collect();

        scene
    }

    fn tick(&mut self, _scene: &mut Scene, _time: FrameTime) {}

    fn status(&self) -> String {
        let summary: Vec<String> = self
            .stats
            .iter()
            .map(|s| format!("{} x{}", s.term, s.matches))
            .collect();
        summary.join(", ")
    }
}
