/// Interactive term field.
///
/// The user saves a source text, then visualizes up to three search terms.
/// Each term fills its own group with cubes; the first group spins and bobs,
/// the second circles the origin while its cubes pulse with height, and a
/// turntable mode sweeps the camera around the field.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::info;

use super::{camera_at, FrameTime, Sketch, SketchAction};
use crate::color::Color;
use crate::config::{GroupMotion, WordfieldConfig};
use crate::error::Result;
use crate::geometry::Mesh;
use crate::placement::{instance_geometry, populate_group, SearchTerm, TermStats};
use crate::scene::{DirectionalLight, NodeId, Scene};
use crate::text::TokenizedText;

const TURNTABLE_RADIUS: f32 = 20.0;
const TURNTABLE_HEIGHT: f32 = 5.0;
const TURNTABLE_SPEED: f32 = 0.1;
const ORBIT_SPIN: f32 = 0.6;

/// Where the user is in the save-text → visualize flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SourceText,
    Terms,
    Visualized,
}

pub struct TermField<R = StdRng> {
    source: String,
    terms: Vec<SearchTerm>,
    motions: Vec<GroupMotion>,
    groups: Vec<NodeId>,
    text: Option<TokenizedText>,
    stats: Vec<TermStats>,
    stage: Stage,
    turntable: bool,
    geometry: Arc<Mesh>,
    rng: R,
}

impl<R: Rng> TermField<R> {
    pub fn new(config: &WordfieldConfig, rng: R) -> Result<Self> {
        let terms = config.search_terms()?;
        let motions = config
            .terms
            .iter()
            .enumerate()
            .map(|(slot, term)| term.motion.unwrap_or_else(|| GroupMotion::for_slot(slot)))
            .collect();

        Ok(Self {
            source: config.text.source.clone(),
            terms,
            motions,
            groups: Vec::new(),
            text: None,
            stats: Vec::new(),
            stage: Stage::SourceText,
            turntable: false,
            geometry: instance_geometry(),
            rng,
        })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn stats(&self) -> &[TermStats] {
        &self.stats
    }

    pub fn text(&self) -> Option<&TokenizedText> {
        self.text.as_ref()
    }

    pub fn groups(&self) -> &[NodeId] {
        &self.groups
    }

    /// Replace the source text. Only possible before it has been saved.
    pub fn set_source_text(&mut self, source: impl Into<String>) -> bool {
        if self.stage != Stage::SourceText {
            return false;
        }
        self.source = source.into();
        true
    }

    fn save_source_text(&mut self) {
        let text = TokenizedText::new(&self.source);
        info!(tokens = text.len(), "saved source text");
        self.text = Some(text);
        self.stage = Stage::Terms;
    }

    fn save_terms(&mut self, scene: &mut Scene) {
        let text = self.text.take().unwrap_or_default();
        for (term, &group) in self.terms.iter().zip(&self.groups) {
            let stats = populate_group(
                scene,
                group,
                &self.geometry,
                text.tokens(),
                term,
                &mut self.rng,
            );
            self.stats.push(stats);
        }
        let total: usize = self.stats.iter().map(|s| s.instances).sum();
        info!(instances = total, "visualized terms");
        self.text = Some(text);
        self.stage = Stage::Visualized;
    }
}

/// Cube scale of an orbiting group as a function of normalized height
pub fn pulse_scale(height_factor: f32) -> f32 {
    0.1 + height_factor * (8.5 - 0.5) * (0.5 - (height_factor - 0.5).abs())
}

fn animate_spin(scene: &mut Scene, group: NodeId, elapsed: f32) {
    let count = scene.children(group).len();
    if count == 0 {
        return;
    }
    for i in 0..count {
        let child = scene.children(group)[i];
        let transform = scene.transform_mut(child);
        let factor = (transform.position.x + 10.0) / 5.0;
        transform.rotation.y = elapsed * (0.1 + factor);
    }
    scene.transform_mut(group).position.y = elapsed.sin();
}

fn animate_orbit(scene: &mut Scene, group: NodeId, elapsed: f32) {
    let transform = scene.transform_mut(group);
    transform.rotation.y = elapsed * ORBIT_SPIN;
    transform.position.x = elapsed.cos();
    transform.position.z = elapsed.sin();

    for i in 0..scene.children(group).len() {
        let child = scene.children(group)[i];
        let transform = scene.transform_mut(child);
        let factor = (transform.position.y + 10.0) / 20.0;
        transform.set_uniform_scale(pulse_scale(factor));
    }
}

impl<R: Rng> Sketch for TermField<R> {
    fn name(&self) -> &'static str {
        "term-field"
    }

    fn build(&mut self) -> Scene {
        let mut scene = Scene::new(camera_at(0.0, 12.0, -20.0));
        scene.background = Some(Color::from_hex(0x808080));
        scene.light = DirectionalLight::new(Color::from_hex(0x404040), 100.0);

        self.groups = self
            .terms
            .iter()
            .map(|term| {
                let group = scene.add_group(None);
                scene.node_mut(group).visible = term.visible;
                group
            })
            .collect();
        self.stats.clear();
        self.text = None;
        self.stage = Stage::SourceText;

        scene
    }

    fn tick(&mut self, scene: &mut Scene, time: FrameTime) {
        let t = time.elapsed;

        if self.turntable {
            let angle = t * TURNTABLE_SPEED;
            scene.camera.set_position(
                angle.sin() * TURNTABLE_RADIUS,
                TURNTABLE_HEIGHT,
                angle.cos() * TURNTABLE_RADIUS,
            );
            scene.camera.look_at(0.0, 0.0, 0.0);
        }

        for (&group, motion) in self.groups.iter().zip(&self.motions) {
            match motion {
                GroupMotion::Spin => animate_spin(scene, group, t),
                GroupMotion::Orbit => animate_orbit(scene, group, t),
                GroupMotion::Still => {}
            }
        }
    }

    fn apply(&mut self, scene: &mut Scene, action: SketchAction) -> bool {
        match action {
            SketchAction::Advance => match self.stage {
                Stage::SourceText => {
                    self.save_source_text();
                    true
                }
                Stage::Terms => {
                    self.save_terms(scene);
                    true
                }
                Stage::Visualized => false,
            },
            SketchAction::ToggleTerm(slot) if self.stage != Stage::SourceText => {
                match self.groups.get(slot) {
                    Some(&group) => {
                        let node = scene.node_mut(group);
                        node.visible = !node.visible;
                        true
                    }
                    None => false,
                }
            }
            SketchAction::ToggleTurntable if self.stage == Stage::Visualized => {
                self.turntable = !self.turntable;
                true
            }
            _ => false,
        }
    }

    fn status(&self) -> String {
        match self.stage {
            Stage::SourceText if self.source.is_empty() => {
                "no source text (use --text or [text] source) | Enter: save".to_string()
            }
            Stage::SourceText => format!("{} chars of text | Enter: save", self.source.len()),
            Stage::Terms => {
                let tokens = self.text.as_ref().map_or(0, TokenizedText::len);
                let terms: Vec<&str> = self.terms.iter().map(|t| t.term.as_str()).collect();
                format!("{tokens} tokens | terms: {} | Enter: visualize", terms.join(", "))
            }
            Stage::Visualized => {
                let summary: Vec<String> = self
                    .stats
                    .iter()
                    .map(|s| format!("{} x{}", s.term, s.matches))
                    .collect();
                format!(
                    "{} | turntable {}",
                    summary.join(", "),
                    if self.turntable { "on" } else { "off" }
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TermConfig;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    fn field(source: &str) -> (TermField, Scene) {
        let mut config = WordfieldConfig::default();
        config.text.source = source.to_string();
        let mut field = TermField::new(&config, StdRng::seed_from_u64(11)).unwrap();
        let scene = field.build();
        (field, scene)
    }

    const SOURCE: &str = "Arthur pressed the button. The steward saw Arthur press the button again.";

    #[test]
    fn stages_advance_in_order() {
        let (mut field, mut scene) = field(SOURCE);
        assert_eq!(field.stage(), Stage::SourceText);

        assert!(field.apply(&mut scene, SketchAction::Advance));
        assert_eq!(field.stage(), Stage::Terms);
        assert_eq!(field.text().unwrap().len(), 12);
        assert!(!field.set_source_text("too late"));

        assert!(field.apply(&mut scene, SketchAction::Advance));
        assert_eq!(field.stage(), Stage::Visualized);
        assert!(!field.apply(&mut scene, SketchAction::Advance));

        let stats = field.stats();
        assert_eq!(stats.len(), 3);
        assert_eq!((stats[0].matches, stats[0].instances), (2, 160));
        assert_eq!((stats[1].matches, stats[1].instances), (1, 100));
        assert_eq!((stats[2].matches, stats[2].instances), (2, 200));
        assert_eq!(scene.visible_meshes().len(), 460);
    }

    #[test]
    fn empty_text_visualizes_nothing() {
        let (mut field, mut scene) = field("");
        field.apply(&mut scene, SketchAction::Advance);
        field.apply(&mut scene, SketchAction::Advance);
        assert!(field.stats().iter().all(|s| s.instances == 0));
        assert!(scene.visible_meshes().is_empty());
    }

    #[test]
    fn toggles_wait_for_their_stage() {
        let (mut field, mut scene) = field(SOURCE);
        assert!(!field.apply(&mut scene, SketchAction::ToggleTerm(0)));
        assert!(!field.apply(&mut scene, SketchAction::ToggleTurntable));

        field.apply(&mut scene, SketchAction::Advance);
        assert!(field.apply(&mut scene, SketchAction::ToggleTerm(0)));
        assert!(!scene.node(field.groups()[0]).visible);
        assert!(!field.apply(&mut scene, SketchAction::ToggleTerm(5)));

        field.apply(&mut scene, SketchAction::Advance);
        assert!(field.apply(&mut scene, SketchAction::ToggleTurntable));
    }

    #[test]
    fn turntable_sweeps_camera() {
        let (mut field, mut scene) = field(SOURCE);
        field.apply(&mut scene, SketchAction::Advance);
        field.apply(&mut scene, SketchAction::Advance);
        field.apply(&mut scene, SketchAction::ToggleTurntable);

        field.tick(&mut scene, FrameTime::at(10.0));
        let pos = scene.camera.position;
        assert_relative_eq!(pos.x, 1.0_f32.sin() * 20.0, epsilon = 1e-4);
        assert_relative_eq!(pos.y, 5.0);
        assert_relative_eq!(pos.z, 1.0_f32.cos() * 20.0, epsilon = 1e-4);
    }

    #[test]
    fn group_motions_follow_time() {
        let (mut field, mut scene) = field(SOURCE);
        field.apply(&mut scene, SketchAction::Advance);
        field.apply(&mut scene, SketchAction::Advance);

        let t = 2.0_f32;
        field.tick(&mut scene, FrameTime::at(t));

        let spin = field.groups()[0];
        assert_relative_eq!(scene.node(spin).transform.position.y, t.sin());
        let cube = scene.children(spin)[0];
        let x = scene.node(cube).transform.position.x;
        assert_relative_eq!(
            scene.node(cube).transform.rotation.y,
            t * (0.1 + (x + 10.0) / 5.0),
            epsilon = 1e-4
        );

        let orbit = field.groups()[1];
        let transform = scene.node(orbit).transform;
        assert_relative_eq!(transform.rotation.y, t * 0.6);
        assert_relative_eq!(transform.position.x, t.cos());
        assert_relative_eq!(transform.position.z, t.sin());
        let cube = scene.children(orbit)[0];
        let y = scene.node(cube).transform.position.y;
        assert_relative_eq!(
            scene.node(cube).transform.scale.x,
            pulse_scale((y + 10.0) / 20.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn empty_spin_group_does_not_bob() {
        let (mut field, mut scene) = field("nothing matches here");
        field.apply(&mut scene, SketchAction::Advance);
        field.apply(&mut scene, SketchAction::Advance);
        field.tick(&mut scene, FrameTime::at(1.0));
        assert_eq!(scene.node(field.groups()[0]).transform.position.y, 0.0);
    }

    #[test]
    fn pulse_peaks_mid_height() {
        assert_relative_eq!(pulse_scale(0.0), 0.1);
        assert_relative_eq!(pulse_scale(0.5), 0.1 + 0.5 * 8.0 * 0.5);
        assert_relative_eq!(pulse_scale(1.0), 0.1);
    }

    #[test]
    fn configured_motion_overrides_slot_default() {
        let mut config = WordfieldConfig::default();
        config.terms = vec![TermConfig {
            term: "arthur".into(),
            motion: Some(GroupMotion::Orbit),
            ..Default::default()
        }];
        let field = TermField::new(&config, StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(field.motions, vec![GroupMotion::Orbit]);
    }
}
