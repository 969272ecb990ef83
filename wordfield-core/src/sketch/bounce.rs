/// A sphere and a torus knot bouncing on fixed sine curves.

use std::sync::Arc;

use super::{camera_at, FrameTime, Sketch};
use crate::color::Color;
use crate::geometry::Mesh;
use crate::scene::{Material, NodeId, Scene};
use crate::transform::Rotation;

const SPEED: f32 = 2.0;
const DISTANCE: f32 = 3.0;
const ROTATION_SPEED: f32 = 2.0;

#[derive(Debug, Default)]
pub struct Bounce {
    nodes: Option<(NodeId, NodeId)>,
}

impl Bounce {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sketch for Bounce {
    fn name(&self) -> &'static str {
        "bounce"
    }

    fn build(&mut self) -> Scene {
        let mut scene = Scene::new(camera_at(0.0, 0.0, 6.0));
        scene.background = Some(Color::from_hex(0xadd8e6));

        let sphere = scene.add_mesh(
            None,
            Arc::new(Mesh::uv_sphere(1.0, 32, 16)),
            Material::normal(),
        );
        let knot = scene.add_mesh(
            None,
            Arc::new(Mesh::torus_knot(1.0, 0.4, 64, 8, 2, 3)),
            Material::normal(),
        );
        scene.transform_mut(knot).set_position(0.0, 0.0, 1.0);

        self.nodes = Some((sphere, knot));
        scene
    }

    fn tick(&mut self, scene: &mut Scene, time: FrameTime) {
        let Some((sphere, knot)) = self.nodes else {
            return;
        };
        let t = time.elapsed;

        let sphere = scene.transform_mut(sphere);
        sphere.position.x = (t * SPEED).sin() * DISTANCE;
        sphere.scale.x = t.sin();

        let knot = scene.transform_mut(knot);
        knot.position.z = t.sin();
        knot.position.y = (t * SPEED).sin() * DISTANCE;
        knot.rotation = Rotation::uniform(t * ROTATION_SPEED);
        knot.set_uniform_scale(t.sin());
    }

    /// The camera stays put
    fn orbit_enabled(&self) -> bool {
        false
    }
}
