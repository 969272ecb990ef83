/// A torus knot over a wireframe floor, driven by three sliders.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use tracing::debug;

use super::{camera_at, FrameTime, Sketch, SketchAction};
use crate::color::Color;
use crate::config::{TunerConfig, DISTANCE_RANGE, ROTATION_SPEED_RANGE, SPEED_RANGE};
use crate::geometry::Mesh;
use crate::scene::{Material, NodeId, NodeKind, Scene};

pub struct KnotTuner {
    speed: f32,
    distance: f32,
    rotation_speed: f32,
    nodes: Option<(NodeId, NodeId)>,
}

fn clamp_to((min, max): (f32, f32), value: f32) -> f32 {
    value.clamp(min, max)
}

impl KnotTuner {
    pub fn new(config: &TunerConfig) -> Self {
        Self {
            speed: clamp_to(SPEED_RANGE, config.speed),
            distance: clamp_to(DISTANCE_RANGE, config.distance),
            rotation_speed: clamp_to(ROTATION_SPEED_RANGE, config.rotation_speed),
            nodes: None,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    fn floor_wireframe(&self, scene: &Scene) -> bool {
        self.nodes.map_or(false, |(_, floor)| match &scene.node(floor).kind {
            NodeKind::Mesh { material, .. } => material.wireframe(),
            NodeKind::Group => false,
        })
    }
}

impl Sketch for KnotTuner {
    fn name(&self) -> &'static str {
        "knot-tuner"
    }

    fn build(&mut self) -> Scene {
        let mut scene = Scene::new(camera_at(-2.0, 3.0, -5.0));
        scene.background = Some(Color::from_hex(0x808080));

        let knot = scene.add_mesh(
            None,
            Arc::new(Mesh::torus_knot(1.5, 0.3, 64, 8, 2, 3)),
            Material::normal(),
        );
        let floor = scene.add_mesh(
            None,
            Arc::new(Mesh::plane(10.0, 10.0, 50, 50)),
            Material::Basic {
                color: Color::WHITE,
                wireframe: true,
            },
        );
        scene.transform_mut(floor).rotation.x = FRAC_PI_2;

        self.nodes = Some((knot, floor));
        scene
    }

    fn tick(&mut self, scene: &mut Scene, time: FrameTime) {
        let Some((knot, _)) = self.nodes else {
            return;
        };
        let transform = scene.transform_mut(knot);
        transform.position.y = (time.elapsed * self.speed).sin() * self.distance;
        // Accumulates once per frame, so spin rate follows the frame rate
        let step = self.rotation_speed;
        transform.rotation.rotate(step, step, step);
    }

    fn apply(&mut self, scene: &mut Scene, action: SketchAction) -> bool {
        match action {
            SketchAction::ToggleWireframe => {
                let Some((_, floor)) = self.nodes else {
                    return false;
                };
                let enabled = !self.floor_wireframe(scene);
                if let Some(material) = scene.node_mut(floor).material_mut() {
                    material.set_wireframe(enabled);
                }
                true
            }
            SketchAction::AdjustSpeed(delta) => {
                self.speed = clamp_to(SPEED_RANGE, self.speed + delta);
                debug!(speed = self.speed, "adjusted speed");
                true
            }
            SketchAction::AdjustDistance(delta) => {
                self.distance = clamp_to(DISTANCE_RANGE, self.distance + delta);
                debug!(distance = self.distance, "adjusted distance");
                true
            }
            SketchAction::AdjustRotationSpeed(delta) => {
                self.rotation_speed = clamp_to(ROTATION_SPEED_RANGE, self.rotation_speed + delta);
                debug!(rotation_speed = self.rotation_speed, "adjusted rotation speed");
                true
            }
            _ => false,
        }
    }

    fn status(&self) -> String {
        format!(
            "speed {:.1} | distance {:.1} | rotation {:.2}",
            self.speed, self.distance, self.rotation_speed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tuner() -> (KnotTuner, Scene) {
        let mut tuner = KnotTuner::new(&TunerConfig::default());
        let scene = tuner.build();
        (tuner, scene)
    }

    #[test]
    fn knot_bobs_and_spins() {
        let (mut tuner, mut scene) = tuner();
        let (knot, _) = tuner.nodes.unwrap();

        tuner.tick(&mut scene, FrameTime::at(0.5));
        tuner.tick(&mut scene, FrameTime::at(1.0));

        let transform = scene.node(knot).transform;
        assert_relative_eq!(transform.position.y, 3.0_f32.sin() * 8.0);
        assert_relative_eq!(transform.rotation.x, 1.0);
        assert_relative_eq!(transform.rotation.z, 1.0);
    }

    #[test]
    fn sliders_clamp_to_ranges() {
        let (mut tuner, mut scene) = tuner();
        for _ in 0..200 {
            tuner.apply(&mut scene, SketchAction::AdjustSpeed(0.1));
            tuner.apply(&mut scene, SketchAction::AdjustRotationSpeed(-0.01));
        }
        assert_relative_eq!(tuner.speed(), 10.0);
        assert_relative_eq!(tuner.rotation_speed(), 0.01);

        tuner.apply(&mut scene, SketchAction::AdjustDistance(-20.0));
        assert_relative_eq!(tuner.distance(), 0.1);
    }

    #[test]
    fn out_of_range_config_is_clamped() {
        let tuner = KnotTuner::new(&TunerConfig {
            speed: 50.0,
            distance: 0.0,
            rotation_speed: 0.5,
        });
        assert_eq!(tuner.speed(), 10.0);
        assert_eq!(tuner.distance(), 0.1);
    }

    #[test]
    fn wireframe_toggles() {
        let (mut tuner, mut scene) = tuner();
        assert!(tuner.floor_wireframe(&scene));
        assert!(tuner.apply(&mut scene, SketchAction::ToggleWireframe));
        assert!(!tuner.floor_wireframe(&scene));
        tuner.apply(&mut scene, SketchAction::ToggleWireframe);
        assert!(tuner.floor_wireframe(&scene));
    }

    #[test]
    fn floor_lies_flat() {
        let (tuner, scene) = tuner();
        let (_, floor) = tuner.nodes.unwrap();
        assert_relative_eq!(scene.node(floor).transform.rotation.x, FRAC_PI_2);
    }
}
