/// A smiley face in front of a lit cave wall. The light can be moved.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::sync::Arc;

use nalgebra::Point3;

use super::{camera_at, FrameTime, Sketch, SketchAction};
use crate::color::Color;
use crate::geometry::Mesh;
use crate::scene::{DirectionalLight, Material, Scene};

/// Range the light may be moved within on y and z
pub const LIGHT_RANGE: (f32, f32) = (-10.0, 10.0);

#[derive(Debug, Default)]
pub struct SmileyCave;

impl SmileyCave {
    pub fn new() -> Self {
        SmileyCave
    }
}

/// Scene shared with the cave-changes sketch: a white wall facing +x and
/// a white light shining at it from (20, 4.1, 0)
pub(crate) fn add_cave(scene: &mut Scene, z: f32) {
    let cave = scene.add_mesh(
        None,
        Arc::new(Mesh::plane(15.5, 7.5, 1, 1)),
        Material::standard(Color::WHITE),
    );
    let transform = scene.transform_mut(cave);
    transform.rotation.y = FRAC_PI_2;
    transform.position.z = z;

    let mut light = DirectionalLight::new(Color::WHITE, 0.5);
    light.position = Point3::new(20.0, 4.1, 0.0);
    light.target = Point3::new(0.0, 0.0, z);
    scene.light = light;
}

impl Sketch for SmileyCave {
    fn name(&self) -> &'static str {
        "smiley-cave"
    }

    fn build(&mut self) -> Scene {
        let mut scene = Scene::new(camera_at(10.0, 2.0, 7.5));
        scene.background = Some(Color::BLACK);
        add_cave(&mut scene, -5.0);

        let face = scene.add_group(None);
        let transform = scene.transform_mut(face);
        transform.set_position(0.0, 1.0, 0.0);
        transform.rotation.y = PI;

        let eye = Arc::new(Mesh::circle(0.2, 32));
        for x in [-0.5, 0.5] {
            let id = scene.add_mesh(Some(face), Arc::clone(&eye), Material::normal());
            scene.transform_mut(id).set_position(x, 0.5, 0.0);
        }
        scene.add_mesh(
            Some(face),
            Arc::new(Mesh::ring(0.3, 0.5, 32, FRAC_PI_4, 3.0 * FRAC_PI_4)),
            Material::normal(),
        );

        scene
    }

    fn tick(&mut self, _scene: &mut Scene, _time: FrameTime) {}

    fn apply(&mut self, scene: &mut Scene, action: SketchAction) -> bool {
        let SketchAction::MoveLight { dy, dz } = action else {
            return false;
        };
        let (min, max) = LIGHT_RANGE;
        let position = &mut scene.light.position;
        position.y = (position.y + dy).clamp(min, max);
        position.z = (position.z + dz).clamp(min, max);
        true
    }
}
