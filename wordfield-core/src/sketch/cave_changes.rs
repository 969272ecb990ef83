/// Cave wall with a torus knot and a wireframe icosahedron.
///
/// Two camera parts pin the view; four change modes can be switched on and
/// stay on. Every frame the enabled changes run in ascending order, so where
/// two changes write the same property the later one wins.

use std::sync::Arc;

use tracing::info;

use super::smiley_cave::add_cave;
use super::{camera_at, FrameTime, Sketch, SketchAction};
use crate::geometry::Mesh;
use crate::scene::{Material, NodeId, Scene};
use crate::transform::Transform;

/// Pinned camera position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Part {
    #[default]
    One,
    Two,
}

impl Part {
    pub fn camera_x(self) -> f32 {
        match self {
            Part::One => 6.0,
            Part::Two => 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeMode {
    First,
    Second,
    Third,
    Fourth,
}

impl ChangeMode {
    pub const ALL: [ChangeMode; 4] = [
        ChangeMode::First,
        ChangeMode::Second,
        ChangeMode::Third,
        ChangeMode::Fourth,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Enabled change modes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    enabled: [bool; 4],
    exclusive: bool,
}

impl ChangeSet {
    /// With `exclusive`, enabling a mode disables all others
    pub fn new(exclusive: bool) -> Self {
        Self {
            enabled: [false; 4],
            exclusive,
        }
    }

    pub fn enable(&mut self, mode: ChangeMode) {
        if self.exclusive {
            self.enabled = [false; 4];
        }
        self.enabled[mode.index()] = true;
    }

    pub fn is_enabled(&self, mode: ChangeMode) -> bool {
        self.enabled[mode.index()]
    }

    pub fn is_empty(&self) -> bool {
        !self.enabled.iter().any(|&on| on)
    }

    /// Enabled modes in ascending order
    pub fn active(&self) -> impl Iterator<Item = ChangeMode> + '_ {
        ChangeMode::ALL
            .into_iter()
            .filter(move |mode| self.is_enabled(*mode))
    }
}

pub fn change_knot(mode: ChangeMode, t: f32, knot: &mut Transform) {
    match mode {
        ChangeMode::First => {
            knot.set_uniform_scale(1.0);
            knot.rotation.y = t;
            knot.position.x = t.sin() * 3.0 + 10.0;
            knot.position.z = t.cos() * 4.0;
        }
        ChangeMode::Second => {
            knot.set_uniform_scale(t.sin() * 1.3 + 1.5);
            knot.rotation.x = t * 2.0;
            knot.rotation.y = t * 2.0;
            knot.rotation.z = t * 2.0;
        }
        ChangeMode::Third => {
            knot.set_uniform_scale(1.0);
            knot.rotation.x = t * 2.0;
            knot.rotation.y = t * 2.0;
            knot.rotation.z = t * 2.0;
            knot.position.y = t.cos() * 5.0;
            knot.position.x = t.sin() + 10.0;
            knot.position.z = t.sin() * 4.0;
        }
        ChangeMode::Fourth => {
            knot.set_uniform_scale(1.0);
            knot.rotation.y = t;
            knot.rotation.x = t;
            knot.position.y = -(t * 0.5).cos() * 5.0;
            knot.position.x = t.sin() + 10.0;
            knot.position.z = t.sin() * 4.0;
        }
    }
}

pub fn change_icosahedron(mode: ChangeMode, t: f32, ico: &mut Transform) {
    ico.rotation.x = t * 2.0;
    ico.rotation.y = t * 2.0;
    match mode {
        ChangeMode::First => {}
        ChangeMode::Second => {
            ico.position.y = t.cos() * 3.0 + 3.0;
            ico.position.z = t.sin() * 4.0;
        }
        ChangeMode::Third => {
            ico.position.y = -t.cos() * 5.0;
            ico.position.x = t.sin() + 10.0;
            ico.position.z = t.cos() * 4.0;
        }
        ChangeMode::Fourth => {
            ico.rotation.z = t * 2.0;
            ico.position.y = -t.sin() * 5.0;
            ico.position.x = -(t * 0.5).cos() + 10.0;
            ico.position.z = (t * 0.3).sin() * 4.0;
        }
    }
}

pub struct CaveChanges {
    part: Part,
    changes: ChangeSet,
    nodes: Option<(NodeId, NodeId)>,
}

impl CaveChanges {
    pub fn new(exclusive: bool) -> Self {
        Self {
            part: Part::One,
            changes: ChangeSet::new(exclusive),
            nodes: None,
        }
    }

    pub fn part(&self) -> Part {
        self.part
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }
}

impl Sketch for CaveChanges {
    fn name(&self) -> &'static str {
        "cave-changes"
    }

    fn build(&mut self) -> Scene {
        let mut scene = Scene::new(camera_at(10.0, 2.0, 7.5));
        add_cave(&mut scene, 0.0);

        let knot = scene.add_mesh(
            None,
            Arc::new(Mesh::torus_knot(1.0, 0.2, 64, 8, 2, 3)),
            Material::normal(),
        );
        scene.transform_mut(knot).set_position(15.0, 2.5, 0.0);

        let ico = scene.add_mesh(
            None,
            Arc::new(Mesh::icosahedron(1.0)),
            Material::Normal { wireframe: true },
        );
        scene.transform_mut(ico).set_position(15.0, 3.3, 0.0);

        self.nodes = Some((knot, ico));
        scene
    }

    fn tick(&mut self, scene: &mut Scene, time: FrameTime) {
        scene.camera.set_position(self.part.camera_x(), 0.0, 0.0);
        scene.camera.look_at(0.0, 0.0, 0.0);

        let Some((knot, ico)) = self.nodes else {
            return;
        };
        let t = time.elapsed;
        for mode in self.changes.active() {
            change_knot(mode, t, scene.transform_mut(knot));
            change_icosahedron(mode, t, scene.transform_mut(ico));
        }
    }

    fn apply(&mut self, _scene: &mut Scene, action: SketchAction) -> bool {
        match action {
            SketchAction::SelectPart(part) => {
                self.part = part;
                true
            }
            SketchAction::EnableChange(mode) => {
                self.changes.enable(mode);
                info!(?mode, "enabled change");
                true
            }
            _ => false,
        }
    }

    fn status(&self) -> String {
        let part = match self.part {
            Part::One => "part one",
            Part::Two => "part two",
        };
        let active: Vec<String> = self
            .changes
            .active()
            .map(|mode| (mode.index() + 1).to_string())
            .collect();
        if active.is_empty() {
            format!("{part} | no changes")
        } else {
            format!("{part} | changes {}", active.join("+"))
        }
    }

    /// The camera is pinned by the selected part
    fn orbit_enabled(&self) -> bool {
        false
    }
}
