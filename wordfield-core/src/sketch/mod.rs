/// Sketches: self-contained scenes with a per-frame animation.
///
/// A host builds the scene once with [`Sketch::build`], then calls
/// [`Sketch::tick`] every frame with the elapsed time. User input reaches a
/// sketch as [`SketchAction`]s; actions a sketch does not understand are
/// ignored.

pub mod bounce;
pub mod cave_changes;
pub mod knot_tuner;
pub mod smiley_cave;
pub mod story_cubes;
pub mod term_field;

use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::WordfieldConfig;
use crate::error::{Error, Result};
use crate::projection::Camera;
use crate::scene::Scene;

pub use bounce::Bounce;
pub use cave_changes::{CaveChanges, ChangeMode, ChangeSet, Part};
pub use knot_tuner::KnotTuner;
pub use smiley_cave::SmileyCave;
pub use story_cubes::StoryCubes;
pub use term_field::{Stage, TermField};

/// Names accepted by [`create`], in menu order
pub const SKETCH_NAMES: &[&str] = &[
    "term-field",
    "story-cubes",
    "bounce",
    "knot-tuner",
    "smiley-cave",
    "cave-changes",
];

/// Clock reading handed to [`Sketch::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the sketch started
    pub elapsed: f32,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameTime {
    pub fn at(elapsed: f32) -> Self {
        Self {
            elapsed,
            delta: 0.0,
        }
    }
}

/// Input events a sketch may react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SketchAction {
    /// Move to the next stage (save text, then visualize)
    Advance,
    /// Show or hide the group of the term in this slot
    ToggleTerm(usize),
    ToggleTurntable,
    SelectPart(Part),
    EnableChange(ChangeMode),
    ToggleWireframe,
    AdjustSpeed(f32),
    AdjustDistance(f32),
    AdjustRotationSpeed(f32),
    MoveLight { dy: f32, dz: f32 },
}

impl FromStr for SketchAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let action = match s.trim() {
            "advance" => SketchAction::Advance,
            "term-1" => SketchAction::ToggleTerm(0),
            "term-2" => SketchAction::ToggleTerm(1),
            "term-3" => SketchAction::ToggleTerm(2),
            "turntable" => SketchAction::ToggleTurntable,
            "part-1" => SketchAction::SelectPart(Part::One),
            "part-2" => SketchAction::SelectPart(Part::Two),
            "change-1" => SketchAction::EnableChange(ChangeMode::First),
            "change-2" => SketchAction::EnableChange(ChangeMode::Second),
            "change-3" => SketchAction::EnableChange(ChangeMode::Third),
            "change-4" => SketchAction::EnableChange(ChangeMode::Fourth),
            "wireframe" => SketchAction::ToggleWireframe,
            "speed+" => SketchAction::AdjustSpeed(0.1),
            "speed-" => SketchAction::AdjustSpeed(-0.1),
            "distance+" => SketchAction::AdjustDistance(0.1),
            "distance-" => SketchAction::AdjustDistance(-0.1),
            "rotation+" => SketchAction::AdjustRotationSpeed(0.01),
            "rotation-" => SketchAction::AdjustRotationSpeed(-0.01),
            "light-up" => SketchAction::MoveLight { dy: 0.1, dz: 0.0 },
            "light-down" => SketchAction::MoveLight { dy: -0.1, dz: 0.0 },
            "light-forward" => SketchAction::MoveLight { dy: 0.0, dz: 0.1 },
            "light-back" => SketchAction::MoveLight { dy: 0.0, dz: -0.1 },
            other => return Err(Error::UnknownAction(other.to_string())),
        };
        Ok(action)
    }
}

pub trait Sketch {
    fn name(&self) -> &'static str;

    /// Construct the scene: camera, meshes, light
    fn build(&mut self) -> Scene;

    /// Advance the animation to `time`
    fn tick(&mut self, scene: &mut Scene, time: FrameTime);

    /// React to input. Returns `false` when the action does not apply.
    fn apply(&mut self, _scene: &mut Scene, _action: SketchAction) -> bool {
        false
    }

    /// One-line state summary for the host's overlay
    fn status(&self) -> String {
        String::new()
    }

    /// Whether the host's orbit controls should drive the camera
    fn orbit_enabled(&self) -> bool {
        true
    }
}

/// Create a sketch by name
pub fn create(name: &str, config: &WordfieldConfig) -> Result<Box<dyn Sketch>> {
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let sketch: Box<dyn Sketch> = match name {
        "term-field" => Box::new(TermField::new(config, rng)?),
        "story-cubes" => Box::new(StoryCubes::new(rng)),
        "bounce" => Box::new(Bounce::new()),
        "knot-tuner" => Box::new(KnotTuner::new(&config.tuner)),
        "smiley-cave" => Box::new(SmileyCave::new()),
        "cave-changes" => Box::new(CaveChanges::new(config.changes.exclusive)),
        other => return Err(Error::UnknownSketch(other.to_string())),
    };

    info!(sketch = name, seed = ?config.seed, "created sketch");
    Ok(sketch)
}

/// Camera with the sketches' lens (75° fov, 0.1 to 100) aimed at the origin
pub(crate) fn camera_at(x: f32, y: f32, z: f32) -> Camera {
    let mut camera = Camera::new(1.0);
    camera.set_position(x, y, z);
    camera.look_at(0.0, 0.0, 0.0);
    camera
}
