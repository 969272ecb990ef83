/// Term locator and placement generator.
///
/// Each occurrence of a search term becomes a batch of cube instances. The
/// token index of the occurrence is mapped to a height, which drives the
/// vertical placement and, depending on [`ScaleMode`], the cube scale.
/// Planar positions and rotations come from an injected random source.

use std::f32::consts::TAU;
use std::sync::Arc;

use nalgebra::Vector3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Color;
use crate::geometry::Mesh;
use crate::scene::{Material, NodeId, Scene};
use crate::transform::{Rotation, Transform};

/// Heights span `[0, HEIGHT_SPAN * HEIGHT_FACTOR)` across the text
pub const HEIGHT_SPAN: f32 = 100.0;
pub const HEIGHT_FACTOR: f32 = 0.2;
/// Instances sit at `height - VERTICAL_OFFSET`
pub const VERTICAL_OFFSET: f32 = 10.0;
/// Edge length of the shared instance cube
pub const CUBE_SIZE: f32 = 0.5;

const LINEAR_SCALE_FACTOR: f32 = 0.1;
const INVERSE_SCALE_FACTOR: f32 = 0.35;

/// How an instance's scale is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// The term's configured scale
    #[default]
    Constant,
    /// Grows with height: `height * 0.1`
    Linear,
    /// Shrinks with height: `1 / (height * 0.35)`
    Inverse,
}

impl ScaleMode {
    pub fn scale_for(self, height: f32, base: f32) -> f32 {
        match self {
            ScaleMode::Constant => base,
            ScaleMode::Linear => height * LINEAR_SCALE_FACTOR,
            ScaleMode::Inverse => {
                let denom = height * INVERSE_SCALE_FACTOR;
                if denom.abs() < f32::EPSILON {
                    base
                } else {
                    1.0 / denom
                }
            }
        }
    }
}

/// Parameters for visualizing one search term
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTerm {
    pub term: String,
    pub color: Color,
    /// Width of the square the instances are scattered over
    pub diameter: f32,
    /// Instances per occurrence
    pub count: usize,
    pub scale: f32,
    pub scale_mode: ScaleMode,
    /// Random rotation on every axis
    pub randomized: bool,
    pub visible: bool,
}

impl SearchTerm {
    pub fn new(term: impl Into<String>, color: Color) -> Self {
        Self {
            term: term.into(),
            color,
            diameter: 10.0,
            count: 100,
            scale: 1.0,
            scale_mode: ScaleMode::Constant,
            randomized: true,
            visible: true,
        }
    }

    pub fn with_diameter(mut self, diameter: f32) -> Self {
        self.diameter = diameter;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_scale(mut self, scale: f32, mode: ScaleMode) -> Self {
        self.scale = scale;
        self.scale_mode = mode;
        self
    }

    pub fn with_randomized(mut self, randomized: bool) -> Self {
        self.randomized = randomized;
        self
    }
}

/// One placed cube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instance {
    pub token_index: usize,
    pub height: f32,
    pub position: Vector3<f32>,
    pub rotation: Rotation,
    pub scale: f32,
}

impl Instance {
    pub fn transform(&self) -> Transform {
        let mut transform = Transform {
            position: self.position,
            rotation: self.rotation,
            ..Transform::identity()
        };
        transform.set_uniform_scale(self.scale);
        transform
    }
}

/// Match counts for one visualized term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermStats {
    pub term: String,
    pub matches: usize,
    pub instances: usize,
}

/// Map a token index to a height: `(100 / token_count) * index * 0.2`
pub fn height_for_index(index: usize, token_count: usize) -> f32 {
    if token_count == 0 {
        return 0.0;
    }
    (HEIGHT_SPAN / token_count as f32) * index as f32 * HEIGHT_FACTOR
}

/// Indices of every token equal to `term`. An empty term matches nothing.
pub fn locate(tokens: &[String], term: &str) -> Vec<usize> {
    if term.is_empty() {
        return Vec::new();
    }
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.as_str() == term)
        .map(|(index, _)| index)
        .collect()
}

/// Place a single instance for an occurrence at `height`
pub fn place_instance<R: Rng + ?Sized>(
    token_index: usize,
    height: f32,
    term: &SearchTerm,
    rng: &mut R,
) -> Instance {
    let x = (rng.gen::<f32>() - 0.5) * term.diameter;
    let z = (rng.gen::<f32>() - 0.5) * term.diameter;

    let rotation = if term.randomized {
        let rx = rng.gen::<f32>() * TAU;
        let rz = rng.gen::<f32>() * TAU;
        let ry = rng.gen::<f32>() * TAU;
        Rotation::new(rx, ry, rz)
    } else {
        Rotation::zero()
    };

    Instance {
        token_index,
        height,
        position: Vector3::new(x, height - VERTICAL_OFFSET, z),
        rotation,
        scale: term.scale_mode.scale_for(height, term.scale),
    }
}

/// Place `count` instances for every occurrence of the term
pub fn place_instances<R: Rng + ?Sized>(
    tokens: &[String],
    term: &SearchTerm,
    rng: &mut R,
) -> Vec<Instance> {
    let matches = locate(tokens, &term.term);
    let mut instances = Vec::with_capacity(matches.len() * term.count);
    for index in matches {
        let height = height_for_index(index, tokens.len());
        for _ in 0..term.count {
            instances.push(place_instance(index, height, term, rng));
        }
    }
    instances
}

/// The cube geometry shared by every instance
pub fn instance_geometry() -> Arc<Mesh> {
    Arc::new(Mesh::cube(CUBE_SIZE))
}

/// Place the term's instances and add them as meshes under `group`
pub fn populate_group<R: Rng + ?Sized>(
    scene: &mut Scene,
    group: NodeId,
    geometry: &Arc<Mesh>,
    tokens: &[String],
    term: &SearchTerm,
    rng: &mut R,
) -> TermStats {
    let instances = place_instances(tokens, term, rng);
    let material = Material::standard(term.color);
    for instance in &instances {
        let id = scene.add_mesh(Some(group), Arc::clone(geometry), material);
        *scene.transform_mut(id) = instance.transform();
    }

    let stats = TermStats {
        term: term.term.clone(),
        matches: locate(tokens, &term.term).len(),
        instances: instances.len(),
    };
    debug!(
        term = %stats.term,
        matches = stats.matches,
        instances = stats.instances,
        "placed term instances"
    );
    stats
}
