/// Retained-mode scene graph.
///
/// Nodes live in an arena owned by [`Scene`] and are addressed by [`NodeId`].
/// A node is either a group or a mesh; both carry a local [`Transform`] and a
/// visibility flag. Hiding a node hides its whole subtree.

use std::sync::Arc;

use nalgebra::{Matrix4, Point3, Vector3};

use crate::color::Color;
use crate::geometry::Mesh;
use crate::projection::Camera;
use crate::transform::Transform;

/// Handle to a node inside a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Surface appearance of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Colored by the surface normal, unlit
    Normal { wireframe: bool },
    /// Lit by the scene's directional light
    Standard { color: Color },
    /// Flat color, unlit
    Basic { color: Color, wireframe: bool },
}

impl Material {
    pub fn normal() -> Self {
        Material::Normal { wireframe: false }
    }

    pub fn standard(color: Color) -> Self {
        Material::Standard { color }
    }

    pub fn wireframe(&self) -> bool {
        match *self {
            Material::Normal { wireframe } | Material::Basic { wireframe, .. } => wireframe,
            Material::Standard { .. } => false,
        }
    }

    pub fn set_wireframe(&mut self, enabled: bool) {
        match self {
            Material::Normal { wireframe } | Material::Basic { wireframe, .. } => *wireframe = enabled,
            Material::Standard { .. } => {}
        }
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Group,
    Mesh {
        geometry: Arc<Mesh>,
        material: Material,
    },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub transform: Transform,
    pub visible: bool,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn material_mut(&mut self) -> Option<&mut Material> {
        match &mut self.kind {
            NodeKind::Mesh { material, .. } => Some(material),
            NodeKind::Group => None,
        }
    }
}

/// Directional light shining from `position` toward `target`
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub color: Color,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self {
            position: Point3::new(0.0, 1.0, 0.0),
            target: Point3::origin(),
            color,
            intensity,
        }
    }

    /// Unit vector from the target toward the light
    pub fn to_light(&self) -> Vector3<f32> {
        let dir = self.position - self.target;
        if dir.norm() < 1e-6 {
            Vector3::y()
        } else {
            dir.normalize()
        }
    }

    /// Light strength in `[0, 1]` used by the terminal shader
    pub fn strength(&self) -> f32 {
        (self.intensity * self.color.luminance()).clamp(0.0, 1.0)
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Color::WHITE, 1.0)
    }
}

/// A visible mesh with its accumulated world matrix
pub struct MeshView<'a> {
    pub id: NodeId,
    pub geometry: &'a Mesh,
    pub material: &'a Material,
    pub world: Matrix4<f32>,
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Option<Color>,
    pub camera: Camera,
    pub light: DirectionalLight,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            background: None,
            camera,
            light: DirectionalLight::default(),
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    fn insert(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            transform: Transform::identity(),
            visible: true,
            kind,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Add an empty group, at the root when `parent` is `None`
    pub fn add_group(&mut self, parent: Option<NodeId>) -> NodeId {
        self.insert(parent, NodeKind::Group)
    }

    pub fn add_mesh(
        &mut self,
        parent: Option<NodeId>,
        geometry: Arc<Mesh>,
        material: Material,
    ) -> NodeId {
        self.insert(parent, NodeKind::Mesh { geometry, material })
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn transform_mut(&mut self, id: NodeId) -> &mut Transform {
        &mut self.nodes[id.0].transform
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// World matrix of a node, walking the parent chain
    pub fn world_matrix(&self, id: NodeId) -> Matrix4<f32> {
        let node = &self.nodes[id.0];
        let local = node.transform.matrix();
        match node.parent {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        }
    }

    /// Whether the node and all of its ancestors are visible
    pub fn is_visible(&self, id: NodeId) -> bool {
        let node = &self.nodes[id.0];
        node.visible && node.parent.map_or(true, |parent| self.is_visible(parent))
    }

    /// Every visible mesh with its world matrix, in depth-first order
    pub fn visible_meshes(&self) -> Vec<MeshView<'_>> {
        let mut out = Vec::new();
        let mut stack: Vec<(NodeId, Matrix4<f32>)> = self
            .roots
            .iter()
            .rev()
            .map(|&id| (id, Matrix4::identity()))
            .collect();

        while let Some((id, parent_world)) = stack.pop() {
            let node = &self.nodes[id.0];
            if !node.visible {
                continue;
            }
            let world = parent_world * node.transform.matrix();
            if let NodeKind::Mesh { geometry, material } = &node.kind {
                out.push(MeshView {
                    id,
                    geometry: geometry.as_ref(),
                    material,
                    world,
                });
            }
            for &child in node.children.iter().rev() {
                stack.push((child, world));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scene_with_group() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::new(Camera::default());
        let group = scene.add_group(None);
        scene.transform_mut(group).set_position(0.0, 1.0, 0.0);
        let cube = Arc::new(Mesh::cube(0.5));
        let mesh = scene.add_mesh(Some(group), cube, Material::standard(Color::WHITE));
        scene.transform_mut(mesh).set_position(2.0, 0.0, 0.0);
        (scene, group, mesh)
    }

    #[test]
    fn world_matrix_accumulates_parents() {
        let (scene, _, mesh) = scene_with_group();
        let origin = scene.world_matrix(mesh).transform_point(&Point3::origin());
        assert_relative_eq!(origin, Point3::new(2.0, 1.0, 0.0), epsilon = 1e-6);

        let views = scene.visible_meshes();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, mesh);
        assert_relative_eq!(views[0].world, scene.world_matrix(mesh), epsilon = 1e-6);
    }

    #[test]
    fn hidden_group_hides_subtree() {
        let (mut scene, group, mesh) = scene_with_group();
        scene.node_mut(group).visible = false;
        assert!(!scene.is_visible(mesh));
        assert!(scene.visible_meshes().is_empty());
    }

    #[test]
    fn children_are_tracked() {
        let (scene, group, mesh) = scene_with_group();
        assert_eq!(scene.children(group), &[mesh]);
        assert_eq!(scene.node(mesh).parent(), Some(group));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn wireframe_toggle_skips_standard() {
        let mut basic = Material::Basic {
            color: Color::WHITE,
            wireframe: true,
        };
        basic.set_wireframe(false);
        assert!(!basic.wireframe());

        let mut standard = Material::standard(Color::WHITE);
        standard.set_wireframe(true);
        assert!(!standard.wireframe());
    }

    #[test]
    fn light_direction_points_at_light() {
        let mut light = DirectionalLight::new(Color::WHITE, 0.5);
        light.position = Point3::new(20.0, 0.0, 0.0);
        assert_relative_eq!(light.to_light(), Vector3::x(), epsilon = 1e-6);
        assert_relative_eq!(light.strength(), 0.5, epsilon = 1e-5);
    }
}
