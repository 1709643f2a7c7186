//! Static scene graph: a strictly tree-shaped parent/child transform
//! hierarchy. Parents always precede children in the node arena, so world
//! transforms and visibility resolve in a single forward pass.

pub mod bear;
pub mod mesh;

use glam::{EulerRot, Mat4, Quat, Vec3};

pub use bear::BearRig;
pub use mesh::MeshData;

/// A node's local transform: translation, XYZ euler rotation, scale.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub translation: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        let rot = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rot, self.translation)
    }
}

/// Surface material: sRGB base color plus roughness/metallic for the
/// highlight model.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    pub base_color: [f32; 4],
    pub roughness: f32,
    pub metallic: f32,
}

impl Material {
    pub fn new(base_color: [f32; 4]) -> Self {
        Self {
            base_color,
            roughness: 0.8,
            metallic: 0.0,
        }
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic;
        self
    }
}

/// Convert a 24-bit sRGB hex color to an RGBA float color.
pub fn hex_color(rgb: u32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xFF) as f32 / 255.0,
        ((rgb >> 8) & 0xFF) as f32 / 255.0,
        (rgb & 0xFF) as f32 / 255.0,
        1.0,
    ]
}

/// A scene node. Mesh and material are optional: pure grouping nodes carry
/// neither.
pub struct Node {
    pub name: &'static str,
    pub parent: Option<usize>,
    pub transform: Transform,
    pub mesh: Option<MeshData>,
    pub material: Option<Material>,
    pub visible: bool,
}

/// Arena of nodes. Invariant: a node's parent index is always smaller than
/// its own, so forward iteration sees parents first.
#[derive(Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a grouping node (no mesh) and return its index.
    pub fn add_group(
        &mut self,
        name: &'static str,
        parent: Option<usize>,
        transform: Transform,
    ) -> usize {
        self.add_node(name, parent, transform, None, None)
    }

    /// Add a mesh node and return its index.
    pub fn add_mesh(
        &mut self,
        name: &'static str,
        parent: Option<usize>,
        transform: Transform,
        mesh: MeshData,
        material: Material,
    ) -> usize {
        self.add_node(name, parent, transform, Some(mesh), Some(material))
    }

    fn add_node(
        &mut self,
        name: &'static str,
        parent: Option<usize>,
        transform: Transform,
        mesh: Option<MeshData>,
        material: Option<Material>,
    ) -> usize {
        if let Some(p) = parent {
            debug_assert!(p < self.nodes.len(), "parent must be inserted first");
        }
        self.nodes.push(Node {
            name,
            parent,
            transform,
            mesh,
            material,
            visible: true,
        });
        self.nodes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub fn node_mut(&mut self, idx: usize) -> &mut Node {
        &mut self.nodes[idx]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Compute world transforms for every node: parent world x child local.
    pub fn world_transforms(&self) -> Vec<Mat4> {
        let mut world = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let local = node.transform.matrix();
            let m = match node.parent {
                Some(p) => world[p] * local,
                None => local,
            };
            world.push(m);
        }
        world
    }

    /// Effective visibility: a node renders only if it and all ancestors
    /// are visible.
    pub fn effective_visibility(&self) -> Vec<bool> {
        let mut vis = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let v = node.visible
                && match node.parent {
                    Some(p) => vis[p],
                    None => true,
                };
            vis.push(v);
        }
        vis
    }
}
