//! The bear: a fixed hierarchy of procedural primitives.
//!
//! Geometry and materials are static; the animator only ever writes to the
//! animated joints (head group, two eye groups, two arm pivots, and the
//! mouth visibility flags) via `apply_pose`.

use glam::Vec3;

use crate::avatar::{JointPose, MouthShape};

use super::{hex_color, mesh, Material, SceneGraph, Transform};

const FUR: u32 = 0x8B5A2B;
const SNOUT_TAN: u32 = 0xD2B48C;
const NOSE_BROWN: u32 = 0x3E2723;
const SCARF_RED: u32 = 0xEF4444;
const EYE_BLACK: u32 = 0x1A1A1A;

/// Node indices of the animated joints.
#[derive(Debug, Clone, Copy)]
pub struct Joints {
    pub head: usize,
    pub left_eye: usize,
    pub right_eye: usize,
    pub left_arm: usize,
    pub right_arm: usize,
    pub mouth_arc: usize,
    pub mouth_dot: usize,
}

/// The assembled bear scene graph plus its joint handles.
pub struct BearRig {
    pub graph: SceneGraph,
    pub joints: Joints,
}

impl BearRig {
    /// Build the full hierarchy. Coordinates are scene units; the root sits
    /// at (0, -1, 0) so the head ends up roughly centered in view.
    pub fn build() -> Self {
        let fur = Material::new(hex_color(FUR)).with_roughness(0.6);
        let tan = Material::new(hex_color(SNOUT_TAN));
        let red = Material::new(hex_color(SCARF_RED));
        let dark = Material::new(hex_color(EYE_BLACK));

        let mut graph = SceneGraph::new();

        let root = graph.add_group(
            "root",
            None,
            Transform::from_translation(Vec3::new(0.0, -1.0, 0.0)),
        );

        graph.add_mesh(
            "body",
            Some(root),
            Transform::default(),
            mesh::capsule(0.9, 1.8, 16, 4),
            fur,
        );

        graph.add_mesh(
            "scarf",
            Some(root),
            Transform {
                translation: Vec3::new(0.0, 0.9, 0.0),
                rotation: Vec3::new(std::f32::consts::FRAC_PI_2, 0.0, 0.0),
                ..Default::default()
            },
            mesh::torus(0.7, 0.25, 16, 32, std::f32::consts::TAU),
            red,
        );

        let scarf_tail = graph.add_group(
            "scarf_tail",
            Some(root),
            Transform {
                translation: Vec3::new(0.4, 0.8, 0.6),
                rotation: Vec3::new(0.0, 0.0, -0.2),
                ..Default::default()
            },
        );
        graph.add_mesh(
            "scarf_tail_panel",
            Some(scarf_tail),
            Transform::from_translation(Vec3::new(0.0, -0.4, 0.0)),
            mesh::cuboid(0.3, 0.8, 0.1),
            red,
        );

        // Arm pivots sit at the shoulders; the capsules hang below so
        // rotating the pivot swings the whole arm.
        let left_arm = graph.add_group(
            "left_arm",
            Some(root),
            Transform::from_translation(Vec3::new(-0.8, 0.5, 0.0)),
        );
        graph.add_mesh(
            "left_arm_capsule",
            Some(left_arm),
            Transform::from_translation(Vec3::new(0.0, -0.6, 0.0)),
            mesh::capsule(0.25, 1.2, 8, 4),
            fur,
        );

        let right_arm = graph.add_group(
            "right_arm",
            Some(root),
            Transform::from_translation(Vec3::new(0.8, 0.5, 0.0)),
        );
        graph.add_mesh(
            "right_arm_capsule",
            Some(right_arm),
            Transform::from_translation(Vec3::new(0.0, -0.6, 0.0)),
            mesh::capsule(0.25, 1.2, 8, 4),
            fur,
        );

        let head = graph.add_group(
            "head",
            Some(root),
            Transform::from_translation(Vec3::new(0.0, 1.5, 0.0)),
        );
        graph.add_mesh(
            "head_sphere",
            Some(head),
            Transform::default(),
            mesh::uv_sphere(1.0, 32, 32),
            fur,
        );

        for (name, inner_name, x, tilt) in [
            ("left_ear", "left_inner_ear", -0.7_f32, 0.5_f32),
            ("right_ear", "right_inner_ear", 0.7, -0.5),
        ] {
            let ear = graph.add_group(
                name,
                Some(head),
                Transform {
                    translation: Vec3::new(x, 0.8, -0.2),
                    rotation: Vec3::new(0.0, 0.0, tilt),
                    ..Default::default()
                },
            );
            graph.add_mesh(
                "ear_sphere",
                Some(ear),
                Transform::default(),
                mesh::uv_sphere(0.35, 16, 16),
                fur,
            );
            graph.add_mesh(
                inner_name,
                Some(ear),
                Transform::from_translation(Vec3::new(0.0, 0.0, 0.25)),
                mesh::uv_sphere(0.2, 16, 16),
                tan,
            );
        }

        graph.add_mesh(
            "snout",
            Some(head),
            Transform::from_translation(Vec3::new(0.0, -0.15, 0.85)),
            mesh::uv_sphere(0.35, 32, 32),
            tan,
        );
        graph.add_mesh(
            "nose",
            Some(head),
            Transform::from_translation(Vec3::new(0.0, -0.05, 1.15)),
            mesh::uv_sphere(0.12, 16, 16),
            Material::new(hex_color(NOSE_BROWN)).with_roughness(0.2),
        );

        let eyes = graph.add_group(
            "eyes",
            Some(head),
            Transform::from_translation(Vec3::new(0.0, 0.15, 0.9)),
        );
        let eye_material = Material::new(hex_color(EYE_BLACK))
            .with_roughness(0.1)
            .with_metallic(0.5);
        let left_eye = graph.add_mesh(
            "left_eye",
            Some(eyes),
            Transform::from_translation(Vec3::new(-0.3, 0.0, 0.0)),
            mesh::uv_sphere(0.1, 16, 16),
            eye_material,
        );
        let right_eye = graph.add_mesh(
            "right_eye",
            Some(eyes),
            Transform::from_translation(Vec3::new(0.3, 0.0, 0.0)),
            mesh::uv_sphere(0.1, 16, 16),
            eye_material,
        );

        // Both mouth shapes live in the graph; exactly one is visible per
        // frame, giving the instantaneous swap.
        let mouth = graph.add_group(
            "mouth",
            Some(head),
            Transform::from_translation(Vec3::new(0.0, -0.3, 1.15)),
        );
        let mouth_arc = graph.add_mesh(
            "mouth_arc",
            Some(mouth),
            Transform {
                translation: Vec3::new(0.0, 0.05, 0.0),
                rotation: Vec3::new(0.0, 0.0, std::f32::consts::PI),
                ..Default::default()
            },
            mesh::torus(0.1, 0.02, 8, 16, std::f32::consts::PI),
            dark,
        );
        let mouth_dot = graph.add_mesh(
            "mouth_dot",
            Some(mouth),
            Transform {
                scale: Vec3::new(1.0, 0.5, 1.0),
                ..Default::default()
            },
            mesh::uv_sphere(0.03, 8, 8),
            dark,
        );

        let mut rig = Self {
            graph,
            joints: Joints {
                head,
                left_eye,
                right_eye,
                left_arm,
                right_arm,
                mouth_arc,
                mouth_dot,
            },
        };

        rig.apply_pose(&JointPose::default());
        rig
    }

    /// Write the frame's joint state into the animated nodes.
    pub fn apply_pose(&mut self, pose: &JointPose) {
        let joints = self.joints;

        let head = self.graph.node_mut(joints.head);
        head.transform.rotation = Vec3::new(pose.head_pitch, pose.head_yaw, pose.head_roll);
        head.transform.translation.y = pose.head_height;

        self.graph.node_mut(joints.left_eye).transform.scale.y = pose.left_eye_scale_y;
        self.graph.node_mut(joints.right_eye).transform.scale.y = pose.right_eye_scale_y;

        let left_arm = self.graph.node_mut(joints.left_arm);
        left_arm.transform.rotation = Vec3::new(pose.left_arm_swing, 0.0, pose.left_arm_angle);

        let right_arm = self.graph.node_mut(joints.right_arm);
        right_arm.transform.rotation = Vec3::new(pose.right_arm_swing, 0.0, pose.right_arm_angle);

        let show_arc = pose.mouth == MouthShape::Arc;
        self.graph.node_mut(joints.mouth_arc).visible = show_arc;
        self.graph.node_mut(joints.mouth_dot).visible = !show_arc;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::{Mood, PointerInput};

    fn node_index(rig: &BearRig, name: &str) -> usize {
        rig.graph
            .nodes()
            .iter()
            .position(|n| n.name == name)
            .unwrap_or_else(|| panic!("no node named {}", name))
    }

    #[test]
    fn test_rig_has_all_parts() {
        let rig = BearRig::build();
        for name in [
            "root",
            "body",
            "scarf",
            "scarf_tail_panel",
            "left_arm",
            "right_arm",
            "head",
            "left_ear",
            "right_ear",
            "left_inner_ear",
            "right_inner_ear",
            "snout",
            "nose",
            "left_eye",
            "right_eye",
            "mouth_arc",
            "mouth_dot",
        ] {
            let _ = node_index(&rig, name);
        }
    }

    #[test]
    fn test_default_pose_shows_dot_mouth() {
        let rig = BearRig::build();
        let vis = rig.graph.effective_visibility();
        assert!(!vis[rig.joints.mouth_arc]);
        assert!(vis[rig.joints.mouth_dot]);
    }

    #[test]
    fn test_happy_pose_swaps_to_arc_mouth() {
        let mut rig = BearRig::build();
        let mut pose = JointPose::default();
        pose.step(Mood::Happy, 0.0, PointerInput::CENTERED);
        rig.apply_pose(&pose);

        let vis = rig.graph.effective_visibility();
        assert!(vis[rig.joints.mouth_arc]);
        assert!(!vis[rig.joints.mouth_dot]);
    }

    #[test]
    fn test_head_rotation_moves_snout_world_position() {
        let mut rig = BearRig::build();
        let snout = node_index(&rig, "snout");

        let world_before = rig.graph.world_transforms();
        let snout_before = world_before[snout].transform_point3(Vec3::ZERO);

        let pose = JointPose {
            head_yaw: 0.5,
            ..Default::default()
        };
        rig.apply_pose(&pose);

        let world_after = rig.graph.world_transforms();
        let snout_after = world_after[snout].transform_point3(Vec3::ZERO);

        assert!(
            (snout_after - snout_before).length() > 0.1,
            "yawing the head group must carry the snout with it"
        );
    }

    #[test]
    fn test_eye_scale_applied() {
        let mut rig = BearRig::build();
        let pose = JointPose {
            left_eye_scale_y: 0.1,
            right_eye_scale_y: 0.1,
            ..Default::default()
        };
        rig.apply_pose(&pose);

        assert!((rig.graph.node(rig.joints.left_eye).transform.scale.y - 0.1).abs() < 1e-6);
        assert!((rig.graph.node(rig.joints.right_eye).transform.scale.y - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_arm_pivots_mirror_at_rest() {
        let rig = BearRig::build();
        let left = rig.graph.node(rig.joints.left_arm).transform;
        let right = rig.graph.node(rig.joints.right_arm).transform;

        assert!((left.translation.x + right.translation.x).abs() < 1e-6);
        assert!((left.rotation.z + right.rotation.z).abs() < 1e-6);
    }

    #[test]
    fn test_head_height_written_to_translation() {
        let mut rig = BearRig::build();
        let pose = JointPose {
            head_height: 1.52,
            ..Default::default()
        };
        rig.apply_pose(&pose);
        assert!(
            (rig.graph.node(rig.joints.head).transform.translation.y - 1.52).abs() < 1e-6
        );
    }
}
