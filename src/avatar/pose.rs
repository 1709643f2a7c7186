//! Per-frame pose resolution and blending.
//!
//! `PoseTargets::resolve` maps a mood to its target pose parameters.
//! `JointPose` holds the continuous joint state that persists across frames
//! and is blended toward the targets once per rendered frame. The mouth is
//! the one discrete exception: it swaps shape instantly with the mood.

use kuma3d_motion::{blend, Oscillator};

use super::Mood;

/// Blend factor for head and arm joints.
pub const HEAD_ARM_ALPHA: f32 = 0.1;
/// Blend factor for eye scale (eyes react faster).
pub const EYE_ALPHA: f32 = 0.2;

/// Resting head height above the body root.
pub const HEAD_REST_HEIGHT: f32 = 1.5;
/// Resting arm angles when not happy (left is mirrored).
pub const ARM_REST_ANGLE: f32 = 0.5;

/// Head pitch gain applied to the vertical pointer coordinate.
const POINTER_PITCH_GAIN: f32 = 0.2;
/// Head yaw gain applied to the horizontal pointer coordinate.
const POINTER_YAW_GAIN: f32 = 0.5;

/// Breathing: small vertical oscillation of the head group.
const BREATHE: Oscillator = Oscillator {
    frequency: 2.0,
    amplitude: 0.02,
    phase: 0.0,
};
/// Left arm secondary swing (sine).
const LEFT_SWING: Oscillator = Oscillator {
    frequency: 3.0,
    amplitude: 0.05,
    phase: 0.0,
};
/// Right arm secondary swing (cosine, for visual asymmetry).
const RIGHT_SWING: Oscillator = Oscillator {
    frequency: 3.0,
    amplitude: 0.05,
    phase: std::f32::consts::FRAC_PI_2,
};

/// Normalized pointer coordinates in [-1, 1] on both axes, y up-positive.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    pub x: f32,
    pub y: f32,
}

impl PointerInput {
    /// Centered pointer, used when no pointer input is available.
    pub const CENTERED: Self = Self { x: 0.0, y: 0.0 };
}

/// Mood-derived pose parameters, recomputed from scratch every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseTargets {
    pub head_pitch: f32,
    pub head_roll: f32,
    pub eye_scale_y: f32,
    pub arm_angle: f32,
}

impl PoseTargets {
    /// Resolve the target pose for a mood.
    pub fn resolve(mood: Mood) -> Self {
        match mood {
            Mood::Idle => Self {
                head_pitch: 0.0,
                head_roll: 0.0,
                eye_scale_y: 1.0,
                arm_angle: 0.5,
            },
            Mood::Happy => Self {
                head_pitch: 0.0,
                head_roll: 0.2,
                eye_scale_y: 0.5,
                arm_angle: 2.5,
            },
            Mood::Sleepy => Self {
                head_pitch: 0.4,
                head_roll: 0.1,
                eye_scale_y: 0.1,
                arm_angle: 0.2,
            },
        }
    }
}

/// Head pitch target: mood pitch plus pointer-driven nod.
pub fn head_pitch_target(mood: Mood, pointer: PointerInput) -> f32 {
    PoseTargets::resolve(mood).head_pitch + pointer.y * POINTER_PITCH_GAIN
}

/// Head yaw target: purely pointer-driven, no mood component.
pub fn head_yaw_target(pointer: PointerInput) -> f32 {
    pointer.x * POINTER_YAW_GAIN
}

/// Left arm target: raised (negated shared angle) when happy, resting otherwise.
pub fn left_arm_target(mood: Mood) -> f32 {
    if mood == Mood::Happy {
        -PoseTargets::resolve(mood).arm_angle
    } else {
        -ARM_REST_ANGLE
    }
}

/// Right arm target: mirror of the left.
pub fn right_arm_target(mood: Mood) -> f32 {
    if mood == Mood::Happy {
        PoseTargets::resolve(mood).arm_angle
    } else {
        ARM_REST_ANGLE
    }
}

/// Which mouth mesh is visible. Swaps instantly with the mood; never blended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouthShape {
    /// Upward-curved arc (smile).
    Arc,
    /// Small flattened dot.
    Dot,
}

impl MouthShape {
    pub fn for_mood(mood: Mood) -> Self {
        match mood {
            Mood::Happy => Self::Arc,
            Mood::Idle | Mood::Sleepy => Self::Dot,
        }
    }
}

/// Continuous joint state. Each field is the blend result of the previous
/// frame and feeds the next frame's blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointPose {
    pub head_pitch: f32,
    pub head_yaw: f32,
    pub head_roll: f32,
    pub head_height: f32,
    pub left_eye_scale_y: f32,
    pub right_eye_scale_y: f32,
    pub left_arm_angle: f32,
    pub left_arm_swing: f32,
    pub right_arm_angle: f32,
    pub right_arm_swing: f32,
    pub mouth: MouthShape,
}

impl Default for JointPose {
    fn default() -> Self {
        Self {
            head_pitch: 0.0,
            head_yaw: 0.0,
            head_roll: 0.0,
            head_height: HEAD_REST_HEIGHT,
            left_eye_scale_y: 1.0,
            right_eye_scale_y: 1.0,
            left_arm_angle: -ARM_REST_ANGLE,
            left_arm_swing: 0.0,
            right_arm_angle: ARM_REST_ANGLE,
            right_arm_swing: 0.0,
            mouth: MouthShape::Dot,
        }
    }
}

impl JointPose {
    /// Advance the pose one frame.
    ///
    /// `time` is elapsed wall-clock seconds since start, `pointer` the
    /// normalized pointer position. Every continuous parameter is blended
    /// toward its target; the mouth shape is swapped discretely.
    pub fn step(&mut self, mood: Mood, time: f32, pointer: PointerInput) {
        let targets = PoseTargets::resolve(mood);

        self.head_pitch = blend(
            self.head_pitch,
            head_pitch_target(mood, pointer),
            HEAD_ARM_ALPHA,
        );
        self.head_yaw = blend(self.head_yaw, head_yaw_target(pointer), HEAD_ARM_ALPHA);
        self.head_roll = blend(self.head_roll, targets.head_roll, HEAD_ARM_ALPHA);
        self.head_height = blend(
            self.head_height,
            HEAD_REST_HEIGHT + BREATHE.sample(time),
            HEAD_ARM_ALPHA,
        );

        self.left_eye_scale_y = blend(self.left_eye_scale_y, targets.eye_scale_y, EYE_ALPHA);
        self.right_eye_scale_y = blend(self.right_eye_scale_y, targets.eye_scale_y, EYE_ALPHA);

        self.left_arm_angle = blend(self.left_arm_angle, left_arm_target(mood), HEAD_ARM_ALPHA);
        self.left_arm_swing = blend(self.left_arm_swing, LEFT_SWING.sample(time), HEAD_ARM_ALPHA);
        self.right_arm_angle = blend(self.right_arm_angle, right_arm_target(mood), HEAD_ARM_ALPHA);
        self.right_arm_swing =
            blend(self.right_arm_swing, RIGHT_SWING.sample(time), HEAD_ARM_ALPHA);

        self.mouth = MouthShape::for_mood(mood);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn test_resolve_targets_table() {
        let idle = PoseTargets::resolve(Mood::Idle);
        assert_eq!(idle.head_pitch, 0.0);
        assert_eq!(idle.head_roll, 0.0);
        assert_eq!(idle.eye_scale_y, 1.0);
        assert_eq!(idle.arm_angle, 0.5);

        let happy = PoseTargets::resolve(Mood::Happy);
        assert_eq!(happy.head_pitch, 0.0);
        assert_eq!(happy.head_roll, 0.2);
        assert_eq!(happy.eye_scale_y, 0.5);
        assert_eq!(happy.arm_angle, 2.5);

        let sleepy = PoseTargets::resolve(Mood::Sleepy);
        assert_eq!(sleepy.head_pitch, 0.4);
        assert_eq!(sleepy.head_roll, 0.1);
        assert_eq!(sleepy.eye_scale_y, 0.1);
        assert_eq!(sleepy.arm_angle, 0.2);
    }

    #[test]
    fn test_unrecognized_mood_name_yields_idle_row() {
        let mood = Mood::from_name("bewildered");
        assert_eq!(PoseTargets::resolve(mood), PoseTargets::resolve(Mood::Idle));
    }

    #[test]
    fn test_mouth_shape_pure_function_of_mood() {
        assert_eq!(MouthShape::for_mood(Mood::Happy), MouthShape::Arc);
        assert_eq!(MouthShape::for_mood(Mood::Idle), MouthShape::Dot);
        assert_eq!(MouthShape::for_mood(Mood::Sleepy), MouthShape::Dot);
    }

    #[test]
    fn test_mouth_swaps_on_very_next_frame() {
        let mut pose = JointPose::default();
        pose.step(Mood::Idle, 0.0, PointerInput::CENTERED);
        assert_eq!(pose.mouth, MouthShape::Dot);

        // One frame after the mood switch the mouth is already an arc,
        // with no intermediate shape.
        pose.step(Mood::Happy, 0.016, PointerInput::CENTERED);
        assert_eq!(pose.mouth, MouthShape::Arc);

        pose.step(Mood::Sleepy, 0.033, PointerInput::CENTERED);
        assert_eq!(pose.mouth, MouthShape::Dot);
    }

    #[test]
    fn test_arm_asymmetry_happy() {
        assert!((left_arm_target(Mood::Happy) - (-2.5)).abs() < EPS);
        assert!((right_arm_target(Mood::Happy) - 2.5).abs() < EPS);
    }

    #[test]
    fn test_arm_rest_ignores_mood_arm_angle() {
        // The IDLE row carries armAngle = 0.5 and SLEEPY 0.2, but non-happy
        // moods always rest at the fixed -0.5 / +0.5.
        for mood in [Mood::Idle, Mood::Sleepy] {
            assert!((left_arm_target(mood) - (-0.5)).abs() < EPS, "{:?}", mood);
            assert!((right_arm_target(mood) - 0.5).abs() < EPS, "{:?}", mood);
        }
    }

    #[test]
    fn test_head_yaw_only_responds_to_pointer_x() {
        let pointer = PointerInput { x: 0.8, y: -0.6 };
        let expected = 0.8 * 0.5;

        assert!((head_yaw_target(pointer) - expected).abs() < EPS);

        // y must not leak into yaw
        let moved_y = PointerInput { x: 0.8, y: 0.9 };
        assert!((head_yaw_target(moved_y) - expected).abs() < EPS);
    }

    #[test]
    fn test_head_pitch_combines_mood_and_pointer_y() {
        let pointer = PointerInput { x: 0.3, y: 0.5 };
        let expected_idle = 0.0 + 0.5 * 0.2;
        let expected_sleepy = 0.4 + 0.5 * 0.2;

        assert!((head_pitch_target(Mood::Idle, pointer) - expected_idle).abs() < EPS);
        assert!((head_pitch_target(Mood::Sleepy, pointer) - expected_sleepy).abs() < EPS);
    }

    #[test]
    fn test_pose_settles_idle_then_happy() {
        let mut pose = JointPose {
            head_pitch: 0.3,
            head_yaw: -0.2,
            left_eye_scale_y: 0.4,
            right_eye_scale_y: 0.4,
            left_arm_angle: 1.0,
            right_arm_angle: -1.0,
            ..Default::default()
        };

        // Time frozen at 0 so the breathing/swing oscillators stay at their
        // t=0 samples and the settle values are exact.
        for _ in 0..400 {
            pose.step(Mood::Idle, 0.0, PointerInput::CENTERED);
        }

        assert!(pose.head_pitch.abs() < 1e-5);
        assert!(pose.head_yaw.abs() < 1e-5);
        assert!((pose.left_eye_scale_y - 1.0).abs() < 1e-5);
        assert!((pose.right_eye_scale_y - 1.0).abs() < 1e-5);
        assert!((pose.left_arm_angle - (-0.5)).abs() < 1e-5);
        assert!((pose.right_arm_angle - 0.5).abs() < 1e-5);
        assert_eq!(pose.mouth, MouthShape::Dot);

        for _ in 0..400 {
            pose.step(Mood::Happy, 0.0, PointerInput::CENTERED);
        }

        assert!((pose.head_roll - 0.2).abs() < 1e-5);
        assert!((pose.left_eye_scale_y - 0.5).abs() < 1e-5);
        assert!((pose.right_eye_scale_y - 0.5).abs() < 1e-5);
        assert!((pose.left_arm_angle - (-2.5)).abs() < 1e-5);
        assert!((pose.right_arm_angle - 2.5).abs() < 1e-5);
        assert_eq!(pose.mouth, MouthShape::Arc);
    }

    #[test]
    fn test_head_height_breathes_around_rest() {
        let mut pose = JointPose::default();

        // Sample across a few breathing periods; the blended height must stay
        // inside the rest height +/- oscillation amplitude.
        for i in 0..600 {
            let t = i as f32 / 60.0;
            pose.step(Mood::Idle, t, PointerInput::CENTERED);
            assert!(
                (pose.head_height - HEAD_REST_HEIGHT).abs() <= 0.02 + 1e-4,
                "head height out of breathing envelope at t={}: {}",
                t,
                pose.head_height
            );
        }
    }

    #[test]
    fn test_eyes_move_together() {
        let mut pose = JointPose::default();
        for i in 0..100 {
            pose.step(Mood::Sleepy, i as f32 / 60.0, PointerInput::CENTERED);
            assert!(
                (pose.left_eye_scale_y - pose.right_eye_scale_y).abs() < EPS,
                "eyes share the same target and alpha, so they stay in sync"
            );
        }
    }

    #[test]
    fn test_arm_swing_phase_differs_left_right() {
        let mut pose = JointPose::default();
        // At t where sin and cos differ, the blended swings must diverge.
        for _ in 0..200 {
            pose.step(Mood::Idle, 0.4, PointerInput::CENTERED);
        }
        assert!(
            (pose.left_arm_swing - pose.right_arm_swing).abs() > 1e-4,
            "left (sine) and right (cosine) swings should be out of phase"
        );
    }
}
