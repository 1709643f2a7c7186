//! Avatar mood and posing.
//!
//! The mood is the single piece of application state: a closed three-way
//! enumeration owned by the UI shell. Everything else in this module is
//! derived from it per frame.

pub mod pose;

pub use pose::{JointPose, MouthShape, PointerInput, PoseTargets};

/// The avatar's discrete emotional state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mood {
    #[default]
    Idle,
    Happy,
    Sleepy,
}

impl Mood {
    pub const ALL: [Mood; 3] = [Mood::Idle, Mood::Happy, Mood::Sleepy];

    /// Parse a mood name from config or CLI. Unrecognized names fall back
    /// to `Idle`; inside the process the enum is closed, so this is the
    /// only place the fallback is reachable.
    pub fn from_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "happy" => Self::Happy,
            "sleepy" => Self::Sleepy,
            _ => Self::Idle,
        }
    }

    /// Button label for the mood selector.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Happy => "Happy",
            Self::Sleepy => "Sleepy",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Happy => "happy",
            Self::Sleepy => "sleepy",
        }
    }
}
