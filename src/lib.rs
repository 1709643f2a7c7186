//! Kuma3d - Interactive 3D bear avatar
//!
//! A small desktop toy that:
//! - Renders a cartoon bear built entirely from procedural primitives
//! - Offers three moods (idle, happy, sleepy) selected from the UI
//! - Tracks the pointer with the bear's head
//! - Blends every pose change smoothly, frame by frame
//!
//! The rendering path goes egui -> offscreen wgpu pass -> blit, with the
//! scene graph posed on the CPU each frame.

pub mod avatar;
pub mod config;
pub mod error;
pub mod scene;
pub mod ui;

pub use config::Config;
pub use error::{KumaError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
