//! Native UI: the egui shell, orbit camera, and wgpu scene renderer.

pub mod app;
pub mod camera;
pub mod renderer;
pub mod viewport;

pub use app::KumaApp;
pub use camera::OrbitCamera;
pub use renderer::SceneRenderer;
