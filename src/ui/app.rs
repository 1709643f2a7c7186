//! Main egui application: the bear viewport and mood selector.

use std::sync::Arc;
use std::time::Instant;

use eframe::egui;

use crate::avatar::{JointPose, Mood, PointerInput};
use crate::config::Config;
use crate::scene::BearRig;

use super::camera::OrbitCamera;
use super::renderer::SceneRenderer;
use super::viewport::SceneViewportCallback;

/// Accent color for a mood's selector button.
fn mood_accent(mood: Mood) -> egui::Color32 {
    match mood {
        Mood::Idle => egui::Color32::from_rgb(0x3B, 0x82, 0xF6),
        Mood::Happy => egui::Color32::from_rgb(0xF5, 0x9E, 0x0B),
        Mood::Sleepy => egui::Color32::from_rgb(0x63, 0x66, 0xF1),
    }
}

/// The native egui application window.
pub struct KumaApp {
    config: Config,
    /// The single piece of interaction state everything else derives from.
    mood: Mood,
    rig: BearRig,
    pose: JointPose,
    camera: OrbitCamera,
    /// GPU renderer (created from the wgpu render state)
    renderer: Option<Arc<SceneRenderer>>,
    /// Last pointer position over the viewport, normalized to [-1, 1].
    /// Persists when the pointer leaves so the head holds its aim.
    pointer: PointerInput,
    /// Start time for the animation clock
    start_time: Instant,
    /// Error message if GPU init failed
    init_error: Option<String>,
}

impl KumaApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, mood: Mood) -> Self {
        let rig = BearRig::build();
        let camera = OrbitCamera::new(&config.camera);
        let start_time = Instant::now();

        let (renderer, init_error) = match cc.wgpu_render_state.as_ref() {
            Some(render_state) => {
                let renderer = SceneRenderer::new(
                    &render_state.device,
                    &render_state.queue,
                    render_state.target_format,
                    &rig,
                    config.window.width,
                    config.window.height,
                );
                (Some(Arc::new(renderer)), None)
            }
            None => (None, Some("wgpu render state not available".to_string())),
        };

        if let Some(ref err) = init_error {
            tracing::error!("{}", err);
        }

        Self {
            config,
            mood,
            rig,
            pose: JointPose::default(),
            camera,
            renderer,
            pointer: PointerInput::CENTERED,
            start_time,
            init_error,
        }
    }

    /// Launch the native UI window. Blocks until the window is closed.
    pub fn run(config: Config, mood: Mood) -> eframe::Result {
        let size = [
            config.window.width as f32,
            config.window.height as f32,
        ];
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title("kuma3d")
                .with_inner_size(size),
            ..Default::default()
        };

        eframe::run_native(
            "kuma3d",
            options,
            Box::new(move |cc| Ok(Box::new(Self::new(cc, config, mood)))),
        )
    }

    fn set_mood(&mut self, mood: Mood) {
        if mood != self.mood {
            tracing::info!("Mood changed: {} -> {}", self.mood.as_str(), mood.as_str());
            self.mood = mood;
        }
    }

    /// Advance the animation one frame and push the posed scene to the GPU.
    fn step_animation(&mut self) {
        let time = self.start_time.elapsed().as_secs_f32();
        self.pose.step(self.mood, time, self.pointer);
        self.rig.apply_pose(&self.pose);

        if let Some(renderer) = &self.renderer {
            renderer.set_frame(
                self.rig.graph.world_transforms(),
                self.rig.graph.effective_visibility(),
                self.camera.view_matrix(),
                self.camera.eye(),
            );
        }
    }

    fn mood_selector(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for mood in Mood::ALL {
                let selected = mood == self.mood;
                let accent = mood_accent(mood);
                let fill = if selected {
                    accent
                } else {
                    accent.gamma_multiply(0.25)
                };

                let button = egui::Button::new(
                    egui::RichText::new(mood.label()).color(egui::Color32::WHITE),
                )
                .fill(fill)
                .corner_radius(6.0)
                .min_size(egui::vec2(80.0, 28.0));

                if ui.add(button).clicked() {
                    self.set_mood(mood);
                }
            }
        });
    }

    fn viewport(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let renderer = match &self.renderer {
            Some(r) => r.clone(),
            None => {
                if let Some(ref err) = self.init_error {
                    ui.colored_label(egui::Color32::RED, err);
                }
                return;
            }
        };

        let available_size = ui.available_size();
        let (rect, response) =
            ui.allocate_exact_size(available_size, egui::Sense::click_and_drag());

        // Head tracking: pointer position normalized to [-1, 1] over the
        // viewport, with +y pointing up. The last value persists when the
        // pointer leaves the window.
        if let Some(pos) = response.hover_pos() {
            let half = rect.size() * 0.5;
            self.pointer = PointerInput {
                x: ((pos.x - rect.center().x) / half.x).clamp(-1.0, 1.0),
                y: (-(pos.y - rect.center().y) / half.y).clamp(-1.0, 1.0),
            };
        }

        // Orbit and zoom
        if response.dragged() {
            let delta = response.drag_delta();
            self.camera.rotate(delta.x, delta.y);
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                self.camera.zoom(scroll);
            }
        }

        let ppp = ctx.pixels_per_point();
        let vp_width = (available_size.x * ppp) as u32;
        let vp_height = (available_size.y * ppp) as u32;

        ui.painter().add(eframe::egui_wgpu::Callback::new_paint_callback(
            rect,
            SceneViewportCallback {
                renderer,
                viewport_width: vp_width.max(1),
                viewport_height: vp_height.max(1),
            },
        ));

        if self.config.ui.show_hints {
            let painter = ui.painter();
            painter.text(
                rect.left_top() + egui::vec2(12.0, 10.0),
                egui::Align2::LEFT_TOP,
                "kuma3d — interactive procedural bear",
                egui::FontId::proportional(16.0),
                egui::Color32::from_rgb(0x33, 0x41, 0x55),
            );
            painter.text(
                rect.left_top() + egui::vec2(12.0, 32.0),
                egui::Align2::LEFT_TOP,
                "drag to rotate — the head follows the pointer",
                egui::FontId::proportional(12.0),
                egui::Color32::from_rgb(0x64, 0x74, 0x8B),
            );
        }
    }
}

impl eframe::App for KumaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.step_animation();

        egui::TopBottomPanel::bottom("mood_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label("Mood:");
                self.mood_selector(ui);
            });
            ui.add_space(6.0);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport(ui, ctx);
            });

        // Repaint continuously; the blend animation never settles fully
        ctx.request_repaint();
    }
}
