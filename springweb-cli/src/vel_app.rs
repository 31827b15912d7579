//! Interactive viewer for springweb scenes
//!
//! Shows a side-on projection of the web and reloads the scene whenever the
//! file changes on disk.

use eframe::egui;
use glam::DVec3;
use notify::{Event, RecommendedWatcher, Watcher};
use springweb_core::{build_simulation_context_from_source, format_runtime_error, SimulationContext};
use std::path::PathBuf;
use std::sync::mpsc;

/// Visual Evaluation Loop application
pub struct VelApp {
    source_path: PathBuf,
    source_text: String,
    ctx_opt: Option<SimulationContext>,
    last_load_error: Option<String>,
    warnings: Vec<String>,
    playing: bool,
    speed_multiplier: f32,
    /// Rotation of the camera about the vertical axis, in degrees.
    yaw_degrees: f32,
    /// World-space bounds of the projected scene, captured on load.
    view: ViewBounds,
    #[allow(dead_code)] // Kept alive to maintain file watching
    file_watcher: Option<RecommendedWatcher>,
    file_receiver: mpsc::Receiver<notify::Result<Event>>,
    needs_reload: bool,
}

#[derive(Debug, Clone, Copy)]
struct ViewBounds {
    min: egui::Pos2,
    max: egui::Pos2,
}

impl Default for ViewBounds {
    fn default() -> Self {
        Self {
            min: egui::pos2(-10.0, -1.0),
            max: egui::pos2(10.0, 10.0),
        }
    }
}

/// Project onto the screen plane after turning the camera by `yaw` radians.
/// The result is in world units with y up.
fn project(pos: DVec3, yaw: f64) -> egui::Pos2 {
    let (sin, cos) = yaw.sin_cos();
    egui::pos2((pos.x * cos + pos.z * sin) as f32, pos.y as f32)
}

impl VelApp {
    pub fn new(source_path: PathBuf, _cc: &eframe::CreationContext<'_>) -> Self {
        let source_text = std::fs::read_to_string(&source_path)
            .unwrap_or_else(|e| format!("# error reading file: {}", e));

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .ok();

        if let Some(ref mut w) = watcher {
            if let Err(e) = w.watch(&source_path, notify::RecursiveMode::NonRecursive) {
                ftlog::warn!("not watching {}: {}", source_path.display(), e);
            }
        }

        let mut app = Self {
            source_path,
            source_text,
            ctx_opt: None,
            last_load_error: None,
            warnings: Vec::new(),
            playing: false,
            speed_multiplier: 1.0,
            yaw_degrees: 0.0,
            view: ViewBounds::default(),
            file_watcher: watcher,
            file_receiver: rx,
            needs_reload: false,
        };

        app.reload_context();

        app
    }

    fn reload_context(&mut self) {
        match build_simulation_context_from_source(&self.source_text) {
            Ok((ctx, diagnostics)) => {
                self.warnings = diagnostics.iter().map(|d| d.to_string()).collect();
                ftlog::info!(
                    "viewer loaded {} ({} diagnostics)",
                    self.source_path.display(),
                    self.warnings.len()
                );
                self.ctx_opt = Some(ctx);
                self.last_load_error = None;
                self.fit_view();
            }
            Err(e) => {
                let report = e.render(&self.source_text);
                ftlog::warn!("viewer could not load {}: {}", self.source_path.display(), report);
                self.last_load_error = Some(report);
                self.ctx_opt = None;
                self.playing = false;
            }
        }
    }

    /// Frame the current scene with a margin, keeping the ground in view.
    fn fit_view(&mut self) {
        let Some(ctx) = &self.ctx_opt else {
            return;
        };
        let yaw = f64::from(self.yaw_degrees).to_radians();
        let mut min = egui::pos2(f32::INFINITY, 0.0);
        let mut max = egui::pos2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for (_, p) in ctx.scene.sim.particles() {
            let q = project(p.pos, yaw);
            min = min.min(q);
            max = max.max(q);
        }
        if !(min.x.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            self.view = ViewBounds::default();
            return;
        }
        let margin = ((max.x - min.x).max(max.y - min.y) * 0.15).max(1.0);
        self.view = ViewBounds {
            min: min - egui::vec2(margin, margin),
            max: max + egui::vec2(margin, margin),
        };
    }

    fn check_file_changes(&mut self) {
        while let Ok(event) = self.file_receiver.try_recv() {
            match event {
                Ok(Event {
                    kind: notify::EventKind::Modify(_),
                    paths,
                    ..
                }) => {
                    if paths.iter().any(|p| p.ends_with(&self.source_path) || *p == self.source_path) {
                        if let Ok(new_text) = std::fs::read_to_string(&self.source_path) {
                            self.source_text = new_text;
                            self.needs_reload = true;
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    ftlog::warn!("file watcher error: {}", e);
                }
            }
        }

        if self.needs_reload {
            self.reload_context();
            self.needs_reload = false;
        }
    }

    fn advance(&mut self, frame_dt: f64) {
        let Some(ref mut ctx) = self.ctx_opt else {
            return;
        };
        if let Err(e) = ctx.advance_frame(frame_dt) {
            self.last_load_error = Some(format_runtime_error(&e));
            self.playing = false;
        }
    }

    fn draw_scene(&self, ui: &egui::Ui, rect: egui::Rect) {
        let Some(ref ctx) = self.ctx_opt else {
            return;
        };
        let painter = ui.painter_at(rect);
        let sim = &ctx.scene.sim;
        let yaw = f64::from(self.yaw_degrees).to_radians();

        let view = self.view;
        let span = view.max - view.min;
        let scale = (rect.width() / span.x).min(rect.height() / span.y) * 0.95;
        let mid = view.min + span * 0.5;
        let to_screen = |world: egui::Pos2| {
            rect.center() + egui::vec2((world.x - mid.x) * scale, -(world.y - mid.y) * scale)
        };

        // Ground line
        let ground_y = to_screen(egui::pos2(0.0, 0.0)).y;
        painter.line_segment(
            [egui::pos2(rect.left(), ground_y), egui::pos2(rect.right(), ground_y)],
            egui::Stroke::new(1.0, egui::Color32::DARK_GREEN),
        );

        let strands = ctx.scene.breaker.as_ref();
        for (id, spring) in sim.springs() {
            let (Some(pi), Some(pj)) = (sim.particle(spring.particle_i), sim.particle(spring.particle_j)) else {
                continue;
            };
            let color = if strands.is_some_and(|b| b.is_strand(id)) {
                egui::Color32::LIGHT_RED
            } else {
                egui::Color32::GRAY
            };
            painter.line_segment(
                [to_screen(project(pi.pos, yaw)), to_screen(project(pj.pos, yaw))],
                egui::Stroke::new(1.0, color),
            );
        }

        let projectiles = ctx.scene.sticky.as_ref().map(|s| s.projectiles()).unwrap_or(&[]);
        for (id, particle) in sim.particles() {
            let screen_pos = to_screen(project(particle.pos, yaw));
            let anchored = ctx.scene.anchors.iter().any(|(a, _)| *a == id);
            let (radius, color) = if projectiles.contains(&id) {
                (5.0, egui::Color32::GOLD)
            } else if anchored {
                (3.0, egui::Color32::WHITE)
            } else {
                (2.5, egui::Color32::LIGHT_BLUE)
            };
            painter.circle_filled(screen_pos, radius, color);
        }
    }
}

impl eframe::App for VelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_file_changes();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(if self.playing { "⏸ Pause" } else { "▶ Play" }).clicked() {
                    self.playing = !self.playing;
                }

                if ui.button("⏮ Reset").clicked() {
                    self.reload_context();
                    self.playing = false;
                }

                if ui.button("⏭ Step").clicked() {
                    self.advance(1.0 / 60.0);
                }

                ui.separator();

                ui.label("Speed:");
                ui.add(egui::Slider::new(&mut self.speed_multiplier, 0.1..=4.0));

                ui.label("Yaw:");
                if ui
                    .add(egui::Slider::new(&mut self.yaw_degrees, -180.0..=180.0).suffix("°"))
                    .changed()
                {
                    self.fit_view();
                }

                ui.separator();

                if let Some(ref sim_ctx) = self.ctx_opt {
                    let stats = sim_ctx.last_stats;
                    ui.label(format!(
                        "t = {:.3} s | frame {} | {} sub-steps | {} particles | {} springs",
                        sim_ctx.driver.sim_time(),
                        sim_ctx.driver.frames(),
                        stats.sub_steps,
                        sim_ctx.scene.sim.particle_count(),
                        sim_ctx.scene.sim.spring_count()
                    ));
                }
            });
        });

        if self.last_load_error.is_some() || !self.warnings.is_empty() {
            egui::TopBottomPanel::bottom("errors").show(ctx, |ui| {
                ui.set_max_height(100.0);
                if let Some(ref error) = self.last_load_error {
                    ui.label(egui::RichText::new(format!("Error: {}", error)).color(egui::Color32::RED));
                }
                for warning in &self.warnings {
                    ui.label(egui::RichText::new(warning).color(egui::Color32::YELLOW));
                }
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.max_rect();
            self.draw_scene(ui, rect);
        });

        if self.playing {
            let frame_dt = ctx.input(|i| i.stable_dt) * self.speed_multiplier;
            self.advance(f64::from(frame_dt));
            ctx.request_repaint();
        }
    }
}
