// Trajectory viewer.
//
// One window, one canvas: the recording's path with its start, click and walk
// markers drawn over it. A single "Open CSV" picker replaces the recording,
// and a command line covers the rest (segments, clamping, zoom).
//
// When the `debug_ui` feature is disabled (or `cli_only` is enabled), `run`
// becomes a no-op.

#[cfg(all(feature = "debug_ui", not(feature = "cli_only")))]
mod imp {
    use std::path::Path;

    use eframe::egui;

    use crate::canvas::{mark_color, scene_frame};
    use crate::config::{Config, Rgb};
    use crate::desc::{load_segments, Segment};
    use crate::scene::MarkKind;
    use crate::session::{Overlay, Session};

    const HELP: &str = "cmd: open <csv> | segments <json> | clamp on|off | zoom <f32> | reset | help";

    fn color(rgb: Rgb) -> egui::Color32 {
        egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2])
    }

    pub fn run(title: &str, session: Session, segments: Vec<Segment>, config: Config) -> Result<(), String> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size(egui::vec2(1200.0, 800.0)),
            ..Default::default()
        };
        let title_owned = title.to_owned();
        eframe::run_native(
            title,
            options,
            Box::new(move |_cc| Ok(Box::new(TrajectoryViewer::new(&title_owned, session, segments, config)))),
        )
        .map_err(|e| e.to_string())
    }

    struct TrajectoryViewer {
        title: String,

        // Inputs
        session: Session,
        segments: Vec<Segment>,
        config: Config,

        // Derived
        overlay: Option<Overlay>,

        // UI state
        zoom: f32,
        hover_text: String,
        cmd: String,
        status: String,
    }

    impl TrajectoryViewer {
        fn new(title: &str, session: Session, segments: Vec<Segment>, config: Config) -> Self {
            let mut viewer = Self {
                title: title.to_owned(),
                session,
                segments,
                config,
                overlay: None,
                zoom: 1.0,
                hover_text: String::new(),
                cmd: String::new(),
                status: HELP.to_owned(),
            };
            viewer.refresh();
            viewer
        }

        fn refresh(&mut self) {
            if self.session.trajectory().is_none() {
                self.overlay = None;
                return;
            }
            match self.session.overlay(&self.segments, self.config.walk) {
                Ok(overlay) => {
                    let n_markers = overlay.analysis.markers.len();
                    let n_failed = overlay.analysis.failures.len();
                    self.status = if n_failed == 0 {
                        format!("{n_markers} markers")
                    } else {
                        format!("{n_markers} markers, {n_failed} segment(s) skipped")
                    };
                    self.overlay = Some(overlay);
                }
                Err(e) => {
                    self.overlay = None;
                    self.status = e.to_string();
                }
            }
        }

        fn open_csv(&mut self, path: &Path) {
            let loaded = self.session.load_csv_file(path).map(|_| ());
            match loaded {
                Ok(()) => self.refresh(),
                Err(e) => self.status = format!("load failed, previous recording kept: {e}"),
            }
        }

        fn open_segments(&mut self, path: &Path) {
            match load_segments(path) {
                Ok(segments) => {
                    self.segments = segments;
                    self.refresh();
                }
                Err(e) => self.status = e.to_string(),
            }
        }

        fn summary(&self) -> String {
            let Some(traj) = self.session.trajectory() else {
                return "no recording".to_owned();
            };
            let source = self
                .session
                .source()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<memory>".to_owned());
            format!(
                "{source} points={} clicks={} length={:.1} segments={} clamp={}",
                traj.len(),
                traj.click_indices().len(),
                traj.path_length(),
                self.segments.len(),
                self.config.walk.clamp_to_segment,
            )
        }

        fn apply_cmd(&mut self, line: &str) {
            let mut it = line.split_whitespace();
            let Some(cmd) = it.next() else {
                return;
            };
            let rest: Vec<&str> = it.collect();
            let arg = rest.join(" ");

            match cmd {
                "open" => {
                    if arg.is_empty() {
                        self.status = "usage: open <csv>".to_owned();
                    } else {
                        self.open_csv(Path::new(&arg));
                    }
                }
                "segments" => {
                    if arg.is_empty() {
                        self.status = "usage: segments <json>".to_owned();
                    } else {
                        self.open_segments(Path::new(&arg));
                    }
                }
                "clamp" => match arg.as_str() {
                    "on" => {
                        self.config.walk.clamp_to_segment = true;
                        self.refresh();
                    }
                    "off" => {
                        self.config.walk.clamp_to_segment = false;
                        self.refresh();
                    }
                    _ => self.status = "usage: clamp on|off".to_owned(),
                },
                "zoom" => match arg.parse::<f32>() {
                    Ok(z) if z.is_finite() && z > 0.0 => {
                        self.zoom = z;
                        self.status = format!("zoom set to {z}");
                    }
                    _ => self.status = "zoom expects a positive f32, e.g. `zoom 2`".to_owned(),
                },
                "reset" => {
                    self.zoom = 1.0;
                    self.status = "reset".to_owned();
                }
                "help" => self.status = HELP.to_owned(),
                _ => self.status = format!("unknown cmd: {cmd} (try `help`)"),
            }
        }

        fn handle_hotkeys(&mut self, ctx: &egui::Context) {
            if ctx.wants_keyboard_input() {
                return;
            }
            let step = ctx.input(|i| {
                if i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals) {
                    Some(1.25)
                } else if i.key_pressed(egui::Key::Minus) {
                    Some(0.8)
                } else {
                    None
                }
            });
            if let Some(step) = step {
                self.zoom = (self.zoom * step).clamp(0.05, 100.0);
            }
        }

        fn canvas_ui(&mut self, ui: &mut egui::Ui) {
            let Some(overlay) = &self.overlay else {
                ui.label("No recording loaded. Use \"Open CSV\" or `open <path>`.");
                return;
            };
            let style = &self.config.render;
            let scene = &overlay.scene;
            let frame = scene_frame(scene, style);

            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::hover());
            let rect = response.rect;
            let (span_w, span_h) = frame.extent();
            let fit = (rect.width() / span_w.max(1.0) as f32).min(rect.height() / span_h.max(1.0) as f32);
            let scale = (fit * self.zoom).max(f32::EPSILON);
            let (ox, oy) = (frame.origin_x as f32, frame.origin_y as f32);
            let to_screen = |x: i32, y: i32| {
                egui::pos2(
                    rect.left() + (x as f32 - ox + 0.5) * scale,
                    rect.top() + (y as f32 - oy + 0.5) * scale,
                )
            };

            painter.rect_filled(rect, 0.0, color(style.background));

            let pts: Vec<egui::Pos2> = scene.path.iter().map(|&(x, y)| to_screen(x, y)).collect();
            if pts.len() >= 2 {
                let stroke = egui::Stroke::new(style.line_width, color(style.path_color));
                painter.add(egui::Shape::line(pts, stroke));
            }

            for mark in &scene.marks {
                let r = match mark.kind {
                    MarkKind::Start => style.marker_radius + 1.0,
                    _ => style.marker_radius,
                };
                painter.circle_filled(to_screen(mark.x, mark.y), r.max(1.0), color(mark_color(mark.kind, style)));
            }

            let hovered = response.hover_pos().and_then(|pos| {
                let x = (pos.x - rect.left()) / scale + ox - 0.5;
                let y = (pos.y - rect.top()) / scale + oy - 0.5;
                scene.nearest_index(x, y)
            });

            if let Some(i) = hovered {
                let (x, y) = scene.path[i];
                painter.circle_stroke(
                    to_screen(x, y),
                    style.marker_radius + 3.0,
                    egui::Stroke::new(1.0, egui::Color32::GRAY),
                );
                let ts = self
                    .session
                    .trajectory()
                    .and_then(|t| t.timestamp(i))
                    .unwrap_or("");
                self.hover_text = format!("i={i} x={x} y={y} t={ts}");
            }
        }
    }

    impl eframe::App for TrajectoryViewer {
        fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
            self.handle_hotkeys(ctx);

            egui::TopBottomPanel::top("top").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(&self.title);
                    ui.separator();
                    if ui.button("Open CSV").clicked() {
                        if let Some(path) = rfd::FileDialog::new().add_filter("CSV", &["csv"]).pick_file() {
                            self.open_csv(&path);
                        }
                    }
                    ui.separator();
                    ui.monospace(self.summary());
                    if !self.hover_text.is_empty() {
                        ui.separator();
                        ui.monospace(&self.hover_text);
                    }
                });
            });

            egui::TopBottomPanel::bottom("bottom").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.monospace("cmd>");
                    let resp = ui.add(
                        egui::TextEdit::singleline(&mut self.cmd)
                            .desired_width(f32::INFINITY)
                            .hint_text("open rec.csv | segments seg.json | clamp on | zoom 2"),
                    );

                    if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        let line = self.cmd.trim().to_owned();
                        self.cmd.clear();
                        self.apply_cmd(&line);
                    }
                });
                ui.monospace(&self.status);
                if let Some(overlay) = &self.overlay {
                    for failure in &overlay.analysis.failures {
                        ui.monospace(format!("segment {}: {}", failure.segment_i, failure.error));
                    }
                }
                ui.monospace("hotkeys: +/- zoom");
            });

            egui::CentralPanel::default().show(ctx, |ui| self.canvas_ui(ui));
        }
    }
}

/// No-op implementation when debug_ui feature is disabled or cli_only is enabled.
#[cfg(not(all(feature = "debug_ui", not(feature = "cli_only"))))]
mod imp {
    use crate::config::Config;
    use crate::desc::Segment;
    use crate::session::Session;

    pub fn run(_title: &str, _session: Session, _segments: Vec<Segment>, _config: Config) -> Result<(), String> {
        tracing::info!("built without the debug viewer");
        Ok(())
    }
}

pub use imp::*;
