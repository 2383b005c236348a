use std::path::PathBuf;
use std::sync::mpsc;

use slidemark_core::config::SlidemarkConfig;
use slidemark_core::session::{SessionCommand, ViewerSession};
use tracing::warn;

use crate::convert::texture_image;
use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::states::{UIState, ViewportState};
use crate::worker;

/// Config from an explicit path, else `<config dir>/slidemark/config.toml`,
/// else defaults.
pub fn load_app_config(explicit: Option<PathBuf>) -> SlidemarkConfig {
    let path = explicit.or_else(|| {
        dirs::config_dir()
            .map(|d| d.join("slidemark").join("config.toml"))
            .filter(|p| p.is_file())
    });
    match path {
        Some(path) => SlidemarkConfig::load(&path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Config unreadable, using defaults");
            SlidemarkConfig::default()
        }),
        None => SlidemarkConfig::default(),
    }
}

pub struct SlidemarkApp {
    pub cmd_tx: mpsc::Sender<WorkerCommand>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub session: ViewerSession,
    pub ui_state: UIState,
    pub viewport: ViewportState,
    pub show_about: bool,
}

impl SlidemarkApp {
    pub fn new(ctx: &egui::Context, config: SlidemarkConfig) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = worker::spawn_worker(result_tx, ctx.clone());
        let ui_state = UIState {
            export_title: config.export.title.clone(),
            ..Default::default()
        };

        Self {
            cmd_tx,
            result_rx,
            session: ViewerSession::new(config),
            ui_state,
            viewport: ViewportState::default(),
            show_about: false,
        }
    }

    /// Drain all pending results from the worker.
    fn poll_results(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::RasterLoaded { label, result } => {
                    self.ui_state.finish_request();
                    let ok = result.is_ok();
                    self.session.load_raster(result);
                    if ok {
                        self.ui_state.raster_label = Some(label);
                        self.refresh_textures(ctx);
                    }
                    self.log_status();
                }
                WorkerResult::AnnotationsLoaded { location, result, extent } => {
                    self.ui_state.finish_request();
                    self.ui_state.annotation_location = location;
                    self.session.load_annotations(result, extent);
                    self.log_status();
                }
                WorkerResult::ExportPersisted { result } => {
                    self.ui_state.finish_request();
                    match result {
                        Ok(outcome) => {
                            self.ui_state.add_log(outcome.to_string());
                            self.ui_state.last_export = Some(outcome.path().to_path_buf());
                        }
                        Err(e) => self.ui_state.add_log(format!("ERROR: {e}")),
                    }
                }
                WorkerResult::Started { label } => {
                    self.ui_state.pending += 1;
                    self.ui_state.add_log(label);
                }
                WorkerResult::Log { message } => {
                    self.ui_state.add_log(message);
                }
            }
        }
    }

    fn log_status(&mut self) {
        if let Some(status) = self.session.status() {
            let text = status.text.clone();
            self.ui_state.add_log(text);
        }
    }

    fn refresh_textures(&mut self, ctx: &egui::Context) {
        let Some(raster) = self.session.raster() else {
            self.viewport.texture = None;
            return;
        };
        let max_side = ctx.input(|i| i.max_texture_side);
        match texture_image(raster, max_side) {
            Ok(image) => {
                self.viewport.texture =
                    Some(ctx.load_texture("raster", image, egui::TextureOptions::LINEAR));
            }
            Err(e) => {
                warn!(error = %e, "Raster texture upload failed");
                self.ui_state.add_log(format!("ERROR: {e}"));
                self.viewport.texture = None;
            }
        }
    }

    pub fn send_command(&self, cmd: WorkerCommand) {
        let _ = self.cmd_tx.send(cmd);
    }

    pub fn update_session(&mut self, cmd: SessionCommand) {
        self.session.update(cmd);
    }

    /// Serialize the user's polygons and ask for a destination folder. A
    /// dismissed dialog falls back to the download folder.
    pub fn export(&mut self) {
        let title = self.ui_state.export_title.trim();
        let title = (!title.is_empty()).then(|| title.to_string());
        let payload = match self.session.export(title.as_deref()) {
            Ok(p) => p,
            Err(e) => {
                self.ui_state.add_log(format!("ERROR: {e}"));
                return;
            }
        };
        let bytes = match payload.to_bytes() {
            Ok(b) => b,
            Err(e) => {
                self.ui_state.add_log(format!("ERROR: {e}"));
                return;
            }
        };
        let cmd_tx = self.cmd_tx.clone();
        let file_name = payload.file_name;
        std::thread::spawn(move || {
            let granted = rfd::FileDialog::new()
                .set_title("Choose export folder")
                .pick_folder();
            let _ = cmd_tx.send(WorkerCommand::PersistExport {
                granted,
                file_name,
                bytes,
            });
        });
    }
}

impl eframe::App for SlidemarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results(ctx);

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::controls::show(ctx, self);
        panels::viewport::show(ctx, self);

        if self.show_about {
            egui::Window::new("About Slidemark")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Slidemark");
                        ui.label("Slide annotation viewer");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }

    fn on_exit(&mut self) {
        self.session.close();
    }
}
