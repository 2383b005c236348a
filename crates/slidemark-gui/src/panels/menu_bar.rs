use slidemark_core::session::SessionCommand;

use crate::app::SlidemarkApp;
use crate::panels::{open_annotations, open_raster};

pub fn show(ctx: &egui::Context, app: &mut SlidemarkApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui.add(egui::Button::new("Open Raster...").shortcut_text(ctx.format_shortcut(&open_shortcut))).clicked() {
                    ui.close();
                    open_raster(app);
                }

                if ui.button("Open Annotations...").clicked() {
                    ui.close();
                    open_annotations(app);
                }

                ui.separator();

                let export_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
                let can_export = app.session.raster().is_some();
                if ui
                    .add_enabled(can_export, egui::Button::new("Export Polygons...").shortcut_text(ctx.format_shortcut(&export_shortcut)))
                    .clicked()
                {
                    ui.close();
                    app.export();
                }

                ui.separator();

                let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui.add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut))).clicked() {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                let toggle_enabled = app.session.overlay_toggle_enabled() && app.session.overlay().is_some();
                let label = if app.session.overlay_visible() { "Hide Overlay" } else { "Show Overlay" };
                if ui.add_enabled(toggle_enabled, egui::Button::new(label)).clicked() {
                    ui.close();
                    app.update_session(SessionCommand::ToggleOverlay);
                }
                if ui.button("Reset View").clicked() {
                    ui.close();
                    app.update_session(SessionCommand::ResetView);
                }
            });

            if !app.session.config().samples.is_empty() {
                ui.menu_button("Samples", |ui| {
                    let mut picked = None;
                    for entry in &app.session.config().samples {
                        if ui.button(&entry.title).clicked() {
                            picked = Some(entry.clone());
                        }
                    }
                    if let Some(entry) = picked {
                        ui.close();
                        app.session.set_slug(entry.slug.clone());
                        app.ui_state.export_title = entry.title.clone();
                        app.send_command(crate::messages::WorkerCommand::LoadSample { entry });
                    }
                });
            }

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.show_about = true;
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O))) {
            open_raster(app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S))) {
            app.export();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}
