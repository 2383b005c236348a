use slidemark_core::session::StatusLevel;

use crate::app::SlidemarkApp;

pub fn show(ctx: &egui::Context, app: &mut SlidemarkApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        if app.ui_state.is_busy() {
            ui.add(egui::ProgressBar::new(0.0).text("Working...").animate(true));
        } else {
            ui.add(egui::ProgressBar::new(0.0).text(""));
        }

        // Log area, fixed height for 4 lines.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui_state.log_messages.is_empty() {
                    for _ in 0..4 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui_state.log_messages {
                        ui.label(msg);
                    }
                }
            });

        ui.horizontal(|ui| {
            if let Some(raster) = app.session.raster() {
                use slidemark_core::detection::PixelSource;
                ui.label(format!("{}x{}", raster.width(), raster.height()));
                ui.separator();
            }
            let snapshot = app.session.viewport_snapshot();
            ui.label(format!("Zoom: {:.0}%", snapshot.zoom * 100.0));
            ui.separator();
            ui.label(format!("Mode: {}", app.session.editor().mode()));
            ui.separator();
            ui.label(format!("Mapping: {}", app.session.mapping()));
            if let Some(status) = app.session.status() {
                ui.separator();
                let color = match status.level {
                    StatusLevel::Info => ui.visuals().text_color(),
                    StatusLevel::Error => ui.visuals().error_fg_color,
                };
                ui.colored_label(color, &status.text);
            }
        });

        ui.add_space(2.0);
    });
}
