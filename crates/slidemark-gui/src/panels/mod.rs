pub mod controls;
pub mod menu_bar;
pub mod status;
pub mod viewport;

pub(crate) fn section_header(ui: &mut egui::Ui, label: &str, status: Option<&str>) {
    ui.horizontal(|ui| {
        ui.strong(label);
        if let Some(s) = status {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.small(s);
            });
        }
    });
}

pub(crate) fn open_raster(app: &crate::app::SlidemarkApp) {
    let cmd_tx = app.cmd_tx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "webp"])
            .add_filter("All files", &["*"])
            .pick_file()
        {
            let _ = cmd_tx.send(crate::messages::WorkerCommand::LoadRaster { path });
        }
    });
}

pub(crate) fn open_annotations(app: &crate::app::SlidemarkApp) {
    let cmd_tx = app.cmd_tx.clone();
    let extent = app.ui_state.source_extent();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("GeoJSON", &["geojson", "json"])
            .add_filter("All files", &["*"])
            .pick_file()
        {
            let _ = cmd_tx.send(crate::messages::WorkerCommand::LoadAnnotations {
                location: path.display().to_string(),
                extent,
            });
        }
    });
}
