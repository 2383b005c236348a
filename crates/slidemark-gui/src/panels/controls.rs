use slidemark_core::editor::{DrawState, EditorMode};
use slidemark_core::session::SessionCommand;

use crate::app::SlidemarkApp;
use crate::messages::WorkerCommand;
use crate::panels::{open_annotations, open_raster, section_header};

const LEFT_PANEL_WIDTH: f32 = 260.0;

pub fn show(ctx: &egui::Context, app: &mut SlidemarkApp) {
    egui::SidePanel::left("controls")
        .default_width(LEFT_PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_min_width(LEFT_PANEL_WIDTH - 20.0);

                file_section(ui, app);
                ui.separator();
                overlay_section(ui, app);
                ui.separator();
                editor_section(ui, app);
                ui.separator();
                view_section(ui, app);
                ui.separator();
                export_section(ui, app);
            });
        });
}

fn file_section(ui: &mut egui::Ui, app: &mut SlidemarkApp) {
    let status = app.ui_state.raster_label.clone();
    section_header(ui, "Slide", status.as_deref());
    ui.add_space(4.0);

    if ui.button("Open Raster...").clicked() {
        open_raster(app);
    }

    ui.add_space(4.0);
    ui.label("Annotations (path or URL):");
    ui.text_edit_singleline(&mut app.ui_state.annotation_location);
    ui.horizontal(|ui| {
        let location = app.ui_state.annotation_location.trim().to_string();
        if ui.add_enabled(!location.is_empty(), egui::Button::new("Load")).clicked() {
            let extent = app.ui_state.source_extent();
            app.send_command(WorkerCommand::LoadAnnotations { location, extent });
        }
        if ui.button("Browse...").clicked() {
            open_annotations(app);
        }
    });

    ui.add_space(4.0);
    ui.label("Annotation extent (blank = register):");
    ui.horizontal(|ui| {
        ui.add(egui::TextEdit::singleline(&mut app.ui_state.source_width).desired_width(70.0).hint_text("width"));
        ui.label("x");
        ui.add(egui::TextEdit::singleline(&mut app.ui_state.source_height).desired_width(70.0).hint_text("height"));
    });
}

fn overlay_section(ui: &mut egui::Ui, app: &mut SlidemarkApp) {
    let status = app.session.overlay().map(|o| format!("{} paths", o.paths.len()));
    section_header(ui, "Overlay", status.as_deref());
    ui.add_space(4.0);

    let enabled = app.session.overlay_toggle_enabled() && app.session.overlay().is_some();
    let mut visible = app.session.overlay_visible();
    if ui.add_enabled(enabled, egui::Checkbox::new(&mut visible, "Show overlay")).changed() {
        app.update_session(SessionCommand::ToggleOverlay);
    }

    if let Some(reg) = app.session.registration() {
        ui.small(format!(
            "Registered: score {:.3}, {} candidates, {} evaluations",
            reg.score.score, reg.candidates, reg.evaluations
        ));
        if reg.fallback_region {
            ui.small("No tissue found; fitted to full raster");
        }
    }
}

fn editor_section(ui: &mut egui::Ui, app: &mut SlidemarkApp) {
    let editor = app.session.editor();
    let mode = editor.mode();
    let status = match editor.draw_state() {
        DrawState::Idle => None,
        DrawState::Drafting => Some(format!("draft: {} pts", editor.draft().len())),
        DrawState::DraftReady => Some("draft ready".to_string()),
        DrawState::DraggingVertex => Some("dragging".to_string()),
    };
    section_header(ui, "Polygons", status.as_deref());
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        for target in [EditorMode::View, EditorMode::Draw] {
            if ui.selectable_label(mode == target, target.to_string()).clicked() && mode != target {
                app.update_session(SessionCommand::SetMode(target));
            }
        }
    });

    let has_draft = !app.session.editor().draft().is_empty();
    let has_selection = app.session.editor().selected().is_some() && mode == EditorMode::Draw;
    ui.horizontal(|ui| {
        if ui.add_enabled(has_draft, egui::Button::new("Close Draft")).clicked() {
            app.update_session(SessionCommand::CloseDraft);
        }
        if ui.add_enabled(has_selection, egui::Button::new("Delete")).clicked() {
            app.update_session(SessionCommand::DeleteSelected);
        }
    });

    let selected = app.session.editor().selected();
    let rows: Vec<(u64, usize)> = app
        .session
        .editor()
        .polygons()
        .iter()
        .map(|p| (p.id, p.points.len()))
        .collect();
    for (id, count) in rows {
        let is_selected = selected == Some(id);
        if ui
            .selectable_label(is_selected, format!("Polygon {id} ({count} vertices)"))
            .clicked()
        {
            let next = if is_selected { None } else { Some(id) };
            app.update_session(SessionCommand::SelectPolygon(next));
        }
    }
}

fn view_section(ui: &mut egui::Ui, app: &mut SlidemarkApp) {
    section_header(ui, "View", None);
    ui.add_space(4.0);

    let limits = &app.session.config().viewport;
    let (min, max) = (limits.min_zoom, limits.max_zoom);
    let mut zoom = app.session.viewport().zoom();
    let loaded = app.session.raster().is_some();
    if ui
        .add_enabled(loaded, egui::Slider::new(&mut zoom, min..=max).text("Zoom"))
        .changed()
    {
        app.update_session(SessionCommand::SetZoom(zoom));
    }
    if ui.add_enabled(loaded, egui::Button::new("Reset View")).clicked() {
        app.update_session(SessionCommand::ResetView);
    }
}

fn export_section(ui: &mut egui::Ui, app: &mut SlidemarkApp) {
    section_header(ui, "Export", None);
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        ui.label("Title:");
        ui.text_edit_singleline(&mut app.ui_state.export_title);
    });
    if ui
        .add_enabled(app.session.raster().is_some(), egui::Button::new("Export Polygons..."))
        .clicked()
    {
        app.export();
    }
    if let Some(path) = &app.ui_state.last_export {
        ui.small(format!("Last: {}", path.display()));
    }
}
