use slidemark_core::detection::PixelSource;
use slidemark_core::editor::{DrawState, EditorMode};
use slidemark_core::geometry::Point2D;
use slidemark_core::session::SessionCommand;
use slidemark_core::viewport::PointerId;

use crate::app::SlidemarkApp;

/// Pointer id used for the mouse; touches are offset past it.
const MOUSE_POINTER: PointerId = 0;

/// Wheel travel in points that counts as one zoom step.
const POINTS_PER_WHEEL_STEP: f32 = 50.0;

const POLYGON_COLOR: egui::Color32 = egui::Color32::from_rgb(52, 152, 219);
const SELECTED_COLOR: egui::Color32 = egui::Color32::from_rgb(243, 156, 18);
const DRAFT_COLOR: egui::Color32 = egui::Color32::from_rgb(231, 76, 60);

pub fn show(ctx: &egui::Context, app: &mut SlidemarkApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        paint_background(ui, rect);
        report_size(app, rect);

        if app.session.raster().is_none() {
            show_placeholder(ui);
            return;
        }

        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        handle_pointer_events(ui, &response, app, rect);
        handle_keys(ctx, app);

        if response.double_clicked() && app.session.editor().mode() == EditorMode::View {
            app.update_session(SessionCommand::ResetView);
        }

        let painter = ui.painter_at(rect);
        draw_raster(&painter, app, rect.min);
        draw_overlay(&painter, app, rect.min);
        draw_polygons(&painter, app, rect.min);
        draw_draft(&painter, app, rect.min);
        set_cursor(ui, &response, app);
    });
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

fn report_size(app: &mut SlidemarkApp, rect: egui::Rect) {
    let size = rect.size();
    if app.viewport.reported_size != Some(size) {
        app.viewport.reported_size = Some(size);
        app.update_session(SessionCommand::Resize {
            width: size.x as f64,
            height: size.y as f64,
        });
    }
}

fn local(pos: egui::Pos2, origin: egui::Pos2) -> Point2D {
    Point2D::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64)
}

fn handle_pointer_events(
    ui: &egui::Ui,
    response: &egui::Response,
    app: &mut SlidemarkApp,
    rect: egui::Rect,
) {
    let events = ui.input(|i| i.events.clone());
    let hover = ui.input(|i| i.pointer.hover_pos());

    for event in events {
        match event {
            egui::Event::Touch { id, phase, pos, .. } => {
                let pointer = id.0.wrapping_add(1);
                let inside = rect.contains(pos);
                let pos = local(pos, rect.min);
                match phase {
                    egui::TouchPhase::Start if inside => {
                        app.viewport.touches += 1;
                        app.update_session(SessionCommand::PointerDown { id: pointer, pos });
                    }
                    egui::TouchPhase::Start => {}
                    egui::TouchPhase::Move => {
                        app.update_session(SessionCommand::PointerMove { id: pointer, pos });
                    }
                    egui::TouchPhase::End => {
                        app.viewport.touches = app.viewport.touches.saturating_sub(1);
                        app.update_session(SessionCommand::PointerUp { id: pointer, pos });
                    }
                    egui::TouchPhase::Cancel => {
                        app.viewport.touches = 0;
                        app.update_session(SessionCommand::ReleasePointers);
                    }
                }
            }
            // Touch screens also synthesize mouse events for the first finger.
            _ if app.viewport.touches > 0 => {}
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                ..
            } => {
                let local_pos = local(pos, rect.min);
                if pressed && response.hovered() {
                    app.viewport.mouse_down = true;
                    app.update_session(SessionCommand::PointerDown {
                        id: MOUSE_POINTER,
                        pos: local_pos,
                    });
                } else if !pressed && app.viewport.mouse_down {
                    app.viewport.mouse_down = false;
                    app.update_session(SessionCommand::PointerUp {
                        id: MOUSE_POINTER,
                        pos: local_pos,
                    });
                }
            }
            egui::Event::PointerMoved(pos) if app.viewport.mouse_down => {
                app.update_session(SessionCommand::PointerMove {
                    id: MOUSE_POINTER,
                    pos: local(pos, rect.min),
                });
            }
            egui::Event::MouseWheel { unit, delta, .. } if response.hovered() => {
                let steps = match unit {
                    egui::MouseWheelUnit::Point => delta.y / POINTS_PER_WHEEL_STEP,
                    egui::MouseWheelUnit::Line => delta.y,
                    egui::MouseWheelUnit::Page => delta.y * 3.0,
                };
                if let Some(anchor) = hover {
                    app.update_session(SessionCommand::ZoomSteps {
                        steps: steps as f64,
                        anchor: local(anchor, rect.min),
                    });
                }
            }
            egui::Event::Zoom(factor) if response.hovered() => {
                if let Some(anchor) = hover {
                    let zoom = app.session.viewport().zoom();
                    let wheel_step = app.session.config().viewport.wheel_step;
                    app.update_session(SessionCommand::ZoomSteps {
                        steps: zoom * (factor as f64 - 1.0) / wheel_step,
                        anchor: local(anchor, rect.min),
                    });
                }
            }
            egui::Event::WindowFocused(false) | egui::Event::PointerGone => {
                if app.viewport.mouse_down || app.session.active_pointers() > 0 {
                    app.viewport.mouse_down = false;
                    app.update_session(SessionCommand::ReleasePointers);
                }
            }
            _ => {}
        }
    }
}

fn pos_of(p: Point2D, origin: egui::Pos2) -> egui::Pos2 {
    egui::pos2(origin.x + p.x as f32, origin.y + p.y as f32)
}

fn handle_keys(ctx: &egui::Context, app: &mut SlidemarkApp) {
    if ctx.wants_keyboard_input() {
        return;
    }
    if ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
        app.update_session(SessionCommand::CloseDraft);
    }
    if ctx.input(|i| i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace)) {
        app.update_session(SessionCommand::DeleteSelected);
    }
    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.update_session(SessionCommand::SetMode(EditorMode::View));
    }
    if ctx.input(|i| i.key_pressed(egui::Key::D)) {
        app.update_session(SessionCommand::ToggleMode);
    }
}

fn to_screen(app: &SlidemarkApp, p: Point2D, origin: egui::Pos2) -> egui::Pos2 {
    pos_of(app.session.viewport().raster_to_screen(p), origin)
}

fn draw_raster(painter: &egui::Painter, app: &SlidemarkApp, origin: egui::Pos2) {
    let Some(raster) = app.session.raster() else {
        return;
    };
    let Some(texture) = app.viewport.texture.as_ref() else {
        return;
    };
    let min = to_screen(app, Point2D::new(0.0, 0.0), origin);
    let max = to_screen(
        app,
        Point2D::new(raster.width() as f64, raster.height() as f64),
        origin,
    );
    painter.image(
        texture.id(),
        egui::Rect::from_min_max(min, max),
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

fn color32(c: [u8; 4]) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

/// Turn of the edge pair at each vertex keeps one sign.
fn is_convex(points: &[egui::Pos2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0f32;
    for i in 0..n {
        let (a, b, c) = (points[i], points[(i + 1) % n], points[(i + 2) % n]);
        let cross = (b - a).x * (c - b).y - (b - a).y * (c - b).x;
        if cross != 0.0 {
            if sign != 0.0 && cross.signum() != sign {
                return false;
            }
            sign = cross.signum();
        }
    }
    true
}

/// Annotation paths as screen-space vectors, so strokes stay crisp at any
/// zoom. Fills are drawn for convex, hole-free outlines only; egui fills
/// assume convexity.
fn draw_overlay(painter: &egui::Painter, app: &SlidemarkApp, origin: egui::Pos2) {
    let Some(overlay) = app.session.overlay().filter(|_| app.session.overlay_visible()) else {
        return;
    };
    let style = &app.session.config().overlay;
    let stroke = egui::Stroke::new(style.raster_stroke_width, color32(style.stroke));
    let fill = color32(style.fill);
    let clip = painter.clip_rect();

    for path in &overlay.paths {
        let rings: Vec<Vec<egui::Pos2>> = path
            .rings
            .iter()
            .map(|ring| {
                ring.iter()
                    .map(|&p| {
                        let p = overlay.group_transform.map_or(p, |t| t.apply(p));
                        to_screen(app, p, origin)
                    })
                    .collect()
            })
            .collect();
        let visible = rings
            .iter()
            .any(|ring| clip.intersects(egui::Rect::from_points(ring)));
        if !visible {
            continue;
        }
        if let [outer] = rings.as_slice() {
            if is_convex(outer) {
                painter.add(egui::Shape::convex_polygon(outer.clone(), fill, egui::Stroke::NONE));
            }
        }
        for ring in rings {
            painter.add(egui::Shape::closed_line(ring, stroke));
        }
    }
}

fn draw_polygons(painter: &egui::Painter, app: &SlidemarkApp, origin: egui::Pos2) {
    let editor = app.session.editor();
    let selected = editor.selected();
    for polygon in editor.polygons() {
        let points: Vec<egui::Pos2> = polygon
            .points
            .iter()
            .map(|&p| to_screen(app, p, origin))
            .collect();
        let is_selected = selected == Some(polygon.id);
        let color = if is_selected { SELECTED_COLOR } else { POLYGON_COLOR };
        painter.add(egui::Shape::closed_line(points.clone(), egui::Stroke::new(2.0, color)));

        // Handles only on the selected polygon.
        if is_selected && editor.mode() == EditorMode::Draw {
            for p in points {
                painter.circle(p, 5.0, egui::Color32::WHITE, egui::Stroke::new(1.5, color));
            }
        }
    }
}

fn draw_draft(painter: &egui::Painter, app: &SlidemarkApp, origin: egui::Pos2) {
    let editor = app.session.editor();
    let draft = editor.draft();
    if draft.is_empty() {
        return;
    }
    let points: Vec<egui::Pos2> = draft.iter().map(|&p| to_screen(app, p, origin)).collect();
    let stroke = egui::Stroke::new(2.0, DRAFT_COLOR);
    painter.add(egui::Shape::line(points.clone(), stroke));
    for p in &points[1..] {
        painter.circle_filled(*p, 3.5, DRAFT_COLOR);
    }
    // The first point is the close target once the draft can be committed.
    let first_radius = if editor.draw_state() == DrawState::DraftReady {
        app.session.config().viewport.handle_radius as f32
    } else {
        4.0
    };
    painter.circle(points[0], first_radius, egui::Color32::from_white_alpha(160), stroke);
}

fn set_cursor(ui: &egui::Ui, response: &egui::Response, app: &SlidemarkApp) {
    if !response.hovered() {
        return;
    }
    let icon = match (app.session.editor().mode(), app.session.editor().draw_state()) {
        (_, DrawState::DraggingVertex) => egui::CursorIcon::Grabbing,
        (EditorMode::Draw, _) => egui::CursorIcon::Crosshair,
        (EditorMode::View, _) => egui::CursorIcon::Grab,
    };
    ui.ctx().set_cursor_icon(icon);
}

fn show_placeholder(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new("Open a slide raster to begin")
                .size(18.0)
                .color(egui::Color32::from_gray(100)),
        );
    });
}
