use slidemark_core::editor::{
    AnnotationEditor, DrawState, EditorCommand, EditorEvent, EditorMode, VertexHandle,
};
use slidemark_core::error::SlidemarkError;
use slidemark_core::geometry::Point2D;

fn drawing_editor() -> AnnotationEditor {
    let mut editor = AnnotationEditor::new();
    editor.set_mode(EditorMode::Draw);
    editor
}

fn draft(editor: &mut AnnotationEditor, points: &[(f64, f64)]) {
    for &(x, y) in points {
        editor.apply(EditorCommand::AddPoint(Point2D::new(x, y))).unwrap();
    }
}

// ---------------------------------------------------------------------------
// Closing drafts
// ---------------------------------------------------------------------------

#[test]
fn test_close_with_two_points_is_rejected() {
    let mut editor = drawing_editor();
    draft(&mut editor, &[(0.0, 0.0), (10.0, 0.0)]);

    let result = editor.apply(EditorCommand::CloseDraft);
    assert!(matches!(result, Err(SlidemarkError::InsufficientPoints { count: 2 })));
    assert_eq!(editor.draft().len(), 2);
    assert!(editor.polygons().is_empty());
    assert_eq!(editor.draw_state(), DrawState::Drafting);
}

#[test]
fn test_close_with_three_collinear_points_succeeds() {
    let mut editor = drawing_editor();
    draft(&mut editor, &[(0.0, 0.0), (5.0, 5.0), (10.0, 10.0)]);
    assert_eq!(editor.draw_state(), DrawState::DraftReady);

    let event = editor.apply(EditorCommand::CloseDraft).unwrap();
    assert_eq!(event, EditorEvent::Committed(1));
    assert_eq!(editor.polygons().len(), 1);
    assert_eq!(editor.polygons()[0].points.len(), 3);
    assert_eq!(editor.selected(), Some(1));
    assert!(editor.draft().is_empty());
    assert_eq!(editor.draw_state(), DrawState::Idle);
}

#[test]
fn test_polygon_ids_are_unique_and_increasing() {
    let mut editor = drawing_editor();
    let square = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)];
    draft(&mut editor, &square);
    let first = editor.close_draft().unwrap();
    editor.delete_selected().unwrap();
    draft(&mut editor, &square);
    let second = editor.close_draft().unwrap();
    assert!(second > first);
}

// ---------------------------------------------------------------------------
// Selection and deletion
// ---------------------------------------------------------------------------

#[test]
fn test_delete_without_selection_reports_error() {
    let mut editor = drawing_editor();
    let result = editor.apply(EditorCommand::DeleteSelected);
    assert!(matches!(result, Err(SlidemarkError::NothingSelected)));
}

#[test]
fn test_delete_removes_selected_polygon() {
    let mut editor = drawing_editor();
    draft(&mut editor, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
    let id = editor.close_draft().unwrap();
    assert_eq!(editor.apply(EditorCommand::DeleteSelected).unwrap(), EditorEvent::Deleted(id));
    assert!(editor.polygons().is_empty());
    assert_eq!(editor.selected(), None);
}

#[test]
fn test_select_unknown_polygon_fails() {
    let mut editor = drawing_editor();
    let result = editor.apply(EditorCommand::SelectPolygon(Some(42)));
    assert!(matches!(result, Err(SlidemarkError::UnknownPolygon(42))));
    assert!(editor.apply(EditorCommand::SelectPolygon(None)).is_ok());
}

#[test]
fn test_hit_test_prefers_topmost_polygon() {
    let mut editor = drawing_editor();
    draft(&mut editor, &[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
    let below = editor.close_draft().unwrap();
    draft(&mut editor, &[(40.0, 40.0), (60.0, 40.0), (60.0, 60.0), (40.0, 60.0)]);
    let above = editor.close_draft().unwrap();

    assert_eq!(editor.hit_test(&Point2D::new(50.0, 50.0)), Some(above));
    assert_eq!(editor.hit_test(&Point2D::new(10.0, 10.0)), Some(below));
    assert_eq!(editor.hit_test(&Point2D::new(150.0, 10.0)), None);
}

// ---------------------------------------------------------------------------
// Taps
// ---------------------------------------------------------------------------

#[test]
fn test_tap_on_first_point_closes_ready_draft() {
    let mut editor = drawing_editor();
    for p in [(0.0, 0.0), (20.0, 0.0), (20.0, 20.0)] {
        editor.tap(Point2D::new(p.0, p.1), 2.0).unwrap();
    }
    let event = editor.tap(Point2D::new(1.0, 1.0), 2.0).unwrap();
    assert!(matches!(event, EditorEvent::Committed(_)));
    assert_eq!(editor.polygons()[0].points.len(), 3);
}

#[test]
fn test_tap_near_first_point_of_short_draft_appends() {
    let mut editor = drawing_editor();
    editor.tap(Point2D::new(0.0, 0.0), 2.0).unwrap();
    editor.tap(Point2D::new(20.0, 0.0), 2.0).unwrap();
    let event = editor.tap(Point2D::new(0.5, 0.5), 2.0).unwrap();
    assert_eq!(event, EditorEvent::PointAdded { count: 3 });
    assert!(editor.polygons().is_empty());
}

#[test]
fn test_tap_inside_polygon_selects_it() {
    let mut editor = drawing_editor();
    draft(&mut editor, &[(0.0, 0.0), (50.0, 0.0), (50.0, 50.0), (0.0, 50.0)]);
    let id = editor.close_draft().unwrap();
    editor.select(None).unwrap();

    let event = editor.tap(Point2D::new(25.0, 25.0), 2.0).unwrap();
    assert_eq!(event, EditorEvent::Selected(Some(id)));
    assert!(editor.draft().is_empty());

    // Outside any polygon a tap starts a new draft.
    let event = editor.tap(Point2D::new(80.0, 80.0), 2.0).unwrap();
    assert_eq!(event, EditorEvent::PointAdded { count: 1 });
}

#[test]
fn test_view_mode_ignores_edits() {
    let mut editor = AnnotationEditor::new();
    assert_eq!(editor.mode(), EditorMode::View);
    let event = editor.apply(EditorCommand::AddPoint(Point2D::new(1.0, 1.0))).unwrap();
    assert_eq!(event, EditorEvent::Ignored);
    assert_eq!(editor.tap(Point2D::new(1.0, 1.0), 2.0).unwrap(), EditorEvent::Ignored);
    assert!(editor.draft().is_empty());
}

#[test]
fn test_view_mode_ignores_close_and_delete() {
    let mut editor = drawing_editor();
    draft(&mut editor, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
    let id = editor.close_draft().unwrap();
    draft(&mut editor, &[(20.0, 20.0), (30.0, 20.0), (30.0, 30.0)]);
    editor.set_mode(EditorMode::View);
    assert_eq!(editor.selected(), Some(id));

    let event = editor.apply(EditorCommand::DeleteSelected).unwrap();
    assert_eq!(event, EditorEvent::Ignored);
    assert_eq!(editor.polygons().len(), 1);
    assert_eq!(editor.selected(), Some(id));

    let event = editor.apply(EditorCommand::CloseDraft).unwrap();
    assert_eq!(event, EditorEvent::Ignored);
    assert_eq!(editor.polygons().len(), 1);

    // Selection stays available for inspection.
    assert_eq!(
        editor.apply(EditorCommand::SelectPolygon(None)).unwrap(),
        EditorEvent::Selected(None)
    );
}

// ---------------------------------------------------------------------------
// Mode toggle
// ---------------------------------------------------------------------------

#[test]
fn test_mode_toggle_clears_draft_and_drag() {
    let mut editor = drawing_editor();
    draft(&mut editor, &[(0.0, 0.0), (50.0, 0.0), (50.0, 50.0)]);
    let id = editor.close_draft().unwrap();
    draft(&mut editor, &[(70.0, 70.0)]);
    assert!(editor.begin_vertex_drag(7, VertexHandle { polygon: id, index: 0 }));

    let event = editor.apply(EditorCommand::ToggleMode).unwrap();
    assert_eq!(event, EditorEvent::ModeChanged(EditorMode::View));
    assert!(editor.draft().is_empty());
    assert_eq!(editor.dragging_pointer(), None);
    assert_eq!(editor.polygons().len(), 1);
}

// ---------------------------------------------------------------------------
// Vertex dragging
// ---------------------------------------------------------------------------

#[test]
fn test_vertex_drag_moves_only_bound_pointer() {
    let mut editor = drawing_editor();
    draft(&mut editor, &[(0.0, 0.0), (50.0, 0.0), (50.0, 50.0)]);
    let id = editor.close_draft().unwrap();

    let handle = editor.handle_at(&Point2D::new(49.0, 1.0), 3.0).unwrap();
    assert_eq!(handle, VertexHandle { polygon: id, index: 1 });
    assert!(editor.begin_vertex_drag(3, handle));
    assert_eq!(editor.draw_state(), DrawState::DraggingVertex);

    assert!(!editor.drag_vertex(4, Point2D::new(99.0, 99.0)));
    assert!(editor.drag_vertex(3, Point2D::new(60.0, 5.0)));
    assert_eq!(editor.polygons()[0].points[1], Point2D::new(60.0, 5.0));

    assert!(!editor.end_vertex_drag(4));
    assert!(editor.end_vertex_drag(3));
    assert_eq!(editor.draw_state(), DrawState::Idle);
}

#[test]
fn test_handles_exist_only_on_selected_polygon() {
    let mut editor = drawing_editor();
    draft(&mut editor, &[(0.0, 0.0), (50.0, 0.0), (50.0, 50.0)]);
    editor.close_draft().unwrap();
    editor.select(None).unwrap();
    assert!(editor.handle_at(&Point2D::new(0.0, 0.0), 3.0).is_none());
}
