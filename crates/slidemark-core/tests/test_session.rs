mod common;

use slidemark_core::config::SlidemarkConfig;
use slidemark_core::editor::EditorMode;
use slidemark_core::error::SlidemarkError;
use slidemark_core::geometry::{CoordinateMapping, Point2D, SourceExtent};
use slidemark_core::io::geojson::FeatureCollection;
use slidemark_core::session::{SessionCommand, StatusLevel, ViewerSession};

use common::{raster_with_tissue, square_grid, white_raster};

fn fast_config() -> SlidemarkConfig {
    let mut config = SlidemarkConfig::default();
    config.solver.scale_multipliers = vec![0.85, 1.0, 1.15];
    config
}

/// 400x400 raster in a 400x400 viewport: screen and raster pixels coincide.
fn session_with_raster() -> ViewerSession {
    let mut session = ViewerSession::new(fast_config());
    session.update(SessionCommand::Resize {
        width: 400.0,
        height: 400.0,
    });
    session.load_raster(Ok(white_raster(400, 400)));
    session
}

fn tap(session: &mut ViewerSession, id: u64, x: f64, y: f64) {
    let pos = Point2D::new(x, y);
    session.update(SessionCommand::PointerDown { id, pos });
    session.update(SessionCommand::PointerUp { id, pos });
}

fn extent(width: f64, height: f64) -> Option<SourceExtent> {
    Some(SourceExtent { width, height })
}

// ---------------------------------------------------------------------------
// Independence
// ---------------------------------------------------------------------------

#[test]
fn test_two_sessions_are_independent() {
    let mut a = session_with_raster();
    let mut b = session_with_raster();

    a.update(SessionCommand::SetMode(EditorMode::Draw));
    a.update(SessionCommand::AddPoint(Point2D::new(1.0, 1.0)));
    a.update(SessionCommand::SetZoom(3.0));

    assert_eq!(a.editor().draft().len(), 1);
    assert!(b.editor().draft().is_empty());
    assert_eq!(b.editor().mode(), EditorMode::View);
    assert_eq!(b.viewport_snapshot().zoom, 1.0);

    b.update(SessionCommand::SetMode(EditorMode::Draw));
    for p in [(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)] {
        b.update(SessionCommand::AddPoint(Point2D::new(p.0, p.1)));
    }
    b.update(SessionCommand::CloseDraft);
    assert_eq!(b.editor().polygons().len(), 1);
    assert!(a.editor().polygons().is_empty());
    assert_eq!(a.viewport_snapshot().zoom, 3.0);
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn test_failed_fetch_keeps_overlay_hidden_and_toggle_enabled() {
    let mut session = session_with_raster();
    session.load_annotations(Err(SlidemarkError::Fetch("HTTP 404".into())), None);

    assert!(session.annotations().is_none());
    assert!(!session.overlay_visible());
    assert!(session.overlay_toggle_enabled());
    let status = session.status().unwrap();
    assert_eq!(status.level, StatusLevel::Error);
    assert!(status.text.contains("404"));
}

#[test]
fn test_failed_fetch_leaves_previous_annotations() {
    let mut session = session_with_raster();
    session.load_annotations(Ok(square_grid(2, 2, 50.0, 10.0)), extent(400.0, 400.0));
    assert_eq!(session.overlay().unwrap().paths.len(), 4);

    session.load_annotations(Err(SlidemarkError::Fetch("offline".into())), None);
    assert_eq!(session.annotations().unwrap().features.len(), 4);
    assert_eq!(session.overlay().unwrap().paths.len(), 4);
}

#[test]
fn test_failed_decode_keeps_previous_raster() {
    let mut session = session_with_raster();
    session.load_raster(Err(SlidemarkError::Decode("truncated".into())));
    assert_eq!(session.raster().unwrap().data.dim(), (400, 400, 4));
    assert_eq!(session.status().unwrap().level, StatusLevel::Error);
}

#[test]
fn test_declared_extent_skips_registration() {
    let mut session = ViewerSession::new(fast_config());
    session.load_annotations(Ok(square_grid(3, 3, 100.0, 20.0)), extent(800.0, 600.0));
    assert!(session.overlay().is_none());

    session.load_raster(Ok(white_raster(400, 300)));
    assert!(session.registration().is_none());
    match session.mapping() {
        CoordinateMapping::Ratio(r) => {
            assert_eq!(r.x, 0.5);
            assert_eq!(r.y, 0.5);
        }
        other => panic!("expected ratio mapping, got {}", other),
    }
    let overlay = session.overlay().unwrap();
    assert_eq!(overlay.paths.len(), 9);
    assert!(overlay.group_transform.is_none());
    assert!(session.overlay_visible());
}

#[test]
fn test_registration_runs_without_declared_extent() {
    let mut session = ViewerSession::new(fast_config());
    session.load_raster(Ok(raster_with_tissue(200, 160, 40, 30, 160, 130)));
    session.load_annotations(Ok(square_grid(12, 10, 20.0, 6.0)), None);

    let registration = session.registration().unwrap();
    assert!(!registration.fallback_region);
    assert!(matches!(session.mapping(), CoordinateMapping::Affine(_)));
    assert_eq!(session.overlay().unwrap().group_transform, Some(registration.transform));
}

#[test]
fn test_failed_registration_clears_previous_mapping() {
    let mut session = ViewerSession::new(fast_config());
    session.load_raster(Ok(raster_with_tissue(200, 160, 40, 30, 160, 130)));
    session.load_annotations(Ok(square_grid(12, 10, 20.0, 6.0)), None);
    assert!(session.registration().is_some());

    session.load_annotations(Ok(FeatureCollection::default()), None);
    assert!(session.registration().is_none());
    assert_eq!(session.mapping(), CoordinateMapping::Identity);
    assert!(session.overlay().is_none());
    assert!(!session.overlay_visible());
    assert!(session.overlay_toggle_enabled());
    assert_eq!(session.status().unwrap().level, StatusLevel::Error);
}

#[test]
fn test_failed_registration_after_ratio_resets_to_identity() {
    let mut session = session_with_raster();
    session.load_annotations(Ok(square_grid(2, 2, 50.0, 10.0)), extent(4000.0, 4000.0));
    assert!(matches!(session.mapping(), CoordinateMapping::Ratio(_)));

    session.load_annotations(Ok(FeatureCollection::default()), None);
    assert_eq!(session.mapping(), CoordinateMapping::Identity);
    assert!(session.overlay().is_none());
}

#[test]
fn test_toggle_overlay() {
    let mut session = session_with_raster();
    session.update(SessionCommand::ToggleOverlay);
    assert!(!session.overlay_visible());

    session.load_annotations(Ok(square_grid(1, 1, 10.0, 10.0)), extent(400.0, 400.0));
    assert!(session.overlay_visible());
    session.update(SessionCommand::ToggleOverlay);
    assert!(!session.overlay_visible());
    session.update(SessionCommand::ToggleOverlay);
    assert!(session.overlay_visible());
}

// ---------------------------------------------------------------------------
// Pointer input
// ---------------------------------------------------------------------------

#[test]
fn test_taps_draft_and_close_polygon() {
    let mut session = session_with_raster();
    session.update(SessionCommand::SetMode(EditorMode::Draw));
    tap(&mut session, 1, 100.0, 100.0);
    tap(&mut session, 1, 200.0, 100.0);
    tap(&mut session, 1, 200.0, 200.0);
    assert_eq!(session.editor().draft().len(), 3);
    assert_eq!(session.editor().draft()[1], Point2D::new(200.0, 100.0));

    // Back on the first point closes the ring.
    tap(&mut session, 1, 102.0, 101.0);
    assert_eq!(session.editor().polygons().len(), 1);
    assert!(session.editor().draft().is_empty());
}

#[test]
fn test_tap_jitter_within_slop_still_adds_point() {
    let mut session = session_with_raster();
    session.update(SessionCommand::SetMode(EditorMode::Draw));
    session.update(SessionCommand::PointerDown { id: 1, pos: Point2D::new(100.0, 100.0) });
    session.update(SessionCommand::PointerMove { id: 1, pos: Point2D::new(102.0, 100.0) });
    session.update(SessionCommand::PointerUp { id: 1, pos: Point2D::new(102.0, 100.0) });
    assert_eq!(session.editor().draft(), &[Point2D::new(100.0, 100.0)]);
}

#[test]
fn test_drag_in_draw_mode_pans_without_adding_points() {
    let mut session = session_with_raster();
    session.update(SessionCommand::SetZoom(2.0));
    session.update(SessionCommand::SetMode(EditorMode::Draw));
    let before = session.viewport_snapshot().pan_x;

    session.update(SessionCommand::PointerDown { id: 1, pos: Point2D::new(200.0, 200.0) });
    session.update(SessionCommand::PointerMove { id: 1, pos: Point2D::new(230.0, 200.0) });
    session.update(SessionCommand::PointerUp { id: 1, pos: Point2D::new(230.0, 200.0) });

    assert!(session.editor().draft().is_empty());
    assert_eq!(session.viewport_snapshot().pan_x, before + 30.0);
}

#[test]
fn test_view_mode_drag_pans() {
    let mut session = session_with_raster();
    session.update(SessionCommand::SetZoom(2.0));
    let before = session.viewport_snapshot();

    session.update(SessionCommand::PointerDown { id: 1, pos: Point2D::new(200.0, 200.0) });
    session.update(SessionCommand::PointerMove { id: 1, pos: Point2D::new(190.0, 180.0) });
    session.update(SessionCommand::PointerUp { id: 1, pos: Point2D::new(190.0, 180.0) });

    let after = session.viewport_snapshot();
    assert_eq!(after.pan_x, before.pan_x - 10.0);
    assert_eq!(after.pan_y, before.pan_y - 20.0);
    assert!(session.editor().draft().is_empty());
}

#[test]
fn test_pinch_zooms_viewport() {
    let mut session = session_with_raster();
    session.update(SessionCommand::PointerDown { id: 1, pos: Point2D::new(100.0, 200.0) });
    session.update(SessionCommand::PointerDown { id: 2, pos: Point2D::new(300.0, 200.0) });
    session.update(SessionCommand::PointerMove { id: 2, pos: Point2D::new(500.0, 200.0) });
    assert!((session.viewport_snapshot().zoom - 2.0).abs() < 1e-9);
}

#[test]
fn test_pointer_drags_selected_vertex() {
    let mut session = session_with_raster();
    session.update(SessionCommand::SetMode(EditorMode::Draw));
    for p in [(100.0, 100.0), (200.0, 100.0), (200.0, 200.0)] {
        session.update(SessionCommand::AddPoint(Point2D::new(p.0, p.1)));
    }
    session.update(SessionCommand::CloseDraft);

    session.update(SessionCommand::PointerDown { id: 5, pos: Point2D::new(201.0, 99.0) });
    session.update(SessionCommand::PointerMove { id: 5, pos: Point2D::new(250.0, 120.0) });
    session.update(SessionCommand::PointerUp { id: 5, pos: Point2D::new(250.0, 120.0) });

    assert_eq!(session.editor().polygons()[0].points[1], Point2D::new(250.0, 120.0));
    assert_eq!(session.active_pointers(), 0);
    assert_eq!(session.editor().dragging_pointer(), None);
}

#[test]
fn test_short_close_sets_error_status() {
    let mut session = session_with_raster();
    session.update(SessionCommand::SetMode(EditorMode::Draw));
    session.update(SessionCommand::AddPoint(Point2D::new(0.0, 0.0)));
    session.update(SessionCommand::AddPoint(Point2D::new(9.0, 0.0)));
    session.update(SessionCommand::CloseDraft);

    assert_eq!(session.editor().draft().len(), 2);
    assert_eq!(session.status().unwrap().level, StatusLevel::Error);

    session.update(SessionCommand::DeleteSelected);
    assert_eq!(session.status().unwrap().text, "No polygon selected");
}

#[test]
fn test_close_releases_pointers_and_discards_drafts() {
    let mut session = session_with_raster();
    session.update(SessionCommand::SetMode(EditorMode::Draw));
    session.update(SessionCommand::AddPoint(Point2D::new(3.0, 3.0)));
    session.update(SessionCommand::PointerDown { id: 1, pos: Point2D::new(10.0, 10.0) });
    session.update(SessionCommand::PointerDown { id: 2, pos: Point2D::new(20.0, 10.0) });

    session.close();
    assert_eq!(session.active_pointers(), 0);
    assert!(session.editor().draft().is_empty());
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[test]
fn test_export_requires_raster() {
    let session = ViewerSession::new(fast_config());
    assert!(matches!(session.export(None), Err(SlidemarkError::NotLoaded)));
}

#[test]
fn test_export_maps_back_to_source_space() {
    let mut session = ViewerSession::new(fast_config());
    session.set_slug("wt4-normal-x20");
    session.load_raster(Ok(white_raster(200, 200)));
    session.load_annotations(Ok(square_grid(1, 1, 10.0, 10.0)), extent(400.0, 400.0));
    session.update(SessionCommand::SetMode(EditorMode::Draw));
    for p in [(10.0, 10.0), (20.0, 10.0), (20.0, 20.0)] {
        session.update(SessionCommand::AddPoint(Point2D::new(p.0, p.1)));
    }
    session.update(SessionCommand::CloseDraft);

    let payload = session.export(Some("WT4 Normal x20")).unwrap();
    assert_eq!(payload.file_name, "wt4-normal-x20-annotations.geojson");

    let json = serde_json::to_value(&payload.collection).unwrap();
    let ring = &json["features"][0]["geometry"]["coordinates"][0];
    assert_eq!(ring[0], serde_json::json!([20.0, 20.0]));
    assert_eq!(ring[2], serde_json::json!([40.0, 40.0]));
    assert_eq!(ring.as_array().unwrap().len(), 4);
    assert_eq!(json["name"], "WT4 Normal x20");
    assert!(!payload.to_bytes().unwrap().is_empty());
}
