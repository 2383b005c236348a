//! Per-viewer state and the command reducer that drives it.
//!
//! A session owns everything one viewer needs: the raster, the fetched
//! annotations and their mapping, the overlay, the viewport, pointer tracking
//! and the editor. All mutation goes through [`ViewerSession::update`] or the
//! load methods, so two sessions never share state.

use tracing::{info, warn};

use crate::align::{point_cloud, Registration, TransformSolver};
use crate::config::SlidemarkConfig;
use crate::detection::{detect_tissue, PixelSource, RgbaBuffer};
use crate::editor::{
    export_polygons, AnnotationEditor, EditorCommand, EditorEvent, EditorMode, ExportMetadata,
    PolygonId,
};
use crate::error::{Result, SlidemarkError};
use crate::geometry::{CoordinateMapping, Point2D, ScaleRatio, SourceExtent};
use crate::io::geojson::FeatureCollection;
use crate::overlay::{Overlay, OverlayRenderer};
use crate::viewport::{GestureUpdate, PointerId, PointerTracker, ViewportController, ViewportSnapshot};

/// Inputs to [`ViewerSession::update`]. Pointer positions are screen pixels;
/// `AddPoint` takes raster pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionCommand {
    AddPoint(Point2D),
    CloseDraft,
    SelectPolygon(Option<PolygonId>),
    DeleteSelected,
    SetZoom(f64),
    ZoomSteps { steps: f64, anchor: Point2D },
    Pan { dx: f64, dy: f64 },
    Resize { width: f64, height: f64 },
    SetMode(EditorMode),
    ToggleMode,
    ToggleOverlay,
    ResetView,
    PointerDown { id: PointerId, pos: Point2D },
    PointerMove { id: PointerId, pos: Point2D },
    PointerUp { id: PointerId, pos: Point2D },
    ReleasePointers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }
}

/// A press that may still turn out to be a tap.
#[derive(Clone, Copy, Debug)]
struct PendingTap {
    pointer: PointerId,
    start: Point2D,
    moved: bool,
}

/// Serialized export ready for a file-save collaborator.
#[derive(Clone, Debug)]
pub struct ExportPayload {
    pub file_name: String,
    pub collection: FeatureCollection,
}

impl ExportPayload {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.collection.to_json_pretty()?.into_bytes())
    }
}

pub struct ViewerSession {
    config: SlidemarkConfig,
    slug: String,
    raster: Option<RgbaBuffer>,
    annotations: Option<FeatureCollection>,
    source_extent: Option<SourceExtent>,
    mapping: CoordinateMapping,
    registration: Option<Registration>,
    overlay: Option<Overlay>,
    overlay_visible: bool,
    overlay_toggle_enabled: bool,
    viewport: ViewportController,
    pointers: PointerTracker,
    pending_tap: Option<PendingTap>,
    editor: AnnotationEditor,
    status: Option<StatusMessage>,
}

impl ViewerSession {
    pub fn new(config: SlidemarkConfig) -> Self {
        let viewport = ViewportController::new(&config.viewport);
        Self {
            config,
            slug: String::from("slide"),
            raster: None,
            annotations: None,
            source_extent: None,
            mapping: CoordinateMapping::Identity,
            registration: None,
            overlay: None,
            overlay_visible: false,
            overlay_toggle_enabled: true,
            viewport,
            pointers: PointerTracker::new(),
            pending_tap: None,
            editor: AnnotationEditor::new(),
            status: None,
        }
    }

    pub fn config(&self) -> &SlidemarkConfig {
        &self.config
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.slug = slug.into();
    }

    pub fn raster(&self) -> Option<&RgbaBuffer> {
        self.raster.as_ref()
    }

    pub fn annotations(&self) -> Option<&FeatureCollection> {
        self.annotations.as_ref()
    }

    pub fn mapping(&self) -> CoordinateMapping {
        self.mapping
    }

    pub fn registration(&self) -> Option<&Registration> {
        self.registration.as_ref()
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible && self.overlay.is_some()
    }

    pub fn overlay_toggle_enabled(&self) -> bool {
        self.overlay_toggle_enabled
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_snapshot(&self) -> ViewportSnapshot {
        self.viewport.snapshot()
    }

    pub fn editor(&self) -> &AnnotationEditor {
        &self.editor
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn active_pointers(&self) -> usize {
        self.pointers.active_count()
    }

    /// Handle radius in raster pixels at the current scale.
    pub fn handle_radius(&self) -> f64 {
        self.viewport
            .screen_to_raster_distance(self.config.viewport.handle_radius)
    }

    /// Accept a decoded raster. A failed decode keeps the previous raster and
    /// everything derived from it.
    pub fn load_raster(&mut self, result: Result<RgbaBuffer>) {
        let raster = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Raster load failed");
                self.status = Some(StatusMessage::error(e.to_string()));
                return;
            }
        };
        let (w, h) = (raster.width(), raster.height());
        info!(width = w, height = h, "Raster loaded");
        let (vw, vh) = self.viewport.viewport_size();
        self.viewport.fit_to_container(w as f64, h as f64, vw, vh);
        self.raster = Some(raster);
        self.editor = AnnotationEditor::new();
        self.pointers.release_all();
        self.pending_tap = None;
        self.status = Some(StatusMessage::info(format!("Raster {w}x{h} loaded")));
        if self.annotations.is_some() {
            self.prepare_overlay();
        }
    }

    /// Accept a fetched annotation payload. On failure the overlay stays
    /// hidden and the toggle is re-enabled so the user can retry.
    pub fn load_annotations(
        &mut self,
        result: Result<FeatureCollection>,
        source_extent: Option<SourceExtent>,
    ) {
        match result {
            Ok(collection) => {
                self.annotations = Some(collection);
                self.source_extent = source_extent;
                if self.raster.is_some() {
                    self.prepare_overlay();
                } else {
                    self.status = Some(StatusMessage::info("Annotations loaded, waiting for raster"));
                }
            }
            Err(e) => {
                warn!(error = %e, "Annotation load failed");
                self.overlay_visible = false;
                self.overlay_toggle_enabled = true;
                self.status = Some(StatusMessage::error(e.to_string()));
            }
        }
    }

    /// Resolve the mapping (declared ratio or registration) and build the overlay.
    fn prepare_overlay(&mut self) {
        let (Some(raster), Some(annotations)) = (self.raster.as_ref(), self.annotations.as_ref())
        else {
            return;
        };
        let (w, h) = (raster.width(), raster.height());

        let ratio = self
            .source_extent
            .and_then(|extent| ScaleRatio::from_extents(w, h, extent));
        let (mapping, registration) = match ratio {
            Some(r) => (CoordinateMapping::Ratio(r), None),
            None => {
                let region = detect_tissue(raster, &self.config.detection);
                let points = point_cloud(annotations, self.config.solver.cloud_source);
                let solved = TransformSolver::new(&region, &points, &self.config.solver)
                    .and_then(|solver| solver.solve());
                match solved {
                    Ok(reg) => (CoordinateMapping::Affine(reg.transform), Some(reg)),
                    Err(e) => {
                        warn!(error = %e, "Registration failed");
                        self.status = Some(StatusMessage::error(e.to_string()));
                        self.mapping = CoordinateMapping::Identity;
                        self.registration = None;
                        self.overlay = None;
                        self.overlay_visible = false;
                        self.overlay_toggle_enabled = true;
                        return;
                    }
                }
            }
        };

        let overlay = OverlayRenderer::new().render(annotations, mapping, w, h);
        self.status = Some(StatusMessage::info(format!(
            "{} annotation paths ({mapping})",
            overlay.paths.len()
        )));
        self.mapping = mapping;
        self.registration = registration;
        self.overlay = Some(overlay);
        self.overlay_visible = true;
        self.overlay_toggle_enabled = true;
    }

    pub fn update(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::AddPoint(p) => self.edit(EditorCommand::AddPoint(p)),
            SessionCommand::CloseDraft => self.edit(EditorCommand::CloseDraft),
            SessionCommand::SelectPolygon(id) => self.edit(EditorCommand::SelectPolygon(id)),
            SessionCommand::DeleteSelected => self.edit(EditorCommand::DeleteSelected),
            SessionCommand::SetMode(mode) => self.edit(EditorCommand::SetMode(mode)),
            SessionCommand::ToggleMode => self.edit(EditorCommand::ToggleMode),
            SessionCommand::SetZoom(z) => self.viewport.set_zoom(z),
            SessionCommand::ZoomSteps { steps, anchor } => self.viewport.zoom_by_steps(steps, anchor),
            SessionCommand::Pan { dx, dy } => self.viewport.pan_by(dx, dy),
            SessionCommand::Resize { width, height } => self.resize(width, height),
            SessionCommand::ResetView => self.viewport.reset(),
            SessionCommand::ToggleOverlay => {
                if self.overlay_toggle_enabled && self.overlay.is_some() {
                    self.overlay_visible = !self.overlay_visible;
                }
            }
            SessionCommand::PointerDown { id, pos } => self.pointer_down(id, pos),
            SessionCommand::PointerMove { id, pos } => self.pointer_move(id, pos),
            SessionCommand::PointerUp { id, pos } => self.pointer_up(id, pos),
            SessionCommand::ReleasePointers => self.release_pointers(),
        }
    }

    fn edit(&mut self, command: EditorCommand) {
        let result = self.editor.apply(command);
        self.report(result);
    }

    fn report(&mut self, result: Result<EditorEvent>) {
        self.status = match result {
            Ok(EditorEvent::Committed(id)) => Some(StatusMessage::info(format!("Polygon {id} added"))),
            Ok(EditorEvent::Deleted(id)) => Some(StatusMessage::info(format!("Polygon {id} deleted"))),
            Ok(EditorEvent::ModeChanged(mode)) => Some(StatusMessage::info(format!("{mode} mode"))),
            Ok(_) => return,
            Err(e) => Some(StatusMessage::error(e.to_string())),
        };
    }

    fn resize(&mut self, width: f64, height: f64) {
        let first_layout = self.viewport.viewport_size() == (0.0, 0.0);
        match (&self.raster, first_layout) {
            (Some(r), true) => {
                self.viewport
                    .fit_to_container(r.width() as f64, r.height() as f64, width, height)
            }
            _ => self.viewport.resize(width, height),
        }
    }

    fn pointer_down(&mut self, id: PointerId, pos: Point2D) {
        let drawing = self.editor.mode() == EditorMode::Draw;
        if drawing && self.pointers.active_count() == 0 {
            let raster_pos = self.viewport.screen_to_raster(pos);
            if let Some(handle) = self.editor.handle_at(&raster_pos, self.handle_radius()) {
                if self.editor.begin_vertex_drag(id, handle) {
                    return;
                }
            }
        }
        self.pointers.down(id, pos, self.viewport.zoom());
        // A second finger turns the press into a gesture, never a tap.
        self.pending_tap = match (drawing, self.pointers.active_count()) {
            (true, 1) => Some(PendingTap {
                pointer: id,
                start: pos,
                moved: false,
            }),
            _ => None,
        };
    }

    fn pointer_move(&mut self, id: PointerId, pos: Point2D) {
        if self.editor.dragging_pointer() == Some(id) {
            let p = self.viewport.screen_to_raster(pos);
            self.editor.drag_vertex(id, p);
            return;
        }

        let slop = self.config.viewport.tap_slop;
        let mut hold = false;
        if let Some(tap) = self.pending_tap.as_mut().filter(|t| t.pointer == id) {
            if !tap.moved && tap.start.distance(&pos) > slop {
                tap.moved = true;
            }
            hold = !tap.moved;
        }

        match self.pointers.moved(id, pos) {
            GestureUpdate::Pan { dx, dy } if !hold => self.viewport.pan_by(dx, dy),
            GestureUpdate::Pinch { zoom, center } => self.viewport.zoom_at(zoom, center),
            _ => {}
        }
    }

    fn pointer_up(&mut self, id: PointerId, pos: Point2D) {
        if self.editor.end_vertex_drag(id) {
            return;
        }
        self.pointers.up(id, self.viewport.zoom());
        let tap = self.pending_tap.filter(|t| t.pointer == id);
        if tap.is_some() {
            self.pending_tap = None;
        }
        if let Some(tap) = tap.filter(|t| !t.moved && t.start.distance(&pos) <= self.config.viewport.tap_slop) {
            let p = self.viewport.screen_to_raster(tap.start);
            let result = self.editor.tap(p, self.handle_radius());
            self.report(result);
        }
    }

    fn release_pointers(&mut self) {
        self.pointers.release_all();
        self.pending_tap = None;
        self.editor.cancel_drag();
    }

    /// Serialize the user's polygons in annotation space.
    pub fn export(&self, title: Option<&str>) -> Result<ExportPayload> {
        if self.raster.is_none() {
            return Err(SlidemarkError::NotLoaded);
        }
        let title = title.unwrap_or(self.config.export.title.as_str());
        let metadata = ExportMetadata::now(title, self.slug.as_str(), self.config.export.note.as_str());
        let collection = export_polygons(self.editor.polygons(), &self.mapping, &metadata);
        info!(
            polygons = collection.features.len(),
            file = %metadata.file_name(),
            "Export prepared"
        );
        Ok(ExportPayload {
            file_name: metadata.file_name(),
            collection,
        })
    }

    /// Viewer closed: release pointer captures and discard in-flight edits.
    pub fn close(&mut self) {
        self.release_pointers();
        self.editor.discard_draft();
    }
}
