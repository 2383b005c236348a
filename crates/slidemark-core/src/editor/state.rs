//! Polygon drafting and editing in raster-pixel space.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::MIN_POLYGON_POINTS;
use crate::error::{Result, SlidemarkError};
use crate::geometry::{ring_contains, Point2D};
use crate::viewport::PointerId;

pub type PolygonId = u64;

/// A committed, user-drawn polygon. Points are raster pixels, ring left open.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserPolygon {
    pub id: PolygonId,
    pub points: Vec<Point2D>,
}

impl UserPolygon {
    pub fn contains(&self, p: &Point2D) -> bool {
        ring_contains(&self.points, p)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditorMode {
    /// Pan and zoom only.
    #[default]
    View,
    Draw,
}

impl EditorMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::View => Self::Draw,
            Self::Draw => Self::View,
        }
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View => write!(f, "View"),
            Self::Draw => write!(f, "Draw"),
        }
    }
}

/// Sub-state of DRAW mode, derived from the draft and any active drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawState {
    Idle,
    /// 1-2 draft points.
    Drafting,
    /// Enough points to close.
    DraftReady,
    DraggingVertex,
}

/// A vertex of a committed polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexHandle {
    pub polygon: PolygonId,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct VertexDrag {
    pointer: PointerId,
    handle: VertexHandle,
}

/// Discrete edits, independent of pointer plumbing.
#[derive(Clone, Debug, PartialEq)]
pub enum EditorCommand {
    AddPoint(Point2D),
    CloseDraft,
    SelectPolygon(Option<PolygonId>),
    DeleteSelected,
    SetMode(EditorMode),
    ToggleMode,
}

/// What an accepted command or tap did.
#[derive(Clone, Debug, PartialEq)]
pub enum EditorEvent {
    PointAdded { count: usize },
    Committed(PolygonId),
    Selected(Option<PolygonId>),
    Deleted(PolygonId),
    ModeChanged(EditorMode),
    /// Editing is disabled in VIEW mode.
    Ignored,
}

#[derive(Clone, Debug, Default)]
pub struct AnnotationEditor {
    mode: EditorMode,
    polygons: Vec<UserPolygon>,
    draft: Vec<Point2D>,
    selected: Option<PolygonId>,
    drag: Option<VertexDrag>,
    next_id: PolygonId,
}

impl AnnotationEditor {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn polygons(&self) -> &[UserPolygon] {
        &self.polygons
    }

    pub fn polygon(&self, id: PolygonId) -> Option<&UserPolygon> {
        self.polygons.iter().find(|p| p.id == id)
    }

    pub fn draft(&self) -> &[Point2D] {
        &self.draft
    }

    pub fn selected(&self) -> Option<PolygonId> {
        self.selected
    }

    pub fn draw_state(&self) -> DrawState {
        if self.drag.is_some() {
            DrawState::DraggingVertex
        } else if self.draft.len() >= MIN_POLYGON_POINTS {
            DrawState::DraftReady
        } else if !self.draft.is_empty() {
            DrawState::Drafting
        } else {
            DrawState::Idle
        }
    }

    /// Drafting and deletion are ignored in VIEW mode; selection is not an edit.
    pub fn apply(&mut self, command: EditorCommand) -> Result<EditorEvent> {
        let editing = matches!(
            command,
            EditorCommand::AddPoint(_) | EditorCommand::CloseDraft | EditorCommand::DeleteSelected
        );
        if editing && self.mode != EditorMode::Draw {
            return Ok(EditorEvent::Ignored);
        }
        match command {
            EditorCommand::AddPoint(p) => Ok(self.add_point(p)),
            EditorCommand::CloseDraft => self.close_draft().map(EditorEvent::Committed),
            EditorCommand::SelectPolygon(id) => self.select(id).map(|_| EditorEvent::Selected(id)),
            EditorCommand::DeleteSelected => self.delete_selected().map(EditorEvent::Deleted),
            EditorCommand::SetMode(mode) => {
                self.set_mode(mode);
                Ok(EditorEvent::ModeChanged(mode))
            }
            EditorCommand::ToggleMode => {
                let mode = self.mode.toggled();
                self.set_mode(mode);
                Ok(EditorEvent::ModeChanged(mode))
            }
        }
    }

    /// Switching mode always discards the draft and any vertex drag.
    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
        self.discard_draft();
    }

    /// Drop in-progress draft and drag state; committed polygons stay.
    pub fn discard_draft(&mut self) {
        self.draft.clear();
        self.drag = None;
    }

    pub fn add_point(&mut self, p: Point2D) -> EditorEvent {
        if self.mode != EditorMode::Draw {
            return EditorEvent::Ignored;
        }
        self.draft.push(p);
        EditorEvent::PointAdded {
            count: self.draft.len(),
        }
    }

    /// Commit the draft as a new selected polygon. Fewer than three points is
    /// rejected and the draft is kept.
    pub fn close_draft(&mut self) -> Result<PolygonId> {
        if self.draft.len() < MIN_POLYGON_POINTS {
            return Err(SlidemarkError::InsufficientPoints {
                count: self.draft.len(),
            });
        }
        let id = self.next_id;
        self.next_id += 1;
        let points = std::mem::take(&mut self.draft);
        debug!(id, vertices = points.len(), "Polygon committed");
        self.polygons.push(UserPolygon { id, points });
        self.selected = Some(id);
        Ok(id)
    }

    pub fn select(&mut self, id: Option<PolygonId>) -> Result<()> {
        if let Some(id) = id {
            if self.polygon(id).is_none() {
                return Err(SlidemarkError::UnknownPolygon(id));
            }
        }
        self.selected = id;
        Ok(())
    }

    pub fn delete_selected(&mut self) -> Result<PolygonId> {
        let id = self.selected.ok_or(SlidemarkError::NothingSelected)?;
        self.polygons.retain(|p| p.id != id);
        self.selected = None;
        if self.drag.is_some_and(|d| d.handle.polygon == id) {
            self.drag = None;
        }
        Ok(id)
    }

    /// Topmost (most recently committed) polygon containing `p`.
    pub fn hit_test(&self, p: &Point2D) -> Option<PolygonId> {
        self.polygons.iter().rev().find(|poly| poly.contains(p)).map(|poly| poly.id)
    }

    /// Nearest vertex of the selected polygon within `radius` of `p`.
    pub fn handle_at(&self, p: &Point2D, radius: f64) -> Option<VertexHandle> {
        let polygon = self.polygon(self.selected?)?;
        polygon
            .points
            .iter()
            .enumerate()
            .map(|(i, v)| (i, v.distance(p)))
            .filter(|&(_, d)| d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| VertexHandle {
                polygon: polygon.id,
                index,
            })
    }

    /// True when the draft is closable and `p` is on its first point.
    pub fn is_on_first_point(&self, p: &Point2D, radius: f64) -> bool {
        self.draft.len() >= MIN_POLYGON_POINTS
            && self.draft.first().is_some_and(|first| first.distance(p) <= radius)
    }

    /// Resolve a tap in DRAW mode: close on the first point of a ready
    /// draft, otherwise extend an open draft, otherwise select the polygon
    /// under the tap, otherwise start a new draft.
    pub fn tap(&mut self, p: Point2D, radius: f64) -> Result<EditorEvent> {
        if self.mode != EditorMode::Draw {
            return Ok(EditorEvent::Ignored);
        }
        if self.is_on_first_point(&p, radius) {
            return self.close_draft().map(EditorEvent::Committed);
        }
        if self.draft.is_empty() {
            if let Some(id) = self.hit_test(&p) {
                self.selected = Some(id);
                return Ok(EditorEvent::Selected(Some(id)));
            }
        }
        Ok(self.add_point(p))
    }

    pub fn begin_vertex_drag(&mut self, pointer: PointerId, handle: VertexHandle) -> bool {
        if self.mode != EditorMode::Draw || self.drag.is_some() {
            return false;
        }
        let valid = self
            .polygon(handle.polygon)
            .is_some_and(|p| handle.index < p.points.len());
        if valid {
            self.drag = Some(VertexDrag { pointer, handle });
        }
        valid
    }

    pub fn dragging_pointer(&self) -> Option<PointerId> {
        self.drag.map(|d| d.pointer)
    }

    /// Move the dragged vertex if `pointer` owns the drag.
    pub fn drag_vertex(&mut self, pointer: PointerId, p: Point2D) -> bool {
        let Some(drag) = self.drag.filter(|d| d.pointer == pointer) else {
            return false;
        };
        match self.polygons.iter_mut().find(|poly| poly.id == drag.handle.polygon) {
            Some(poly) => {
                poly.points[drag.handle.index] = p;
                true
            }
            None => false,
        }
    }

    pub fn end_vertex_drag(&mut self, pointer: PointerId) -> bool {
        if self.drag.is_some_and(|d| d.pointer == pointer) {
            self.drag = None;
            true
        } else {
            false
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }
}
