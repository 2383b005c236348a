//! Active-pointer bookkeeping for pan and pinch gestures.
//!
//! One active pointer pans; two pinch-zoom around their midpoint. Every change
//! in the number of active pointers re-seeds the drag anchor or the pinch
//! baseline so the content never jumps.

use std::collections::BTreeMap;

use crate::geometry::Point2D;

pub type PointerId = u64;

/// Outcome of a pointer move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureUpdate {
    None,
    Pan { dx: f64, dy: f64 },
    Pinch { zoom: f64, center: Point2D },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PinchBaseline {
    distance: f64,
    zoom: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    pointers: BTreeMap<PointerId, Point2D>,
    anchor: Option<Point2D>,
    pinch: Option<PinchBaseline>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn is_active(&self, id: PointerId) -> bool {
        self.pointers.contains_key(&id)
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    pub fn down(&mut self, id: PointerId, pos: Point2D, zoom: f64) {
        self.pointers.insert(id, pos);
        self.reseed(zoom);
    }

    pub fn up(&mut self, id: PointerId, zoom: f64) {
        if self.pointers.remove(&id).is_some() {
            self.reseed(zoom);
        }
    }

    pub fn release_all(&mut self) {
        self.pointers.clear();
        self.anchor = None;
        self.pinch = None;
    }

    pub fn moved(&mut self, id: PointerId, pos: Point2D) -> GestureUpdate {
        match self.pointers.get_mut(&id) {
            Some(p) => *p = pos,
            None => return GestureUpdate::None,
        }

        if self.pointers.len() == 1 {
            let Some(anchor) = self.anchor.replace(pos) else {
                return GestureUpdate::None;
            };
            return GestureUpdate::Pan {
                dx: pos.x - anchor.x,
                dy: pos.y - anchor.y,
            };
        }

        match (self.pinch, self.pair()) {
            (Some(base), Some((a, b))) if base.distance > f64::EPSILON => GestureUpdate::Pinch {
                zoom: base.zoom * a.distance(&b) / base.distance,
                center: a.midpoint(&b),
            },
            _ => GestureUpdate::None,
        }
    }

    /// First two active pointers in id order.
    fn pair(&self) -> Option<(Point2D, Point2D)> {
        let mut it = self.pointers.values();
        Some((*it.next()?, *it.next()?))
    }

    fn reseed(&mut self, zoom: f64) {
        self.anchor = None;
        self.pinch = None;
        match self.pointers.len() {
            0 => {}
            1 => self.anchor = self.pointers.values().next().copied(),
            _ => {
                if let Some((a, b)) = self.pair() {
                    self.pinch = Some(PinchBaseline {
                        distance: a.distance(&b),
                        zoom,
                    });
                }
            }
        }
    }
}
