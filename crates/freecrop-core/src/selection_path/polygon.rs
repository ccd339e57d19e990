//! Tap-driven polygon construction.

use log::debug;

use super::{IntersectionHit, PathMode, SelectionPathEngine};
use crate::events::SelectionEvent;
use crate::geometry::{find_path_self_intersection, Point};

impl SelectionPathEngine {
    /// Handle a polygon tap.
    ///
    /// # Behavior
    ///
    /// - A tap inside the current polygon, or one whose new edge would
    ///   cross it, closes the polygon. Closure always wins over rejecting
    ///   the crossing.
    /// - Any other tap appends a vertex; the first one also places the
    ///   lock marker.
    /// - Taps on a closed polygon, outside the bounds or on the last vertex
    ///   are ignored.
    ///
    /// Every accepted tap is undoable.
    pub fn tap(&mut self, point: Point) {
        if self.mode != PathMode::Polygon {
            debug!("Ignoring tap in {:?} mode", self.mode);
            return;
        }
        if self.contour.is_closed() || !self.bounds.contains(point) {
            return;
        }
        if self.contour.last() == Some(point) {
            return;
        }

        let inside = self.contour.contains(point);
        let crossing = find_path_self_intersection(self.contour.points(), point);
        if let Some(points) = crossing {
            self.report_intersection(IntersectionHit::from_points(points));
        }

        self.push_undo_snapshot();
        if inside || crossing.is_some() {
            self.complete();
        } else {
            self.append(point);
            debug!(
                "Polygon vertex {} at ({}, {})",
                self.contour.len(),
                point.x,
                point.y
            );
        }
        self.events
            .push(SelectionEvent::UndoAvailabilityChanged(self.can_undo()));
    }
}
