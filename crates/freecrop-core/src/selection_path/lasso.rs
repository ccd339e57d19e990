//! Drag-driven lasso construction.
//!
//! A stroke is `begin_stroke`, any number of `extend_stroke` calls and
//! either `end_stroke` or `cancel_stroke`. Each sample runs through the
//! checks below in order; the first one that applies decides the outcome.
//!
//! 1. Outside the bounds: fail with [`SelectionFailure::OutOfBorder`]
//! 2. Same as the last point: ignore
//! 3. Far enough from the first point (more than three lock regions, with
//!    at least four points): arm the lock
//! 4. Armed, at least four points and back in the lock region: close
//! 5. At least four points and the new segment crosses the path: fail
//!    with [`SelectionFailure::PathCrossed`]
//! 6. Otherwise append, resuming a paused lasso first

use log::debug;

use super::{IntersectionHit, PathMode, SelectionPathEngine};
use crate::events::{SelectionEvent, SelectionFailure};
use crate::geometry::{distance, find_segment_path_intersection, Point};

/// Points a contour needs before it may close or be rejected for crossing.
const MIN_POINTS_TO_CLOSE: usize = 4;

impl SelectionPathEngine {
    /// Start a lasso stroke at `point`.
    ///
    /// On a paused lasso the stroke continues the existing contour.
    pub fn begin_stroke(&mut self, point: Point) {
        if !self.accepts_strokes() {
            return;
        }
        self.stroke_active = true;
        self.stroke_needs_snapshot = true;
        self.sample(point);
    }

    /// Feed the next sample of the running stroke.
    ///
    /// Samples after the stroke closed or failed the selection are ignored
    /// until the next [`begin_stroke`](Self::begin_stroke).
    pub fn extend_stroke(&mut self, point: Point) {
        if self.accepts_strokes() && self.stroke_active {
            self.sample(point);
        }
    }

    /// Finish the stroke at `point`.
    ///
    /// A contour still open afterwards is paused, or fails with
    /// [`SelectionFailure::TouchEnded`] when pausing is disabled.
    pub fn end_stroke(&mut self, point: Point) {
        if !self.accepts_strokes() {
            return;
        }
        if self.stroke_active {
            self.sample(point);
        }
        self.finish_stroke(point);
    }

    /// Abandon the stroke without sampling another point.
    ///
    /// Treated like [`end_stroke`](Self::end_stroke) otherwise: the stroke's
    /// undo snapshot is kept and an open contour is paused.
    pub fn cancel_stroke(&mut self) {
        if !self.accepts_strokes() {
            return;
        }
        let at = self.contour.last().unwrap_or_default();
        self.finish_stroke(at);
    }

    fn accepts_strokes(&self) -> bool {
        if self.mode != PathMode::Lasso {
            debug!("Ignoring stroke in {:?} mode", self.mode);
            return false;
        }
        !self.contour.is_closed()
    }

    fn sample(&mut self, point: Point) {
        if self.contour.is_closed() {
            return;
        }
        if !self.bounds.contains(point) {
            self.fail(SelectionFailure::OutOfBorder);
            return;
        }

        let (Some(first), Some(last)) = (self.contour.first(), self.contour.last()) else {
            self.record_sample(point);
            return;
        };
        if point == last {
            return;
        }

        let count = self.contour.len();
        let lock_size = self.config.lock_region_size;
        if !self.can_lock
            && self.lock_region().is_some()
            && count >= MIN_POINTS_TO_CLOSE
            && distance(first, point) > lock_size * 3.0
        {
            debug!("Lasso lock armed at ({}, {})", point.x, point.y);
            self.can_lock = true;
        }

        if self.can_lock
            && count >= MIN_POINTS_TO_CLOSE
            && (point == first || self.lock_region.contains(point))
        {
            self.snapshot_stroke();
            self.complete();
            return;
        }

        let crossing = (count >= MIN_POINTS_TO_CLOSE)
            .then(|| find_segment_path_intersection(point, last, self.contour.points()))
            .flatten();
        if let Some(points) = crossing {
            self.report_intersection(IntersectionHit::from_points(points));
            self.fail(SelectionFailure::PathCrossed);
            return;
        }

        self.record_sample(point);
    }

    fn record_sample(&mut self, point: Point) {
        if self.paused {
            self.paused = false;
            self.events.push(SelectionEvent::SelectionResumed(point));
        }
        self.snapshot_stroke();
        self.append(point);
    }

    /// Take the stroke's undo snapshot before its first mutation.
    fn snapshot_stroke(&mut self) {
        if self.stroke_needs_snapshot {
            self.stroke_needs_snapshot = false;
            self.push_undo_snapshot();
        }
    }

    fn finish_stroke(&mut self, at: Point) {
        self.stroke_active = false;
        self.stroke_needs_snapshot = false;
        if !self.contour.is_empty() && !self.contour.is_closed() {
            if self.config.allow_pause_for_lasso {
                if !self.paused {
                    debug!("Lasso paused at ({}, {})", at.x, at.y);
                    self.paused = true;
                    self.events.push(SelectionEvent::SelectionPaused(at));
                }
            } else {
                self.fail(SelectionFailure::TouchEnded);
            }
        }
        self.events
            .push(SelectionEvent::UndoAvailabilityChanged(self.can_undo()));
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{engine, p};
    use super::super::{PathEngineConfig, PathState};
    use super::*;
    use crate::geometry::{PathContour, Rect};

    fn stroke(e: &mut SelectionPathEngine, points: &[Point]) {
        let (head, rest) = points.split_first().unwrap();
        e.begin_stroke(*head);
        for pt in rest {
            e.extend_stroke(*pt);
        }
    }

    fn failures(events: &[SelectionEvent]) -> Vec<SelectionFailure> {
        events
            .iter()
            .filter_map(|e| match e {
                SelectionEvent::SelectionFailed(reason) => Some(*reason),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_lasso_closes_in_lock_region() {
        let mut e = engine(PathMode::Lasso);
        stroke(
            &mut e,
            &[p(10.0, 10.0), p(60.0, 10.0), p(60.0, 60.0), p(10.0, 60.0)],
        );
        e.can_lock = true;
        e.extend_stroke(p(12.0, 12.0));

        assert!(e.is_closed());
        assert_eq!(
            e.contour().points(),
            &[
                p(10.0, 10.0),
                p(60.0, 10.0),
                p(60.0, 60.0),
                p(10.0, 60.0),
                p(10.0, 10.0)
            ]
        );
        let events = e.take_events();
        assert!(events.contains(&SelectionEvent::SelectionCompleted(e.contour().clone())));
    }

    #[test]
    fn test_lock_arms_after_leaving_start() {
        let mut e = engine(PathMode::Lasso);
        stroke(
            &mut e,
            &[p(10.0, 10.0), p(60.0, 10.0), p(110.0, 10.0), p(110.0, 60.0)],
        );
        assert!(!e.can_lock());

        // 100 * sqrt(2) from the first point, beyond 3 * 30.
        e.extend_stroke(p(110.0, 110.0));
        assert!(e.can_lock());

        e.extend_stroke(p(10.0, 110.0));
        e.extend_stroke(p(15.0, 15.0));
        assert!(e.is_closed());
        assert_eq!(e.contour().len(), 7);
    }

    #[test]
    fn test_near_start_without_lock_keeps_drawing() {
        let mut e = engine(PathMode::Lasso);
        stroke(
            &mut e,
            &[p(10.0, 10.0), p(60.0, 10.0), p(60.0, 60.0), p(10.0, 60.0)],
        );
        e.extend_stroke(p(12.0, 20.0));
        assert!(!e.is_closed());
        assert_eq!(e.contour().len(), 5);
    }

    #[test]
    fn test_crossing_fails_and_clears() {
        let mut e = engine(PathMode::Lasso);
        stroke(
            &mut e,
            &[p(10.0, 10.0), p(100.0, 10.0), p(100.0, 100.0), p(50.0, 100.0)],
        );
        e.take_events();

        e.extend_stroke(p(50.0, 0.5));
        assert_eq!(e.state(), PathState::Empty);
        assert_eq!(e.lock_region(), None);
        assert_eq!(failures(&e.take_events()), vec![SelectionFailure::PathCrossed]);
    }

    #[test]
    fn test_samples_after_failure_are_ignored() {
        let mut e = engine(PathMode::Lasso);
        stroke(&mut e, &[p(10.0, 10.0), p(50.0, 10.0)]);
        e.extend_stroke(p(250.0, 10.0));
        e.extend_stroke(p(60.0, 60.0));
        e.end_stroke(p(70.0, 70.0));
        assert_eq!(e.state(), PathState::Empty);

        e.begin_stroke(p(20.0, 20.0));
        assert_eq!(e.contour().len(), 1);
    }

    #[test]
    fn test_crossing_ignored_below_four_points() {
        let mut e = engine(PathMode::Lasso);
        stroke(&mut e, &[p(10.0, 10.0), p(100.0, 10.0), p(100.0, 100.0)]);
        e.extend_stroke(p(50.0, 0.5));
        assert_eq!(e.contour().len(), 4);
    }

    #[test]
    fn test_leaving_bounds_fails() {
        let mut e = engine(PathMode::Lasso);
        stroke(&mut e, &[p(10.0, 10.0), p(50.0, 10.0)]);
        e.extend_stroke(p(250.0, 10.0));
        assert_eq!(e.state(), PathState::Empty);
        assert_eq!(failures(&e.take_events()), vec![SelectionFailure::OutOfBorder]);
    }

    #[test]
    fn test_repeated_point_is_ignored() {
        let mut e = engine(PathMode::Lasso);
        stroke(&mut e, &[p(10.0, 10.0), p(50.0, 10.0), p(50.0, 10.0)]);
        assert_eq!(e.contour().len(), 2);
    }

    #[test]
    fn test_lift_pauses_and_next_stroke_resumes() {
        let mut e = engine(PathMode::Lasso);
        stroke(&mut e, &[p(10.0, 10.0), p(50.0, 10.0)]);
        e.end_stroke(p(80.0, 10.0));
        assert_eq!(e.state(), PathState::Paused);
        assert_eq!(e.contour().len(), 3);

        let events = e.take_events();
        assert!(events.contains(&SelectionEvent::SelectionPaused(p(80.0, 10.0))));
        assert_eq!(events.last(), Some(&SelectionEvent::UndoAvailabilityChanged(true)));

        e.begin_stroke(p(90.0, 40.0));
        assert_eq!(e.state(), PathState::Building);
        assert_eq!(e.contour().len(), 4);
        assert_eq!(
            e.take_events(),
            vec![SelectionEvent::SelectionResumed(p(90.0, 40.0))]
        );
    }

    #[test]
    fn test_lift_without_pause_fails() {
        let config = PathEngineConfig {
            allow_pause_for_lasso: false,
            ..Default::default()
        };
        let mut e =
            SelectionPathEngine::new(PathMode::Lasso, Rect::new(0.0, 0.0, 200.0, 200.0), config);
        stroke(&mut e, &[p(10.0, 10.0), p(50.0, 10.0)]);
        e.end_stroke(p(50.0, 50.0));
        assert_eq!(e.state(), PathState::Empty);
        assert_eq!(failures(&e.take_events()), vec![SelectionFailure::TouchEnded]);
    }

    #[test]
    fn test_cancel_pauses_like_end() {
        let mut e = engine(PathMode::Lasso);
        stroke(&mut e, &[p(10.0, 10.0), p(50.0, 10.0)]);
        e.cancel_stroke();
        assert!(e.is_paused());
        assert!(e.can_undo());
        assert_eq!(e.contour().len(), 2);
    }

    #[test]
    fn test_undo_restores_previous_stroke() {
        let mut e = engine(PathMode::Lasso);
        stroke(&mut e, &[p(10.0, 10.0), p(50.0, 10.0)]);
        e.end_stroke(p(80.0, 10.0));
        stroke(&mut e, &[p(80.0, 50.0), p(80.0, 80.0)]);
        e.end_stroke(p(60.0, 80.0));
        assert_eq!(e.contour().len(), 6);

        e.undo();
        assert_eq!(
            e.contour(),
            &PathContour::from_points(vec![p(10.0, 10.0), p(50.0, 10.0), p(80.0, 10.0)])
        );
        assert!(e.is_paused());

        e.undo();
        assert_eq!(e.state(), PathState::Empty);
        assert_eq!(e.lock_region(), None);
        assert!(!e.can_undo());
    }

    #[test]
    fn test_out_of_bounds_first_point_fails() {
        let mut e = engine(PathMode::Lasso);
        e.begin_stroke(p(-1.0, 10.0));
        e.extend_stroke(p(20.0, 10.0));
        e.end_stroke(p(30.0, 10.0));
        assert_eq!(e.state(), PathState::Empty);
        assert!(!e.can_undo());
        assert_eq!(failures(&e.take_events()), vec![SelectionFailure::OutOfBorder]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
