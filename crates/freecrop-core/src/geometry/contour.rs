//! Ordered point lists describing a selection boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Point, Rect};

/// Errors raised when mutating a [`PathContour`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContourError {
    /// The contour was already closed when a point was appended.
    #[error("Cannot append ({x}, {y}) to a closed contour")]
    Closed { x: f64, y: f64 },
}

/// An ordered sequence of points, optionally closed.
///
/// Once [`close`](PathContour::close) has been called the first and last
/// points coincide and no further points can be appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathContour {
    points: Vec<Point>,
    closed: bool,
}

impl PathContour {
    /// Create an empty, open contour.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an open contour from a list of points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    /// A closed rectangle contour, clockwise from the top-left corner.
    pub fn rectangle(rect: Rect) -> Self {
        let mut contour = Self::from_points(vec![
            Point::new(rect.min_x(), rect.min_y()),
            Point::new(rect.max_x(), rect.min_y()),
            Point::new(rect.max_x(), rect.max_y()),
            Point::new(rect.min_x(), rect.max_y()),
        ]);
        contour.close();
        contour
    }

    /// A closed polygonal approximation of the ellipse inscribed in `rect`.
    ///
    /// `segments` is clamped to at least 8.
    pub fn ellipse(rect: Rect, segments: usize) -> Self {
        let segments = segments.max(8);
        let (cx, cy) = (rect.mid_x(), rect.mid_y());
        let (rx, ry) = (rect.w * 0.5, rect.h * 0.5);

        let points = (0..segments)
            .map(|i| {
                let theta = (i as f64 / segments as f64) * std::f64::consts::TAU;
                Point::new(cx + rx * theta.cos(), cy + ry * theta.sin())
            })
            .collect();

        let mut contour = Self::from_points(points);
        contour.close();
        contour
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Append a point to an open contour.
    pub fn push(&mut self, point: Point) -> Result<(), ContourError> {
        if self.closed {
            return Err(ContourError::Closed {
                x: point.x,
                y: point.y,
            });
        }
        self.points.push(point);
        Ok(())
    }

    /// Close the contour by repeating the first point at the end.
    ///
    /// Closing an empty or already closed contour does nothing.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        let Some(first) = self.first() else {
            return;
        };
        if self.last() != Some(first) {
            self.points.push(first);
        }
        self.closed = true;
    }

    /// Remove every point and reopen the contour.
    pub fn clear(&mut self) {
        self.points.clear();
        self.closed = false;
    }

    /// Bounding box of all points, or `None` for an empty contour.
    pub fn bounding_box(&self) -> Option<Rect> {
        super::bounding_box(&self.points)
    }

    /// Even-odd point-in-polygon test.
    ///
    /// The contour is treated as implicitly closed, so an open contour with
    /// at least three points still encloses an area.
    pub fn contains(&self, point: Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.points[i];
            let vj = self.points[j];

            if ((vi.y > point.y) != (vj.y > point.y))
                && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
            {
                inside = !inside;
            }
            j = i;
        }

        inside
    }

    /// Apply `f` to every point, keeping the closed flag.
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> PathContour {
        PathContour {
            points: self.points.iter().copied().map(f).collect(),
            closed: self.closed,
        }
    }

    /// A copy shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> PathContour {
        self.map_points(|p| p.offset(dx, dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> PathContour {
        PathContour::from_points(vec![
            Point::new(10.0, 10.0),
            Point::new(60.0, 10.0),
            Point::new(60.0, 60.0),
            Point::new(10.0, 60.0),
        ])
    }

    #[test]
    fn test_close_repeats_first_point() {
        let mut c = square();
        c.close();
        assert!(c.is_closed());
        assert_eq!(c.len(), 5);
        assert_eq!(c.first(), c.last());
    }

    #[test]
    fn test_close_does_not_duplicate_coincident_end() {
        let mut c = square();
        c.push(Point::new(10.0, 10.0)).unwrap();
        c.close();
        assert_eq!(c.len(), 5);
    }

    #[test]
    fn test_push_after_close_fails() {
        let mut c = square();
        c.close();
        let err = c.push(Point::new(1.0, 1.0)).unwrap_err();
        assert_eq!(err, ContourError::Closed { x: 1.0, y: 1.0 });
        assert_eq!(err.to_string(), "Cannot append (1, 1) to a closed contour");
        assert_eq!(c.len(), 5);
    }

    #[test]
    fn test_close_empty_is_noop() {
        let mut c = PathContour::new();
        c.close();
        assert!(!c.is_closed());
        assert!(c.is_empty());
    }

    #[test]
    fn test_contains() {
        let c = square();
        assert!(c.contains(Point::new(30.0, 30.0)));
        assert!(!c.contains(Point::new(70.0, 30.0)));
        assert!(!c.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_contains_needs_three_points() {
        let c = PathContour::from_points(vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]);
        assert!(!c.contains(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_bounding_box() {
        assert_eq!(square().bounding_box(), Some(Rect::new(10.0, 10.0, 50.0, 50.0)));
        assert_eq!(PathContour::new().bounding_box(), None);
    }

    #[test]
    fn test_rectangle_contour() {
        let c = PathContour::rectangle(Rect::new(0.0, 0.0, 4.0, 2.0));
        assert!(c.is_closed());
        assert_eq!(c.len(), 5);
        assert_eq!(c.bounding_box(), Some(Rect::new(0.0, 0.0, 4.0, 2.0)));
    }

    #[test]
    fn test_ellipse_contour_stays_in_rect() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        let c = PathContour::ellipse(rect, 64);
        assert!(c.is_closed());
        assert_eq!(c.len(), 65);

        let bbox = c.bounding_box().unwrap();
        assert!((bbox.x - rect.x).abs() < 1e-9);
        assert!((bbox.w - rect.w).abs() < 1e-9);
        assert!(bbox.h <= rect.h + 1e-9);
        assert!(c.contains(Point::new(rect.mid_x(), rect.mid_y())));
        assert!(!c.contains(Point::new(rect.x + 1.0, rect.y + 1.0)));
    }

    #[test]
    fn test_translated_keeps_closed_flag() {
        let mut c = square();
        c.close();
        let moved = c.translated(5.0, -5.0);
        assert!(moved.is_closed());
        assert_eq!(moved.first(), Some(Point::new(15.0, 5.0)));
    }
}
