//! Classifying a pointer-down position against the crop box handles.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// Which part of the crop box a gesture grabbed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeRegion {
    /// Outside every handle; the gesture is rejected.
    #[default]
    None,
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    /// Inside the box; the gesture moves it.
    Center,
}

impl EdgeRegion {
    /// True when dragging this region moves the box's left edge.
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }

    /// The corner diagonally opposite the drag direction `(dx, dy)`.
    ///
    /// Used when a freshly drawn box hands over to a resize: the pointer is
    /// holding the corner away from where the drag started.
    pub fn corner_for_direction(dx: f64, dy: f64) -> Self {
        match (dx < 0.0, dy < 0.0) {
            (false, false) => Self::BottomRight,
            (true, false) => Self::BottomLeft,
            (false, true) => Self::TopRight,
            (true, true) => Self::TopLeft,
        }
    }
}

/// Classify `point` against the handles of `crop_box`.
///
/// The box is first grown by `margin` on every side. Square corner handles
/// of `2 * margin` take priority, then edge strips of the same thickness,
/// then the interior (the grown box shrunk back by `margin`). Anything
/// else is [`EdgeRegion::None`].
pub fn hit_test(crop_box: Rect, point: Point, margin: f64) -> EdgeRegion {
    let frame = crop_box.inset(-margin, -margin);
    let handle = margin * 2.0;

    let top_left = Rect::new(frame.min_x(), frame.min_y(), handle, handle);
    if top_left.contains(point) {
        return EdgeRegion::TopLeft;
    }

    let top_right = Rect::new(frame.max_x() - handle, frame.min_y(), handle, handle);
    if top_right.contains(point) {
        return EdgeRegion::TopRight;
    }

    let bottom_left = Rect::new(frame.min_x(), frame.max_y() - handle, handle, handle);
    if bottom_left.contains(point) {
        return EdgeRegion::BottomLeft;
    }

    let bottom_right = Rect::new(
        frame.max_x() - handle,
        frame.max_y() - handle,
        handle,
        handle,
    );
    if bottom_right.contains(point) {
        return EdgeRegion::BottomRight;
    }

    let top = Rect::new(frame.min_x(), frame.min_y(), frame.w, handle);
    if top.contains(point) {
        return EdgeRegion::Top;
    }

    let bottom = Rect::new(frame.min_x(), frame.max_y() - handle, frame.w, handle);
    if bottom.contains(point) {
        return EdgeRegion::Bottom;
    }

    let left = Rect::new(frame.min_x(), frame.min_y(), handle, frame.h);
    if left.contains(point) {
        return EdgeRegion::Left;
    }

    let right = Rect::new(frame.max_x() - handle, frame.min_y(), handle, frame.h);
    if right.contains(point) {
        return EdgeRegion::Right;
    }

    if frame.inset(margin, margin).contains(point) {
        return EdgeRegion::Center;
    }

    EdgeRegion::None
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARGIN: f64 = 22.0;

    fn bx() -> Rect {
        Rect::new(100.0, 100.0, 200.0, 100.0)
    }

    fn hit(x: f64, y: f64) -> EdgeRegion {
        hit_test(bx(), Point::new(x, y), MARGIN)
    }

    #[test]
    fn test_corners() {
        assert_eq!(hit(100.0, 100.0), EdgeRegion::TopLeft);
        assert_eq!(hit(79.0, 79.0), EdgeRegion::TopLeft);
        assert_eq!(hit(300.0, 100.0), EdgeRegion::TopRight);
        assert_eq!(hit(100.0, 200.0), EdgeRegion::BottomLeft);
        assert_eq!(hit(300.0, 200.0), EdgeRegion::BottomRight);
    }

    #[test]
    fn test_edges() {
        assert_eq!(hit(200.0, 95.0), EdgeRegion::Top);
        assert_eq!(hit(200.0, 205.0), EdgeRegion::Bottom);
        assert_eq!(hit(95.0, 150.0), EdgeRegion::Left);
        assert_eq!(hit(305.0, 150.0), EdgeRegion::Right);
    }

    #[test]
    fn test_center() {
        assert_eq!(hit(200.0, 150.0), EdgeRegion::Center);
    }

    #[test]
    fn test_outside_is_none() {
        assert_eq!(hit(50.0, 50.0), EdgeRegion::None);
        assert_eq!(hit(200.0, 250.0), EdgeRegion::None);
        // Grown frame is half-open: max edge is outside.
        assert_eq!(hit(322.0, 150.0), EdgeRegion::None);
    }

    #[test]
    fn test_corner_beats_edge() {
        // Inside both the top strip and the top-left square.
        assert_eq!(hit(120.0, 90.0), EdgeRegion::TopLeft);
    }

    #[test]
    fn test_small_box_corners_overlap() {
        // With a 42-wide box all four corner squares overlap the middle.
        let small = Rect::new(0.0, 0.0, 42.0, 42.0);
        assert_eq!(
            hit_test(small, Point::new(21.0, 21.0), MARGIN),
            EdgeRegion::TopLeft
        );
    }

    #[test]
    fn test_region_flags() {
        assert!(EdgeRegion::TopLeft.moves_left() && EdgeRegion::TopLeft.moves_top());
        assert!(EdgeRegion::Right.moves_right() && !EdgeRegion::Right.moves_top());
        assert!(!EdgeRegion::Center.is_corner());
        assert!(EdgeRegion::BottomRight.is_corner());
    }

    #[test]
    fn test_corner_for_direction() {
        assert_eq!(EdgeRegion::corner_for_direction(5.0, 5.0), EdgeRegion::BottomRight);
        assert_eq!(EdgeRegion::corner_for_direction(-5.0, 5.0), EdgeRegion::BottomLeft);
        assert_eq!(EdgeRegion::corner_for_direction(5.0, -5.0), EdgeRegion::TopRight);
        assert_eq!(EdgeRegion::corner_for_direction(-5.0, -5.0), EdgeRegion::TopLeft);
    }
}
