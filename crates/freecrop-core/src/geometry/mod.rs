//! 2D geometry primitives for the selection engine.
//!
//! This module provides the stateless building blocks used by the crop box
//! controller and the free-form path engine:
//!
//! - [`Point`], [`Rect`] and [`EdgeInsets`] value types
//! - [`PathContour`], an ordered point list that can be closed exactly once
//! - Segment intersection and collinearity tests
//! - Fitting a contour into a target frame
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, `y` grows downwards
//! - Coordinates are view-space units unless a function says otherwise
//! - `Rect` containment is half-open: `min <= p < max`

mod contour;
mod fit;
mod intersect;

pub use contour::{ContourError, PathContour};
pub use fit::{bounding_box, fit_path_to_frame, map_path_between_frames};
pub use intersect::{
    are_collinear, bounding_box_contains, find_path_self_intersection,
    find_segment_path_intersection, path_self_intersects_new_point, segment_intersects_path,
    segments_intersect,
};

use serde::{Deserialize, Serialize};

/// A point in image or view space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Point) -> f64 {
        distance(self, other)
    }

    /// Return this point shifted by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// An axis-aligned rectangle.
///
/// Width and height are expected to be non-negative; constructors that take
/// two corners normalise the order for you.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 0.0,
        h: 0.0,
    };

    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Build the rectangle spanned by two arbitrary corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            w: (b.x - a.x).abs(),
            h: (b.y - a.y).abs(),
        }
    }

    /// A `size` x `size` square centred on `center`.
    pub fn centered_square(center: Point, size: f64) -> Self {
        Self {
            x: center.x - size / 2.0,
            y: center.y - size / 2.0,
            w: size,
            h: size,
        }
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.w
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.h
    }

    pub fn mid_x(&self) -> f64 {
        self.x + self.w * 0.5
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.h * 0.5
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// True when either dimension is zero (or negative).
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Half-open containment test (`min <= p < max`).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x < self.max_x() && p.y >= self.min_y() && p.y < self.max_y()
    }

    /// True when `other` lies entirely within this rectangle (edges inclusive).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x() >= self.min_x()
            && other.min_y() >= self.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// Shrink by `dx`/`dy` on every side. Negative values grow the rectangle.
    pub fn inset(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            w: self.w - 2.0 * dx,
            h: self.h - 2.0 * dy,
        }
    }

    /// Shrink by per-edge insets.
    pub fn inset_by(&self, insets: EdgeInsets) -> Rect {
        Rect {
            x: self.x + insets.left,
            y: self.y + insets.top,
            w: self.w - insets.left - insets.right,
            h: self.h - insets.top - insets.bottom,
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Width divided by height. Not finite for zero-height rectangles.
    pub fn aspect_ratio(&self) -> f64 {
        self.w / self.h
    }
}

/// Four margins measured inwards from the edges of a rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    pub const ZERO: EdgeInsets = EdgeInsets {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Same margin on all four sides.
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }
}
