//! Resize and move math for a crop box gesture.
//!
//! Everything here is a pure function of the box at gesture start (the
//! "drag origin"), the pointer delta and the content bounds. The controller
//! feeds the result through its authoritative setter, which applies the
//! final rounding and containment rules.

use crate::geometry::Rect;

use super::EdgeRegion;

/// Inputs shared by every resize branch.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResizeInput {
    pub edge: EdgeRegion,
    /// Box at gesture start.
    pub origin: Rect,
    /// Area the box must stay inside.
    pub content: Rect,
    pub dx: f64,
    pub dy: f64,
    pub aspect_locked: bool,
    pub min_size: f64,
}

/// New frame for an edge or corner drag.
///
/// Without aspect lock each grabbed edge follows the pointer on its own
/// axis, bounded by the content edge on one side and by `min_size` from
/// the fixed opposite edge on the other. The fixed edges never move.
///
/// With aspect lock the ratio is always `origin.w / origin.h`:
/// - Left/Right derive the height from the new width and stay centred
///   vertically on the origin box; Top/Bottom mirror that.
/// - Corners scale both dimensions by the mean of the two per-axis
///   factors, anchored at the opposite corner.
/// - Left and Top only shrink the box.
pub(crate) fn resize_frame(input: ResizeInput) -> Rect {
    if input.edge == EdgeRegion::None || input.edge == EdgeRegion::Center {
        return input.origin;
    }
    if input.aspect_locked {
        resize_locked(input)
    } else {
        resize_free(input)
    }
}

fn resize_free(input: ResizeInput) -> Rect {
    let ResizeInput {
        edge,
        origin,
        content,
        dx,
        dy,
        min_size,
        ..
    } = input;

    let mut left = origin.min_x();
    let mut right = origin.max_x();
    let mut top = origin.min_y();
    let mut bottom = origin.max_y();

    if edge.moves_left() {
        left = clamp_between(origin.min_x() + dx, content.min_x(), right - min_size);
    }
    if edge.moves_right() {
        right = clamp_between(origin.max_x() + dx, left + min_size, content.max_x());
    }
    if edge.moves_top() {
        top = clamp_between(origin.min_y() + dy, content.min_y(), bottom - min_size);
    }
    if edge.moves_bottom() {
        bottom = clamp_between(origin.max_y() + dy, top + min_size, content.max_y());
    }

    Rect::new(left, top, right - left, bottom - top)
}

fn resize_locked(input: ResizeInput) -> Rect {
    let ResizeInput {
        edge,
        origin,
        content,
        mut dx,
        mut dy,
        min_size,
        ..
    } = input;

    let ratio = origin.w / origin.h;

    // Widest the box may get with its fixed edges where they are.
    let room_w = if edge.moves_left() {
        origin.max_x() - content.min_x()
    } else if edge.moves_right() {
        content.max_x() - origin.min_x()
    } else {
        content.w
    };
    let room_h = if edge.moves_top() {
        origin.max_y() - content.min_y()
    } else if edge.moves_bottom() {
        content.max_y() - origin.min_y()
    } else {
        content.h
    };

    let min_w = min_size.max(min_size * ratio);
    let max_w = room_w.min(room_h * ratio).max(min_w.min(room_w));

    let w = match edge {
        EdgeRegion::Left => {
            dx = dx.max(0.0);
            origin.w - dx
        }
        EdgeRegion::Right => origin.w + dx,
        EdgeRegion::Top => {
            dy = dy.max(0.0);
            (origin.h - dy) * ratio
        }
        EdgeRegion::Bottom => (origin.h + dy) * ratio,
        _ => {
            let (sx, sy) = corner_signs(edge);
            let scale_x = 1.0 + sx * dx / origin.w;
            let scale_y = 1.0 + sy * dy / origin.h;
            origin.w * (scale_x + scale_y) * 0.5
        }
    };
    let w = clamp_between(w, min_w, max_w);
    let h = w / ratio;

    let x = if edge.moves_left() {
        origin.max_x() - w
    } else if edge.moves_right() {
        origin.min_x()
    } else {
        clamp_between(
            origin.mid_x() - w * 0.5,
            content.min_x(),
            content.max_x() - w,
        )
    };
    let y = if edge.moves_top() {
        origin.max_y() - h
    } else if edge.moves_bottom() {
        origin.min_y()
    } else {
        clamp_between(
            origin.mid_y() - h * 0.5,
            content.min_y(),
            content.max_y() - h,
        )
    };

    Rect::new(x, y, w, h)
}

/// Direction in which a positive pointer delta grows the box, per axis.
fn corner_signs(edge: EdgeRegion) -> (f64, f64) {
    match edge {
        EdgeRegion::TopLeft => (-1.0, -1.0),
        EdgeRegion::TopRight => (1.0, -1.0),
        EdgeRegion::BottomLeft => (-1.0, 1.0),
        _ => (1.0, 1.0),
    }
}

/// `value.max(lo).min(hi)`, preferring `hi` when the range is empty.
#[inline]
fn clamp_between(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}
