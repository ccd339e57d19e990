//! Bounding boxes and frame-to-frame path transforms.

use log::warn;

use super::{PathContour, Point, Rect};

/// Smallest rectangle containing every point, or `None` for no points.
pub fn bounding_box(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;

    let (mut min_x, mut min_y) = (first.x, first.y);
    let (mut max_x, mut max_y) = (first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
}

/// Uniformly scale `contour` so its bounding box fits `target`, centred.
///
/// The scale factor comes from whichever axis is the limiting dimension:
/// width when the contour is relatively wider than the target, height
/// otherwise. The scaled bounding box is then centred inside `target`.
///
/// # Arguments
///
/// * `contour` - Path to transform
/// * `target` - Frame the result should occupy
///
/// # Returns
///
/// The transformed contour. An empty contour, or one whose scale factor is
/// not a finite positive number (a single point, or a target with a
/// zero-sized axis), is returned unchanged.
pub fn fit_path_to_frame(contour: &PathContour, target: Rect) -> PathContour {
    let Some(bbox) = contour.bounding_box() else {
        return contour.clone();
    };

    let scale = if bbox.aspect_ratio() > target.aspect_ratio() {
        target.w / bbox.w
    } else {
        target.h / bbox.h
    };

    if !scale.is_finite() || scale <= 0.0 {
        warn!(
            "Cannot fit path with bounds {}x{} into {}x{}; scale factor is {}",
            bbox.w, bbox.h, target.w, target.h, scale
        );
        return contour.clone();
    }

    let center_x = (target.w - bbox.w * scale) / (2.0 * scale);
    let center_y = (target.h - bbox.h * scale) / (2.0 * scale);

    contour.map_points(|p| {
        Point::new(
            target.x + (p.x - bbox.x + center_x) * scale,
            target.y + (p.y - bbox.y + center_y) * scale,
        )
    })
}

/// Map `contour` from one frame onto another, scaling each axis
/// independently.
///
/// Used to keep a free-form selection glued to its crop box while the box
/// is resized. Returns the input unchanged when `from` has a zero-sized
/// axis.
pub fn map_path_between_frames(contour: &PathContour, from: Rect, to: Rect) -> PathContour {
    let sx = to.w / from.w;
    let sy = to.h / from.h;

    if !sx.is_finite() || !sy.is_finite() {
        warn!("Cannot map path from degenerate frame {}x{}", from.w, from.h);
        return contour.clone();
    }

    contour.map_points(|p| Point::new(to.x + (p.x - from.x) * sx, to.y + (p.y - from.y) * sy))
}
