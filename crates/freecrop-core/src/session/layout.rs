//! Placing the source image inside the host view.

use serde::{Deserialize, Serialize};

use crate::geometry::{EdgeInsets, Point, Rect};

/// Where the image sits inside the host view.
///
/// ```text
/// view_bounds
/// +---------------------------------+
/// |  image_area (view - padding)    |
/// |  +---------------------------+  |
/// |  | insets |content  | insets |  |
/// |  |        |bounds   |        |  |
/// |  +---------------------------+  |
/// +---------------------------------+
/// ```
///
/// `content_bounds` is the aspect-fitted image; the crop box never leaves
/// it. `insets` are the letterbox margins between it and `image_area`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageLayout {
    pub view_bounds: Rect,
    pub image_area: Rect,
    pub insets: EdgeInsets,
    pub content_bounds: Rect,
}

impl ImageLayout {
    /// Aspect-fit a `width` x `height` image into `view_bounds` shrunk by
    /// `padding` on every side.
    ///
    /// The fitted size is floored to whole units and centred, with the
    /// centring offset rounded.
    pub fn fit(view_bounds: Rect, padding: f64, width: u32, height: u32) -> Self {
        let mut image_area = view_bounds.inset(padding, padding);
        image_area.w = image_area.w.max(0.0);
        image_area.h = image_area.h.max(0.0);

        let (iw, ih) = (f64::from(width), f64::from(height));
        let scale = (image_area.w / iw).min(image_area.h / ih);
        let scale = if scale.is_finite() { scale } else { 0.0 };
        let fitted_w = (iw * scale).floor();
        let fitted_h = (ih * scale).floor();

        let content_bounds = Rect::new(
            image_area.x + ((image_area.w - fitted_w) * 0.5).round(),
            image_area.y + ((image_area.h - fitted_h) * 0.5).round(),
            fitted_w,
            fitted_h,
        );
        let insets = EdgeInsets::new(
            content_bounds.min_y() - image_area.min_y(),
            content_bounds.min_x() - image_area.min_x(),
            image_area.max_y() - content_bounds.max_y(),
            image_area.max_x() - content_bounds.max_x(),
        );

        Self {
            view_bounds,
            image_area,
            insets,
            content_bounds,
        }
    }

    /// Half the fitted image size, centred in the content bounds.
    pub fn predefined_frame(&self) -> Rect {
        let c = self.content_bounds;
        let w = (c.w * 0.5).floor();
        let h = (c.h * 0.5).floor();
        let center = Point::new(c.mid_x(), c.mid_y());
        Rect::new((center.x - w * 0.5).floor(), (center.y - h * 0.5).floor(), w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_same_aspect_fills_area() {
        let layout = ImageLayout::fit(Rect::new(0.0, 0.0, 428.0, 328.0), 14.0, 800, 600);
        assert_eq!(layout.image_area, Rect::new(14.0, 14.0, 400.0, 300.0));
        assert_eq!(layout.content_bounds, Rect::new(14.0, 14.0, 400.0, 300.0));
        assert_eq!(layout.insets, EdgeInsets::ZERO);
    }

    #[test]
    fn test_fit_square_image_letterboxes_sides() {
        let layout = ImageLayout::fit(Rect::new(0.0, 0.0, 428.0, 328.0), 14.0, 400, 400);
        assert_eq!(layout.content_bounds, Rect::new(64.0, 14.0, 300.0, 300.0));
        assert_eq!(layout.insets, EdgeInsets::new(0.0, 50.0, 0.0, 50.0));
        assert_eq!(
            layout.image_area.inset_by(layout.insets),
            layout.content_bounds
        );
    }

    #[test]
    fn test_fit_floors_fitted_size() {
        let layout = ImageLayout::fit(Rect::new(0.0, 0.0, 100.0, 100.0), 0.0, 3, 2);
        assert_eq!(layout.content_bounds.w, 100.0);
        assert_eq!(layout.content_bounds.h, 66.0);
        assert_eq!(layout.content_bounds.y, 17.0);
    }

    #[test]
    fn test_fit_degenerate_view() {
        let layout = ImageLayout::fit(Rect::new(0.0, 0.0, 10.0, 10.0), 14.0, 100, 100);
        assert_eq!(layout.content_bounds.w, 0.0);
        assert_eq!(layout.content_bounds.h, 0.0);
    }

    #[test]
    fn test_predefined_frame_is_centred_half() {
        let layout = ImageLayout::fit(Rect::new(0.0, 0.0, 428.0, 328.0), 14.0, 800, 600);
        assert_eq!(layout.predefined_frame(), Rect::new(114.0, 89.0, 200.0, 150.0));
    }
}
