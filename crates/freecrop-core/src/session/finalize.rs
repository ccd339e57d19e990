//! Turning a finished selection into pixels.
//!
//! The view works in layout units. Finalization maps the crop box back to
//! source pixels, fits the selection contour into that pixel frame, masks
//! everything outside it and trims the transparent margin.
//!
//! With the `parallel` feature a [`CropRequest`] can run on the rayon pool;
//! the caller polls the returned [`CropJob`] from its UI loop.

#[cfg(feature = "parallel")]
use std::sync::mpsc::{self, Receiver, TryRecvError};

use log::{debug, info};
use thiserror::Error;

use crate::codec::{Bitmap, BYTES_PER_PIXEL};
use crate::geometry::{fit_path_to_frame, EdgeInsets, PathContour, Rect};
use crate::mask::apply_contour_mask;
use crate::trim::{crop_to_rect, trim_transparent, AlphaThreshold, PixelRect};

/// Why a crop could not be produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    #[error("The selection is not complete")]
    IncompleteSelection,
    #[error("The displayed image is degenerate ({width}x{height})")]
    DegenerateBounds { width: f64, height: f64 },
    #[error("The selection does not cover any visible pixels")]
    EmptyCrop,
    #[error("The crop worker stopped before producing a result")]
    WorkerLost,
}

/// Map the crop box from view units to a source-pixel frame.
///
/// # Arguments
///
/// * `crop_box` - Crop box in view units
/// * `image_area` - Area the image was fitted into
/// * `insets` - Letterbox margins between `image_area` and the displayed image
/// * `image_width`, `image_height` - Source size in pixels
///
/// # Returns
///
/// The pixel frame: origin floored and clamped at zero, size ceiled and
/// clamped to the source size.
///
/// # Errors
///
/// [`CropError::DegenerateBounds`] when the displayed image has no area.
pub fn cropped_image_frame(
    crop_box: Rect,
    image_area: Rect,
    insets: EdgeInsets,
    image_width: u32,
    image_height: u32,
) -> Result<Rect, CropError> {
    let displayed = image_area.inset_by(insets);
    if !(displayed.w > 0.0 && displayed.h > 0.0) {
        return Err(CropError::DegenerateBounds {
            width: displayed.w,
            height: displayed.h,
        });
    }

    let (iw, ih) = (f64::from(image_width), f64::from(image_height));
    let dx = iw / displayed.w;
    let dy = ih / displayed.h;

    Ok(Rect::new(
        ((crop_box.x - image_area.x - insets.left) * dx).floor().max(0.0),
        ((crop_box.y - image_area.y - insets.top) * dy).floor().max(0.0),
        (crop_box.w * dx).ceil().min(iw),
        (crop_box.h * dy).ceil().min(ih),
    ))
}

/// Cut the selection out of `source`.
///
/// # Algorithm
///
/// 1. Map the crop box to a pixel frame with [`cropped_image_frame`]
/// 2. Copy that frame out of the source
/// 3. Fit the contour into the frame and clear everything outside it
/// 4. Trim the transparent margin left by the mask
///
/// # Errors
///
/// - [`CropError::IncompleteSelection`] for a contour with fewer than
///   three points
/// - [`CropError::DegenerateBounds`] when the image is not displayed
/// - [`CropError::EmptyCrop`] when no pixel survives the mask
pub fn compute_cropped_image(
    source: &Bitmap,
    contour: &PathContour,
    crop_box: Rect,
    image_area: Rect,
    insets: EdgeInsets,
    threshold: AlphaThreshold,
) -> Result<Bitmap, CropError> {
    if contour.len() < 3 {
        return Err(CropError::IncompleteSelection);
    }

    let frame = cropped_image_frame(crop_box, image_area, insets, source.width, source.height)?;
    // Frame values are whole and non-negative.
    let region = PixelRect::new(frame.x as u32, frame.y as u32, frame.w as u32, frame.h as u32);
    debug!("Cropping source pixels {:?}", region);

    let mut cropped = crop_to_rect(source, region);
    let path = fit_path_to_frame(contour, frame)
        .translated(-f64::from(region.x), -f64::from(region.y));
    apply_contour_mask(&mut cropped, &path);

    let visible = cropped
        .pixels
        .chunks_exact(BYTES_PER_PIXEL)
        .any(|px| threshold.passes(px[3]));
    if !visible {
        return Err(CropError::EmptyCrop);
    }

    let result = trim_transparent(&cropped, threshold);
    info!(
        "Cropped {}x{} source to {}x{}",
        source.width, source.height, result.width, result.height
    );
    Ok(result)
}

/// Everything needed to finish a crop, detached from the session.
#[derive(Debug, Clone, PartialEq)]
pub struct CropRequest {
    /// Selection contour in view units.
    pub contour: PathContour,
    pub crop_box: Rect,
    pub image_area: Rect,
    pub insets: EdgeInsets,
    pub threshold: AlphaThreshold,
}

impl CropRequest {
    /// Run the crop on the calling thread.
    pub fn run(&self, source: &Bitmap) -> Result<Bitmap, CropError> {
        compute_cropped_image(
            source,
            &self.contour,
            self.crop_box,
            self.image_area,
            self.insets,
            self.threshold,
        )
    }

    /// Run the crop on the rayon pool.
    #[cfg(feature = "parallel")]
    pub fn spawn(self, source: Bitmap) -> CropJob {
        let (sender, receiver) = mpsc::channel();
        rayon::spawn(move || {
            let result = self.run(&source);
            // The receiver may have been dropped; nobody wants the result then.
            let _ = sender.send(result);
        });
        CropJob { receiver }
    }
}

/// A crop running in the background.
#[cfg(feature = "parallel")]
#[derive(Debug)]
pub struct CropJob {
    receiver: Receiver<Result<Bitmap, CropError>>,
}

#[cfg(feature = "parallel")]
impl CropJob {
    /// Non-blocking poll. `None` while the crop is still running.
    ///
    /// The result is handed out once; polling again afterwards reports
    /// [`CropError::WorkerLost`].
    pub fn try_result(&self) -> Option<Result<Bitmap, CropError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(CropError::WorkerLost)),
        }
    }

    /// Block until the crop finishes.
    pub fn wait(self) -> Result<Bitmap, CropError> {
        self.receiver.recv().unwrap_or(Err(CropError::WorkerLost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn opaque(width: u32, height: u32) -> Bitmap {
        Bitmap::new(
            width,
            height,
            vec![255u8; width as usize * height as usize * BYTES_PER_PIXEL],
        )
    }

    fn request(contour: PathContour, crop_box: Rect) -> CropRequest {
        CropRequest {
            contour,
            crop_box,
            image_area: Rect::new(14.0, 14.0, 400.0, 300.0),
            insets: EdgeInsets::ZERO,
            threshold: AlphaThreshold::default(),
        }
    }

    #[test]
    fn test_frame_scales_to_pixels() {
        let frame = cropped_image_frame(
            Rect::new(114.0, 64.0, 200.0, 150.0),
            Rect::new(14.0, 14.0, 400.0, 300.0),
            EdgeInsets::ZERO,
            800,
            600,
        )
        .unwrap();
        assert_eq!(frame, Rect::new(200.0, 100.0, 400.0, 300.0));
    }

    #[test]
    fn test_frame_accounts_for_letterbox() {
        let frame = cropped_image_frame(
            Rect::new(64.0, 14.0, 300.0, 300.0),
            Rect::new(14.0, 14.0, 400.0, 300.0),
            EdgeInsets::new(0.0, 50.0, 0.0, 50.0),
            400,
            400,
        )
        .unwrap();
        assert_eq!(frame.x, 0.0);
        assert_eq!(frame.y, 0.0);
        assert_eq!(frame.w, 400.0);
        assert_eq!(frame.h, 400.0);
    }

    #[test]
    fn test_frame_floors_origin_and_ceils_size() {
        let frame = cropped_image_frame(
            Rect::new(10.5, 10.5, 10.25, 10.25),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            EdgeInsets::ZERO,
            200,
            200,
        )
        .unwrap();
        assert_eq!(frame, Rect::new(21.0, 21.0, 21.0, 21.0));
    }

    #[test]
    fn test_frame_clamps_origin_and_size() {
        let frame = cropped_image_frame(
            Rect::new(-10.0, 0.0, 500.0, 50.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            EdgeInsets::ZERO,
            100,
            100,
        )
        .unwrap();
        assert_eq!(frame.x, 0.0);
        assert_eq!(frame.w, 100.0);
    }

    #[test]
    fn test_frame_rejects_degenerate_display() {
        let err = cropped_image_frame(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(0.0, 0.0, 100.0, 100.0),
            EdgeInsets::new(0.0, 50.0, 0.0, 50.0),
            100,
            100,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CropError::DegenerateBounds {
                width: 0.0,
                height: 100.0
            }
        );
    }

    #[test]
    fn test_rectangle_crop_keeps_every_pixel() {
        let source = opaque(800, 600);
        let crop_box = Rect::new(114.0, 64.0, 200.0, 150.0);
        let result = request(PathContour::rectangle(crop_box), crop_box)
            .run(&source)
            .unwrap();
        assert_eq!((result.width, result.height), (400, 300));
        assert!(result.pixels.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn test_ellipse_crop_clears_corners() {
        let source = opaque(800, 600);
        let crop_box = Rect::new(114.0, 64.0, 200.0, 150.0);
        let result = request(PathContour::ellipse(crop_box, 96), crop_box)
            .run(&source)
            .unwrap();

        assert!(result.width <= 400 && result.width >= 396);
        assert!(result.height <= 300 && result.height >= 296);
        assert_eq!(result.alpha_at(0, 0), Some(0));
        assert_eq!(
            result.alpha_at(result.width / 2, result.height / 2),
            Some(255)
        );
    }

    #[test]
    fn test_triangle_crop_is_trimmed_to_shape() {
        let source = opaque(400, 300);
        let contour = PathContour::from_points(vec![
            Point::new(14.0, 14.0),
            Point::new(114.0, 14.0),
            Point::new(14.0, 114.0),
        ]);
        let crop_box = Rect::new(14.0, 14.0, 100.0, 100.0);
        let result = request(contour, crop_box).run(&source).unwrap();

        // The hypotenuse leaves the last row and column without a pixel
        // centre inside the shape.
        assert_eq!((result.width, result.height), (99, 99));
        assert_eq!(result.alpha_at(0, 0), Some(255));
        assert_eq!(result.alpha_at(0, 98), Some(255));
        assert_eq!(result.alpha_at(98, 98), Some(0));
    }

    #[test]
    fn test_transparent_selection_is_empty_crop() {
        let source = Bitmap::transparent(400, 300);
        let crop_box = Rect::new(14.0, 14.0, 100.0, 100.0);
        let err = request(PathContour::rectangle(crop_box), crop_box)
            .run(&source)
            .unwrap_err();
        assert_eq!(err, CropError::EmptyCrop);
    }

    #[test]
    fn test_short_contour_is_incomplete() {
        let source = opaque(400, 300);
        let contour =
            PathContour::from_points(vec![Point::new(14.0, 14.0), Point::new(50.0, 50.0)]);
        let err = request(contour, Rect::new(14.0, 14.0, 36.0, 36.0))
            .run(&source)
            .unwrap_err();
        assert_eq!(err, CropError::IncompleteSelection);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CropError::EmptyCrop.to_string(),
            "The selection does not cover any visible pixels"
        );
        assert_eq!(
            CropError::DegenerateBounds {
                width: 0.0,
                height: 5.0
            }
            .to_string(),
            "The displayed image is degenerate (0x5)"
        );
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_spawned_job_delivers_result_once() {
        let source = opaque(400, 300);
        let crop_box = Rect::new(14.0, 14.0, 100.0, 100.0);
        let job = request(PathContour::rectangle(crop_box), crop_box).spawn(source);

        let result = loop {
            if let Some(result) = job.try_result() {
                break result;
            }
            std::thread::yield_now();
        };
        assert_eq!(result.unwrap().width, 100);

        let after = loop {
            if let Some(result) = job.try_result() {
                break result;
            }
            std::thread::yield_now();
        };
        assert_eq!(after, Err(CropError::WorkerLost));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_wait_blocks_for_result() {
        let source = Bitmap::transparent(400, 300);
        let crop_box = Rect::new(14.0, 14.0, 100.0, 100.0);
        let job = request(PathContour::rectangle(crop_box), crop_box).spawn(source);
        assert_eq!(job.wait(), Err(CropError::EmptyCrop));
    }
}
