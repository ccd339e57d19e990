//! FreeCrop Core - Interactive crop selection engine
//!
//! This crate provides the selection engine behind FreeCrop: the crop box
//! state machine, polygon and lasso path construction, the geometry they
//! share, and the masking and trimming that turn a finished selection into
//! a cropped bitmap.
//!
//! Most hosts only need [`SelectionCoordinator`]: feed it pointer events,
//! drain its [`SelectionEvent`]s on the next UI turn and call
//! [`SelectionCoordinator::finish`] when the user confirms.

use std::time::Duration;

pub mod codec;
pub mod crop_box;
pub mod events;
pub mod geometry;
pub mod history;
pub mod mask;
pub mod selection_path;
pub mod session;
pub mod trim;

pub use codec::{Bitmap, BitmapError, CodecError};
pub use crop_box::{CropBoxConfig, CropBoxController, CropBoxState, EdgeRegion};
pub use events::{EventQueue, SelectionEvent, SelectionFailure, SelectionObserver};
pub use geometry::{EdgeInsets, PathContour, Point, Rect};
pub use selection_path::{PathEngineConfig, PathMode, PathState, SelectionPathEngine};
#[cfg(feature = "parallel")]
pub use session::CropJob;
pub use session::{
    CropError, CropRequest, GestureKind, GesturePhase, PointerEvent, SelectionCoordinator,
    SelectionMode, SessionConfig,
};
pub use trim::{opaque_bounding_box, trim, trim_transparent, AlphaThreshold, PixelInsets};

/// How long to let layout settle after a device rotation when the host has
/// no rotation-complete signal.
pub const ROTATION_SETTLE_DELAY: Duration = Duration::from_millis(300);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_settle_delay() {
        assert_eq!(ROTATION_SETTLE_DELAY.as_millis(), 300);
    }

    #[test]
    fn test_lasso_session_end_to_end() {
        let mut session = SelectionCoordinator::new(
            400,
            300,
            Rect::new(0.0, 0.0, 428.0, 328.0),
            SelectionMode::Lasso,
            SessionConfig::default(),
        );

        let stroke = [
            Point::new(50.0, 50.0),
            Point::new(150.0, 50.0),
            Point::new(150.0, 150.0),
            Point::new(60.0, 150.0),
            Point::new(55.0, 145.0),
            Point::new(50.0, 60.0),
        ];
        session.pointer(PointerEvent::new(
            GestureKind::LassoPan,
            GesturePhase::Began,
            stroke[0],
            0.0,
        ));
        for (i, point) in stroke.iter().enumerate().skip(1) {
            session.pointer(PointerEvent::new(
                GestureKind::LassoPan,
                GesturePhase::Changed,
                *point,
                i as f64 * 16.0,
            ));
        }
        assert!(session.can_crop());

        let events = session.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, SelectionEvent::SelectionCompleted(c) if c.is_closed())));

        let source = Bitmap::new(400, 300, vec![200u8; 400 * 300 * 4]);
        let cropped = session.finish().unwrap().run(&source).unwrap();
        assert!(cropped.width <= 100 && cropped.height <= 100);
        assert!(cropped.width >= 90 && cropped.height >= 90);
        assert_eq!(cropped.alpha_at(cropped.width / 2, cropped.height / 2), Some(200));
    }
}
