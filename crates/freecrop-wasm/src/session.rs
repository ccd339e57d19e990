//! Selection session WASM bindings.
//!
//! [`JsSelectionSession`] lets a browser host drive a
//! [`SelectionCoordinator`]: forward pointer events from its gesture
//! recognizers, drain notifications once per animation frame and finish
//! the crop against the source image.
//!
//! # Example
//!
//! ```typescript
//! const session = new JsSelectionSession(image.width, image.height, 0, 0, 428, 328, 'lasso');
//!
//! canvas.onpointermove = (e) => {
//!   session.pointer('lassoPan', 'changed', e.offsetX, e.offsetY, e.timeStamp);
//! };
//!
//! requestAnimationFrame(() => {
//!   session.flush_events((event) => {
//!     if (event.kind === 'cropBoxChanged') drawBox(event.value);
//!   });
//! });
//!
//! if (session.can_crop) {
//!   const cropped = session.finish(image);
//! }
//! ```
//!
//! Events are plain objects shaped `{ kind, value }`, where `kind` is the
//! camel-cased event name.

use freecrop_core::codec::Bitmap;
use freecrop_core::geometry::{Point, Rect};
use freecrop_core::session::{
    GestureKind, GesturePhase, PointerEvent, SelectionCoordinator, SelectionMode, SessionConfig,
};
use freecrop_core::PathContour;
use wasm_bindgen::prelude::*;

use crate::types::{js_error, JsBitmap};

/// A live selection session over one source image.
#[wasm_bindgen]
pub struct JsSelectionSession {
    inner: SelectionCoordinator,
}

#[wasm_bindgen]
impl JsSelectionSession {
    /// Start a session with the default configuration.
    ///
    /// # Arguments
    /// * `image_width`, `image_height` - Source size in pixels
    /// * `view_x`, `view_y`, `view_width`, `view_height` - Host view bounds
    /// * `mode` - `"rectangle"`, `"ellipse"`, `"polygon"` or `"lasso"`
    #[wasm_bindgen(constructor)]
    pub fn new(
        image_width: u32,
        image_height: u32,
        view_x: f64,
        view_y: f64,
        view_width: f64,
        view_height: f64,
        mode: &str,
    ) -> Result<JsSelectionSession, JsValue> {
        let view = Rect::new(view_x, view_y, view_width, view_height);
        Self::create(image_width, image_height, view, mode, SessionConfig::default())
            .map_err(js_error)
    }

    /// Start a session with a configuration object.
    ///
    /// Missing fields take their defaults, so `{ use_predefined_frame: true }`
    /// is a complete configuration.
    #[allow(clippy::too_many_arguments)]
    pub fn with_config(
        image_width: u32,
        image_height: u32,
        view_x: f64,
        view_y: f64,
        view_width: f64,
        view_height: f64,
        mode: &str,
        config: JsValue,
    ) -> Result<JsSelectionSession, JsValue> {
        let config: SessionConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid session config: {}", e)))?;
        let view = Rect::new(view_x, view_y, view_width, view_height);
        Self::create(image_width, image_height, view, mode, config).map_err(js_error)
    }

    /// Forward one pointer event.
    ///
    /// `gesture` is `"cropPan"`, `"polygonTap"`, `"lassoPan"` or
    /// `"doubleTap"`; `phase` is `"began"`, `"changed"`, `"ended"` or
    /// `"cancelled"`. Returns whether the event was consumed.
    pub fn pointer(
        &mut self,
        gesture: &str,
        phase: &str,
        x: f64,
        y: f64,
        timestamp: f64,
    ) -> Result<bool, JsValue> {
        self.handle_pointer(gesture, phase, Point::new(x, y), timestamp)
            .map_err(js_error)
    }

    /// Whether a recognizer for `gesture` should start at `(x, y)`.
    pub fn should_begin(&self, gesture: &str, x: f64, y: f64) -> Result<bool, JsValue> {
        let kind = parse_gesture(gesture).map_err(js_error)?;
        Ok(self.inner.should_begin(kind, Point::new(x, y)))
    }

    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = parse_mode(mode).map_err(js_error)?;
        self.inner.set_mode(mode);
        Ok(())
    }

    pub fn set_aspect_locked(&mut self, locked: bool) {
        self.inner.set_aspect_locked(locked);
    }

    /// Re-fit the image after the host view was resized.
    pub fn set_view_bounds(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.inner.set_view_bounds(Rect::new(x, y, width, height));
    }

    pub fn undo(&mut self) {
        self.inner.undo();
    }

    #[wasm_bindgen(getter)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_crop(&self) -> bool {
        self.inner.can_crop()
    }

    /// Drop the selection and start over.
    pub fn clear(&mut self) {
        self.inner.deselect();
    }

    pub fn begin_orientation_change(&mut self) {
        self.inner.begin_orientation_change();
    }

    pub fn complete_orientation_change(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.inner
            .complete_orientation_change(Rect::new(x, y, width, height));
    }

    /// Crop box as `[x, y, width, height]`.
    pub fn crop_box(&self) -> Vec<f64> {
        rect_to_vec(self.inner.crop_box())
    }

    /// Displayed image bounds as `[x, y, width, height]`.
    pub fn content_bounds(&self) -> Vec<f64> {
        rect_to_vec(self.inner.content_bounds())
    }

    /// Selection outline in view units as `[x0, y0, x1, y1, ...]`, empty
    /// until the selection can be cropped.
    pub fn selection_outline(&self) -> Vec<f64> {
        self.inner
            .selection_contour()
            .map(|contour| contour_to_vec(&contour))
            .unwrap_or_default()
    }

    /// Deliver queued events to `callback`, oldest first. Returns how many
    /// were delivered.
    ///
    /// If `callback` throws, the error is rethrown and the events after the
    /// one being delivered stay queued for the next flush.
    pub fn flush_events(&mut self, callback: &js_sys::Function) -> Result<u32, JsValue> {
        let delivered = self.inner.try_drain_events(|event| {
            let value = serde_wasm_bindgen::to_value(&event)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            callback.call1(&JsValue::NULL, &value).map(|_| ())
        })?;
        Ok(delivered as u32)
    }

    /// End the session and cut the selection out of `source`.
    ///
    /// The session cannot be used afterwards.
    pub fn finish(self, source: &JsBitmap) -> Result<JsBitmap, JsValue> {
        let source = source.to_bitmap().map_err(js_error)?;
        self.finish_with(&source)
            .map(JsBitmap::from_bitmap)
            .map_err(js_error)
    }
}

impl JsSelectionSession {
    pub(crate) fn create(
        image_width: u32,
        image_height: u32,
        view: Rect,
        mode: &str,
        config: SessionConfig,
    ) -> Result<Self, String> {
        let mode = parse_mode(mode)?;
        if image_width == 0 || image_height == 0 {
            return Err(format!(
                "Invalid image size {}x{}: both dimensions must be non-zero",
                image_width, image_height
            ));
        }
        Ok(Self {
            inner: SelectionCoordinator::new(image_width, image_height, view, mode, config),
        })
    }

    pub(crate) fn handle_pointer(
        &mut self,
        gesture: &str,
        phase: &str,
        point: Point,
        timestamp: f64,
    ) -> Result<bool, String> {
        let event = PointerEvent::new(parse_gesture(gesture)?, parse_phase(phase)?, point, timestamp);
        Ok(self.inner.pointer(event))
    }

    pub(crate) fn finish_with(self, source: &Bitmap) -> Result<Bitmap, String> {
        let request = self.inner.finish().map_err(|e| e.to_string())?;
        request.run(source).map_err(|e| e.to_string())
    }
}

pub(crate) fn parse_mode(mode: &str) -> Result<SelectionMode, String> {
    match mode {
        "rectangle" => Ok(SelectionMode::Rectangle),
        "ellipse" => Ok(SelectionMode::Ellipse),
        "polygon" => Ok(SelectionMode::Polygon),
        "lasso" => Ok(SelectionMode::Lasso),
        other => Err(format!("Unknown selection mode: {}", other)),
    }
}

pub(crate) fn parse_gesture(gesture: &str) -> Result<GestureKind, String> {
    match gesture {
        "cropPan" => Ok(GestureKind::CropPan),
        "polygonTap" => Ok(GestureKind::PolygonTap),
        "lassoPan" => Ok(GestureKind::LassoPan),
        "doubleTap" => Ok(GestureKind::DoubleTap),
        other => Err(format!("Unknown gesture: {}", other)),
    }
}

pub(crate) fn parse_phase(phase: &str) -> Result<GesturePhase, String> {
    match phase {
        "began" => Ok(GesturePhase::Began),
        "changed" => Ok(GesturePhase::Changed),
        "ended" => Ok(GesturePhase::Ended),
        "cancelled" => Ok(GesturePhase::Cancelled),
        other => Err(format!("Unknown gesture phase: {}", other)),
    }
}

fn rect_to_vec(rect: Rect) -> Vec<f64> {
    vec![rect.x, rect.y, rect.w, rect.h]
}

fn contour_to_vec(contour: &PathContour) -> Vec<f64> {
    contour.points().iter().flat_map(|p| [p.x, p.y]).collect()
}


/// WASM-specific tests that require JsValue.
///
/// These tests use functions that return `Result<T, JsValue>` and can only
/// run on wasm32 targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_constructor_and_pointer() {
        let mut s = JsSelectionSession::new(800, 600, 0.0, 0.0, 428.0, 328.0, "rectangle").unwrap();
        assert!(s.pointer("cropPan", "began", 54.0, 54.0, 0.0).unwrap());
        assert!(s.pointer("cropPan", "changed", 154.0, 114.0, 16.0).unwrap());
        assert!(s.pointer("cropPan", "ended", 154.0, 114.0, 32.0).unwrap());
        assert!(s.pointer("swipe", "began", 0.0, 0.0, 0.0).is_err());
        assert!(s.can_crop());
    }

    #[wasm_bindgen_test]
    fn test_with_config_object() {
        let config = serde_wasm_bindgen::to_value(&SessionConfig {
            use_predefined_frame: true,
            ..Default::default()
        })
        .unwrap();
        let s = JsSelectionSession::with_config(800, 600, 0.0, 0.0, 428.0, 328.0, "ellipse", config)
            .unwrap();
        assert_eq!(s.crop_box(), vec![114.0, 89.0, 200.0, 150.0]);
    }

    #[wasm_bindgen_test]
    fn test_flush_events_calls_back() {
        let mut s = JsSelectionSession::new(800, 600, 0.0, 0.0, 428.0, 328.0, "polygon").unwrap();
        let callback = js_sys::Function::new_no_args("");
        // Box placed on the content bounds, then ready for gestures.
        assert_eq!(s.flush_events(&callback).unwrap(), 2);
        assert_eq!(s.flush_events(&callback).unwrap(), 0);
    }

    #[wasm_bindgen_test]
    fn test_throwing_callback_keeps_remaining_events() {
        let mut s = JsSelectionSession::new(800, 600, 0.0, 0.0, 428.0, 328.0, "polygon").unwrap();
        let throw_once = js_sys::Function::new_with_args(
            "event",
            "if (!globalThis.__freecropThrown) { globalThis.__freecropThrown = true; throw new Error('boom'); }",
        );
        assert!(s.flush_events(&throw_once).is_err());
        // The box change was handed over; ready-for-gestures is still queued.
        assert_eq!(s.flush_events(&throw_once).unwrap(), 1);
        assert_eq!(s.flush_events(&throw_once).unwrap(), 0);
    }

    #[wasm_bindgen_test]
    fn test_finish_through_bindings() {
        let mut s = JsSelectionSession::new(800, 600, 0.0, 0.0, 428.0, 328.0, "rectangle").unwrap();
        s.pointer("cropPan", "began", 54.0, 54.0, 0.0).unwrap();
        s.pointer("cropPan", "changed", 154.0, 114.0, 16.0).unwrap();
        s.pointer("cropPan", "ended", 154.0, 114.0, 32.0).unwrap();
        let source = JsBitmap::new(800, 600, vec![255u8; 800 * 600 * 4]);
        let cropped = s.finish(&source).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (200, 120));
    }

    #[wasm_bindgen_test]
    fn test_finish_incomplete_is_an_error() {
        let s = JsSelectionSession::new(800, 600, 0.0, 0.0, 428.0, 328.0, "lasso").unwrap();
        let source = JsBitmap::new(800, 600, vec![255u8; 800 * 600 * 4]);
        assert!(s.finish(&source).is_err());
    }
}
