//! Selection sessions.
//!
//! A [`SelectionCoordinator`] owns one editing session over one source
//! image. It lays the image out in the host view, routes pointer input to
//! the component that owns the current [`SelectionMode`] and merges their
//! notifications into a single queue.
//!
//! # Modes
//!
//! | Mode      | Input                         | Selection                     |
//! |-----------|-------------------------------|-------------------------------|
//! | Rectangle | crop-box pan                  | the crop box                  |
//! | Ellipse   | crop-box pan                  | ellipse inscribed in the box  |
//! | Polygon   | taps, then crop-box pan       | closed polygon, framed by box |
//! | Lasso     | lasso pan, then crop-box pan  | closed lasso, framed by box   |
//!
//! In the free-form modes the crop box fills the content bounds while the
//! path is drawn. Once it closes, the box snaps to the path's bounding box
//! and every later box change stretches the path with it.
//!
//! # Finishing
//!
//! [`SelectionCoordinator::finish`] consumes the session and returns a
//! [`CropRequest`] that turns a source [`Bitmap`](crate::codec::Bitmap)
//! into the masked, trimmed crop.

mod finalize;
mod layout;

#[cfg(feature = "parallel")]
pub use finalize::CropJob;
pub use finalize::{compute_cropped_image, cropped_image_frame, CropError, CropRequest};
pub use layout::ImageLayout;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::crop_box::{CropBoxConfig, CropBoxController};
use crate::events::{EventQueue, SelectionEvent, SelectionObserver};
use crate::geometry::{fit_path_to_frame, PathContour, Point, Rect};
use crate::selection_path::{PathEngineConfig, PathMode, PathState, SelectionPathEngine};
use crate::trim::AlphaThreshold;

/// The shape being selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionMode {
    Rectangle,
    Ellipse,
    Polygon,
    Lasso,
}

impl SelectionMode {
    /// The path-engine mode behind a free-form selection.
    pub fn path_mode(self) -> Option<PathMode> {
        match self {
            SelectionMode::Rectangle | SelectionMode::Ellipse => None,
            SelectionMode::Polygon => Some(PathMode::Polygon),
            SelectionMode::Lasso => Some(PathMode::Lasso),
        }
    }

    pub fn is_free_form(self) -> bool {
        self.path_mode().is_some()
    }
}

/// Which recognizer produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GestureKind {
    CropPan,
    PolygonTap,
    LassoPan,
    DoubleTap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// One pointer sample from the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub gesture: GestureKind,
    pub phase: GesturePhase,
    pub point: Point,
    /// Host timestamp in milliseconds. Only used for logging.
    pub timestamp: f64,
}

impl PointerEvent {
    pub fn new(gesture: GestureKind, phase: GesturePhase, point: Point, timestamp: f64) -> Self {
        Self {
            gesture,
            phase,
            point,
            timestamp,
        }
    }
}

/// Session-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub crop_box: CropBoxConfig,
    pub path_engine: PathEngineConfig,
    /// Start box modes with a centred box instead of waiting for a drag.
    pub use_predefined_frame: bool,
    /// Gap between the view edge and the fitted image.
    pub content_padding: f64,
    /// Segments used to approximate the ellipse selection.
    pub ellipse_segments: usize,
    /// Which pixels survive the final trim.
    pub alpha_threshold: AlphaThreshold,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            crop_box: CropBoxConfig::default(),
            path_engine: PathEngineConfig::default(),
            use_predefined_frame: false,
            content_padding: 14.0,
            ellipse_segments: 96,
            alpha_threshold: AlphaThreshold::default(),
        }
    }
}

/// Owns the crop box, the free-form path engine and the image layout for
/// one editing session.
#[derive(Debug)]
pub struct SelectionCoordinator {
    config: SessionConfig,
    image_width: u32,
    image_height: u32,
    mode: SelectionMode,
    layout: ImageLayout,
    crop_box: CropBoxController,
    path: Option<SelectionPathEngine>,
    pan_active: bool,
    rotating: bool,
    events: EventQueue,
}

impl SelectionCoordinator {
    /// Start a session for a `image_width` x `image_height` source shown in
    /// `view_bounds`.
    ///
    /// # Panics
    ///
    /// Panics if either image dimension is zero.
    pub fn new(
        image_width: u32,
        image_height: u32,
        view_bounds: Rect,
        mode: SelectionMode,
        config: SessionConfig,
    ) -> Self {
        assert!(
            image_width > 0 && image_height > 0,
            "a selection session needs a non-empty source image"
        );

        let layout = ImageLayout::fit(view_bounds, config.content_padding, image_width, image_height);
        let crop_box = CropBoxController::new(layout.content_bounds, config.crop_box.clone());
        info!(
            "Selection session for {}x{} image, content {:?}",
            image_width, image_height, layout.content_bounds
        );

        let mut session = Self {
            config,
            image_width,
            image_height,
            mode,
            layout,
            crop_box,
            path: None,
            pan_active: false,
            rotating: false,
            events: EventQueue::new(),
        };
        session.enter_mode();
        session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    pub fn layout(&self) -> &ImageLayout {
        &self.layout
    }

    pub fn content_bounds(&self) -> Rect {
        self.layout.content_bounds
    }

    pub fn crop_box(&self) -> Rect {
        self.crop_box.crop_box()
    }

    pub fn crop_box_controller(&self) -> &CropBoxController {
        &self.crop_box
    }

    /// The free-form path engine, present in Polygon and Lasso modes.
    pub fn path_engine(&self) -> Option<&SelectionPathEngine> {
        self.path.as_ref()
    }

    /// Mutable access for installing an intersection probe.
    pub fn path_engine_mut(&mut self) -> Option<&mut SelectionPathEngine> {
        self.path.as_mut()
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    /// Switch to another selection mode.
    ///
    /// In-progress geometry and all undo history are dropped. Moving between
    /// Rectangle and Ellipse keeps the box when predefined frames are on.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        if mode == self.mode {
            return;
        }
        let previous = self.mode;
        self.mode = mode;
        self.cancel_pan();
        self.crop_box.clear_history();

        let keep_box = self.config.use_predefined_frame
            && !previous.is_free_form()
            && !mode.is_free_form()
            && self.crop_box.crop_box() != Rect::ZERO;
        if keep_box {
            info!("Entering {:?} selection with the current box", mode);
            self.collect_events();
            self.events.push(SelectionEvent::ReadyForGestures);
        } else {
            self.enter_mode();
        }
    }

    pub fn set_aspect_locked(&mut self, locked: bool) {
        self.crop_box.set_aspect_locked(locked);
    }

    /// Route one pointer event. Returns whether it was consumed.
    ///
    /// # Behavior
    ///
    /// - Crop-box pans start only where [`CropBoxController::should_begin`]
    ///   allows and, in free-form modes, only once the path is closed
    /// - Polygon taps act on `Ended`
    /// - Lasso pans map to begin, extend, end and cancel stroke
    /// - A double tap clears a free-form selection
    /// - Everything is ignored while an orientation change is pending
    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        if self.rotating {
            debug!("Ignoring {:?} during orientation change", event.gesture);
            return false;
        }

        let handled = match event.gesture {
            GestureKind::CropPan => self.crop_pan(event.phase, event.point),
            GestureKind::PolygonTap => self.polygon_tap(event.phase, event.point),
            GestureKind::LassoPan => self.lasso_pan(event.phase, event.point),
            GestureKind::DoubleTap => self.double_tap(event.phase),
        };
        if handled {
            debug!(
                "{:?} {:?} at ({}, {}) t={}",
                event.gesture, event.phase, event.point.x, event.point.y, event.timestamp
            );
            self.collect_events();
        }
        handled
    }

    /// Whether a host recognizer of `kind` should start at `point`.
    pub fn should_begin(&self, kind: GestureKind, point: Point) -> bool {
        if self.rotating {
            return false;
        }
        match kind {
            GestureKind::CropPan => self.crop_box_interactive() && self.crop_box.should_begin(point),
            GestureKind::PolygonTap => self.mode == SelectionMode::Polygon,
            GestureKind::LassoPan => self.mode == SelectionMode::Lasso,
            GestureKind::DoubleTap => self.mode.is_free_form(),
        }
    }

    /// Undo the most recent change.
    ///
    /// In free-form modes a closed path first undoes crop-box changes; after
    /// those it reopens the path and the box returns to the content bounds.
    pub fn undo(&mut self) {
        if self.rotating {
            return;
        }
        match self.path.as_mut() {
            Some(engine) if !(engine.is_closed() && self.crop_box.can_undo()) => {
                let was_closed = engine.is_closed();
                engine.undo();
                if was_closed && !engine.is_closed() {
                    self.crop_box.clear_history();
                    self.crop_box.place_box(self.layout.content_bounds);
                }
            }
            _ => self.crop_box.undo(),
        }
        self.collect_events();
    }

    pub fn can_undo(&self) -> bool {
        match &self.path {
            None => self.crop_box.can_undo(),
            Some(engine) => engine.can_undo() || (engine.is_closed() && self.crop_box.can_undo()),
        }
    }

    /// Whether [`finish`](Self::finish) would succeed.
    ///
    /// False while the box is still being drawn, and in free-form modes
    /// until the path is closed.
    pub fn can_crop(&self) -> bool {
        let has_box = !self.crop_box.is_initial_draw() && self.crop_box.crop_box() != Rect::ZERO;
        has_box && self.path.as_ref().map_or(true, SelectionPathEngine::is_closed)
    }

    /// Drop the current selection and start over.
    ///
    /// Free-form modes clear the path and hand the whole content back to the
    /// path engine. Box modes return to the initial draw, or to the
    /// predefined frame when that is enabled.
    pub fn deselect(&mut self) {
        info!("Deselecting {:?} selection", self.mode);
        self.cancel_pan();
        self.crop_box.clear_history();
        match self.path.as_mut() {
            Some(engine) => {
                engine.clear();
                self.crop_box.place_box(self.layout.content_bounds);
            }
            None => self.reset_box(),
        }
        self.collect_events();
        self.events.push(SelectionEvent::ReadyForGestures);
    }

    /// The selection in view coordinates, once it can be cropped.
    pub fn selection_contour(&self) -> Option<PathContour> {
        if !self.can_crop() {
            return None;
        }
        let crop_box = self.crop_box.crop_box();
        let contour = match (&self.path, self.mode) {
            (Some(engine), _) => engine.contour().clone(),
            (None, SelectionMode::Ellipse) => {
                PathContour::ellipse(crop_box, self.config.ellipse_segments)
            }
            (None, _) => PathContour::rectangle(crop_box),
        };
        Some(contour)
    }

    /// The selection in source-pixel coordinates.
    pub fn crop_path(&self) -> Result<PathContour, CropError> {
        let contour = self
            .selection_contour()
            .ok_or(CropError::IncompleteSelection)?;
        let frame = cropped_image_frame(
            self.crop_box.crop_box(),
            self.layout.image_area,
            self.layout.insets,
            self.image_width,
            self.image_height,
        )?;
        Ok(fit_path_to_frame(&contour, frame))
    }

    /// End the session and package the selection for cropping.
    pub fn finish(self) -> Result<CropRequest, CropError> {
        let contour = self
            .selection_contour()
            .ok_or(CropError::IncompleteSelection)?;
        info!(
            "Finishing {:?} selection with box {:?}",
            self.mode,
            self.crop_box.crop_box()
        );
        Ok(CropRequest {
            contour,
            crop_box: self.crop_box.crop_box(),
            image_area: self.layout.image_area,
            insets: self.layout.insets,
            threshold: self.config.alpha_threshold,
        })
    }

    /// Re-fit the image into new view bounds.
    ///
    /// A box is recentred in the new content bounds. An open polygon or a
    /// paused lasso is carried over, scaled from the old content bounds to
    /// the new ones; a closed path follows its box.
    pub fn set_view_bounds(&mut self, view_bounds: Rect) {
        let previous = self.layout.content_bounds;
        self.layout = ImageLayout::fit(
            view_bounds,
            self.config.content_padding,
            self.image_width,
            self.image_height,
        );
        let content = self.layout.content_bounds;
        debug!("Relayout content {:?} -> {:?}", previous, content);

        self.crop_box.layout(content);
        if let Some(engine) = self.path.as_mut() {
            let snapshot = engine.snapshot();
            engine.set_bounds(content);
            if let Some(snapshot) = snapshot {
                engine.restore(snapshot.mapped(previous, content));
            }
            if !engine.is_closed() {
                self.crop_box.place_box(content);
            }
        }
        self.collect_events();
    }

    /// Freeze input ahead of a device rotation.
    ///
    /// A running crop-box gesture is cancelled and a lasso stroke in
    /// progress is paused, so the path survives the relayout.
    pub fn begin_orientation_change(&mut self) {
        info!("Orientation change started");
        self.cancel_pan();
        if let Some(engine) = self.path.as_mut() {
            if engine.mode() == PathMode::Lasso && engine.state() == PathState::Building {
                engine.cancel_stroke();
            }
        }
        self.rotating = true;
        self.collect_events();
    }

    /// Relayout for the rotated view and accept input again.
    ///
    /// Hosts without a rotation-complete signal should call this
    /// [`ROTATION_SETTLE_DELAY`](crate::ROTATION_SETTLE_DELAY) after the
    /// rotation starts.
    pub fn complete_orientation_change(&mut self, view_bounds: Rect) {
        self.rotating = false;
        self.set_view_bounds(view_bounds);
        info!("Orientation change completed");
        self.events.push(SelectionEvent::ReadyForGestures);
    }

    /// Remove and return the events queued since the last call.
    pub fn take_events(&mut self) -> Vec<SelectionEvent> {
        self.events.take()
    }

    /// Deliver pending events through a fallible callback, oldest first.
    ///
    /// Stops at the first error; events after the failing one stay queued.
    /// See [`EventQueue::try_drain`].
    pub fn try_drain_events<E>(
        &mut self,
        deliver: impl FnMut(SelectionEvent) -> Result<(), E>,
    ) -> Result<usize, E> {
        self.events.try_drain(deliver)
    }

    /// Deliver pending events to `observer`; returns how many were sent.
    pub fn dispatch_pending(&mut self, observer: &mut dyn SelectionObserver) -> usize {
        self.events.dispatch(observer)
    }

    fn enter_mode(&mut self) {
        info!("Entering {:?} selection", self.mode);
        let content = self.layout.content_bounds;
        match self.mode.path_mode() {
            Some(path_mode) => {
                self.path = Some(SelectionPathEngine::new(
                    path_mode,
                    content,
                    self.config.path_engine.clone(),
                ));
                self.crop_box.place_box(content);
            }
            None => {
                self.path = None;
                self.reset_box();
            }
        }
        self.collect_events();
        self.events.push(SelectionEvent::ReadyForGestures);
    }

    fn reset_box(&mut self) {
        if self.config.use_predefined_frame {
            self.crop_box.place_box(self.layout.predefined_frame());
        } else if !self.crop_box.is_initial_draw() {
            self.crop_box.deselect();
        }
    }

    fn crop_box_interactive(&self) -> bool {
        self.path.as_ref().map_or(true, SelectionPathEngine::is_closed)
    }

    fn cancel_pan(&mut self) {
        if self.pan_active {
            self.pan_active = false;
            self.crop_box.cancel_gesture();
        }
    }

    fn crop_pan(&mut self, phase: GesturePhase, point: Point) -> bool {
        if !self.crop_box_interactive() {
            return false;
        }
        match phase {
            GesturePhase::Began => {
                if !self.crop_box.should_begin(point) {
                    return false;
                }
                self.pan_active = true;
                self.crop_box.begin_gesture(point);
            }
            GesturePhase::Changed if self.pan_active => self.crop_box.update_gesture(point),
            GesturePhase::Ended if self.pan_active => {
                self.pan_active = false;
                self.crop_box.end_gesture(point);
            }
            GesturePhase::Cancelled if self.pan_active => self.cancel_pan(),
            _ => return false,
        }
        true
    }

    fn polygon_tap(&mut self, phase: GesturePhase, point: Point) -> bool {
        match (phase, self.path.as_mut()) {
            (GesturePhase::Ended, Some(engine)) if engine.mode() == PathMode::Polygon => {
                engine.tap(point);
                true
            }
            _ => false,
        }
    }

    fn lasso_pan(&mut self, phase: GesturePhase, point: Point) -> bool {
        let Some(engine) = self
            .path
            .as_mut()
            .filter(|engine| engine.mode() == PathMode::Lasso)
        else {
            return false;
        };
        match phase {
            GesturePhase::Began => engine.begin_stroke(point),
            GesturePhase::Changed => engine.extend_stroke(point),
            GesturePhase::Ended => engine.end_stroke(point),
            GesturePhase::Cancelled => engine.cancel_stroke(),
        }
        true
    }

    fn double_tap(&mut self, phase: GesturePhase) -> bool {
        if phase != GesturePhase::Ended || !self.mode.is_free_form() {
            return false;
        }
        self.deselect();
        true
    }

    /// Move events from the components into the session queue, applying
    /// the cross-component reactions on the way.
    fn collect_events(&mut self) {
        let path_events = self
            .path
            .as_mut()
            .map(SelectionPathEngine::take_events)
            .unwrap_or_default();
        for event in path_events {
            if let SelectionEvent::SelectionCompleted(contour) = &event {
                if let Some(frame) = contour.bounding_box() {
                    self.crop_box.place_box(frame);
                }
            }
            self.forward(event);
        }

        for event in self.crop_box.take_events() {
            if let SelectionEvent::CropBoxChanged(frame) = event {
                self.follow_crop_box(frame);
            }
            self.forward(event);
        }
    }

    fn follow_crop_box(&mut self, frame: Rect) {
        if let Some(engine) = self.path.as_mut() {
            if engine.is_closed() && frame != Rect::ZERO {
                engine.stretch_to_frame(frame);
            }
        }
    }

    /// Undo availability is reported for the session as a whole.
    fn forward(&mut self, event: SelectionEvent) {
        let event = match event {
            SelectionEvent::UndoAvailabilityChanged(_) => {
                SelectionEvent::UndoAvailabilityChanged(self.can_undo())
            }
            other => other,
        };
        self.events.push(event);
    }
}
