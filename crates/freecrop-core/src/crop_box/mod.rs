//! Crop box controller.
//!
//! Owns the rectangular crop frame for one editing session and turns a
//! stream of pan-gesture points into frame updates.
//!
//! # State Machine
//!
//! ```text
//! InitialDraw --(drag >= threshold)--> Resizing(corner)
//! Idle --(begin on handle)--> Dragging | Resizing(edge) --(end/cancel)--> Idle
//! any --(deselect)--> InitialDraw
//! ```
//!
//! Every frame change goes through [`CropBoxController::set_crop_box`],
//! which enforces containment and the minimum size, then queues a
//! [`SelectionEvent::CropBoxChanged`] for the host to pick up later.

mod hit_test;
mod resize;

pub use hit_test::{hit_test, EdgeRegion};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::events::{EventQueue, SelectionEvent};
use crate::geometry::{distance, Point, Rect};
use crate::history::{UndoStack, DEFAULT_UNDO_CAPACITY};
use resize::{resize_frame, ResizeInput};

/// Widths and heights below this are treated as a transient zero-size box.
const SIZE_EPSILON: f64 = f32::EPSILON as f64;

/// Tunables for [`CropBoxController`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropBoxConfig {
    /// Smallest width and height the box may take.
    pub minimum_box_size: f64,
    /// How far outside the box a handle still grabs; handles are twice this.
    pub hit_margin: f64,
    /// Distance the pointer must travel before a first box is drawn.
    ///
    /// Empirically tuned; there is no geometric reason for this exact value.
    pub initial_draw_threshold: f64,
    /// Let the box shrink when dragged into the content edge instead of
    /// stopping at it.
    pub resize_on_drag_to_edge: bool,
    /// Number of box snapshots kept for undo.
    pub undo_capacity: usize,
}

impl Default for CropBoxConfig {
    fn default() -> Self {
        Self {
            minimum_box_size: 42.0,
            hit_margin: 22.0,
            initial_draw_threshold: 50.0,
            resize_on_drag_to_edge: true,
            undo_capacity: DEFAULT_UNDO_CAPACITY,
        }
    }
}

/// Where the controller is in its gesture lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropBoxState {
    /// No box yet; the next drag draws one.
    InitialDraw,
    /// A box exists and no gesture is running.
    Idle,
    /// The whole box is being moved.
    Dragging,
    /// An edge or corner is being dragged.
    Resizing(EdgeRegion),
}

/// The rectangle-selection state machine.
#[derive(Debug, Clone)]
pub struct CropBoxController {
    config: CropBoxConfig,
    crop_box: Rect,
    content_bounds: Rect,
    aspect_locked: bool,
    state: CropBoxState,
    tapped_edge: EdgeRegion,
    drag_origin: Rect,
    pan_origin: Point,
    prev_point: Point,
    draw_anchor: Option<Point>,
    undo: UndoStack<Rect>,
    events: EventQueue,
}

impl CropBoxController {
    /// Create a controller with no box, waiting for an initial draw.
    pub fn new(content_bounds: Rect, config: CropBoxConfig) -> Self {
        let undo = UndoStack::with_capacity(config.undo_capacity);
        Self {
            config,
            crop_box: Rect::ZERO,
            content_bounds,
            aspect_locked: false,
            state: CropBoxState::InitialDraw,
            tapped_edge: EdgeRegion::None,
            drag_origin: Rect::ZERO,
            pan_origin: Point::ZERO,
            prev_point: Point::ZERO,
            draw_anchor: None,
            undo,
            events: EventQueue::new(),
        }
    }

    pub fn config(&self) -> &CropBoxConfig {
        &self.config
    }

    pub fn crop_box(&self) -> Rect {
        self.crop_box
    }

    pub fn content_bounds(&self) -> Rect {
        self.content_bounds
    }

    pub fn state(&self) -> CropBoxState {
        self.state
    }

    pub fn tapped_edge(&self) -> EdgeRegion {
        self.tapped_edge
    }

    /// The box as it was when the current gesture started.
    pub fn drag_origin(&self) -> Rect {
        self.drag_origin
    }

    pub fn is_initial_draw(&self) -> bool {
        self.state == CropBoxState::InitialDraw
    }

    pub fn is_aspect_locked(&self) -> bool {
        self.aspect_locked
    }

    pub fn set_aspect_locked(&mut self, locked: bool) {
        self.aspect_locked = locked;
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Hit-test `point` against the current box.
    pub fn hit_test(&self, point: Point) -> EdgeRegion {
        hit_test(self.crop_box, point, self.config.hit_margin)
    }

    /// Whether a pan gesture starting at `point` should be accepted.
    ///
    /// An initial draw must start inside the content bounds; any other
    /// gesture must start within the hit margin of the box.
    pub fn should_begin(&self, point: Point) -> bool {
        if self.is_initial_draw() {
            return self.content_bounds.contains(point);
        }
        let margin = self.config.hit_margin;
        self.crop_box.inset(-margin, -margin).contains(point)
    }

    /// Start a pan gesture.
    pub fn begin_gesture(&mut self, point: Point) {
        if self.is_initial_draw() {
            debug!("Initial draw anchored at ({}, {})", point.x, point.y);
            self.draw_anchor = Some(point);
            return;
        }
        let edge = self.hit_test(point);
        self.start_manipulation(point, edge);
    }

    /// Feed the next pointer position of the running gesture.
    pub fn update_gesture(&mut self, point: Point) {
        if self.is_initial_draw() {
            self.update_initial_draw(point);
            return;
        }
        self.apply_gesture_point(point);
    }

    /// Finish the running gesture at `point`.
    pub fn end_gesture(&mut self, point: Point) {
        if !self.is_initial_draw() {
            self.apply_gesture_point(point);
        }
        self.finish_gesture();
    }

    /// Abandon the running gesture, keeping the box where it is.
    ///
    /// The undo snapshot taken when the gesture began is kept.
    pub fn cancel_gesture(&mut self) {
        self.finish_gesture();
    }

    /// Authoritative box setter.
    ///
    /// 1. Ignores an unchanged box and boxes with a near-zero dimension
    /// 2. Snaps the origin into the content bounds (floor, with the content
    ///    origin rounded up) and trims the size by any amount the origin
    ///    had to move
    /// 3. Caps the size at the far content edges, then raises it to the
    ///    minimum, shifting the origin back if that overflows
    /// 4. Queues [`SelectionEvent::CropBoxChanged`]
    pub fn set_crop_box(&mut self, rect: Rect) {
        if rect == self.crop_box {
            return;
        }
        if !(rect.w >= SIZE_EPSILON && rect.h >= SIZE_EPSILON) {
            warn!("Ignoring degenerate crop box {}x{}", rect.w, rect.h);
            return;
        }

        let content = self.content_bounds;
        let min_size = self.config.minimum_box_size;
        let mut frame = rect;

        let x_origin = content.min_x().ceil();
        let x_delta = frame.x - x_origin;
        frame.x = frame.x.max(x_origin).floor();
        if x_delta < -SIZE_EPSILON {
            frame.w += x_delta;
        }

        let y_origin = content.min_y().ceil();
        let y_delta = frame.y - y_origin;
        frame.y = frame.y.max(y_origin).floor();
        if y_delta < -SIZE_EPSILON {
            frame.h += y_delta;
        }

        frame.w = frame.w.min(content.max_x() - frame.x).max(min_size);
        frame.h = frame.h.min(content.max_y() - frame.y).max(min_size);

        if frame.max_x() > content.max_x() {
            frame.x = content.max_x() - frame.w;
        }
        if frame.max_y() > content.max_y() {
            frame.y = content.max_y() - frame.h;
        }

        if frame == self.crop_box {
            return;
        }
        self.crop_box = frame;
        self.events.push(SelectionEvent::CropBoxChanged(frame));
    }

    /// Place a box without a gesture and leave initial-draw mode.
    pub fn place_box(&mut self, rect: Rect) {
        self.draw_anchor = None;
        self.state = CropBoxState::Idle;
        self.set_crop_box(rect);
    }

    /// Restore the most recent snapshot. Logs and does nothing when there
    /// is none.
    pub fn undo(&mut self) {
        let Some(previous) = self.undo.pop() else {
            warn!("Crop box undo requested with an empty history");
            return;
        };
        debug!("Undo crop box to {:?}", previous);
        if self.is_initial_draw() {
            self.state = CropBoxState::Idle;
        }
        self.set_crop_box(previous);
        self.events
            .push(SelectionEvent::UndoAvailabilityChanged(self.can_undo()));
    }

    /// Drop the box and wait for a new initial draw.
    pub fn deselect(&mut self) {
        self.crop_box = Rect::ZERO;
        self.state = CropBoxState::InitialDraw;
        self.tapped_edge = EdgeRegion::None;
        self.draw_anchor = None;
        self.events.push(SelectionEvent::CropBoxChanged(Rect::ZERO));
    }

    /// Forget every undo snapshot.
    pub fn clear_history(&mut self) {
        if self.undo.is_empty() {
            return;
        }
        self.undo.clear();
        self.events.push(SelectionEvent::UndoAvailabilityChanged(false));
    }

    /// Adopt new content bounds and recentre the existing box in them.
    ///
    /// Call this after any change to the area the box may occupy. Without a
    /// box only the bounds are updated.
    pub fn layout(&mut self, content_bounds: Rect) {
        self.content_bounds = content_bounds;
        if self.crop_box == Rect::ZERO {
            return;
        }

        let mut frame = self.crop_box;
        frame.w = frame.w.min(content_bounds.w);
        frame.h = frame.h.min(content_bounds.h);
        frame.x = content_bounds.x + ((content_bounds.w - frame.w) * 0.5).floor();
        frame.y = content_bounds.y + ((content_bounds.h - frame.h) * 0.5).floor();
        self.set_crop_box(frame);
    }

    /// Remove and return the events queued since the last call.
    pub fn take_events(&mut self) -> Vec<SelectionEvent> {
        self.events.take()
    }

    fn update_initial_draw(&mut self, point: Point) {
        let Some(anchor) = self.draw_anchor else {
            return;
        };
        if distance(anchor, point) < self.config.initial_draw_threshold {
            return;
        }

        let dx = point.x - anchor.x;
        let dy = point.y - anchor.y;
        let min_size = self.config.minimum_box_size;
        let mut rect = Rect::from_corners(anchor, point);
        rect.w = rect.w.max(min_size);
        rect.h = rect.h.max(min_size);
        if dx < 0.0 {
            rect.x = anchor.x - rect.w;
        }
        if dy < 0.0 {
            rect.y = anchor.y - rect.h;
        }

        self.draw_anchor = None;
        self.state = CropBoxState::Idle;
        self.set_crop_box(rect);
        debug!("Initial crop box drawn: {:?}", self.crop_box);

        // Hand over to a corner resize, with the pan origin on the corner
        // itself so the corner tracks the pointer exactly.
        let corner = EdgeRegion::corner_for_direction(dx, dy);
        let b = self.crop_box;
        let grip = Point::new(
            if corner.moves_left() { b.min_x() } else { b.max_x() },
            if corner.moves_top() { b.min_y() } else { b.max_y() },
        );
        self.start_manipulation(grip, corner);
        self.prev_point = point;
    }

    fn start_manipulation(&mut self, point: Point, edge: EdgeRegion) {
        self.tapped_edge = edge;
        if edge == EdgeRegion::None {
            debug!("Gesture at ({}, {}) missed the crop box", point.x, point.y);
            return;
        }

        self.pan_origin = point;
        self.prev_point = point;
        self.drag_origin = self.crop_box;
        self.undo.push(self.drag_origin);
        self.state = if edge == EdgeRegion::Center {
            CropBoxState::Dragging
        } else {
            CropBoxState::Resizing(edge)
        };
        debug!("Crop box gesture began on {:?}", edge);
    }

    fn finish_gesture(&mut self) {
        self.draw_anchor = None;
        if self.tapped_edge != EdgeRegion::None {
            self.events
                .push(SelectionEvent::UndoAvailabilityChanged(self.can_undo()));
        }
        self.tapped_edge = EdgeRegion::None;
        if !self.is_initial_draw() {
            self.state = CropBoxState::Idle;
        }
    }

    fn apply_gesture_point(&mut self, point: Point) {
        if self.tapped_edge == EdgeRegion::None {
            return;
        }

        let content = self.content_bounds;
        let clamped = Point::new(point.x.max(content.min_x()), point.y.max(content.min_y()));
        let dx = (clamped.x - self.pan_origin.x).ceil();
        let dy = (clamped.y - self.pan_origin.y).ceil();

        let frame = if self.tapped_edge == EdgeRegion::Center {
            self.dragged_frame(clamped, dx, dy)
        } else {
            resize_frame(ResizeInput {
                edge: self.tapped_edge,
                origin: self.drag_origin,
                content,
                dx,
                dy,
                aspect_locked: self.aspect_locked,
                min_size: self.config.minimum_box_size,
            })
        };
        self.set_crop_box(frame);
    }

    /// Frame for a whole-box drag.
    ///
    /// With resize-on-drag the box shrinks while it is pushed into the
    /// content edge: on the far sides through the setter's size cap, on the
    /// near sides by the pointer's movement since the previous point.
    /// Without it the box stops at the edges.
    fn dragged_frame(&mut self, clamped: Point, dx: f64, dy: f64) -> Rect {
        let content = self.content_bounds;
        let min_size = self.config.minimum_box_size;

        let mut frame = self.crop_box;
        frame.w = frame.w.max(min_size).min(content.w);
        frame.h = frame.h.max(min_size).min(content.h);
        frame.x = (self.drag_origin.x + dx)
            .max(content.min_x())
            .min(content.max_x() - min_size);
        frame.y = (self.drag_origin.y + dy)
            .max(content.min_y())
            .min(content.max_y() - min_size);

        if !self.config.resize_on_drag_to_edge {
            if frame.max_x() > content.max_x() {
                frame.x = content.max_x() - frame.w;
            }
            if frame.max_y() > content.max_y() {
                frame.y = content.max_y() - frame.h;
            }
        } else {
            if frame.x == content.min_x() {
                let delta = self.prev_point.x - clamped.x;
                if delta > 0.0 {
                    frame.w -= delta;
                }
            }
            if frame.y == content.min_y() {
                let delta = self.prev_point.y - clamped.y;
                if delta > 0.0 {
                    frame.h -= delta;
                }
            }
            self.prev_point = clamped;
        }

        frame
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
