//! Free-form selection paths.
//!
//! [`SelectionPathEngine`] builds a closed [`PathContour`] from pointer
//! input in one of two modes:
//!
//! - **Polygon**: every tap adds a vertex. Tapping inside the polygon, or
//!   at a point whose new edge would cross it, closes the polygon.
//! - **Lasso**: a drag adds a point per sample. Returning to the lock
//!   region around the first point closes the loop; crossing the existing
//!   path or leaving the editable bounds fails the selection. Lifting the
//!   pointer early pauses the lasso (or fails it when pausing is off).
//!
//! # Lifecycle
//!
//! ```text
//! Empty -> Building -> Paused (lasso only) -> Building -> Closed
//!              \-------------- failure --------------> Empty
//! ```
//!
//! Outcomes are queued as [`SelectionEvent`]s for the host to collect.

mod lasso;
mod polygon;

use std::fmt;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::events::{EventQueue, SelectionEvent, SelectionFailure};
use crate::geometry::{map_path_between_frames, PathContour, Point, Rect};
use crate::history::{UndoStack, DEFAULT_UNDO_CAPACITY};

/// How points are fed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PathMode {
    Polygon,
    Lasso,
}

/// Tunables for [`SelectionPathEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathEngineConfig {
    /// Side of the square lock region centred on the first point.
    pub lock_region_size: f64,
    /// Lifting the pointer pauses a lasso instead of failing it.
    pub allow_pause_for_lasso: bool,
    /// Number of contour snapshots kept for undo.
    pub undo_capacity: usize,
}

impl Default for PathEngineConfig {
    fn default() -> Self {
        Self {
            lock_region_size: 30.0,
            allow_pause_for_lasso: true,
            undo_capacity: DEFAULT_UNDO_CAPACITY,
        }
    }
}

/// Coarse state of the engine, derived from its contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathState {
    Empty,
    Building,
    Paused,
    Closed,
}

/// A crossing found while extending a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionHit {
    /// The segment that was being added.
    pub segment: [Point; 2],
    /// The existing segment it crossed.
    pub crossed: [Point; 2],
}

impl IntersectionHit {
    fn from_points([a, b, c, d]: [Point; 4]) -> Self {
        Self {
            segment: [a, b],
            crossed: [c, d],
        }
    }
}

/// Debug hook called with every crossing the engine detects.
pub type IntersectionProbe = Box<dyn FnMut(&IntersectionHit)>;

/// Contour state saved across a relayout.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSnapshot {
    contour: PathContour,
    paused: bool,
    can_lock: bool,
}

impl PathSnapshot {
    pub fn contour(&self) -> &PathContour {
        &self.contour
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Re-map the saved contour from one frame onto another.
    pub fn mapped(mut self, from: Rect, to: Rect) -> Self {
        self.contour = map_path_between_frames(&self.contour, from, to);
        self
    }
}

/// Polygon and lasso path builder.
pub struct SelectionPathEngine {
    mode: PathMode,
    config: PathEngineConfig,
    bounds: Rect,
    contour: PathContour,
    paused: bool,
    can_lock: bool,
    lock_region: Rect,
    stroke_active: bool,
    stroke_needs_snapshot: bool,
    undo: UndoStack<PathContour>,
    events: EventQueue,
    probe: Option<IntersectionProbe>,
}

impl fmt::Debug for SelectionPathEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionPathEngine")
            .field("mode", &self.mode)
            .field("bounds", &self.bounds)
            .field("points", &self.contour.len())
            .field("closed", &self.contour.is_closed())
            .field("paused", &self.paused)
            .field("can_lock", &self.can_lock)
            .finish_non_exhaustive()
    }
}

impl SelectionPathEngine {
    /// Create an empty engine. `bounds` is the editable area; lasso points
    /// outside it fail the selection.
    pub fn new(mode: PathMode, bounds: Rect, config: PathEngineConfig) -> Self {
        let undo = UndoStack::with_capacity(config.undo_capacity);
        Self {
            mode,
            config,
            bounds,
            contour: PathContour::new(),
            paused: false,
            can_lock: false,
            lock_region: Rect::ZERO,
            stroke_active: false,
            stroke_needs_snapshot: false,
            undo,
            events: EventQueue::new(),
            probe: None,
        }
    }

    pub fn mode(&self) -> PathMode {
        self.mode
    }

    pub fn config(&self) -> &PathEngineConfig {
        &self.config
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn contour(&self) -> &PathContour {
        &self.contour
    }

    pub fn is_closed(&self) -> bool {
        self.contour.is_closed()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the pointer has travelled far enough from the first point
    /// for the lock region to close the loop.
    pub fn can_lock(&self) -> bool {
        self.can_lock
    }

    /// The lock marker around the first point, if one is placed.
    pub fn lock_region(&self) -> Option<Rect> {
        (self.lock_region != Rect::ZERO).then_some(self.lock_region)
    }

    pub fn state(&self) -> PathState {
        if self.contour.is_closed() {
            PathState::Closed
        } else if self.paused {
            PathState::Paused
        } else if self.contour.is_empty() {
            PathState::Empty
        } else {
            PathState::Building
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Install a hook that sees every detected crossing.
    pub fn set_intersection_probe(&mut self, probe: impl FnMut(&IntersectionHit) + 'static) {
        self.probe = Some(Box::new(probe));
    }

    pub fn clear_intersection_probe(&mut self) {
        self.probe = None;
    }

    /// Restore the contour as it was before the last mutating step.
    ///
    /// Restoring an empty contour also removes the lock marker.
    pub fn undo(&mut self) {
        let Some(previous) = self.undo.pop() else {
            warn!("Path undo requested with an empty history");
            return;
        };
        debug!("Undo path to {} points", previous.len());

        self.contour = previous;
        self.paused =
            self.mode == PathMode::Lasso && !self.contour.is_empty() && !self.contour.is_closed();
        self.can_lock = false;
        self.place_lock_marker();
        self.events
            .push(SelectionEvent::UndoAvailabilityChanged(self.can_undo()));
    }

    /// Drop the contour, the lock marker and the undo history.
    pub fn clear(&mut self) {
        info!("Clearing {:?} selection", self.mode);
        self.reset_contour();
        let had_history = self.can_undo();
        self.undo.clear();
        if had_history {
            self.events.push(SelectionEvent::UndoAvailabilityChanged(false));
        }
    }

    /// Save an in-progress contour before a relayout.
    ///
    /// Only a paused lasso or an open polygon has anything worth keeping.
    pub fn snapshot(&self) -> Option<PathSnapshot> {
        let in_progress = match self.mode {
            PathMode::Lasso => self.paused,
            PathMode::Polygon => !self.contour.is_empty() && !self.contour.is_closed(),
        };
        in_progress.then(|| PathSnapshot {
            contour: self.contour.clone(),
            paused: self.paused,
            can_lock: self.can_lock,
        })
    }

    /// Reapply a saved contour after a relayout, moving the lock marker to
    /// its first point.
    pub fn restore(&mut self, snapshot: PathSnapshot) {
        debug!("Restoring {} path points after relayout", snapshot.contour.len());
        self.contour = snapshot.contour;
        self.paused = snapshot.paused;
        self.can_lock = snapshot.can_lock;
        self.place_lock_marker();
    }

    /// Apply `f` to every contour point and re-derive the lock marker.
    pub fn map_contour(&mut self, f: impl Fn(Point) -> Point) {
        self.contour = self.contour.map_points(f);
        if !self.contour.is_closed() {
            self.place_lock_marker();
        }
    }

    /// Stretch the contour so its bounding box becomes `frame`.
    ///
    /// Used to keep a completed selection inside the crop box that frames
    /// it while the box is moved or resized.
    pub fn stretch_to_frame(&mut self, frame: Rect) {
        let Some(from) = self.contour.bounding_box() else {
            return;
        };
        if from == frame {
            return;
        }
        self.contour = map_path_between_frames(&self.contour, from, frame);
        if !self.contour.is_closed() {
            self.place_lock_marker();
        }
    }

    /// Remove and return the events queued since the last call.
    pub fn take_events(&mut self) -> Vec<SelectionEvent> {
        self.events.take()
    }

    fn reset_contour(&mut self) {
        self.contour.clear();
        self.paused = false;
        self.can_lock = false;
        self.lock_region = Rect::ZERO;
        self.stroke_active = false;
        self.stroke_needs_snapshot = false;
    }

    fn place_lock_marker(&mut self) {
        self.lock_region = match self.contour.first() {
            Some(first) => Rect::centered_square(first, self.config.lock_region_size),
            None => Rect::ZERO,
        };
    }

    fn push_undo_snapshot(&mut self) {
        self.undo.push(self.contour.clone());
    }

    /// Append `point`, placing the lock marker if it is the first one.
    fn append(&mut self, point: Point) {
        let was_empty = self.contour.is_empty();
        if let Err(err) = self.contour.push(point) {
            warn!("{err}");
            return;
        }
        if was_empty {
            self.place_lock_marker();
        }
    }

    /// Close the contour and report it.
    fn complete(&mut self) {
        self.contour.close();
        self.paused = false;
        self.can_lock = false;
        self.lock_region = Rect::ZERO;
        self.stroke_active = false;
        self.stroke_needs_snapshot = false;
        info!(
            "{:?} selection completed with {} points",
            self.mode,
            self.contour.len()
        );
        self.events
            .push(SelectionEvent::SelectionCompleted(self.contour.clone()));
    }

    /// Abandon the contour and report why.
    fn fail(&mut self, reason: SelectionFailure) {
        info!("{:?} selection failed: {reason}", self.mode);
        self.reset_contour();
        self.events.push(SelectionEvent::SelectionFailed(reason));
    }

    fn report_intersection(&mut self, hit: IntersectionHit) {
        debug!("Segment {:?} crosses {:?}", hit.segment, hit.crossed);
        if let Some(probe) = self.probe.as_mut() {
            probe(&hit);
        }
    }
}
