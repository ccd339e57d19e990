//! Notifications from the selection engine to its host.
//!
//! Nothing here is delivered from inside a gesture call. Controllers push
//! [`SelectionEvent`]s onto an [`EventQueue`] and the host drains it on its
//! next UI turn, either by taking the events or by dispatching them to a
//! [`SelectionObserver`].

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{PathContour, Point, Rect};

/// Why a free-form selection was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionFailure {
    /// The new segment crossed the existing contour.
    #[error("The selection path crossed itself")]
    PathCrossed,
    /// The pointer was lifted before the loop was closed and pausing is off.
    #[error("The pointer was lifted before the selection was closed")]
    TouchEnded,
    /// The pointer left the editable area.
    #[error("The selection left the image bounds")]
    OutOfBorder,
}

/// A single notification for the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum SelectionEvent {
    CropBoxChanged(Rect),
    SelectionPaused(Point),
    SelectionResumed(Point),
    SelectionCompleted(PathContour),
    SelectionFailed(SelectionFailure),
    UndoAvailabilityChanged(bool),
    ReadyForGestures,
}

impl SelectionEvent {
    /// Hand this event to the matching observer method.
    pub fn deliver_to(self, observer: &mut dyn SelectionObserver) {
        match self {
            SelectionEvent::CropBoxChanged(rect) => observer.on_crop_box_changed(rect),
            SelectionEvent::SelectionPaused(p) => observer.on_selection_paused(p),
            SelectionEvent::SelectionResumed(p) => observer.on_selection_resumed(p),
            SelectionEvent::SelectionCompleted(c) => observer.on_selection_completed(c),
            SelectionEvent::SelectionFailed(reason) => observer.on_selection_failed(reason),
            SelectionEvent::UndoAvailabilityChanged(can) => {
                observer.on_undo_availability_changed(can)
            }
            SelectionEvent::ReadyForGestures => observer.on_ready_for_gestures(),
        }
    }
}

/// Host callbacks. Every method defaults to doing nothing, so implement
/// only the ones you need.
pub trait SelectionObserver {
    fn on_crop_box_changed(&mut self, _rect: Rect) {}
    fn on_selection_paused(&mut self, _at: Point) {}
    fn on_selection_resumed(&mut self, _at: Point) {}
    fn on_selection_completed(&mut self, _contour: PathContour) {}
    fn on_selection_failed(&mut self, _reason: SelectionFailure) {}
    fn on_undo_availability_changed(&mut self, _can_undo: bool) {}
    fn on_ready_for_gestures(&mut self) {}
}

/// FIFO of events awaiting delivery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQueue {
    pending: VecDeque<SelectionEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SelectionEvent) {
        self.pending.push_back(event);
    }

    /// Move every event from `other` to the back of this queue.
    pub fn append(&mut self, other: &mut EventQueue) {
        self.pending.append(&mut other.pending);
    }

    /// Remove and return all pending events, oldest first.
    pub fn take(&mut self) -> Vec<SelectionEvent> {
        self.pending.drain(..).collect()
    }

    /// Deliver all pending events to `observer`, returning how many were sent.
    pub fn dispatch(&mut self, observer: &mut dyn SelectionObserver) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.pending.pop_front() {
            event.deliver_to(observer);
            delivered += 1;
        }
        delivered
    }

    /// Deliver pending events oldest first until `deliver` fails.
    ///
    /// The event passed to the failing call is consumed; every later event
    /// stays queued for the next drain.
    ///
    /// # Errors
    ///
    /// Returns the first error from `deliver`.
    pub fn try_drain<E>(
        &mut self,
        mut deliver: impl FnMut(SelectionEvent) -> Result<(), E>,
    ) -> Result<usize, E> {
        let mut delivered = 0;
        while let Some(event) = self.pending.pop_front() {
            deliver(event)?;
            delivered += 1;
        }
        Ok(delivered)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectionEvent> {
        self.pending.iter()
    }
}
