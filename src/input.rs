//! Input model: click targets, the drag state machine, and the frame slot.
//!
//! `ClickTarget` is what the host resolved a click to; the engine never sees
//! raw DOM events. `DragState` is the gesture tracked between pointer-down and
//! pointer-up. `FrameSlot` coalesces pointer samples that arrive faster than
//! the display repaints: the host schedules one frame callback when a slot
//! goes from empty to full, and every later sample before that callback
//! overwrites the pending one.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ItemId;
use crate::geom::Point;

/// What a click landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    /// The bare canvas surface, not any item.
    Background,
    /// An item's own surface.
    Item(ItemId),
    /// The delete control rendered on a selected item.
    Delete(ItemId),
}

/// Drag gesture state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// An item follows the pointer.
    Dragging {
        /// Id of the item being dragged.
        id: ItemId,
        /// Pointer position minus item position at press time. Held for the
        /// whole gesture so the item keeps its grip point under the pointer.
        offset: Point,
    },
}

impl DragState {
    /// The item being dragged, if any.
    #[must_use]
    pub fn target(&self) -> Option<&ItemId> {
        match self {
            Self::Idle => None,
            Self::Dragging { id, .. } => Some(id),
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

/// A single pending-update slot checked and cleared once per frame.
#[derive(Debug, Clone)]
pub struct FrameSlot<T> {
    pending: Option<T>,
}

impl<T> Default for FrameSlot<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> FrameSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `sample`, replacing any pending one.
    ///
    /// Returns `true` when the slot was empty, i.e. the caller must schedule
    /// a frame. Returns `false` when a frame is already scheduled.
    pub fn offer(&mut self, sample: T) -> bool {
        self.pending.replace(sample).is_none()
    }

    /// Take the pending sample for this frame, leaving the slot empty.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Drop any pending sample without applying it.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
