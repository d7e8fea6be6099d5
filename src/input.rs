//! Input model: modifier keys and the drag state machine.
//!
//! `Modifiers` captures the keys held at the time of a pointer event.
//! `DragState` is the gesture being tracked between handle press and pointer
//! release: `Idle` or `Dragging` with a [`DragSession`] carrying everything
//! needed to turn absolute pointer positions into a new size.
//!
//! A session owns the guard for its global move/up listeners. Leaving
//! `Dragging` by any path drops the session and with it the guard, so the
//! listeners can never outlive the gesture.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::Deserialize;

use crate::geom::{self, Bounds, Point, Size};

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// Which modifier engages the aspect lock while held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockModifier {
    #[default]
    Shift,
    Alt,
    Ctrl,
    Meta,
}

impl LockModifier {
    /// Whether this modifier is held in `mods`.
    #[must_use]
    pub fn is_held(self, mods: Modifiers) -> bool {
        match self {
            Self::Shift => mods.shift,
            Self::Alt => mods.alt,
            Self::Ctrl => mods.ctrl,
            Self::Meta => mods.meta,
        }
    }
}

/// Pick the size a drag starts from: the element's explicit size, else the
/// size persisted in the node's attributes, else the media's natural
/// (intrinsic) size, else `fallback`.
#[must_use]
pub fn starting_size(styled: Option<Size>, persisted: Option<Size>, natural: Option<Size>, fallback: Size) -> Size {
    [styled, persisted, natural]
        .into_iter()
        .flatten()
        .find(|s| s.is_usable())
        .unwrap_or(fallback)
}

/// What remains of a session once its listeners have been released.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedDrag<E> {
    pub position: usize,
    pub element: E,
    pub start: Size,
}

/// Transient state of one in-progress drag.
///
/// `E` is the host's element handle, `G` the listener guard returned by the
/// surface when drag tracking was bound.
#[derive(Debug)]
pub struct DragSession<E, G> {
    /// Document position of the node being resized, as of drag start.
    pub position: usize,
    /// Element receiving live size updates. Kept even if the selection moves on.
    pub element: E,
    /// Pointer position at press time, in absolute screen coordinates.
    pub origin: Point,
    /// Element size at press time.
    pub start: Size,
    /// `start.width / start.height`, fixed for the life of the session.
    pub aspect_ratio: f64,
    _listeners: G,
}

impl<E, G> DragSession<E, G> {
    /// Start a session. `listeners` is released when the session is dropped.
    #[must_use]
    pub fn begin(position: usize, element: E, origin: Point, start: Size, listeners: G) -> Self {
        Self {
            position,
            element,
            origin,
            start,
            aspect_ratio: geom::aspect_ratio(start),
            _listeners: listeners,
        }
    }

    /// Size implied by the pointer being at `pointer`.
    #[must_use]
    pub fn size_at(&self, pointer: Point, locked: bool, bounds: Bounds) -> Size {
        let lock = locked.then_some(self.aspect_ratio);
        geom::resize(self.start, pointer.delta_from(self.origin), lock, bounds)
    }

    /// End the session: unregister its listeners, then hand back the target.
    #[must_use]
    pub fn release(self) -> FinishedDrag<E> {
        let Self { position, element, start, _listeners: listeners, .. } = self;
        drop(listeners);
        FinishedDrag { position, element, start }
    }
}

/// The drag state machine: `Idle -> Dragging -> Idle`.
#[derive(Debug)]
pub enum DragState<E, G> {
    /// No drag in progress.
    Idle,
    /// A drag is in progress.
    Dragging(DragSession<E, G>),
}

impl<E, G> Default for DragState<E, G> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<E, G> DragState<E, G> {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    /// The active session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession<E, G>> {
        match self {
            Self::Idle => None,
            Self::Dragging(session) => Some(session),
        }
    }

    /// Transition to `Idle`, handing back the session that was active.
    pub fn finish(&mut self) -> Option<DragSession<E, G>> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::Dragging(session) => Some(session),
        }
    }
}
