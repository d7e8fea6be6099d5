//! Per-view resize controller.
//!
//! ARCHITECTURE
//! ============
//! One [`ResizeController`] is attached per editor view. It owns the handle
//! element, the container it sits in, the current [`SelectionTarget`], and
//! the drag state machine. The host wires its events to the `on_*` methods
//! and calls [`ResizeController::update`] after every view update.
//!
//! Methods that change the document do not dispatch. They return the
//! [`Transaction`] for the host to apply once it has released the
//! controller, since applying it synchronously triggers the next `update`.
//!
//! Host callbacks reach the controller through a [`ControllerSlot`], which
//! skips events that arrive while the controller is already borrowed and
//! defers a detach requested in that window until the borrow ends.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here fails outward. A missing container makes [`attach`] return
//! `None` (resize unavailable for that view), a vanished node turns a commit
//! into a no-op, and events arriving in the wrong state are ignored.
//!
//! [`attach`]: ResizeController::attach

#[cfg(test)]
#[path = "plugin_test.rs"]
mod plugin_test;

use std::cell::{Cell, RefCell};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::commit;
use crate::config::ResizeConfig;
use crate::doc::Transaction;
use crate::geom::{Point, Size};
use crate::handle::Handle;
use crate::host::{EditorView, Surface};
use crate::input::{self, DragSession, DragState, Modifiers};
use crate::selection::{self, SelectionTarget};

pub struct ResizeController<S: Surface> {
    id: Uuid,
    config: ResizeConfig,
    target: Option<SelectionTarget<S::Element>>,
    drag: DragState<S::Element, S::Listener>,
    handle: Handle<S::Element, S::Listener>,
    container: S::Element,
    _scroll: S::Listener,
    // Dropped last: listener guards above may still reference surface callbacks.
    surface: S,
}

impl<S: Surface> ResizeController<S> {
    /// Attach to a view: find the container, create the hidden handle, and
    /// bind the handle press and container scroll listeners.
    ///
    /// Returns `None` when there is nowhere to put the handle; the view then
    /// simply has no resize support.
    pub fn attach(surface: S, config: ResizeConfig) -> Option<Self> {
        let id = Uuid::new_v4();
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(view = %id, error = %e, "invalid resize config; using defaults");
                ResizeConfig::default()
            }
        };

        let Some(container) = surface.locate_container() else {
            warn!(view = %id, "no container for the resize handle; image resize disabled");
            return None;
        };
        surface.ensure_positioned(&container);

        let Some(element) = surface.create_handle(&container, config.handle_size) else {
            warn!(view = %id, "resize handle could not be created; image resize disabled");
            return None;
        };
        let press = surface.bind_handle_press(&element);
        let scroll = surface.bind_container_scroll(&container);

        info!(view = %id, "image resize attached");
        Some(Self {
            id,
            config,
            target: None,
            drag: DragState::Idle,
            handle: Handle::new(element, press),
            container,
            _scroll: scroll,
            surface,
        })
    }

    /// Tear down: abandon any drag, remove the handle, unbind everything.
    pub fn detach(self) {
        info!(view = %self.id, dragging = self.drag.is_dragging(), "image resize detached");
    }

    // --- Queries ---

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &ResizeConfig {
        &self.config
    }

    /// The currently selected resizable node, if any.
    #[must_use]
    pub fn target(&self) -> Option<&SelectionTarget<S::Element>> {
        self.target.as_ref()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    #[must_use]
    pub fn handle_visible(&self) -> bool {
        self.handle.is_visible()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    // --- View updates ---

    /// Re-run selection tracking after a view update.
    ///
    /// A new target is shown, a lost one hidden, and an unchanged one (same
    /// position) only repositioned. An in-progress drag is unaffected.
    pub fn update<V: EditorView<Element = S::Element>>(&mut self, view: &V) {
        let next = selection::track(view);
        let current = self.target.as_ref().map(|t| t.position);
        match (next, current) {
            (None, None) => {}
            (None, Some(_)) => self.hide(),
            (Some(next), Some(position)) if next.position == position => {
                self.target = Some(next);
                self.reposition();
            }
            (Some(next), _) => self.show(next),
        }
    }

    /// The container scrolled.
    pub fn on_scroll(&mut self) {
        if self.target.is_some() || self.drag.is_dragging() {
            self.reposition();
        }
    }

    // --- Drag ---

    /// Pointer pressed on the handle. Returns whether a drag started, in
    /// which case the host should suppress the event's default handling.
    pub fn on_handle_press(&mut self, pointer: Point) -> bool {
        if self.drag.is_dragging() {
            return false;
        }
        let Some(target) = self.target.as_ref() else {
            return false;
        };
        let start = self.resting_size(target);
        let listeners = self.surface.bind_drag_tracking();
        debug!(view = %self.id, position = target.position, ?start, "resize drag started");
        self.drag = DragState::Dragging(DragSession::begin(
            target.position,
            target.element.clone(),
            pointer,
            start,
            listeners,
        ));
        true
    }

    /// Pointer moved anywhere while a drag may be active.
    pub fn on_pointer_move(&mut self, pointer: Point, modifiers: Modifiers) {
        let Some(session) = self.drag.session() else {
            return;
        };
        let locked = self.config.lock_modifier.is_held(modifiers);
        let size = session.size_at(pointer, locked, self.config.bounds());
        self.surface.set_size(&session.element, size);
        self.reposition();
    }

    /// Pointer released: end the drag and build the commit, if still valid.
    pub fn on_pointer_up<V: EditorView<Element = S::Element>>(&mut self, view: &V) -> Option<Transaction> {
        let finished = self.drag.finish()?.release();

        let (width, height) = commit::final_size(self.surface.styled_size_of(&finished.element), finished.start);
        // Prefer the live selection's position when it still tracks the same
        // element: concurrent edits before the node shift it.
        let position = self
            .target
            .as_ref()
            .filter(|t| t.element == finished.element)
            .map_or(finished.position, |t| t.position);
        self.reposition();

        if !commit::still_rendered_as(view, position, &finished.element) {
            debug!(view = %self.id, position, "position now renders another element; dropping size update");
            return None;
        }
        let tr = commit::commit(view, position, width, height);
        debug!(view = %self.id, position, width, height, committed = tr.is_some(), "resize drag finished");
        tr
    }

    /// The drag was abandoned (focus lost, pointer cancelled): revert the
    /// live size and commit nothing.
    pub fn on_drag_cancel(&mut self) {
        let Some(finished) = self.drag.finish().map(DragSession::release) else {
            return;
        };
        self.surface.set_size(&finished.element, finished.start);
        self.reposition();
        debug!(view = %self.id, position = finished.position, "resize drag cancelled");
    }

    // --- Click ---

    /// A click landed in the editor. When it hit a media element, returns the
    /// transaction selecting the resizable node under the pointer.
    pub fn on_click<V: EditorView<Element = S::Element>>(
        &self,
        view: &V,
        point: Point,
        hit_media: bool,
    ) -> Option<Transaction> {
        if !hit_media {
            return None;
        }
        selection::select_at(view, point)
    }

    // --- Internals ---

    fn show(&mut self, target: SelectionTarget<S::Element>) {
        let size = self.resting_size(&target);
        self.surface.set_size(&target.element, size);
        self.handle.show(&self.surface);
        self.target = Some(target);
        self.reposition();
    }

    fn hide(&mut self) {
        self.handle.hide(&self.surface);
        self.target = None;
    }

    /// Place the handle over the element being dragged, else the selection.
    fn reposition(&self) {
        let tracked = match self.drag.session() {
            Some(session) => Some(&session.element),
            None => self.target.as_ref().map(|t| &t.element),
        };
        if let Some(element) = tracked {
            self.handle.place_over(&self.surface, element, &self.container, self.config.handle_size);
        }
    }

    fn resting_size(&self, target: &SelectionTarget<S::Element>) -> Size {
        input::starting_size(
            self.surface.styled_size_of(&target.element),
            target.node.image_attrs().size(),
            self.surface.natural_size_of(&target.element),
            self.config.fallback_size(),
        )
    }
}

impl<S: Surface> Drop for ResizeController<S> {
    fn drop(&mut self) {
        if let Some(session) = self.drag.finish() {
            debug!(view = %self.id, position = session.position, "abandoning drag on detach");
            drop(session.release());
        }
        self.surface.remove_handle(self.handle.element());
    }
}

/// Shared home of a controller whose host callbacks can re-enter it.
pub struct ControllerSlot<S: Surface> {
    controller: RefCell<Option<ResizeController<S>>>,
    detach_pending: Cell<bool>,
}

impl<S: Surface> Default for ControllerSlot<S> {
    fn default() -> Self {
        Self { controller: RefCell::new(None), detach_pending: Cell::new(false) }
    }
}

impl<S: Surface> ControllerSlot<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the controller produced by [`ResizeController::attach`].
    pub fn install(&self, controller: Option<ResizeController<S>>) {
        match self.controller.try_borrow_mut() {
            Ok(mut slot) => *slot = controller,
            Err(err) => warn!(%err, "controller slot busy; attach discarded"),
        }
    }

    /// Whether a controller is installed and not yet detached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        // Mutably borrowed means an event is running against it right now.
        self.controller.try_borrow().map_or(true, |slot| slot.is_some())
    }

    /// Run `f` against the controller. Returns `None` when nothing is
    /// installed or the controller is busy further up the stack.
    pub fn with<R>(&self, f: impl FnOnce(&mut ResizeController<S>) -> R) -> Option<R> {
        let outcome = {
            let Ok(mut slot) = self.controller.try_borrow_mut() else {
                debug!("resize controller busy; event skipped");
                return None;
            };
            slot.as_mut().map(f)
        };
        self.settle();
        outcome
    }

    /// Detach the controller now, or as soon as the event currently using it
    /// returns.
    pub fn detach(&self) {
        self.detach_pending.set(true);
        self.settle();
    }

    fn settle(&self) {
        if !self.detach_pending.get() {
            return;
        }
        let Ok(mut slot) = self.controller.try_borrow_mut() else {
            debug!("resize controller busy; detach deferred");
            return;
        };
        let controller = slot.take();
        drop(slot);
        self.detach_pending.set(false);
        if let Some(controller) = controller {
            controller.detach();
        }
    }
}
