//! The resize handle: where it goes, and the element that shows it.

#[cfg(test)]
#[path = "handle_test.rs"]
mod handle_test;

use crate::geom::{Point, Rect};
use crate::host::{Layout, Surface};

/// Top-left of a handle centered on the bottom-right corner of `target`,
/// expressed in `container`'s scrolled content coordinates.
#[must_use]
pub fn handle_offset(target: Rect, container: Rect, scroll: Point, handle_size: f64) -> Point {
    let half = handle_size / 2.0;
    Point::new(
        target.right() - container.left + scroll.x - half,
        target.bottom() - container.top + scroll.y - half,
    )
}

/// Measure `target` and `container` now and compute the handle position.
///
/// Never cached: call again after any selection change, scroll, or live resize.
pub fn position<L: Layout>(layout: &L, target: &L::Element, container: &L::Element, handle_size: f64) -> Point {
    handle_offset(
        layout.bounding_box_of(target),
        layout.bounding_box_of(container),
        layout.scroll_offset_of(container),
        handle_size,
    )
}

/// The handle element owned by one attached controller, with its press
/// listener. Repositioned on every update, never recreated.
#[derive(Debug)]
pub struct Handle<E, G> {
    element: E,
    visible: bool,
    _press: G,
}

impl<E, G> Handle<E, G> {
    /// Wrap a freshly created (hidden) handle element.
    #[must_use]
    pub fn new(element: E, press: G) -> Self {
        Self { element, visible: false, _press: press }
    }

    #[must_use]
    pub fn element(&self) -> &E {
        &self.element
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show<S: Surface<Element = E>>(&mut self, surface: &S) {
        if !self.visible {
            surface.set_handle_visible(&self.element, true);
            self.visible = true;
        }
    }

    pub fn hide<S: Surface<Element = E>>(&mut self, surface: &S) {
        if self.visible {
            surface.set_handle_visible(&self.element, false);
            self.visible = false;
        }
    }

    /// Move the handle onto the bottom-right corner of `target`.
    pub fn place_over<S: Surface<Element = E>>(&self, surface: &S, target: &E, container: &E, handle_size: f64) {
        let at = position(surface, target, container, handle_size);
        surface.place_handle(&self.element, at);
    }
}
