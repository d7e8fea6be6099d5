//! Capabilities the controller needs from its environment.
//!
//! The controller never touches a rendering surface or a document directly.
//! Geometry queries go through [`Layout`], element and listener management
//! through [`Surface`], and document access through [`EditorView`]. The
//! browser implementations live in `web`; tests use an in-memory fake.

use std::fmt::Debug;

use crate::doc::{Node, SelectedNode, Transaction};
use crate::geom::{Point, Rect, Size};

/// Read-only geometry queries against rendered elements.
pub trait Layout {
    /// Handle to a rendered element. Cloning must not duplicate the element.
    type Element: Clone + PartialEq + Debug;

    /// Screen-space bounding box of `element`.
    fn bounding_box_of(&self, element: &Self::Element) -> Rect;

    /// Current `(scrollLeft, scrollTop)` of `container`.
    fn scroll_offset_of(&self, container: &Self::Element) -> Point;
}

/// Element manipulation and event wiring on the rendering surface.
///
/// Every `bind_*` method registers listeners and returns a guard; dropping
/// the guard must unregister exactly what was registered.
pub trait Surface: Layout {
    /// Listener registration guard.
    type Listener;

    /// The scrollable element the handle is positioned in.
    fn locate_container(&self) -> Option<Self::Element>;

    /// Give `container` a local positioning context if it lacks one.
    fn ensure_positioned(&self, container: &Self::Element);

    /// Create a hidden handle of `size` pixels inside `container`.
    fn create_handle(&self, container: &Self::Element, size: f64) -> Option<Self::Element>;

    /// Detach `handle` from the rendered tree.
    fn remove_handle(&self, handle: &Self::Element);

    fn set_handle_visible(&self, handle: &Self::Element, visible: bool);

    /// Move the handle's top-left corner to `at`, relative to its container.
    fn place_handle(&self, handle: &Self::Element, at: Point);

    /// Explicit (inline) size of `element`, if one is set.
    fn styled_size_of(&self, element: &Self::Element) -> Option<Size>;

    /// Intrinsic size of the media shown by `element`, once known.
    fn natural_size_of(&self, element: &Self::Element) -> Option<Size>;

    /// Apply an explicit size to `element` for immediate visual feedback.
    fn set_size(&self, element: &Self::Element, size: Size);

    /// Listen for presses on the handle.
    fn bind_handle_press(&self, handle: &Self::Element) -> Self::Listener;

    /// Listen for scrolling of the container.
    fn bind_container_scroll(&self, container: &Self::Element) -> Self::Listener;

    /// Listen globally for pointer move, pointer up, and drag-abandoning
    /// events (focus loss, pointer cancel).
    fn bind_drag_tracking(&self) -> Self::Listener;
}

/// The host editor view: selection, node lookup, and transaction dispatch.
pub trait EditorView {
    type Element;

    /// The current selection, when it denotes exactly one node.
    fn resolve_selection(&self) -> Option<SelectedNode>;

    /// The node starting at `position` in the current document.
    fn node_at(&self, position: usize) -> Option<Node>;

    /// The rendered element for the node at `position`, if rendered.
    fn element_for_position(&self, position: usize) -> Option<Self::Element>;

    /// Document position under a screen-space point.
    fn position_at_coords(&self, point: Point) -> Option<usize>;

    /// Apply `tr` to the document atomically.
    fn dispatch(&self, tr: Transaction);
}
