//! Resolving the host selection to a resizable on-screen target.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use tracing::debug;

use crate::doc::{Node, Transaction};
use crate::geom::Point;
use crate::host::EditorView;

/// A selected resizable node and the element it is rendered as.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionTarget<E> {
    pub position: usize,
    pub node: Node,
    pub element: E,
}

/// Resolve the current selection to a resizable target.
///
/// Returns `None` unless exactly one resizable node is selected and the host
/// has rendered it. A missing element is normal (not yet rendered) and only
/// logged at debug level.
pub fn track<V: EditorView>(view: &V) -> Option<SelectionTarget<V::Element>> {
    let selected = view.resolve_selection()?;
    if !selected.node.is_resizable() {
        return None;
    }
    let Some(element) = view.element_for_position(selected.position) else {
        debug!(position = selected.position, "selected media has no rendered element");
        return None;
    };
    Some(SelectionTarget { position: selected.position, node: selected.node, element })
}

/// Find the resizable node a click at `point` landed on.
///
/// The position under the pointer can sit just before or after an atomic
/// node, so the neighbours on both sides are probed as well.
pub fn select_at<V: EditorView>(view: &V, point: Point) -> Option<Transaction> {
    let position = view.position_at_coords(point)?;
    let candidates = [Some(position), position.checked_sub(1), position.checked_add(1)];
    candidates
        .into_iter()
        .flatten()
        .find(|&p| view.node_at(p).is_some_and(|n| n.is_resizable()))
        .map(|position| Transaction::SelectNode { position })
}
