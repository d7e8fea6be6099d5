//! Writing the final size of a drag back into the document.
//!
//! Commits are best-effort. The node is looked up again at commit time; if
//! a concurrent edit removed it or moved another kind of node into its
//! position, the size update is dropped rather than written to the wrong node.

#[cfg(test)]
#[path = "commit_test.rs"]
mod commit_test;

use serde_json::Value;
use tracing::debug;

use crate::consts::{ATTR_HEIGHT, ATTR_WIDTH};
use crate::doc::Transaction;
use crate::geom::Size;
use crate::host::EditorView;

/// The size to persist: the element's explicit size as last applied, or the
/// start size when that cannot be read back.
#[must_use]
pub fn final_size(styled: Option<Size>, start: Size) -> (u32, u32) {
    styled.filter(|s| s.is_usable()).unwrap_or(start).to_pixels()
}

/// Build the attribute-merge transaction persisting `width` x `height` on the
/// node at `position`. Every other attribute is carried over unchanged.
pub fn commit<V: EditorView>(view: &V, position: usize, width: u32, height: u32) -> Option<Transaction> {
    let Some(node) = view.node_at(position) else {
        debug!(position, "resized node is gone; dropping size update");
        return None;
    };
    if !node.is_resizable() {
        debug!(position, kind = ?node.kind, "position now holds another node; dropping size update");
        return None;
    }

    let mut attrs = node.attrs;
    attrs.insert(ATTR_WIDTH.to_owned(), Value::from(width));
    attrs.insert(ATTR_HEIGHT.to_owned(), Value::from(height));
    Some(Transaction::SetNodeAttrs { position, attrs })
}

/// Whether the node at `position` is still shown by `element`.
///
/// Only a positive mismatch counts: a node that is not rendered right now
/// (virtualized, mid-update) does not block the commit.
pub fn still_rendered_as<V: EditorView>(view: &V, position: usize, element: &V::Element) -> bool
where
    V::Element: PartialEq,
{
    view.element_for_position(position).is_none_or(|current| current == *element)
}
