//! Document model: node kinds, attributes, transactions, and an in-memory store.
//!
//! This module defines the slice of the host document the controller cares
//! about: a [`Node`] tagged with its [`NodeKind`] and carrying an open-ended
//! attribute bag, typed access to the persisted media size (`ImageAttrs`), and
//! the [`Transaction`]s the controller asks the host to apply.
//!
//! Nodes are identified by position, an offset into the document that every
//! edit before it shifts. Positions must be re-resolved before writing.
//!
//! [`DocStore`] is a flat, position-addressed store that behaves like a host
//! document for headless embedding and for tests.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::consts::{ATTR_HEIGHT, ATTR_SRC, ATTR_WIDTH};
use crate::geom::Size;

/// Open-ended node attributes, keyed by attribute name.
pub type Attrs = serde_json::Map<String, Value>;

/// The kind of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Paragraph,
    Heading,
    Text,
    /// Embedded image; the only kind the resize handle applies to.
    Image,
    /// Embedded video player.
    Youtube,
    HorizontalRule,
    HardBreak,
    /// Any node type this crate does not know about.
    #[serde(other)]
    Other,
}

impl NodeKind {
    /// Whether nodes of this kind can be resized with the handle.
    #[must_use]
    pub fn is_resizable(self) -> bool {
        matches!(self, Self::Image)
    }
}

/// A document node as seen by the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub attrs: Attrs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Node {
    /// A leaf node of `kind` with no attributes.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, attrs: Attrs::new(), text: None }
    }

    /// An image node pointing at `src`, rendered at its intrinsic size.
    #[must_use]
    pub fn image(src: &str) -> Self {
        let mut node = Self::new(NodeKind::Image);
        node.attrs.insert(ATTR_SRC.to_owned(), Value::from(src));
        node
    }

    /// A text run.
    #[must_use]
    pub fn text(text: &str) -> Self {
        Self { kind: NodeKind::Text, attrs: Attrs::new(), text: Some(text.to_owned()) }
    }

    /// Builder: set persisted pixel dimensions.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.attrs.insert(ATTR_WIDTH.to_owned(), Value::from(width));
        self.attrs.insert(ATTR_HEIGHT.to_owned(), Value::from(height));
        self
    }

    #[must_use]
    pub fn is_resizable(&self) -> bool {
        self.kind.is_resizable()
    }

    /// How many positions this node occupies: one per character for text,
    /// one for every other (atomic) node.
    #[must_use]
    pub fn node_size(&self) -> usize {
        match (&self.kind, &self.text) {
            (NodeKind::Text, Some(text)) => text.chars().count().max(1),
            _ => 1,
        }
    }

    #[must_use]
    pub fn image_attrs(&self) -> ImageAttrs<'_> {
        ImageAttrs::new(&self.attrs)
    }
}

/// Typed access to the media attributes of a node.
pub struct ImageAttrs<'a> {
    attrs: &'a Attrs,
}

impl<'a> ImageAttrs<'a> {
    #[must_use]
    pub fn new(attrs: &'a Attrs) -> Self {
        Self { attrs }
    }

    /// Persisted width in pixels; `None` means intrinsic size.
    #[must_use]
    pub fn width(&self) -> Option<u32> {
        self.attrs.get(ATTR_WIDTH).and_then(dimension)
    }

    /// Persisted height in pixels; `None` means intrinsic size.
    #[must_use]
    pub fn height(&self) -> Option<u32> {
        self.attrs.get(ATTR_HEIGHT).and_then(dimension)
    }

    /// Persisted size, if both dimensions are set.
    #[must_use]
    pub fn size(&self) -> Option<Size> {
        Some(Size::new(f64::from(self.width()?), f64::from(self.height()?)))
    }
}

/// Read a pixel dimension stored either as a JSON number or as a numeric
/// string (attributes parsed from HTML arrive as strings, e.g. `"400"` or
/// `"400px"`).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn dimension(value: &Value) -> Option<u32> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => match s.trim().trim_end_matches("px").trim().parse::<f64>() {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(raw = %s, error = %e, "ignoring non-numeric dimension attribute");
                return None;
            }
        },
        _ => return None,
    };
    (raw.is_finite() && raw > 0.0).then(|| raw.round() as u32)
}

/// A node together with the position it was found at.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectedNode {
    pub position: usize,
    pub node: Node,
}

/// A mutation the controller asks the host to apply atomically.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Transaction {
    /// Replace the attributes of the node at `position` with `attrs`.
    #[serde(rename_all = "camelCase")]
    SetNodeAttrs { position: usize, attrs: Attrs },
    /// Make the node at `position` the (single-node) selection.
    #[serde(rename_all = "camelCase")]
    SelectNode { position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocError {
    #[error("no node starts at position {0}")]
    NoNodeAt(usize),
    #[error("position {position} is past the end of the document (size {size})")]
    OutOfRange { position: usize, size: usize },
}

/// In-memory, position-addressed document with a single-node selection.
#[derive(Debug, Clone, Default)]
pub struct DocStore {
    nodes: Vec<Node>,
    selection: Option<usize>,
}

impl DocStore {
    /// Build a document from nodes laid out in order.
    #[must_use]
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes, selection: None }
    }

    /// Total number of positions spanned by the document.
    #[must_use]
    pub fn size(&self) -> usize {
        self.nodes.iter().map(Node::node_size).sum()
    }

    /// The node starting exactly at `position`.
    #[must_use]
    pub fn node_at(&self, position: usize) -> Option<&Node> {
        self.index_of(position).map(|i| &self.nodes[i])
    }

    /// Insert `node` so that it starts at `position`, shifting everything
    /// after it. `position` must be a node boundary or the document end.
    pub fn insert(&mut self, position: usize, node: Node) -> Result<(), DocError> {
        let size = self.size();
        let index = if position == size {
            self.nodes.len()
        } else if position > size {
            return Err(DocError::OutOfRange { position, size });
        } else {
            self.index_of(position).ok_or(DocError::NoNodeAt(position))?
        };
        let shift = node.node_size();
        self.nodes.insert(index, node);
        if let Some(sel) = self.selection.as_mut() {
            if *sel >= position {
                *sel += shift;
            }
        }
        Ok(())
    }

    /// Remove the node starting at `position`, shifting everything after it.
    pub fn remove(&mut self, position: usize) -> Result<Node, DocError> {
        let index = self.index_of(position).ok_or(DocError::NoNodeAt(position))?;
        let node = self.nodes.remove(index);
        let shift = node.node_size();
        self.selection = match self.selection {
            Some(sel) if sel == position => None,
            Some(sel) if sel > position => Some(sel - shift),
            other => other,
        };
        Ok(node)
    }

    /// Select the node starting at `position`.
    pub fn select(&mut self, position: usize) -> Result<(), DocError> {
        self.index_of(position).ok_or(DocError::NoNodeAt(position))?;
        self.selection = Some(position);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// The selected node and its position, if a node is selected.
    #[must_use]
    pub fn selection(&self) -> Option<SelectedNode> {
        let position = self.selection?;
        let node = self.node_at(position)?.clone();
        Some(SelectedNode { position, node })
    }

    /// Apply a transaction. Fails without side effects if its position no
    /// longer names a node.
    pub fn apply(&mut self, tr: &Transaction) -> Result<(), DocError> {
        match tr {
            Transaction::SetNodeAttrs { position, attrs } => {
                let index = self.index_of(*position).ok_or(DocError::NoNodeAt(*position))?;
                self.nodes[index].attrs = attrs.clone();
                Ok(())
            }
            Transaction::SelectNode { position } => self.select(*position),
        }
    }

    fn index_of(&self, position: usize) -> Option<usize> {
        let mut at = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            if at == position {
                return Some(i);
            }
            if at > position {
                return None;
            }
            at += node.node_size();
        }
        None
    }
}
