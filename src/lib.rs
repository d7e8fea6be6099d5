//! Interactive resize handle for embedded images in a rich-text editor.
//!
//! This crate is compiled to WebAssembly and attached to an editor view in
//! the browser. It watches the editor selection, shows a drag handle on the
//! bottom-right corner of a selected image, resizes the image live while the
//! handle is dragged, and on release hands the host one transaction that
//! persists the final `width`/`height` into the image node's attributes.
//!
//! The core is host-agnostic: all rendering and document access goes
//! through the capability traits in [`host`], so the whole state machine is
//! testable without a browser. The `web` feature adds the DOM bindings.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`plugin`] | Per-view [`plugin::ResizeController`]: attach, update, drag, detach |
//! | [`selection`] | Resolving the host selection to a resizable target |
//! | [`input`] | Modifier keys and the drag state machine |
//! | [`handle`] | Handle placement and the owned handle element |
//! | [`commit`] | Writing the final size back as an attribute merge |
//! | [`doc`] | Node kinds, attributes, transactions, in-memory document |
//! | [`host`] | Capability traits implemented by the embedding host |
//! | [`geom`] | Points, boxes, and the clamp / aspect-lock resize math |
//! | [`config`] | Validated, JSON-loadable controller configuration |
//! | [`consts`] | Shared numeric constants (size bounds, handle size, defaults) |
//! | `web` | Browser bindings (`web` feature) |

pub mod commit;
pub mod config;
pub mod consts;
pub mod doc;
pub mod geom;
pub mod handle;
pub mod host;
pub mod input;
pub mod plugin;
pub mod selection;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
#[path = "fake_test.rs"]
pub(crate) mod fake;
