#![forbid(unsafe_code)]

//! Arena-backed element tree implementing the treejoin collaborator traits.
//!
//! [`Document`] stores every node in one `Vec` and hands out [`NodeId`]
//! indices, so selections can hold handles without borrowing the tree.
//! Each node carries an optional datum of type `D`, its attributes, inline
//! style and named event listeners.
//!
//! Selectors support a compact subset: type, universal, `#id`, `.class`,
//! attribute tests (`[a]`, `=`, `~=`, `^=`, `$=`, `*=`), the descendant and
//! child combinators, and comma-separated lists. Parsed selectors are cached
//! per document.
//!
//! # Example
//!
//! ```
//! use treejoin_dom::Document;
//!
//! let mut doc = Document::<u32>::new();
//! let root = doc.root();
//! let list = doc.element(root, "ul");
//! let item = doc.element(list, "li");
//! doc.set_attr(item, "class", "active");
//! doc.set_node_datum(item, Some(7));
//!
//! assert_eq!(doc.query_selector(root, "ul > li.active").unwrap(), Some(item));
//! assert_eq!(doc.outer_html(list), "<ul><li class=\"active\"></li></ul>");
//! ```
//!
//! # Feature Flags
//!
//! - `tracing`: trace events per dispatch and debug events on listener
//!   replacement.

mod document;
mod event;
mod node;
mod options;
mod selector;
mod tree_impl;

pub use document::Document;
pub use event::Event;
pub use node::{Attribute, Declaration, DomListener, ElementData, NodeId, NodeKind};
pub use options::DocumentOptions;
pub use selector::{SelectorError, SelectorList, parse};
