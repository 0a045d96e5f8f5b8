#![forbid(unsafe_code)]

//! Hierarchical selections and data joins over element trees.
//!
//! A [`Selection`] is a nested group of element handles at a fixed depth.
//! Narrowing (`select`, `select_all`, `filter`) builds new selections; a
//! join binds a data sequence to each leaf group and splits it into the
//! update, enter and exit sets.
//!
//! # Example
//!
//! ```ignore
//! use treejoin::Selection;
//! use treejoin_dom::Document;
//!
//! let mut doc = Document::<i64>::new();
//! let list = doc.element(doc.root(), "ul");
//!
//! let mut items = Selection::<Document<i64>>::from_node(list)
//!     .select_all(&mut doc, "li")?
//!     .join(&mut doc, vec![1, 2, 3])?;
//! items.enter_append(&mut doc, "li")?;
//! items.text(&mut doc, treejoin::Value::func(|_, _, ctx| ctx.datum().map(i64::to_string)));
//! items.exit().remove(&mut doc);
//! ```
//!
//! # Modules
//!
//! - [`group`]: the `Leaf | Branch` group union and enter slots.
//! - `walk`: the one depth-generic traversal every operation uses.
//! - `narrow`, `join`, `enter`: the selection algebra.
//! - `ops`, `events`: thin helpers built on [`Selection::each`].
//!
//! # Feature Flags
//!
//! - `tracing`: debug spans around joins and enter materialization, trace
//!   events per joined group and per dispatched event.

pub mod enter;
pub mod group;
mod events;
mod join;
mod narrow;
mod ops;
pub mod selection;
mod walk;

pub use enter::EnterSelection;
pub use group::{EnterNode, Group};
pub use selection::Selection;
pub use treejoin_core::{
    Context, Creator, Data, ElementOps, EventInit, EventSlot, EventTarget, Level, Listener, Name,
    Predicate, SelectionError, SelectionResult, Selector, SelectorAll, Tree, Value, namespace,
    qualify,
};
