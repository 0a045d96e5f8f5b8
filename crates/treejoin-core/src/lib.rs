#![forbid(unsafe_code)]

//! Core contracts for treejoin.
//!
//! This crate holds everything a selection needs from the outside world and
//! nothing about selections themselves:
//!
//! - [`Tree`], [`ElementOps`] and [`EventTarget`]: the capabilities an
//!   element tree must provide (queries, datum slot, creation, insertion,
//!   attributes, listeners).
//! - [`Context`]: the per-callback ancestor vector of `(datum, index)` pairs.
//! - Argument adapters ([`Selector`], [`SelectorAll`], [`Predicate`],
//!   [`Creator`], [`Value`], [`Data`]) that turn either a literal or a
//!   callback into one callback contract.
//! - [`EventSlot`]: the shared "current event" slot with scoped
//!   save/restore.
//! - [`SelectionError`]: the error taxonomy.

pub mod adapter;
pub mod context;
pub mod error;
pub mod event;
pub mod namespace;
pub mod tree;

pub use adapter::{Creator, Data, DataFn, NodeFn, Predicate, Selector, SelectorAll, Value};
pub use context::{Context, Level};
pub use error::{SelectionError, SelectionResult};
pub use event::{ActiveEvent, EventInit, EventSlot};
pub use namespace::{Name, qualify};
pub use tree::{ElementOps, EventTarget, Listener, Tree};
