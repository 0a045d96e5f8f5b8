//! Argument adapters: literal-or-callback normalization.
//!
//! Every selection operation accepts either a literal (a selector string, a
//! constant value, an element name, a data vector) or a callback. Each
//! adapter normalizes both forms into one boxed callback with the uniform
//! per-node contract `(tree, node, context) -> R`, so traversal code only
//! ever sees callbacks.
//!
//! Normalization happens at call time, before any traversal: a selector
//! string the tree rejects fails immediately, even on an empty selection.
//!
//! # Example
//!
//! ```ignore
//! // Literal and callback forms are interchangeable.
//! let items = list.select_all(&mut doc, "li")?;
//! let items = list.select_all(&mut doc, SelectorAll::func(|doc, node, _ctx| {
//!     doc.query_all(node, "li")
//! }))?;
//! ```

use std::borrow::Cow;

use crate::context::Context;
use crate::error::SelectionResult;
use crate::event::EventInit;
use crate::namespace::{Name, qualify};
use crate::tree::Tree;

/// Normalized per-node callback.
pub type NodeFn<'a, T, R> =
    Box<dyn FnMut(&mut T, &<T as Tree>::Node, &Context<<T as Tree>::Datum>) -> R + 'a>;

/// Normalized per-group data callback: receives the group's ancestor context
/// and its current slots, returns the group's data or `None` when it has no
/// sequence to offer.
pub type DataFn<'a, T> = Box<
    dyn FnMut(
            &mut T,
            &Context<<T as Tree>::Datum>,
            &[Option<<T as Tree>::Node>],
        ) -> Option<Vec<<T as Tree>::Datum>>
        + 'a,
>;

// ---------------------------------------------------------------------------
// Selector: single-result narrowing
// ---------------------------------------------------------------------------

/// Single-result selector: a query string or a callback.
pub enum Selector<'a, T: Tree> {
    /// First descendant matching the query.
    Query(Cow<'a, str>),
    /// Arbitrary callback; `None` leaves a gap.
    Func(NodeFn<'a, T, Option<T::Node>>),
}

impl<'a, T: Tree> Selector<'a, T> {
    /// Wrap a callback.
    pub fn func(
        f: impl FnMut(&mut T, &T::Node, &Context<T::Datum>) -> Option<T::Node> + 'a,
    ) -> Self {
        Self::Func(Box::new(f))
    }

    /// Normalize into a callback.
    ///
    /// # Errors
    ///
    /// Returns the tree's rejection of a query string.
    pub fn normalize(self, tree: &T) -> SelectionResult<NodeFn<'a, T, Option<T::Node>>> {
        match self {
            Self::Query(selector) => {
                tree.check_selector(&selector)?;
                Ok(Box::new(move |tree: &mut T, node: &T::Node, _: &Context<T::Datum>| {
                    tree.query_one(node, &selector)
                }))
            }
            Self::Func(f) => Ok(f),
        }
    }
}

impl<'a, T: Tree> From<&'a str> for Selector<'a, T> {
    fn from(selector: &'a str) -> Self {
        Self::Query(Cow::Borrowed(selector))
    }
}

impl<T: Tree> From<String> for Selector<'_, T> {
    fn from(selector: String) -> Self {
        Self::Query(Cow::Owned(selector))
    }
}

// ---------------------------------------------------------------------------
// SelectorAll: multi-result narrowing
// ---------------------------------------------------------------------------

/// Multi-result selector: a query string or a callback.
pub enum SelectorAll<'a, T: Tree> {
    /// All descendants matching the query.
    Query(Cow<'a, str>),
    /// Arbitrary callback returning the new group's members.
    Func(NodeFn<'a, T, Vec<T::Node>>),
}

impl<'a, T: Tree> SelectorAll<'a, T> {
    /// Wrap a callback.
    pub fn func(f: impl FnMut(&mut T, &T::Node, &Context<T::Datum>) -> Vec<T::Node> + 'a) -> Self {
        Self::Func(Box::new(f))
    }

    /// Normalize into a callback.
    ///
    /// # Errors
    ///
    /// Returns the tree's rejection of a query string.
    pub fn normalize(self, tree: &T) -> SelectionResult<NodeFn<'a, T, Vec<T::Node>>> {
        match self {
            Self::Query(selector) => {
                tree.check_selector(&selector)?;
                Ok(Box::new(move |tree: &mut T, node: &T::Node, _: &Context<T::Datum>| {
                    tree.query_all(node, &selector)
                }))
            }
            Self::Func(f) => Ok(f),
        }
    }
}

impl<'a, T: Tree> From<&'a str> for SelectorAll<'a, T> {
    fn from(selector: &'a str) -> Self {
        Self::Query(Cow::Borrowed(selector))
    }
}

impl<T: Tree> From<String> for SelectorAll<'_, T> {
    fn from(selector: String) -> Self {
        Self::Query(Cow::Owned(selector))
    }
}

// ---------------------------------------------------------------------------
// Predicate: filtering
// ---------------------------------------------------------------------------

/// Filter predicate: a selector the node must match, or a callback.
pub enum Predicate<'a, T: Tree> {
    /// Keep nodes matching the selector.
    Matches(Cow<'a, str>),
    /// Keep nodes for which the callback returns `true`.
    Func(NodeFn<'a, T, bool>),
}

impl<'a, T: Tree> Predicate<'a, T> {
    /// Wrap a callback.
    pub fn func(f: impl FnMut(&mut T, &T::Node, &Context<T::Datum>) -> bool + 'a) -> Self {
        Self::Func(Box::new(f))
    }

    /// Normalize into a callback.
    ///
    /// # Errors
    ///
    /// Returns the tree's rejection of a selector string.
    pub fn normalize(self, tree: &T) -> SelectionResult<NodeFn<'a, T, bool>> {
        match self {
            Self::Matches(selector) => {
                tree.check_selector(&selector)?;
                Ok(Box::new(move |tree: &mut T, node: &T::Node, _: &Context<T::Datum>| {
                    tree.matches(node, &selector)
                }))
            }
            Self::Func(f) => Ok(f),
        }
    }
}

impl<'a, T: Tree> From<&'a str> for Predicate<'a, T> {
    fn from(selector: &'a str) -> Self {
        Self::Matches(Cow::Borrowed(selector))
    }
}

impl<T: Tree> From<String> for Predicate<'_, T> {
    fn from(selector: String) -> Self {
        Self::Matches(Cow::Owned(selector))
    }
}

// ---------------------------------------------------------------------------
// Creator: element factories
// ---------------------------------------------------------------------------

/// Element factory: an element name or a callback.
///
/// The node passed to the callback is the scope the new element will be
/// inserted under.
pub enum Creator<'a, T: Tree> {
    /// Create an element with this (possibly prefixed) name.
    Name(Cow<'a, str>),
    /// Arbitrary factory callback.
    Func(NodeFn<'a, T, T::Node>),
}

impl<'a, T: Tree> Creator<'a, T> {
    /// Wrap a callback.
    pub fn func(f: impl FnMut(&mut T, &T::Node, &Context<T::Datum>) -> T::Node + 'a) -> Self {
        Self::Func(Box::new(f))
    }

    /// Normalize into a callback. Names are namespace-qualified once, here.
    #[must_use]
    pub fn normalize(self) -> NodeFn<'a, T, T::Node> {
        match self {
            Self::Name(name) => {
                let name: Name = qualify(&name);
                Box::new(move |tree: &mut T, scope: &T::Node, _: &Context<T::Datum>| {
                    tree.create_element(scope, &name)
                })
            }
            Self::Func(f) => f,
        }
    }
}

impl<'a, T: Tree> From<&'a str> for Creator<'a, T> {
    fn from(name: &'a str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }
}

impl<T: Tree> From<String> for Creator<'_, T> {
    fn from(name: String) -> Self {
        Self::Name(Cow::Owned(name))
    }
}

// ---------------------------------------------------------------------------
// Value: constants for mutation helpers
// ---------------------------------------------------------------------------

/// Per-node value: a constant shared by every node, or a callback.
pub enum Value<'a, T: Tree, V> {
    /// Same value for every node.
    Constant(V),
    /// Value computed per node.
    Func(NodeFn<'a, T, V>),
}

impl<'a, T: Tree, V: Clone + 'a> Value<'a, T, V> {
    /// Wrap a constant.
    pub fn constant(value: V) -> Self {
        Self::Constant(value)
    }

    /// Wrap a callback.
    pub fn func(f: impl FnMut(&mut T, &T::Node, &Context<T::Datum>) -> V + 'a) -> Self {
        Self::Func(Box::new(f))
    }

    /// Whether this is a constant.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    /// Normalize into a callback.
    #[must_use]
    pub fn normalize(self) -> NodeFn<'a, T, V> {
        match self {
            Self::Constant(value) => {
                Box::new(move |_: &mut T, _: &T::Node, _: &Context<T::Datum>| value.clone())
            }
            Self::Func(f) => f,
        }
    }
}

impl<T: Tree> From<&str> for Value<'_, T, Option<String>> {
    fn from(value: &str) -> Self {
        Self::Constant(Some(value.to_string()))
    }
}

impl<T: Tree> From<String> for Value<'_, T, Option<String>> {
    fn from(value: String) -> Self {
        Self::Constant(Some(value))
    }
}

impl<T: Tree> From<Option<&str>> for Value<'_, T, Option<String>> {
    fn from(value: Option<&str>) -> Self {
        Self::Constant(value.map(str::to_string))
    }
}

impl<T: Tree> From<bool> for Value<'_, T, bool> {
    fn from(value: bool) -> Self {
        Self::Constant(value)
    }
}

impl<T: Tree> From<EventInit<T::Datum>> for Value<'_, T, EventInit<T::Datum>> {
    fn from(init: EventInit<T::Datum>) -> Self {
        Self::Constant(init)
    }
}

// ---------------------------------------------------------------------------
// Data: join input
// ---------------------------------------------------------------------------

/// Join input: one data vector for every group, or a per-group callback.
pub enum Data<'a, T: Tree> {
    /// The same data for every leaf group.
    Values(Vec<T::Datum>),
    /// Data computed per leaf group.
    Func(DataFn<'a, T>),
}

impl<'a, T: Tree> Data<'a, T> {
    /// Wrap a per-group callback.
    pub fn func(
        f: impl FnMut(&mut T, &Context<T::Datum>, &[Option<T::Node>]) -> Option<Vec<T::Datum>> + 'a,
    ) -> Self {
        Self::Func(Box::new(f))
    }

    /// Normalize into a callback.
    #[must_use]
    pub fn normalize(self) -> DataFn<'a, T>
    where
        T::Datum: 'a,
    {
        match self {
            Self::Values(values) => Box::new(
                move |_: &mut T, _: &Context<T::Datum>, _: &[Option<T::Node>]| {
                    Some(values.clone())
                },
            ),
            Self::Func(f) => f,
        }
    }
}

impl<T: Tree> From<Vec<T::Datum>> for Data<'_, T> {
    fn from(values: Vec<T::Datum>) -> Self {
        Self::Values(values)
    }
}
