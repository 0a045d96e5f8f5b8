//! The data join.
//!
//! A join walks every leaf group, asks the data adapter for that group's
//! data, and reconciles the group's elements against it. Each leaf yields
//! three parallel slot vectors:
//!
//! - **update**: `data.len()` slots, element `i` bound to `data[i]`.
//! - **enter**: `data.len()` slots, a placeholder wherever update is empty.
//! - **exit**: `nodes.len()` slots, the elements no datum claimed.
//!
//! # Invariants
//!
//! 1. For every `i < data.len()` exactly one of `update[i]` and `enter[i]` is
//!    populated.
//! 2. Exit slots sit at the element's original index, so exit order is the
//!    pre-join order.
//! 3. Keyed joins never bind two data to one element and never bind one
//!    datum to two elements. The first element with a key wins; later
//!    elements with the same key exit. Later data with a claimed key enter.
//! 4. Keys are only compared within one leaf group.
//!
//! # Failure Modes
//!
//! - The data adapter returning `None` for a group fails the whole join with
//!   [`SelectionError::InvalidData`]. Data already bound in earlier groups
//!   stays bound.

use std::collections::hash_map::Entry;
use std::hash::Hash;

use ahash::AHashMap;
use treejoin_core::{Context, Data, SelectionError, SelectionResult, Tree};

use crate::enter::EnterSelection;
use crate::group::{EnterNode, Group, empty_slots};
use crate::selection::Selection;
use crate::walk;

/// Slot vectors produced for one leaf group.
pub(crate) struct Bound<N, D> {
    pub(crate) update: Vec<Option<N>>,
    pub(crate) enter: Vec<Option<EnterNode<N, D>>>,
    pub(crate) exit: Vec<Option<N>>,
}

impl<N, D> Bound<N, D> {
    fn with_sizes(nodes: usize, data: usize) -> Self {
        Self {
            update: empty_slots(data),
            enter: empty_slots(data),
            exit: empty_slots(nodes),
        }
    }
}

type Joined<T> = (
    Group<<T as Tree>::Node>,
    Group<<T as Tree>::Node, EnterNode<<T as Tree>::Node, <T as Tree>::Datum>>,
    Group<<T as Tree>::Node>,
);

/// Bind `data` to `nodes` by position.
pub(crate) fn bind_by_index<T: Tree>(
    tree: &mut T,
    nodes: &[Option<T::Node>],
    data: Vec<T::Datum>,
) -> Bound<T::Node, T::Datum> {
    let mut bound = Bound::with_sizes(nodes.len(), data.len());
    let data_len = data.len();
    for (index, datum) in data.into_iter().enumerate() {
        match nodes.get(index).and_then(Option::as_ref) {
            Some(node) => {
                tree.set_datum(node, Some(datum));
                bound.update[index] = Some(node.clone());
            }
            None => bound.enter[index] = Some(EnterNode::Placeholder(datum)),
        }
    }
    for (slot, node) in bound.exit.iter_mut().zip(nodes).skip(data_len) {
        slot.clone_from(node);
    }
    bound
}

enum Claim {
    Free(usize),
    Taken,
}

/// Bind `data` to `nodes` by key.
///
/// `key` receives a node's current datum and index, or a datum and its
/// index in `data`. Nodes without a datum cannot be keyed and exit.
pub(crate) fn bind_by_key<T, K>(
    tree: &mut T,
    nodes: &[Option<T::Node>],
    data: Vec<T::Datum>,
    key: &mut impl FnMut(&T::Datum, usize) -> K,
) -> Bound<T::Node, T::Datum>
where
    T: Tree,
    K: Hash + Eq,
{
    let mut bound = Bound::with_sizes(nodes.len(), data.len());
    let mut by_key: AHashMap<K, Claim> = AHashMap::with_capacity(nodes.len());

    for (index, slot) in nodes.iter().enumerate() {
        let Some(node) = slot else {
            continue;
        };
        let Some(datum) = tree.datum(node) else {
            bound.exit[index] = Some(node.clone());
            continue;
        };
        match by_key.entry(key(&datum, index)) {
            Entry::Occupied(_) => bound.exit[index] = Some(node.clone()),
            Entry::Vacant(vacant) => {
                vacant.insert(Claim::Free(index));
            }
        }
    }

    for (index, datum) in data.into_iter().enumerate() {
        let claimed = match by_key.get_mut(&key(&datum, index)) {
            Some(claim) => match std::mem::replace(claim, Claim::Taken) {
                Claim::Free(at) => nodes[at].as_ref(),
                Claim::Taken => None,
            },
            None => None,
        };
        match claimed {
            Some(node) => {
                tree.set_datum(node, Some(datum));
                bound.update[index] = Some(node.clone());
            }
            None => bound.enter[index] = Some(EnterNode::Placeholder(datum)),
        }
    }

    for claim in by_key.values() {
        if let Claim::Free(at) = *claim {
            bound.exit[at].clone_from(&nodes[at]);
        }
    }
    bound
}

impl<T: Tree> Selection<T> {
    /// Join `data` to the selection by position.
    ///
    /// Returns the update selection; its enter and exit companions are
    /// reachable through [`Selection::enter`] and [`Selection::exit`]. The
    /// receiver is left untouched; only datum slots in the tree change.
    ///
    /// # Errors
    ///
    /// [`SelectionError::InvalidData`] when the data callback yields no
    /// sequence for a group.
    pub fn join<'a>(&self, tree: &mut T, data: impl Into<Data<'a, T>>) -> SelectionResult<Self>
    where
        T::Datum: 'a,
    {
        self.join_with(tree, data.into(), false, |tree, nodes, data| {
            bind_by_index(tree, nodes, data)
        })
    }

    /// Join `data` to the selection by key.
    ///
    /// `key` is called with each element's current datum and index, then
    /// with each datum and its index in the group's data.
    ///
    /// # Errors
    ///
    /// [`SelectionError::InvalidData`] when the data callback yields no
    /// sequence for a group.
    pub fn join_by<'a, K>(
        &self,
        tree: &mut T,
        data: impl Into<Data<'a, T>>,
        mut key: impl FnMut(&T::Datum, usize) -> K,
    ) -> SelectionResult<Self>
    where
        T::Datum: 'a,
        K: Hash + Eq,
    {
        self.join_with(tree, data.into(), true, |tree, nodes, data| {
            bind_by_key(tree, nodes, data, &mut key)
        })
    }

    fn join_with<'a>(
        &self,
        tree: &mut T,
        data: Data<'a, T>,
        keyed: bool,
        mut bind: impl FnMut(&mut T, &[Option<T::Node>], Vec<T::Datum>) -> Bound<T::Node, T::Datum>,
    ) -> SelectionResult<Self>
    where
        T::Datum: 'a,
    {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("selection_join", depth = self.depth, keyed).entered();
        #[cfg(not(feature = "tracing"))]
        let _ = keyed;

        let mut data_for = data.normalize();
        let (update, enter, exit): Joined<T> = walk::fold(
            tree,
            &self.root,
            &mut Context::with_capacity(self.depth),
            &mut Vec::new(),
            &mut |tree, parent, slots, ctx, path| {
                let data = data_for(tree, ctx, slots).ok_or_else(|| SelectionError::InvalidData {
                    path: path.to_vec(),
                })?;
                let bound = bind(tree, slots, data);

                #[cfg(feature = "tracing")]
                tracing::trace!(
                    group = ?path,
                    update = bound.update.iter().flatten().count(),
                    enter = bound.enter.iter().flatten().count(),
                    exit = bound.exit.iter().flatten().count(),
                    "joined leaf group"
                );

                Ok::<_, SelectionError>((
                    Group::leaf(parent.cloned(), bound.update),
                    Group::leaf(parent.cloned(), bound.enter),
                    Group::leaf(parent.cloned(), bound.exit),
                ))
            },
            &mut |parent, parts: Vec<Joined<T>>| {
                let mut update = Vec::with_capacity(parts.len());
                let mut enter = Vec::with_capacity(parts.len());
                let mut exit = Vec::with_capacity(parts.len());
                for (u, n, x) in parts {
                    update.push(u);
                    enter.push(n);
                    exit.push(x);
                }
                (
                    Group::branch(parent.cloned(), update),
                    Group::branch(parent.cloned(), enter),
                    Group::branch(parent.cloned(), exit),
                )
            },
        )?;

        Ok(Self {
            root: update,
            depth: self.depth,
            enter: Some(Box::new(EnterSelection::new(enter, self.depth))),
            exit: Some(Box::new(Self::new(exit, self.depth))),
        })
    }
}
