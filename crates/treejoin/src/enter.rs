//! Enter and exit companions.
//!
//! A join attaches two companions to the update selection it returns:
//!
//! - [`EnterSelection`]: one placeholder per datum that found no element.
//!   Materializing it creates an element per placeholder, inserts it under
//!   the group's parent, stores the datum on it, and writes the new element
//!   into both the enter slot and the owning update slot.
//! - An exit [`Selection`]: the elements no datum claimed, at their original
//!   indices. Its usual forward operation is [`Selection::remove`].
//!
//! Companions are created empty and memoized on first access when the
//! selection was not produced by a join.
//!
//! # Failure Modes
//!
//! - Placeholders in a group without a parent element fail materialization
//!   with [`SelectionError::MissingParent`]. Every group is checked before
//!   the first element is created, so a failed call leaves the tree and
//!   both companions untouched.

use treejoin_core::{Context, Creator, NodeFn, SelectionError, SelectionResult, Selector, Tree};

use crate::group::{EnterNode, Group, empty_slots};
use crate::selection::Selection;
use crate::walk;

/// Enter companion of a joined selection.
pub struct EnterSelection<T: Tree> {
    pub(crate) root: Group<T::Node, EnterNode<T::Node, T::Datum>>,
    pub(crate) depth: usize,
}

impl<T: Tree> Clone for EnterSelection<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            depth: self.depth,
        }
    }
}

impl<T: Tree> std::fmt::Debug for EnterSelection<T>
where
    T::Datum: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnterSelection")
            .field("depth", &self.depth)
            .field("root", &self.root)
            .finish()
    }
}

impl<T: Tree> EnterSelection<T> {
    /// Wrap a group of enter slots already known to have depth `depth`.
    pub(crate) fn new(root: Group<T::Node, EnterNode<T::Node, T::Datum>>, depth: usize) -> Self {
        debug_assert!(root.has_depth(depth), "group does not have depth {depth}");
        Self { root, depth }
    }

    /// Nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The nested group structure.
    #[must_use]
    pub fn groups(&self) -> &Group<T::Node, EnterNode<T::Node, T::Datum>> {
        &self.root
    }

    /// Number of populated slots, pending or materialized.
    #[must_use]
    pub fn size(&self) -> usize {
        self.root.count()
    }

    /// Whether no slot is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Number of placeholders still waiting for an element.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.root
            .flatten()
            .into_iter()
            .filter(|slot| slot.is_placeholder())
            .count()
    }

    /// Data of pending placeholders in walk order.
    #[must_use]
    pub fn data(&self) -> Vec<&T::Datum> {
        self.root.flatten().into_iter().filter_map(EnterNode::datum).collect()
    }

    /// Elements created for former placeholders, in walk order.
    #[must_use]
    pub fn nodes(&self) -> Vec<T::Node> {
        self.root
            .flatten()
            .into_iter()
            .filter_map(EnterNode::element)
            .cloned()
            .collect()
    }
}

/// Where a materialized element goes among its parent's children.
enum Placement<'a, T: Tree> {
    Append,
    Before(NodeFn<'a, T, Option<T::Node>>),
    NextUpdate,
}

impl<T: Tree> Selection<T> {
    /// The enter companion, created empty (and kept) when absent.
    pub fn enter(&mut self) -> &mut EnterSelection<T> {
        self.enter.get_or_insert_with(|| {
            Box::new(EnterSelection::new(self.root.shaped_like(), self.depth))
        })
    }

    /// The exit companion, created empty (and kept) when absent.
    pub fn exit(&mut self) -> &mut Selection<T> {
        self.exit
            .get_or_insert_with(|| Box::new(Selection::new(self.root.shaped_like(), self.depth)))
    }

    /// Materialize pending placeholders, appending each new element to its
    /// group's parent.
    ///
    /// Returns a selection of the new elements, shaped like the enter
    /// companion. Calling it again creates nothing.
    ///
    /// # Errors
    ///
    /// [`SelectionError::MissingParent`] when a group with placeholders has
    /// no parent element.
    pub fn enter_append<'a>(
        &mut self,
        tree: &mut T,
        creator: impl Into<Creator<'a, T>>,
    ) -> SelectionResult<Selection<T>> {
        self.materialize(tree, creator.into().normalize(), Placement::Append)
    }

    /// Materialize pending placeholders, inserting each new element before
    /// the first match of `before` under the parent. Without `before`, each
    /// element goes before the next update element of its group, so entered
    /// elements land in data order.
    ///
    /// # Errors
    ///
    /// The tree's rejection of `before`, or
    /// [`SelectionError::MissingParent`] when a group with placeholders has
    /// no parent element.
    pub fn enter_insert<'a>(
        &mut self,
        tree: &mut T,
        creator: impl Into<Creator<'a, T>>,
        before: Option<Selector<'a, T>>,
    ) -> SelectionResult<Selection<T>> {
        let placement = match before {
            Some(selector) => Placement::Before(selector.normalize(tree)?),
            None => Placement::NextUpdate,
        };
        self.materialize(tree, creator.into().normalize(), placement)
    }

    fn materialize(
        &mut self,
        tree: &mut T,
        mut create: NodeFn<'_, T, T::Node>,
        mut placement: Placement<'_, T>,
    ) -> SelectionResult<Selection<T>> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("selection_materialize", depth = self.depth).entered();

        let Some(enter) = self.enter.as_deref_mut() else {
            return Ok(Selection::new(self.root.shaped_like(), self.depth));
        };
        if let Some(path) = orphaned(&enter.root, &mut Vec::new()) {
            return Err(SelectionError::MissingParent { path });
        }
        let update = &self.root;

        let created = walk::fold(
            tree,
            &enter.root,
            &mut Context::with_capacity(self.depth),
            &mut Vec::new(),
            &mut |tree, parent, slots, ctx, path| {
                let mut out = empty_slots(slots.len());
                if !slots.iter().flatten().any(EnterNode::is_placeholder) {
                    return Ok(Group::leaf(parent.cloned(), out));
                }
                let Some(parent) = parent else {
                    return Err(SelectionError::MissingParent {
                        path: path.to_vec(),
                    });
                };
                let siblings = update.leaf_at(path).unwrap_or(&[]);
                let datum_of = |_: &T, slot: &EnterNode<T::Node, T::Datum>| slot.datum().cloned();
                walk::visit_slots(tree, slots, ctx, datum_of, |tree, index, slot, ctx| {
                    let EnterNode::Placeholder(datum) = slot else {
                        return Ok(());
                    };
                    let node = create(tree, parent, ctx);
                    let reference = match &mut placement {
                        Placement::Append => None,
                        Placement::Before(before) => before(tree, parent, ctx),
                        Placement::NextUpdate => siblings
                            .get(index + 1..)
                            .into_iter()
                            .flatten()
                            .flatten()
                            .next()
                            .cloned(),
                    };
                    tree.insert_before(parent, &node, reference.as_ref());
                    tree.set_datum(&node, Some(datum.clone()));
                    out[index] = Some(node);
                    Ok::<(), SelectionError>(())
                })?;
                Ok(Group::leaf(Some(parent.clone()), out))
            },
            &mut |parent, groups| Group::branch(parent.cloned(), groups),
        )?;

        settle(&mut enter.root, &mut self.root, &created);

        #[cfg(feature = "tracing")]
        tracing::debug!(created = created.count(), "materialized enter placeholders");

        Ok(Selection::new(created, self.depth))
    }
}

/// Index path of the first group holding placeholders without a parent.
fn orphaned<N, D>(
    group: &Group<N, EnterNode<N, D>>,
    path: &mut Vec<usize>,
) -> Option<Vec<usize>> {
    match group {
        Group::Leaf { parent, slots } => {
            let pending = slots.iter().flatten().any(EnterNode::is_placeholder);
            (pending && parent.is_none()).then(|| path.clone())
        }
        Group::Branch { groups, .. } => groups.iter().enumerate().find_map(|(index, sub)| {
            path.push(index);
            let found = orphaned(sub, path);
            path.pop();
            found
        }),
    }
}

/// Write created elements into the enter and update slots they replace.
fn settle<N: Clone, D>(
    enter: &mut Group<N, EnterNode<N, D>>,
    update: &mut Group<N>,
    created: &Group<N>,
) {
    match (enter, update, created) {
        (
            Group::Leaf { slots: enter, .. },
            Group::Leaf { slots: update, .. },
            Group::Leaf { slots: created, .. },
        ) => {
            for (index, node) in created.iter().enumerate() {
                let Some(node) = node else {
                    continue;
                };
                if let Some(slot) = enter.get_mut(index) {
                    *slot = Some(EnterNode::Element(node.clone()));
                }
                if let Some(slot) = update.get_mut(index) {
                    *slot = Some(node.clone());
                }
            }
        }
        (
            Group::Branch { groups: enter, .. },
            Group::Branch { groups: update, .. },
            Group::Branch { groups: created, .. },
        ) => {
            for ((enter, update), created) in enter.iter_mut().zip(update).zip(created) {
                settle(enter, update, created);
            }
        }
        _ => {}
    }
}
