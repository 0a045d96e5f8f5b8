//! The [`Selection`] handle.
//!
//! A selection is a nested [`Group`] of element handles at a fixed depth.
//! Narrowing operations (`select`, `select_all`, `filter`) and joins return
//! new selections; the receiver is never modified. Only the tree is mutated,
//! and only by joins (datum reassignment), materialization and the mutation
//! helpers.
//!
//! # Invariants
//!
//! 1. `groups().has_depth(depth())` always holds.
//! 2. [`Selection::each`] invokes its callback exactly once per non-empty
//!    leaf slot, in group order, with a context of `depth()` levels.
//! 3. Enter and exit companions, when present, have the same shape as the
//!    selection that owns them.
//!
//! # Failure Modes
//!
//! - A failing [`Selection::try_each`] callback stops the walk and returns
//!   its error; slots after it are not visited.
//! - A panicking callback unwinds through the walk. Tree mutations already
//!   performed stay in place.

use std::convert::Infallible;

use treejoin_core::{Context, SelectionResult, Selector, SelectorAll, Tree};

use crate::enter::EnterSelection;
use crate::group::Group;
use crate::walk;

/// Handle over a nested group of elements of tree `T`.
pub struct Selection<T: Tree> {
    pub(crate) root: Group<T::Node>,
    pub(crate) depth: usize,
    pub(crate) enter: Option<Box<EnterSelection<T>>>,
    pub(crate) exit: Option<Box<Selection<T>>>,
}

impl<T: Tree> Clone for Selection<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            depth: self.depth,
            enter: self.enter.clone(),
            exit: self.exit.clone(),
        }
    }
}

impl<T: Tree> PartialEq for Selection<T> {
    /// Selections are equal when they cover the same groups; companions are
    /// not compared.
    fn eq(&self, other: &Self) -> bool {
        self.depth == other.depth && self.root == other.root
    }
}

impl<T: Tree> std::fmt::Debug for Selection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selection")
            .field("depth", &self.depth)
            .field("root", &self.root)
            .field("joined", &self.enter.is_some())
            .finish()
    }
}

impl<T: Tree> Selection<T> {
    /// Wrap a group already known to have depth `depth`.
    pub(crate) fn new(root: Group<T::Node>, depth: usize) -> Self {
        debug_assert!(root.has_depth(depth), "group does not have depth {depth}");
        Self {
            root,
            depth,
            enter: None,
            exit: None,
        }
    }

    /// Wrap an existing group, or `None` when some leaf of `root` is not
    /// exactly `depth` levels down.
    #[must_use]
    pub fn from_groups(root: Group<T::Node>, depth: usize) -> Option<Self> {
        root.has_depth(depth).then(|| Self::new(root, depth))
    }

    /// Depth-1 selection of a single element.
    #[must_use]
    pub fn from_node(node: T::Node) -> Self {
        Self::new(Group::leaf(None, vec![Some(node)]), 1)
    }

    /// Depth-1 selection of `nodes`, owned by `parent`.
    #[must_use]
    pub fn from_nodes(parent: Option<T::Node>, nodes: impl IntoIterator<Item = T::Node>) -> Self {
        Self::new(Group::leaf(parent, nodes.into_iter().map(Some).collect()), 1)
    }

    /// Depth-1 selection of the first element matching `selector` under the
    /// tree root. The single slot is empty when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns the tree's rejection of `selector`.
    pub fn select_root<'a>(
        tree: &mut T,
        selector: impl Into<Selector<'a, T>>,
    ) -> SelectionResult<Self> {
        let mut select = selector.into().normalize(tree)?;
        let root = tree.root();
        let found = select(tree, &root, &Context::new());
        Ok(Self::new(Group::leaf(Some(root), vec![found]), 1))
    }

    /// Depth-1 selection of every element matching `selector` under the tree
    /// root, in document order.
    ///
    /// # Errors
    ///
    /// Returns the tree's rejection of `selector`.
    pub fn select_all_root<'a>(
        tree: &mut T,
        selector: impl Into<SelectorAll<'a, T>>,
    ) -> SelectionResult<Self> {
        let mut select = selector.into().normalize(tree)?;
        let root = tree.root();
        let found = select(tree, &root, &Context::new());
        Ok(Self::from_nodes(Some(root), found))
    }

    /// Nesting depth.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The nested group structure.
    #[must_use]
    pub fn groups(&self) -> &Group<T::Node> {
        &self.root
    }

    /// Consume the selection, returning its groups.
    #[must_use]
    pub fn into_groups(self) -> Group<T::Node> {
        self.root
    }

    /// Invoke `f` once per non-empty leaf slot.
    pub fn each(
        &self,
        tree: &mut T,
        mut f: impl FnMut(&mut T, &T::Node, &Context<T::Datum>),
    ) -> &Self {
        let Ok(this) = self.try_each(tree, |tree, node, ctx| {
            f(tree, node, ctx);
            Ok::<(), Infallible>(())
        });
        this
    }

    /// Invoke `f` once per non-empty leaf slot, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_each<E>(
        &self,
        tree: &mut T,
        mut f: impl FnMut(&mut T, &T::Node, &Context<T::Datum>) -> Result<(), E>,
    ) -> Result<&Self, E> {
        walk::fold(
            tree,
            &self.root,
            &mut Context::with_capacity(self.depth),
            &mut Vec::new(),
            &mut |tree, _, slots, ctx, _| {
                walk::visit_slots(tree, slots, ctx, T::datum, |tree, _, node, ctx| {
                    f(tree, node, ctx)
                })
            },
            &mut |_, _| (),
        )?;
        Ok(self)
    }

    /// Number of elements, counted by walking every leaf.
    #[must_use]
    pub fn size(&self) -> usize {
        self.root.count()
    }

    /// Whether the selection holds no element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node().is_none()
    }

    /// First element in walk order.
    #[must_use]
    pub fn node(&self) -> Option<&T::Node> {
        self.root.flatten().into_iter().next()
    }

    /// All elements in walk order.
    #[must_use]
    pub fn nodes(&self) -> Vec<T::Node> {
        self.root.flatten().into_iter().cloned().collect()
    }

    /// Datums of all elements in walk order.
    #[must_use]
    pub fn data(&self, tree: &T) -> Vec<Option<T::Datum>> {
        self.root
            .flatten()
            .into_iter()
            .map(|node| tree.datum(node))
            .collect()
    }

    /// Invoke `f` with this selection once and return the selection.
    pub fn call(&self, tree: &mut T, f: impl FnOnce(&Self, &mut T)) -> &Self {
        f(self, tree);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treejoin_dom::{Document, NodeId};

    fn list(n: usize) -> (Document<i64>, NodeId, Vec<NodeId>) {
        let mut doc = Document::new();
        let root = doc.root();
        let ul = doc.element(root, "ul");
        let items = (0..n)
            .map(|i| {
                let li = doc.element(ul, "li");
                doc.set_node_datum(li, Some(i as i64 * 10));
                li
            })
            .collect();
        (doc, ul, items)
    }

    #[test]
    fn each_visits_every_slot_once_in_order() {
        let (mut doc, _, items) = list(4);
        let sel = Selection::<Document<i64>>::from_nodes(None, items.clone());
        let mut seen = Vec::new();
        sel.each(&mut doc, |_, node, ctx| seen.push((*node, ctx.index(), ctx.datum().copied())));
        let expected: Vec<_> = items
            .iter()
            .enumerate()
            .map(|(i, n)| (*n, i, Some(i as i64 * 10)))
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn each_skips_gaps() {
        let (mut doc, _, items) = list(3);
        let sel = Selection::<Document<i64>>::new(
            Group::leaf(None, vec![Some(items[0]), None, Some(items[2])]),
            1,
        );
        let mut indices = Vec::new();
        sel.each(&mut doc, |_, _, ctx| indices.push(ctx.index()));
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(sel.size(), 2);
    }

    #[test]
    fn from_groups_rejects_uneven_depth() {
        let (_, ul, items) = list(2);
        let uneven = Group::branch(
            None,
            vec![
                Group::leaf(Some(ul), vec![Some(items[0])]),
                Group::branch(Some(ul), vec![Group::leaf(None, vec![Some(items[1])])]),
            ],
        );
        assert!(Selection::<Document<i64>>::from_groups(uneven.clone(), 2).is_none());
        assert!(Selection::<Document<i64>>::from_groups(uneven, 3).is_none());

        let flat = Group::leaf(Some(ul), vec![Some(items[0]), None]);
        assert!(Selection::<Document<i64>>::from_groups(flat.clone(), 2).is_none());
        let sel = Selection::<Document<i64>>::from_groups(flat, 1).unwrap();
        assert_eq!(sel.depth(), 1);
        assert_eq!(sel.size(), 1);
    }

    #[test]
    fn try_each_stops_at_first_error() {
        let (mut doc, _, items) = list(5);
        let sel = Selection::<Document<i64>>::from_nodes(None, items);
        let mut visited = 0;
        let result = sel.try_each(&mut doc, |_, _, ctx| {
            visited += 1;
            if ctx.index() == 2 { Err("boom") } else { Ok(()) }
        });
        assert_eq!(result.err(), Some("boom"));
        assert_eq!(visited, 3, "walk must stop at the failing slot");
    }

    #[test]
    fn empty_selection_accessors() {
        let sel = Selection::<Document<i64>>::from_nodes(None, Vec::new());
        assert!(sel.is_empty());
        assert_eq!(sel.size(), 0);
        assert!(sel.node().is_none());
        assert!(sel.nodes().is_empty());
    }

    #[test]
    fn select_all_root_parents_on_document_root() {
        let (mut doc, _, items) = list(2);
        let sel = Selection::select_all_root(&mut doc, "li").unwrap();
        assert_eq!(sel.nodes(), items);
        assert_eq!(sel.groups().parent(), Some(&doc.root()));
        assert_eq!(sel.data(&doc), vec![Some(0), Some(10)]);
    }

    #[test]
    fn select_root_keeps_empty_slot() {
        let (mut doc, _, _) = list(1);
        let sel = Selection::select_root(&mut doc, "table").unwrap();
        assert_eq!(sel.groups().len(), 1);
        assert!(sel.is_empty());
    }

    #[test]
    fn call_passes_selection_through() {
        let (mut doc, ul, _) = list(1);
        let sel = Selection::<Document<i64>>::from_node(ul);
        let mut seen = None;
        sel.call(&mut doc, |s, _| seen = Some(s.size()));
        assert_eq!(seen, Some(1));
    }
}
