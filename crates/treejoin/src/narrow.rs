//! Narrowing: `select`, `select_all`, `filter`.
//!
//! Each operation re-walks the receiver and builds a fresh group structure.
//! Branch levels are copied with their parents; only leaf groups change.
//!
//! | Operation | Depth | Leaf result |
//! |-----------|-------|-------------|
//! | `select` | unchanged | same length, gaps where nothing was found |
//! | `select_all` | `+ 1` | one sub-group per slot, parented on the slot's element |
//! | `filter` | unchanged | dense, order preserved |

use std::convert::Infallible;

use treejoin_core::{Context, NodeFn, Predicate, SelectionResult, Selector, SelectorAll, Tree};

use crate::group::{Group, empty_slots};
use crate::selection::Selection;
use crate::walk;

impl<T: Tree> Selection<T> {
    /// For each element, select its first match. Gaps stay gaps; an element
    /// with a datum passes it on to the selected element.
    ///
    /// # Errors
    ///
    /// Returns the tree's rejection of a selector string.
    pub fn select<'a>(
        &self,
        tree: &mut T,
        selector: impl Into<Selector<'a, T>>,
    ) -> SelectionResult<Self> {
        let select = selector.into().normalize(tree)?;
        Ok(self.select_with(tree, select))
    }

    pub(crate) fn select_with(
        &self,
        tree: &mut T,
        mut select: NodeFn<'_, T, Option<T::Node>>,
    ) -> Self {
        let Ok(root) = walk::fold(
            tree,
            &self.root,
            &mut Context::with_capacity(self.depth),
            &mut Vec::new(),
            &mut |tree, parent, slots, ctx, _| {
                let mut out = empty_slots(slots.len());
                let visit = |tree: &mut T, index: usize, node: &T::Node, ctx: &Context<T::Datum>| {
                    if let Some(found) = select(tree, node, ctx) {
                        if let Some(datum) = ctx.datum() {
                            tree.set_datum(&found, Some(datum.clone()));
                        }
                        out[index] = Some(found);
                    }
                    Ok::<(), Infallible>(())
                };
                let Ok(()) = walk::visit_slots(tree, slots, ctx, T::datum, visit);
                Ok::<_, Infallible>(Group::leaf(parent.cloned(), out))
            },
            &mut |parent, groups| Group::branch(parent.cloned(), groups),
        );
        Self::new(root, self.depth)
    }

    /// For each element, select all matches as a new sub-group owned by that
    /// element. The result is one level deeper.
    ///
    /// # Errors
    ///
    /// Returns the tree's rejection of a selector string.
    pub fn select_all<'a>(
        &self,
        tree: &mut T,
        selector: impl Into<SelectorAll<'a, T>>,
    ) -> SelectionResult<Self> {
        let mut select = selector.into().normalize(tree)?;
        let Ok(root) = walk::fold(
            tree,
            &self.root,
            &mut Context::with_capacity(self.depth),
            &mut Vec::new(),
            &mut |tree, parent, slots, ctx, _| {
                let mut groups: Vec<Group<T::Node>> =
                    std::iter::repeat_with(|| Group::leaf(None, Vec::new()))
                        .take(slots.len())
                        .collect();
                let visit = |tree: &mut T, index: usize, node: &T::Node, ctx: &Context<T::Datum>| {
                    let found = select(tree, node, ctx);
                    groups[index] =
                        Group::leaf(Some(node.clone()), found.into_iter().map(Some).collect());
                    Ok::<(), Infallible>(())
                };
                let Ok(()) = walk::visit_slots(tree, slots, ctx, T::datum, visit);
                Ok::<_, Infallible>(Group::branch(parent.cloned(), groups))
            },
            &mut |parent, groups| Group::branch(parent.cloned(), groups),
        );
        Ok(Self::new(root, self.depth + 1))
    }

    /// Keep the elements accepted by `predicate`. Survivors form dense
    /// groups in their original order.
    ///
    /// # Errors
    ///
    /// Returns the tree's rejection of a selector string.
    pub fn filter<'a>(
        &self,
        tree: &mut T,
        predicate: impl Into<Predicate<'a, T>>,
    ) -> SelectionResult<Self> {
        let mut keep = predicate.into().normalize(tree)?;
        let Ok(root) = walk::fold(
            tree,
            &self.root,
            &mut Context::with_capacity(self.depth),
            &mut Vec::new(),
            &mut |tree, parent, slots, ctx, _| {
                let mut out = Vec::with_capacity(slots.len());
                let visit = |tree: &mut T, _: usize, node: &T::Node, ctx: &Context<T::Datum>| {
                    if keep(tree, node, ctx) {
                        out.push(Some(node.clone()));
                    }
                    Ok::<(), Infallible>(())
                };
                let Ok(()) = walk::visit_slots(tree, slots, ctx, T::datum, visit);
                Ok::<_, Infallible>(Group::leaf(parent.cloned(), out))
            },
            &mut |parent, groups| Group::branch(parent.cloned(), groups),
        );
        Ok(Self::new(root, self.depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treejoin_dom::{Document, NodeId};

    /// `<table>` of `rows` rows with `cols` cells; cells alternate `even`/`odd`.
    fn table(rows: usize, cols: usize) -> (Document<i64>, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let table = doc.element(root, "table");
        for r in 0..rows {
            let tr = doc.element(table, "tr");
            doc.set_node_datum(tr, Some(r as i64));
            for c in 0..cols {
                let td = doc.element(tr, "td");
                doc.set_attr(td, "class", if c % 2 == 0 { "even" } else { "odd" });
            }
        }
        (doc, table)
    }

    #[test]
    fn select_all_adds_a_level_parented_on_source() {
        let (mut doc, _) = table(2, 3);
        let rows = Selection::select_all_root(&mut doc, "tr").unwrap();
        let cells = rows.select_all(&mut doc, "td").unwrap();
        assert_eq!(cells.depth(), 2);
        assert_eq!(cells.size(), 6);
        match cells.groups() {
            Group::Branch { groups, .. } => {
                assert_eq!(groups.len(), 2);
                assert_eq!(groups[1].parent(), rows.nodes().get(1));
            }
            Group::Leaf { .. } => panic!("expected branch"),
        }
    }

    #[test]
    fn context_carries_row_datum_and_indices() {
        let (mut doc, _) = table(2, 2);
        let cells = Selection::select_all_root(&mut doc, "tr")
            .unwrap()
            .select_all(&mut doc, "td")
            .unwrap();
        let mut seen = Vec::new();
        cells.each(&mut doc, |_, _, ctx| {
            assert_eq!(ctx.len(), 4);
            let row = ctx.level(0).unwrap();
            seen.push((row.datum, row.index, ctx.index()));
        });
        assert_eq!(
            seen,
            vec![(Some(0), 0, 0), (Some(0), 0, 1), (Some(1), 1, 0), (Some(1), 1, 1)]
        );
    }

    #[test]
    fn select_keeps_gaps_and_propagates_datum() {
        let mut doc = Document::<i64>::new();
        let root = doc.root();
        let a = doc.element(root, "div");
        let b = doc.element(root, "div");
        let span = doc.element(a, "span");
        doc.set_node_datum(a, Some(7));
        let divs = Selection::<Document<i64>>::from_nodes(Some(root), [a, b]);
        let spans = divs.select(&mut doc, "span").unwrap();
        assert_eq!(spans.groups(), &Group::leaf(Some(root), vec![Some(span), None]));
        assert_eq!(doc.node_datum(span), Some(&7));
    }

    #[test]
    fn select_without_datum_leaves_target_untouched() {
        let mut doc = Document::<i64>::new();
        let root = doc.root();
        let div = doc.element(root, "div");
        let span = doc.element(div, "span");
        doc.set_node_datum(span, Some(3));
        Selection::<Document<i64>>::from_node(div)
            .select(&mut doc, "span")
            .unwrap();
        assert_eq!(doc.node_datum(span), Some(&3));
    }

    #[test]
    fn filter_is_dense_and_ordered() {
        let (mut doc, _) = table(1, 5);
        let cells = Selection::select_all_root(&mut doc, "td").unwrap();
        let odd = cells.filter(&mut doc, ".odd").unwrap();
        assert_eq!(odd.depth(), 1);
        let all = cells.nodes();
        assert_eq!(odd.nodes(), vec![all[1], all[3]]);
        assert!(odd.groups().flatten().len() == odd.groups().len(), "no gaps after filter");
    }

    #[test]
    fn filter_by_callback_sees_index() {
        let (mut doc, _) = table(1, 4);
        let cells = Selection::select_all_root(&mut doc, "td").unwrap();
        let tail = cells
            .filter(&mut doc, Predicate::<Document<i64>>::func(|_, _, ctx| ctx.index() >= 2))
            .unwrap();
        assert_eq!(tail.size(), 2);
    }

    #[test]
    fn invalid_selector_fails_even_when_empty() {
        let mut doc = Document::<i64>::new();
        let empty = Selection::<Document<i64>>::from_nodes(None, Vec::new());
        assert!(empty.select(&mut doc, "[").is_err());
        assert!(empty.select_all(&mut doc, "a >").is_err());
        assert!(empty.filter(&mut doc, "#").is_err());
    }

    #[test]
    fn select_all_on_gap_yields_empty_group() {
        let (mut doc, _) = table(1, 1);
        let tr = Selection::select_all_root(&mut doc, "tr").unwrap().nodes()[0];
        let sel = Selection::<Document<i64>>::new(Group::leaf(None, vec![None, Some(tr)]), 1);
        let cells = sel.select_all(&mut doc, "td").unwrap();
        match cells.groups() {
            Group::Branch { groups, .. } => {
                assert!(groups[0].is_empty());
                assert_eq!(groups[0].parent(), None);
                assert_eq!(groups[1].len(), 1);
            }
            Group::Leaf { .. } => panic!("expected branch"),
        }
    }
}
