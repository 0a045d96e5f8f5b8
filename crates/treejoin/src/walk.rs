//! Depth-generic traversal.
//!
//! One recursive fold serves every operation and every depth. Branch levels
//! only extend the [`Context`] with `(datum of the sub-group's parent,
//! sub-group index)` and recurse; leaf groups are handed to the caller's leaf
//! function together with the accumulated context. [`visit_slots`] then
//! pushes the leaf's own `(datum, index)` for each non-empty slot.
//!
//! The context buffer is owned by the operation and reused across the whole
//! walk. Callbacks only ever see it through a shared borrow, so no state
//! outlives a call.

use treejoin_core::{Context, Tree};

use crate::group::Group;

/// Fold a nested group bottom-up.
///
/// `leaf` receives the tree, the leaf group's parent, its slots, the ancestor
/// context (`depth - 1` levels) and the group's index path. `branch` combines
/// the results of a branch's sub-groups.
pub(crate) fn fold<T, S, O, E, L, B>(
    tree: &mut T,
    group: &Group<T::Node, S>,
    ctx: &mut Context<T::Datum>,
    path: &mut Vec<usize>,
    leaf: &mut L,
    branch: &mut B,
) -> Result<O, E>
where
    T: Tree,
    L: FnMut(
        &mut T,
        Option<&T::Node>,
        &[Option<S>],
        &mut Context<T::Datum>,
        &[usize],
    ) -> Result<O, E>,
    B: FnMut(Option<&T::Node>, Vec<O>) -> O,
{
    match group {
        Group::Leaf { parent, slots } => leaf(tree, parent.as_ref(), slots, ctx, path),
        Group::Branch { parent, groups } => {
            let mut out = Vec::with_capacity(groups.len());
            for (index, sub) in groups.iter().enumerate() {
                let datum = sub.parent().and_then(|owner| tree.datum(owner));
                ctx.push(datum, index);
                path.push(index);
                let result = fold(tree, sub, ctx, path, leaf, branch);
                path.pop();
                ctx.pop();
                out.push(result?);
            }
            Ok(branch(parent.as_ref(), out))
        }
    }
}

/// Invoke `f` once per non-empty slot, with the slot's own level pushed.
pub(crate) fn visit_slots<T, S, E>(
    tree: &mut T,
    slots: &[Option<S>],
    ctx: &mut Context<T::Datum>,
    datum_of: impl Fn(&T, &S) -> Option<T::Datum>,
    mut f: impl FnMut(&mut T, usize, &S, &Context<T::Datum>) -> Result<(), E>,
) -> Result<(), E>
where
    T: Tree,
{
    for (index, slot) in slots.iter().enumerate() {
        let Some(item) = slot else {
            continue;
        };
        ctx.push(datum_of(tree, item), index);
        let result = f(tree, index, item, ctx);
        ctx.pop();
        result?;
    }
    Ok(())
}
