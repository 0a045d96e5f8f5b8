//! Nested group structure.
//!
//! A depth-`D` selection is a [`Group`] that decomposes through `D - 1`
//! levels of [`Group::Branch`] before reaching [`Group::Leaf`] groups of
//! slots. Slots are `Option`s: narrowing and joining leave gaps where an
//! element has no counterpart, and gaps are preserved positionally.
//!
//! Every group remembers the element that owns it (`parent`). For groups
//! produced by `select_all` this is the element the query ran on; for
//! root-level groups it is the tree root or nothing.

/// A group of slots (leaf) or of sub-groups (branch).
#[derive(Debug, Clone, PartialEq)]
pub enum Group<N, S = N> {
    /// Ordered slots of elements (or enter nodes).
    Leaf {
        /// Element owning this group.
        parent: Option<N>,
        /// Slots, possibly sparse.
        slots: Vec<Option<S>>,
    },
    /// Ordered sub-groups one level deeper.
    Branch {
        /// Element owning this group.
        parent: Option<N>,
        /// Sub-groups.
        groups: Vec<Group<N, S>>,
    },
}

/// A slot of an enter selection.
#[derive(Debug, Clone, PartialEq)]
pub enum EnterNode<N, D> {
    /// Datum waiting for an element.
    Placeholder(D),
    /// Element created for a former placeholder.
    Element(N),
}

impl<N, D> EnterNode<N, D> {
    /// Datum of a pending placeholder.
    #[must_use]
    pub fn datum(&self) -> Option<&D> {
        match self {
            Self::Placeholder(datum) => Some(datum),
            Self::Element(_) => None,
        }
    }

    /// Element of a materialized placeholder.
    #[must_use]
    pub fn element(&self) -> Option<&N> {
        match self {
            Self::Placeholder(_) => None,
            Self::Element(node) => Some(node),
        }
    }

    /// Whether this slot still waits for an element.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// `len` empty slots without requiring `S: Clone`.
pub(crate) fn empty_slots<S>(len: usize) -> Vec<Option<S>> {
    std::iter::repeat_with(|| None).take(len).collect()
}

impl<N, S> Group<N, S> {
    /// Leaf group.
    pub fn leaf(parent: Option<N>, slots: Vec<Option<S>>) -> Self {
        Self::Leaf { parent, slots }
    }

    /// Branch group.
    pub fn branch(parent: Option<N>, groups: Vec<Group<N, S>>) -> Self {
        Self::Branch { parent, groups }
    }

    /// Element owning this group.
    #[must_use]
    pub fn parent(&self) -> Option<&N> {
        match self {
            Self::Leaf { parent, .. } | Self::Branch { parent, .. } => parent.as_ref(),
        }
    }

    /// Whether this is a leaf group.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Number of entries (slots or sub-groups) at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Leaf { slots, .. } => slots.len(),
            Self::Branch { groups, .. } => groups.len(),
        }
    }

    /// Whether this level has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every path from here reaches leaves after exactly `depth - 1`
    /// branch levels.
    #[must_use]
    pub fn has_depth(&self, depth: usize) -> bool {
        match self {
            Self::Leaf { .. } => depth == 1,
            Self::Branch { groups, .. } => {
                depth > 1 && groups.iter().all(|g| g.has_depth(depth - 1))
            }
        }
    }

    /// Number of non-empty leaf slots.
    #[must_use]
    pub fn count(&self) -> usize {
        let mut count = 0;
        self.for_each_leaf(&mut |slots: &[Option<S>]| {
            count += slots.iter().filter(|s| s.is_some()).count();
        });
        count
    }

    /// Visit every leaf group's slots in walk order.
    pub fn for_each_leaf(&self, f: &mut impl FnMut(&[Option<S>])) {
        match self {
            Self::Leaf { slots, .. } => f(slots),
            Self::Branch { groups, .. } => {
                for group in groups {
                    group.for_each_leaf(f);
                }
            }
        }
    }

    /// Non-empty leaf slots in walk order.
    #[must_use]
    pub fn flatten(&self) -> Vec<&S> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    /// Slots of the leaf group at `path`.
    pub(crate) fn leaf_at(&self, path: &[usize]) -> Option<&[Option<S>]> {
        match (self, path.split_first()) {
            (Self::Leaf { slots, .. }, None) => Some(slots),
            (Self::Branch { groups, .. }, Some((head, rest))) => groups.get(*head)?.leaf_at(rest),
            _ => None,
        }
    }

    fn collect_into<'s>(&'s self, out: &mut Vec<&'s S>) {
        match self {
            Self::Leaf { slots, .. } => out.extend(slots.iter().flatten()),
            Self::Branch { groups, .. } => {
                for group in groups {
                    group.collect_into(out);
                }
            }
        }
    }
}

impl<N: Clone, S> Group<N, S> {
    /// Same structure and parents, every slot empty.
    #[must_use]
    pub fn shaped_like<S2>(&self) -> Group<N, S2> {
        match self {
            Self::Leaf { parent, slots } => Group::Leaf {
                parent: parent.clone(),
                slots: empty_slots(slots.len()),
            },
            Self::Branch { parent, groups } => Group::Branch {
                parent: parent.clone(),
                groups: groups.iter().map(Group::shaped_like).collect(),
            },
        }
    }
}
