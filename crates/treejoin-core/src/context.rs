//! Ancestor context passed to every per-node callback.
//!
//! A callback invoked on a leaf of a depth-`D` selection receives `D`
//! [`Level`]s, outermost first. Each non-leaf level records the datum of the
//! element that owns the group being visited and the group's index within
//! its parent; the last level records the leaf element's own datum and index.
//!
//! # Invariants
//!
//! 1. `len() == 2 * depth()`: every level contributes a datum and an index.
//! 2. Levels are ordered outermost-first; [`Context::datum`] and
//!    [`Context::index`] always refer to the innermost level.

/// One `(datum, index)` pair of a [`Context`].
#[derive(Debug, Clone, PartialEq)]
pub struct Level<D> {
    /// Datum of the element at this level, if its slot holds one.
    pub datum: Option<D>,
    /// Position within the enclosing group.
    pub index: usize,
}

/// Ancestor context vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Context<D> {
    levels: Vec<Level<D>>,
}

impl<D> Default for Context<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Context<D> {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self { levels: Vec::new() }
    }

    /// Create an empty context with room for `depth` levels.
    #[must_use]
    pub fn with_capacity(depth: usize) -> Self {
        Self {
            levels: Vec::with_capacity(depth),
        }
    }

    /// Number of levels.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Number of scalar entries (one datum and one index per level).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len() * 2
    }

    /// Whether no level has been pushed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// All levels, outermost first.
    #[must_use]
    pub fn levels(&self) -> &[Level<D>] {
        &self.levels
    }

    /// Level at `depth` (0 is outermost).
    #[must_use]
    pub fn level(&self, depth: usize) -> Option<&Level<D>> {
        self.levels.get(depth)
    }

    /// The innermost level.
    #[must_use]
    pub fn leaf(&self) -> Option<&Level<D>> {
        self.levels.last()
    }

    /// The level directly above the innermost one.
    #[must_use]
    pub fn parent(&self) -> Option<&Level<D>> {
        self.levels.len().checked_sub(2).map(|i| &self.levels[i])
    }

    /// Datum of the innermost level.
    #[must_use]
    pub fn datum(&self) -> Option<&D> {
        self.leaf().and_then(|level| level.datum.as_ref())
    }

    /// Index of the innermost level, `0` when the context is empty.
    #[must_use]
    pub fn index(&self) -> usize {
        self.leaf().map_or(0, |level| level.index)
    }

    /// Datums of all levels, outermost first.
    pub fn data(&self) -> impl Iterator<Item = Option<&D>> {
        self.levels.iter().map(|level| level.datum.as_ref())
    }

    /// Indices of all levels, outermost first.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.levels.iter().map(|level| level.index)
    }

    /// Push a new innermost level.
    pub fn push(&mut self, datum: Option<D>, index: usize) {
        self.levels.push(Level { datum, index });
    }

    /// Remove and return the innermost level.
    pub fn pop(&mut self) -> Option<Level<D>> {
        self.levels.pop()
    }

    /// Replace the innermost datum. No-op on an empty context.
    pub fn set_datum(&mut self, datum: Option<D>) {
        if let Some(level) = self.levels.last_mut() {
            level.datum = datum;
        }
    }
}

impl<D> FromIterator<(Option<D>, usize)> for Context<D> {
    fn from_iter<I: IntoIterator<Item = (Option<D>, usize)>>(iter: I) -> Self {
        Self {
            levels: iter
                .into_iter()
                .map(|(datum, index)| Level { datum, index })
                .collect(),
        }
    }
}
