//! Error taxonomy for selection operations.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Raised |
//! |---------|-------|--------|
//! | Invalid selector | Tree rejects the selector string | At adapter normalization, before traversal |
//! | Invalid data | Data callback produced no sequence | At the offending leaf group |
//! | Missing parent | Enter placeholders in a group without a parent element | At materialization |
//!
//! Duplicate join keys are not errors: duplicates are routed to the exit or
//! enter set instead.

/// Result alias for selection operations.
pub type SelectionResult<T> = Result<T, SelectionError>;

/// Errors from selection operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// A selector string was rejected by the tree.
    InvalidSelector {
        /// The offending selector.
        selector: String,
        /// Why the tree rejected it.
        reason: String,
    },
    /// A data callback produced no sequence for a leaf group.
    InvalidData {
        /// Group index path from the root to the leaf group.
        path: Vec<usize>,
    },
    /// Enter placeholders exist in a group that has no parent to insert into.
    MissingParent {
        /// Group index path from the root to the leaf group.
        path: Vec<usize>,
    },
}

impl SelectionError {
    /// Build an [`SelectionError::InvalidSelector`].
    pub fn invalid_selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSelector { selector, reason } => {
                write!(f, "invalid selector '{selector}': {reason}")
            }
            Self::InvalidData { path } => write!(
                f,
                "data callback produced no sequence for group {}",
                DisplayPath(path)
            ),
            Self::MissingParent { path } => write!(
                f,
                "cannot materialize entering data in group {}: group has no parent element",
                DisplayPath(path)
            ),
        }
    }
}

impl std::error::Error for SelectionError {}

struct DisplayPath<'a>(&'a [usize]);

impl std::fmt::Display for DisplayPath<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("/")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_selector() {
        let e = SelectionError::invalid_selector("li[", "unterminated attribute selector");
        assert_eq!(
            e.to_string(),
            "invalid selector 'li[': unterminated attribute selector"
        );
    }

    #[test]
    fn display_paths() {
        let e = SelectionError::InvalidData { path: vec![1, 0] };
        assert_eq!(
            e.to_string(),
            "data callback produced no sequence for group /1/0"
        );

        let e = SelectionError::MissingParent { path: vec![] };
        assert!(e.to_string().contains("group /:"));
    }
}
