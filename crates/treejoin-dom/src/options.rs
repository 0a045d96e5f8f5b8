//! Document construction options.

use treejoin_core::namespace::XHTML;

/// Options for [`Document::with_options`](crate::Document::with_options).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Local name of the document element.
    pub root_name: String,

    /// Namespace of the document element.
    ///
    /// Elements created by local name inherit the namespace of the element
    /// they are created under, so this is the default namespace of the whole
    /// document.
    pub root_namespace: Option<String>,

    /// Whether bubbling events propagate to ancestors after the target.
    ///
    /// When `false`, every event is delivered to its target only, regardless
    /// of its own `bubbles` flag.
    pub bubbling: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            root_name: "html".to_string(),
            root_namespace: Some(XHTML.to_string()),
            bubbling: true,
        }
    }
}
