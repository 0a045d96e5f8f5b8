//! Arena node storage.

use std::fmt;
use std::rc::Rc;

use crate::document::Document;
use crate::event::Event;

/// Index of a node in its [`Document`] arena.
///
/// Ids are only minted by the document and stay valid for its lifetime;
/// detached nodes keep their slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Arena slot.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Namespace URI, `None` for plain attributes.
    pub namespace: Option<String>,
    /// Local name.
    pub local: String,
    /// Value.
    pub value: String,
}

/// Inline style declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name.
    pub name: String,
    /// Property value.
    pub value: String,
    /// `!important` priority.
    pub important: bool,
}

/// Element payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementData {
    /// Namespace URI.
    pub namespace: Option<String>,
    /// Local name.
    pub local: String,
    /// Attributes in insertion order.
    pub attributes: Vec<Attribute>,
    /// Inline style declarations in insertion order.
    pub style: Vec<Declaration>,
}

impl ElementData {
    /// Value of the attribute `(namespace, local)`.
    #[must_use]
    pub fn attribute(&self, namespace: Option<&str>, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == namespace && a.local == local)
            .map(|a| a.value.as_str())
    }

    /// Set attribute `(namespace, local)`, keeping its position if present.
    pub fn set_attribute(&mut self, namespace: Option<&str>, local: &str, value: &str) {
        match self
            .attributes
            .iter_mut()
            .find(|a| a.namespace.as_deref() == namespace && a.local == local)
        {
            Some(existing) => value.clone_into(&mut existing.value),
            None => self.attributes.push(Attribute {
                namespace: namespace.map(str::to_string),
                local: local.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Remove attribute `(namespace, local)`.
    pub fn remove_attribute(&mut self, namespace: Option<&str>, local: &str) {
        self.attributes
            .retain(|a| !(a.namespace.as_deref() == namespace && a.local == local));
    }

    /// Whether the whitespace-separated `class` attribute contains `name`.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.attribute(None, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == name))
    }
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element.
    Element(ElementData),
    /// A text run.
    Text(String),
    /// Markup stored verbatim by `set_inner_html`.
    Markup(String),
}

/// Listener stored on a node.
pub type DomListener<D> = Rc<dyn Fn(&mut Document<D>, &NodeId, &Event<D>)>;

pub(crate) struct Node<D> {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) datum: Option<D>,
    pub(crate) listeners: Vec<(String, DomListener<D>)>,
}

impl<D> Node<D> {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            datum: None,
            listeners: Vec::new(),
        }
    }

    pub(crate) fn element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) | NodeKind::Markup(_) => None,
        }
    }

    pub(crate) fn element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) | NodeKind::Markup(_) => None,
        }
    }
}
