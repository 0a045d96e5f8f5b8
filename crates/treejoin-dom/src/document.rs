//! The arena document.
//!
//! # Invariants
//!
//! 1. Every node other than the document element has at most one parent,
//!    and appears exactly once in that parent's child list.
//! 2. Attaching a node that already has a parent detaches it first.
//! 3. Node ids are never reused; detached nodes keep their slot, their
//!    datum and their listeners.
//!
//! # Failure Modes
//!
//! - Ids from another document index a foreign arena: out-of-range ids
//!   panic, in-range ids address an unrelated node.
//! - Malformed selectors make the query methods return
//!   [`SelectorError`]; the trait queries return "no match" instead, since
//!   selections validate selectors before traversing.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use treejoin_core::namespace::{XLINK, XML, XMLNS};
use treejoin_core::{EventSlot, Name, qualify};

use crate::event::Event;
use crate::node::{Declaration, ElementData, Node, NodeId, NodeKind};
use crate::options::DocumentOptions;
use crate::selector::{self, SelectorError, SelectorList};

/// In-memory element tree with a datum slot per node.
pub struct Document<D> {
    nodes: Vec<Node<D>>,
    root: NodeId,
    options: DocumentOptions,
    events: EventSlot<Event<D>>,
    selectors: RefCell<AHashMap<String, Rc<SelectorList>>>,
}

impl<D> fmt::Debug for Document<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .field("options", &self.options)
            .finish()
    }
}

impl<D> Default for Document<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Document<D> {
    /// Create a document with default options: an `html` element in the
    /// XHTML namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(DocumentOptions::default())
    }

    /// Create a document with `options`.
    #[must_use]
    pub fn with_options(options: DocumentOptions) -> Self {
        let root = Node::new(NodeKind::Element(ElementData {
            namespace: options.root_namespace.clone(),
            local: options.root_name.clone(),
            ..ElementData::default()
        }));
        Self {
            nodes: vec![root],
            root: NodeId::from_index(0),
            options,
            events: EventSlot::new(),
            selectors: RefCell::new(AHashMap::new()),
        }
    }

    /// Options the document was built with.
    #[must_use]
    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// The document element.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes ever created, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the document element always exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The shared current-event slot.
    #[must_use]
    pub fn events(&self) -> &EventSlot<Event<D>> {
        &self.events
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<D> {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<D> {
        &mut self.nodes[id.index()]
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Create a detached element.
    pub fn create_element_ns(&mut self, namespace: Option<&str>, local: &str) -> NodeId {
        self.push(NodeKind::Element(ElementData {
            namespace: namespace.map(str::to_string),
            local: local.to_string(),
            ..ElementData::default()
        }))
    }

    /// Create a detached element named `name` (possibly prefixed). Local
    /// names take the namespace of `scope`.
    pub fn create_named(&mut self, scope: NodeId, name: &Name) -> NodeId {
        match name {
            Name::Qualified { space, local } => self.create_element_ns(Some(space), local),
            Name::Local(local) => {
                let namespace = self.namespace(scope).map(str::to_string);
                self.create_element_ns(namespace.as_deref(), local)
            }
        }
    }

    /// Create an element named `name` and append it to `parent`.
    pub fn element(&mut self, parent: NodeId, name: &str) -> NodeId {
        let child = self.create_named(parent, &qualify(name));
        self.append_child(parent, child);
        child
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    // -----------------------------------------------------------------------
    // Structure
    // -----------------------------------------------------------------------

    /// Parent of `node`.
    #[must_use]
    pub fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    /// Children of `node` in order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    /// What `node` holds.
    #[must_use]
    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.node(node).kind
    }

    /// Element payload of `node`, if it is an element.
    #[must_use]
    pub fn element_data(&self, node: NodeId) -> Option<&ElementData> {
        self.node(node).element()
    }

    /// Local name of an element.
    #[must_use]
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element_data(node).map(|el| el.local.as_str())
    }

    /// Namespace of an element.
    #[must_use]
    pub fn namespace(&self, node: NodeId) -> Option<&str> {
        self.element_data(node).and_then(|el| el.namespace.as_deref())
    }

    /// Detach `node` from its parent. No-op when detached.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.node_mut(node).parent.take() else {
            return;
        };
        self.node_mut(parent).children.retain(|child| *child != node);
    }

    /// Append `child` to `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_child(parent, child, None);
    }

    /// Insert `child` under `parent` before `reference`. A missing reference,
    /// or one that is not a child of `parent`, appends.
    pub fn insert_child(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if child == parent || self.is_ancestor(child, parent) {
            return;
        }
        self.detach(child);
        let siblings = &mut self.node_mut(parent).children;
        let at = reference
            .and_then(|r| siblings.iter().position(|s| *s == r))
            .unwrap_or(siblings.len());
        siblings.insert(at, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Whether `ancestor` is a proper ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent_node(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent_node(id);
        }
        false
    }

    fn clear_children(&mut self, node: NodeId) {
        for child in std::mem::take(&mut self.node_mut(node).children) {
            self.node_mut(child).parent = None;
        }
    }

    /// Descendants of `scope` in document order, `scope` excluded.
    pub fn descendants(&self, scope: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(self.children(next).iter().rev().copied());
            Some(next)
        })
    }

    // -----------------------------------------------------------------------
    // Datum
    // -----------------------------------------------------------------------

    /// Datum stored on `node`.
    #[must_use]
    pub fn node_datum(&self, node: NodeId) -> Option<&D> {
        self.node(node).datum.as_ref()
    }

    /// Replace the datum stored on `node`.
    pub fn set_node_datum(&mut self, node: NodeId, datum: Option<D>) {
        self.node_mut(node).datum = datum;
    }

    // -----------------------------------------------------------------------
    // Attributes and style
    // -----------------------------------------------------------------------

    /// Plain (namespace-less) attribute of an element.
    #[must_use]
    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element_data(node)?.attribute(None, name)
    }

    /// Set a plain attribute. Ignored on non-elements.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.node_mut(node).element_mut() {
            el.set_attribute(None, name, value);
        }
    }

    pub(crate) fn attribute_named(&self, node: NodeId, name: &Name) -> Option<&str> {
        self.element_data(node)?.attribute(name.space(), name.local())
    }

    pub(crate) fn set_attribute_named(&mut self, node: NodeId, name: &Name, value: &str) {
        if let Some(el) = self.node_mut(node).element_mut() {
            el.set_attribute(name.space(), name.local(), value);
        }
    }

    pub(crate) fn remove_attribute_named(&mut self, node: NodeId, name: &Name) {
        if let Some(el) = self.node_mut(node).element_mut() {
            el.remove_attribute(name.space(), name.local());
        }
    }

    /// Inline style property of an element.
    #[must_use]
    pub fn style_property(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element_data(node)?
            .style
            .iter()
            .find(|decl| decl.name == name)
            .map(|decl| decl.value.as_str())
    }

    /// Set an inline style property, keeping its position if present.
    pub fn set_style(&mut self, node: NodeId, name: &str, value: &str, important: bool) {
        let Some(el) = self.node_mut(node).element_mut() else {
            return;
        };
        match el.style.iter_mut().find(|decl| decl.name == name) {
            Some(decl) => {
                value.clone_into(&mut decl.value);
                decl.important = important;
            }
            None => el.style.push(Declaration {
                name: name.to_string(),
                value: value.to_string(),
                important,
            }),
        }
    }

    /// Remove an inline style property.
    pub fn remove_style(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.node_mut(node).element_mut() {
            el.style.retain(|decl| decl.name != name);
        }
    }

    // -----------------------------------------------------------------------
    // Content
    // -----------------------------------------------------------------------

    /// Concatenated text of `node` and its descendants. Raw markup
    /// contributes its text with tags stripped.
    #[must_use]
    pub fn text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.node(node).kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Markup(markup) => strip_tags(markup, out),
            NodeKind::Element(_) => {
                for child in self.children(node) {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Replace the children of `node` with one text node (none when `text`
    /// is empty).
    pub fn replace_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        if !text.is_empty() {
            let child = self.create_text(text);
            self.append_child(node, child);
        }
    }

    /// Replace the children of `node` with raw markup (none when `markup` is
    /// empty).
    pub fn replace_markup(&mut self, node: NodeId, markup: &str) {
        self.clear_children(node);
        if !markup.is_empty() {
            let child = self.push(NodeKind::Markup(markup.to_string()));
            self.append_child(node, child);
        }
    }

    /// Serialized markup of `node` and its descendants.
    #[must_use]
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.serialize(node, &mut out);
        out
    }

    /// Serialized markup of the children of `node`.
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.serialize(*child, &mut out);
        }
        out
    }

    fn serialize(&self, node: NodeId, out: &mut String) {
        match &self.node(node).kind {
            NodeKind::Text(text) => escape(text, false, out),
            NodeKind::Markup(markup) => out.push_str(markup),
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.local);
                for attr in &el.attributes {
                    if attr.namespace.is_none() && attr.local == "style" && !el.style.is_empty() {
                        continue;
                    }
                    out.push(' ');
                    if let Some(prefix) = attr.namespace.as_deref().and_then(attribute_prefix) {
                        out.push_str(prefix);
                        out.push(':');
                    }
                    out.push_str(&attr.local);
                    out.push_str("=\"");
                    escape(&attr.value, true, out);
                    out.push('"');
                }
                if !el.style.is_empty() {
                    out.push_str(" style=\"");
                    let decls: Vec<String> = el
                        .style
                        .iter()
                        .map(|d| {
                            let priority = if d.important { " !important" } else { "" };
                            format!("{}: {}{priority};", d.name, d.value)
                        })
                        .collect();
                    escape(&decls.join(" "), true, out);
                    out.push('"');
                }
                out.push('>');
                for child in self.children(node) {
                    self.serialize(*child, out);
                }
                out.push_str("</");
                out.push_str(&el.local);
                out.push('>');
            }
        }
    }

    // -----------------------------------------------------------------------
    // Selectors
    // -----------------------------------------------------------------------

    /// Parse `selector`, reusing the cached parse when present.
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed selector.
    pub fn compile(&self, selector: &str) -> Result<Rc<SelectorList>, SelectorError> {
        if let Some(list) = self.selectors.borrow().get(selector) {
            return Ok(Rc::clone(list));
        }
        let list = Rc::new(selector::parse(selector)?);
        self.selectors
            .borrow_mut()
            .insert(selector.to_string(), Rc::clone(&list));
        Ok(list)
    }

    /// First descendant of `scope` matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed selector.
    pub fn query_selector(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>, SelectorError> {
        let list = self.compile(selector)?;
        Ok(self.descendants(scope).find(|node| list.matches(self, *node)))
    }

    /// All descendants of `scope` matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed selector.
    pub fn query_selector_all(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, SelectorError> {
        let list = self.compile(selector)?;
        Ok(self
            .descendants(scope)
            .filter(|node| list.matches(self, *node))
            .collect())
    }

    /// Whether `node` matches `selector`.
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed selector.
    pub fn matches_selector(&self, node: NodeId, selector: &str) -> Result<bool, SelectorError> {
        Ok(self.compile(selector)?.matches(self, node))
    }
}

/// Serialization prefix of a well-known attribute namespace.
fn attribute_prefix(namespace: &str) -> Option<&'static str> {
    match namespace {
        XLINK => Some("xlink"),
        XML => Some("xml"),
        XMLNS => Some("xmlns"),
        _ => None,
    }
}

fn escape(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

fn strip_tags(markup: &str, out: &mut String) {
    let mut in_tag = false;
    for c in markup.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
}
