//! Mutation helpers.
//!
//! Every helper normalizes its value argument once and hands a closure to
//! [`Selection::each`]; none of them walks groups itself. Getters read the
//! first element of the selection.

use treejoin_core::{
    Context, Creator, ElementOps, Name, SelectionResult, Selector, Tree, Value, qualify,
};

use crate::selection::Selection;

const CLASS: &str = "class";

// ---------------------------------------------------------------------------
// Structure and datum (any tree)
// ---------------------------------------------------------------------------

impl<T: Tree> Selection<T> {
    /// Set (or clear, with `None`) each element's datum.
    pub fn datum<'a>(&self, tree: &mut T, value: Value<'a, T, Option<T::Datum>>) -> &Self
    where
        T::Datum: 'a,
    {
        let mut value = value.normalize();
        self.each(tree, |tree, node, ctx| {
            let datum = value(tree, node, ctx);
            tree.set_datum(node, datum);
        })
    }

    /// Datum of the first element.
    #[must_use]
    pub fn datum_value(&self, tree: &T) -> Option<T::Datum> {
        self.node().and_then(|node| tree.datum(node))
    }

    /// Create one child per element and append it. The result has the same
    /// shape as the receiver; children inherit their parent's datum.
    pub fn append<'a>(&self, tree: &mut T, creator: impl Into<Creator<'a, T>>) -> Self {
        let mut create = creator.into().normalize();
        self.select_with(
            tree,
            Box::new(move |tree: &mut T, node: &T::Node, ctx: &Context<T::Datum>| {
                let child = create(tree, node, ctx);
                tree.insert_before(node, &child, None);
                Some(child)
            }),
        )
    }

    /// Create one child per element and insert it before the first match of
    /// `before` (or last when nothing matches).
    ///
    /// # Errors
    ///
    /// Returns the tree's rejection of `before`.
    pub fn insert<'a>(
        &self,
        tree: &mut T,
        creator: impl Into<Creator<'a, T>>,
        before: impl Into<Selector<'a, T>>,
    ) -> SelectionResult<Self> {
        let mut create = creator.into().normalize();
        let mut before = before.into().normalize(tree)?;
        Ok(self.select_with(
            tree,
            Box::new(move |tree: &mut T, node: &T::Node, ctx: &Context<T::Datum>| {
                let child = create(tree, node, ctx);
                let reference = before(tree, node, ctx);
                tree.insert_before(node, &child, reference.as_ref());
                Some(child)
            }),
        ))
    }

    /// Detach every element from its parent.
    pub fn remove(&self, tree: &mut T) -> &Self {
        self.each(tree, |tree, node, _| {
            if let Some(parent) = tree.parent(node) {
                tree.remove_child(&parent, node);
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Attributes, style, classes, content
// ---------------------------------------------------------------------------

impl<T: ElementOps> Selection<T> {
    /// Set each element's attribute `name`, or remove it where the value is
    /// `None`. Prefixed names (`xlink:href`) are namespace-qualified.
    pub fn attr<'a>(
        &self,
        tree: &mut T,
        name: &str,
        value: impl Into<Value<'a, T, Option<String>>>,
    ) -> &Self {
        let name = qualify(name);
        let mut value = value.into().normalize();
        self.each(tree, |tree, node, ctx| match value(tree, node, ctx) {
            Some(v) => tree.set_attribute(node, &name, &v),
            None => tree.remove_attribute(node, &name),
        })
    }

    /// Attribute `name` of the first element.
    #[must_use]
    pub fn attr_value(&self, tree: &T, name: &str) -> Option<String> {
        let name = qualify(name);
        self.node().and_then(|node| tree.attribute(node, &name))
    }

    /// Set each element's inline style property, or remove it where the
    /// value is `None`. `priority` is `""` or `"important"`.
    pub fn style<'a>(
        &self,
        tree: &mut T,
        name: &str,
        value: impl Into<Value<'a, T, Option<String>>>,
        priority: &str,
    ) -> &Self {
        let mut value = value.into().normalize();
        self.each(tree, |tree, node, ctx| match value(tree, node, ctx) {
            Some(v) => tree.set_style_property(node, name, &v, priority),
            None => tree.remove_style_property(node, name),
        })
    }

    /// Inline style property of the first element.
    #[must_use]
    pub fn style_value(&self, tree: &T, name: &str) -> Option<String> {
        self.node().and_then(|node| tree.style_property(node, name))
    }

    /// Add (`true`) or remove (`false`) every whitespace-separated class in
    /// `names`. An element whose class list would not change is not written.
    pub fn classed<'a>(
        &self,
        tree: &mut T,
        names: &str,
        value: impl Into<Value<'a, T, bool>>,
    ) -> &Self {
        let class = Name::Local(CLASS.to_string());
        let names: Vec<&str> = names.split_whitespace().collect();
        let mut value = value.into().normalize();
        self.each(tree, |tree, node, ctx| {
            let on = value(tree, node, ctx);
            let current = tree.attribute(node, &class).unwrap_or_default();
            let mut tokens: Vec<&str> = current.split_whitespace().collect();
            let mut changed = false;
            for name in &names {
                let present = tokens.contains(name);
                if on && !present {
                    tokens.push(*name);
                    changed = true;
                } else if !on && present {
                    tokens.retain(|token| token != name);
                    changed = true;
                }
            }
            if changed {
                tree.set_attribute(node, &class, &tokens.join(" "));
            }
        })
    }

    /// Whether the first element carries every class in `names`.
    #[must_use]
    pub fn has_classes(&self, tree: &T, names: &str) -> bool {
        let class = Name::Local(CLASS.to_string());
        let Some(current) = self.node().and_then(|node| tree.attribute(node, &class)) else {
            return false;
        };
        names
            .split_whitespace()
            .all(|name| current.split_whitespace().any(|token| token == name))
    }

    /// Replace each element's content with text. `None` empties it.
    pub fn text<'a>(&self, tree: &mut T, value: impl Into<Value<'a, T, Option<String>>>) -> &Self {
        let mut value = value.into().normalize();
        self.each(tree, |tree, node, ctx| {
            let text = value(tree, node, ctx).unwrap_or_default();
            tree.set_text_content(node, &text);
        })
    }

    /// Text content of the first element.
    #[must_use]
    pub fn text_value(&self, tree: &T) -> Option<String> {
        self.node().map(|node| tree.text_content(node))
    }

    /// Replace each element's content with markup. `None` empties it.
    pub fn html<'a>(&self, tree: &mut T, value: impl Into<Value<'a, T, Option<String>>>) -> &Self {
        let mut value = value.into().normalize();
        self.each(tree, |tree, node, ctx| {
            let markup = value(tree, node, ctx).unwrap_or_default();
            tree.set_inner_html(node, &markup);
        })
    }

    /// Markup of the first element's children.
    #[must_use]
    pub fn html_value(&self, tree: &T) -> Option<String> {
        self.node().map(|node| tree.inner_html(node))
    }
}
