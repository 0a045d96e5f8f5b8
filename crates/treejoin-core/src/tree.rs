//! Capabilities a tree must provide to be selected over.
//!
//! Selections never own elements. They hold cheap handles
//! ([`Tree::Node`]) and receive the tree explicitly on every operation, so
//! element lifetime stays with the tree.
//!
//! - [`Tree`] is required by the selection core: queries, the datum slot,
//!   creation and insertion.
//! - [`ElementOps`] backs the attribute/style/text mutation helpers.
//! - [`EventTarget`] backs listener wiring and dispatch.

use std::rc::Rc;

use crate::error::SelectionResult;
use crate::event::{EventInit, EventSlot};
use crate::namespace::Name;

/// Core tree collaborator.
pub trait Tree {
    /// Element handle. Cloning must be cheap and must not copy the element.
    type Node: Clone + PartialEq + std::fmt::Debug;
    /// Value stored in an element's datum slot.
    type Datum: Clone;

    /// The document element, used as the parent of root-level groups.
    fn root(&self) -> Self::Node;

    /// Parent of `node`, if attached.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Datum stored on `node`.
    fn datum(&self, node: &Self::Node) -> Option<Self::Datum>;

    /// Replace (or clear) the datum stored on `node`.
    fn set_datum(&mut self, node: &Self::Node, datum: Option<Self::Datum>);

    /// Validate a selector string before any traversal uses it.
    ///
    /// # Errors
    ///
    /// [`SelectionError::InvalidSelector`](crate::SelectionError::InvalidSelector)
    /// when the tree cannot evaluate `selector`.
    fn check_selector(&self, selector: &str) -> SelectionResult<()> {
        let _ = selector;
        Ok(())
    }

    /// First descendant of `scope` matching `selector`.
    fn query_one(&self, scope: &Self::Node, selector: &str) -> Option<Self::Node>;

    /// All descendants of `scope` matching `selector`, in document order.
    fn query_all(&self, scope: &Self::Node, selector: &str) -> Vec<Self::Node>;

    /// Whether `node` matches `selector`.
    fn matches(&self, node: &Self::Node, selector: &str) -> bool;

    /// Create a detached element. Unqualified names inherit the namespace of
    /// `scope`.
    fn create_element(&mut self, scope: &Self::Node, name: &Name) -> Self::Node;

    /// Insert `child` under `parent` before `reference`, or last when
    /// `reference` is `None`.
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        child: &Self::Node,
        reference: Option<&Self::Node>,
    );

    /// Detach `child` from `parent`.
    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node);
}

/// Attribute, style and content mutation.
pub trait ElementOps: Tree {
    /// Attribute value.
    fn attribute(&self, node: &Self::Node, name: &Name) -> Option<String>;

    /// Set an attribute.
    fn set_attribute(&mut self, node: &Self::Node, name: &Name, value: &str);

    /// Remove an attribute.
    fn remove_attribute(&mut self, node: &Self::Node, name: &Name);

    /// Inline style property value.
    fn style_property(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Set an inline style property. `priority` is `""` or `"important"`.
    fn set_style_property(&mut self, node: &Self::Node, name: &str, value: &str, priority: &str);

    /// Remove an inline style property.
    fn remove_style_property(&mut self, node: &Self::Node, name: &str);

    /// Concatenated text of `node` and its descendants.
    fn text_content(&self, node: &Self::Node) -> String;

    /// Replace all children of `node` with a single text child.
    fn set_text_content(&mut self, node: &Self::Node, text: &str);

    /// Serialized markup of the children of `node`.
    fn inner_html(&self, node: &Self::Node) -> String;

    /// Replace all children of `node` with `markup`.
    fn set_inner_html(&mut self, node: &Self::Node, markup: &str);
}

/// Listener stored on an element.
pub type Listener<T> =
    Rc<dyn Fn(&mut T, &<T as Tree>::Node, &<T as EventTarget>::Event)>;

/// Listener registry and synchronous dispatch.
///
/// Listener names have the form `type[.namespace]`. At most one listener is
/// registered per exact name; registering again replaces it.
pub trait EventTarget: Tree + Sized {
    /// Event value delivered to listeners.
    type Event: Clone;

    /// The tree's current-event slot.
    fn event_slot(&self) -> &EventSlot<Self::Event>;

    /// Build an event of `type_name`.
    fn create_event(&self, type_name: &str, init: EventInit<Self::Datum>) -> Self::Event;

    /// Register `listener` under `name`, replacing any listener with that name.
    fn add_listener(&mut self, node: &Self::Node, name: &str, listener: Listener<Self>);

    /// Remove the listener registered under `name`. Returns whether one existed.
    fn remove_listener(&mut self, node: &Self::Node, name: &str) -> bool;

    /// Names of all listeners registered on `node`.
    fn listener_names(&self, node: &Self::Node) -> Vec<String>;

    /// Deliver `event` to `node` synchronously. Returns how many listeners ran.
    fn dispatch(&mut self, node: &Self::Node, event: Self::Event) -> usize;
}
