//! Collaborator trait implementations for [`Document`].

use treejoin_core::{
    ElementOps, EventInit, EventSlot, EventTarget, Listener, Name, SelectionResult, Tree,
};

use crate::document::Document;
use crate::event::Event;
use crate::node::NodeId;

impl<D: Clone> Tree for Document<D> {
    type Node = NodeId;
    type Datum = D;

    fn root(&self) -> NodeId {
        Document::root(self)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.parent_node(*node)
    }

    fn datum(&self, node: &NodeId) -> Option<D> {
        self.node_datum(*node).cloned()
    }

    fn set_datum(&mut self, node: &NodeId, datum: Option<D>) {
        self.set_node_datum(*node, datum);
    }

    fn check_selector(&self, selector: &str) -> SelectionResult<()> {
        self.compile(selector)?;
        Ok(())
    }

    fn query_one(&self, scope: &NodeId, selector: &str) -> Option<NodeId> {
        self.query_selector(*scope, selector).ok().flatten()
    }

    fn query_all(&self, scope: &NodeId, selector: &str) -> Vec<NodeId> {
        self.query_selector_all(*scope, selector).unwrap_or_default()
    }

    fn matches(&self, node: &NodeId, selector: &str) -> bool {
        self.matches_selector(*node, selector).unwrap_or(false)
    }

    fn create_element(&mut self, scope: &NodeId, name: &Name) -> NodeId {
        self.create_named(*scope, name)
    }

    fn insert_before(&mut self, parent: &NodeId, child: &NodeId, reference: Option<&NodeId>) {
        self.insert_child(*parent, *child, reference.copied());
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) {
        if self.parent_node(*child) == Some(*parent) {
            self.detach(*child);
        }
    }
}

impl<D: Clone> ElementOps for Document<D> {
    fn attribute(&self, node: &NodeId, name: &Name) -> Option<String> {
        self.attribute_named(*node, name).map(str::to_string)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &Name, value: &str) {
        self.set_attribute_named(*node, name, value);
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &Name) {
        self.remove_attribute_named(*node, name);
    }

    fn style_property(&self, node: &NodeId, name: &str) -> Option<String> {
        Document::style_property(self, *node, name).map(str::to_string)
    }

    fn set_style_property(&mut self, node: &NodeId, name: &str, value: &str, priority: &str) {
        self.set_style(*node, name, value, priority.eq_ignore_ascii_case("important"));
    }

    fn remove_style_property(&mut self, node: &NodeId, name: &str) {
        self.remove_style(*node, name);
    }

    fn text_content(&self, node: &NodeId) -> String {
        self.text(*node)
    }

    fn set_text_content(&mut self, node: &NodeId, text: &str) {
        self.replace_text(*node, text);
    }

    fn inner_html(&self, node: &NodeId) -> String {
        Document::inner_html(self, *node)
    }

    fn set_inner_html(&mut self, node: &NodeId, markup: &str) {
        self.replace_markup(*node, markup);
    }
}

impl<D: Clone> EventTarget for Document<D> {
    type Event = Event<D>;

    fn event_slot(&self) -> &EventSlot<Event<D>> {
        self.events()
    }

    fn create_event(&self, type_name: &str, init: EventInit<D>) -> Event<D> {
        Event::new(type_name, init)
    }

    fn add_listener(&mut self, node: &NodeId, name: &str, listener: Listener<Self>) {
        self.add_event_listener(*node, name, listener);
    }

    fn remove_listener(&mut self, node: &NodeId, name: &str) -> bool {
        self.remove_event_listener(*node, name)
    }

    fn listener_names(&self, node: &NodeId) -> Vec<String> {
        self.event_listener_names(*node)
    }

    fn dispatch(&mut self, node: &NodeId, event: Event<D>) -> usize {
        self.dispatch_event(*node, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treejoin_core::qualify;
    use treejoin_core::namespace::XLINK;

    #[test]
    fn invalid_selector_is_reported_and_queries_stay_empty() {
        let doc = Document::<()>::new();
        let err = doc.check_selector("a >").unwrap_err();
        assert!(matches!(err, treejoin_core::SelectionError::InvalidSelector { .. }));
        assert!(doc.query_all(&doc.root(), "a >").is_empty());
        assert!(!doc.matches(&doc.root(), "["));
    }

    #[test]
    fn remove_child_ignores_foreign_parent() {
        let mut doc = Document::<()>::new();
        let root = doc.root();
        let a = doc.element(root, "a");
        let b = doc.element(a, "b");
        doc.remove_child(&root, &b);
        assert_eq!(doc.parent_node(b), Some(a));
        doc.remove_child(&a, &b);
        assert_eq!(doc.parent_node(b), None);
    }

    #[test]
    fn qualified_attributes_round_through_ops() {
        let mut doc = Document::<()>::new();
        let root = doc.root();
        let use_el = doc.element(root, "svg:use");
        let href = qualify("xlink:href");
        doc.set_attribute(&use_el, &href, "#icon");
        assert_eq!(doc.attribute(&use_el, &href).as_deref(), Some("#icon"));
        assert_eq!(
            doc.element_data(use_el).and_then(|el| el.attribute(Some(XLINK), "href")),
            Some("#icon")
        );
        assert_eq!(doc.get_attribute(use_el, "href"), None);
    }

    #[test]
    fn style_priority_is_parsed() {
        let mut doc = Document::<()>::new();
        let root = doc.root();
        doc.set_style_property(&root, "color", "red", "important");
        assert_eq!(ElementOps::style_property(&doc, &root, "color").as_deref(), Some("red"));
        assert!(doc.element_data(root).is_some_and(|el| el.style[0].important));
    }

    #[test]
    fn dispatch_uses_registered_listener() {
        let mut doc = Document::<u8>::new();
        let root = doc.root();
        let listener: Listener<Document<u8>> =
            std::rc::Rc::new(|doc: &mut Document<u8>, node: &NodeId, event: &Event<u8>| {
                doc.set_node_datum(*node, event.detail);
            });
        doc.add_listener(&root, "ping.x", listener);
        let event = doc.create_event(
            "ping",
            EventInit {
                detail: Some(9),
                ..EventInit::default()
            },
        );
        assert_eq!(doc.dispatch(&root, event), 1);
        assert_eq!(doc.node_datum(root), Some(&9));
        assert_eq!(doc.listener_names(&root), vec!["ping.x".to_string()]);
    }
}
