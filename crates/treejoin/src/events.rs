//! Listener wiring and dispatch.
//!
//! Listener names have the form `type[.namespace]`. A handler registered
//! through [`Selection::on`] is wrapped so that, every time it fires:
//!
//! 1. the event becomes current in the tree's [`EventSlot`] for the duration
//!    of the call, and the previous event is restored afterwards (also when
//!    the handler panics);
//! 2. the handler sees the context captured at registration, with the leaf
//!    datum refreshed from the element's current datum.
//!
//! [`EventSlot`]: treejoin_core::EventSlot

use std::rc::Rc;

use treejoin_core::{Context, EventInit, EventTarget, Listener, Value};

use crate::selection::Selection;

/// Split `type.namespace` into its parts.
fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.split_once('.') {
        Some((type_name, namespace)) => (type_name, Some(namespace)),
        None => (name, None),
    }
}

impl<T: EventTarget + 'static> Selection<T> {
    /// Register `handler` under `name` on every element, replacing any
    /// listener registered under the same name. Names without a type
    /// (`".ns"`) register nothing.
    pub fn on(
        &self,
        tree: &mut T,
        name: &str,
        handler: impl Fn(&mut T, &T::Node, &T::Event, &Context<T::Datum>) + 'static,
    ) -> &Self {
        let (type_name, _) = split_name(name);
        if type_name.is_empty() {
            return self;
        }
        let handler = Rc::new(handler);
        self.each(tree, |tree, node, ctx| {
            let captured = ctx.clone();
            let handler = Rc::clone(&handler);
            let listener: Listener<T> =
                Rc::new(move |tree: &mut T, node: &T::Node, event: &T::Event| {
                    let mut ctx = captured.clone();
                    ctx.set_datum(tree.datum(node));
                    let _active = tree.event_slot().activate(event.clone());
                    handler(tree, node, event, &ctx);
                });
            tree.add_listener(node, name, listener);
        })
    }

    /// Remove the listener registered under `name` from every element. With
    /// a bare namespace (`".ns"`), remove every listener in that namespace.
    pub fn off(&self, tree: &mut T, name: &str) -> &Self {
        let (type_name, namespace) = split_name(name);
        self.each(tree, |tree, node, _| {
            if !type_name.is_empty() {
                tree.remove_listener(node, name);
                return;
            }
            for existing in tree.listener_names(node) {
                if split_name(&existing).1 == namespace {
                    tree.remove_listener(node, &existing);
                }
            }
        })
    }

    /// Build an event per element from `init` and dispatch it synchronously.
    pub fn dispatch<'a>(
        &self,
        tree: &mut T,
        type_name: &str,
        init: impl Into<Value<'a, T, EventInit<T::Datum>>>,
    ) -> &Self {
        let mut init = init.into().normalize();
        self.each(tree, |tree, node, ctx| {
            let init = init(tree, node, ctx);
            let event = tree.create_event(type_name, init);
            let _delivered = tree.dispatch(node, event);
            #[cfg(feature = "tracing")]
            tracing::trace!(event = type_name, delivered = _delivered, "dispatched");
        })
    }
}
