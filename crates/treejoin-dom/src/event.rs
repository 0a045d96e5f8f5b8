//! Events and synchronous dispatch.
//!
//! Dispatch snapshots the listeners of each node on the propagation path
//! before calling them, so listeners may add or remove listeners (or
//! dispatch further events) while running. Propagation order is target
//! first, then ancestors when the event bubbles.

use std::rc::Rc;

use treejoin_core::EventInit;

use crate::document::Document;
use crate::node::{DomListener, NodeId};

/// Event delivered to listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<D> {
    /// Event type, e.g. `"click"`.
    pub type_name: String,
    /// Whether the event propagates to ancestors.
    pub bubbles: bool,
    /// Whether the event can be cancelled.
    pub cancelable: bool,
    /// Payload.
    pub detail: Option<D>,
    /// Node the event was dispatched to; set by dispatch.
    pub target: Option<NodeId>,
}

impl<D> Event<D> {
    /// Build an event of `type_name`.
    pub fn new(type_name: impl Into<String>, init: EventInit<D>) -> Self {
        Self {
            type_name: type_name.into(),
            bubbles: init.bubbles,
            cancelable: init.cancelable,
            detail: init.detail,
            target: None,
        }
    }
}

/// Type part of a `type[.namespace]` listener name.
pub(crate) fn listener_type(name: &str) -> &str {
    name.split_once('.').map_or(name, |(type_name, _)| type_name)
}

impl<D> Document<D> {
    /// Dispatch `event` to `target` and, if it bubbles, its ancestors.
    /// Returns how many listeners ran.
    pub fn dispatch_event(&mut self, target: NodeId, mut event: Event<D>) -> usize {
        event.target = Some(target);
        let bubbles = event.bubbles && self.options().bubbling;

        let mut path = vec![target];
        if bubbles {
            let mut ancestor = self.parent_node(target);
            while let Some(node) = ancestor {
                path.push(node);
                ancestor = self.parent_node(node);
            }
        }

        let mut delivered = 0;
        for node in path {
            let listeners: Vec<DomListener<D>> = self
                .node(node)
                .listeners
                .iter()
                .filter(|(name, _)| listener_type(name) == event.type_name)
                .map(|(_, listener)| Rc::clone(listener))
                .collect();
            for listener in listeners {
                listener(self, &node, &event);
                delivered += 1;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            event = %event.type_name,
            target = %target,
            delivered,
            "dispatched event"
        );

        delivered
    }

    /// Register `listener` on `node` under `name`, replacing any listener
    /// with the same name in place.
    pub fn add_event_listener(&mut self, node: NodeId, name: &str, listener: DomListener<D>) {
        let listeners = &mut self.node_mut(node).listeners;
        match listeners.iter_mut().find(|(existing, _)| existing == name) {
            Some(slot) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(node = %node, name, "replacing listener");
                slot.1 = listener;
            }
            None => listeners.push((name.to_string(), listener)),
        }
    }

    /// Remove the listener registered on `node` under `name`.
    pub fn remove_event_listener(&mut self, node: NodeId, name: &str) -> bool {
        let listeners = &mut self.node_mut(node).listeners;
        let before = listeners.len();
        listeners.retain(|(existing, _)| existing != name);
        listeners.len() != before
    }

    /// Names of the listeners registered on `node`, in registration order.
    #[must_use]
    pub fn event_listener_names(&self, node: NodeId) -> Vec<String> {
        self.node(node)
            .listeners
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}
