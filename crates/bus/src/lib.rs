// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kiara-bus: a typed, synchronous publish/subscribe event bus.
//!
//! Subscribers are plain callables keyed by the event's `name()` tag (or the
//! `"*"` wildcard for every event); `publish` invokes matching handlers in
//! registration order on the publishing thread. A handler that panics is
//! caught and logged rather than aborting the publish loop or poisoning
//! other subscribers' view of the bus.

use kiara_core::{Event, KiaraContextId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// A subscriber callback. Must not panic across the bus boundary without
/// being caught — see [`EventBus::publish`].
pub type Handler = Box<dyn Fn(&Event) + Send + Sync>;

const WILDCARD: &str = "*";

/// Synchronous, single-process, typed event bus.
///
/// One `EventBus` is owned per [`kiara_core::KiaraContextId`]; two contexts
/// never share subscriber lists.
pub struct EventBus {
    context_id: KiaraContextId,
    subscribers: RwLock<HashMap<String, Vec<Handler>>>,
}

impl EventBus {
    pub fn new(context_id: KiaraContextId) -> Self {
        Self {
            context_id,
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    pub fn context_id(&self) -> &KiaraContextId {
        &self.context_id
    }

    /// Subscribe to events whose [`Event::name`] equals `event_type`.
    pub fn subscribe(&self, event_type: impl Into<String>, handler: Handler) {
        self.subscribers
            .write()
            .entry(event_type.into())
            .or_default()
            .push(handler);
    }

    /// Subscribe to every event published on this bus.
    pub fn subscribe_all(&self, handler: Handler) {
        self.subscribe(WILDCARD, handler);
    }

    /// Publish `event` synchronously: every matching handler (specific
    /// event-type subscribers, then wildcard subscribers) runs in
    /// registration order on the calling thread. A handler panic is caught,
    /// logged, and does not stop the remaining handlers from running.
    pub fn publish(&self, event: Event) {
        self.publish_from("anonymous", event);
    }

    /// Publish with an explicit producer id, for the bound `emit` closures
    /// handed out by [`EventBus::register_producer`].
    pub fn publish_from(&self, producer_id: &str, event: Event) {
        let name = event.name().to_string();
        tracing::debug!(
            kiara_context_id = %self.context_id,
            producer_id,
            event = %name,
            summary = %event.log_summary(),
            "publishing event"
        );
        self.run_handlers(&name, &event);
        if name != WILDCARD {
            self.run_handlers(WILDCARD, &event);
        }
    }

    fn run_handlers(&self, key: &str, event: &Event) {
        let guard = self.subscribers.read();
        if let Some(list) = guard.get(key) {
            for handler in list {
                invoke(handler, event, key);
            }
        }
    }

    /// Returns a bound emitter for `producer_id`. Every event passed through
    /// it is published on this bus stamped with that producer id and this
    /// bus's context id (both surfaced via the `tracing` span, not the event
    /// payload itself, since the core [`Event`] catalogue is shared across
    /// producers).
    pub fn register_producer(self: &Arc<Self>, producer_id: impl Into<String>) -> Producer {
        Producer {
            bus: Arc::clone(self),
            producer_id: producer_id.into(),
        }
    }
}

fn invoke(handler: &Handler, event: &Event, key: &str) {
    let result = catch_unwind(AssertUnwindSafe(|| handler(event)));
    if let Err(payload) = result {
        let message = panic_message(&payload);
        tracing::error!(event_type = key, error = %message, "event handler panicked");
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// A bound emit handle for one producer, returned by
/// [`EventBus::register_producer`].
#[derive(Clone)]
pub struct Producer {
    bus: Arc<EventBus>,
    producer_id: String,
}

impl Producer {
    pub fn emit(&self, event: Event) {
        self.bus.publish_from(&self.producer_id, event);
    }

    pub fn producer_id(&self) -> &str {
        &self.producer_id
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
