use super::events::{StallEvent, Topic};
use log::{debug, warn};
use std::collections::HashMap;

/// Callback invoked for each published event on a subscribed topic.
/// A returned error is logged and does not interrupt dispatch.
pub type Handler = Box<dyn FnMut(&StallEvent) -> Result<(), String>>;

struct Subscription {
    name: String,
    handler: Handler,
}

/// Named-topic publish/subscribe bus with synchronous, isolated dispatch.
///
/// Handler identity is the subscription name, so subscribing the same
/// (topic, name) pair twice is an idempotent no-op. Within a topic,
/// handlers fire in subscription order; there is no ordering guarantee
/// across topics.
pub struct EventBus {
    subscriptions: HashMap<Topic, Vec<Subscription>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscriptions: HashMap::new(),
        }
    }

    /// Subscribe a named handler to a topic.
    ///
    /// Returns false (and leaves the existing handler in place) if the
    /// name is already subscribed to this topic.
    pub fn subscribe(&mut self, topic: Topic, name: &str, handler: Handler) -> bool {
        let subs = self.subscriptions.entry(topic).or_insert_with(Vec::new);
        if subs.iter().any(|s| s.name == name) {
            debug!("[EventBus] '{}' already subscribed to {:?}", name, topic);
            return false;
        }
        subs.push(Subscription {
            name: name.to_string(),
            handler,
        });
        true
    }

    /// Remove a named handler from a topic. Returns false if it was not
    /// subscribed.
    pub fn unsubscribe(&mut self, topic: Topic, name: &str) -> bool {
        match self.subscriptions.get_mut(&topic) {
            Some(subs) => {
                let before = subs.len();
                subs.retain(|s| s.name != name);
                subs.len() != before
            }
            None => false,
        }
    }

    /// Dispatch an event to every handler subscribed to its topic.
    ///
    /// Dispatch runs against the handler list as it stood when `publish`
    /// was entered: the list is detached for the duration of the call, so
    /// subscriptions made while handlers run only take effect for later
    /// publishes. A topic with no subscribers is a silent no-op. A
    /// handler that fails is logged and the remaining handlers still run.
    pub fn publish(&mut self, event: &StallEvent) {
        let topic = event.topic();
        let mut in_flight = match self.subscriptions.remove(&topic) {
            Some(subs) => subs,
            None => return,
        };

        for sub in in_flight.iter_mut() {
            if let Err(err) = (sub.handler)(event) {
                warn!(
                    "[EventBus] handler '{}' failed on {:?}: {}",
                    sub.name, topic, err
                );
            }
        }

        // Merge back any subscriptions that arrived during dispatch.
        if let Some(added) = self.subscriptions.remove(&topic) {
            in_flight.extend(added);
        }
        if !in_flight.is_empty() {
            self.subscriptions.insert(topic, in_flight);
        }
    }

    /// Number of handlers currently subscribed to a topic.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscriptions.get(&topic).map_or(0, |s| s.len())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
