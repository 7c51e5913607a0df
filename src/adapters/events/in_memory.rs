//! In-memory event bus implementation.
//!
//! Provides synchronous, deterministic event capture for unit tests and
//! local development. Production delivery (mail, chat, webhooks) belongs
//! to an external notification dispatcher subscribed to the same events.
//!
//! # Security Note
//!
//! This adapter uses `.expect()` on lock operations which will panic if
//! locks are poisoned. Acceptable for test code; do not use in production.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventPublisher;

/// In-memory event bus.
///
/// Captures every published envelope so tests can assert which workflow
/// transitions were announced.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryEventBus::new());
/// bus.publish(envelope).await?;
/// assert!(bus.has_event("version.published.v1"));
/// ```
pub struct InMemoryEventBus {
    published: RwLock<Vec<EventEnvelope>>,
}

impl InMemoryEventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self {
            published: RwLock::new(Vec::new()),
        }
    }

    // === Test Helpers ===

    /// Returns all published events (for test assertions).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .clone()
    }

    /// Returns events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Returns events for a specific aggregate.
    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .collect()
    }

    /// Clears all published events (for test isolation).
    pub fn clear(&self) {
        self.published
            .write()
            .expect("InMemoryEventBus: published write lock poisoned")
            .clear();
    }

    /// Returns count of published events.
    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .len()
    }

    /// Checks if a specific event type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .iter()
            .any(|e| e.event_type == event_type)
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.published
            .write()
            .expect("InMemoryEventBus: published write lock poisoned")
            .push(event);
        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(event_type: &str, aggregate_id: &str) -> EventEnvelope {
        EventEnvelope::new(event_type, aggregate_id, "Version", json!({}))
    }

    #[tokio::test]
    async fn publish_captures_event() {
        let bus = InMemoryEventBus::new();

        bus.publish(envelope("version.submitted.v1", "v-1"))
            .await
            .unwrap();

        assert_eq!(bus.event_count(), 1);
        assert!(bus.has_event("version.submitted.v1"));
        assert!(!bus.has_event("version.published.v1"));
    }

    #[tokio::test]
    async fn events_filter_by_type_and_aggregate() {
        let bus = InMemoryEventBus::new();
        bus.publish(envelope("version.submitted.v1", "v-1"))
            .await
            .unwrap();
        bus.publish(envelope("version.approved.v1", "v-1"))
            .await
            .unwrap();
        bus.publish(envelope("version.submitted.v1", "v-2"))
            .await
            .unwrap();

        assert_eq!(bus.events_of_type("version.submitted.v1").len(), 2);
        assert_eq!(bus.events_for_aggregate("v-1").len(), 2);
    }

    #[tokio::test]
    async fn publish_all_captures_in_order() {
        let bus = InMemoryEventBus::new();
        bus.publish_all(vec![
            envelope("version.submitted.v1", "v-1"),
            envelope("version.approved.v1", "v-1"),
        ])
        .await
        .unwrap();

        let events = bus.published_events();
        assert_eq!(events[0].event_type, "version.submitted.v1");
        assert_eq!(events[1].event_type, "version.approved.v1");
    }

    #[tokio::test]
    async fn clear_resets_captured_events() {
        let bus = InMemoryEventBus::new();
        bus.publish(envelope("version.submitted.v1", "v-1"))
            .await
            .unwrap();
        bus.clear();
        assert_eq!(bus.event_count(), 0);
    }
}
