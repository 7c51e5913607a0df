//! Event publisher that logs emitted events.
//!
//! The workflow core only announces transitions; delivery to reviewers
//! and authors is owned by an external notification dispatcher. Until one
//! is attached, the service binary records every emission as a structured
//! log line, which is also what operators grep when tracing a workflow.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventPublisher;

/// Publishes events to the tracing subscriber.
#[derive(Debug, Clone, Default)]
pub struct LoggingEventPublisher;

impl LoggingEventPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for LoggingEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        tracing::info!(
            event_type = %event.event_type,
            aggregate_id = %event.aggregate_id,
            event_id = %event.event_id,
            correlation_id = event.metadata.correlation_id.as_deref().unwrap_or("-"),
            "domain event emitted"
        );
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

    #[tokio::test]
    async fn publish_never_fails() {
        let publisher = LoggingEventPublisher::new();
        let envelope = EventEnvelope::new("version.submitted.v1", "v-1", "Version", json!({}));
        assert!(publisher.publish(envelope).await.is_ok());
    }
}
