//! Event publisher that writes character events to the log.

use async_trait::async_trait;
use tapestry_domain::CharacterEvent;

use crate::infrastructure::ports::{EventPublisher, PublishError};

/// Emits every event as a structured `tracing` record on its topic.
#[derive(Debug, Default)]
pub struct LogEventPublisher;

impl LogEventPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for LogEventPublisher {
    async fn publish(&self, event: CharacterEvent) -> Result<(), PublishError> {
        let topic = event.topic();
        let payload = serde_json::to_string(&event).map_err(|e| PublishError::Encode {
            topic,
            message: e.to_string(),
        })?;
        tracing::info!(topic, player_id = %event.player_id(), %payload, "Published character event");
        Ok(())
    }
}
