// ABOUTME: In-memory event bus implementation recording published envelopes
// ABOUTME: Backs single-process deployments without Redis and event assertions in tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::{EventBusProvider, EventEnvelope};
use crate::config::environment::EventBusConfig;
use crate::errors::AppResult;

/// In-memory event bus
///
/// Records every published envelope in order. Clones share the same buffer,
/// so a handle kept by a test observes events published through the service
/// layer.
#[derive(Clone, Default)]
pub struct InMemoryEventBus {
    published: Arc<RwLock<Vec<EventEnvelope>>>,
}

impl InMemoryEventBus {
    /// All envelopes published so far, in publish order
    pub async fn published(&self) -> Vec<EventEnvelope> {
        self.published.read().await.clone()
    }

    /// Envelopes published to one channel, in publish order
    pub async fn published_on(&self, channel: &str) -> Vec<EventEnvelope> {
        self.published
            .read()
            .await
            .iter()
            .filter(|e| e.event_type == channel)
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl EventBusProvider for InMemoryEventBus {
    async fn new(_config: EventBusConfig) -> AppResult<Self> {
        Ok(Self::default())
    }

    async fn publish(&self, channel: &str, payload: &serde_json::Value) {
        debug!("Event published to {} (in-memory)", channel);
        self.published
            .write()
            .await
            .push(EventEnvelope::new(channel, payload.clone()));
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_in_publish_order() {
        let bus = InMemoryEventBus::default();
        bus.publish("booking.created", &serde_json::json!({"n": 1}))
            .await;
        bus.publish("booking.cancelled", &serde_json::json!({"n": 2}))
            .await;

        let all = bus.published().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].event_type, "booking.created");
        assert_eq!(all[1].event_type, "booking.cancelled");
    }

    #[tokio::test]
    async fn test_clones_share_the_buffer() {
        let bus = InMemoryEventBus::default();
        let observer = bus.clone();
        bus.publish("booking.created", &serde_json::json!({})).await;

        assert_eq!(observer.published_on("booking.created").await.len(), 1);
        assert!(observer.published_on("booking.completed").await.is_empty());
    }
}
