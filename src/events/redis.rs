// ABOUTME: Redis pub/sub event bus implementation with connection pooling
// ABOUTME: Publishes domain event envelopes on a best-effort, fire-and-forget basis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

use std::time::Duration;

use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use tracing::{error, info};

use super::{EventBusProvider, EventEnvelope};
use crate::config::environment::EventBusConfig;
use crate::errors::{AppError, AppResult};

/// Redis event bus implementation
///
/// Uses Redis `ConnectionManager` for automatic reconnection. `PUBLISH`
/// failures are logged at error level and swallowed; subscribers are an
/// observability concern, not a correctness one.
#[derive(Clone)]
pub struct RedisEventBus {
    manager: ConnectionManager,
}

impl RedisEventBus {
    async fn new_with_config(config: &EventBusConfig) -> AppResult<Self> {
        let redis_url = config
            .redis_url
            .as_ref()
            .ok_or_else(|| AppError::config("Redis URL is required for the Redis event bus"))?;

        info!(
            "Connecting to Redis at {} (timeout={}s, response_timeout={}s)",
            redis_url, config.connection_timeout_secs, config.response_timeout_secs
        );

        let client = redis::Client::open(redis_url.as_str())
            .map_err(|e| AppError::internal(format!("Failed to create Redis client: {e}")))?;

        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(Duration::from_secs(config.connection_timeout_secs))
            .set_response_timeout(Duration::from_secs(config.response_timeout_secs));

        let manager = ConnectionManager::new_with_config(client, manager_config)
            .await
            .map_err(|e| AppError::internal(format!("Failed to connect to Redis: {e}")))?;

        info!("Successfully connected to Redis");

        Ok(Self { manager })
    }
}

#[async_trait::async_trait]
impl EventBusProvider for RedisEventBus {
    async fn new(config: EventBusConfig) -> AppResult<Self> {
        Self::new_with_config(&config).await
    }

    async fn publish(&self, channel: &str, payload: &serde_json::Value) {
        let envelope = EventEnvelope::new(channel, payload.clone());
        let message = match serde_json::to_string(&envelope) {
            Ok(message) => message,
            Err(e) => {
                error!("Failed to serialize event for {}: {}", channel, e);
                return;
            }
        };

        let mut conn = self.manager.clone();
        match conn.publish::<_, _, ()>(channel, message).await {
            Ok(()) => info!("Event published to {}", channel),
            Err(e) => error!("Failed to publish event to {}: {}", channel, e),
        }
    }

    async fn health_check(&self) -> AppResult<()> {
        let mut conn = self.manager.clone();

        let response: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                error!("Redis PING failed: {}", e);
                AppError::internal(format!("Event bus error: {e}"))
            })?;

        if response == "PONG" {
            Ok(())
        } else {
            Err(AppError::internal(format!(
                "Event bus error: unexpected PING response '{response}'"
            )))
        }
    }
}
