// ABOUTME: Event bus factory for configuration-based backend selection
// ABOUTME: Follows the DatabaseProvider factory pattern for pluggable transports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

use tracing::info;

use super::{memory::InMemoryEventBus, redis::RedisEventBus, EventBusProvider};
use crate::config::environment::EventBusConfig;
use crate::errors::AppResult;

/// Event bus instance wrapper that delegates to the configured backend
#[derive(Clone)]
pub enum EventBus {
    Redis(RedisEventBus),
    Memory(InMemoryEventBus),
}

impl EventBus {
    /// Create an event bus from configuration
    ///
    /// Selects Redis when a URL is configured, the in-memory bus otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis transport cannot be reached at startup
    pub async fn new(config: EventBusConfig) -> AppResult<Self> {
        if config.redis_url.is_some() {
            info!("Initializing Redis event bus");
            Ok(Self::Redis(RedisEventBus::new(config).await?))
        } else {
            info!("Initializing in-memory event bus");
            Ok(Self::Memory(InMemoryEventBus::new(config).await?))
        }
    }

    /// Create an in-memory bus plus a handle for observing published events
    #[must_use]
    pub fn in_memory() -> (Self, InMemoryEventBus) {
        let bus = InMemoryEventBus::default();
        (Self::Memory(bus.clone()), bus)
    }

    /// Publish an event to a named channel, best-effort
    pub async fn publish(&self, channel: &str, payload: &serde_json::Value) {
        match self {
            Self::Redis(bus) => bus.publish(channel, payload).await,
            Self::Memory(bus) => bus.publish(channel, payload).await,
        }
    }

    /// Verify the transport is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unhealthy
    pub async fn health_check(&self) -> AppResult<()> {
        match self {
            Self::Redis(bus) => bus.health_check().await,
            Self::Memory(bus) => bus.health_check().await,
        }
    }

    /// Get a descriptive string for the current backend
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::Redis(_) => "Redis (pub/sub)",
            Self::Memory(_) => "In-memory",
        }
    }
}
