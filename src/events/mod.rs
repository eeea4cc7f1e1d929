// ABOUTME: Event emission layer publishing domain events to a pub/sub channel
// ABOUTME: Pluggable backend support (Redis, in-memory) following the DatabaseProvider pattern
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

//! Domain event emission
//!
//! Booking state transitions publish one event each to a named channel
//! (`booking.created`, `booking.cancelled`, `booking.completed`). Publishing
//! is strictly best-effort: the state change has already committed by the
//! time the publish attempt starts, and a transport failure is logged and
//! swallowed, never surfaced to the caller and never rolled back.
//!
//! Backends implement [`EventBusProvider`]; the [`factory::EventBus`] wrapper
//! selects Redis (production) or the in-memory recorder (tests) from
//! configuration.

/// Event bus factory for backend selection
pub mod factory;
/// In-memory event bus implementation
pub mod memory;
/// Redis pub/sub event bus implementation
pub mod redis;

use serde::{Deserialize, Serialize};

use crate::config::environment::EventBusConfig;
use crate::errors::AppResult;

pub use crate::constants::channels;

/// JSON envelope published to the bus
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventEnvelope {
    /// Channel name, duplicated into the message body for consumers that
    /// multiplex several channels over one subscription
    pub event_type: String,
    /// Event-specific payload
    pub payload: serde_json::Value,
}

impl EventEnvelope {
    /// Build an envelope for the given channel
    #[must_use]
    pub fn new(channel: &str, payload: serde_json::Value) -> Self {
        Self {
            event_type: channel.to_owned(),
            payload,
        }
    }
}

/// Event bus trait for pluggable backend implementations
#[async_trait::async_trait]
pub trait EventBusProvider: Send + Sync + Clone {
    /// Create new event bus instance with configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot be reached at startup
    async fn new(config: EventBusConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Publish an event to a named channel, best-effort
    ///
    /// Never returns an error: transport failures are logged and control
    /// returns to the caller.
    async fn publish(&self, channel: &str, payload: &serde_json::Value);

    /// Verify the transport is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unhealthy
    async fn health_check(&self) -> AppResult<()>;
}
