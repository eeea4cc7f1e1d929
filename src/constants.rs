// ABOUTME: System-wide constants and configuration defaults for the schedule core
// ABOUTME: Contains pagination limits, event channel names, and collaborator defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

//! # Constants Module
//!
//! Application constants and default configuration values. Values that vary by
//! deployment live in [`crate::config::environment`]; the defaults they fall
//! back to live here.

/// Service identity
pub mod service {
    /// Service name used in logs and event payloads
    pub const SERVICE_NAME: &str = "schedule-service";

    /// Service version from Cargo.toml
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Pagination limits
pub mod pagination {
    /// Default page size when the caller does not specify one
    pub const DEFAULT_PAGE_LIMIT: i64 = 20;

    /// Hard ceiling on page size
    pub const MAX_PAGE_LIMIT: i64 = 100;
}

/// Domain event channels published to the event bus
pub mod channels {
    /// A booking was created in `scheduled` status
    pub const BOOKING_CREATED: &str = "booking.created";

    /// A booking was cancelled
    pub const BOOKING_CANCELLED: &str = "booking.cancelled";

    /// A booking was marked completed by the trainer
    pub const BOOKING_COMPLETED: &str = "booking.completed";
}

/// Collaborator service defaults
pub mod external {
    /// Default base URL for the user service (identity/role resolution)
    pub const DEFAULT_USER_SERVICE_URL: &str = "http://localhost:3001";

    /// Default base URL for the training service (active-program lookup)
    pub const DEFAULT_TRAINING_SERVICE_URL: &str = "http://localhost:3002";

    /// Per-request timeout for collaborator calls, in seconds
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
}

/// Storage defaults
pub mod database {
    /// Default database URL for local development
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/schedule.db";

    /// Maximum connections held by the pool
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;

    /// SQLite busy timeout, in seconds
    pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 5;
}

/// Event bus defaults
pub mod event_bus {
    /// Default Redis URL for the pub/sub transport
    pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

    /// Connection timeout, in seconds
    pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 5;

    /// Per-command response timeout, in seconds
    pub const DEFAULT_RESPONSE_TIMEOUT_SECS: u64 = 2;
}
