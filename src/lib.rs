// ABOUTME: Main library entry point for the FitSync schedule core
// ABOUTME: Conflict-resolution and capacity-enforcement for trainer scheduling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

#![deny(unsafe_code)]

//! # FitSync Schedule Core
//!
//! The conflict-resolution and capacity-enforcement core of the FitSync
//! scheduling platform: trainer availability windows, one-on-one bookings,
//! and capacity-limited group sessions.
//!
//! ## Guarantees
//!
//! - **No double-booking**: for any trainer and date, non-cancelled bookings
//!   are pairwise non-overlapping, enforced atomically against concurrent
//!   creators by the storage layer
//! - **Exact capacity**: group session enrollment never exceeds
//!   `max_participants`, even transiently, under concurrent enrollment
//! - **Events after commit**: every booking state transition emits exactly
//!   one domain event, strictly after the state change commits, on a
//!   fire-and-forget basis
//!
//! ## Architecture
//!
//! - **Services**: protocol-agnostic business logic (`services::bookings`,
//!   `services::sessions`, `services::availability`)
//! - **Storage**: pluggable SQLite/PostgreSQL backends behind
//!   [`database_plugins::DatabaseProvider`]
//! - **Events**: pluggable Redis/in-memory bus behind
//!   [`events::EventBusProvider`]
//! - **Collaborators**: identity and program lookups behind capability
//!   traits with graceful degradation
//!
//! ## Example
//!
//! ```rust,no_run
//! use fitsync_schedule::config::ServerConfig;
//! use fitsync_schedule::context::ServiceContext;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     fitsync_schedule::logging::init_logging(&config)?;
//!
//!     let ctx = ServiceContext::from_config(&config).await?;
//!     println!("Schedule core ready on {}", ctx.database.backend_info());
//!
//!     Ok(())
//! }
//! ```

/// Configuration management and environment parsing
pub mod config;

/// Application constants and configuration defaults
pub mod constants;

/// Dependency injection context for process-scoped resources
pub mod context;

/// Database abstraction layer with plugin support
pub mod database_plugins;

/// Unified error handling system with standard error codes and HTTP mapping
pub mod errors;

/// Domain event emission to the pub/sub bus
pub mod events;

/// External collaborator clients (user service, training service)
pub mod external;

/// Production logging and structured output
pub mod logging;

/// Common data models for scheduling
pub mod models;

/// Page-number pagination for listings
pub mod pagination;

/// Domain service layer for protocol-agnostic business logic
pub mod services;

/// Validated half-open time interval primitive
pub mod time_range;
