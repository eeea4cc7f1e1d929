// ABOUTME: Dependency injection context carrying process-scoped resources
// ABOUTME: Database pool, event bus, and collaborator clients created once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

//! Dependency injection context
//!
//! Shared resources are created once at startup and passed explicitly to
//! every service call; nothing reaches for ambient globals. Collaborator
//! clients sit behind trait objects so tests can substitute stubs.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::ServerConfig;
use crate::database_plugins::factory::Database;
use crate::database_plugins::DatabaseProvider as _;
use crate::events::factory::EventBus;
use crate::external::training_service::TrainingServiceClient;
use crate::external::user_service::UserServiceClient;
use crate::external::{IdentityResolver, ProgramLookup};

/// Process-scoped resources injected into every service call
#[derive(Clone)]
pub struct ServiceContext {
    /// Connection-pooled relational store
    pub database: Database,
    /// Pub/sub event bus
    pub events: EventBus,
    /// User service (identity/role resolution)
    pub identity: Arc<dyn IdentityResolver>,
    /// Training service (active-program lookup)
    pub programs: Arc<dyn ProgramLookup>,
}

impl ServiceContext {
    /// Assemble a context from pre-built resources
    #[must_use]
    pub fn new(
        database: Database,
        events: EventBus,
        identity: Arc<dyn IdentityResolver>,
        programs: Arc<dyn ProgramLookup>,
    ) -> Self {
        Self {
            database,
            events,
            identity,
            programs,
        }
    }

    /// Build the production context from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the database or event bus cannot be reached, or a
    /// collaborator client cannot be constructed.
    pub async fn from_config(config: &ServerConfig) -> Result<Self> {
        let database = Database::new(
            &config.database.url.to_connection_string(),
            config.database.max_connections,
        )
        .await?;
        info!("Database ready: {}", database.backend_info());

        let events = EventBus::new(config.event_bus.clone()).await?;
        info!("Event bus ready: {}", events.backend_info());

        let identity = UserServiceClient::new(&config.external_services.user_service)?;
        let programs = TrainingServiceClient::new(&config.external_services.training_service)?;

        Ok(Self::new(
            database,
            events,
            Arc::new(identity),
            Arc::new(programs),
        ))
    }
}
