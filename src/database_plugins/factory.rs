// ABOUTME: Database factory and provider abstraction for multi-database support
// ABOUTME: Provides unified interface for SQLite and PostgreSQL with runtime database selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

//! Database factory for creating database providers
//!
//! This module provides automatic database type detection and creation
//! based on connection strings.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use super::sqlite::SqliteDatabase;
use super::{BookingInsert, DatabaseProvider, EnrollOutcome};
use crate::models::{
    AvailabilitySlot, Booking, BookingFilter, BookingStatus, GroupSession, SessionStatus,
};
use crate::pagination::PageParams;

#[cfg(feature = "postgresql")]
use super::postgres::PostgresDatabase;

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    SQLite,
    PostgreSQL,
}

/// Database instance wrapper that delegates to the appropriate implementation
#[derive(Clone)]
pub enum Database {
    SQLite(SqliteDatabase),
    #[cfg(feature = "postgresql")]
    PostgreSQL(PostgresDatabase),
}

impl Database {
    /// Get a descriptive string for the current database backend
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::SQLite(_) => "SQLite (Local Development)",
            #[cfg(feature = "postgresql")]
            Self::PostgreSQL(_) => "PostgreSQL (Production)",
        }
    }

    /// Get the database type enum
    #[must_use]
    pub const fn database_type(&self) -> DatabaseType {
        match self {
            Self::SQLite(_) => DatabaseType::SQLite,
            #[cfg(feature = "postgresql")]
            Self::PostgreSQL(_) => DatabaseType::PostgreSQL,
        }
    }
}

/// Automatically detect database type from connection string
///
/// # Errors
///
/// Returns an error if the URL scheme is neither SQLite nor PostgreSQL.
pub fn detect_database_type(database_url: &str) -> Result<DatabaseType> {
    if database_url.starts_with("sqlite:") {
        Ok(DatabaseType::SQLite)
    } else if database_url.starts_with("postgresql://") || database_url.starts_with("postgres://") {
        Ok(DatabaseType::PostgreSQL)
    } else {
        Err(anyhow!("Unsupported database URL: {database_url}"))
    }
}

#[async_trait]
impl DatabaseProvider for Database {
    async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        debug!("Detecting database type from URL");
        let db_type = detect_database_type(database_url)?;
        info!("Detected database type: {:?}", db_type);

        match db_type {
            DatabaseType::SQLite => {
                let db = SqliteDatabase::new(database_url, max_connections).await?;
                info!("SQLite database initialized");
                Ok(Self::SQLite(db))
            }
            #[cfg(feature = "postgresql")]
            DatabaseType::PostgreSQL => {
                let db = PostgresDatabase::new(database_url, max_connections).await?;
                info!("PostgreSQL database initialized");
                Ok(Self::PostgreSQL(db))
            }
            #[cfg(not(feature = "postgresql"))]
            DatabaseType::PostgreSQL => Err(anyhow!(
                "PostgreSQL support not enabled. Enable the 'postgresql' feature flag."
            )),
        }
    }

    async fn migrate(&self) -> Result<()> {
        match self {
            Self::SQLite(db) => db.migrate().await,
            #[cfg(feature = "postgresql")]
            Self::PostgreSQL(db) => db.migrate().await,
        }
    }

    async fn create_availability(&self, slot: &AvailabilitySlot) -> Result<()> {
        match self {
            Self::SQLite(db) => db.create_availability(slot).await,
            #[cfg(feature = "postgresql")]
            Self::PostgreSQL(db) => db.create_availability(slot).await,
        }
    }

    async fn get_trainer_availability(&self, trainer_id: Uuid) -> Result<Vec<AvailabilitySlot>> {
        match self {
            Self::SQLite(db) => db.get_trainer_availability(trainer_id).await,
            #[cfg(feature = "postgresql")]
            Self::PostgreSQL(db) => db.get_trainer_availability(trainer_id).await,
        }
    }

    async fn deactivate_availability(
        &self,
        availability_id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        match self {
            Self::SQLite(db) => db.deactivate_availability(availability_id, updated_at).await,
            #[cfg(feature = "postgresql")]
            Self::PostgreSQL(db) => db.deactivate_availability(availability_id, updated_at).await,
        }
    }

    async fn insert_booking_unless_conflict(&self, booking: &Booking) -> Result<BookingInsert> {
        match self {
            Self::SQLite(db) => db.insert_booking_unless_conflict(booking).await,
            #[cfg(feature = "postgresql")]
            Self::PostgreSQL(db) => db.insert_booking_unless_conflict(booking).await,
        }
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>> {
        match self {
            Self::SQLite(db) => db.get_booking(booking_id).await,
            #[cfg(feature = "postgresql")]
            Self::PostgreSQL(db) => db.get_booking(booking_id).await,
        }
    }

    async fn list_bookings(
        &self,
        filter: &BookingFilter,
        status: Option<BookingStatus>,
        params: &PageParams,
    ) -> Result<(Vec<Booking>, i64)> {
        match self {
            Self::SQLite(db) => db.list_bookings(filter, status, params).await,
            #[cfg(feature = "postgresql")]
            Self::PostgreSQL(db) => db.list_bookings(filter, status, params).await,
        }
    }

    async fn cancel_booking(
        &self,
        booking_id: Uuid,
        reason: Option<&str>,
        cancelled_at: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        match self {
            Self::SQLite(db) => db.cancel_booking(booking_id, reason, cancelled_at).await,
            #[cfg(feature = "postgresql")]
            Self::PostgreSQL(db) => db.cancel_booking(booking_id, reason, cancelled_at).await,
        }
    }

    async fn complete_booking(
        &self,
        booking_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<Booking>> {
        match self {
            Self::SQLite(db) => db.complete_booking(booking_id, completed_at).await,
            #[cfg(feature = "postgresql")]
            Self::PostgreSQL(db) => db.complete_booking(booking_id, completed_at).await,
        }
    }

    async fn create_group_session(&self, session: &GroupSession) -> Result<()> {
        match self {
            Self::SQLite(db) => db.create_group_session(session).await,
            #[cfg(feature = "postgresql")]
            Self::PostgreSQL(db) => db.create_group_session(session).await,
        }
    }

    async fn get_group_session(&self, session_id: Uuid) -> Result<Option<GroupSession>> {
        match self {
            Self::SQLite(db) => db.get_group_session(session_id).await,
            #[cfg(feature = "postgresql")]
            Self::PostgreSQL(db) => db.get_group_session(session_id).await,
        }
    }

    async fn list_group_sessions(
        &self,
        status: SessionStatus,
        params: &PageParams,
    ) -> Result<(Vec<GroupSession>, i64)> {
        match self {
            Self::SQLite(db) => db.list_group_sessions(status, params).await,
            #[cfg(feature = "postgresql")]
            Self::PostgreSQL(db) => db.list_group_sessions(status, params).await,
        }
    }

    async fn enroll_client(
        &self,
        session_id: Uuid,
        client_id: Uuid,
        enrolled_at: DateTime<Utc>,
    ) -> Result<EnrollOutcome> {
        match self {
            Self::SQLite(db) => db.enroll_client(session_id, client_id, enrolled_at).await,
            #[cfg(feature = "postgresql")]
            Self::PostgreSQL(db) => db.enroll_client(session_id, client_id, enrolled_at).await,
        }
    }
}
