// ABOUTME: Database abstraction layer for the FitSync schedule core
// ABOUTME: Plugin architecture with SQLite and PostgreSQL backends behind one trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

//! Database abstraction layer
//!
//! All persistence for the schedule core flows through the
//! [`DatabaseProvider`] trait so the application layer stays backend-agnostic.
//! The two admission-control operations return outcome enums rather than
//! errors: the storage layer reports what happened, the service layer decides
//! what it means for the caller.
//!
//! Both backends guarantee the two critical mutations are atomic against
//! concurrent callers:
//!
//! - booking insertion performs its overlap check and insert as one unit per
//!   `(trainer_id, booking_date)`
//! - enrollment performs its membership check, capacity check, append, and
//!   counter increment as one unit per session id

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    AvailabilitySlot, Booking, BookingFilter, BookingStatus, GroupSession, SessionStatus,
};
use crate::pagination::PageParams;

pub mod factory;
pub mod sqlite;

#[cfg(feature = "postgresql")]
pub mod postgres;

/// Outcome of an atomic booking insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingInsert {
    /// No overlapping non-cancelled booking existed; the row was inserted
    Created,
    /// An overlapping non-cancelled booking holds the slot
    Conflict,
}

/// Outcome of an atomic enrollment attempt
///
/// Rejections are reported in priority order: a missing session wins over
/// membership, membership wins over capacity.
#[derive(Debug, Clone)]
pub enum EnrollOutcome {
    /// The client took a seat; carries the updated session
    Enrolled(GroupSession),
    /// No session with that id exists
    NotFound,
    /// The client already holds a seat
    AlreadyEnrolled,
    /// Every seat is taken
    SessionFull,
}

/// Core database abstraction trait
///
/// All database implementations must implement this trait to provide
/// a consistent interface for the application layer.
#[async_trait]
pub trait DatabaseProvider: Send + Sync + Clone {
    /// Create a new database connection pool
    async fn new(database_url: &str, max_connections: u32) -> Result<Self>
    where
        Self: Sized;

    /// Run database migrations to set up schema
    async fn migrate(&self) -> Result<()>;

    // ================================
    // Availability
    // ================================

    /// Insert a trainer-declared availability window
    async fn create_availability(&self, slot: &AvailabilitySlot) -> Result<()>;

    /// Get a trainer's active availability windows, ordered by weekday then start time
    async fn get_trainer_availability(&self, trainer_id: Uuid) -> Result<Vec<AvailabilitySlot>>;

    /// Soft-delete an availability window; returns false if the id is unknown
    async fn deactivate_availability(
        &self,
        availability_id: Uuid,
        updated_at: DateTime<Utc>,
    ) -> Result<bool>;

    // ================================
    // Bookings
    // ================================

    /// Atomically insert a booking unless a non-cancelled booking for the same
    /// trainer and date overlaps its time range
    async fn insert_booking_unless_conflict(&self, booking: &Booking) -> Result<BookingInsert>;

    /// Get booking by ID
    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>>;

    /// List bookings matching a scope filter and optional status, newest date first
    ///
    /// Returns the requested page of rows plus the total match count.
    async fn list_bookings(
        &self,
        filter: &BookingFilter,
        status: Option<BookingStatus>,
        params: &PageParams,
    ) -> Result<(Vec<Booking>, i64)>;

    /// Mark a booking cancelled, recording the reason and cancellation time
    ///
    /// Returns the updated row, or `None` for an unknown id. Re-cancelling an
    /// already-cancelled booking re-applies the update.
    async fn cancel_booking(
        &self,
        booking_id: Uuid,
        reason: Option<&str>,
        cancelled_at: DateTime<Utc>,
    ) -> Result<Option<Booking>>;

    /// Mark a booking completed; returns the updated row or `None`
    async fn complete_booking(
        &self,
        booking_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<Booking>>;

    // ================================
    // Group Sessions
    // ================================

    /// Insert a new group session
    async fn create_group_session(&self, session: &GroupSession) -> Result<()>;

    /// Get group session by ID
    async fn get_group_session(&self, session_id: Uuid) -> Result<Option<GroupSession>>;

    /// List group sessions with the given status, ordered by date then start time
    async fn list_group_sessions(
        &self,
        status: SessionStatus,
        params: &PageParams,
    ) -> Result<(Vec<GroupSession>, i64)>;

    /// Atomically enroll a client into a session if it exists, the client is
    /// not already enrolled, and a seat remains
    async fn enroll_client(
        &self,
        session_id: Uuid,
        client_id: Uuid,
        enrolled_at: DateTime<Utc>,
    ) -> Result<EnrollOutcome>;
}
