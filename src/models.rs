// ABOUTME: Core data models for the FitSync schedule core
// ABOUTME: Defines AvailabilitySlot, Booking, GroupSession and their request/status types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

//! # Data Models
//!
//! Core data structures for the schedule core: trainer availability windows,
//! one-on-one bookings, and capacity-limited group sessions.
//!
//! ## Design Principles
//!
//! - **Serializable**: all models support JSON serialization for event
//!   payloads and API responses
//! - **Type Safe**: statuses and booking types are enums round-tripped
//!   through their string form in storage
//! - **Opaque references**: `trainer_id`, `client_id`, and `gym_id` are
//!   foreign identifiers owned by the user/org services, never validated
//!   structurally here

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::time_range::TimeRange;

/// Kind of booking held in the ledger
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    /// Private session between one client and one trainer
    OneOnOne,
    /// Seat in a trainer-led group class
    GroupClass,
}

impl Display for BookingType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::OneOnOne => write!(f, "one_on_one"),
            Self::GroupClass => write!(f, "group_class"),
        }
    }
}

impl FromStr for BookingType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one_on_one" => Ok(Self::OneOnOne),
            "group_class" => Ok(Self::GroupClass),
            other => Err(AppError::invalid_input(format!(
                "Unknown booking type: {other}"
            ))),
        }
    }
}

/// Lifecycle status of a booking
///
/// Bookings start in `Scheduled` and move to exactly one terminal-ish state.
/// Cancelled bookings no longer participate in conflict detection.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::NoShow => write!(f, "no_show"),
        }
    }
}

impl FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "no_show" => Ok(Self::NoShow),
            other => Err(AppError::invalid_input(format!(
                "Unknown booking status: {other}"
            ))),
        }
    }
}

/// Lifecycle status of a group session
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl Display for SessionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(AppError::invalid_input(format!(
                "Unknown session status: {other}"
            ))),
        }
    }
}

/// Role reported by the identity resolver for a resolved user
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Trainer,
    Client,
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Trainer => write!(f, "trainer"),
            Self::Client => write!(f, "client"),
        }
    }
}

/// A trainer-declared open time window
///
/// Either recurring on a weekday (`day_of_week`, 0 = Sunday through
/// 6 = Saturday) or pinned to a `specific_date`. Slots are soft-deleted
/// (`is_active = false`) so bookings made against them stay interpretable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub gym_id: Option<Uuid>,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_recurring: bool,
    pub specific_date: Option<NaiveDate>,
    pub max_slots: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A one-on-one booking in the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub booking_type: BookingType,
    pub trainer_id: Uuid,
    pub client_id: Uuid,
    pub gym_id: Option<Uuid>,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
}

impl Booking {
    /// The booking's time range
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` if the stored times are inverted, which only
    /// happens if the row was written outside the service layer.
    pub fn time_range(&self) -> AppResult<TimeRange> {
        TimeRange::new(self.start_time, self.end_time)
    }
}

/// A capacity-limited group session
///
/// Invariant: `current_participants == enrolled_clients.len()` and never
/// exceeds `max_participants`; a client appears at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSession {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub session_name: String,
    pub description: String,
    pub max_participants: i32,
    pub current_participants: i32,
    pub gym_id: Uuid,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: SessionStatus,
    pub enrolled_clients: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for declaring an availability window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAvailability {
    pub gym_id: Option<Uuid>,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default = "default_recurring")]
    pub is_recurring: bool,
    pub specific_date: Option<NaiveDate>,
    #[serde(default = "default_max_slots")]
    pub max_slots: i32,
}

const fn default_recurring() -> bool {
    true
}

const fn default_max_slots() -> i32 {
    1
}

/// Request payload for creating a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    #[serde(rename = "type")]
    pub booking_type: BookingType,
    pub trainer_id: Uuid,
    pub gym_id: Option<Uuid>,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub notes: Option<String>,
}

/// Request payload for creating a group session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGroupSession {
    pub trainer_id: Uuid,
    pub session_name: String,
    pub description: String,
    pub max_participants: i32,
    pub gym_id: Uuid,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Scope restriction for booking listings
///
/// Mirrors the role-scoped listing of the surrounding API: clients see their
/// own bookings, trainers see bookings against them, admins see everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingFilter {
    /// Bookings made by a specific client
    ByClient(Uuid),
    /// Bookings held against a specific trainer
    ByTrainer(Uuid),
    /// No scope restriction
    All,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_type_round_trip() {
        for ty in [BookingType::OneOnOne, BookingType::GroupClass] {
            let parsed: BookingType = ty.to_string().parse().unwrap();
            assert_eq!(parsed, ty);
        }
    }

    #[test]
    fn test_booking_status_round_trip() {
        for status in [
            BookingStatus::Scheduled,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::NoShow,
        ] {
            let parsed: BookingStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!("paused".parse::<BookingStatus>().is_err());
        assert!("paused".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn test_booking_type_serde_rename() {
        let json = serde_json::to_string(&BookingType::OneOnOne).unwrap();
        assert_eq!(json, "\"one_on_one\"");
    }
}
