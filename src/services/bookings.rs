// ABOUTME: Booking service: conflict-checked creation, lifecycle transitions, and listing
// ABOUTME: Emits one domain event per committed state change, strictly after the commit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

//! One-on-one booking operations
//!
//! `create_booking` is the admission-control hot path: input validation and
//! collaborator checks happen up front, then the overlap check and insert
//! execute as one atomic unit in the storage layer. Under concurrent creation
//! for the same trainer and date, exactly one caller wins; the rest receive
//! `SlotConflict`.

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::context::ServiceContext;
use crate::database_plugins::{BookingInsert, DatabaseProvider as _};
use crate::errors::{AppError, AppResult};
use crate::events::channels;
use crate::external::LookupResult;
use crate::models::{Booking, BookingFilter, BookingStatus, NewBooking, UserRole};
use crate::pagination::{Page, PageParams};
use crate::time_range::TimeRange;

/// Create a booking for a client against a trainer
///
/// The trainer identity check is best-effort except for a definitive
/// "not found": an unreachable user service only degrades validation, but a
/// user service that answers "no such user" (or resolves to a non-trainer)
/// fails the request. The active-program check never blocks; it only logs.
///
/// # Errors
///
/// - `InvalidRange` if `start_time >= end_time`
/// - `NotFound` if the user service definitively reports no such trainer
/// - `InvalidInput` if the resolved user is not a trainer
/// - `SlotConflict` if a non-cancelled booking for the same trainer and date
///   overlaps the requested range
pub async fn create_booking(
    ctx: &ServiceContext,
    client_id: Uuid,
    auth_token: &str,
    request: NewBooking,
) -> AppResult<Booking> {
    let range = TimeRange::new(request.start_time, request.end_time)?;

    match ctx
        .identity
        .resolve_user(request.trainer_id, auth_token)
        .await
    {
        LookupResult::Found(identity) if identity.role == UserRole::Trainer => {}
        LookupResult::Found(_) => {
            return Err(AppError::invalid_input("Specified user is not a trainer")
                .with_resource_id(request.trainer_id.to_string()));
        }
        LookupResult::NotFound => {
            return Err(
                AppError::not_found("Trainer").with_resource_id(request.trainer_id.to_string())
            );
        }
        LookupResult::Unavailable => {
            warn!("User service unavailable, skipping trainer validation");
        }
    }

    match ctx.programs.active_programs(client_id, auth_token).await {
        LookupResult::Found(programs) if !programs.is_empty() => {
            let has_program_with_trainer = programs
                .iter()
                .any(|p| p.trainer_id == Some(request.trainer_id));
            if !has_program_with_trainer {
                warn!(
                    client_id = %client_id,
                    trainer_id = %request.trainer_id,
                    "Client booking with trainer without active program"
                );
            }
        }
        LookupResult::Found(_) => {}
        LookupResult::NotFound | LookupResult::Unavailable => {
            warn!(client_id = %client_id, "Could not verify active program");
        }
    }

    let now = Utc::now();
    let booking = Booking {
        id: Uuid::new_v4(),
        booking_type: request.booking_type,
        trainer_id: request.trainer_id,
        client_id,
        gym_id: request.gym_id,
        booking_date: request.booking_date,
        start_time: range.start(),
        end_time: range.end(),
        status: BookingStatus::Scheduled,
        notes: request.notes,
        created_at: now,
        updated_at: now,
        cancelled_at: None,
        cancellation_reason: None,
    };

    match ctx.database.insert_booking_unless_conflict(&booking).await? {
        BookingInsert::Created => {}
        BookingInsert::Conflict => {
            return Err(AppError::slot_conflict()
                .with_user_id(client_id)
                .with_details(json!({
                    "trainer_id": booking.trainer_id.to_string(),
                    "booking_date": booking.booking_date.to_string(),
                })));
        }
    }

    info!(
        booking_id = %booking.id,
        trainer_id = %booking.trainer_id,
        client_id = %client_id,
        "Booking created"
    );

    ctx.events
        .publish(
            channels::BOOKING_CREATED,
            &json!({
                "booking_id": booking.id.to_string(),
                "client_id": booking.client_id.to_string(),
                "trainer_id": booking.trainer_id.to_string(),
                "booking_date": booking.booking_date.to_string(),
                "start_time": booking.start_time.to_string(),
                "end_time": booking.end_time.to_string(),
                "type": booking.booking_type.to_string(),
            }),
        )
        .await;

    Ok(booking)
}

/// Cancel a booking, recording an optional reason
///
/// Not idempotent: cancelling an already-cancelled booking re-applies the
/// update and overwrites `cancelled_at` and `cancellation_reason`.
///
/// # Errors
///
/// Returns `NotFound` for an unknown id.
pub async fn cancel_booking(
    ctx: &ServiceContext,
    booking_id: Uuid,
    reason: Option<String>,
) -> AppResult<Booking> {
    let booking = ctx
        .database
        .cancel_booking(booking_id, reason.as_deref(), Utc::now())
        .await?
        .ok_or_else(|| AppError::not_found("Booking").with_resource_id(booking_id.to_string()))?;

    info!(booking_id = %booking_id, "Booking cancelled");

    ctx.events
        .publish(
            channels::BOOKING_CANCELLED,
            &json!({
                "booking_id": booking.id.to_string(),
                "client_id": booking.client_id.to_string(),
                "reason": booking.cancellation_reason,
            }),
        )
        .await;

    Ok(booking)
}

/// Mark a booking completed
///
/// The completed event carries the session duration in minutes, derived from
/// the stored range; ranges never cross midnight because `start < end` was
/// enforced at creation.
///
/// # Errors
///
/// Returns `NotFound` for an unknown id.
pub async fn complete_booking(ctx: &ServiceContext, booking_id: Uuid) -> AppResult<Booking> {
    let booking = ctx
        .database
        .complete_booking(booking_id, Utc::now())
        .await?
        .ok_or_else(|| AppError::not_found("Booking").with_resource_id(booking_id.to_string()))?;

    let duration_minutes = booking.time_range()?.duration_minutes();

    info!(
        booking_id = %booking_id,
        duration_minutes,
        "Booking completed"
    );

    ctx.events
        .publish(
            channels::BOOKING_COMPLETED,
            &json!({
                "booking_id": booking.id.to_string(),
                "client_id": booking.client_id.to_string(),
                "trainer_id": booking.trainer_id.to_string(),
                "workout_date": booking.booking_date.to_string(),
                "start_time": booking.start_time.to_string(),
                "end_time": booking.end_time.to_string(),
                "duration_minutes": duration_minutes,
                "trainer_notes": booking.notes.clone().unwrap_or_default(),
            }),
        )
        .await;

    Ok(booking)
}

/// Fetch a single booking
///
/// # Errors
///
/// Returns `NotFound` for an unknown id.
pub async fn get_booking(ctx: &ServiceContext, booking_id: Uuid) -> AppResult<Booking> {
    ctx.database
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking").with_resource_id(booking_id.to_string()))
}

/// List bookings matching a scope filter and optional status
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn list_bookings(
    ctx: &ServiceContext,
    filter: BookingFilter,
    status: Option<BookingStatus>,
    params: PageParams,
) -> AppResult<Page<Booking>> {
    let (items, total) = ctx.database.list_bookings(&filter, status, &params).await?;
    Ok(Page::new(items, params, total))
}
