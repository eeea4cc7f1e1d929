// ABOUTME: Availability service: trainer-declared open time windows
// ABOUTME: Validates windows, lists active ones, soft-deletes without destroying history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::context::ServiceContext;
use crate::database_plugins::DatabaseProvider as _;
use crate::errors::{AppError, AppResult};
use crate::models::{AvailabilitySlot, NewAvailability};
use crate::time_range::TimeRange;

/// Declare an open time window for a trainer
///
/// Windows recur weekly on `day_of_week` unless `is_recurring` is false, in
/// which case a `specific_date` pins them to a single day.
///
/// # Errors
///
/// Returns `InvalidInput` for an out-of-range weekday, a non-positive
/// `max_slots`, or a non-recurring window without a date; `InvalidRange` for
/// an invalid time range.
pub async fn create_availability(
    ctx: &ServiceContext,
    trainer_id: Uuid,
    request: NewAvailability,
) -> AppResult<AvailabilitySlot> {
    if !(0..=6).contains(&request.day_of_week) {
        return Err(AppError::invalid_input(
            "day_of_week must be between 0 (Sunday) and 6 (Saturday)",
        ));
    }
    if request.max_slots < 1 {
        return Err(AppError::invalid_input("max_slots must be 1 or greater"));
    }
    if !request.is_recurring && request.specific_date.is_none() {
        return Err(AppError::invalid_input(
            "specific_date is required for non-recurring availability",
        ));
    }
    let range = TimeRange::new(request.start_time, request.end_time)?;

    let now = Utc::now();
    let slot = AvailabilitySlot {
        id: Uuid::new_v4(),
        trainer_id,
        gym_id: request.gym_id,
        day_of_week: request.day_of_week,
        start_time: range.start(),
        end_time: range.end(),
        is_recurring: request.is_recurring,
        specific_date: request.specific_date,
        max_slots: request.max_slots,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    ctx.database.create_availability(&slot).await?;
    info!(
        trainer_id = %trainer_id,
        availability_id = %slot.id,
        "Availability window declared"
    );

    Ok(slot)
}

/// List a trainer's active availability windows
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn trainer_availability(
    ctx: &ServiceContext,
    trainer_id: Uuid,
) -> AppResult<Vec<AvailabilitySlot>> {
    Ok(ctx.database.get_trainer_availability(trainer_id).await?)
}

/// Soft-delete an availability window
///
/// The row is deactivated rather than destroyed so bookings made against it
/// remain interpretable.
///
/// # Errors
///
/// Returns `NotFound` for an unknown id.
pub async fn remove_availability(ctx: &ServiceContext, availability_id: Uuid) -> AppResult<()> {
    let removed = ctx
        .database
        .deactivate_availability(availability_id, Utc::now())
        .await?;

    if !removed {
        return Err(
            AppError::not_found("Availability").with_resource_id(availability_id.to_string())
        );
    }

    info!(availability_id = %availability_id, "Availability window removed");
    Ok(())
}
