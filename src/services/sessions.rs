// ABOUTME: Group session service: creation, capacity-safe enrollment, and listing
// ABOUTME: Enrollment rejections follow the priority order NotFound > AlreadyEnrolled > SessionFull
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

//! Group session operations
//!
//! Enrollment is the capacity-enforcement hot path: the storage layer
//! performs the membership check, capacity check, append, and counter
//! increment as one atomic unit per session, so `current_participants` never
//! exceeds `max_participants` even transiently under concurrent enrollment.
//!
//! Session creation deliberately performs no conflict check against the
//! trainer's bookings or other sessions.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::context::ServiceContext;
use crate::database_plugins::{DatabaseProvider as _, EnrollOutcome};
use crate::errors::{AppError, AppResult};
use crate::models::{GroupSession, NewGroupSession, SessionStatus};
use crate::pagination::{Page, PageParams};
use crate::time_range::TimeRange;

/// Create a group session with bounded enrollment
///
/// # Errors
///
/// Returns `InvalidInput` for a non-positive `max_participants`;
/// `InvalidRange` for an invalid time range.
pub async fn create_group_session(
    ctx: &ServiceContext,
    request: NewGroupSession,
) -> AppResult<GroupSession> {
    if request.max_participants < 1 {
        return Err(AppError::invalid_input(
            "max_participants must be a positive integer",
        ));
    }
    let range = TimeRange::new(request.start_time, request.end_time)?;

    let now = Utc::now();
    let session = GroupSession {
        id: Uuid::new_v4(),
        trainer_id: request.trainer_id,
        session_name: request.session_name,
        description: request.description,
        max_participants: request.max_participants,
        current_participants: 0,
        gym_id: request.gym_id,
        session_date: request.session_date,
        start_time: range.start(),
        end_time: range.end(),
        status: SessionStatus::Scheduled,
        enrolled_clients: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    ctx.database.create_group_session(&session).await?;
    info!(
        session_id = %session.id,
        trainer_id = %session.trainer_id,
        max_participants = session.max_participants,
        "Group session created"
    );

    Ok(session)
}

/// Enroll a client into a group session
///
/// # Errors
///
/// Returns `NotFound` for an unknown session, `AlreadyEnrolled` if the client
/// holds a seat, `SessionFull` if no seat remains; in that priority order.
pub async fn enroll(
    ctx: &ServiceContext,
    session_id: Uuid,
    client_id: Uuid,
) -> AppResult<GroupSession> {
    match ctx
        .database
        .enroll_client(session_id, client_id, Utc::now())
        .await?
    {
        EnrollOutcome::Enrolled(session) => {
            info!(
                session_id = %session_id,
                client_id = %client_id,
                enrolled = session.current_participants,
                capacity = session.max_participants,
                "Client enrolled in group session"
            );
            Ok(session)
        }
        EnrollOutcome::NotFound => {
            Err(AppError::not_found("Session").with_resource_id(session_id.to_string()))
        }
        EnrollOutcome::AlreadyEnrolled => Err(AppError::already_enrolled()
            .with_user_id(client_id)
            .with_resource_id(session_id.to_string())),
        EnrollOutcome::SessionFull => {
            Err(AppError::session_full().with_resource_id(session_id.to_string()))
        }
    }
}

/// Fetch a single group session
///
/// # Errors
///
/// Returns `NotFound` for an unknown id.
pub async fn get_group_session(ctx: &ServiceContext, session_id: Uuid) -> AppResult<GroupSession> {
    ctx.database
        .get_group_session(session_id)
        .await?
        .ok_or_else(|| AppError::not_found("Session").with_resource_id(session_id.to_string()))
}

/// List scheduled group sessions
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn list_group_sessions(
    ctx: &ServiceContext,
    params: PageParams,
) -> AppResult<Page<GroupSession>> {
    let (items, total) = ctx
        .database
        .list_group_sessions(SessionStatus::Scheduled, &params)
        .await?;
    Ok(Page::new(items, params, total))
}
