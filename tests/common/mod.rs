// ABOUTME: Shared test fixtures: wired-up service contexts and collaborator stubs
// ABOUTME: Builds contexts over in-memory or file-backed SQLite with the recording event bus
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use fitsync_schedule::context::ServiceContext;
use fitsync_schedule::database_plugins::factory::Database;
use fitsync_schedule::database_plugins::DatabaseProvider as _;
use fitsync_schedule::events::factory::EventBus;
use fitsync_schedule::events::memory::InMemoryEventBus;
use fitsync_schedule::external::{
    ActiveProgram, IdentityResolver, LookupResult, ProgramLookup, UserIdentity,
};
use fitsync_schedule::models::{BookingType, NewBooking, NewGroupSession, UserRole};

pub const AUTH_TOKEN: &str = "Bearer test-token";

/// How the stubbed user service answers identity lookups
#[derive(Clone, Copy)]
pub enum IdentityMode {
    /// Every id resolves to a trainer
    Trainer,
    /// Every id resolves to a client
    Client,
    /// Every lookup is a definitive miss
    NotFound,
    /// The service cannot be reached
    Unavailable,
}

pub struct StubIdentity(pub IdentityMode);

#[async_trait]
impl IdentityResolver for StubIdentity {
    async fn resolve_user(&self, user_id: Uuid, _auth_token: &str) -> LookupResult<UserIdentity> {
        match self.0 {
            IdentityMode::Trainer => LookupResult::Found(UserIdentity {
                id: user_id,
                role: UserRole::Trainer,
            }),
            IdentityMode::Client => LookupResult::Found(UserIdentity {
                id: user_id,
                role: UserRole::Client,
            }),
            IdentityMode::NotFound => LookupResult::NotFound,
            IdentityMode::Unavailable => LookupResult::Unavailable,
        }
    }
}

pub struct StubPrograms(pub LookupResult<Vec<ActiveProgram>>);

#[async_trait]
impl ProgramLookup for StubPrograms {
    async fn active_programs(
        &self,
        _client_id: Uuid,
        _auth_token: &str,
    ) -> LookupResult<Vec<ActiveProgram>> {
        self.0.clone()
    }
}

async fn build_context(database_url: &str, identity: IdentityMode) -> (ServiceContext, InMemoryEventBus) {
    let database = Database::new(database_url, 5)
        .await
        .expect("database setup failed");
    let (events, observer) = EventBus::in_memory();

    let ctx = ServiceContext::new(
        database,
        events,
        Arc::new(StubIdentity(identity)),
        Arc::new(StubPrograms(LookupResult::Unavailable)),
    );
    (ctx, observer)
}

/// Context over in-memory SQLite with every id resolving to a trainer
pub async fn test_context() -> (ServiceContext, InMemoryEventBus) {
    build_context("sqlite::memory:", IdentityMode::Trainer).await
}

/// Context over in-memory SQLite with a chosen identity behavior
pub async fn context_with_identity(mode: IdentityMode) -> (ServiceContext, InMemoryEventBus) {
    build_context("sqlite::memory:", mode).await
}

/// Context over a file-backed SQLite database, for tests that need real
/// connection-level concurrency
pub async fn file_backed_context(dir: &tempfile::TempDir) -> (ServiceContext, InMemoryEventBus) {
    let path = dir.path().join("schedule.db");
    build_context(&format!("sqlite:{}", path.display()), IdentityMode::Trainer).await
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

pub fn new_booking(
    trainer_id: Uuid,
    booking_date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> NewBooking {
    NewBooking {
        booking_type: BookingType::OneOnOne,
        trainer_id,
        gym_id: None,
        booking_date,
        start_time: start,
        end_time: end,
        notes: None,
    }
}

pub fn new_session(
    trainer_id: Uuid,
    session_date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    max_participants: i32,
) -> NewGroupSession {
    NewGroupSession {
        trainer_id,
        session_name: "Morning HIIT".into(),
        description: "High intensity interval training".into(),
        max_participants,
        gym_id: Uuid::new_v4(),
        session_date,
        start_time: start,
        end_time: end,
    }
}
