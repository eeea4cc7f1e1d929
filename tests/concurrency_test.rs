// ABOUTME: Concurrency tests for the no-double-booking and exact-capacity invariants
// ABOUTME: Races N tasks against one slot or one session over file-backed SQLite
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::HashSet;

use common::{date, file_backed_context, new_booking, new_session, time, AUTH_TOKEN};
use fitsync_schedule::errors::ErrorCode;
use fitsync_schedule::models::{BookingFilter, BookingStatus};
use fitsync_schedule::pagination::PageParams;
use fitsync_schedule::services::{bookings, sessions};
use uuid::Uuid;

const RACERS: usize = 8;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_admit_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _events) = file_backed_context(&dir).await;
    let trainer = Uuid::new_v4();
    let day = date("2024-06-10");

    let mut handles = Vec::with_capacity(RACERS);
    for _ in 0..RACERS {
        let ctx = ctx.clone();
        handles.push(tokio::spawn(async move {
            bookings::create_booking(
                &ctx,
                Uuid::new_v4(),
                AUTH_TOKEN,
                new_booking(trainer, day, time(9, 0), time(10, 0)),
            )
            .await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) if e.code == ErrorCode::SlotConflict => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, RACERS - 1);

    // Exactly one non-cancelled booking survives for the trainer and date
    let page = bookings::list_bookings(
        &ctx,
        BookingFilter::ByTrainer(trainer),
        Some(BookingStatus::Scheduled),
        PageParams::default(),
    )
    .await
    .unwrap();
    assert_eq!(page.total_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_overlapping_variants_stay_pairwise_disjoint() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _events) = file_backed_context(&dir).await;
    let trainer = Uuid::new_v4();
    let day = date("2024-06-10");

    // Staggered half-overlapping ranges: 09:00-10:00, 09:30-10:30, ...
    let mut handles = Vec::with_capacity(RACERS);
    for i in 0..RACERS {
        let ctx = ctx.clone();
        let start = time(9 + (i as u32) / 2, ((i as u32) % 2) * 30);
        let end = time(10 + (i as u32) / 2, ((i as u32) % 2) * 30);
        handles.push(tokio::spawn(async move {
            bookings::create_booking(
                &ctx,
                Uuid::new_v4(),
                AUTH_TOKEN,
                new_booking(trainer, day, start, end),
            )
            .await
        }));
    }
    for handle in handles {
        // Which racers win depends on scheduling; the invariant below does not
        let _ = handle.await.unwrap();
    }

    let page = bookings::list_bookings(
        &ctx,
        BookingFilter::ByTrainer(trainer),
        Some(BookingStatus::Scheduled),
        PageParams::new(1, 100).unwrap(),
    )
    .await
    .unwrap();

    let admitted = page.items;
    assert!(!admitted.is_empty());
    for a in &admitted {
        for b in &admitted {
            if a.id != b.id {
                let ra = a.time_range().unwrap();
                let rb = b.time_range().unwrap();
                assert!(
                    !ra.overlaps(&rb),
                    "admitted bookings overlap: {ra} vs {rb}"
                );
            }
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_enrollment_fills_exactly_to_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _events) = file_backed_context(&dir).await;

    let capacity = 3;
    let session = sessions::create_group_session(
        &ctx,
        new_session(
            Uuid::new_v4(),
            date("2024-06-10"),
            time(18, 0),
            time(19, 0),
            capacity,
        ),
    )
    .await
    .unwrap();

    let mut handles = Vec::with_capacity(RACERS);
    for _ in 0..RACERS {
        let ctx = ctx.clone();
        let session_id = session.id;
        handles.push(tokio::spawn(async move {
            sessions::enroll(&ctx, session_id, Uuid::new_v4()).await
        }));
    }

    let mut successes = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) if e.code == ErrorCode::SessionFull => full += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(successes, capacity as usize);
    assert_eq!(full, RACERS - capacity as usize);

    let final_state = sessions::get_group_session(&ctx, session.id).await.unwrap();
    assert_eq!(final_state.current_participants, capacity);
    assert_eq!(final_state.enrolled_clients.len(), capacity as usize);

    let unique: HashSet<Uuid> = final_state.enrolled_clients.iter().copied().collect();
    assert_eq!(unique.len(), final_state.enrolled_clients.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_client_enrolls_once() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _events) = file_backed_context(&dir).await;

    let session = sessions::create_group_session(
        &ctx,
        new_session(Uuid::new_v4(), date("2024-06-10"), time(18, 0), time(19, 0), 10),
    )
    .await
    .unwrap();

    let client = Uuid::new_v4();
    let mut handles = Vec::with_capacity(RACERS);
    for _ in 0..RACERS {
        let ctx = ctx.clone();
        let session_id = session.id;
        handles.push(tokio::spawn(async move {
            sessions::enroll(&ctx, session_id, client).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) if e.code == ErrorCode::AlreadyEnrolled => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(successes, 1);
    let final_state = sessions::get_group_session(&ctx, session.id).await.unwrap();
    assert_eq!(final_state.current_participants, 1);
    assert_eq!(final_state.enrolled_clients, vec![client]);
}
