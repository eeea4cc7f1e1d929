// ABOUTME: Integration tests for the domain event contract
// ABOUTME: One event per committed transition, correct channels and payload fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{date, new_booking, new_session, test_context, time, AUTH_TOKEN};
use fitsync_schedule::events::channels;
use fitsync_schedule::services::{bookings, sessions};
use uuid::Uuid;

#[tokio::test]
async fn test_created_event_payload() {
    let (ctx, events) = test_context().await;
    let trainer = Uuid::new_v4();
    let client = Uuid::new_v4();

    let booking = bookings::create_booking(
        &ctx,
        client,
        AUTH_TOKEN,
        new_booking(trainer, date("2024-06-10"), time(9, 0), time(10, 0)),
    )
    .await
    .unwrap();

    let published = events.published_on(channels::BOOKING_CREATED).await;
    assert_eq!(published.len(), 1);

    let payload = &published[0].payload;
    assert_eq!(payload["booking_id"], booking.id.to_string());
    assert_eq!(payload["client_id"], client.to_string());
    assert_eq!(payload["trainer_id"], trainer.to_string());
    assert_eq!(payload["booking_date"], "2024-06-10");
    assert_eq!(payload["start_time"], "09:00:00");
    assert_eq!(payload["end_time"], "10:00:00");
    assert_eq!(payload["type"], "one_on_one");
}

#[tokio::test]
async fn test_cancelled_event_payload() {
    let (ctx, events) = test_context().await;

    let booking = bookings::create_booking(
        &ctx,
        Uuid::new_v4(),
        AUTH_TOKEN,
        new_booking(Uuid::new_v4(), date("2024-06-10"), time(9, 0), time(10, 0)),
    )
    .await
    .unwrap();

    bookings::cancel_booking(&ctx, booking.id, Some("injury".into()))
        .await
        .unwrap();

    let published = events.published_on(channels::BOOKING_CANCELLED).await;
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].payload["booking_id"], booking.id.to_string());
    assert_eq!(published[0].payload["reason"], "injury");
}

#[tokio::test]
async fn test_completed_event_carries_duration() {
    let (ctx, events) = test_context().await;

    let mut request = new_booking(
        Uuid::new_v4(),
        date("2024-06-10"),
        time(10, 0),
        time(11, 30),
    );
    request.notes = Some("good progress on squats".into());

    let booking = bookings::create_booking(&ctx, Uuid::new_v4(), AUTH_TOKEN, request)
        .await
        .unwrap();
    bookings::complete_booking(&ctx, booking.id).await.unwrap();

    let published = events.published_on(channels::BOOKING_COMPLETED).await;
    assert_eq!(published.len(), 1);

    let payload = &published[0].payload;
    assert_eq!(payload["duration_minutes"], 90);
    assert_eq!(payload["workout_date"], "2024-06-10");
    assert_eq!(payload["trainer_notes"], "good progress on squats");
}

#[tokio::test]
async fn test_one_event_per_transition_in_order() {
    let (ctx, events) = test_context().await;

    let first = bookings::create_booking(
        &ctx,
        Uuid::new_v4(),
        AUTH_TOKEN,
        new_booking(Uuid::new_v4(), date("2024-06-10"), time(9, 0), time(10, 0)),
    )
    .await
    .unwrap();
    bookings::complete_booking(&ctx, first.id).await.unwrap();

    let second = bookings::create_booking(
        &ctx,
        Uuid::new_v4(),
        AUTH_TOKEN,
        new_booking(Uuid::new_v4(), date("2024-06-11"), time(9, 0), time(10, 0)),
    )
    .await
    .unwrap();
    bookings::cancel_booking(&ctx, second.id, None).await.unwrap();

    let all = events.published().await;
    let types: Vec<&str> = all.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        types,
        vec![
            channels::BOOKING_CREATED,
            channels::BOOKING_COMPLETED,
            channels::BOOKING_CREATED,
            channels::BOOKING_CANCELLED,
        ]
    );
}

#[tokio::test]
async fn test_rejected_operations_emit_nothing() {
    let (ctx, events) = test_context().await;
    let trainer = Uuid::new_v4();
    let day = date("2024-06-10");

    bookings::create_booking(
        &ctx,
        Uuid::new_v4(),
        AUTH_TOKEN,
        new_booking(trainer, day, time(9, 0), time(10, 0)),
    )
    .await
    .unwrap();

    // Conflicting create and unknown-id transitions commit nothing, so they
    // publish nothing
    bookings::create_booking(
        &ctx,
        Uuid::new_v4(),
        AUTH_TOKEN,
        new_booking(trainer, day, time(9, 30), time(10, 30)),
    )
    .await
    .unwrap_err();
    bookings::cancel_booking(&ctx, Uuid::new_v4(), None).await.unwrap_err();
    bookings::complete_booking(&ctx, Uuid::new_v4()).await.unwrap_err();

    assert_eq!(events.published().await.len(), 1);
}

#[tokio::test]
async fn test_enrollment_emits_no_events() {
    let (ctx, events) = test_context().await;

    let session = sessions::create_group_session(
        &ctx,
        new_session(Uuid::new_v4(), date("2024-06-10"), time(18, 0), time(19, 0), 5),
    )
    .await
    .unwrap();
    sessions::enroll(&ctx, session.id, Uuid::new_v4()).await.unwrap();

    assert!(events.published().await.is_empty());
}
