// ABOUTME: Integration tests for trainer availability windows
// ABOUTME: Covers validation, ordered listing, soft deletion, and the advisory-only contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{date, new_booking, test_context, time, AUTH_TOKEN};
use fitsync_schedule::errors::ErrorCode;
use fitsync_schedule::models::NewAvailability;
use fitsync_schedule::services::{availability, bookings};
use uuid::Uuid;

fn weekly_window(day_of_week: i16, start_h: u32, end_h: u32) -> NewAvailability {
    NewAvailability {
        gym_id: None,
        day_of_week,
        start_time: time(start_h, 0),
        end_time: time(end_h, 0),
        is_recurring: true,
        specific_date: None,
        max_slots: 1,
    }
}

#[tokio::test]
async fn test_declare_and_list_windows_ordered() {
    let (ctx, _events) = test_context().await;
    let trainer = Uuid::new_v4();

    availability::create_availability(&ctx, trainer, weekly_window(3, 14, 18))
        .await
        .unwrap();
    availability::create_availability(&ctx, trainer, weekly_window(1, 9, 12))
        .await
        .unwrap();
    availability::create_availability(&ctx, trainer, weekly_window(1, 6, 8))
        .await
        .unwrap();

    let windows = availability::trainer_availability(&ctx, trainer).await.unwrap();
    assert_eq!(windows.len(), 3);
    // Ordered by weekday, then start time
    assert_eq!(windows[0].day_of_week, 1);
    assert_eq!(windows[0].start_time, time(6, 0));
    assert_eq!(windows[1].day_of_week, 1);
    assert_eq!(windows[1].start_time, time(9, 0));
    assert_eq!(windows[2].day_of_week, 3);

    // Another trainer's listing stays empty
    let other = availability::trainer_availability(&ctx, Uuid::new_v4())
        .await
        .unwrap();
    assert!(other.is_empty());
}

#[tokio::test]
async fn test_validation_rejects_bad_windows() {
    let (ctx, _events) = test_context().await;
    let trainer = Uuid::new_v4();

    let err = availability::create_availability(&ctx, trainer, weekly_window(7, 9, 12))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let err = availability::create_availability(&ctx, trainer, weekly_window(-1, 9, 12))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let mut zero_slots = weekly_window(2, 9, 12);
    zero_slots.max_slots = 0;
    let err = availability::create_availability(&ctx, trainer, zero_slots)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let err = availability::create_availability(&ctx, trainer, weekly_window(2, 12, 9))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidRange);

    let mut dateless = weekly_window(2, 9, 12);
    dateless.is_recurring = false;
    let err = availability::create_availability(&ctx, trainer, dateless)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_pinned_window_accepts_specific_date() {
    let (ctx, _events) = test_context().await;
    let trainer = Uuid::new_v4();

    let mut pinned = weekly_window(5, 9, 12);
    pinned.is_recurring = false;
    pinned.specific_date = Some(date("2024-06-14"));

    let slot = availability::create_availability(&ctx, trainer, pinned).await.unwrap();
    assert!(!slot.is_recurring);
    assert_eq!(slot.specific_date, Some(date("2024-06-14")));
}

#[tokio::test]
async fn test_soft_delete_hides_window() {
    let (ctx, _events) = test_context().await;
    let trainer = Uuid::new_v4();

    let slot = availability::create_availability(&ctx, trainer, weekly_window(2, 9, 12))
        .await
        .unwrap();

    availability::remove_availability(&ctx, slot.id).await.unwrap();

    let windows = availability::trainer_availability(&ctx, trainer).await.unwrap();
    assert!(windows.is_empty());

    let err = availability::remove_availability(&ctx, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_availability_is_advisory_for_bookings() {
    // Bookings are checked against other bookings only, never against the
    // trainer's declared windows
    let (ctx, _events) = test_context().await;
    let trainer = Uuid::new_v4();

    // No availability declared at all; booking is still admitted
    let booking = bookings::create_booking(
        &ctx,
        Uuid::new_v4(),
        AUTH_TOKEN,
        new_booking(trainer, date("2024-06-10"), time(9, 0), time(10, 0)),
    )
    .await
    .unwrap();
    assert_eq!(booking.trainer_id, trainer);
}
