// ABOUTME: Domain service layer for the schedule core's business logic
// ABOUTME: Protocol-agnostic admission control, lifecycle transitions, and event emission
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

//! Domain service layer
//!
//! Protocol-agnostic business logic, reusable from any entry point (REST,
//! gRPC, message consumers). Each operation validates its input before
//! touching storage, delegates the atomic admission decision to the storage
//! layer, and emits its domain event only after the state change commits.

/// Trainer availability windows: declare, list, soft-delete
pub mod availability;

/// One-on-one bookings: conflict-checked creation, lifecycle, listing
pub mod bookings;

/// Group sessions: creation, capacity-safe enrollment, listing
pub mod sessions;
