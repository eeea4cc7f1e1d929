// ABOUTME: Unified error handling for the FitSync schedule core
// ABOUTME: Defines error codes, HTTP status mapping, and the JSON error response envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

//! # Unified Error Handling System
//!
//! This module provides the centralized error handling system for the schedule
//! core. It defines standard error codes, the `AppError` type carried through
//! every fallible operation, and the HTTP response formatting used when errors
//! are surfaced to clients.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Standard error codes used throughout the schedule core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (1000-1999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 1000,
    #[serde(rename = "INVALID_RANGE")]
    InvalidRange = 1001,

    // Resource Management (2000-2999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 2000,

    // Scheduling Conflicts (3000-3999)
    #[serde(rename = "SLOT_CONFLICT")]
    SlotConflict = 3000,
    #[serde(rename = "SESSION_FULL")]
    SessionFull = 3001,
    #[serde(rename = "ALREADY_ENROLLED")]
    AlreadyEnrolled = 3002,

    // External Services (5000-5999)
    #[serde(rename = "COLLABORATOR_UNAVAILABLE")]
    CollaboratorUnavailable = 5000,

    // Configuration (6000-6999)
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal Errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::InvalidInput | Self::InvalidRange => 400,

            // 404 Not Found
            Self::ResourceNotFound => 404,

            // 409 Conflict
            Self::SlotConflict | Self::SessionFull | Self::AlreadyEnrolled => 409,

            // 503 Service Unavailable
            Self::CollaboratorUnavailable => 503,

            // 500 Internal Server Error
            Self::ConfigError | Self::InternalError | Self::DatabaseError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidRange => "The provided time range is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::SlotConflict => "The requested time slot conflicts with an existing booking",
            Self::SessionFull => "The group session has no remaining capacity",
            Self::AlreadyEnrolled => "The client is already enrolled in this session",
            Self::CollaboratorUnavailable => "A collaborator service is currently unavailable",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal error occurred",
            Self::DatabaseError => "Database operation failed",
        }
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// User ID if available
    pub user_id: Option<Uuid>,
    /// Resource ID if applicable
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            user_id: None,
            resource_id: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Unified error type for the schedule core
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a user ID to the error context
    #[must_use]
    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.context.user_id = Some(user_id);
        self
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorResponseDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                details: error.context.details,
            },
        }
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Invalid time range
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRange, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Requested time slot overlaps an existing non-cancelled booking
    pub fn slot_conflict() -> Self {
        Self::new(ErrorCode::SlotConflict, "Time slot already booked")
    }

    /// Group session is at capacity
    pub fn session_full() -> Self {
        Self::new(ErrorCode::SessionFull, "Session is full")
    }

    /// Client is already enrolled in the session
    pub fn already_enrolled() -> Self {
        Self::new(ErrorCode::AlreadyEnrolled, "Already enrolled")
    }

    /// Mandatory collaborator check could not be satisfied
    pub fn collaborator_unavailable(service: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::CollaboratorUnavailable,
            format!("{} is unavailable", service.into()),
        )
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

/// Conversion from anyhow::Error to `AppError`
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.source() {
            Some(source) => {
                Self::new(ErrorCode::DatabaseError, error.to_string()).with_details(
                    serde_json::json!({
                        "source": source.to_string()
                    }),
                )
            }
            None => Self::new(ErrorCode::DatabaseError, error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::SlotConflict.http_status(), 409);
        assert_eq!(ErrorCode::SessionFull.http_status(), 409);
        assert_eq!(ErrorCode::CollaboratorUnavailable.http_status(), 503);
        assert_eq!(ErrorCode::DatabaseError.http_status(), 500);
    }

    #[test]
    fn test_app_error_creation() {
        let error = AppError::slot_conflict()
            .with_user_id(Uuid::new_v4())
            .with_resource_id("booking-123");

        assert_eq!(error.code, ErrorCode::SlotConflict);
        assert!(error.context.user_id.is_some());
        assert!(error.context.resource_id.is_some());
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::session_full().with_details(serde_json::json!({
            "max_participants": 10
        }));
        let response = ErrorResponse::from(error);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("SESSION_FULL"));
        assert!(json.contains("max_participants"));
    }
}
