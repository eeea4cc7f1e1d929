// ABOUTME: External collaborator clients consumed by the schedule core
// ABOUTME: Capability traits with Found/NotFound/Unavailable outcomes so call sites choose what is fatal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

//! External collaborator interfaces
//!
//! The schedule core consults two collaborator services it does not own: the
//! user service (identity/role resolution) and the training service
//! (active-program lookup). Both are modeled as capability traits returning
//! [`LookupResult`], a three-way outcome that lets each call site decide
//! which variants are fatal:
//!
//! - the trainer identity check treats a definitive `NotFound` as fatal but
//!   degrades gracefully on `Unavailable`
//! - the active-program check is purely advisory and never blocks a booking
//!
//! The HTTP implementations apply short per-request timeouts and map
//! transport failures to `Unavailable` rather than errors.

/// Training service client (active-program lookup)
pub mod training_service;
/// User service client (identity/role resolution)
pub mod user_service;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::UserRole;

/// Three-way outcome of a collaborator lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult<T> {
    /// The collaborator answered definitively with a value
    Found(T),
    /// The collaborator answered definitively: no such resource
    NotFound,
    /// The collaborator could not be reached or answered unusably
    Unavailable,
}

/// Identity and role of a resolved user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: Uuid,
    pub role: UserRole,
}

/// An active training program linking a client to a trainer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveProgram {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub trainer_id: Option<Uuid>,
}

/// Resolve a user id to an identity and role
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve a user, forwarding the caller's credentials
    async fn resolve_user(&self, user_id: Uuid, auth_token: &str) -> LookupResult<UserIdentity>;
}

/// Look up a client's active training programs
#[async_trait]
pub trait ProgramLookup: Send + Sync {
    /// Fetch active programs for a client, forwarding the caller's credentials
    async fn active_programs(
        &self,
        client_id: Uuid,
        auth_token: &str,
    ) -> LookupResult<Vec<ActiveProgram>>;
}

/// Normalize a caller-supplied token into an Authorization header value
///
/// Tokens may arrive with or without the `Bearer ` prefix.
#[must_use]
pub(crate) fn bearer_header(token: &str) -> String {
    if token.starts_with("Bearer ") {
        token.to_owned()
    } else {
        format!("Bearer {token}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header_normalization() {
        assert_eq!(bearer_header("abc"), "Bearer abc");
        assert_eq!(bearer_header("Bearer abc"), "Bearer abc");
    }
}
