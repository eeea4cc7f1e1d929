// ABOUTME: HTTP client for the user service, resolving user ids to identities and roles
// ABOUTME: Maps 404 to NotFound and transport failures to Unavailable with a short timeout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{error, warn};
use uuid::Uuid;

use super::{bearer_header, IdentityResolver, LookupResult, UserIdentity};
use crate::config::environment::ServiceEndpoint;

/// User service response envelope
#[derive(Debug, Deserialize)]
struct UserResponse {
    data: UserIdentity,
}

/// HTTP client for the user service
///
/// The trainer identity check is the one collaborator call that can be
/// load-bearing: a definitive 404 from here fails booking creation, while a
/// timeout or connection error only degrades validation.
#[derive(Clone)]
pub struct UserServiceClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl UserServiceClient {
    /// Create a new user service client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new(endpoint: &ServiceEndpoint) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(endpoint.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: endpoint.base_url.trim_end_matches('/').to_owned(),
            http_client,
        })
    }
}

#[async_trait]
impl IdentityResolver for UserServiceClient {
    async fn resolve_user(&self, user_id: Uuid, auth_token: &str) -> LookupResult<UserIdentity> {
        let url = format!("{}/api/users/{user_id}", self.base_url);

        let response = match self
            .http_client
            .get(&url)
            .header("Authorization", bearer_header(auth_token))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("User service unavailable: {}", e);
                return LookupResult::Unavailable;
            }
        };

        match response.status() {
            StatusCode::NOT_FOUND => LookupResult::NotFound,
            status if status.is_success() => match response.json::<UserResponse>().await {
                Ok(body) => LookupResult::Found(body.data),
                Err(e) => {
                    warn!("User service returned an unparseable body: {}", e);
                    LookupResult::Unavailable
                }
            },
            status => {
                warn!("User service returned status {}", status);
                LookupResult::Unavailable
            }
        }
    }
}
