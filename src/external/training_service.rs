// ABOUTME: HTTP client for the training service, fetching a client's active programs
// ABOUTME: Purely advisory lookup; every failure mode degrades to Unavailable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use super::{bearer_header, ActiveProgram, LookupResult, ProgramLookup};
use crate::config::environment::ServiceEndpoint;

/// Training service response envelope
#[derive(Debug, Deserialize)]
struct ProgramsResponse {
    #[serde(default)]
    data: Vec<ActiveProgram>,
}

/// HTTP client for the training service
#[derive(Clone)]
pub struct TrainingServiceClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl TrainingServiceClient {
    /// Create a new training service client
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
impl ProgramLookup for TrainingServiceClient {
    async fn active_programs(
        &self,
        client_id: Uuid,
        auth_token: &str,
    ) -> LookupResult<Vec<ActiveProgram>> {
        let url = format!("{}/api/programs/client/{client_id}/active", self.base_url);

        let response = match self
            .http_client
            .get(&url)
            .header("Authorization", bearer_header(auth_token))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Training service unavailable: {}", e);
                return LookupResult::Unavailable;
            }
        };

        if !response.status().is_success() {
            warn!("Training service returned status {}", response.status());
            return LookupResult::Unavailable;
        }

        match response.json::<ProgramsResponse>().await {
            Ok(body) => LookupResult::Found(body.data),
            Err(e) => {
                warn!("Training service returned an unparseable body: {}", e);
                LookupResult::Unavailable
            }
        }
    }
}
