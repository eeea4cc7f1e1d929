// ABOUTME: Logging configuration and structured logging setup for observability
// ABOUTME: Configures log levels and output format from the server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

//! Production-ready logging configuration with structured output

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ServerConfig;

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` takes precedence when set; otherwise the configured log level
/// applies crate-wide. Production environments emit JSON for log aggregation,
/// everything else gets a human-readable format.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(config: &ServerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if config.environment.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
    }

    tracing::info!(
        service = crate::constants::service::SERVICE_NAME,
        version = crate::constants::service::SERVICE_VERSION,
        environment = %config.environment,
        "Logging initialized"
    );

    Ok(())
}
