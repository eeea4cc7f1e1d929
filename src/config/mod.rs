// ABOUTME: Configuration management module for centralized service settings
// ABOUTME: Handles environment-based configuration for storage, event bus, and collaborators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

//! Configuration module for the schedule core
//!
//! Centralized configuration management, loaded once at startup from
//! environment variables and injected into the components that need it:
//!
//! - **Environment**: server configuration from environment variables
//!   (database, Redis event bus, collaborator endpoints, logging)

/// Environment and server configuration
pub mod environment;

pub use environment::ServerConfig;
