// ABOUTME: Page-number pagination for booking and session listings
// ABOUTME: Validates page/limit parameters and carries total counts alongside items
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

use serde::{Deserialize, Serialize};

use crate::constants::pagination::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::errors::{AppError, AppResult};

/// Validated pagination parameters for listing queries
///
/// Pages are 1-based. `limit` must be positive and is capped at
/// [`MAX_PAGE_LIMIT`] so a single request cannot drag the whole table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageParams {
    page: i64,
    limit: i64,
}

impl PageParams {
    /// Create validated pagination parameters
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `page < 1` or `limit < 1`.
    pub fn new(page: i64, limit: i64) -> AppResult<Self> {
        if page < 1 {
            return Err(AppError::invalid_input("page must be 1 or greater"));
        }
        if limit < 1 {
            return Err(AppError::invalid_input("limit must be a positive integer"));
        }
        Ok(Self {
            page,
            limit: limit.min(MAX_PAGE_LIMIT),
        })
    }

    /// 1-based page number
    #[must_use]
    pub const fn page(&self) -> i64 {
        self.page
    }

    /// Page size
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// Row offset for the backing SQL query
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// One page of results plus pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items in this page
    pub items: Vec<T>,
    /// 1-based page number
    pub page: i64,
    /// Page size requested
    pub limit: i64,
    /// Total matching items across all pages
    pub total_count: i64,
    /// `ceil(total_count / limit)`
    pub total_pages: i64,
}

impl<T> Page<T> {
    /// Assemble a page from query results and a total count
    #[must_use]
    pub fn new(items: Vec<T>, params: PageParams, total_count: i64) -> Self {
        Self {
            items,
            page: params.page(),
            limit: params.limit(),
            total_count,
            total_pages: (total_count + params.limit() - 1) / params.limit(),
        }
    }
}
