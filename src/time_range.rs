// ABOUTME: Validated half-open civil-time interval primitive used by bookings and sessions
// ABOUTME: Provides overlap testing and duration computation on a single date
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync

//! # Time Range
//!
//! A `TimeRange` is a half-open interval `[start, end)` of civil times on a
//! single date. It is the primitive every admission decision in the schedule
//! core is built on: two bookings for the same trainer and date conflict
//! exactly when their ranges overlap.
//!
//! ## Overlap semantics
//!
//! `a` overlaps `b` iff `a.start < b.end && b.start < a.end`. Because the
//! intervals are half-open, ranges that merely share an endpoint
//! (`a.end == b.start`) do NOT overlap: a `09:00-10:00` booking and a
//! `10:00-11:00` booking on the same trainer coexist. A zero-length range
//! never overlaps anything, including itself; such ranges cannot be built
//! through [`TimeRange::new`], which requires `start < end`, but the overlap
//! algebra is defined for them regardless.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Half-open time interval `[start, end)` on a single civil date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    /// Create a validated time range
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` if `start >= end`. This also rules out ranges
    /// crossing midnight, which the schedule core does not support.
    pub fn new(start: NaiveTime, end: NaiveTime) -> AppResult<Self> {
        if start >= end {
            return Err(AppError::invalid_range(format!(
                "start_time ({start}) must be before end_time ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Start of the interval (inclusive)
    #[must_use]
    pub const fn start(&self) -> NaiveTime {
        self.start
    }

    /// End of the interval (exclusive)
    #[must_use]
    pub const fn end(&self) -> NaiveTime {
        self.end
    }

    /// Test whether two ranges on the same date overlap
    ///
    /// Symmetric. Adjacent ranges sharing an endpoint do not overlap; a
    /// zero-length range overlaps nothing, itself included.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Duration of the range in whole minutes
    ///
    /// Always positive for ranges built through [`TimeRange::new`], and never
    /// wraps: `start < end` rules out midnight crossings.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_rejects_inverted_range() {
        assert!(TimeRange::new(t(10, 0), t(9, 0)).is_err());
    }

    #[test]
    fn test_rejects_zero_length_range() {
        assert!(TimeRange::new(t(9, 0), t(9, 0)).is_err());
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = TimeRange::new(t(9, 0), t(10, 0)).unwrap();
        let b = TimeRange::new(t(9, 30), t(10, 30)).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        let a = TimeRange::new(t(9, 0), t(10, 0)).unwrap();
        let b = TimeRange::new(t(10, 0), t(11, 0)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = TimeRange::new(t(8, 0), t(12, 0)).unwrap();
        let inner = TimeRange::new(t(9, 0), t(10, 0)).unwrap();
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_duration_minutes() {
        let range = TimeRange::new(t(10, 0), t(11, 30)).unwrap();
        assert_eq!(range.duration_minutes(), 90);
    }
}
