// Copyright (C) 2025  Tom Waddington
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Core types for the key-press scheduler

use atomic_enum::atomic_enum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("intervals must be positive")]
    NonPositiveInterval,
    #[error("min interval ({min}s) cannot be greater than max interval ({max}s)")]
    InvertedInterval { min: u64, max: u64 },
    #[error("at most {max} keys are supported, got {got}")]
    TooManyKeys { max: usize, got: usize },
    #[error("unrecognized key name: {0}")]
    UnknownKey(String),
}

/// One configured key: what to press and whether to press it twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConfig {
    pub key: String,
    #[serde(default)]
    pub press_twice: bool,
}

impl KeyConfig {
    pub fn new(key: impl Into<String>, press_twice: bool) -> Self {
        Self {
            key: key.into(),
            press_twice,
        }
    }
}

/// Inclusive bounds, in seconds, for the random wait between press actions.
///
/// Only constructible through the validating constructors, so a held value
/// always satisfies `0 < min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalBounds {
    min_secs: u64,
    max_secs: u64,
}

impl IntervalBounds {
    pub fn new(min_secs: u64, max_secs: u64) -> Result<Self, ConfigError> {
        if min_secs == 0 || max_secs == 0 {
            return Err(ConfigError::NonPositiveInterval);
        }
        if min_secs > max_secs {
            return Err(ConfigError::InvertedInterval {
                min: min_secs,
                max: max_secs,
            });
        }
        Ok(Self { min_secs, max_secs })
    }

    pub fn from_minutes(min_minutes: u64, max_minutes: u64) -> Result<Self, ConfigError> {
        Self::new(min_minutes * 60, max_minutes * 60)
    }

    pub fn min_secs(&self) -> u64 {
        self.min_secs
    }

    pub fn max_secs(&self) -> u64 {
        self.max_secs
    }
}

/// Scheduler lifecycle state, shared between the caller and the worker task.
#[atomic_enum]
#[derive(PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Running,
    Stopping,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_bounds_valid() {
        let bounds = IntervalBounds::new(60, 120).unwrap();
        assert_eq!(bounds.min_secs(), 60);
        assert_eq!(bounds.max_secs(), 120);
    }

    #[test]
    fn test_interval_bounds_rejects_zero() {
        assert_eq!(
            IntervalBounds::new(0, 120),
            Err(ConfigError::NonPositiveInterval)
        );
        assert_eq!(
            IntervalBounds::new(60, 0),
            Err(ConfigError::NonPositiveInterval)
        );
    }

    #[test]
    fn test_interval_bounds_rejects_inverted() {
        assert_eq!(
            IntervalBounds::new(120, 60),
            Err(ConfigError::InvertedInterval { min: 120, max: 60 })
        );
    }

    #[test]
    fn test_interval_bounds_degenerate_range_is_valid() {
        let bounds = IntervalBounds::new(1, 1).unwrap();
        assert_eq!(bounds.min_secs(), bounds.max_secs());
    }

    #[test]
    fn test_from_minutes_converts_to_seconds() {
        let bounds = IntervalBounds::from_minutes(10, 14).unwrap();
        assert_eq!(bounds.min_secs(), 600);
        assert_eq!(bounds.max_secs(), 840);
    }
}
