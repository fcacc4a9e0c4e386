//! Bounded request parameters

use crate::SecretError;
use serde::{Deserialize, Serialize};

/// Days Secrets Manager waits before purging a deleted secret.
///
/// Always within `7..=30`; out-of-range values are rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RecoveryWindow(i64);

impl RecoveryWindow {
    /// Shortest accepted window
    pub const MIN_DAYS: i64 = 7;
    /// Longest accepted window
    pub const MAX_DAYS: i64 = 30;

    /// Validate a number of days.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::RecoveryWindow`] outside `7..=30`.
    pub fn new(days: i64) -> Result<Self, SecretError> {
        if days < Self::MIN_DAYS || days > Self::MAX_DAYS {
            return Err(SecretError::RecoveryWindow { days });
        }
        Ok(Self(days))
    }

    /// Number of days.
    #[must_use]
    pub const fn days(self) -> i64 {
        self.0
    }
}

impl Default for RecoveryWindow {
    fn default() -> Self {
        Self(Self::MIN_DAYS)
    }
}

impl TryFrom<i64> for RecoveryWindow {
    type Error = SecretError;

    fn try_from(days: i64) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<RecoveryWindow> for i64 {
    fn from(window: RecoveryWindow) -> Self {
        window.0
    }
}

/// Number of entries requested per list page.
///
/// ListSecrets accepts at most 100 results per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct PageSize(i32);

impl PageSize {
    /// Largest page the backend serves
    pub const MAX: i32 = 100;

    /// Validate a page size.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::InvalidConfiguration`] outside `1..=100`.
    pub fn new(size: i32) -> Result<Self, SecretError> {
        if !(1..=Self::MAX).contains(&size) {
            return Err(SecretError::InvalidConfiguration {
                message: format!("page size {size} must be between 1 and {}", Self::MAX),
            });
        }
        Ok(Self(size))
    }

    /// The size as sent in `MaxResults`.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<i32> for PageSize {
    type Error = SecretError;

    fn try_from(size: i32) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<PageSize> for i32 {
    fn from(size: PageSize) -> Self {
        size.0
    }
}
