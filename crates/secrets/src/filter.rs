//! Search filters for listing secrets

use crate::SecretError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The attribute a search filter matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    /// Secret description
    Description,
    /// Secret name
    Name,
    /// Tag keys
    TagKey,
    /// Tag values
    TagValue,
    /// Primary region of replicated secrets
    PrimaryRegion,
    /// Every searchable attribute
    All,
}

impl FilterKind {
    /// All filter kinds, in wire order.
    pub const ALL: [Self; 6] = [
        Self::Description,
        Self::Name,
        Self::TagKey,
        Self::TagValue,
        Self::PrimaryRegion,
        Self::All,
    ];

    /// Wire name of the filter key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Name => "name",
            Self::TagKey => "tag-key",
            Self::TagValue => "tag-value",
            Self::PrimaryRegion => "primary-region",
            Self::All => "all",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = SecretError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SecretError::InvalidConfiguration {
                message: format!(
                    "unknown filter '{s}', expected one of: {}",
                    Self::ALL.map(Self::as_str).join(", ")
                ),
            })
    }
}

/// One or more values a filter is matched against.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterValues(Vec<String>);

impl FilterValues {
    /// Borrow the values.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consume into the owned values.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Whether no value was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop empty strings; `None` when nothing is left.
    #[must_use]
    pub fn non_empty(mut self) -> Option<Self> {
        self.0.retain(|value| !value.is_empty());
        (!self.0.is_empty()).then_some(self)
    }
}

impl From<&str> for FilterValues {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl From<String> for FilterValues {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<String>> for FilterValues {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<&[&str]> for FilterValues {
    fn from(values: &[&str]) -> Self {
        Self(values.iter().map(|v| (*v).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FilterValues {
    fn from(values: [&str; N]) -> Self {
        Self(values.iter().map(|v| (*v).to_string()).collect())
    }
}
