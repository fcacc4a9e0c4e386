//! Normalized secret records
//!
//! These are plain value objects: once returned they belong to the caller and
//! share no state with the client that produced them.

use crate::{SecureBytes, SecureSecret};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A key/value tag attached to a secret.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Tag key
    pub key: String,
    /// Tag value
    pub value: String,
}

impl Tag {
    /// Create a tag.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The payload of a secret as returned by `get`.
///
/// A string payload that parses as JSON is returned as [`SecretValue::Json`];
/// anything else comes back verbatim as [`SecretValue::Text`].
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SecretValue {
    /// Parsed structured payload
    Json(serde_json::Value),
    /// Raw payload that is not valid JSON
    Text(String),
}

impl SecretValue {
    /// Parse a raw string payload, falling back to the raw text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw).map_or_else(|_| Self::Text(raw.to_string()), Self::Json)
    }

    /// The structured payload, if it parsed.
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// The raw payload, if it did not parse.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(_) => f.write_str("Json([REDACTED])"),
            Self::Text(_) => f.write_str("Text([REDACTED])"),
        }
    }
}

/// A single secret with its payload and version metadata.
///
/// Either payload may be absent; a secret created with a string has no
/// binary payload and vice versa.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Secret {
    /// Resource identifier (ARN)
    pub id: Option<String>,
    /// Creation timestamp
    pub created: Option<DateTime<Utc>>,
    /// Secret name
    pub name: Option<String>,
    /// Binary payload
    pub binary: Option<SecureBytes>,
    /// String payload
    pub string: Option<SecureSecret>,
    /// Version identifier
    pub version: Option<String>,
    /// Staging labels attached to this version
    pub stages: Vec<String>,
}

impl Secret {
    /// The string payload, parsed as JSON when possible.
    ///
    /// Returns `None` when there is no string payload (binary-only secrets)
    /// or the payload is empty.
    #[must_use]
    pub fn value(&self) -> Option<SecretValue> {
        self.string
            .as_ref()
            .filter(|payload| !payload.is_empty())
            .map(|payload| SecretValue::parse(payload.expose()))
    }
}

/// One entry of a secrets listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretSummary {
    /// Resource identifier (ARN), `"N/A"` when the backend omits it
    pub id: String,
    /// Secret name
    pub name: Option<String>,
    /// Creation timestamp
    pub created: Option<DateTime<Utc>>,
    /// Scheduled deletion timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<DateTime<Utc>>,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Last access date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,
    /// Last change date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_changed: Option<DateTime<Utc>>,
    /// Version id -> staging labels
    #[serde(default)]
    pub versions: BTreeMap<String, Vec<String>>,
    /// Tags
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl SecretSummary {
    /// Identifier used when the backend does not report an ARN.
    pub const UNKNOWN_ID: &'static str = "N/A";

    /// Create a summary with only an id and name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
            created: None,
            deleted: None,
            description: None,
            last_accessed: None,
            last_changed: None,
            versions: BTreeMap::new(),
            tags: Vec::new(),
        }
    }
}

/// An ordered collection of summaries plus a continuation cursor.
///
/// A single page carries the cursor for the next one; a collection returned
/// by a full listing never has a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CollectionFields")]
pub struct SecretCollection {
    entries: Vec<SecretSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cursor: Option<String>,
    count: usize,
}

/// Deserialized form; `count` is always recomputed from `entries`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionFields {
    #[serde(default)]
    entries: Vec<SecretSummary>,
    #[serde(default)]
    cursor: Option<String>,
}

impl From<CollectionFields> for SecretCollection {
    fn from(fields: CollectionFields) -> Self {
        Self::page(fields.entries, fields.cursor)
    }
}

impl SecretCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A single page of results.
    #[must_use]
    pub fn page(entries: Vec<SecretSummary>, cursor: Option<String>) -> Self {
        let count = entries.len();
        Self {
            entries,
            cursor: cursor.filter(|token| !token.is_empty()),
            count,
        }
    }

    /// Append a page, taking over its cursor.
    ///
    /// Returns the cursor of the appended page.
    pub fn extend_page(&mut self, page: Self) -> Option<&str> {
        self.entries.extend(page.entries);
        self.count = self.entries.len();
        self.cursor = page.cursor;
        self.cursor.as_deref()
    }

    /// Continuation token, while more pages remain.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Number of entries.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow the entries.
    #[must_use]
    pub fn entries(&self) -> &[SecretSummary] {
        &self.entries
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, SecretSummary> {
        self.entries.iter()
    }

    /// Consume into the entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<SecretSummary> {
        self.entries
    }
}

impl IntoIterator for SecretCollection {
    type Item = SecretSummary;
    type IntoIter = std::vec::IntoIter<SecretSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a SecretCollection {
    type Item = &'a SecretSummary;
    type IntoIter = std::slice::Iter<'a, SecretSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
