//! Secret records and addressing for smclient
//!
//! Shared value types used by the backend crates:
//!
//! - [`Secret`], [`SecretSummary`] and [`SecretCollection`]: normalized
//!   records produced from Secrets Manager responses
//! - [`AddressParameter`] and [`SecretAddress`]: the
//!   `Organization/Environment/Application/Service/Identifier` naming scheme
//! - [`FilterKind`] and [`FilterValues`]: search filters
//! - [`RecoveryWindow`] and [`PageSize`]: bounded request parameters
//! - [`SecretError`]: the error taxonomy every operation reports through
//!
//! Secret payloads are held in redacting wrappers ([`SecureSecret`],
//! [`SecureBytes`]) so `Debug` output never carries secret material.

mod address;
mod filter;
mod limits;
mod record;
mod types;

pub use address::{AddressParameter, SecretAddress};
pub use filter::{FilterKind, FilterValues};
pub use limits::{PageSize, RecoveryWindow};
pub use record::{Secret, SecretCollection, SecretSummary, SecretValue, Tag};
pub use types::{SecureBytes, SecureSecret};

use thiserror::Error;

/// Error types for secret operations
#[derive(Debug, Error)]
pub enum SecretError {
    /// No usable credential source was found
    #[error("Failed to resolve credentials for profile '{profile}': {message}")]
    CredentialResolution {
        /// Profile that was being resolved
        profile: String,
        /// Error message from the provider chain
        message: String,
    },

    /// The backend rejected a lookup with a bad-request status
    #[error("Secret '{secret_id}' not found")]
    NotFound {
        /// Identifier that was looked up
        secret_id: String,
    },

    /// Recovery window outside the accepted range
    #[error("Recovery window of {days} days is out of range (7-30 days)")]
    RecoveryWindow {
        /// Requested number of days
        days: i64,
    },

    /// Address string could not be decomposed into its segments
    #[error("Invalid secret address '{address}': {message}")]
    InvalidAddress {
        /// The rejected address
        address: String,
        /// Why it was rejected
        message: String,
    },

    /// A request value could not be built
    #[error("Invalid {operation} request: {message}")]
    InvalidRequest {
        /// Operation name
        operation: &'static str,
        /// Builder error message
        message: String,
    },

    /// Configuration value out of bounds or unparseable
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// What was wrong
        message: String,
    },

    /// A continuation token came back after it was already consumed
    #[error("Pagination token '{token}' was returned twice")]
    Pagination {
        /// The repeated token
        token: String,
    },

    /// The backend answered a request with the wrong response kind
    #[error("Expected a {expected} response, got {actual}")]
    UnexpectedResponse {
        /// Operation of the request
        expected: &'static str,
        /// Operation of the response
        actual: &'static str,
    },

    /// Any other backend failure, propagated unmodified
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A failure reported by the backend transport.
///
/// Carries only non-secret metadata: the operation, the HTTP status when a
/// response was received, and the service error code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub struct TransportError {
    /// Operation name
    pub operation: &'static str,
    /// HTTP status of the response, if one arrived
    pub status: Option<u16>,
    /// Service error code (e.g. `ResourceNotFoundException`)
    pub code: Option<String>,
    /// Human readable message
    pub message: String,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} request failed", self.operation)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {status})")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl TransportError {
    /// Create a transport error without response metadata.
    #[must_use]
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            status: None,
            code: None,
            message: message.into(),
        }
    }

    /// Attach the HTTP status of the failed response.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach the service error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Whether the backend answered with HTTP 400.
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        self.status == Some(400)
    }
}
