//! Backend binding
//!
//! A [`Client`] pairs a resolved [`Identity`] with a [`Backend`] that
//! executes [`Request`] values. The production backend is
//! [`SdkBackend`]; tests substitute their own.

use crate::config::ClientConfig;
use crate::credential::{CredentialResolver, Identity};
use crate::request::{Operation, Request, Response};
use crate::sdk::SdkBackend;
use async_trait::async_trait;
use smclient_secrets::{SecretError, TransportError};
use std::sync::Arc;

/// Region used when neither configuration nor profile names one
pub const FALLBACK_REGION: &str = "us-east-2";

/// Secrets Manager API version the request shapes follow
pub const API_VERSION: &str = "2017-10-17";

/// Executes requests against a Secrets Manager endpoint.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Send one request and return the matching response.
    async fn send(&self, request: Request) -> Result<Response, TransportError>;
}

/// A backend bound to one identity and region.
#[derive(Clone)]
pub struct Client {
    identity: Identity,
    region: String,
    backend: Arc<dyn Backend>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("identity", &self.identity)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Resolve an identity and bind the SDK backend to it.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::CredentialResolution`] if no identity can be
    /// resolved, or [`SecretError::InvalidConfiguration`] if the SDK client
    /// cannot be configured.
    pub async fn initialize(config: &ClientConfig) -> Result<Self, SecretError> {
        let identity = CredentialResolver::resolve(&config.credentials).await?;
        let region = region_for(&identity);
        let backend = SdkBackend::new(&identity, &region, config)?;

        tracing::debug!(
            profile = %identity.profile(),
            region = %region,
            "Initialized Secrets Manager client"
        );

        Ok(Self {
            identity,
            region,
            backend: Arc::new(backend),
        })
    }

    /// Bind an already resolved identity to a custom backend.
    #[must_use]
    pub fn with_backend(identity: Identity, backend: Arc<dyn Backend>) -> Self {
        let region = region_for(&identity);
        Self {
            identity,
            region,
            backend,
        }
    }

    /// Names of the operations this client can send.
    #[must_use]
    pub fn methods() -> &'static [&'static str] {
        const METHODS: [&str; 11] = [
            Operation::Create.name(),
            Operation::List.name(),
            Operation::Get.name(),
            Operation::Rotate.name(),
            Operation::Cancel.name(),
            Operation::Delete.name(),
            Operation::Describe.name(),
            Operation::Tag.name(),
            Operation::Random.name(),
            Operation::Update.name(),
            Operation::Untag.name(),
        ];
        &METHODS
    }

    /// Identity every request is signed with.
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Region requests are sent to.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Execute a request.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::Transport`] if the backend fails, or
    /// [`SecretError::UnexpectedResponse`] if it answers with the wrong shape.
    pub async fn send(&self, request: Request) -> Result<Response, SecretError> {
        let operation = request.operation();
        tracing::debug!(operation = %operation, region = %self.region, "Sending request");

        let response = self.backend.send(request).await.inspect_err(|e| {
            tracing::debug!(operation = %operation, error = %e, "Request failed");
        })?;

        if response.operation() != operation {
            return Err(SecretError::UnexpectedResponse {
                expected: operation.name(),
                actual: response.operation().name(),
            });
        }
        Ok(response)
    }
}

fn region_for(identity: &Identity) -> String {
    identity.region().unwrap_or(FALLBACK_REGION).to_string()
}
