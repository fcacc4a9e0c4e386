//! User-facing secret operations
//!
//! [`Service`] composes [`Client`] calls into `list`, `search`, `get`,
//! `create` and `delete`. Every call resolves credentials and binds a fresh
//! client; nothing is cached between calls.

use crate::client::{Backend, Client};
use crate::config::ServiceConfig;
use crate::credential::CredentialResolver;
use crate::normalize;
use crate::request;
use smclient_secrets::{
    FilterKind, FilterValues, RecoveryWindow, Secret, SecretAddress, SecretCollection,
    SecretError, SecretValue,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Recovery window applied when the caller has no preference
pub const DEFAULT_RECOVERY_DAYS: i64 = RecoveryWindow::MIN_DAYS;

/// Secrets Manager operations over one configuration.
#[derive(Clone)]
pub struct Service {
    config: ServiceConfig,
    backend: Option<Arc<dyn Backend>>,
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("config", &self.config)
            .field("custom_backend", &self.backend.is_some())
            .finish()
    }
}

impl Service {
    /// Service backed by AWS Secrets Manager.
    #[must_use]
    pub const fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            backend: None,
        }
    }

    /// Service backed by a custom [`Backend`].
    ///
    /// Credentials are still resolved from the configuration on every call.
    #[must_use]
    pub fn with_backend(config: ServiceConfig, backend: Arc<dyn Backend>) -> Self {
        Self {
            config,
            backend: Some(backend),
        }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ServiceConfig {
        &self.config
    }

    async fn connect(&self) -> Result<Client, SecretError> {
        match &self.backend {
            Some(backend) => {
                let identity = CredentialResolver::resolve(&self.config.client.credentials).await?;
                Ok(Client::with_backend(identity, Arc::clone(backend)))
            }
            None => Client::initialize(&self.config.client).await,
        }
    }

    /// List every secret, following continuation tokens until exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials cannot be resolved, a page request
    /// fails, or the backend repeats a continuation token.
    pub async fn list(&self) -> Result<SecretCollection, SecretError> {
        self.paginate(None).await
    }

    /// List secrets matching a filter.
    ///
    /// Empty strings are dropped from `values`; with nothing left (or no
    /// values at all) this is the same as [`list`](Self::list).
    ///
    /// # Errors
    ///
    /// Same as [`list`](Self::list).
    pub async fn search(
        &self,
        kind: FilterKind,
        values: Option<FilterValues>,
    ) -> Result<SecretCollection, SecretError> {
        let values = values.and_then(FilterValues::non_empty);
        self.paginate(values.as_ref().map(|values| (kind, values)))
            .await
    }

    async fn paginate(
        &self,
        filter: Option<(FilterKind, &FilterValues)>,
    ) -> Result<SecretCollection, SecretError> {
        let client = self.connect().await?;
        let mut collection = SecretCollection::new();
        let mut consumed: HashSet<String> = HashSet::new();
        let mut cursor: Option<String> = None;
        let mut page_number = 0_usize;

        loop {
            page_number += 1;
            let request = request::list(self.config.page_size, cursor.as_deref(), filter)?;
            let output = client.send(request).await?.into_list()?;
            let page = normalize::page_from_list(&output);

            tracing::debug!(
                page = page_number,
                entries = page.count(),
                filter = ?filter.map(|(kind, _)| kind),
                "Fetched secret page"
            );

            cursor = collection.extend_page(page).map(ToString::to_string);
            match &cursor {
                Some(token) if !consumed.insert(token.clone()) => {
                    tracing::warn!(page = page_number, "Backend repeated a continuation token");
                    return Err(SecretError::Pagination {
                        token: token.clone(),
                    });
                }
                Some(_) => {}
                None => break,
            }
        }

        tracing::debug!(
            pages = page_number,
            total = collection.count(),
            "Listed secrets"
        );
        Ok(collection)
    }

    /// Fetch the full record for one secret.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::NotFound`] if the backend answers with HTTP 400;
    /// other failures propagate unchanged.
    pub async fn fetch(&self, address: impl Into<SecretAddress>) -> Result<Secret, SecretError> {
        let secret_id = address.into().secret_id();
        let request = request::get(&secret_id)?;
        let client = self.connect().await?;

        let response = client.send(request).await.map_err(|e| match e {
            SecretError::Transport(transport) if transport.is_bad_request() => {
                tracing::debug!(secret_id = %secret_id, code = ?transport.code, "Secret not found");
                SecretError::NotFound {
                    secret_id: secret_id.clone(),
                }
            }
            other => other,
        })?;

        Ok(normalize::secret_from_get(&response.into_get()?))
    }

    /// Fetch a secret's string payload.
    ///
    /// JSON payloads are returned parsed; anything else is returned as the
    /// raw text. Binary-only (or empty) secrets yield `None`.
    ///
    /// # Errors
    ///
    /// Same as [`fetch`](Self::fetch).
    pub async fn get(
        &self,
        address: impl Into<SecretAddress>,
    ) -> Result<Option<SecretValue>, SecretError> {
        Ok(self.fetch(address).await?.value())
    }

    /// Create a secret named after its address, tagged with each segment.
    ///
    /// `overwrite` allows replacing a replica secret of the same name in
    /// another region.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::InvalidAddress`] for a malformed address, or any
    /// transport failure.
    pub async fn create(
        &self,
        address: impl Into<SecretAddress>,
        description: &str,
        secret_value: &str,
        overwrite: bool,
    ) -> Result<Secret, SecretError> {
        let parameter = address.into().into_parameter()?;
        let name = parameter.render();
        let request = request::create(
            &name,
            description,
            secret_value,
            &parameter.tags(),
            overwrite,
        )?;

        let client = self.connect().await?;
        let output = client.send(request).await?.into_create()?;
        tracing::debug!(name = %name, "Created secret");
        Ok(normalize::secret_from_create(&output))
    }

    /// Schedule a secret for deletion after `recovery_days`.
    ///
    /// The window is validated before anything is sent.
    ///
    /// ```no_run
    /// # async fn run(service: &smclient_aws::Service) -> Result<(), smclient_secrets::SecretError> {
    /// use smclient_aws::DEFAULT_RECOVERY_DAYS;
    ///
    /// service.delete("Org/Dev/App/Svc/123", DEFAULT_RECOVERY_DAYS).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::RecoveryWindow`] if `recovery_days` is outside
    /// `7..=30`, or any transport failure.
    pub async fn delete(
        &self,
        address: impl Into<SecretAddress>,
        recovery_days: i64,
    ) -> Result<bool, SecretError> {
        let window = RecoveryWindow::new(recovery_days)?;
        let secret_id = address.into().secret_id();
        let request = request::delete(&secret_id, window)?;

        let client = self.connect().await?;
        client.send(request).await?.into_delete()?;
        tracing::debug!(
            secret_id = %secret_id,
            recovery_days = window.days(),
            "Scheduled secret deletion"
        );
        Ok(true)
    }
}
