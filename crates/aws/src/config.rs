//! Client and service configuration

use crate::credential::CredentialConfig;
use serde::{Deserialize, Serialize};
use smclient_secrets::{PageSize, SecretError};

/// Environment variable overriding the list page size
pub const PAGE_SIZE_ENV: &str = "SMCLIENT_PAGE_SIZE";

/// Environment variable overriding the service endpoint
pub const ENDPOINT_URL_ENV: &str = "AWS_ENDPOINT_URL";

/// Default user agent application name
pub const DEFAULT_APP_NAME: &str = "smclient";

/// Settings for binding a [`Client`](crate::Client) to the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Identity source
    #[serde(default)]
    pub credentials: CredentialConfig,

    /// Custom endpoint (e.g. a local emulator)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,

    /// Application name appended to the user agent
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: CredentialConfig::default(),
            endpoint_url: None,
            app_name: default_app_name(),
        }
    }
}

impl ClientConfig {
    /// Config for a named profile.
    #[must_use]
    pub fn with_profile(profile: impl Into<String>) -> Self {
        Self {
            credentials: CredentialConfig::with_profile(profile),
            ..Self::default()
        }
    }

    /// Read credentials and the endpoint override from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            credentials: CredentialConfig::from_env(),
            endpoint_url: std::env::var(ENDPOINT_URL_ENV)
                .ok()
                .filter(|url| !url.is_empty()),
            app_name: default_app_name(),
        }
    }
}

/// Settings for a [`Service`](crate::Service).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Backend binding
    #[serde(default)]
    pub client: ClientConfig,

    /// Entries requested per list page
    #[serde(default)]
    pub page_size: PageSize,
}

impl ServiceConfig {
    /// Config for a named profile with default paging.
    #[must_use]
    pub fn with_profile(profile: impl Into<String>) -> Self {
        Self {
            client: ClientConfig::with_profile(profile),
            page_size: PageSize::default(),
        }
    }

    /// Read the whole configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::InvalidConfiguration`] if `SMCLIENT_PAGE_SIZE`
    /// is not an integer in `1..=100`.
    pub fn from_env() -> Result<Self, SecretError> {
        let page_size = match std::env::var(PAGE_SIZE_ENV) {
            Ok(raw) if !raw.trim().is_empty() => {
                let size = raw.trim().parse::<i32>().map_err(|e| {
                    SecretError::InvalidConfiguration {
                        message: format!("{PAGE_SIZE_ENV}='{raw}' is not an integer: {e}"),
                    }
                })?;
                PageSize::new(size)?
            }
            _ => PageSize::default(),
        };

        Ok(Self {
            client: ClientConfig::from_env(),
            page_size,
        })
    }
}
