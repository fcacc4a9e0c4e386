//! Credential resolution
//!
//! Turns a [`CredentialConfig`] into an [`Identity`]: explicit keys win,
//! otherwise the AWS SDK's default provider chain is consulted for the
//! configured profile. Shared files follow the usual INI conventions; in the
//! config file non-default profiles live under `[profile <name>]` headers.

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_runtime::env_config::file::{EnvConfigFileKind, EnvConfigFiles};
use serde::{Deserialize, Serialize};
use smclient_secrets::{SecretError, SecureSecret};
use std::path::PathBuf;

/// Profile used when none is configured
pub const DEFAULT_PROFILE: &str = "default";

const STATIC_PROVIDER_NAME: &str = "smclient-static";

/// Where an identity should come from.
///
/// This struct is the only input to [`CredentialResolver::resolve`].
/// Within this crate the process environment is read by the `from_env`
/// constructors: [`CredentialConfig::from_env`] for the AWS credential and
/// region variables, and [`ServiceConfig::from_env`](crate::ServiceConfig::from_env)
/// for the endpoint and page size overrides. The SDK provider chain used when
/// no static keys are set follows its own lookup rules.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialConfig {
    /// Named profile in the shared config files
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Static access key id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,

    /// Static secret access key
    #[serde(default, skip_serializing)]
    pub secret_access_key: Option<String>,

    /// Session token for temporary static credentials
    #[serde(default, skip_serializing)]
    pub session_token: Option<String>,

    /// Region override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Shared credentials file (defaults to `~/.aws/credentials`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<PathBuf>,

    /// Shared config file (defaults to `~/.aws/config`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            region: None,
            credentials_file: None,
            config_file: None,
        }
    }
}

impl std::fmt::Debug for CredentialConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialConfig")
            .field("profile", &self.profile)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("region", &self.region)
            .field("credentials_file", &self.credentials_file)
            .field("config_file", &self.config_file)
            .finish()
    }
}

impl CredentialConfig {
    /// Config for a named profile with nothing else set.
    #[must_use]
    pub fn with_profile(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            ..Self::default()
        }
    }

    /// Read the standard AWS environment variables.
    ///
    /// `AWS_REGION` wins over `AWS_DEFAULT_REGION`; empty values count as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|value| !value.is_empty());

        Self {
            profile: var("AWS_PROFILE").unwrap_or_else(default_profile),
            access_key_id: var("AWS_ACCESS_KEY_ID"),
            secret_access_key: var("AWS_SECRET_ACCESS_KEY"),
            session_token: var("AWS_SESSION_TOKEN"),
            region: var("AWS_REGION").or_else(|| var("AWS_DEFAULT_REGION")),
            credentials_file: var("AWS_SHARED_CREDENTIALS_FILE").map(PathBuf::from),
            config_file: var("AWS_CONFIG_FILE").map(PathBuf::from),
        }
    }

    /// Use explicit keys instead of the provider chain.
    #[must_use]
    pub fn with_static_keys(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Override the region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Point at explicit shared credentials/config files.
    #[must_use]
    pub fn with_profile_files(
        mut self,
        credentials_file: impl Into<PathBuf>,
        config_file: impl Into<PathBuf>,
    ) -> Self {
        self.credentials_file = Some(credentials_file.into());
        self.config_file = Some(config_file.into());
        self
    }

    fn profile_files(&self) -> Option<EnvConfigFiles> {
        if self.credentials_file.is_none() && self.config_file.is_none() {
            return None;
        }

        let mut builder = EnvConfigFiles::builder();
        builder = match &self.credentials_file {
            Some(path) => builder.with_file(EnvConfigFileKind::Credentials, path),
            None => builder.include_default_credentials_file(true),
        };
        builder = match &self.config_file {
            Some(path) => builder.with_file(EnvConfigFileKind::Config, path),
            None => builder.include_default_config_file(true),
        };
        Some(builder.build())
    }
}

/// Which branch of resolution produced an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Keys supplied in [`CredentialConfig`]
    Static,
    /// The SDK's default provider chain
    ProviderChain,
}

/// A resolved identity, reused for every call made by one client.
#[derive(Clone)]
pub struct Identity {
    profile: String,
    access_key_id: String,
    secret_access_key: SecureSecret,
    session_token: Option<SecureSecret>,
    region: Option<String>,
    source: CredentialSource,
    provider: SharedCredentialsProvider,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("profile", &self.profile)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key)
            .field("session_token", &self.session_token)
            .field("region", &self.region)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl Identity {
    fn from_credentials(
        profile: &str,
        credentials: &Credentials,
        region: Option<String>,
        source: CredentialSource,
        provider: SharedCredentialsProvider,
    ) -> Self {
        Self {
            profile: profile.to_string(),
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: SecureSecret::from(credentials.secret_access_key()),
            session_token: credentials.session_token().map(SecureSecret::from),
            region,
            source,
            provider,
        }
    }

    /// Profile name the identity was resolved for.
    #[must_use]
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Resolved access key id.
    #[must_use]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Resolved secret access key.
    #[must_use]
    pub const fn secret_access_key(&self) -> &SecureSecret {
        &self.secret_access_key
    }

    /// Session token, for temporary credentials.
    #[must_use]
    pub const fn session_token(&self) -> Option<&SecureSecret> {
        self.session_token.as_ref()
    }

    /// Region from configuration or the profile, if any.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// How the identity was obtained.
    #[must_use]
    pub const fn source(&self) -> CredentialSource {
        self.source
    }

    /// Credential provider handed to the SDK client.
    #[must_use]
    pub fn provider(&self) -> SharedCredentialsProvider {
        self.provider.clone()
    }
}

/// Resolves a [`CredentialConfig`] into an [`Identity`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialResolver;

impl CredentialResolver {
    /// Resolve an identity.
    ///
    /// Static keys in the config take precedence. Otherwise the default
    /// provider chain is built for the configured profile and queried once.
    /// Failures are not retried.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::CredentialResolution`] if static keys are
    /// incomplete or the provider chain yields no credentials.
    pub async fn resolve(config: &CredentialConfig) -> Result<Identity, SecretError> {
        match (&config.access_key_id, &config.secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => {
                Ok(Self::resolve_static(config, access_key_id, secret_access_key))
            }
            (None, None) => Self::resolve_chain(config).await,
            (Some(_), None) => Err(SecretError::CredentialResolution {
                profile: config.profile.clone(),
                message: "access key id is set but the secret access key is missing".to_string(),
            }),
            (None, Some(_)) => Err(SecretError::CredentialResolution {
                profile: config.profile.clone(),
                message: "secret access key is set but the access key id is missing".to_string(),
            }),
        }
    }

    fn resolve_static(
        config: &CredentialConfig,
        access_key_id: &str,
        secret_access_key: &str,
    ) -> Identity {
        let credentials = Credentials::new(
            access_key_id,
            secret_access_key,
            config.session_token.clone(),
            None,
            STATIC_PROVIDER_NAME,
        );

        tracing::debug!(
            profile = %config.profile,
            source = "static",
            "Resolved AWS identity"
        );

        let provider = SharedCredentialsProvider::new(credentials.clone());
        Identity::from_credentials(
            &config.profile,
            &credentials,
            config.region.clone(),
            CredentialSource::Static,
            provider,
        )
    }

    async fn resolve_chain(config: &CredentialConfig) -> Result<Identity, SecretError> {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).profile_name(&config.profile);
        if let Some(files) = config.profile_files() {
            loader = loader.profile_files(files);
        }
        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }

        let sdk_config = loader.load().await;

        let provider =
            sdk_config
                .credentials_provider()
                .ok_or_else(|| SecretError::CredentialResolution {
                    profile: config.profile.clone(),
                    message: "no credential provider is configured".to_string(),
                })?;

        let credentials = provider.provide_credentials().await.map_err(|e| {
            SecretError::CredentialResolution {
                profile: config.profile.clone(),
                message: error_chain(&e),
            }
        })?;

        let region = sdk_config.region().map(ToString::to_string);

        tracing::debug!(
            profile = %config.profile,
            source = "provider-chain",
            region = ?region,
            "Resolved AWS identity"
        );

        Ok(Identity::from_credentials(
            &config.profile,
            &credentials,
            region,
            CredentialSource::ProviderChain,
            provider,
        ))
    }
}

/// Render an error together with its sources.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
