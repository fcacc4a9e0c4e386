//! AWS Secrets Manager client for smclient
//!
//! Three layers, leaf first:
//!
//! - [`credential`]: resolves a [`CredentialConfig`] into an [`Identity`]
//!   using static keys or the SDK's default provider chain
//! - [`client`]: binds an identity to a [`Backend`] and sends tagged
//!   [`Request`] values built by the functions in [`request`]
//! - [`service`]: `list`, `search`, `get`, `create` and `delete`, including
//!   cursor pagination and normalization into [`smclient_secrets`] records
//!
//! ```no_run
//! # async fn run() -> Result<(), smclient_secrets::SecretError> {
//! use smclient_aws::{Service, ServiceConfig};
//!
//! let service = Service::new(ServiceConfig::from_env()?);
//! let value = service.get("Org/Dev/App/Svc/123").await?;
//! # let _ = value;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod credential;
pub mod normalize;
pub mod request;
pub mod sdk;
pub mod service;

pub use client::{API_VERSION, Backend, Client, FALLBACK_REGION};
pub use config::{ClientConfig, ServiceConfig};
pub use credential::{CredentialConfig, CredentialResolver, CredentialSource, Identity};
pub use request::{Operation, Request, Response};
pub use sdk::SdkBackend;
pub use service::{DEFAULT_RECOVERY_DAYS, Service};
