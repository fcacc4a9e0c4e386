//! AWS SDK backend
//!
//! Forwards each [`Request`] to the matching `aws-sdk-secretsmanager`
//! operation and tags the output as a [`Response`].

use crate::client::Backend;
use crate::config::ClientConfig;
use crate::credential::Identity;
use crate::request::{Operation, Request, Response};
use async_trait::async_trait;
use aws_sdk_secretsmanager::config::http::HttpResponse;
use aws_sdk_secretsmanager::config::{AppName, BehaviorVersion, Region};
use aws_sdk_secretsmanager::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_secretsmanager::operation::cancel_rotate_secret::CancelRotateSecretInput;
use aws_sdk_secretsmanager::operation::create_secret::CreateSecretInput;
use aws_sdk_secretsmanager::operation::delete_secret::DeleteSecretInput;
use aws_sdk_secretsmanager::operation::describe_secret::DescribeSecretInput;
use aws_sdk_secretsmanager::operation::get_random_password::GetRandomPasswordInput;
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueInput;
use aws_sdk_secretsmanager::operation::list_secrets::ListSecretsInput;
use aws_sdk_secretsmanager::operation::rotate_secret::RotateSecretInput;
use aws_sdk_secretsmanager::operation::tag_resource::TagResourceInput;
use aws_sdk_secretsmanager::operation::untag_resource::UntagResourceInput;
use aws_sdk_secretsmanager::operation::update_secret::UpdateSecretInput;
use aws_smithy_http_client::tls;
use smclient_secrets::{SecretError, TransportError};

/// Backend that talks to Secrets Manager over HTTPS.
#[derive(Debug, Clone)]
pub struct SdkBackend {
    client: aws_sdk_secretsmanager::Client,
}

impl SdkBackend {
    /// Build an SDK client signed with `identity` for `region`.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::InvalidConfiguration`] if the application name
    /// is not a valid user agent token.
    pub fn new(
        identity: &Identity,
        region: &str,
        config: &ClientConfig,
    ) -> Result<Self, SecretError> {
        let app_name = AppName::new(config.app_name.clone()).map_err(|e| {
            SecretError::InvalidConfiguration {
                message: format!("invalid app name '{}': {e}", config.app_name),
            }
        })?;

        let http_client = aws_smithy_http_client::Builder::new()
            .tls_provider(tls::Provider::Rustls(
                tls::rustls_provider::CryptoMode::Ring,
            ))
            .build_https();

        let mut builder = aws_sdk_secretsmanager::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(identity.provider())
            .app_name(app_name)
            .http_client(http_client);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        Ok(Self::from_client(aws_sdk_secretsmanager::Client::from_conf(
            builder.build(),
        )))
    }

    /// Wrap an existing SDK client.
    #[must_use]
    pub const fn from_client(client: aws_sdk_secretsmanager::Client) -> Self {
        Self { client }
    }

    async fn create(&self, input: CreateSecretInput) -> Result<Response, TransportError> {
        self.client
            .create_secret()
            .set_name(input.name)
            .set_client_request_token(input.client_request_token)
            .set_description(input.description)
            .set_kms_key_id(input.kms_key_id)
            .set_secret_binary(input.secret_binary)
            .set_secret_string(input.secret_string)
            .set_tags(input.tags)
            .set_add_replica_regions(input.add_replica_regions)
            .set_force_overwrite_replica_secret(input.force_overwrite_replica_secret)
            .send()
            .await
            .map(Response::Create)
            .map_err(|e| transport(Operation::Create, &e))
    }

    async fn list(&self, input: ListSecretsInput) -> Result<Response, TransportError> {
        self.client
            .list_secrets()
            .set_include_planned_deletion(input.include_planned_deletion)
            .set_max_results(input.max_results)
            .set_next_token(input.next_token)
            .set_filters(input.filters)
            .set_sort_order(input.sort_order)
            .send()
            .await
            .map(Response::List)
            .map_err(|e| transport(Operation::List, &e))
    }

    async fn get(&self, input: GetSecretValueInput) -> Result<Response, TransportError> {
        self.client
            .get_secret_value()
            .set_secret_id(input.secret_id)
            .set_version_id(input.version_id)
            .set_version_stage(input.version_stage)
            .send()
            .await
            .map(Response::Get)
            .map_err(|e| transport(Operation::Get, &e))
    }

    async fn rotate(&self, input: RotateSecretInput) -> Result<Response, TransportError> {
        self.client
            .rotate_secret()
            .set_secret_id(input.secret_id)
            .set_client_request_token(input.client_request_token)
            .set_rotation_lambda_arn(input.rotation_lambda_arn)
            .set_rotation_rules(input.rotation_rules)
            .set_rotate_immediately(input.rotate_immediately)
            .send()
            .await
            .map(Response::Rotate)
            .map_err(|e| transport(Operation::Rotate, &e))
    }

    async fn cancel(&self, input: CancelRotateSecretInput) -> Result<Response, TransportError> {
        self.client
            .cancel_rotate_secret()
            .set_secret_id(input.secret_id)
            .send()
            .await
            .map(Response::Cancel)
            .map_err(|e| transport(Operation::Cancel, &e))
    }

    async fn delete(&self, input: DeleteSecretInput) -> Result<Response, TransportError> {
        self.client
            .delete_secret()
            .set_secret_id(input.secret_id)
            .set_recovery_window_in_days(input.recovery_window_in_days)
            .set_force_delete_without_recovery(input.force_delete_without_recovery)
            .send()
            .await
            .map(Response::Delete)
            .map_err(|e| transport(Operation::Delete, &e))
    }

    async fn describe(&self, input: DescribeSecretInput) -> Result<Response, TransportError> {
        self.client
            .describe_secret()
            .set_secret_id(input.secret_id)
            .send()
            .await
            .map(Response::Describe)
            .map_err(|e| transport(Operation::Describe, &e))
    }

    async fn tag(&self, input: TagResourceInput) -> Result<Response, TransportError> {
        self.client
            .tag_resource()
            .set_secret_id(input.secret_id)
            .set_tags(input.tags)
            .send()
            .await
            .map(Response::Tag)
            .map_err(|e| transport(Operation::Tag, &e))
    }

    async fn random(&self, input: GetRandomPasswordInput) -> Result<Response, TransportError> {
        self.client
            .get_random_password()
            .set_password_length(input.password_length)
            .set_exclude_characters(input.exclude_characters)
            .set_exclude_numbers(input.exclude_numbers)
            .set_exclude_punctuation(input.exclude_punctuation)
            .set_exclude_uppercase(input.exclude_uppercase)
            .set_exclude_lowercase(input.exclude_lowercase)
            .set_include_space(input.include_space)
            .set_require_each_included_type(input.require_each_included_type)
            .send()
            .await
            .map(Response::Random)
            .map_err(|e| transport(Operation::Random, &e))
    }

    async fn update(&self, input: UpdateSecretInput) -> Result<Response, TransportError> {
        self.client
            .update_secret()
            .set_secret_id(input.secret_id)
            .set_client_request_token(input.client_request_token)
            .set_description(input.description)
            .set_kms_key_id(input.kms_key_id)
            .set_secret_binary(input.secret_binary)
            .set_secret_string(input.secret_string)
            .send()
            .await
            .map(Response::Update)
            .map_err(|e| transport(Operation::Update, &e))
    }

    async fn untag(&self, input: UntagResourceInput) -> Result<Response, TransportError> {
        self.client
            .untag_resource()
            .set_secret_id(input.secret_id)
            .set_tag_keys(input.tag_keys)
            .send()
            .await
            .map(Response::Untag)
            .map_err(|e| transport(Operation::Untag, &e))
    }
}

#[async_trait]
impl Backend for SdkBackend {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        match request {
            Request::Create(input) => self.create(input).await,
            Request::List(input) => self.list(input).await,
            Request::Get(input) => self.get(input).await,
            Request::Rotate(input) => self.rotate(input).await,
            Request::Cancel(input) => self.cancel(input).await,
            Request::Delete(input) => self.delete(input).await,
            Request::Describe(input) => self.describe(input).await,
            Request::Tag(input) => self.tag(input).await,
            Request::Random(input) => self.random(input).await,
            Request::Update(input) => self.update(input).await,
            Request::Untag(input) => self.untag(input).await,
        }
    }
}

/// Flatten an SDK failure into a [`TransportError`], keeping the HTTP status
/// and service error code when a response was received.
fn transport<E>(operation: Operation, error: &SdkError<E, HttpResponse>) -> TransportError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let mut transport =
        TransportError::new(operation.name(), DisplayErrorContext(error).to_string());
    if let Some(response) = error.raw_response() {
        transport = transport.with_status(response.status().as_u16());
    }
    if let Some(code) = error.code() {
        transport = transport.with_code(code);
    }
    transport
}
