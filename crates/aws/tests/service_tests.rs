//! Service behaviour against an in-memory Secrets Manager

#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use aws_sdk_secretsmanager::operation::create_secret::CreateSecretOutput;
use aws_sdk_secretsmanager::operation::delete_secret::DeleteSecretOutput;
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueOutput;
use aws_sdk_secretsmanager::operation::list_secrets::{ListSecretsInput, ListSecretsOutput};
use aws_sdk_secretsmanager::primitives::Blob;
use aws_sdk_secretsmanager::types::{Filter, FilterNameStringType, SecretListEntry};
use smclient_aws::{
    Backend, Client, CredentialConfig, CredentialResolver, DEFAULT_RECOVERY_DAYS, Operation,
    Request, Response, Service, ServiceConfig, request,
};
use smclient_secrets::{
    AddressParameter, FilterKind, FilterValues, PageSize, SecretError, SecretValue,
    TransportError,
};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Stored {
    arn: String,
    description: Option<String>,
    string: Option<String>,
    binary: Option<Vec<u8>>,
    tags: Vec<(String, String)>,
}

/// Keeps secrets in a map keyed by name and pages `ListSecrets` by offset.
#[derive(Default)]
struct MemoryBackend {
    secrets: Mutex<BTreeMap<String, Stored>>,
    calls: Mutex<Vec<Operation>>,
    list_inputs: Mutex<Vec<ListSecretsInput>>,
    fail_status: Mutex<Option<u16>>,
}

impl MemoryBackend {
    fn arn(name: &str) -> String {
        format!("arn:aws:secretsmanager:us-east-2:123456789012:secret:{name}")
    }

    fn insert(&self, name: &str, string: Option<&str>, binary: Option<&[u8]>) {
        self.secrets.lock().unwrap().insert(
            name.to_string(),
            Stored {
                arn: Self::arn(name),
                description: None,
                string: string.map(ToString::to_string),
                binary: binary.map(<[u8]>::to_vec),
                tags: Vec::new(),
            },
        );
    }

    fn calls(&self) -> Vec<Operation> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, operation: Operation) -> usize {
        self.calls().iter().filter(|op| **op == operation).count()
    }

    fn fail_with(&self, status: u16) {
        *self.fail_status.lock().unwrap() = Some(status);
    }

    fn not_found(operation: Operation) -> TransportError {
        TransportError::new(
            operation.name(),
            "Secrets Manager can't find the specified secret.",
        )
        .with_status(400)
        .with_code("ResourceNotFoundException")
    }

    fn lookup(&self, id: &str) -> Option<(String, Stored)> {
        self.secrets
            .lock()
            .unwrap()
            .iter()
            .find(|(name, stored)| name.as_str() == id || stored.arn == id)
            .map(|(name, stored)| (name.clone(), stored.clone()))
    }

    fn matches(filter: &Filter, name: &str, stored: &Stored) -> bool {
        let values = filter.values();
        let tag_keys = || stored.tags.iter().map(|(k, _)| k.as_str());
        let tag_values = || stored.tags.iter().map(|(_, v)| v.as_str());
        let description = stored.description.as_deref().unwrap_or_default();

        values.iter().any(|value| match filter.key() {
            Some(FilterNameStringType::Name) => name.starts_with(value.as_str()),
            Some(FilterNameStringType::Description) => description.contains(value.as_str()),
            Some(FilterNameStringType::TagKey) => tag_keys().any(|k| k == value.as_str()),
            Some(FilterNameStringType::TagValue) => tag_values().any(|v| v == value.as_str()),
            Some(FilterNameStringType::All) => {
                name.contains(value.as_str())
                    || description.contains(value.as_str())
                    || tag_keys().chain(tag_values()).any(|t| t == value.as_str())
            }
            _ => false,
        })
    }

    fn list(&self, input: ListSecretsInput) -> ListSecretsOutput {
        let secrets = self.secrets.lock().unwrap();
        let matching: Vec<(&String, &Stored)> = secrets
            .iter()
            .filter(|(name, stored)| {
                input
                    .filters()
                    .iter()
                    .all(|filter| Self::matches(filter, name, stored))
            })
            .collect();

        let offset: usize = input
            .next_token()
            .map(|token| token.trim_start_matches("offset-").parse().unwrap())
            .unwrap_or(0);
        let page_size = usize::try_from(input.max_results().unwrap_or(100)).unwrap();
        let end = (offset + page_size).min(matching.len());

        let entries: Vec<SecretListEntry> = matching[offset..end]
            .iter()
            .map(|(name, stored)| {
                let tags = stored.tags.iter().map(|(key, value)| {
                    aws_sdk_secretsmanager::types::Tag::builder()
                        .key(key)
                        .value(value)
                        .build()
                });
                SecretListEntry::builder()
                    .arn(&stored.arn)
                    .name(name.as_str())
                    .set_description(stored.description.clone())
                    .set_tags(Some(tags.collect()))
                    .secret_versions_to_stages("v1", vec!["AWSCURRENT".to_string()])
                    .build()
            })
            .collect();

        let next_token = (end < matching.len()).then(|| format!("offset-{end}"));
        self.list_inputs.lock().unwrap().push(input);

        ListSecretsOutput::builder()
            .set_secret_list(Some(entries))
            .set_next_token(next_token)
            .build()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let operation = request.operation();
        self.calls.lock().unwrap().push(operation);

        if let Some(status) = *self.fail_status.lock().unwrap() {
            return Err(
                TransportError::new(operation.name(), "service unavailable").with_status(status)
            );
        }

        match request {
            Request::Create(input) => {
                let name = input.name().unwrap().to_string();
                let mut secrets = self.secrets.lock().unwrap();
                if secrets.contains_key(&name) {
                    return Err(TransportError::new(operation.name(), "already exists")
                        .with_status(400)
                        .with_code("ResourceExistsException"));
                }
                let tags = input
                    .tags()
                    .iter()
                    .map(|t| {
                        (
                            t.key().unwrap_or_default().to_string(),
                            t.value().unwrap_or_default().to_string(),
                        )
                    })
                    .collect();
                let arn = Self::arn(&name);
                secrets.insert(
                    name.clone(),
                    Stored {
                        arn: arn.clone(),
                        description: input.description().map(ToString::to_string),
                        string: input.secret_string().map(ToString::to_string),
                        binary: None,
                        tags,
                    },
                );
                Ok(Response::Create(
                    CreateSecretOutput::builder()
                        .arn(arn)
                        .name(name)
                        .version_id("v1")
                        .build(),
                ))
            }
            Request::Get(input) => {
                let id = input.secret_id().unwrap_or_default();
                let (name, stored) = self.lookup(id).ok_or_else(|| Self::not_found(operation))?;
                Ok(Response::Get(
                    GetSecretValueOutput::builder()
                        .arn(stored.arn)
                        .name(name)
                        .set_secret_string(stored.string)
                        .set_secret_binary(stored.binary.map(Blob::new))
                        .version_id("v1")
                        .version_stages("AWSCURRENT")
                        .build(),
                ))
            }
            Request::Delete(input) => {
                let id = input.secret_id().unwrap_or_default();
                let (name, stored) = self.lookup(id).ok_or_else(|| Self::not_found(operation))?;
                self.secrets.lock().unwrap().remove(&name);
                Ok(Response::Delete(
                    DeleteSecretOutput::builder()
                        .arn(stored.arn)
                        .name(name)
                        .build(),
                ))
            }
            Request::List(input) => Ok(Response::List(self.list(input))),
            other => Err(TransportError::new(
                other.operation().name(),
                "operation not supported by the in-memory backend",
            )),
        }
    }
}

fn config(page_size: i32) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.client.credentials =
        CredentialConfig::default().with_static_keys("AKIDEXAMPLE", "example-secret");
    config.page_size = PageSize::new(page_size).unwrap();
    config
}

fn service(page_size: i32) -> (Service, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::default());
    let service = Service::with_backend(config(page_size), backend.clone());
    (service, backend)
}

#[tokio::test]
async fn test_create_get_delete_scenario() {
    let (service, backend) = service(100);

    let created = service
        .create("Org/Dev/App/Svc/123", "test secret", r#"{"k":"v"}"#, false)
        .await
        .unwrap();
    assert_eq!(created.name.as_deref(), Some("Org/Dev/App/Svc/123"));
    assert!(created.id.is_some());

    let value = service.get("Org/Dev/App/Svc/123").await.unwrap();
    assert_eq!(value, Some(SecretValue::Json(serde_json::json!({"k": "v"}))));

    assert!(
        service
            .delete("Org/Dev/App/Svc/123", DEFAULT_RECOVERY_DAYS)
            .await
            .unwrap()
    );

    let err = service.get("Org/Dev/App/Svc/123").await.unwrap_err();
    assert!(
        matches!(err, SecretError::NotFound { ref secret_id } if secret_id == "Org/Dev/App/Svc/123")
    );

    assert_eq!(
        backend.calls(),
        [
            Operation::Create,
            Operation::Get,
            Operation::Delete,
            Operation::Get
        ]
    );
}

#[tokio::test]
async fn test_create_tags_every_segment() {
    let (service, _backend) = service(100);
    service
        .create("Org/Dev/App/Svc/123", "with app", "{}", false)
        .await
        .unwrap();
    service
        .create(
            AddressParameter::without_application("Org", "Dev", "Svc", "456"),
            "no app",
            "{}",
            false,
        )
        .await
        .unwrap();

    let listed = service.list().await.unwrap();
    let keys = |name: &str| -> Vec<String> {
        listed
            .iter()
            .find(|s| s.name.as_deref() == Some(name))
            .unwrap()
            .tags
            .iter()
            .map(|t| t.key.clone())
            .collect()
    };

    assert_eq!(
        keys("Org/Dev/App/Svc/123"),
        ["Organization", "Environment", "Application", "Service", "Identifier"]
    );
    assert_eq!(
        keys("Org/Dev/Svc/456"),
        ["Organization", "Environment", "Service", "Identifier"]
    );
}

#[tokio::test]
async fn test_padded_address_is_rejected_before_any_call() {
    let (service, backend) = service(100);

    let err = service
        .create("Org/Dev/App/Svc/ 123", "padded", "{}", false)
        .await
        .unwrap_err();
    assert!(matches!(err, SecretError::InvalidAddress { .. }));
    assert!(backend.calls().is_empty());
    assert!(backend.secrets.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_created_name_matches_address_for_get_and_delete() {
    let (service, _backend) = service(100);
    let address = "Org/Dev/Svc/my key";

    let created = service.create(address, "spaced", "raw", false).await.unwrap();
    assert_eq!(created.name.as_deref(), Some(address));
    assert_eq!(
        service.get(address).await.unwrap(),
        Some(SecretValue::Text("raw".to_string()))
    );
    assert!(service.delete(address, 30).await.unwrap());
}

#[tokio::test]
async fn test_get_by_parameter_renders_path() {
    let (service, backend) = service(100);
    backend.insert("Org/Prod/App/Api/key", Some("plain"), None);

    let parameter = AddressParameter::new("Org", "Prod", "App", "Api", "key");
    let value = service.get(&parameter).await.unwrap();
    assert_eq!(value, Some(SecretValue::Text("plain".to_string())));
}

#[tokio::test]
async fn test_get_returns_raw_text_unchanged() {
    let (service, backend) = service(100);
    let raw = "not {json: at all";
    backend.insert("raw", Some(raw), None);

    let value = service.get("raw").await.unwrap().unwrap();
    assert_eq!(value.as_text(), Some(raw));
}

#[tokio::test]
async fn test_get_binary_only_is_none() {
    let (service, backend) = service(100);
    backend.insert("bin", None, Some(&[0xde, 0xad, 0xbe, 0xef]));

    assert!(service.get("bin").await.unwrap().is_none());

    let secret = service.fetch("bin").await.unwrap();
    assert_eq!(secret.binary.unwrap().len(), 4);
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let (service, _backend) = service(100);
    let err = service.get("Org/Dev/Svc/missing").await.unwrap_err();
    assert!(matches!(err, SecretError::NotFound { .. }));
}

#[tokio::test]
async fn test_other_failures_propagate_as_transport() {
    let (service, backend) = service(100);
    backend.fail_with(503);

    let err = service.get("anything").await.unwrap_err();
    match err {
        SecretError::Transport(transport) => {
            assert_eq!(transport.status, Some(503));
            assert_eq!(transport.operation, "get");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_rejects_out_of_range_window_without_calls() {
    let (service, backend) = service(100);
    backend.insert("Org/Dev/Svc/1", Some("v"), None);

    for days in [0, 6, 31, 365, -7] {
        let err = service.delete("Org/Dev/Svc/1", days).await.unwrap_err();
        assert!(matches!(err, SecretError::RecoveryWindow { days: d } if d == days));
    }
    assert!(backend.calls().is_empty());

    assert!(service.delete("Org/Dev/Svc/1", 30).await.unwrap());
}

#[tokio::test]
async fn test_list_follows_every_page() {
    let (service, backend) = service(3);
    for i in 0..7 {
        backend.insert(&format!("Org/Dev/Svc/{i}"), Some("v"), None);
    }

    let listed = service.list().await.unwrap();
    assert_eq!(listed.count(), 7);
    assert_eq!(listed.len(), 7);
    assert!(listed.cursor().is_none());
    assert_eq!(backend.count(Operation::List), 3);

    let ids: HashSet<&str> = listed.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids.len(), 7);

    let tokens: Vec<Option<String>> = backend
        .list_inputs
        .lock()
        .unwrap()
        .iter()
        .map(|input| input.next_token().map(ToString::to_string))
        .collect();
    assert_eq!(
        tokens,
        [
            None,
            Some("offset-3".to_string()),
            Some("offset-6".to_string())
        ]
    );
}

#[tokio::test]
async fn test_list_empty_store() {
    let (service, backend) = service(10);
    let listed = service.list().await.unwrap();
    assert!(listed.is_empty());
    assert_eq!(backend.count(Operation::List), 1);
}

#[tokio::test]
async fn test_search_carries_filter_on_every_page() {
    let (service, backend) = service(2);
    for i in 0..5 {
        service
            .create(format!("Acme/Dev/Svc/{i}"), "dev", "{}", false)
            .await
            .unwrap();
    }
    for i in 0..3 {
        service
            .create(format!("Acme/Prod/Svc/{i}"), "prod", "{}", false)
            .await
            .unwrap();
    }

    let found = service
        .search(FilterKind::TagValue, Some(FilterValues::from("Prod")))
        .await
        .unwrap();
    assert_eq!(found.count(), 3);
    assert!(
        found
            .iter()
            .all(|s| s.name.as_deref().unwrap().starts_with("Acme/Prod/"))
    );

    let inputs = backend.list_inputs.lock().unwrap();
    assert_eq!(inputs.len(), 2);
    for input in inputs.iter() {
        let filter = &input.filters()[0];
        assert_eq!(filter.key(), Some(&FilterNameStringType::TagValue));
        assert_eq!(filter.values(), ["Prod"]);
        assert_eq!(input.max_results(), Some(2));
    }
}

#[tokio::test]
async fn test_search_without_values_is_list() {
    let (service, backend) = service(2);
    for name in ["a", "b", "c"] {
        backend.insert(name, Some("v"), None);
    }

    let searched = service.search(FilterKind::Name, None).await.unwrap();
    let empty = service
        .search(FilterKind::Name, Some(FilterValues::from(Vec::<String>::new())))
        .await
        .unwrap();
    let blank = service
        .search(FilterKind::Name, Some(FilterValues::from("")))
        .await
        .unwrap();
    let blanks = service
        .search(FilterKind::TagValue, Some(FilterValues::from(["", ""])))
        .await
        .unwrap();
    let listed = service.list().await.unwrap();

    assert_eq!(searched, listed);
    assert_eq!(empty, listed);
    assert_eq!(blank, listed);
    assert_eq!(blanks, listed);
    assert_eq!(listed.count(), 3);
    assert!(
        backend
            .list_inputs
            .lock()
            .unwrap()
            .iter()
            .all(|input| input.filters().is_empty())
    );
}

#[tokio::test]
async fn test_search_by_name_prefix_with_several_values() {
    let (service, backend) = service(100);
    for name in ["alpha/1", "alpha/2", "beta/1", "gamma/1"] {
        backend.insert(name, Some("v"), None);
    }

    let found = service
        .search(FilterKind::Name, Some(FilterValues::from(["alpha", "gamma"])))
        .await
        .unwrap();
    assert_eq!(found.count(), 3);
}

#[tokio::test]
async fn test_partial_credentials_fail_before_any_call() {
    let backend = Arc::new(MemoryBackend::default());
    let mut config = ServiceConfig::default();
    config.client.credentials.secret_access_key = Some("orphan".to_string());
    let service = Service::with_backend(config, backend.clone());

    let err = service.list().await.unwrap_err();
    assert!(matches!(err, SecretError::CredentialResolution { .. }));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_client_sends_built_requests() {
    let backend = Arc::new(MemoryBackend::default());
    backend.insert("Org/Dev/Svc/1", Some("hello"), None);
    let identity = CredentialResolver::resolve(
        &CredentialConfig::default().with_static_keys("AKIDEXAMPLE", "example-secret"),
    )
    .await
    .unwrap();
    let client = Client::with_backend(identity, backend.clone());

    let output = client
        .send(request::get("Org/Dev/Svc/1").unwrap())
        .await
        .unwrap()
        .into_get()
        .unwrap();
    assert_eq!(output.secret_string(), Some("hello"));

    let err = client
        .send(request::random(32).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, SecretError::Transport(_)));
    assert_eq!(backend.calls(), [Operation::Get, Operation::Random]);
}
