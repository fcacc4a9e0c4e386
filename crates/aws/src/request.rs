//! Tagged request and response values
//!
//! Each backend operation has a builder function that returns a [`Request`]
//! without performing any I/O. Payloads are the SDK's own `*Input` and
//! `*Output` shapes; they are the external contract and are passed through
//! unchanged. A [`Request`] is executed by [`Client::send`](crate::Client::send).

use aws_sdk_secretsmanager::operation::cancel_rotate_secret::{
    CancelRotateSecretInput, CancelRotateSecretOutput,
};
use aws_sdk_secretsmanager::operation::create_secret::{CreateSecretInput, CreateSecretOutput};
use aws_sdk_secretsmanager::operation::delete_secret::{DeleteSecretInput, DeleteSecretOutput};
use aws_sdk_secretsmanager::operation::describe_secret::{
    DescribeSecretInput, DescribeSecretOutput,
};
use aws_sdk_secretsmanager::operation::get_random_password::{
    GetRandomPasswordInput, GetRandomPasswordOutput,
};
use aws_sdk_secretsmanager::operation::get_secret_value::{
    GetSecretValueInput, GetSecretValueOutput,
};
use aws_sdk_secretsmanager::operation::list_secrets::{ListSecretsInput, ListSecretsOutput};
use aws_sdk_secretsmanager::operation::rotate_secret::{RotateSecretInput, RotateSecretOutput};
use aws_sdk_secretsmanager::operation::tag_resource::{TagResourceInput, TagResourceOutput};
use aws_sdk_secretsmanager::operation::untag_resource::{
    UntagResourceInput, UntagResourceOutput,
};
use aws_sdk_secretsmanager::operation::update_secret::{UpdateSecretInput, UpdateSecretOutput};
use aws_sdk_secretsmanager::types::{Filter, FilterNameStringType};
use smclient_secrets::{FilterKind, FilterValues, PageSize, RecoveryWindow, SecretError, Tag};
use std::fmt;

/// A Secrets Manager operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// CreateSecret
    Create,
    /// ListSecrets
    List,
    /// GetSecretValue
    Get,
    /// RotateSecret
    Rotate,
    /// CancelRotateSecret
    Cancel,
    /// DeleteSecret
    Delete,
    /// DescribeSecret
    Describe,
    /// TagResource
    Tag,
    /// GetRandomPassword
    Random,
    /// UpdateSecret
    Update,
    /// UntagResource
    Untag,
}

impl Operation {
    /// Every supported operation.
    pub const ALL: [Self; 11] = [
        Self::Create,
        Self::List,
        Self::Get,
        Self::Rotate,
        Self::Cancel,
        Self::Delete,
        Self::Describe,
        Self::Tag,
        Self::Random,
        Self::Update,
        Self::Untag,
    ];

    /// Short operation name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::List => "list",
            Self::Get => "get",
            Self::Rotate => "rotate",
            Self::Cancel => "cancel",
            Self::Delete => "delete",
            Self::Describe => "describe",
            Self::Tag => "tag",
            Self::Random => "random",
            Self::Update => "update",
            Self::Untag => "untag",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A request value, tagged by operation.
#[derive(Debug, Clone)]
pub enum Request {
    /// CreateSecret
    Create(CreateSecretInput),
    /// ListSecrets
    List(ListSecretsInput),
    /// GetSecretValue
    Get(GetSecretValueInput),
    /// RotateSecret
    Rotate(RotateSecretInput),
    /// CancelRotateSecret
    Cancel(CancelRotateSecretInput),
    /// DeleteSecret
    Delete(DeleteSecretInput),
    /// DescribeSecret
    Describe(DescribeSecretInput),
    /// TagResource
    Tag(TagResourceInput),
    /// GetRandomPassword
    Random(GetRandomPasswordInput),
    /// UpdateSecret
    Update(UpdateSecretInput),
    /// UntagResource
    Untag(UntagResourceInput),
}

impl Request {
    /// The operation this request invokes.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Create(_) => Operation::Create,
            Self::List(_) => Operation::List,
            Self::Get(_) => Operation::Get,
            Self::Rotate(_) => Operation::Rotate,
            Self::Cancel(_) => Operation::Cancel,
            Self::Delete(_) => Operation::Delete,
            Self::Describe(_) => Operation::Describe,
            Self::Tag(_) => Operation::Tag,
            Self::Random(_) => Operation::Random,
            Self::Update(_) => Operation::Update,
            Self::Untag(_) => Operation::Untag,
        }
    }
}

/// A response value, tagged by operation.
#[derive(Debug, Clone)]
pub enum Response {
    /// CreateSecret
    Create(CreateSecretOutput),
    /// ListSecrets
    List(ListSecretsOutput),
    /// GetSecretValue
    Get(GetSecretValueOutput),
    /// RotateSecret
    Rotate(RotateSecretOutput),
    /// CancelRotateSecret
    Cancel(CancelRotateSecretOutput),
    /// DeleteSecret
    Delete(DeleteSecretOutput),
    /// DescribeSecret
    Describe(DescribeSecretOutput),
    /// TagResource
    Tag(TagResourceOutput),
    /// GetRandomPassword
    Random(GetRandomPasswordOutput),
    /// UpdateSecret
    Update(UpdateSecretOutput),
    /// UntagResource
    Untag(UntagResourceOutput),
}

/// Generates `Response::into_*` accessors that unwrap one variant.
macro_rules! response_accessors {
    ($($method:ident => $variant:ident($output:ty)),+ $(,)?) => {
        impl Response {
            $(
                #[doc = concat!("Unwrap a `", stringify!($variant), "` response.")]
                #[doc = ""]
                #[doc = "# Errors"]
                #[doc = ""]
                #[doc = "Returns [`SecretError::UnexpectedResponse`] for any other variant."]
                pub fn $method(self) -> Result<$output, SecretError> {
                    match self {
                        Self::$variant(output) => Ok(output),
                        other => Err(SecretError::UnexpectedResponse {
                            expected: Operation::$variant.name(),
                            actual: other.operation().name(),
                        }),
                    }
                }
            )+
        }
    };
}

response_accessors! {
    into_create => Create(CreateSecretOutput),
    into_list => List(ListSecretsOutput),
    into_get => Get(GetSecretValueOutput),
    into_rotate => Rotate(RotateSecretOutput),
    into_cancel => Cancel(CancelRotateSecretOutput),
    into_delete => Delete(DeleteSecretOutput),
    into_describe => Describe(DescribeSecretOutput),
    into_tag => Tag(TagResourceOutput),
    into_random => Random(GetRandomPasswordOutput),
    into_update => Update(UpdateSecretOutput),
    into_untag => Untag(UntagResourceOutput),
}

impl Response {
    /// The operation that produced this response.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Create(_) => Operation::Create,
            Self::List(_) => Operation::List,
            Self::Get(_) => Operation::Get,
            Self::Rotate(_) => Operation::Rotate,
            Self::Cancel(_) => Operation::Cancel,
            Self::Delete(_) => Operation::Delete,
            Self::Describe(_) => Operation::Describe,
            Self::Tag(_) => Operation::Tag,
            Self::Random(_) => Operation::Random,
            Self::Update(_) => Operation::Update,
            Self::Untag(_) => Operation::Untag,
        }
    }
}

fn invalid(operation: Operation) -> impl FnOnce(aws_sdk_secretsmanager::error::BuildError) -> SecretError {
    move |e| SecretError::InvalidRequest {
        operation: operation.name(),
        message: e.to_string(),
    }
}

fn sdk_tags(tags: &[Tag]) -> Vec<aws_sdk_secretsmanager::types::Tag> {
    tags.iter()
        .map(|tag| {
            aws_sdk_secretsmanager::types::Tag::builder()
                .key(&tag.key)
                .value(&tag.value)
                .build()
        })
        .collect()
}

const fn filter_name(kind: FilterKind) -> FilterNameStringType {
    match kind {
        FilterKind::Description => FilterNameStringType::Description,
        FilterKind::Name => FilterNameStringType::Name,
        FilterKind::TagKey => FilterNameStringType::TagKey,
        FilterKind::TagValue => FilterNameStringType::TagValue,
        FilterKind::PrimaryRegion => FilterNameStringType::PrimaryRegion,
        FilterKind::All => FilterNameStringType::All,
    }
}

/// Build a CreateSecret request with a string payload.
///
/// `overwrite` maps to `ForceOverwriteReplicaSecret`.
///
/// # Errors
///
/// Returns [`SecretError::InvalidRequest`] if the SDK rejects the input.
pub fn create(
    name: &str,
    description: &str,
    secret_string: &str,
    tags: &[Tag],
    overwrite: bool,
) -> Result<Request, SecretError> {
    CreateSecretInput::builder()
        .name(name)
        .description(description)
        .secret_string(secret_string)
        .set_tags(Some(sdk_tags(tags)))
        .force_overwrite_replica_secret(overwrite)
        .build()
        .map(Request::Create)
        .map_err(invalid(Operation::Create))
}

/// Build a ListSecrets request for one page.
///
/// # Errors
///
/// Returns [`SecretError::InvalidRequest`] if the SDK rejects the input.
pub fn list(
    page_size: PageSize,
    next_token: Option<&str>,
    filter: Option<(FilterKind, &FilterValues)>,
) -> Result<Request, SecretError> {
    let filters = filter.map(|(kind, values)| {
        vec![
            Filter::builder()
                .key(filter_name(kind))
                .set_values(Some(values.as_slice().to_vec()))
                .build(),
        ]
    });

    ListSecretsInput::builder()
        .max_results(page_size.get())
        .set_next_token(next_token.map(ToString::to_string))
        .set_filters(filters)
        .build()
        .map(Request::List)
        .map_err(invalid(Operation::List))
}

/// Build a GetSecretValue request for the current version.
///
/// # Errors
///
/// Returns [`SecretError::InvalidRequest`] if the SDK rejects the input.
pub fn get(secret_id: &str) -> Result<Request, SecretError> {
    GetSecretValueInput::builder()
        .secret_id(secret_id)
        .build()
        .map(Request::Get)
        .map_err(invalid(Operation::Get))
}

/// Build a RotateSecret request.
///
/// # Errors
///
/// Returns [`SecretError::InvalidRequest`] if the SDK rejects the input.
pub fn rotate(secret_id: &str, rotate_immediately: bool) -> Result<Request, SecretError> {
    RotateSecretInput::builder()
        .secret_id(secret_id)
        .rotate_immediately(rotate_immediately)
        .build()
        .map(Request::Rotate)
        .map_err(invalid(Operation::Rotate))
}

/// Build a CancelRotateSecret request.
///
/// # Errors
///
/// Returns [`SecretError::InvalidRequest`] if the SDK rejects the input.
pub fn cancel(secret_id: &str) -> Result<Request, SecretError> {
    CancelRotateSecretInput::builder()
        .secret_id(secret_id)
        .build()
        .map(Request::Cancel)
        .map_err(invalid(Operation::Cancel))
}

/// Build a DeleteSecret request that keeps the recovery window.
///
/// Force deletion is never requested.
///
/// # Errors
///
/// Returns [`SecretError::InvalidRequest`] if the SDK rejects the input.
pub fn delete(secret_id: &str, recovery: RecoveryWindow) -> Result<Request, SecretError> {
    DeleteSecretInput::builder()
        .secret_id(secret_id)
        .recovery_window_in_days(recovery.days())
        .force_delete_without_recovery(false)
        .build()
        .map(Request::Delete)
        .map_err(invalid(Operation::Delete))
}

/// Build a DescribeSecret request.
///
/// # Errors
///
/// Returns [`SecretError::InvalidRequest`] if the SDK rejects the input.
pub fn describe(secret_id: &str) -> Result<Request, SecretError> {
    DescribeSecretInput::builder()
        .secret_id(secret_id)
        .build()
        .map(Request::Describe)
        .map_err(invalid(Operation::Describe))
}

/// Build a TagResource request.
///
/// # Errors
///
/// Returns [`SecretError::InvalidRequest`] if the SDK rejects the input.
pub fn tag(secret_id: &str, tags: &[Tag]) -> Result<Request, SecretError> {
    TagResourceInput::builder()
        .secret_id(secret_id)
        .set_tags(Some(sdk_tags(tags)))
        .build()
        .map(Request::Tag)
        .map_err(invalid(Operation::Tag))
}

/// Build a GetRandomPassword request.
///
/// # Errors
///
/// Returns [`SecretError::InvalidRequest`] if the SDK rejects the input.
pub fn random(password_length: i64) -> Result<Request, SecretError> {
    GetRandomPasswordInput::builder()
        .password_length(password_length)
        .build()
        .map(Request::Random)
        .map_err(invalid(Operation::Random))
}

/// Build an UpdateSecret request. Unset fields are left unchanged.
///
/// # Errors
///
/// Returns [`SecretError::InvalidRequest`] if the SDK rejects the input.
pub fn update(
    secret_id: &str,
    description: Option<&str>,
    secret_string: Option<&str>,
) -> Result<Request, SecretError> {
    UpdateSecretInput::builder()
        .secret_id(secret_id)
        .set_description(description.map(ToString::to_string))
        .set_secret_string(secret_string.map(ToString::to_string))
        .build()
        .map(Request::Update)
        .map_err(invalid(Operation::Update))
}

/// Build an UntagResource request.
///
/// # Errors
///
/// Returns [`SecretError::InvalidRequest`] if the SDK rejects the input.
pub fn untag(secret_id: &str, tag_keys: &[String]) -> Result<Request, SecretError> {
    UntagResourceInput::builder()
        .secret_id(secret_id)
        .set_tag_keys(Some(tag_keys.to_vec()))
        .build()
        .map(Request::Untag)
        .map_err(invalid(Operation::Untag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names_are_unique() {
        let mut names: Vec<&str> = Operation::ALL.iter().map(|op| op.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Operation::ALL.len());
    }

    #[test]
    fn test_create_request_carries_tags_and_overwrite() {
        let tags = [Tag::new("Organization", "Org"), Tag::new("Service", "Svc")];
        let request = create("Org/Dev/Svc/1", "test secret", "{}", &tags, true).unwrap();
        assert_eq!(request.operation(), Operation::Create);

        let Request::Create(input) = request else {
            unreachable!("create builder returned another variant");
        };
        assert_eq!(input.name(), Some("Org/Dev/Svc/1"));
        assert_eq!(input.description(), Some("test secret"));
        assert_eq!(input.force_overwrite_replica_secret(), Some(true));
        let keys: Vec<Option<&str>> = input.tags().iter().map(|t| t.key()).collect();
        assert_eq!(keys, [Some("Organization"), Some("Service")]);
    }

    #[test]
    fn test_list_request_without_filter() {
        let Request::List(input) = list(PageSize::default(), None, None).unwrap() else {
            unreachable!("list builder returned another variant");
        };
        assert_eq!(input.max_results(), Some(100));
        assert!(input.next_token().is_none());
        assert!(input.filters().is_empty());
    }

    #[test]
    fn test_list_request_with_filter_and_token() {
        let values = FilterValues::from(["Org", "Other"]);
        let request = list(
            PageSize::new(10).unwrap(),
            Some("token-1"),
            Some((FilterKind::TagValue, &values)),
        )
        .unwrap();
        let Request::List(input) = request else {
            unreachable!("list builder returned another variant");
        };
        assert_eq!(input.max_results(), Some(10));
        assert_eq!(input.next_token(), Some("token-1"));
        let filter = &input.filters()[0];
        assert_eq!(filter.key(), Some(&FilterNameStringType::TagValue));
        assert_eq!(filter.values(), ["Org", "Other"]);
    }

    #[test]
    fn test_delete_request_never_forces() {
        let window = RecoveryWindow::new(14).unwrap();
        let Request::Delete(input) = delete("Org/Dev/Svc/1", window).unwrap() else {
            unreachable!("delete builder returned another variant");
        };
        assert_eq!(input.secret_id(), Some("Org/Dev/Svc/1"));
        assert_eq!(input.recovery_window_in_days(), Some(14));
        assert_eq!(input.force_delete_without_recovery(), Some(false));
    }

    #[test]
    fn test_every_builder_tags_its_operation() {
        let requests = [
            get("a").unwrap(),
            rotate("a", false).unwrap(),
            cancel("a").unwrap(),
            describe("a").unwrap(),
            tag("a", &[Tag::new("k", "v")]).unwrap(),
            random(32).unwrap(),
            update("a", Some("d"), None).unwrap(),
            untag("a", &["k".to_string()]).unwrap(),
        ];
        let operations: Vec<Operation> = requests.iter().map(Request::operation).collect();
        assert_eq!(
            operations,
            [
                Operation::Get,
                Operation::Rotate,
                Operation::Cancel,
                Operation::Describe,
                Operation::Tag,
                Operation::Random,
                Operation::Update,
                Operation::Untag,
            ]
        );
    }

    #[test]
    fn test_response_accessor_rejects_other_variant() {
        let response = Response::Describe(DescribeSecretOutput::builder().build());
        let err = response.into_get().unwrap_err();
        assert!(matches!(
            err,
            SecretError::UnexpectedResponse {
                expected: "get",
                actual: "describe"
            }
        ));
    }
}
