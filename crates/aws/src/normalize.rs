//! Conversion of SDK responses into [`smclient_secrets`] records

use aws_sdk_secretsmanager::operation::create_secret::CreateSecretOutput;
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueOutput;
use aws_sdk_secretsmanager::operation::list_secrets::ListSecretsOutput;
use aws_sdk_secretsmanager::primitives::DateTime;
use aws_sdk_secretsmanager::types::SecretListEntry;
use chrono::Utc;
use smclient_secrets::{
    Secret, SecretCollection, SecretSummary, SecureBytes, SecureSecret, Tag,
};

fn timestamp(value: Option<&DateTime>) -> Option<chrono::DateTime<Utc>> {
    value.and_then(|dt| chrono::DateTime::from_timestamp(dt.secs(), dt.subsec_nanos()))
}

/// Secret record from a GetSecretValue response.
#[must_use]
pub fn secret_from_get(output: &GetSecretValueOutput) -> Secret {
    Secret {
        id: output.arn().map(ToString::to_string),
        created: timestamp(output.created_date()),
        name: output.name().map(ToString::to_string),
        binary: output
            .secret_binary()
            .map(|blob| SecureBytes::new(blob.as_ref().to_vec())),
        string: output.secret_string().map(SecureSecret::from),
        version: output.version_id().map(ToString::to_string),
        stages: output.version_stages().to_vec(),
    }
}

/// Secret record from a CreateSecret response.
///
/// The response carries no payload or timestamps; only the identifiers are
/// populated.
#[must_use]
pub fn secret_from_create(output: &CreateSecretOutput) -> Secret {
    Secret {
        id: output.arn().map(ToString::to_string),
        name: output.name().map(ToString::to_string),
        version: output.version_id().map(ToString::to_string),
        ..Secret::default()
    }
}

/// Summary record from one list entry.
#[must_use]
pub fn summary_from_entry(entry: &SecretListEntry) -> SecretSummary {
    SecretSummary {
        id: entry
            .arn()
            .unwrap_or(SecretSummary::UNKNOWN_ID)
            .to_string(),
        name: entry.name().map(ToString::to_string),
        created: timestamp(entry.created_date()),
        deleted: timestamp(entry.deleted_date()),
        description: entry.description().map(ToString::to_string),
        last_accessed: timestamp(entry.last_accessed_date()),
        last_changed: timestamp(entry.last_changed_date()),
        versions: entry
            .secret_versions_to_stages()
            .map(|map| {
                map.iter()
                    .map(|(version, stages)| (version.clone(), stages.clone()))
                    .collect()
            })
            .unwrap_or_default(),
        tags: entry
            .tags()
            .iter()
            .map(|tag| {
                Tag::new(
                    tag.key().unwrap_or_default(),
                    tag.value().unwrap_or_default(),
                )
            })
            .collect(),
    }
}

/// One page of a listing, with its continuation token.
#[must_use]
pub fn page_from_list(output: &ListSecretsOutput) -> SecretCollection {
    SecretCollection::page(
        output.secret_list().iter().map(summary_from_entry).collect(),
        output.next_token().map(ToString::to_string),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_secretsmanager::primitives::Blob;
    use smclient_secrets::SecretValue;

    #[test]
    fn test_secret_from_get_copies_every_field() {
        let output = GetSecretValueOutput::builder()
            .arn("arn:aws:secretsmanager:us-east-2:1:secret:Org/Dev/App/Svc/1-abc")
            .name("Org/Dev/App/Svc/1")
            .secret_string(r#"{"k":"v"}"#)
            .version_id("v1")
            .version_stages("AWSCURRENT")
            .created_date(DateTime::from_secs(1_700_000_000))
            .build();

        let secret = secret_from_get(&output);
        assert_eq!(secret.name.as_deref(), Some("Org/Dev/App/Svc/1"));
        assert_eq!(secret.version.as_deref(), Some("v1"));
        assert_eq!(secret.stages, ["AWSCURRENT"]);
        assert_eq!(secret.created.unwrap().timestamp(), 1_700_000_000);
        assert!(secret.binary.is_none());
        assert_eq!(
            secret.value(),
            Some(SecretValue::Json(serde_json::json!({"k": "v"})))
        );
    }

    #[test]
    fn test_secret_from_get_binary_only() {
        let output = GetSecretValueOutput::builder()
            .name("bin")
            .secret_binary(Blob::new(vec![1, 2, 3]))
            .build();

        let secret = secret_from_get(&output);
        assert_eq!(secret.binary.as_ref().map(SecureBytes::expose), Some(&[1, 2, 3][..]));
        assert!(secret.value().is_none());
    }

    #[test]
    fn test_secret_from_create() {
        let output = CreateSecretOutput::builder()
            .arn("arn:1")
            .name("Org/Dev/Svc/1")
            .version_id("v1")
            .build();
        let secret = secret_from_create(&output);
        assert_eq!(secret.id.as_deref(), Some("arn:1"));
        assert!(secret.string.is_none());
        assert!(secret.stages.is_empty());
    }

    #[test]
    fn test_summary_from_entry() {
        let entry = SecretListEntry::builder()
            .arn("arn:2")
            .name("Org/Dev/Svc/2")
            .description("db password")
            .secret_versions_to_stages("v1", vec!["AWSCURRENT".to_string()])
            .tags(
                aws_sdk_secretsmanager::types::Tag::builder()
                    .key("Environment")
                    .value("Dev")
                    .build(),
            )
            .build();

        let summary = summary_from_entry(&entry);
        assert_eq!(summary.id, "arn:2");
        assert_eq!(summary.description.as_deref(), Some("db password"));
        assert_eq!(summary.versions["v1"], ["AWSCURRENT"]);
        assert_eq!(summary.tags, [Tag::new("Environment", "Dev")]);
        assert!(summary.deleted.is_none());
    }

    #[test]
    fn test_summary_without_arn_uses_placeholder() {
        let entry = SecretListEntry::builder().name("orphan").build();
        assert_eq!(summary_from_entry(&entry).id, "N/A");
    }

    #[test]
    fn test_page_from_list_keeps_token() {
        let output = ListSecretsOutput::builder()
            .secret_list(SecretListEntry::builder().arn("a").build())
            .secret_list(SecretListEntry::builder().arn("b").build())
            .next_token("next")
            .build();

        let page = page_from_list(&output);
        assert_eq!(page.count(), 2);
        assert_eq!(page.cursor(), Some("next"));
    }
}
