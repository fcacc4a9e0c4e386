//! Hierarchical secret addressing
//!
//! Secrets are named `Organization/Environment/Application/Service/Identifier`,
//! with the application segment optional. The same decomposition supplies the
//! tags attached when a secret is created.

use crate::{SecretError, Tag};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SEPARATOR: char = '/';

/// A secret name split into its hierarchy segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressParameter {
    /// Owning organization
    pub organization: String,
    /// Deployment environment (e.g. `Development`)
    pub environment: String,
    /// Application grouping, when the address has five segments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
    /// Service within the application
    pub service: String,
    /// Leaf identifier
    pub identifier: String,
}

impl AddressParameter {
    /// Build an address with all five segments.
    #[must_use]
    pub fn new(
        organization: impl Into<String>,
        environment: impl Into<String>,
        application: impl Into<String>,
        service: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            environment: environment.into(),
            application: Some(application.into()),
            service: service.into(),
            identifier: identifier.into(),
        }
    }

    /// Build an address without an application segment.
    #[must_use]
    pub fn without_application(
        organization: impl Into<String>,
        environment: impl Into<String>,
        service: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            environment: environment.into(),
            application: None,
            service: service.into(),
            identifier: identifier.into(),
        }
    }

    /// Parse an address string.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::InvalidAddress`] unless the string has four or
    /// five non-empty `/`-separated segments without surrounding whitespace.
    /// A parsed address always renders back to the exact input.
    pub fn parse(address: &str) -> Result<Self, SecretError> {
        let invalid = |message: &str| SecretError::InvalidAddress {
            address: address.to_string(),
            message: message.to_string(),
        };

        let segments: Vec<&str> = address.split(SEPARATOR).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(invalid("address segments must not be empty"));
        }
        if segments.iter().any(|segment| segment.trim() != *segment) {
            return Err(invalid("address segments must not start or end with whitespace"));
        }

        match segments.as_slice() {
            [organization, environment, application, service, identifier] => Ok(Self::new(
                *organization,
                *environment,
                *application,
                *service,
                *identifier,
            )),
            [organization, environment, service, identifier] => Ok(Self::without_application(
                *organization,
                *environment,
                *service,
                *identifier,
            )),
            _ => Err(invalid(
                "expected Organization/Environment/[Application/]Service/Identifier",
            )),
        }
    }

    /// Canonical path string, used as the secret name.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Tags describing each present segment, in hierarchy order.
    #[must_use]
    pub fn tags(&self) -> Vec<Tag> {
        let mut tags = vec![
            Tag::new("Organization", &self.organization),
            Tag::new("Environment", &self.environment),
        ];
        if let Some(application) = &self.application {
            tags.push(Tag::new("Application", application));
        }
        tags.push(Tag::new("Service", &self.service));
        tags.push(Tag::new("Identifier", &self.identifier));
        tags
    }
}

impl fmt::Display for AddressParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.organization, self.environment)?;
        if let Some(application) = &self.application {
            write!(f, "{SEPARATOR}{application}")?;
        }
        write!(f, "{SEPARATOR}{}{SEPARATOR}{}", self.service, self.identifier)
    }
}

impl FromStr for AddressParameter {
    type Err = SecretError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// How a caller names a secret: a verbatim identifier (name or ARN) or a
/// structured [`AddressParameter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretAddress {
    /// Used verbatim as the secret id
    Raw(String),
    /// Rendered to its canonical path
    Parameter(AddressParameter),
}

impl SecretAddress {
    /// The identifier sent to the backend.
    #[must_use]
    pub fn secret_id(&self) -> String {
        match self {
            Self::Raw(id) => id.clone(),
            Self::Parameter(parameter) => parameter.render(),
        }
    }

    /// Decompose into an [`AddressParameter`], parsing raw identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::InvalidAddress`] if a raw identifier is not a
    /// well-formed address.
    pub fn into_parameter(self) -> Result<AddressParameter, SecretError> {
        match self {
            Self::Raw(id) => AddressParameter::parse(&id),
            Self::Parameter(parameter) => Ok(parameter),
        }
    }
}

impl From<&str> for SecretAddress {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}

impl From<String> for SecretAddress {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<&String> for SecretAddress {
    fn from(value: &String) -> Self {
        Self::Raw(value.clone())
    }
}

impl From<AddressParameter> for SecretAddress {
    fn from(value: AddressParameter) -> Self {
        Self::Parameter(value)
    }
}

impl From<&AddressParameter> for SecretAddress {
    fn from(value: &AddressParameter) -> Self {
        Self::Parameter(value.clone())
    }
}

impl fmt::Display for SecretAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(id) => f.write_str(id),
            Self::Parameter(parameter) => parameter.fmt(f),
        }
    }
}
