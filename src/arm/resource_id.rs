//! ARM resource identifiers
//!
//! Parses the structured path form every Azure resource id follows:
//! `/subscriptions/{sub}/resourceGroups/{group}/providers/{namespace}/{type...}/{name}`.
//! Ids are validated before any management API call is issued; a malformed
//! id never leaves the process.

use std::fmt;
use thiserror::Error;

/// A resource id that failed structural validation.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid resource ID format: {0}")]
pub struct InvalidResourceId(pub String);

/// A parsed, validated ARM resource id. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    raw: String,
    subscription_id: String,
    resource_group: String,
    provider_namespace: String,
    /// Alternating type/name segments after the provider namespace.
    type_path: Vec<String>,
}

impl ResourceId {
    /// Parse and validate a resource id string.
    ///
    /// The path must contain `subscriptions`, `resourceGroups`, and
    /// `providers` markers followed by at least one type/name pair.
    /// Nested types (`Microsoft.Sql/servers/{s}/databases/{db}`) are
    /// accepted; the type path must have an even number of segments.
    pub fn parse(raw: &str) -> Result<Self, InvalidResourceId> {
        let malformed = || InvalidResourceId(raw.to_string());

        let segments: Vec<&str> = raw
            .trim_start_matches('/')
            .split('/')
            .collect();

        if segments.iter().any(|s| s.is_empty()) {
            return Err(malformed());
        }

        // Fixed markers, same shape the management API enforces.
        if segments.len() < 8
            || segments[0] != "subscriptions"
            || segments[2] != "resourceGroups"
            || segments[4] != "providers"
        {
            return Err(malformed());
        }

        let type_path: Vec<String> = segments[6..].iter().map(|s| s.to_string()).collect();
        if type_path.len() % 2 != 0 {
            return Err(malformed());
        }

        Ok(Self {
            raw: raw.to_string(),
            subscription_id: segments[1].to_string(),
            resource_group: segments[3].to_string(),
            provider_namespace: segments[5].to_string(),
            type_path,
        })
    }

    /// The original id string, unmodified.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    /// Full resource type, e.g. `Microsoft.Sql/servers/databases`.
    pub fn resource_type(&self) -> String {
        let mut parts = vec![self.provider_namespace.clone()];
        parts.extend(self.type_path.iter().step_by(2).cloned());
        parts.join("/")
    }

    /// The leaf resource name.
    pub fn name(&self) -> &str {
        // type_path is non-empty and even by construction
        self.type_path.last().map(|s| s.as_str()).unwrap_or("")
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
