//! Cloud entry and auth descriptors matching the clouds.yaml schema.
//!
//! An empty string always means "unset, inherit from a lower-precedence
//! layer", never a valid literal value. Unset fields are skipped during
//! serialization so the layer merge never sees them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level shape of a clouds.yaml / secure.yaml file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clouds {
    #[serde(default)]
    pub clouds: HashMap<String, Cloud>,
}

/// Top-level shape of a clouds-public.yaml file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicClouds {
    #[serde(default, rename = "public-clouds")]
    pub clouds: HashMap<String, Cloud>,
}

/// One named cloud entry: credentials plus connection settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cloud {
    /// Profile alias carried inside the entry itself.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cloud: String,

    /// Reference into the public-clouds file supplying shared defaults.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub profile: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthInfo>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub region_name: String,

    /// Which variant of a service endpoint to use: public, internal or admin.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub endpoint_type: String,

    /// Legacy alias for `endpoint_type`. Normalized away during resolution.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub interface: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub volume_api_version: String,

    /// Whether to verify TLS certificates. Defaults to true when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify: Option<bool>,
}

/// Flat set of optional credential fields for one cloud entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub auth_url: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_id: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_id: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub domain_id: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub domain_name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_domain: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_domain_id: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_domain_name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_domain_id: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_domain_name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub application_credential_id: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub application_credential_name: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub application_credential_secret: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub access_key: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub secret_key: String,
}

pub const DEFAULT_ENDPOINT_TYPE: &str = "public";

const VALID_ENDPOINT_TYPES: [&str; 3] = ["public", "internal", "admin"];

/// Normalize an endpoint-type setting to one of the three canonical
/// variants. Values like "publicURL" match by prefix; anything unknown
/// falls back to the public endpoint.
pub fn normalize_endpoint_type(endpoint_type: &str) -> &'static str {
    for valid in VALID_ENDPOINT_TYPES {
        if endpoint_type.starts_with(valid) {
            return valid;
        }
    }
    DEFAULT_ENDPOINT_TYPE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_type_prefix_match() {
        assert_eq!(normalize_endpoint_type("publicURL"), "public");
        assert_eq!(normalize_endpoint_type("internal"), "internal");
        assert_eq!(normalize_endpoint_type("adminURL"), "admin");
    }

    #[test]
    fn endpoint_type_unknown_defaults_to_public() {
        assert_eq!(normalize_endpoint_type(""), "public");
        assert_eq!(normalize_endpoint_type("something-else"), "public");
    }

    #[test]
    fn unset_fields_are_skipped_when_serialized() {
        let cloud = Cloud {
            auth: Some(AuthInfo {
                auth_url: "http://example.test/v3".to_string(),
                ..AuthInfo::default()
            }),
            ..Cloud::default()
        };
        let value = serde_yaml::to_value(&cloud).unwrap();
        let mapping = value.as_mapping().unwrap();
        assert!(!mapping.contains_key("region_name"));
        let auth = mapping.get("auth").unwrap().as_mapping().unwrap();
        assert!(auth.contains_key("auth_url"));
        assert!(!auth.contains_key("password"));
    }
}
