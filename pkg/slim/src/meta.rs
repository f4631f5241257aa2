//! Slim `meta/v1` companion types embedded by the discovery schema.
//!
//! Only the fields consumers of EndpointSlices actually read are kept.
//! Scalar fields are `Option` so absent and empty stay distinct; maps and
//! lists follow Go's `omitempty`, where nil and empty are the same value.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::nullable::null_as_default;

/// A top-level API object with an inline `apiVersion`/`kind`.
pub trait Resource {
    /// Group/version, e.g. `discovery.k8s.io/v1`.
    const API_VERSION: &'static str;
    /// Kind, e.g. `EndpointSlice`.
    const KIND: &'static str;

    fn type_meta(&self) -> &TypeMeta;
    fn type_meta_mut(&mut self) -> &mut TypeMeta;
}

/// Inline `apiVersion` and `kind`.
///
/// Not part of the protobuf message itself; the Kubernetes envelope carries
/// it (see [`crate::envelope`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl TypeMeta {
    /// Type meta naming resource `R`.
    pub fn of<R: Resource>() -> Self {
        Self {
            api_version: R::API_VERSION.to_string(),
            kind: R::KIND.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.api_version.is_empty() && self.kind.is_empty()
    }
}

/// Standard object metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Opaque version used for optimistic concurrency and watches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_grace_period_seconds: Option<i64>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub labels: BTreeMap<String, String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub annotations: BTreeMap<String, String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub owner_references: Vec<OwnerReference>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub finalizers: Vec<String>,
}

impl ObjectMeta {
    /// Value of label `key`, if set.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// The owner reference marked as managing controller, if any.
    pub fn controller_ref(&self) -> Option<&OwnerReference> {
        self.owner_references
            .iter()
            .find(|r| r.controller == Some(true))
    }
}

/// Identifies an object owning the one this metadata belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_owner_deletion: Option<bool>,
}

/// Metadata of a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    /// Continuation token for paginated lists.
    #[serde(
        default,
        rename = "continue",
        skip_serializing_if = "Option::is_none"
    )]
    pub continue_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_item_count: Option<i64>,
}

/// A UTC timestamp.
///
/// JSON carries RFC 3339 with second precision (sub-second parts are dropped
/// the way the API server drops them); protobuf carries seconds and nanos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(pub DateTime<Utc>);

impl Time {
    /// Build from protobuf `seconds`/`nanos`; `None` when out of range.
    pub fn from_parts(seconds: i64, nanos: i32) -> Option<Self> {
        let nanos = u32::try_from(nanos).ok()?;
        DateTime::from_timestamp(seconds, nanos).map(Time)
    }

    pub fn seconds(&self) -> i64 {
        self.0.timestamp()
    }

    pub fn nanos(&self) -> i32 {
        // always below 2e9, so it fits
        self.0.timestamp_subsec_nanos() as i32
    }
}

impl From<DateTime<Utc>> for Time {
    fn from(t: DateTime<Utc>) -> Self {
        Time(t)
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|t| Time(t.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_json_is_second_precision() {
        let t = Time::from_parts(1_700_000_000, 250_000_000).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"2023-11-14T22:13:20Z\"");
    }

    #[test]
    fn test_time_parses_offsets() {
        let t: Time = serde_json::from_str("\"2023-11-14T23:13:20+01:00\"").unwrap();
        assert_eq!(t.seconds(), 1_700_000_000);
        assert_eq!(t.nanos(), 0);
    }

    #[test]
    fn test_time_rejects_garbage() {
        assert!(serde_json::from_str::<Time>("\"yesterday\"").is_err());
        assert!(Time::from_parts(0, -1).is_none());
    }

    #[test]
    fn test_object_meta_omits_empty() {
        let meta = ObjectMeta {
            name: Some("web-abc12".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "web-abc12" }));
    }

    #[test]
    fn test_object_meta_null_collections() {
        let meta: ObjectMeta =
            serde_json::from_str(r#"{"labels":null,"ownerReferences":null}"#).unwrap();
        assert!(meta.labels.is_empty());
        assert!(meta.owner_references.is_empty());
    }

    #[test]
    fn test_controller_ref() {
        let meta = ObjectMeta {
            owner_references: vec![
                OwnerReference {
                    kind: "Service".to_string(),
                    name: "other".to_string(),
                    ..Default::default()
                },
                OwnerReference {
                    kind: "Service".to_string(),
                    name: "web".to_string(),
                    controller: Some(true),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(meta.controller_ref().map(|r| r.name.as_str()), Some("web"));
    }

    #[test]
    fn test_list_meta_continue_key() {
        let meta = ListMeta {
            continue_: Some("tok".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"continue":"tok"}"#);
    }
}
