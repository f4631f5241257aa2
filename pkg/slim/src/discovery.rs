//! Slim `discovery.k8s.io/v1` EndpointSlice types.
//!
//! These types only carry values. Every limit mentioned in the field docs is
//! enforced by the API server; decoding and encoding accept anything.

use std::collections::BTreeMap;

use pkg_constants::discovery::{
    API_VERSION, KIND_ENDPOINT_SLICE, KIND_ENDPOINT_SLICE_LIST, LABEL_MANAGED_BY,
    LABEL_SERVICE_NAME,
};
use serde::{Deserialize, Serialize};

use crate::meta::{ListMeta, ObjectMeta, Resource, TypeMeta};
use crate::nullable::null_as_default;
use crate::protocol::Protocol;

open_enum! {
    /// Type of address carried by an EndpointSlice.
    ///
    /// Unrecognized values are carried verbatim.
    pub struct AddressType {
        /// An IPv4 address.
        IPV4 = "IPv4",
        /// An IPv6 address.
        IPV6 = "IPv6",
        /// A fully qualified domain name.
        FQDN = "FQDN",
    }
}

/// A subset of the endpoints that implement a service.
///
/// A service may have several slices, selected by labels, which must be
/// joined to produce its full set of endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSlice {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Type of every address in this slice. Immutable after creation.
    #[serde(default, deserialize_with = "null_as_default")]
    pub address_type: AddressType,
    /// Unique endpoints; at most 1000.
    #[serde(default, deserialize_with = "null_as_default")]
    pub endpoints: Vec<Endpoint>,
    /// Ports exposed by each endpoint; at most 100, with unique names.
    /// Empty means no ports are defined.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ports: Vec<EndpointPort>,
}

impl Resource for EndpointSlice {
    const API_VERSION: &'static str = API_VERSION;
    const KIND: &'static str = KIND_ENDPOINT_SLICE;

    fn type_meta(&self) -> &TypeMeta {
        &self.type_meta
    }

    fn type_meta_mut(&mut self) -> &mut TypeMeta {
        &mut self.type_meta
    }
}

impl EndpointSlice {
    /// Name of the Service this slice belongs to, from its well-known label.
    pub fn service_name(&self) -> Option<&str> {
        self.metadata.label(LABEL_SERVICE_NAME)
    }

    /// Entity managing this slice, from its well-known label.
    pub fn managed_by(&self) -> Option<&str> {
        self.metadata.label(LABEL_MANAGED_BY)
    }

    /// Addresses of endpoints that should receive traffic.
    pub fn ready_addresses(&self) -> impl Iterator<Item = &str> {
        self.endpoints
            .iter()
            .filter(|e| e.is_ready())
            .flat_map(|e| e.addresses.iter().map(String::as_str))
    }
}

/// A single logical backend implementing a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Between 1 and 100 unique addresses, interpreted according to the
    /// slice's address type. Order is not significant.
    #[serde(default, deserialize_with = "null_as_default")]
    pub addresses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<EndpointConditions>,
    /// v1beta1 topology. The API server ignores writes to it.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub deprecated_topology: BTreeMap<String, String>,
    /// Node hosting this endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    /// Zone this endpoint lives in.
    #[serde(default, alias = "Zone", skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// How this endpoint should be consumed.
    #[serde(default, alias = "Hints", skip_serializing_if = "Option::is_none")]
    pub hints: Option<EndpointHints>,
}

impl Endpoint {
    /// Readiness with the unknown-means-ready fallback.
    pub fn is_ready(&self) -> bool {
        self.conditions.as_ref().is_none_or(EndpointConditions::is_ready)
    }

    pub fn is_serving(&self) -> bool {
        self.conditions.as_ref().is_none_or(EndpointConditions::is_serving)
    }

    pub fn is_terminating(&self) -> bool {
        self.conditions
            .as_ref()
            .is_some_and(EndpointConditions::is_terminating)
    }

    /// Zones this endpoint is hinted for.
    pub fn hinted_zones(&self) -> impl Iterator<Item = &str> {
        self.hints
            .iter()
            .flat_map(|h| h.for_zones.iter().map(|z| z.name.as_str()))
    }
}

/// Current condition of an endpoint.
///
/// Each field is tri-state; `None` means the managing system did not say.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConditions {
    /// Prepared to receive traffic. Never true for a terminating endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready: Option<bool>,
    /// Like `ready`, but set regardless of termination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminating: Option<bool>,
}

impl EndpointConditions {
    /// Unknown is treated as ready.
    pub fn is_ready(&self) -> bool {
        self.ready.unwrap_or(true)
    }

    /// Unknown defers to [`is_ready`](Self::is_ready).
    pub fn is_serving(&self) -> bool {
        self.serving.unwrap_or_else(|| self.is_ready())
    }

    /// Unknown is treated as not terminating.
    pub fn is_terminating(&self) -> bool {
        self.terminating.unwrap_or(false)
    }
}

/// A port used by an EndpointSlice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointPort {
    /// Empty or a DNS label (at most 63 chars of `[a-z0-9-]`, alphanumeric
    /// at both ends). Matches `Service.ports[].name` for service slices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `UDP`, `TCP` or `SCTP`; consumers default to `TCP`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    /// When unset, ports are not restricted and must be interpreted by the
    /// consumer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
}

impl EndpointPort {
    pub fn name_or_default(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn protocol_or_default(&self) -> Protocol {
        self.protocol.clone().unwrap_or(Protocol::TCP)
    }
}

/// Hints describing how an endpoint should be consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointHints {
    /// Zones that should consume this endpoint; at most 8.
    #[serde(
        default,
        alias = "ForZones",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub for_zones: Vec<ForZone>,
}

/// A zone that should consume an endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForZone {
    #[serde(default, alias = "Name", deserialize_with = "null_as_default")]
    pub name: String,
}

impl From<&str> for ForZone {
    fn from(name: &str) -> Self {
        ForZone {
            name: name.to_string(),
        }
    }
}

/// A list of endpoint slices, as returned by list and watch calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointSliceList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ListMeta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<EndpointSlice>,
}

impl Resource for EndpointSliceList {
    const API_VERSION: &'static str = API_VERSION;
    const KIND: &'static str = KIND_ENDPOINT_SLICE_LIST;

    fn type_meta(&self) -> &TypeMeta {
        &self.type_meta
    }

    fn type_meta_mut(&mut self) -> &mut TypeMeta {
        &mut self.type_meta
    }
}
