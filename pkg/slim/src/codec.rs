//! Encoding and decoding in the formats Kubernetes speaks.

use std::fmt;
use std::str::FromStr;

use pkg_constants::wire::{CONTENT_TYPE_JSON, CONTENT_TYPE_PROTOBUF, CONTENT_TYPE_YAML};
use prost::Message;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::envelope;
use crate::error::{Error, Result};
use crate::meta::Resource;

/// A wire representation of API objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireFormat {
    Json,
    Yaml,
    /// Enveloped protobuf, as served by the API server.
    Protobuf,
}

impl WireFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            WireFormat::Json => CONTENT_TYPE_JSON,
            WireFormat::Yaml => CONTENT_TYPE_YAML,
            WireFormat::Protobuf => CONTENT_TYPE_PROTOBUF,
        }
    }

    /// True for the binary format, which must not be written to a terminal.
    pub fn is_binary(&self) -> bool {
        matches!(self, WireFormat::Protobuf)
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireFormat::Json => write!(f, "json"),
            WireFormat::Yaml => write!(f, "yaml"),
            WireFormat::Protobuf => write!(f, "protobuf"),
        }
    }
}

impl FromStr for WireFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(WireFormat::Json),
            "yaml" | "yml" => Ok(WireFormat::Yaml),
            "protobuf" | "proto" | "pb" => Ok(WireFormat::Protobuf),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Types that can travel in every supported format.
pub trait Object: Resource + Message + Default + Serialize + DeserializeOwned {}

impl<T> Object for T where T: Resource + Message + Default + Serialize + DeserializeOwned {}

pub fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| Error::encode(WireFormat::Json, e))
}

pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(value).map_err(|e| Error::encode(WireFormat::Json, e))
}

/// Decode JSON. Type errors are reported with the path of the offending
/// field, e.g. `endpoints[1].addresses[0]`.
pub fn from_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut de).map_err(|e| {
        if e.path().iter().next().is_none() {
            rejected(WireFormat::Json, e.into_inner())
        } else {
            rejected(WireFormat::Json, format!("{}: {}", e.path(), e.inner()))
        }
    })?;
    de.end().map_err(|e| rejected(WireFormat::Json, e))?;
    Ok(value)
}

pub fn to_yaml<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_yaml::to_string(value)
        .map(String::into_bytes)
        .map_err(|e| Error::encode(WireFormat::Yaml, e))
}

pub fn from_yaml<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_yaml::from_slice(bytes).map_err(|e| rejected(WireFormat::Yaml, e))
}

/// Bare protobuf message bytes, without the Kubernetes envelope.
pub fn to_protobuf<T: Message>(value: &T) -> Vec<u8> {
    value.encode_to_vec()
}

/// Decode bare protobuf message bytes.
pub fn from_protobuf<T: Message + Default>(bytes: &[u8]) -> Result<T> {
    T::decode(bytes).map_err(|e| rejected(WireFormat::Protobuf, e))
}

/// Encode `value` in `format`. Protobuf output is enveloped.
pub fn encode<T: Object>(format: WireFormat, value: &T, pretty: bool) -> Result<Vec<u8>> {
    let bytes = match format {
        WireFormat::Json if pretty => to_json_pretty(value)?,
        WireFormat::Json => to_json(value)?,
        WireFormat::Yaml => to_yaml(value)?,
        WireFormat::Protobuf => envelope::wrap(value),
    };
    trace!(%format, kind = T::KIND, bytes = bytes.len(), "encoded object");
    Ok(bytes)
}

/// Decode a `format` document. Protobuf input must be enveloped.
pub fn decode<T: Object>(format: WireFormat, bytes: &[u8]) -> Result<T> {
    match format {
        WireFormat::Json => from_json(bytes),
        WireFormat::Yaml => from_yaml(bytes),
        WireFormat::Protobuf => envelope::unwrap(bytes),
    }
}

fn rejected(format: WireFormat, err: impl fmt::Display) -> Error {
    let err = Error::malformed(format, err);
    debug!(error = %err, "failed to decode object");
    err
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::discovery::{
        AddressType, Endpoint, EndpointConditions, EndpointHints, EndpointPort, EndpointSlice,
        EndpointSliceList, ForZone,
    };
    use crate::meta::{ListMeta, ObjectMeta, OwnerReference, Time, TypeMeta};
    use crate::protocol::Protocol;

    const FORMATS: [WireFormat; 3] = [WireFormat::Json, WireFormat::Yaml, WireFormat::Protobuf];

    fn populated() -> EndpointSlice {
        let labels = BTreeMap::from([
            (
                "kubernetes.io/service-name".to_string(),
                "web".to_string(),
            ),
            (
                "endpointslice.kubernetes.io/managed-by".to_string(),
                "endpointslice-controller.k8s.io".to_string(),
            ),
        ]);
        EndpointSlice {
            type_meta: TypeMeta::of::<EndpointSlice>(),
            metadata: ObjectMeta {
                name: Some("web-x7k2p".to_string()),
                generate_name: Some("web-".to_string()),
                namespace: Some("default".to_string()),
                uid: Some("4c1e2f7a-0000-4000-8000-000000000001".to_string()),
                resource_version: Some("48213".to_string()),
                generation: Some(3),
                creation_timestamp: Time::from_parts(1_700_000_000, 0),
                labels,
                owner_references: vec![OwnerReference {
                    api_version: "v1".to_string(),
                    kind: "Service".to_string(),
                    name: "web".to_string(),
                    uid: "4c1e2f7a-0000-4000-8000-000000000000".to_string(),
                    controller: Some(true),
                    block_owner_deletion: Some(true),
                }],
                ..Default::default()
            },
            address_type: AddressType::IPV4,
            endpoints: vec![
                Endpoint {
                    addresses: vec!["10.0.0.5".to_string()],
                    conditions: Some(EndpointConditions {
                        ready: None,
                        serving: Some(true),
                        terminating: Some(true),
                    }),
                    deprecated_topology: BTreeMap::from([(
                        "kubernetes.io/hostname".to_string(),
                        "node-1".to_string(),
                    )]),
                    node_name: Some("node-1".to_string()),
                    zone: Some("us-east-1a".to_string()),
                    hints: Some(EndpointHints {
                        for_zones: vec![ForZone::from("us-east-1a")],
                    }),
                },
                Endpoint {
                    addresses: vec!["10.0.0.6".to_string(), "10.0.0.7".to_string()],
                    conditions: Some(EndpointConditions {
                        ready: Some(false),
                        serving: Some(false),
                        terminating: Some(false),
                    }),
                    node_name: Some(String::new()),
                    zone: Some(String::new()),
                    ..Default::default()
                },
            ],
            ports: vec![
                EndpointPort {
                    name: Some("http".to_string()),
                    protocol: Some(Protocol::TCP),
                    port: Some(8080),
                },
                EndpointPort {
                    name: Some(String::new()),
                    protocol: Some(Protocol::SCTP),
                    port: Some(0),
                },
                EndpointPort {
                    name: Some("max".to_string()),
                    protocol: Some(Protocol::UDP),
                    port: Some(i32::MAX),
                },
                EndpointPort {
                    name: None,
                    protocol: None,
                    port: Some(-1),
                },
            ],
        }
    }

    fn sparse() -> EndpointSlice {
        EndpointSlice {
            type_meta: TypeMeta::of::<EndpointSlice>(),
            endpoints: vec![Endpoint::default()],
            ports: vec![EndpointPort::default()],
            ..Default::default()
        }
    }

    #[test]
    fn test_format_names() {
        assert_eq!("json".parse::<WireFormat>().unwrap(), WireFormat::Json);
        assert_eq!("YAML".parse::<WireFormat>().unwrap(), WireFormat::Yaml);
        assert_eq!("pb".parse::<WireFormat>().unwrap(), WireFormat::Protobuf);
        assert!(matches!(
            "xml".parse::<WireFormat>(),
            Err(Error::UnknownFormat(name)) if name == "xml"
        ));
        assert_eq!(WireFormat::Protobuf.to_string(), "protobuf");
        assert_eq!(
            WireFormat::Protobuf.content_type(),
            "application/vnd.kubernetes.protobuf"
        );
    }

    #[test]
    fn test_populated_slice_round_trips() {
        let slice = populated();
        for format in FORMATS {
            let bytes = encode(format, &slice, false).unwrap();
            let back: EndpointSlice = decode(format, &bytes).unwrap();
            assert_eq!(back, slice, "{format}");
        }
    }

    #[test]
    fn test_sparse_slice_round_trips() {
        let slice = sparse();
        for format in FORMATS {
            let bytes = encode(format, &slice, false).unwrap();
            let back: EndpointSlice = decode(format, &bytes).unwrap();
            assert_eq!(back, slice, "{format}");
        }
    }

    #[test]
    fn test_bare_protobuf_round_trips() {
        let mut slice = populated();
        // type meta only travels in the envelope
        slice.type_meta = TypeMeta::default();
        let back: EndpointSlice = from_protobuf(&to_protobuf(&slice)).unwrap();
        assert_eq!(back, slice);
    }

    #[test]
    fn test_list_round_trips() {
        let list = EndpointSliceList {
            type_meta: TypeMeta::of::<EndpointSliceList>(),
            metadata: ListMeta {
                resource_version: Some("99".to_string()),
                continue_: Some("eyJ2IjoibWV0YS5rOHMuaW8vdjEifQ".to_string()),
                remaining_item_count: Some(12),
            },
            // items carry no type meta on the protobuf wire
            items: vec![populated(), sparse()]
                .into_iter()
                .map(|mut item| {
                    item.type_meta = TypeMeta::default();
                    item
                })
                .collect(),
        };
        for format in FORMATS {
            let bytes = encode(format, &list, true).unwrap();
            let back: EndpointSliceList = decode(format, &bytes).unwrap();
            assert_eq!(back, list, "{format}");
        }
    }

    #[test]
    fn test_list_items_lose_type_meta_in_protobuf() {
        let list = EndpointSliceList {
            items: vec![populated()],
            ..Default::default()
        };
        assert_eq!(list.items[0].type_meta, TypeMeta::of::<EndpointSlice>());

        let back: EndpointSliceList =
            decode(WireFormat::Protobuf, &encode(WireFormat::Protobuf, &list, false).unwrap())
                .unwrap();
        assert_eq!(back.type_meta, TypeMeta::of::<EndpointSliceList>());
        assert!(back.items[0].type_meta.is_empty());
        assert_eq!(back.items[0].endpoints, list.items[0].endpoints);

        let back: EndpointSliceList =
            decode(WireFormat::Json, &encode(WireFormat::Json, &list, false).unwrap()).unwrap();
        assert_eq!(back.items[0].type_meta, TypeMeta::of::<EndpointSlice>());
    }

    #[test]
    fn test_sparse_json_shape() {
        let bytes = to_json(&sparse()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "apiVersion": "discovery.k8s.io/v1",
                "kind": "EndpointSlice",
                "metadata": {},
                "addressType": "",
                "endpoints": [{ "addresses": [] }],
                "ports": [{}]
            })
        );
    }

    #[test]
    fn test_empty_port_keeps_protocol_absent() {
        let port = EndpointPort {
            name: Some(String::new()),
            protocol: None,
            port: None,
        };
        let from_pb: EndpointPort = from_protobuf(&to_protobuf(&port)).unwrap();
        let from_json: EndpointPort = from_json(&to_json(&port).unwrap()).unwrap();
        assert_eq!(from_pb, port);
        assert_eq!(from_json, port);
        assert_eq!(from_pb.protocol, None);
    }

    #[test]
    fn test_yaml_reads_kubectl_output() {
        let doc = r#"
apiVersion: discovery.k8s.io/v1
kind: EndpointSlice
metadata:
  name: web-abc
  namespace: default
  labels:
    kubernetes.io/service-name: web
addressType: IPv6
endpoints:
  - addresses: ["fd00::1"]
    conditions:
      ready: true
    nodeName: node-2
ports:
  - name: https
    port: 443
    protocol: TCP
"#;
        let slice: EndpointSlice = from_yaml(doc.as_bytes()).unwrap();
        assert_eq!(slice.address_type, AddressType::IPV6);
        assert_eq!(slice.service_name(), Some("web"));
        assert_eq!(slice.endpoints[0].node_name.as_deref(), Some("node-2"));
        assert_eq!(slice.ports[0].port, Some(443));
    }

    #[test]
    fn test_json_unknown_fields_ignored() {
        let raw = br#"{"addressType":"FQDN","endpoints":[{"addresses":["a.example"],"hostname":"a","targetRef":{"kind":"Pod"}}],"ports":[{"appProtocol":"http"}]}"#;
        let slice: EndpointSlice = from_json(raw).unwrap();
        assert_eq!(slice.address_type, AddressType::FQDN);
        assert_eq!(slice.endpoints[0].addresses, vec!["a.example".to_string()]);
    }

    #[test]
    fn test_malformed_json() {
        let err = from_json::<EndpointPort>(br#"{"port":"eighty"}"#).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().starts_with("malformed json input"), "{err}");
        assert!(err.to_string().contains("port: invalid type"), "{err}");
        assert!(err.to_string().contains("column"), "{err}");

        let err = from_json::<EndpointSlice>(
            br#"{"endpoints":[{"addresses":["a"]},{"addresses":[1]}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("endpoints[1].addresses[0]"), "{err}");
    }

    #[test]
    fn test_json_trailing_garbage() {
        let err = from_json::<EndpointSlice>(br#"{"addressType":"IPv4"} x"#).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_malformed_yaml() {
        let err = from_yaml::<EndpointSlice>(b"endpoints: 7").unwrap_err();
        assert!(matches!(err, Error::Malformed { format: WireFormat::Yaml, .. }));
    }

    #[test]
    fn test_malformed_protobuf_names_field() {
        let err = from_protobuf::<EndpointSlice>(&[0x1a, 2, 0x18, 0xff]).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("EndpointPort.port"), "{err}");
    }

    #[test]
    fn test_cardinality_not_enforced() {
        let slice = EndpointSlice {
            endpoints: (0..1001)
                .map(|i| Endpoint {
                    addresses: vec![format!("10.1.{}.{}", i / 256, i % 256)],
                    ..Default::default()
                })
                .collect(),
            ports: vec![EndpointPort {
                name: Some("x".repeat(64)),
                ..Default::default()
            }],
            ..populated()
        };
        let mut hinted = slice;
        hinted.endpoints[0].hints = Some(EndpointHints {
            for_zones: (0..9)
                .map(|i| ForZone::from(format!("zone-{i}").as_str()))
                .collect(),
        });
        for format in FORMATS {
            let bytes = encode(format, &hinted, false).unwrap();
            let back: EndpointSlice = decode(format, &bytes).unwrap();
            assert_eq!(back.endpoints.len(), 1001);
            assert_eq!(back.endpoints[0].hinted_zones().count(), 9);
        }
    }
}
