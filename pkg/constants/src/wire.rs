//! Wire-format constants.

/// Prefix of every Kubernetes protobuf-encoded object: `k8s\0`.
pub const PROTOBUF_MAGIC: [u8; 4] = [0x6b, 0x38, 0x73, 0x00];

/// Content type for the structured-text form.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Content type for the YAML form.
pub const CONTENT_TYPE_YAML: &str = "application/yaml";

/// Content type for the enveloped protobuf form.
pub const CONTENT_TYPE_PROTOBUF: &str = "application/vnd.kubernetes.protobuf";
