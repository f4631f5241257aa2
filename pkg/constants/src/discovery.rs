//! `discovery.k8s.io/v1` names and documented limits.

// ─── API identity ─────────────────────────────────────────────────────────

/// Group/version string carried in `apiVersion`.
pub const API_VERSION: &str = "discovery.k8s.io/v1";

/// Kind of a single slice.
pub const KIND_ENDPOINT_SLICE: &str = "EndpointSlice";

/// Kind of the list envelope.
pub const KIND_ENDPOINT_SLICE_LIST: &str = "EndpointSliceList";

// ─── Well-known labels ────────────────────────────────────────────────────

/// Label naming the Service a slice belongs to.
pub const LABEL_SERVICE_NAME: &str = "kubernetes.io/service-name";

/// Label naming the controller or entity that manages a slice.
pub const LABEL_MANAGED_BY: &str = "endpointslice.kubernetes.io/managed-by";

// ─── Documented limits (enforced by the API server, never here) ───────────

/// Maximum endpoints per slice.
pub const MAX_ENDPOINTS_PER_SLICE: usize = 1000;

/// Maximum addresses per endpoint.
pub const MAX_ADDRESSES_PER_ENDPOINT: usize = 100;

/// Maximum ports per slice.
pub const MAX_PORTS_PER_SLICE: usize = 100;

/// Maximum `forZones` hints per endpoint.
pub const MAX_FOR_ZONES: usize = 8;

/// Maximum length of a DNS label (port names).
pub const MAX_PORT_NAME_LEN: usize = 63;
