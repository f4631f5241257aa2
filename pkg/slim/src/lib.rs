//! Slim mirror of the Kubernetes `discovery.k8s.io/v1` EndpointSlice API.
//!
//! Decode and encode EndpointSlices without the full upstream API
//! machinery. The types carry values only; which endpoints belong to a
//! service, and whether a slice is valid, is decided by the API server.
//!
//! ```no_run
//! use pkg_slim::codec::{self, WireFormat};
//! use pkg_slim::discovery::EndpointSlice;
//!
//! # fn main() -> pkg_slim::Result<()> {
//! let bytes = std::fs::read("slice.pb").unwrap_or_default();
//! let slice: EndpointSlice = codec::decode(WireFormat::Protobuf, &bytes)?;
//! for addr in slice.ready_addresses() {
//!     println!("{addr}");
//! }
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod open_enum;

pub mod codec;
pub mod discovery;
pub mod envelope;
pub mod error;
pub mod meta;
mod nullable;
mod proto;
pub mod protocol;

pub use codec::WireFormat;
pub use discovery::{
    AddressType, Endpoint, EndpointConditions, EndpointHints, EndpointPort, EndpointSlice,
    EndpointSliceList, ForZone,
};
pub use error::{Error, Result};
pub use meta::{ListMeta, ObjectMeta, OwnerReference, Resource, Time, TypeMeta};
pub use protocol::Protocol;
