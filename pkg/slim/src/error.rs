//! Error type for the slim schema codecs.
//!
//! Decoding has exactly one failure kind, [`Error::Malformed`]. Semantic
//! problems (mixed address families, too many endpoints, bad port names) are
//! the API server's business and never surface here.

use std::fmt::Display;

use thiserror::Error;

use crate::codec::WireFormat;

/// Errors raised while moving schema objects on or off the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The input could not be decoded in the given format.
    ///
    /// For protobuf, `detail` carries the `Message.field` path of the
    /// offending field; for JSON and YAML it carries the line and column.
    #[error("malformed {format} input: {detail}")]
    Malformed {
        /// Format that was being decoded
        format: WireFormat,
        /// Decoder message
        detail: String,
    },

    /// The serializer refused a value.
    #[error("failed to encode {format}: {detail}")]
    Encode {
        /// Format that was being encoded
        format: WireFormat,
        /// Serializer message
        detail: String,
    },

    /// A wire-format name that is not one of `json`, `yaml`, `protobuf`.
    #[error("unknown wire format `{0}` (expected json, yaml or protobuf)")]
    UnknownFormat(String),
}

impl Error {
    pub(crate) fn malformed(format: WireFormat, err: impl Display) -> Self {
        Error::Malformed {
            format,
            detail: err.to_string(),
        }
    }

    pub(crate) fn encode(format: WireFormat, err: impl Display) -> Self {
        Error::Encode {
            format,
            detail: err.to_string(),
        }
    }

    /// True for decode failures.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::Malformed { .. })
    }
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
