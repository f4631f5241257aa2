//! Kubernetes protobuf framing.
//!
//! The API server never sends a bare message. A protobuf response is the
//! four-byte `k8s\0` magic followed by a `runtime.Unknown` whose `raw` field
//! holds the object and whose `typeMeta` names it.

use pkg_constants::wire::PROTOBUF_MAGIC;
use prost::bytes::{Buf, BufMut};
use prost::encoding::{self, DecodeContext, WireType};
use prost::{DecodeError, Message};
use tracing::{debug, trace};

use crate::codec::WireFormat;
use crate::error::{Error, Result};
use crate::meta::{Resource, TypeMeta};

/// `runtime.Unknown`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unknown {
    pub type_meta: TypeMeta,
    pub raw: Vec<u8>,
    pub content_encoding: String,
    pub content_type: String,
}

impl Message for Unknown {
    fn encode_raw(&self, buf: &mut impl BufMut) {
        encoding::message::encode(1, &self.type_meta, buf);
        encoding::bytes::encode(2, &self.raw, buf);
        encoding::string::encode(3, &self.content_encoding, buf);
        encoding::string::encode(4, &self.content_type, buf);
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        let field = match tag {
            1 => encoding::message::merge(wire_type, &mut self.type_meta, buf, ctx)
                .map_err(|e| (e, "type_meta")),
            2 => encoding::bytes::merge(wire_type, &mut self.raw, buf, ctx)
                .map_err(|e| (e, "raw")),
            3 => encoding::string::merge(wire_type, &mut self.content_encoding, buf, ctx)
                .map_err(|e| (e, "content_encoding")),
            4 => encoding::string::merge(wire_type, &mut self.content_type, buf, ctx)
                .map_err(|e| (e, "content_type")),
            _ => return encoding::skip_field(wire_type, tag, buf, ctx),
        };
        field.map_err(|(mut err, name)| {
            err.push("Unknown", name);
            err
        })
    }

    fn encoded_len(&self) -> usize {
        encoding::message::encoded_len(1, &self.type_meta)
            + encoding::bytes::encoded_len(2, &self.raw)
            + encoding::string::encoded_len(3, &self.content_encoding)
            + encoding::string::encoded_len(4, &self.content_type)
    }

    fn clear(&mut self) {
        *self = Unknown::default();
    }
}

/// Frame `object` the way the API server does.
///
/// An empty type meta on the object is stamped with the resource's own
/// `apiVersion` and `kind`.
pub fn wrap<R>(object: &R) -> Vec<u8>
where
    R: Resource + Message,
{
    let type_meta = if object.type_meta().is_empty() {
        TypeMeta::of::<R>()
    } else {
        object.type_meta().clone()
    };
    let unknown = Unknown {
        type_meta,
        raw: object.encode_to_vec(),
        ..Default::default()
    };

    let out = [&PROTOBUF_MAGIC[..], &unknown.encode_to_vec()].concat();
    trace!(kind = %unknown.type_meta.kind, bytes = out.len(), "wrapped protobuf object");
    out
}

/// Unframe and decode an object, restoring its type meta from the envelope.
pub fn unwrap<R>(bytes: &[u8]) -> Result<R>
where
    R: Resource + Message + Default,
{
    let body = bytes
        .strip_prefix(&PROTOBUF_MAGIC[..])
        .ok_or_else(|| malformed("missing k8s protobuf magic prefix"))?;
    let unknown = Unknown::decode(body).map_err(malformed)?;

    let kind = &unknown.type_meta.kind;
    if !kind.is_empty() && kind != R::KIND {
        return Err(malformed(format!(
            "Unknown.type_meta: expected kind {}, found {}",
            R::KIND,
            kind
        )));
    }

    let mut object = R::decode(unknown.raw.as_slice()).map_err(malformed)?;
    *object.type_meta_mut() = unknown.type_meta;
    Ok(object)
}

fn malformed(err: impl std::fmt::Display) -> Error {
    let err = Error::malformed(WireFormat::Protobuf, err);
    debug!(error = %err, "rejected protobuf envelope");
    err
}
