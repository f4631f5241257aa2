//! Protobuf encoding of the schema types.
//!
//! Field numbers follow upstream `k8s.io/api/discovery/v1/generated.proto`
//! and `k8s.io/apimachinery/pkg/apis/meta/v1/generated.proto`. Messages are
//! proto2: optional scalars are written only when present, non-optional ones
//! always, in field-number order like the Go marshaller. Unknown fields
//! (e.g. `hostname` and `targetRef`, which the slim types drop) are skipped.

use prost::bytes::{Buf, BufMut};
use prost::encoding::{self, DecodeContext, WireType};
use prost::{DecodeError, Message};

use crate::discovery::{
    Endpoint, EndpointConditions, EndpointHints, EndpointPort, EndpointSlice, EndpointSliceList,
    ForZone,
};
use crate::meta::{ListMeta, ObjectMeta, OwnerReference, Time, TypeMeta};

/// Attach `Message.field` to a decode error so callers see where it failed.
fn at(message: &'static str, field: &'static str) -> impl FnOnce(DecodeError) -> DecodeError {
    move |mut err: DecodeError| {
        err.push(message, field);
        err
    }
}

fn encode_str(tag: u32, value: &str, buf: &mut impl BufMut) {
    encoding::encode_key(tag, WireType::LengthDelimited, buf);
    encoding::encode_varint(value.len() as u64, buf);
    buf.put_slice(value.as_bytes());
}

fn str_encoded_len(tag: u32, value: &str) -> usize {
    encoding::key_len(tag) + encoding::encoded_len_varint(value.len() as u64) + value.len()
}

/// Merge a string field into a string-backed type.
fn merge_str<T: From<String>>(
    wire_type: WireType,
    target: &mut T,
    buf: &mut impl Buf,
    ctx: DecodeContext,
) -> Result<(), DecodeError> {
    let mut value = String::new();
    encoding::string::merge(wire_type, &mut value, buf, ctx)?;
    *target = T::from(value);
    Ok(())
}

fn opt_string_len(tag: u32, value: &Option<String>) -> usize {
    value
        .as_ref()
        .map_or(0, |v| encoding::string::encoded_len(tag, v))
}

fn opt_bool_len(tag: u32, value: &Option<bool>) -> usize {
    value
        .as_ref()
        .map_or(0, |v| encoding::bool::encoded_len(tag, v))
}

fn opt_int64_len(tag: u32, value: &Option<i64>) -> usize {
    value
        .as_ref()
        .map_or(0, |v| encoding::int64::encoded_len(tag, v))
}

// ─── meta/v1 ──────────────────────────────────────────────────────────────

/// `runtime.TypeMeta`, as carried by the envelope.
impl Message for TypeMeta {
    fn encode_raw(&self, buf: &mut impl BufMut) {
        encoding::string::encode(1, &self.api_version, buf);
        encoding::string::encode(2, &self.kind, buf);
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        const NAME: &str = "TypeMeta";
        match tag {
            1 => encoding::string::merge(wire_type, &mut self.api_version, buf, ctx)
                .map_err(at(NAME, "api_version")),
            2 => encoding::string::merge(wire_type, &mut self.kind, buf, ctx)
                .map_err(at(NAME, "kind")),
            _ => encoding::skip_field(wire_type, tag, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        encoding::string::encoded_len(1, &self.api_version)
            + encoding::string::encoded_len(2, &self.kind)
    }

    fn clear(&mut self) {
        *self = TypeMeta::default();
    }
}

impl Message for Time {
    fn encode_raw(&self, buf: &mut impl BufMut) {
        encoding::int64::encode(1, &self.seconds(), buf);
        encoding::int32::encode(2, &self.nanos(), buf);
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        const NAME: &str = "Time";
        let (mut seconds, mut nanos) = (self.seconds(), self.nanos());
        let field = match tag {
            1 => {
                encoding::int64::merge(wire_type, &mut seconds, buf, ctx)
                    .map_err(at(NAME, "seconds"))?;
                "seconds"
            }
            2 => {
                encoding::int32::merge(wire_type, &mut nanos, buf, ctx)
                    .map_err(at(NAME, "nanos"))?;
                "nanos"
            }
            _ => return encoding::skip_field(wire_type, tag, buf, ctx),
        };
        *self = Time::from_parts(seconds, nanos)
            .ok_or_else(|| DecodeError::new("timestamp out of range"))
            .map_err(at(NAME, field))?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        encoding::int64::encoded_len(1, &self.seconds())
            + encoding::int32::encoded_len(2, &self.nanos())
    }

    fn clear(&mut self) {
        *self = Time::default();
    }
}

impl Message for OwnerReference {
    fn encode_raw(&self, buf: &mut impl BufMut) {
        encoding::string::encode(1, &self.kind, buf);
        encoding::string::encode(3, &self.name, buf);
        encoding::string::encode(4, &self.uid, buf);
        encoding::string::encode(5, &self.api_version, buf);
        if let Some(v) = &self.controller {
            encoding::bool::encode(6, v, buf);
        }
        if let Some(v) = &self.block_owner_deletion {
            encoding::bool::encode(7, v, buf);
        }
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        const NAME: &str = "OwnerReference";
        match tag {
            1 => encoding::string::merge(wire_type, &mut self.kind, buf, ctx)
                .map_err(at(NAME, "kind")),
            3 => encoding::string::merge(wire_type, &mut self.name, buf, ctx)
                .map_err(at(NAME, "name")),
            4 => encoding::string::merge(wire_type, &mut self.uid, buf, ctx)
                .map_err(at(NAME, "uid")),
            5 => encoding::string::merge(wire_type, &mut self.api_version, buf, ctx)
                .map_err(at(NAME, "api_version")),
            6 => encoding::bool::merge(
                wire_type,
                self.controller.get_or_insert_with(Default::default),
                buf,
                ctx,
            )
            .map_err(at(NAME, "controller")),
            7 => encoding::bool::merge(
                wire_type,
                self.block_owner_deletion.get_or_insert_with(Default::default),
                buf,
                ctx,
            )
            .map_err(at(NAME, "block_owner_deletion")),
            _ => encoding::skip_field(wire_type, tag, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        encoding::string::encoded_len(1, &self.kind)
            + encoding::string::encoded_len(3, &self.name)
            + encoding::string::encoded_len(4, &self.uid)
            + encoding::string::encoded_len(5, &self.api_version)
            + opt_bool_len(6, &self.controller)
            + opt_bool_len(7, &self.block_owner_deletion)
    }

    fn clear(&mut self) {
        *self = OwnerReference::default();
    }
}

impl Message for ObjectMeta {
    fn encode_raw(&self, buf: &mut impl BufMut) {
        if let Some(v) = &self.name {
            encoding::string::encode(1, v, buf);
        }
        if let Some(v) = &self.generate_name {
            encoding::string::encode(2, v, buf);
        }
        if let Some(v) = &self.namespace {
            encoding::string::encode(3, v, buf);
        }
        if let Some(v) = &self.uid {
            encoding::string::encode(5, v, buf);
        }
        if let Some(v) = &self.resource_version {
            encoding::string::encode(6, v, buf);
        }
        if let Some(v) = &self.generation {
            encoding::int64::encode(7, v, buf);
        }
        if let Some(v) = &self.creation_timestamp {
            encoding::message::encode(8, v, buf);
        }
        if let Some(v) = &self.deletion_timestamp {
            encoding::message::encode(9, v, buf);
        }
        if let Some(v) = &self.deletion_grace_period_seconds {
            encoding::int64::encode(10, v, buf);
        }
        encoding::btree_map::encode(
            encoding::string::encode,
            encoding::string::encoded_len,
            encoding::string::encode,
            encoding::string::encoded_len,
            11,
            &self.labels,
            buf,
        );
        encoding::btree_map::encode(
            encoding::string::encode,
            encoding::string::encoded_len,
            encoding::string::encode,
            encoding::string::encoded_len,
            12,
            &self.annotations,
            buf,
        );
        encoding::message::encode_repeated(13, &self.owner_references, buf);
        encoding::string::encode_repeated(14, &self.finalizers, buf);
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        const NAME: &str = "ObjectMeta";
        match tag {
            1 => encoding::string::merge(
                wire_type,
                self.name.get_or_insert_with(String::new),
                buf,
                ctx,
            )
            .map_err(at(NAME, "name")),
            2 => encoding::string::merge(
                wire_type,
                self.generate_name.get_or_insert_with(String::new),
                buf,
                ctx,
            )
            .map_err(at(NAME, "generate_name")),
            3 => encoding::string::merge(
                wire_type,
                self.namespace.get_or_insert_with(String::new),
                buf,
                ctx,
            )
            .map_err(at(NAME, "namespace")),
            5 => encoding::string::merge(
                wire_type,
                self.uid.get_or_insert_with(String::new),
                buf,
                ctx,
            )
            .map_err(at(NAME, "uid")),
            6 => encoding::string::merge(
                wire_type,
                self.resource_version.get_or_insert_with(String::new),
                buf,
                ctx,
            )
            .map_err(at(NAME, "resource_version")),
            7 => encoding::int64::merge(
                wire_type,
                self.generation.get_or_insert_with(Default::default),
                buf,
                ctx,
            )
            .map_err(at(NAME, "generation")),
            8 => encoding::message::merge(
                wire_type,
                self.creation_timestamp.get_or_insert_with(Default::default),
                buf,
                ctx,
            )
            .map_err(at(NAME, "creation_timestamp")),
            9 => encoding::message::merge(
                wire_type,
                self.deletion_timestamp.get_or_insert_with(Default::default),
                buf,
                ctx,
            )
            .map_err(at(NAME, "deletion_timestamp")),
            10 => encoding::int64::merge(
                wire_type,
                self.deletion_grace_period_seconds
                    .get_or_insert_with(Default::default),
                buf,
                ctx,
            )
            .map_err(at(NAME, "deletion_grace_period_seconds")),
            11 => encoding::check_wire_type(WireType::LengthDelimited, wire_type)
                .and_then(|()| {
                    encoding::btree_map::merge(
                        encoding::string::merge,
                        encoding::string::merge,
                        &mut self.labels,
                        buf,
                        ctx,
                    )
                })
                .map_err(at(NAME, "labels")),
            12 => encoding::check_wire_type(WireType::LengthDelimited, wire_type)
                .and_then(|()| {
                    encoding::btree_map::merge(
                        encoding::string::merge,
                        encoding::string::merge,
                        &mut self.annotations,
                        buf,
                        ctx,
                    )
                })
                .map_err(at(NAME, "annotations")),
            13 => encoding::message::merge_repeated(
                wire_type,
                &mut self.owner_references,
                buf,
                ctx,
            )
            .map_err(at(NAME, "owner_references")),
            14 => encoding::string::merge_repeated(wire_type, &mut self.finalizers, buf, ctx)
                .map_err(at(NAME, "finalizers")),
            _ => encoding::skip_field(wire_type, tag, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        opt_string_len(1, &self.name)
            + opt_string_len(2, &self.generate_name)
            + opt_string_len(3, &self.namespace)
            + opt_string_len(5, &self.uid)
            + opt_string_len(6, &self.resource_version)
            + opt_int64_len(7, &self.generation)
            + self
                .creation_timestamp
                .as_ref()
                .map_or(0, |v| encoding::message::encoded_len(8, v))
            + self
                .deletion_timestamp
                .as_ref()
                .map_or(0, |v| encoding::message::encoded_len(9, v))
            + opt_int64_len(10, &self.deletion_grace_period_seconds)
            + encoding::btree_map::encoded_len(
                encoding::string::encoded_len,
                encoding::string::encoded_len,
                11,
                &self.labels,
            )
            + encoding::btree_map::encoded_len(
                encoding::string::encoded_len,
                encoding::string::encoded_len,
                12,
                &self.annotations,
            )
            + encoding::message::encoded_len_repeated(13, &self.owner_references)
            + encoding::string::encoded_len_repeated(14, &self.finalizers)
    }

    fn clear(&mut self) {
        *self = ObjectMeta::default();
    }
}

impl Message for ListMeta {
    fn encode_raw(&self, buf: &mut impl BufMut) {
        if let Some(v) = &self.resource_version {
            encoding::string::encode(2, v, buf);
        }
        if let Some(v) = &self.continue_ {
            encoding::string::encode(3, v, buf);
        }
        if let Some(v) = &self.remaining_item_count {
            encoding::int64::encode(4, v, buf);
        }
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        const NAME: &str = "ListMeta";
        match tag {
            2 => encoding::string::merge(
                wire_type,
                self.resource_version.get_or_insert_with(String::new),
                buf,
                ctx,
            )
            .map_err(at(NAME, "resource_version")),
            3 => encoding::string::merge(
                wire_type,
                self.continue_.get_or_insert_with(String::new),
                buf,
                ctx,
            )
            .map_err(at(NAME, "continue")),
            4 => encoding::int64::merge(
                wire_type,
                self.remaining_item_count.get_or_insert_with(Default::default),
                buf,
                ctx,
            )
            .map_err(at(NAME, "remaining_item_count")),
            _ => encoding::skip_field(wire_type, tag, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        opt_string_len(2, &self.resource_version)
            + opt_string_len(3, &self.continue_)
            + opt_int64_len(4, &self.remaining_item_count)
    }

    fn clear(&mut self) {
        *self = ListMeta::default();
    }
}

// ─── discovery/v1 ─────────────────────────────────────────────────────────

impl Message for EndpointSlice {
    fn encode_raw(&self, buf: &mut impl BufMut) {
        encoding::message::encode(1, &self.metadata, buf);
        encoding::message::encode_repeated(2, &self.endpoints, buf);
        encoding::message::encode_repeated(3, &self.ports, buf);
        encode_str(4, self.address_type.as_str(), buf);
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        const NAME: &str = "EndpointSlice";
        match tag {
            1 => encoding::message::merge(wire_type, &mut self.metadata, buf, ctx)
                .map_err(at(NAME, "metadata")),
            2 => encoding::message::merge_repeated(wire_type, &mut self.endpoints, buf, ctx)
                .map_err(at(NAME, "endpoints")),
            3 => encoding::message::merge_repeated(wire_type, &mut self.ports, buf, ctx)
                .map_err(at(NAME, "ports")),
            4 => merge_str(wire_type, &mut self.address_type, buf, ctx)
                .map_err(at(NAME, "address_type")),
            _ => encoding::skip_field(wire_type, tag, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        encoding::message::encoded_len(1, &self.metadata)
            + encoding::message::encoded_len_repeated(2, &self.endpoints)
            + encoding::message::encoded_len_repeated(3, &self.ports)
            + str_encoded_len(4, self.address_type.as_str())
    }

    // type meta is not part of the message and survives a clear
    fn clear(&mut self) {
        self.metadata.clear();
        self.endpoints.clear();
        self.ports.clear();
        self.address_type = Default::default();
    }
}

impl Message for Endpoint {
    fn encode_raw(&self, buf: &mut impl BufMut) {
        encoding::string::encode_repeated(1, &self.addresses, buf);
        if let Some(v) = &self.conditions {
            encoding::message::encode(2, v, buf);
        }
        encoding::btree_map::encode(
            encoding::string::encode,
            encoding::string::encoded_len,
            encoding::string::encode,
            encoding::string::encoded_len,
            5,
            &self.deprecated_topology,
            buf,
        );
        if let Some(v) = &self.node_name {
            encoding::string::encode(6, v, buf);
        }
        if let Some(v) = &self.zone {
            encoding::string::encode(7, v, buf);
        }
        if let Some(v) = &self.hints {
            encoding::message::encode(8, v, buf);
        }
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        const NAME: &str = "Endpoint";
        match tag {
            1 => encoding::string::merge_repeated(wire_type, &mut self.addresses, buf, ctx)
                .map_err(at(NAME, "addresses")),
            2 => encoding::message::merge(
                wire_type,
                self.conditions.get_or_insert_with(Default::default),
                buf,
                ctx,
            )
            .map_err(at(NAME, "conditions")),
            5 => encoding::check_wire_type(WireType::LengthDelimited, wire_type)
                .and_then(|()| {
                    encoding::btree_map::merge(
                        encoding::string::merge,
                        encoding::string::merge,
                        &mut self.deprecated_topology,
                        buf,
                        ctx,
                    )
                })
                .map_err(at(NAME, "deprecated_topology")),
            6 => encoding::string::merge(
                wire_type,
                self.node_name.get_or_insert_with(String::new),
                buf,
                ctx,
            )
            .map_err(at(NAME, "node_name")),
            7 => encoding::string::merge(
                wire_type,
                self.zone.get_or_insert_with(String::new),
                buf,
                ctx,
            )
            .map_err(at(NAME, "zone")),
            8 => encoding::message::merge(
                wire_type,
                self.hints.get_or_insert_with(Default::default),
                buf,
                ctx,
            )
            .map_err(at(NAME, "hints")),
            _ => encoding::skip_field(wire_type, tag, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        encoding::string::encoded_len_repeated(1, &self.addresses)
            + self
                .conditions
                .as_ref()
                .map_or(0, |v| encoding::message::encoded_len(2, v))
            + encoding::btree_map::encoded_len(
                encoding::string::encoded_len,
                encoding::string::encoded_len,
                5,
                &self.deprecated_topology,
            )
            + opt_string_len(6, &self.node_name)
            + opt_string_len(7, &self.zone)
            + self
                .hints
                .as_ref()
                .map_or(0, |v| encoding::message::encoded_len(8, v))
    }

    fn clear(&mut self) {
        *self = Endpoint::default();
    }
}

impl Message for EndpointConditions {
    fn encode_raw(&self, buf: &mut impl BufMut) {
        if let Some(v) = &self.ready {
            encoding::bool::encode(1, v, buf);
        }
        if let Some(v) = &self.serving {
            encoding::bool::encode(2, v, buf);
        }
        if let Some(v) = &self.terminating {
            encoding::bool::encode(3, v, buf);
        }
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        const NAME: &str = "EndpointConditions";
        let (field, slot) = match tag {
            1 => ("ready", &mut self.ready),
            2 => ("serving", &mut self.serving),
            3 => ("terminating", &mut self.terminating),
            _ => return encoding::skip_field(wire_type, tag, buf, ctx),
        };
        encoding::bool::merge(wire_type, slot.get_or_insert_with(Default::default), buf, ctx)
            .map_err(at(NAME, field))
    }

    fn encoded_len(&self) -> usize {
        opt_bool_len(1, &self.ready)
            + opt_bool_len(2, &self.serving)
            + opt_bool_len(3, &self.terminating)
    }

    fn clear(&mut self) {
        *self = EndpointConditions::default();
    }
}

impl Message for EndpointPort {
    fn encode_raw(&self, buf: &mut impl BufMut) {
        if let Some(v) = &self.name {
            encoding::string::encode(1, v, buf);
        }
        if let Some(v) = &self.protocol {
            encode_str(2, v.as_str(), buf);
        }
        if let Some(v) = &self.port {
            encoding::int32::encode(3, v, buf);
        }
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        const NAME: &str = "EndpointPort";
        match tag {
            1 => encoding::string::merge(
                wire_type,
                self.name.get_or_insert_with(String::new),
                buf,
                ctx,
            )
            .map_err(at(NAME, "name")),
            2 => merge_str(
                wire_type,
                self.protocol.get_or_insert_with(Default::default),
                buf,
                ctx,
            )
            .map_err(at(NAME, "protocol")),
            3 => encoding::int32::merge(
                wire_type,
                self.port.get_or_insert_with(Default::default),
                buf,
                ctx,
            )
            .map_err(at(NAME, "port")),
            _ => encoding::skip_field(wire_type, tag, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        opt_string_len(1, &self.name)
            + self
                .protocol
                .as_ref()
                .map_or(0, |v| str_encoded_len(2, v.as_str()))
            + self
                .port
                .as_ref()
                .map_or(0, |v| encoding::int32::encoded_len(3, v))
    }

    fn clear(&mut self) {
        *self = EndpointPort::default();
    }
}

impl Message for EndpointHints {
    fn encode_raw(&self, buf: &mut impl BufMut) {
        encoding::message::encode_repeated(1, &self.for_zones, buf);
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        match tag {
            1 => encoding::message::merge_repeated(wire_type, &mut self.for_zones, buf, ctx)
                .map_err(at("EndpointHints", "for_zones")),
            _ => encoding::skip_field(wire_type, tag, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        encoding::message::encoded_len_repeated(1, &self.for_zones)
    }

    fn clear(&mut self) {
        self.for_zones.clear();
    }
}

impl Message for ForZone {
    fn encode_raw(&self, buf: &mut impl BufMut) {
        encoding::string::encode(1, &self.name, buf);
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        match tag {
            1 => encoding::string::merge(wire_type, &mut self.name, buf, ctx)
                .map_err(at("ForZone", "name")),
            _ => encoding::skip_field(wire_type, tag, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        encoding::string::encoded_len(1, &self.name)
    }

    fn clear(&mut self) {
        self.name.clear();
    }
}

impl Message for EndpointSliceList {
    fn encode_raw(&self, buf: &mut impl BufMut) {
        encoding::message::encode(1, &self.metadata, buf);
        encoding::message::encode_repeated(2, &self.items, buf);
    }

    fn merge_field(
        &mut self,
        tag: u32,
        wire_type: WireType,
        buf: &mut impl Buf,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        const NAME: &str = "EndpointSliceList";
        match tag {
            1 => encoding::message::merge(wire_type, &mut self.metadata, buf, ctx)
                .map_err(at(NAME, "metadata")),
            2 => encoding::message::merge_repeated(wire_type, &mut self.items, buf, ctx)
                .map_err(at(NAME, "items")),
            _ => encoding::skip_field(wire_type, tag, buf, ctx),
        }
    }

    fn encoded_len(&self) -> usize {
        encoding::message::encoded_len(1, &self.metadata)
            + encoding::message::encoded_len_repeated(2, &self.items)
    }

    fn clear(&mut self) {
        self.metadata.clear();
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::AddressType;
    use crate::protocol::Protocol;

    #[test]
    fn test_port_field_numbers() {
        let port = EndpointPort {
            name: Some("http".to_string()),
            protocol: Some(Protocol::TCP),
            port: Some(80),
        };
        let bytes = port.encode_to_vec();
        assert_eq!(
            bytes,
            vec![0x0a, 4, b'h', b't', b't', b'p', 0x12, 3, b'T', b'C', b'P', 0x18, 80]
        );
        assert_eq!(bytes.len(), port.encoded_len());
    }

    #[test]
    fn test_absent_fields_are_not_written() {
        assert!(EndpointPort::default().encode_to_vec().is_empty());
        assert!(EndpointConditions::default().encode_to_vec().is_empty());
        assert!(Endpoint::default().encode_to_vec().is_empty());
    }

    #[test]
    fn test_present_false_is_written() {
        let conditions = EndpointConditions {
            ready: Some(false),
            serving: None,
            terminating: Some(true),
        };
        assert_eq!(conditions.encode_to_vec(), vec![0x08, 0x00, 0x18, 0x01]);
        let back = EndpointConditions::decode(&[0x08, 0x00, 0x18, 0x01][..]).unwrap();
        assert_eq!(back, conditions);
    }

    #[test]
    fn test_required_scalars_always_written() {
        assert_eq!(ForZone::default().encode_to_vec(), vec![0x0a, 0x00]);
        // metadata (1) and addressType (4) even when empty
        assert_eq!(
            EndpointSlice::default().encode_to_vec(),
            vec![0x0a, 0x00, 0x22, 0x00]
        );
    }

    #[test]
    fn test_endpoint_field_numbers() {
        let endpoint = Endpoint {
            addresses: vec!["a".to_string()],
            conditions: Some(EndpointConditions::default()),
            node_name: Some("n".to_string()),
            zone: Some("z".to_string()),
            hints: Some(EndpointHints::default()),
            ..Default::default()
        };
        assert_eq!(
            endpoint.encode_to_vec(),
            vec![0x0a, 1, b'a', 0x12, 0, 0x32, 1, b'n', 0x3a, 1, b'z', 0x42, 0]
        );
        // empty sub-messages stay present
        let back = Endpoint::decode(endpoint.encode_to_vec().as_slice()).unwrap();
        assert_eq!(back, endpoint);
    }

    #[test]
    fn test_deprecated_topology_map() {
        let mut endpoint = Endpoint::default();
        endpoint
            .deprecated_topology
            .insert("k".to_string(), "v".to_string());
        let bytes = endpoint.encode_to_vec();
        // entry message: key (1) "k", value (2) "v"
        assert_eq!(bytes, vec![0x2a, 6, 0x0a, 1, b'k', 0x12, 1, b'v']);
        assert_eq!(Endpoint::decode(bytes.as_slice()).unwrap(), endpoint);
    }

    #[test]
    fn test_unknown_fields_are_skipped() {
        // hostname (3) and targetRef (4) exist upstream but not here
        let bytes = [0x0a, 1, b'a', 0x1a, 2, b'h', b'1', 0x22, 0x00];
        let endpoint = Endpoint::decode(&bytes[..]).unwrap();
        assert_eq!(endpoint.addresses, vec!["a".to_string()]);
        assert_eq!(endpoint.conditions, None);
    }

    #[test]
    fn test_unknown_enum_values_survive() {
        let slice = EndpointSlice {
            address_type: AddressType::from("IPX"),
            ports: vec![EndpointPort {
                protocol: Some(Protocol::from("QUIC")),
                ..Default::default()
            }],
            ..Default::default()
        };
        let back = EndpointSlice::decode(slice.encode_to_vec().as_slice()).unwrap();
        assert_eq!(back.address_type.as_str(), "IPX");
        assert_eq!(back.ports[0].protocol.as_ref().unwrap().as_str(), "QUIC");
    }

    #[test]
    fn test_malformed_port_names_field() {
        let err = EndpointPort::decode(&[0x18, 0xff][..]).unwrap_err();
        assert!(err.to_string().contains("EndpointPort.port"), "{err}");
    }

    #[test]
    fn test_wrong_wire_type_names_field() {
        // name (1) sent as a varint
        let err = EndpointPort::decode(&[0x08, 0x01][..]).unwrap_err();
        assert!(err.to_string().contains("EndpointPort.name"), "{err}");
    }

    #[test]
    fn test_nested_error_path() {
        // slice.ports[0] = { port: <truncated varint> }
        let err = EndpointSlice::decode(&[0x1a, 2, 0x18, 0xff][..]).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("EndpointPort.port"), "{text}");
        assert!(text.contains("EndpointSlice.ports"), "{text}");
    }

    #[test]
    fn test_time_parts() {
        let t = Time::from_parts(1_700_000_000, 5).unwrap();
        let back = Time::decode(t.encode_to_vec().as_slice()).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.nanos(), 5);
    }

    #[test]
    fn test_clear_keeps_type_meta() {
        let mut slice = EndpointSlice {
            type_meta: TypeMeta::of::<EndpointSlice>(),
            address_type: AddressType::IPV6,
            ..Default::default()
        };
        slice.clear();
        assert_eq!(slice.address_type, AddressType::default());
        assert_eq!(slice.type_meta.kind, "EndpointSlice");
    }
}
