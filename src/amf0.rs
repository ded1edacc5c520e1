// Copyright 2019-2020 koushiro. Licensed under MIT.

//! AMF0 (Action Message Format version 0) codec, restricted to the subset this
//! crate needs: number, boolean, string and ECMA-array map. All other markers
//! are recognized on read as a best-effort placeholder and are never emitted.

use crate::reader::ByteReader;
use crate::writer::ByteWriter;
use std::collections::BTreeMap;

const MARKER_NUMBER: u8 = 0x00;
const MARKER_BOOLEAN: u8 = 0x01;
const MARKER_STRING: u8 = 0x02;
const MARKER_ECMA_ARRAY: u8 = 0x08;
const OBJECT_END_MARKER: [u8; 3] = [0x00, 0x00, 0x09];

/// A dynamic AMF0 value, restricted to the subset this crate round-trips.
#[derive(Debug, Clone, PartialEq)]
pub enum Amf0Value {
    /// Marker 0: an IEEE-754 double.
    Number(f64),
    /// Marker 1: a boolean.
    Boolean(bool),
    /// Marker 2: a UTF-8 string.
    String(String),
    /// Marker 8: an ECMA array, decoded into an ordered string-keyed map.
    ///
    /// Entry order is preserved on decode but is not semantically significant;
    /// encoders may emit entries in any deterministic order.
    Map(BTreeMap<String, Amf0Value>),
}

impl Amf0Value {
    /// Coerces this value to a string, for use where the spec expects a bare
    /// string (e.g. the script tag's name field). Non-string values yield `""`.
    pub fn as_str(&self) -> &str {
        match self {
            Amf0Value::String(s) => s,
            _ => "",
        }
    }

    /// Returns the underlying map if this value is `Amf0Value::Map`.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Amf0Value>> {
        match self {
            Amf0Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Decodes a single AMF0 value from `reader`.
///
/// Unrecognized markers are not treated as errors: the decoder returns the
/// placeholder string `"Unsupported AMF Type: <n>"` without consuming further
/// bytes, matching the legacy behavior this format's consumers rely on.
///
/// Returns `None` only when the buffer is exhausted before a required field
/// (including the marker byte itself) can be read.
pub fn decode(reader: &mut ByteReader<'_>) -> Option<Amf0Value> {
    let marker = reader.read_u8()?;
    match marker {
        MARKER_NUMBER => Some(Amf0Value::Number(reader.read_f64()?)),
        MARKER_BOOLEAN => Some(Amf0Value::Boolean(reader.read_u8()? != 0)),
        MARKER_STRING => Some(Amf0Value::String(decode_string(reader)?)),
        MARKER_ECMA_ARRAY => decode_ecma_array(reader),
        other => {
            tracing::warn!(marker = other, "unsupported AMF0 marker on decode");
            Some(Amf0Value::String(format!("Unsupported AMF Type: {}", other)))
        }
    }
}

fn decode_string(reader: &mut ByteReader<'_>) -> Option<String> {
    let len = reader.read_u16()?;
    reader.read_string(len as usize)
}

fn decode_ecma_array(reader: &mut ByteReader<'_>) -> Option<Amf0Value> {
    // The declared count is advisory: the decoder reads exactly that many
    // pairs and then unconditionally consumes the 3-byte terminator, which
    // is how well-formed FLV files are actually laid out.
    let count = reader.read_u32()?;
    let mut map = BTreeMap::new();
    for _ in 0..count {
        let key = decode_string(reader)?;
        let value = decode(reader)?;
        map.insert(key, value);
    }
    let terminator = reader.read_bytes(3)?;
    if terminator != OBJECT_END_MARKER {
        tracing::warn!("ECMA array did not end with the expected object-end marker");
    }
    Some(Amf0Value::Map(map))
}

/// Encodes the `onMetaData` script tag payload: the bare string `"onMetaData"`
/// followed by `map` serialized as an ECMA array.
pub fn encode_on_metadata(writer: &mut ByteWriter, map: &BTreeMap<String, Amf0Value>) {
    encode_string_value(writer, "onMetaData");
    encode_ecma_array(writer, map);
}

fn encode_string_value(writer: &mut ByteWriter, s: &str) {
    writer.write_u8(MARKER_STRING);
    writer.write_u16(s.len() as u16);
    writer.write_bytes(s.as_bytes());
}

fn encode_ecma_array(writer: &mut ByteWriter, map: &BTreeMap<String, Amf0Value>) {
    writer.write_u8(MARKER_ECMA_ARRAY);
    writer.write_u32(map.len() as u32);
    for (key, value) in map {
        writer.write_u16(key.len() as u16);
        writer.write_bytes(key.as_bytes());
        encode_value(writer, value);
    }
    writer.write_bytes(&OBJECT_END_MARKER);
}

fn encode_value(writer: &mut ByteWriter, value: &Amf0Value) {
    match value {
        Amf0Value::Boolean(b) => {
            writer.write_u8(MARKER_BOOLEAN);
            writer.write_u8(if *b { 1 } else { 0 });
        }
        Amf0Value::Number(n) => {
            writer.write_u8(MARKER_NUMBER);
            writer.write_f64(*n);
        }
        Amf0Value::String(s) => encode_string_value(writer, s),
        Amf0Value::Map(m) => encode_ecma_array(writer, m),
    }
}
