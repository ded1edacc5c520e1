// Copyright 2019-2020 koushiro. Licensed under MIT.

//! Byte-exact rewrite paths: verbatim repair and metadata-replacing rewrite.

use crate::amf0;
use crate::amf0::Amf0Value;
use crate::error::{Error, Result};
use crate::file::{PREVIOUS_TAG_SIZE, TAG_HEADER_SIZE};
use crate::reader::ByteReader;
use crate::tag::ScriptDetails;
use crate::writer::ByteWriter;
use std::collections::BTreeMap;

const HEADER_AND_FIRST_BACK_POINTER: usize = 13;

/// Copies every fully-present tag byte-for-byte, dropping any trailing
/// truncated fragment. Structurally idempotent: repairing a structurally
/// intact file returns an equal buffer, and repairing an already-repaired
/// file is a no-op.
pub fn repair(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < HEADER_AND_FIRST_BACK_POINTER {
        return Err(Error::DataTooShort);
    }

    let mut writer = ByteWriter::with_capacity(bytes.len());
    writer.write_bytes(&bytes[..HEADER_AND_FIRST_BACK_POINTER]);

    let mut reader = ByteReader::new(bytes);
    reader.seek(HEADER_AND_FIRST_BACK_POINTER);

    loop {
        let tag_start = reader.position();
        let header = match reader.peek(TAG_HEADER_SIZE) {
            Some(h) => h,
            None => break,
        };
        let data_size = (u32::from(header[1]) << 16) | (u32::from(header[2]) << 8) | u32::from(header[3]);
        let block_len = TAG_HEADER_SIZE + data_size as usize + PREVIOUS_TAG_SIZE;

        if !reader.has_remaining(block_len) {
            tracing::warn!(offset = tag_start, "repair stopped at truncated tag");
            break;
        }

        let block = reader.read_bytes(block_len).unwrap();
        writer.write_bytes(block);
    }

    Ok(writer.into_bytes())
}

/// Copies the input, replacing the first `onMetaData` script tag's payload
/// with `replacement` re-serialized in AMF0. All other tags are copied
/// verbatim. Fails with [`Error::MetadataNotFound`] if no `onMetaData` tag
/// is observed before the tag stream is exhausted.
pub fn rewrite_metadata(bytes: &[u8], replacement: &BTreeMap<String, Amf0Value>) -> Result<Vec<u8>> {
    if bytes.len() < 9 {
        return Err(Error::DataTooShort);
    }

    let mut writer = ByteWriter::with_capacity(bytes.len());
    writer.write_bytes(&bytes[..9]);

    let mut reader = ByteReader::new(bytes);
    reader.seek(9);
    let header_size = u32::from_be_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]) as usize;
    if header_size > 9 {
        let extra = header_size - 9;
        let extra_bytes = reader.read_bytes(extra).ok_or(Error::DataTooShort)?;
        writer.write_bytes(extra_bytes);
    }

    let back_pointer = reader.read_bytes(PREVIOUS_TAG_SIZE).ok_or(Error::DataTooShort)?;
    writer.write_bytes(back_pointer);

    let mut found = false;

    loop {
        let header = match reader.peek(TAG_HEADER_SIZE) {
            Some(h) => h,
            None => break,
        };
        let tag_type_byte = header[0];
        let data_size = (u32::from(header[1]) << 16) | (u32::from(header[2]) << 8) | u32::from(header[3]);
        let block_len = TAG_HEADER_SIZE + data_size as usize + PREVIOUS_TAG_SIZE;

        if !reader.has_remaining(block_len) {
            break;
        }

        if tag_type_byte == 18 && !found {
            // `header` is peeked from the source buffer directly, so it stays
            // valid across the advances below; capture it before consuming.
            reader.advance(TAG_HEADER_SIZE);
            let payload = reader.read_bytes(data_size as usize).unwrap();
            let back_pointer = reader.read_bytes(PREVIOUS_TAG_SIZE).unwrap();

            let details = ScriptDetails::decode(payload);
            if details.name == "onMetaData" {
                found = true;
                write_on_metadata_tag(&mut writer, replacement);
                continue;
            }

            // Not onMetaData (e.g. onCuePoint/onTextData preceding onMetaData);
            // copy the header, payload and the back-pointer actually present
            // in the source verbatim, rather than recomputing the back-pointer.
            writer.write_bytes(header);
            writer.write_bytes(payload);
            writer.write_bytes(back_pointer);
            continue;
        }

        let block = reader.read_bytes(block_len).unwrap();
        writer.write_bytes(block);
    }

    if !found {
        return Err(Error::MetadataNotFound);
    }

    Ok(writer.into_bytes())
}

fn write_on_metadata_tag(writer: &mut ByteWriter, replacement: &BTreeMap<String, Amf0Value>) {
    let mut payload = ByteWriter::new();
    amf0::encode_on_metadata(&mut payload, replacement);
    let payload = payload.into_bytes();

    writer.write_u8(18); // script tag type
    writer.write_u24(payload.len() as u32);
    // Timestamp is always written as 0, per spec: 24-bit timestamp-low +
    // 8-bit timestamp-extended (the canonical split every other tag header
    // uses), not a bare 32-bit field.
    writer.write_u24(0); // timestamp low
    writer.write_u8(0); // timestamp extended
    writer.write_u24(0); // stream id
    writer.write_bytes(&payload);
    writer.write_u32((TAG_HEADER_SIZE + payload.len()) as u32);
}
