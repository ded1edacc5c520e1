// Copyright 2019-2020 koushiro. Licensed under MIT.

//! Header parsing and the two-pass tag walk that builds an [`FlvFile`].
//!
//! [The FLV File Format Spec](https://www.adobe.com/content/dam/acom/en/devnet/flv/video_file_format_spec_v10_1.pdf)

use crate::amf0::Amf0Value;
use crate::analysis;
use crate::error::{Error, Result};
use crate::reader::ByteReader;
use crate::tag::{AudioDetails, FlvTag, FlvTagType, ScriptDetails, TagDetails, VideoDetails};
use std::collections::BTreeMap;

const FLV_SIGNATURE: [u8; 3] = [b'F', b'L', b'V'];
pub(crate) const TAG_HEADER_SIZE: usize = 11;
pub(crate) const PREVIOUS_TAG_SIZE: usize = 4;
const ON_META_DATA: &str = "onMetaData";

/// The header of an FLV file.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FlvHeader {
    /// Signature bytes, always `F`, `L`, `V`.
    pub signature: [u8; 3],
    /// File version (1 for FLV version 1).
    pub version: u8,
    /// Whether audio tags are present (bit 2 of the flags byte).
    pub has_audio: bool,
    /// Whether video tags are present (bit 0 of the flags byte).
    pub has_video: bool,
    /// Declared header length in bytes, normally 9.
    pub header_size: u32,
}

impl FlvHeader {
    fn parse(reader: &mut ByteReader<'_>) -> Result<Self> {
        let signature = reader.read_bytes(3).ok_or(Error::DataTooShort)?;
        if signature != FLV_SIGNATURE {
            return Err(Error::InvalidSignature);
        }
        let version = reader.read_u8().ok_or(Error::DataTooShort)?;
        let flags = reader.read_u8().ok_or(Error::DataTooShort)?;
        let header_size = reader.read_u32().ok_or(Error::DataTooShort)?;

        Ok(Self {
            signature: FLV_SIGNATURE,
            version,
            has_audio: flags & 0x04 != 0,
            has_video: flags & 0x01 != 0,
            header_size,
        })
    }
}

/// The top-level result of parsing an FLV byte buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct FlvFile {
    /// Opaque identifier for the source this file was parsed from.
    pub source: String,
    /// The parsed header.
    pub header: FlvHeader,
    /// The `onMetaData` map, or empty if no such script tag was found.
    pub metadata: BTreeMap<String, Amf0Value>,
    /// The ordered tag sequence; only fully-present tags are included.
    pub tags: Vec<FlvTag>,
}

/// Parses an FLV byte buffer into an [`FlvFile`].
///
/// `source` is an opaque identifier (e.g. a file path) carried through for
/// diagnostics; it has no effect on parsing.
pub fn parse(bytes: &[u8], source: impl Into<String>) -> Result<FlvFile> {
    let source = source.into();
    let mut reader = ByteReader::new(bytes);
    let header = FlvHeader::parse(&mut reader)?;
    tracing::debug!(version = header.version, has_audio = header.has_audio, has_video = header.has_video, "parsed FLV header");

    let body_start = header.header_size as usize + PREVIOUS_TAG_SIZE;

    let metadata = locate_metadata(bytes, body_start);
    let mut tags = walk_tags(bytes, body_start, &metadata);
    analysis::analyze(&mut tags, &metadata);

    Ok(FlvFile {
        source,
        header,
        metadata,
        tags,
    })
}

/// Pass 1: scans for the first `onMetaData` script tag so pass 2's audio
/// decoder can consult `audiosamplerate`/`stereo` before the full tag
/// sequence is built.
fn locate_metadata(bytes: &[u8], body_start: usize) -> BTreeMap<String, Amf0Value> {
    let mut reader = ByteReader::new(bytes);
    reader.seek(body_start);

    loop {
        if !reader.has_remaining(TAG_HEADER_SIZE) {
            return BTreeMap::new();
        }
        let header_bytes = match reader.peek(TAG_HEADER_SIZE) {
            Some(b) => b,
            None => return BTreeMap::new(),
        };
        let tag_type_byte = header_bytes[0];
        let data_size = (u32::from(header_bytes[1]) << 16)
            | (u32::from(header_bytes[2]) << 8)
            | u32::from(header_bytes[3]);
        reader.advance(TAG_HEADER_SIZE);

        if !reader.has_remaining(data_size as usize + PREVIOUS_TAG_SIZE) {
            return BTreeMap::new();
        }

        if tag_type_byte == 18 {
            let payload = reader.read_bytes(data_size as usize).unwrap_or(&[]);
            let details = ScriptDetails::decode(payload);
            reader.advance(PREVIOUS_TAG_SIZE);
            if details.name == ON_META_DATA {
                if let Some(map) = details.value.as_map() {
                    tracing::debug!("located onMetaData script tag");
                    return map.clone();
                }
            }
        } else {
            reader.advance(data_size as usize);
            reader.advance(PREVIOUS_TAG_SIZE);
        }
    }
}

/// Pass 2: builds the full tag sequence, stopping silently at the first
/// truncated tag (state machine {Scanning, Stopped}, Stopped terminal).
fn walk_tags(
    bytes: &[u8],
    body_start: usize,
    metadata: &BTreeMap<String, Amf0Value>,
) -> Vec<FlvTag> {
    let mut reader = ByteReader::new(bytes);
    reader.seek(body_start);
    let mut tags = Vec::new();

    loop {
        let offset = reader.position();
        if !reader.has_remaining(TAG_HEADER_SIZE + PREVIOUS_TAG_SIZE) {
            if reader.remaining() > 0 {
                tracing::warn!(offset, "tag walk stopped: truncated tag header");
            }
            break;
        }

        let tag_type_byte = reader.read_u8().unwrap();
        let data_size = reader.read_u24().unwrap();
        let timestamp_low = reader.read_u24().unwrap();
        let timestamp_ext = reader.read_u8().unwrap();
        let stream_id = reader.read_u24().unwrap();
        let timestamp = (timestamp_low) | (u32::from(timestamp_ext) << 24);

        if !reader.has_remaining(data_size as usize + PREVIOUS_TAG_SIZE) {
            tracing::warn!(offset, data_size, "tag walk stopped: truncated payload");
            break;
        }

        let payload = reader.read_bytes(data_size as usize).unwrap();
        reader.advance(PREVIOUS_TAG_SIZE);

        let tag_type = FlvTagType::from_byte(tag_type_byte);
        let details = match tag_type {
            FlvTagType::Audio => TagDetails::Audio(AudioDetails::decode(payload, metadata)),
            FlvTagType::Video => TagDetails::Video(VideoDetails::decode(payload)),
            FlvTagType::Script => TagDetails::Script(ScriptDetails::decode(payload)),
            FlvTagType::Unknown(_) => TagDetails::Unknown,
        };

        tags.push(FlvTag {
            offset,
            tag_type,
            data_size,
            timestamp,
            stream_id,
            details,
            analysis: None,
        });
    }

    tags
}
