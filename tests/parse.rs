// Copyright 2019-2020 koushiro. Licensed under MIT.

//! End-to-end scenarios driving the public API against synthetically
//! constructed FLV byte buffers (no binary fixture is bundled with this crate).

use std::collections::BTreeMap;

use flvfix::writer::ByteWriter;
use flvfix::{amf0, Amf0Value, Error, FlvTagType, TagDetails};

fn header(flags: u8) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_bytes(b"FLV");
    w.write_u8(1);
    w.write_u8(flags);
    w.write_u32(9);
    w.write_u32(0);
    w.into_bytes()
}

fn script_tag(map: &BTreeMap<String, Amf0Value>) -> Vec<u8> {
    let mut payload = ByteWriter::new();
    amf0::encode_on_metadata(&mut payload, map);
    let payload = payload.into_bytes();

    let mut w = ByteWriter::new();
    w.write_u8(18);
    w.write_u24(payload.len() as u32);
    w.write_u24(0);
    w.write_u8(0);
    w.write_u24(0);
    w.write_bytes(&payload);
    w.write_u32((11 + payload.len()) as u32);
    w.into_bytes()
}

fn video_tag(timestamp: u32, data: &[u8]) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_u8(9);
    w.write_u24(data.len() as u32);
    w.write_u24(timestamp);
    w.write_u8(0);
    w.write_u24(0);
    w.write_bytes(data);
    w.write_u32((11 + data.len()) as u32);
    w.into_bytes()
}

fn audio_tag(timestamp: u32, data: &[u8]) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.write_u8(8);
    w.write_u24(data.len() as u32);
    w.write_u24(timestamp);
    w.write_u8(0);
    w.write_u24(0);
    w.write_bytes(data);
    w.write_u32((11 + data.len()) as u32);
    w.into_bytes()
}

#[test]
fn parses_header_and_mixed_tag_stream() {
    let mut bytes = header(0b0000_0101);
    let mut metadata = BTreeMap::new();
    metadata.insert("duration".to_string(), Amf0Value::Number(12.5));
    bytes.extend_from_slice(&script_tag(&metadata));
    bytes.extend_from_slice(&audio_tag(0, &[0b1010_1111])); // AAC, 44kHz, 16-bit, stereo
    bytes.extend_from_slice(&video_tag(0, &[0x17, 0x01, 0, 0, 32])); // AVC keyframe, NALU, CTS=32

    let flv = flvfix::parse(&bytes, "mem").unwrap();
    assert!(flv.header.has_audio);
    assert!(flv.header.has_video);
    assert_eq!(flv.metadata.get("duration"), Some(&Amf0Value::Number(12.5)));
    assert_eq!(flv.tags.len(), 3);
    assert_eq!(flv.tags[0].tag_type, FlvTagType::Script);
    assert_eq!(flv.tags[1].tag_type, FlvTagType::Audio);
    assert_eq!(flv.tags[2].tag_type, FlvTagType::Video);

    match &flv.tags[2].details {
        TagDetails::Video(v) => assert_eq!(v.composition_time, Some(32)),
        other => panic!("expected video detail, got {:?}", other),
    }
}

#[test]
fn bad_signature_is_rejected() {
    let mut bytes = header(0x01);
    bytes[0] = b'X';
    assert!(matches!(
        flvfix::parse(&bytes, "mem"),
        Err(Error::InvalidSignature)
    ));
}

#[test]
fn end_to_end_dropped_frame_detection() {
    let mut bytes = header(0x01);
    let mut metadata = BTreeMap::new();
    metadata.insert("framerate".to_string(), Amf0Value::Number(25.0));
    bytes.extend_from_slice(&script_tag(&metadata));
    bytes.extend_from_slice(&video_tag(0, &[0x17]));
    bytes.extend_from_slice(&video_tag(160, &[0x27]));

    let flv = flvfix::parse(&bytes, "mem").unwrap();
    let video_tags: Vec<_> = flv
        .tags
        .iter()
        .filter(|t| t.tag_type == FlvTagType::Video)
        .collect();
    assert_eq!(video_tags[0].analysis, None);
    assert_eq!(
        video_tags[1].analysis.as_deref(),
        Some("Timestamp jump of 160ms. Possible 3 dropped frames.")
    );
}

#[test]
fn repair_drops_trailing_garbage_and_preserves_tag_sequence() {
    let mut bytes = header(0x01);
    bytes.extend_from_slice(&video_tag(0, &[0x17]));
    bytes.extend_from_slice(&audio_tag(23, &[0xAF, 0x01]));
    let intact_len = bytes.len();
    bytes.extend_from_slice(&[9, 0, 0, 1, 2]); // incomplete 11-byte tag header

    let repaired = flvfix::repair(&bytes).unwrap();
    assert_eq!(repaired, bytes[..intact_len]);

    let original = flvfix::parse(&bytes, "orig").unwrap();
    let fixed = flvfix::parse(&repaired, "fixed").unwrap();
    assert_eq!(original.tags, fixed.tags);
}

#[test]
fn rewrite_round_trip_replaces_metadata_only() {
    let mut bytes = header(0b0000_0101);
    let mut original_metadata = BTreeMap::new();
    original_metadata.insert("duration".to_string(), Amf0Value::Number(1.0));
    bytes.extend_from_slice(&script_tag(&original_metadata));
    bytes.extend_from_slice(&audio_tag(0, &[0xAF, 0x01]));
    bytes.extend_from_slice(&video_tag(0, &[0x17]));

    let mut replacement = BTreeMap::new();
    replacement.insert("duration".to_string(), Amf0Value::Number(42.0));
    replacement.insert(
        "encoder".to_string(),
        Amf0Value::String("flvfix".to_string()),
    );

    let rewritten = flvfix::rewrite_metadata(&bytes, &replacement).unwrap();
    let reparsed = flvfix::parse(&rewritten, "rewritten").unwrap();

    assert_eq!(reparsed.metadata, replacement);
    assert_eq!(reparsed.tags.len(), 3);
    assert_eq!(reparsed.tags[1].tag_type, FlvTagType::Audio);
    assert_eq!(reparsed.tags[2].tag_type, FlvTagType::Video);
}
