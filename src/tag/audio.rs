// Copyright 2019-2020 koushiro. Licensed under MIT.

use crate::amf0::Amf0Value;
use crate::bits::BitReader;
use crate::constants;
use std::collections::BTreeMap;

/// Decoded detail fields for an audio tag's payload.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioDetails {
    /// Display name of the sound format, e.g. `"AAC"`.
    pub format: String,
    /// Display name of the sample rate, e.g. `"44 kHz"` or an AAC-derived override.
    pub sample_rate: String,
    /// Display name of the sample size, e.g. `"16-bit samples"`.
    pub sample_size: String,
    /// Display name of the channel count, e.g. `"Stereo"`.
    pub channels: String,
    /// `"AAC sequence header"` / `"AAC raw"`, present only for AAC payloads.
    pub aac_packet_type: Option<String>,
    /// AAC audio object type name, present only for AAC sequence headers.
    pub aac_object_type: Option<String>,
}

impl AudioDetails {
    /// The sentinel used for an empty audio payload.
    fn empty() -> Self {
        Self {
            format: "Empty".to_string(),
            sample_rate: String::new(),
            sample_size: String::new(),
            channels: String::new(),
            aac_packet_type: None,
            aac_object_type: None,
        }
    }

    /// Decodes the audio detail fields for a tag payload.
    ///
    /// `metadata` is the file's `onMetaData` map (or empty), consulted as a
    /// fallback for sample rate and channel count per the precedence chain:
    /// AAC-derived value > global metadata value > FLV-flag-byte enum.
    pub fn decode(payload: &[u8], metadata: &BTreeMap<String, Amf0Value>) -> Self {
        if payload.is_empty() {
            return Self::empty();
        }

        let flags = payload[0];
        let format_id = (flags & 0xF0) >> 4;
        let rate_id = (flags & 0x0C) >> 2;
        let size_id = (flags & 0x02) >> 1;
        let channel_id = flags & 0x01;

        let format = constants::audio_format_name(format_id);

        let mut sample_rate = metadata
            .get("audiosamplerate")
            .and_then(metadata_as_hz)
            .unwrap_or_else(|| constants::audio_rate_name(rate_id));
        let mut channels = metadata
            .get("stereo")
            .and_then(metadata_as_stereo)
            .unwrap_or_else(|| constants::audio_channels_name(channel_id));
        let sample_size = constants::audio_bits_name(size_id);

        let mut aac_packet_type = None;
        let mut aac_object_type = None;

        if format_id == 10 && payload.len() >= 2 {
            let packet_type = payload[1];
            aac_packet_type = Some(if packet_type == 0 {
                "AAC sequence header".to_string()
            } else {
                "AAC raw".to_string()
            });

            if packet_type == 0 && payload.len() >= 4 {
                let mut bits = BitReader::new(&payload[2..]);
                if let (Some(object_type), Some(rate_index), Some(channel_config)) =
                    (bits.read(5), bits.read(4), bits.read(4))
                {
                    aac_object_type = Some(constants::aac_audio_object_type_name(object_type));
                    sample_rate = constants::aac_sampling_frequency_name(rate_index);
                    channels = constants::aac_channel_configuration_name(channel_config);
                }
            }
        }

        Self {
            format,
            sample_rate,
            sample_size,
            channels,
            aac_packet_type,
            aac_object_type,
        }
    }
}

fn metadata_as_hz(value: &Amf0Value) -> Option<String> {
    match value {
        Amf0Value::Number(n) => Some(format!("{} Hz", *n as i64)),
        _ => None,
    }
}

fn metadata_as_stereo(value: &Amf0Value) -> Option<String> {
    match value {
        Amf0Value::Boolean(b) => Some(if *b { "Stereo" } else { "Mono" }.to_string()),
        _ => None,
    }
}
