// Copyright 2019-2020 koushiro. Licensed under MIT.

//! Static lookup tables mapping small numeric codec/rate/channel enums to
//! display strings. Read-only; callers index with an `"Unknown"` default.

/// Looks up an audio format name, e.g. `10 -> "AAC"`.
pub fn audio_format_name(format: u8) -> String {
    match format {
        0 => "Linear PCM, platform endian",
        1 => "ADPCM",
        2 => "MP3",
        3 => "Linear PCM, little endian",
        4 => "Nellymoser 16kHz mono",
        5 => "Nellymoser 8kHz mono",
        6 => "Nellymoser",
        7 => "G.711 A-law logarithmic PCM",
        8 => "G.711 mu-law logarithmic PCM",
        9 => "reserved",
        10 => "AAC",
        11 => "Speex",
        14 => "MP3 8-Khz",
        15 => "Device-specific sound",
        _ => return format!("Unknown ({})", format),
    }
    .to_string()
}

/// Looks up an audio sample rate name from the FLV-layer 2-bit enum.
pub fn audio_rate_name(rate: u8) -> String {
    match rate {
        0 => "5.5 kHz",
        1 => "11 kHz",
        2 => "22 kHz",
        3 => "44 kHz",
        _ => return "Unknown".to_string(),
    }
    .to_string()
}

/// Looks up an audio sample size name from the FLV-layer 1-bit enum.
pub fn audio_bits_name(size: u8) -> String {
    match size {
        0 => "8-bit samples",
        1 => "16-bit samples",
        _ => return "Unknown".to_string(),
    }
    .to_string()
}

/// Looks up a channel count name from the FLV-layer 1-bit enum.
pub fn audio_channels_name(kind: u8) -> String {
    match kind {
        0 => "Mono",
        1 => "Stereo",
        _ => return "Unknown".to_string(),
    }
    .to_string()
}

/// Looks up a video frame type name, e.g. `1 -> "Key frame..."`.
pub fn video_frame_type_name(frame_type: u8) -> String {
    match frame_type {
        1 => "Key frame (for AVC, a seekable frame)",
        2 => "Inter frame (for AVC, a non-seekable frame)",
        3 => "Disposable inter frame (H.263 only)",
        4 => "Generated key frame (reserved for server use only)",
        5 => "Video info/command frame",
        _ => return format!("Unknown ({})", frame_type),
    }
    .to_string()
}

/// Looks up a video codec name, e.g. `7 -> "AVC (H.264)"`.
pub fn video_codec_name(codec_id: u8) -> String {
    match codec_id {
        2 => "Sorenson H.263",
        3 => "Screen video",
        4 => "On2 VP6",
        5 => "On2 VP6 with alpha channel",
        6 => "Screen video version 2",
        7 => "AVC (H.264)",
        _ => return format!("Unknown ({})", codec_id),
    }
    .to_string()
}

/// Looks up an AAC audio object type name from the `AudioSpecificConfig` bitfield.
pub fn aac_audio_object_type_name(object_type: u32) -> String {
    match object_type {
        1 => "AAC Main",
        2 => "AAC LC (Low Complexity)",
        3 => "AAC SSR (Scalable Sample Rate)",
        4 => "AAC LTP (Long Term Prediction)",
        _ => return "Unknown".to_string(),
    }
    .to_string()
}

/// Looks up an AAC sampling frequency name from the `AudioSpecificConfig` index.
pub fn aac_sampling_frequency_name(index: u32) -> String {
    match index {
        0 => "96000 Hz",
        1 => "88200 Hz",
        2 => "64000 Hz",
        3 => "48000 Hz",
        4 => "44100 Hz",
        5 => "32000 Hz",
        6 => "24000 Hz",
        7 => "22050 Hz",
        8 => "16000 Hz",
        9 => "12000 Hz",
        10 => "11025 Hz",
        11 => "8000 Hz",
        12 => "7350 Hz",
        _ => return "Unknown".to_string(),
    }
    .to_string()
}

/// Looks up an AAC channel configuration name from the `AudioSpecificConfig` bitfield.
pub fn aac_channel_configuration_name(config: u32) -> String {
    match config {
        1 => "1 channel: Center front",
        2 => "2 channels: Left, Right",
        3 => "3 channels: Center, Left, Right",
        4 => "4 channels: Center, Left, Right, Back",
        5 => "5 channels: Center, Left, Right, Back Left, Back Right",
        6 => "6 channels (5.1): Center, L, R, BL, BR, LFE",
        7 => "8 channels (7.1): C, L, R, BL, BR, SL, SR, LFE",
        _ => return "Unknown".to_string(),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_entries_are_named() {
        assert_eq!(audio_format_name(10), "AAC");
        assert_eq!(video_codec_name(7), "AVC (H.264)");
        assert_eq!(aac_sampling_frequency_name(4), "44100 Hz");
    }

    #[test]
    fn unknown_entries_fall_back() {
        assert_eq!(audio_format_name(200), "Unknown (200)");
        assert_eq!(audio_rate_name(200), "Unknown");
        assert_eq!(aac_channel_configuration_name(200), "Unknown");
    }
}
