// Copyright 2019-2020 koushiro. Licensed under MIT.

mod audio;
mod script;
mod video;

pub use self::audio::AudioDetails;
pub use self::script::ScriptDetails;
pub use self::video::VideoDetails;

/// The type of an FLV tag.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FlvTagType {
    /// Audio tag type, 8.
    Audio,
    /// Video tag type, 9.
    Video,
    /// Script tag type, 18.
    Script,
    /// Any other value; carried for diagnostics, never produced on rewrite.
    Unknown(u8),
}

impl FlvTagType {
    pub(crate) fn from_byte(b: u8) -> Self {
        match b {
            8 => FlvTagType::Audio,
            9 => FlvTagType::Video,
            18 => FlvTagType::Script,
            other => FlvTagType::Unknown(other),
        }
    }
}

/// The decoded detail variant for a tag, tagged by the tag's type.
#[derive(Clone, Debug, PartialEq)]
pub enum TagDetails {
    /// Audio tag detail fields.
    Audio(AudioDetails),
    /// Video tag detail fields.
    Video(VideoDetails),
    /// Script tag detail fields.
    Script(ScriptDetails),
    /// A tag type this crate does not interpret.
    Unknown,
}

/// A single parsed FLV tag: header fields plus decoded payload details.
#[derive(Clone, Debug, PartialEq)]
pub struct FlvTag {
    /// Byte offset in the source buffer where this tag's 11-byte header begins.
    pub offset: usize,
    /// The tag's type.
    pub tag_type: FlvTagType,
    /// Declared payload size, 24 bits.
    pub data_size: u32,
    /// Timestamp in milliseconds, assembled from the 3+1 byte split.
    pub timestamp: u32,
    /// Stream id, 24 bits; always 0 in conformant files.
    pub stream_id: u32,
    /// Decoded payload details.
    pub details: TagDetails,
    /// Populated by the timestamp-gap analyzer; only ever set on video tags.
    pub analysis: Option<String>,
}
