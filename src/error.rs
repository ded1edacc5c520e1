// Copyright 2019-2020 koushiro. Licensed under MIT.

/// Type alias to use this library's [`Error`] type in a `Result`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors generated from this library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The first three bytes of the input are not `F`, `L`, `V`.
    #[error("invalid FLV signature")]
    InvalidSignature,
    /// A bounds-checked read on a required field would exceed the buffer.
    #[error("input is too short to contain a complete FLV file")]
    DataTooShort,
    /// `rewrite_metadata` walked the whole tag stream without finding an `onMetaData` script tag.
    #[error("no onMetaData script tag found")]
    MetadataNotFound,
}
