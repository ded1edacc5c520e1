// Copyright 2019-2020 koushiro. Licensed under MIT.

//! A parser, analyzer and byte-exact rewriter for Flash Video (FLV) container
//! files.
//!
//! Given an FLV byte buffer, [`parse`] decodes the header, walks the tag
//! stream, and interprets the `onMetaData` script tag (if present) via the
//! [`amf0`] codec. [`analysis::analyze`] flags timestamp discontinuities that
//! likely indicate dropped frames. [`repair`] produces a byte-exact copy that
//! preserves every recognized tag boundary; [`rewrite_metadata`] emits a copy
//! with the `onMetaData` tag replaced by a caller-supplied map.
//!
//! [The FLV File Format Spec](https://www.adobe.com/content/dam/acom/en/devnet/flv/video_file_format_spec_v10_1.pdf)

pub mod amf0;
pub mod analysis;
pub mod bits;
pub mod constants;
pub mod error;
pub mod file;
pub mod reader;
pub mod rewrite;
pub mod tag;
pub mod writer;

pub use crate::amf0::Amf0Value;
pub use crate::error::{Error, Result};
pub use crate::file::{parse, FlvFile, FlvHeader};
pub use crate::rewrite::{repair, rewrite_metadata};
pub use crate::tag::{AudioDetails, FlvTag, FlvTagType, ScriptDetails, TagDetails, VideoDetails};
