//! Body codecs.
//!
//! # Design
//! A `Codec` turns typed values into request bytes and response bytes back
//! into typed values. Encoding either produces the complete byte buffer or an
//! error; callers never see a partially written body. Decode failures carry
//! the offending payload so assertion messages can show it.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;

/// Pluggable encode/decode engine for request and response bodies.
pub trait Codec {
    /// Content type set on requests whose body this codec encoded.
    fn content_type(&self) -> &'static str;

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes, CodecError>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// JSON codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec that indents encoded bodies, easier to read in request logs.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes, CodecError> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        encoded
            .map(Bytes::from)
            .map_err(CodecError::encode)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(bytes)
            .map_err(|source| CodecError::decode(String::from_utf8_lossy(bytes), source))
    }
}
