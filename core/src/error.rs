//! Error types for the mock REST pipeline.
//!
//! # Design
//! Every failure a test can hit lands in `MockRestError`. Construction errors
//! (URI expansion, body encoding, header validation) are returned by the call
//! that caused them; expectation mismatches are returned by `send`; decoding
//! failures are returned when the body is accessed. The `Display` output of the
//! mismatch and decoding variants is the assertion message tests match on, so
//! its wording is fixed.

use std::error::Error as StdError;

use thiserror::Error;

/// Underlying failure reported by a codec engine.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Errors raised by a `Codec` while encoding or decoding a body.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value could not be encoded. Nothing was written.
    #[error("failed to encode value: {source}")]
    Encode {
        #[source]
        source: BoxError,
    },

    /// The payload could not be decoded into the requested type.
    #[error("failed to decode payload: {source}: {payload}")]
    Decode {
        payload: String,
        #[source]
        source: BoxError,
    },
}

impl CodecError {
    pub fn encode(source: impl Into<BoxError>) -> Self {
        CodecError::Encode {
            source: source.into(),
        }
    }

    pub fn decode(payload: impl Into<String>, source: impl Into<BoxError>) -> Self {
        CodecError::Decode {
            payload: payload.into(),
            source: source.into(),
        }
    }

    /// Raw payload that failed to decode, if any.
    pub fn payload(&self) -> Option<&str> {
        match self {
            CodecError::Decode { payload, .. } => Some(payload),
            CodecError::Encode { .. } => None,
        }
    }
}

/// Errors returned by `MockRest`, `RequestBuilder` and `ResponseBuilder`.
#[derive(Debug, Error)]
pub enum MockRestError {
    /// The URI template has more placeholders than positional values.
    #[error("Not enough variable values available to expand '{0}'")]
    UriTemplate(String),

    /// The expanded URI could not be parsed.
    #[error("Invalid URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    /// A header name or value was rejected by the transport.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// The request body could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Response status expected:<{expected}> but was:<{actual}>")]
    StatusMismatch { expected: u16, actual: u16 },

    #[error("Expected header '{name}' but it was not found")]
    HeaderMissing { name: String },

    #[error("Expected header '{name}' value '{expected}', but was '{actual}'")]
    HeaderMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// A custom expectation failed with its own message.
    #[error("{0}")]
    Expectation(String),

    /// The response body could not be decoded into the named type.
    #[error("Failed to parse response body to {type_name}: {body}")]
    Decode {
        type_name: String,
        body: String,
        #[source]
        source: CodecError,
    },

    #[error("Expected no body, but response contained: {0}")]
    UnexpectedBody(String),

    /// The in-process transport could not carry the request.
    #[error("dispatch failed: {0}")]
    Dispatch(String),
}

impl MockRestError {
    /// True for status and header mismatches, including custom expectations.
    pub fn is_expectation_failure(&self) -> bool {
        matches!(
            self,
            MockRestError::StatusMismatch { .. }
                | MockRestError::HeaderMissing { .. }
                | MockRestError::HeaderMismatch { .. }
                | MockRestError::Expectation(_)
        )
    }
}
