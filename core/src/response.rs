//! Access to a captured response.
//!
//! # Design
//! `ResponseBuilder` is what `send` returns once every expectation passed.
//! Decoding is deferred until the test asks for it, and the caller names the
//! target type explicitly so the failure message reads the same whatever the
//! type's path is:
//!
//! ```text
//! Failed to parse response body to User: <raw body>
//! ```

use std::borrow::Cow;

use axum::http::{HeaderMap, StatusCode};
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::codec::Codec;
use crate::error::MockRestError;
use crate::http::{CapturedResponse, RequestDescriptor};

#[derive(Debug)]
pub struct ResponseBuilder<'a, C> {
    codec: &'a C,
    response: CapturedResponse,
}

impl<'a, C: Codec> ResponseBuilder<'a, C> {
    pub(crate) fn new(codec: &'a C, response: CapturedResponse) -> Self {
        Self { codec, response }
    }

    pub fn status(&self) -> StatusCode {
        self.response.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.response.headers
    }

    /// Header value as a string, if present and printable.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.response.header(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.response.body
    }

    pub fn text(&self) -> Cow<'_, str> {
        self.response.body_text()
    }

    /// The request as it was dispatched.
    pub fn request(&self) -> &RequestDescriptor {
        &self.response.request
    }

    pub fn into_inner(self) -> CapturedResponse {
        self.response
    }

    /// Decode the body into `T`. `type_name` only appears in the error.
    ///
    /// An empty body never decodes; use `decode_void` or `decode_optional`
    /// for endpoints that may answer without one.
    pub fn decode_as<T: DeserializeOwned>(&self, type_name: &str) -> Result<T, MockRestError> {
        self.codec
            .decode(&self.response.body)
            .map_err(|source| MockRestError::Decode {
                type_name: type_name.to_string(),
                body: self.response.body_text().into_owned(),
                source,
            })
    }

    /// Decode into "no value". Always succeeds; whatever body there is gets
    /// discarded.
    pub fn decode_void(&self) -> Result<(), MockRestError> {
        Ok(())
    }

    /// `None` for an empty or blank body, otherwise the same as `decode_as`.
    pub fn decode_optional<T: DeserializeOwned>(
        &self,
        type_name: &str,
    ) -> Result<Option<T>, MockRestError> {
        if !self.response.has_body() {
            return Ok(None);
        }
        self.decode_as(type_name).map(Some)
    }

    /// Fails when the response carries a non-blank body.
    pub fn expect_no_body(&self) -> Result<(), MockRestError> {
        if self.response.has_body() {
            return Err(MockRestError::UnexpectedBody(
                self.response.body_text().into_owned(),
            ));
        }
        Ok(())
    }
}
