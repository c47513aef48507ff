//! Request configurers.
//!
//! A configurer mutates a pending `RequestDescriptor`. The builder keeps them
//! in registration order and applies all of them right before dispatch.
//! Closures with the right signature are configurers too.

use axum::http::header;
use bytes::Bytes;
use serde::Serialize;

use crate::codec::Codec;
use crate::error::MockRestError;
use crate::http::RequestDescriptor;

pub trait RequestConfigurer {
    fn apply(&self, request: &mut RequestDescriptor) -> Result<(), MockRestError>;
}

impl<F> RequestConfigurer for F
where
    F: Fn(&mut RequestDescriptor) -> Result<(), MockRestError>,
{
    fn apply(&self, request: &mut RequestDescriptor) -> Result<(), MockRestError> {
        self(request)
    }
}

/// Sets an encoded body and its content type.
///
/// The value is encoded when the configurer is created, so an encoding
/// failure is reported before anything is dispatched.
#[derive(Debug, Clone)]
pub struct Body {
    bytes: Bytes,
    content_type: &'static str,
}

impl Body {
    pub fn encode<C, T>(codec: &C, value: &T) -> Result<Self, MockRestError>
    where
        C: Codec,
        T: Serialize + ?Sized,
    {
        Ok(Self {
            bytes: codec.encode(value)?,
            content_type: codec.content_type(),
        })
    }
}

impl RequestConfigurer for Body {
    fn apply(&self, request: &mut RequestDescriptor) -> Result<(), MockRestError> {
        request.set_body(self.bytes.clone(), self.content_type)
    }
}

/// Sets a header, overwriting any earlier value with the same name.
#[derive(Debug, Clone)]
pub struct Header {
    name: String,
    value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl RequestConfigurer for Header {
    fn apply(&self, request: &mut RequestDescriptor) -> Result<(), MockRestError> {
        request.set_header(&self.name, &self.value)
    }
}

/// Sets `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl RequestConfigurer for BearerToken {
    fn apply(&self, request: &mut RequestDescriptor) -> Result<(), MockRestError> {
        request.set_header(header::AUTHORIZATION.as_str(), &format!("Bearer {}", self.0))
    }
}
