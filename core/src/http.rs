//! Request and response data carried through the mock pipeline.
//!
//! # Design
//! `RequestDescriptor` is the request before dispatch: it is created by a verb
//! entry point, mutated by configurers and consumed by `send`. The
//! `CapturedResponse` is what the dispatcher hands back; it is read-only and
//! keeps a shared snapshot of the request that produced it, used only for
//! logging.
//!
//! Header names are whatever the transport's `HeaderMap` says they are. This
//! layer never rewrites or normalizes names or values itself.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::request::Parts;
use axum::http::{Method, Request, StatusCode, Uri};
use bytes::Bytes;

use crate::error::MockRestError;

/// HTTP method supported by the verb entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_method(self) -> Method {
        match self {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request under construction.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Set a header, replacing any value already stored under `name`.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), MockRestError> {
        let header_name =
            HeaderName::try_from(name).map_err(|e| MockRestError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let header_value =
            HeaderValue::try_from(value).map_err(|e| MockRestError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        self.headers.insert(header_name, header_value);
        Ok(())
    }

    /// Attach an already-encoded body together with its content type.
    pub fn set_body(&mut self, body: Bytes, content_type: &str) -> Result<(), MockRestError> {
        self.set_header(header::CONTENT_TYPE.as_str(), content_type)?;
        self.body = Some(body);
        Ok(())
    }

    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    pub fn into_http(self) -> Request<Bytes> {
        let mut request = Request::new(self.body.unwrap_or_default());
        *request.method_mut() = self.method.as_method();
        *request.uri_mut() = self.uri;
        *request.headers_mut() = self.headers;
        request
    }

    /// Snapshot of a request that may have been decorated. The method is kept
    /// from the original descriptor.
    pub fn snapshot(method: HttpMethod, parts: &Parts, body: &Bytes) -> Self {
        Self {
            method,
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            body: (!body.is_empty()).then(|| body.clone()),
        }
    }
}

/// A response captured by the dispatcher.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// The request as it was dispatched.
    pub request: Arc<RequestDescriptor>,
}

impl CapturedResponse {
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// Body as text; invalid UTF-8 sequences are replaced.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn has_body(&self) -> bool {
        !self.body_text().trim().is_empty()
    }
}
