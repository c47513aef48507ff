//! Verb entry points.
//!
//! # Design
//! `MockRest` owns the dispatcher, the codec and the settings shared by every
//! request a test makes. Each verb method expands the URI template, creates a
//! fresh `RequestDescriptor` and hands it to a `RequestBuilder` that borrows
//! the facade; nothing about one request leaks into the next.

use std::fmt::Display;

use axum::Router;

use crate::codec::{Codec, JsonCodec};
use crate::config::MockRestConfig;
use crate::configurer::Header;
use crate::dispatcher::{Dispatcher, RouterDispatcher};
use crate::error::MockRestError;
use crate::http::{HttpMethod, RequestDescriptor};
use crate::request::RequestBuilder;
use crate::uri;

/// Fluent entry point for simulated requests against an in-process app.
pub struct MockRest<D = RouterDispatcher, C = JsonCodec> {
    pub(crate) dispatcher: D,
    pub(crate) codec: C,
    pub(crate) config: MockRestConfig,
    pub(crate) default_headers: Vec<Header>,
}

impl MockRest {
    /// Facade over `router` with the JSON codec and environment settings.
    pub fn new(router: Router) -> Result<Self, MockRestError> {
        Ok(Self::with_parts(
            RouterDispatcher::new(router)?,
            JsonCodec::new(),
            MockRestConfig::from_env(),
        ))
    }
}

impl<D: Dispatcher, C: Codec> MockRest<D, C> {
    pub fn with_parts(dispatcher: D, codec: C, config: MockRestConfig) -> Self {
        Self {
            dispatcher,
            codec,
            config,
            default_headers: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: MockRestConfig) -> Self {
        self.config = config;
        self
    }

    /// Header sent with every request. Registered ahead of the request's own
    /// configurers, so `with_header` on a single request overrides it.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push(Header::new(name, value));
        self
    }

    pub fn config(&self) -> &MockRestConfig {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn get(&self, uri: &str, vars: &[&dyn Display]) -> Result<RequestBuilder<'_, D, C>, MockRestError> {
        self.request(HttpMethod::Get, uri, vars)
    }

    pub fn post(&self, uri: &str, vars: &[&dyn Display]) -> Result<RequestBuilder<'_, D, C>, MockRestError> {
        self.request(HttpMethod::Post, uri, vars)
    }

    pub fn put(&self, uri: &str, vars: &[&dyn Display]) -> Result<RequestBuilder<'_, D, C>, MockRestError> {
        self.request(HttpMethod::Put, uri, vars)
    }

    pub fn patch(&self, uri: &str, vars: &[&dyn Display]) -> Result<RequestBuilder<'_, D, C>, MockRestError> {
        self.request(HttpMethod::Patch, uri, vars)
    }

    pub fn delete(&self, uri: &str, vars: &[&dyn Display]) -> Result<RequestBuilder<'_, D, C>, MockRestError> {
        self.request(HttpMethod::Delete, uri, vars)
    }

    /// Start a request for any supported method. Fails when the template
    /// cannot be expanded with the given positional values.
    pub fn request(
        &self,
        method: HttpMethod,
        uri: &str,
        vars: &[&dyn Display],
    ) -> Result<RequestBuilder<'_, D, C>, MockRestError> {
        let uri = uri::expand(uri, vars)?;
        Ok(RequestBuilder::new(self, RequestDescriptor::new(method, uri)))
    }
}
