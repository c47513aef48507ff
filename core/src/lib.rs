//! Fluent in-process HTTP testing for axum applications.
//!
//! # Overview
//! Tests issue simulated requests against a `Router` without binding a
//! socket, assert on status and headers, and decode the body into a typed
//! value:
//!
//! ```ignore
//! let rest = MockRest::new(app)?;
//! let user: User = rest
//!     .get("/api/v1/users/{id}", &[&id])?
//!     .with_bearer_token("T")
//!     .expect_status(StatusCode::OK)
//!     .expect_header("x-response-header", "hello")
//!     .send()?
//!     .decode_as("User")?;
//! ```
//!
//! # Design
//! - A verb call expands the URI template by position and fails right away
//!   when values are missing.
//! - Builder methods record `RequestConfigurer`s and `ResponseExpectation`s.
//!   `send` applies the configurers in order, dispatches, logs the exchange
//!   and checks the expectations in order, returning the first mismatch.
//! - Dispatch is synchronous. `RouterDispatcher` runs the router on its own
//!   current-thread runtime.
//! - Bodies go through a pluggable `Codec`; `JsonCodec` is the default.

pub mod client;
pub mod codec;
pub mod config;
pub mod configurer;
pub mod dispatcher;
pub mod error;
pub mod expectation;
pub mod http;
pub mod logger;
pub mod request;
pub mod response;
pub mod uri;

pub use client::MockRest;
pub use codec::{Codec, JsonCodec};
pub use config::MockRestConfig;
pub use configurer::RequestConfigurer;
pub use dispatcher::{Dispatcher, RequestDecorator, RouterDispatcher};
pub use error::{BoxError, CodecError, MockRestError};
pub use expectation::ResponseExpectation;
pub use http::{CapturedResponse, HttpMethod, RequestDescriptor};
pub use request::RequestBuilder;
pub use response::ResponseBuilder;
