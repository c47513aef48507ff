//! In-process dispatch of request descriptors.
//!
//! # Design
//! `RouterDispatcher` drives an `axum::Router` as a tower service without
//! binding a socket. The pipeline is synchronous, so the dispatcher owns a
//! current-thread tokio runtime and blocks on each request until the full
//! response body has been collected. A route that does not match comes back
//! as an ordinary 404 response; only transport-level problems are errors.
//!
//! Blocking on the runtime panics when called from async code, so
//! `RouterDispatcher` must be used from plain `#[test]` functions.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use tokio::runtime::{Builder, Runtime};
use tower::ServiceExt;
use tracing::debug;

use crate::error::MockRestError;
use crate::http::{CapturedResponse, RequestDescriptor};

/// Hook run on the transport request right before it is handed to the
/// router. Used for changes that have to happen at dispatch time rather than
/// while the descriptor is being built.
pub type RequestDecorator<'a> = dyn Fn(&mut Request<Bytes>) + 'a;

pub trait Dispatcher {
    fn dispatch(
        &self,
        request: RequestDescriptor,
        decorator: Option<&RequestDecorator<'_>>,
    ) -> Result<CapturedResponse, MockRestError>;
}

pub struct RouterDispatcher {
    router: Router,
    runtime: Runtime,
}

impl RouterDispatcher {
    pub fn new(router: Router) -> Result<Self, MockRestError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| MockRestError::Dispatch(format!("failed to start runtime: {e}")))?;
        Ok(Self { router, runtime })
    }
}

impl Dispatcher for RouterDispatcher {
    fn dispatch(
        &self,
        request: RequestDescriptor,
        decorator: Option<&RequestDecorator<'_>>,
    ) -> Result<CapturedResponse, MockRestError> {
        let method = request.method;
        let mut http_request = request.into_http();
        if let Some(decorate) = decorator {
            decorate(&mut http_request);
        }

        let (parts, body) = http_request.into_parts();
        let sent = Arc::new(RequestDescriptor::snapshot(method, &parts, &body));
        let http_request = Request::from_parts(parts, Body::from(body));

        debug!(method = %method, uri = %sent.uri, "dispatching request");

        self.runtime.block_on(async {
            let response = self
                .router
                .clone()
                .oneshot(http_request)
                .await
                .map_err(|never| -> MockRestError { match never {} })?;

            let (parts, body) = response.into_parts();
            let body = body
                .collect()
                .await
                .map_err(|e| MockRestError::Dispatch(format!("failed to read response body: {e}")))?
                .to_bytes();

            debug!(status = parts.status.as_u16(), "request dispatched");

            Ok::<_, MockRestError>(CapturedResponse {
                status: parts.status,
                headers: parts.headers,
                body,
                request: sent,
            })
        })
    }
}
