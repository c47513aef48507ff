//! The fluent request builder.
//!
//! Configuration methods only record configurers and expectations; nothing
//! touches the descriptor until `send`. Encoding a body is the exception: the
//! value is encoded when `body` is called, so an encoding failure stops the
//! chain before anything is dispatched.

use axum::http::{Request, StatusCode};
use bytes::Bytes;
use serde::Serialize;
use tracing::warn;

use crate::client::MockRest;
use crate::codec::Codec;
use crate::configurer::{BearerToken, Body, Header, RequestConfigurer};
use crate::dispatcher::{Dispatcher, RequestDecorator};
use crate::error::MockRestError;
use crate::expectation::{self, ResponseExpectation};
use crate::http::RequestDescriptor;
use crate::logger;
use crate::response::ResponseBuilder;

#[must_use]
pub struct RequestBuilder<'a, D, C> {
    rest: &'a MockRest<D, C>,
    request: RequestDescriptor,
    configurers: Vec<Box<dyn RequestConfigurer + 'a>>,
    expectations: Vec<Box<dyn ResponseExpectation + 'a>>,
    decorator: Option<Box<RequestDecorator<'a>>>,
}

impl<'a, D: Dispatcher, C: Codec> RequestBuilder<'a, D, C> {
    pub(crate) fn new(rest: &'a MockRest<D, C>, request: RequestDescriptor) -> Self {
        let configurers = rest
            .default_headers
            .iter()
            .cloned()
            .map(|header| Box::new(header) as Box<dyn RequestConfigurer + 'a>)
            .collect();
        Self {
            rest,
            request,
            configurers,
            expectations: Vec::new(),
            decorator: None,
        }
    }

    /// Encode `value` with the codec and send it as the request body.
    pub fn body<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, MockRestError> {
        let body = Body::encode(&self.rest.codec, value)?;
        Ok(self.configure(body))
    }

    pub fn with_header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.configure(Header::new(name, value))
    }

    pub fn with_bearer_token(self, token: impl Into<String>) -> Self {
        self.configure(BearerToken::new(token))
    }

    pub fn configure(mut self, configurer: impl RequestConfigurer + 'a) -> Self {
        self.configurers.push(Box::new(configurer));
        self
    }

    /// Run `decorator` on the transport request at dispatch time. A later
    /// call replaces an earlier one.
    pub fn with_decorator(mut self, decorator: impl Fn(&mut Request<Bytes>) + 'a) -> Self {
        self.decorator = Some(Box::new(decorator));
        self
    }

    pub fn expect_status(self, status: StatusCode) -> Self {
        self.expect(expectation::Status(status))
    }

    pub fn expect_header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.expect(expectation::Header::new(name, value))
    }

    pub fn expect(mut self, expectation: impl ResponseExpectation + 'a) -> Self {
        self.expectations.push(Box::new(expectation));
        self
    }

    /// Apply the configurers, dispatch, log the exchange and check the
    /// expectations in the order they were registered.
    pub fn send(self) -> Result<ResponseBuilder<'a, C>, MockRestError> {
        let RequestBuilder {
            rest,
            mut request,
            configurers,
            expectations,
            decorator,
        } = self;

        for configurer in &configurers {
            configurer.apply(&mut request)?;
        }

        let response = rest.dispatcher.dispatch(request, decorator.as_deref())?;

        if rest.config.log_exchanges {
            logger::log_exchange(&response);
        }

        for expectation in &expectations {
            if let Err(err) = expectation.verify(&response) {
                warn!(error = %err, "response expectation failed");
                return Err(err);
            }
        }

        Ok(ResponseBuilder::new(&rest.codec, response))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::sync::Arc;

    use axum::http::{HeaderMap, HeaderValue};
    use serde::Serializer;

    use super::*;
    use crate::codec::JsonCodec;
    use crate::config::MockRestConfig;
    use crate::http::CapturedResponse;

    /// Records dispatched requests and answers with a canned response.
    struct Recording {
        sent: RefCell<Vec<Arc<RequestDescriptor>>>,
        status: StatusCode,
        headers: HeaderMap,
    }

    impl Recording {
        fn answering(status: StatusCode) -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                status,
                headers: HeaderMap::new(),
            }
        }
    }

    impl Dispatcher for Recording {
        fn dispatch(
            &self,
            request: RequestDescriptor,
            decorator: Option<&RequestDecorator<'_>>,
        ) -> Result<CapturedResponse, MockRestError> {
            let method = request.method;
            let mut http = request.into_http();
            if let Some(decorate) = decorator {
                decorate(&mut http);
            }
            let (parts, body) = http.into_parts();
            let sent = Arc::new(RequestDescriptor::snapshot(method, &parts, &body));
            self.sent.borrow_mut().push(sent.clone());
            Ok(CapturedResponse {
                status: self.status,
                headers: self.headers.clone(),
                body: Bytes::new(),
                request: sent,
            })
        }
    }

    fn rest(dispatcher: Recording) -> MockRest<Recording, JsonCodec> {
        MockRest::with_parts(dispatcher, JsonCodec::new(), MockRestConfig::default())
    }

    struct Broken;

    impl Serialize for Broken {
        fn serialize<S: Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("broken"))
        }
    }

    #[test]
    fn configurers_apply_in_registration_order() {
        let rest = rest(Recording::answering(StatusCode::OK));
        rest.get("/things", &[])
            .unwrap()
            .with_header("x-order", "first")
            .with_header("x-order", "second")
            .send()
            .unwrap();

        let sent = rest.dispatcher.sent.borrow();
        assert_eq!(sent[0].header("x-order").unwrap(), "second");
    }

    #[test]
    fn request_header_overrides_default_header() {
        let rest = rest(Recording::answering(StatusCode::OK))
            .with_default_header("x-client", "default")
            .with_default_header("x-tenant", "melee");
        rest.get("/things", &[])
            .unwrap()
            .with_header("x-client", "custom")
            .send()
            .unwrap();

        let sent = rest.dispatcher.sent.borrow();
        assert_eq!(sent[0].header("x-client").unwrap(), "custom");
        assert_eq!(sent[0].header("x-tenant").unwrap(), "melee");
    }

    #[test]
    fn bearer_token_becomes_authorization_header() {
        let rest = rest(Recording::answering(StatusCode::OK));
        rest.get("/things", &[])
            .unwrap()
            .with_bearer_token("T")
            .send()
            .unwrap();

        assert_eq!(
            rest.dispatcher.sent.borrow()[0]
                .header("authorization")
                .unwrap(),
            "Bearer T"
        );
    }

    #[test]
    fn encoding_failure_short_circuits_before_dispatch() {
        let rest = rest(Recording::answering(StatusCode::OK));
        let result = rest.post("/things", &[]).unwrap().body(&Broken);

        assert!(matches!(result, Err(MockRestError::Codec(_))));
        assert!(rest.dispatcher.sent.borrow().is_empty());
    }

    #[test]
    fn invalid_header_fails_at_send_without_dispatch() {
        let rest = rest(Recording::answering(StatusCode::OK));
        let err = rest
            .get("/things", &[])
            .unwrap()
            .with_header("bad name", "v")
            .send()
            .unwrap_err();

        assert!(matches!(err, MockRestError::InvalidHeader { .. }));
        assert!(rest.dispatcher.sent.borrow().is_empty());
    }

    #[test]
    fn first_failing_expectation_wins() {
        let rest = rest(Recording::answering(StatusCode::IM_A_TEAPOT));
        let checked = RefCell::new(0);
        let err = rest
            .get("/things", &[])
            .unwrap()
            .expect_header("x-missing", "v")
            .expect_status(StatusCode::OK)
            .expect(|_: &CapturedResponse| {
                *checked.borrow_mut() += 1;
                Ok::<(), MockRestError>(())
            })
            .send()
            .unwrap_err();

        assert!(matches!(err, MockRestError::HeaderMissing { .. }));
        assert_eq!(*checked.borrow(), 0);
    }

    #[test]
    fn passing_expectations_return_response() {
        let mut dispatcher = Recording::answering(StatusCode::NO_CONTENT);
        dispatcher
            .headers
            .insert("x-response-header", HeaderValue::from_static("hello"));
        let rest = rest(dispatcher);
        let response = rest
            .delete("/things/{id}", &[&7])
            .unwrap()
            .expect_status(StatusCode::NO_CONTENT)
            .expect_header("x-response-header", "hello")
            .send()
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.request().uri, "/things/7");
    }

    #[test]
    fn decorator_runs_at_dispatch_time() {
        let rest = rest(Recording::answering(StatusCode::OK));
        rest.get("/things", &[])
            .unwrap()
            .with_header("x-stage", "configured")
            .with_decorator(|req: &mut Request<Bytes>| {
                req.headers_mut()
                    .insert("x-stage", HeaderValue::from_static("decorated"));
            })
            .send()
            .unwrap();

        assert_eq!(
            rest.dispatcher.sent.borrow()[0].header("x-stage").unwrap(),
            "decorated"
        );
    }

    #[test]
    fn template_errors_surface_from_verb_call() {
        let rest = rest(Recording::answering(StatusCode::OK));
        let err = rest.put("/things/{id}", &[]).err().unwrap();
        assert!(matches!(err, MockRestError::UriTemplate(ref name) if name == "id"));
    }
}
