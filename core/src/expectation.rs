//! Response expectations.
//!
//! An expectation inspects a captured response and either passes or returns
//! the mismatch as an error. Expectations never touch the response. The
//! builder evaluates them in registration order and stops at the first
//! failure.

use axum::http::StatusCode;

use crate::error::MockRestError;
use crate::http::CapturedResponse;

pub trait ResponseExpectation {
    fn verify(&self, response: &CapturedResponse) -> Result<(), MockRestError>;
}

impl<F> ResponseExpectation for F
where
    F: Fn(&CapturedResponse) -> Result<(), MockRestError>,
{
    fn verify(&self, response: &CapturedResponse) -> Result<(), MockRestError> {
        self(response)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Status(pub StatusCode);

impl ResponseExpectation for Status {
    fn verify(&self, response: &CapturedResponse) -> Result<(), MockRestError> {
        if response.status == self.0 {
            return Ok(());
        }
        Err(MockRestError::StatusMismatch {
            expected: self.0.as_u16(),
            actual: response.status.as_u16(),
        })
    }
}

/// Requires a header to be present with exactly the given value.
///
/// Name lookup is done by the transport's header map; the value comparison
/// is an exact string match.
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

impl ResponseExpectation for Header {
    fn verify(&self, response: &CapturedResponse) -> Result<(), MockRestError> {
        let Some(actual) = response.header(&self.name) else {
            return Err(MockRestError::HeaderMissing {
                name: self.name.clone(),
            });
        };
        if actual.as_bytes() == self.value.as_bytes() {
            return Ok(());
        }
        Err(MockRestError::HeaderMismatch {
            name: self.name.clone(),
            expected: self.value.clone(),
            actual: String::from_utf8_lossy(actual.as_bytes()).into_owned(),
        })
    }
}
