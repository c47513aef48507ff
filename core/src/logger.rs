//! Diagnostic request/response logging.
//!
//! Renders what went over the in-process wire so a failing test shows the
//! exchange. A header or body that cannot be rendered is reported at `error`
//! level and replaced by a placeholder line; the rest of the exchange is
//! still logged and nothing reaches the caller.

use std::str;

use axum::http::HeaderMap;
use tracing::{error, info};

use crate::http::{CapturedResponse, RequestDescriptor};

pub fn log_exchange(response: &CapturedResponse) {
    info!("------------ REQUEST DETAILS -----------");
    log_request(&response.request);
    info!("----------- RESPONSE DETAILS -----------");
    log_response(response);
    info!("----- END REQUEST/RESPONSE LOGGING -----");
}

pub fn log_request(request: &RequestDescriptor) {
    request_lines(request).iter().for_each(|line| info!("{line}"));
}

pub fn log_response(response: &CapturedResponse) {
    response_lines(response).iter().for_each(|line| info!("{line}"));
}

fn request_lines(request: &RequestDescriptor) -> Vec<String> {
    let mut lines = vec![format!("HTTP {} {}", request.method, request.uri.path())];
    if let Some(query) = request.uri.query() {
        lines.push(format!("   ? {query}"));
    }
    push_headers(&mut lines, &request.headers);
    push_body(&mut lines, request.body.as_deref().unwrap_or_default());
    lines
}

fn response_lines(response: &CapturedResponse) -> Vec<String> {
    let mut lines = vec![format!("HTTP STATUS {}", response.status.as_u16())];
    push_headers(&mut lines, &response.headers);
    push_body(&mut lines, &response.body);
    lines
}

/// An unprintable value replaces only its own line.
fn push_headers(lines: &mut Vec<String>, headers: &HeaderMap) {
    lines.push("   Headers:".to_string());
    for (name, value) in headers {
        match value.to_str() {
            Ok(value) => lines.push(format!("      {name}: {value}")),
            Err(e) => {
                error!("Failed to log header '{name}': {e}");
                lines.push(format!("      {name}: <unprintable, {} bytes>", value.len()));
            }
        }
    }
}

fn push_body(lines: &mut Vec<String>, body: &[u8]) {
    lines.push("   Body:".to_string());
    match str::from_utf8(body) {
        Ok(text) if text.trim().is_empty() => {}
        Ok(text) => lines.push(format!("      {text}")),
        Err(e) => {
            error!("Failed to log body: {e}");
            lines.push(format!("      <non-UTF-8 body, {} bytes>", body.len()));
        }
    }
}
