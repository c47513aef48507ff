//! URI template expansion.
//!
//! Placeholders look like `{name}` and are filled strictly by position: the
//! n-th placeholder takes the n-th value whatever its name. Substituted values
//! are percent-encoded. Values left over once every placeholder is filled are
//! ignored.

use std::fmt::Display;

use axum::http::Uri;

use crate::error::MockRestError;

pub fn expand(template: &str, vars: &[&dyn Display]) -> Result<Uri, MockRestError> {
    let mut expanded = String::with_capacity(template.len());
    let mut values = vars.iter();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };
        expanded.push_str(&rest[..open]);

        // `{id:[0-9]+}` names the variable `id`.
        let name = rest[open + 1..close]
            .split(':')
            .next()
            .unwrap_or_default()
            .trim();
        let value = values
            .next()
            .ok_or_else(|| MockRestError::UriTemplate(name.to_string()))?;
        expanded.push_str(&urlencoding::encode(&value.to_string()));

        rest = &rest[close + 1..];
    }
    expanded.push_str(rest);

    expanded
        .parse::<Uri>()
        .map_err(|e| MockRestError::InvalidUri {
            uri: expanded.clone(),
            reason: e.to_string(),
        })
}
