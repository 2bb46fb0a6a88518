use crate::error::Error;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::collections::HashMap;

pub fn extract_headers(header_map: &HeaderMap) -> HashMap<String, String> {
    // it currently ignores header values with opaque characters
    header_map
        .iter()
        .map(|(k, v)| (String::from(k.as_str()), v.to_str()))
        .filter_map(|(key, value)| value.ok().map(|v| (key, String::from(v))))
        .collect::<HashMap<_, _>>()
}

pub fn put_headers<'a, I: IntoIterator<Item = (&'a String, &'a String)>>(
    header_map: &mut HeaderMap<HeaderValue>,
    headers: I,
) -> Result<(), Error> {
    for (key, value) in headers {
        let header_name = HeaderName::from_lowercase(key.to_lowercase().as_bytes())?;
        let header_value = HeaderValue::from_str(value)?;
        header_map.insert(header_name, header_value);
    }

    Ok(())
}

/// Parses a response body as JSON, falling back to a JSON string for text
/// bodies and `null` for empty ones.
pub fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }

    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into()))
}

/// Joins a request path onto the base URL the way browsers' HTTP libraries
/// do: exactly one slash between them, and absolute URLs pass through.
pub fn combine_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    if path.is_empty() {
        return base.to_string();
    }

    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
