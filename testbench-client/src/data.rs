use crate::form::FormPayload;
use reqwest::Method;
use serde_json::Value;
use std::{collections::HashMap, time::Duration};

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Form(FormPayload),
}

/// Everything needed to dispatch one request. Interceptors may change any of
/// it before the transport sees it.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Path relative to the client's base URL, or an absolute URL that
    /// bypasses it.
    pub url: String,
    pub method: Method,
    pub headers: HashMap<String, String>,
    pub body: RequestBody,
    /// Overrides the client-wide timeout for this request only.
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    pub fn new<S: Into<String>>(method: Method, url: S) -> Self {
        Self {
            url: url.into(),
            method,
            headers: HashMap::new(),
            body: RequestBody::Empty,
            timeout: None,
        }
    }

    pub fn get<S: Into<String>>(url: S) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post<S: Into<String>>(url: S) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn with_form(mut self, form: FormPayload) -> Self {
        self.body = RequestBody::Form(form);
        self
    }

    pub fn with_header<S1: Into<String>, S2: Into<String>>(mut self, name: S1, value: S2) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: Value,
}

impl ResponseEnvelope {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}
