use serde_json::Value;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("couldn't read the token: {0}")]
    Io(#[from] io::Error),
    #[error("the token store lock was poisoned")]
    PoisonedLock,
    #[error("the stored token is not a valid header value")]
    Malformed,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reqwest error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("the server responded with status {status}")]
    Status { status: u16, body: Value },
    #[error("token retrieval failed: {0}")]
    Token(#[from] TokenError),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid test case: {0}")]
    InvalidTestCase(String),
    #[error("invalid url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("Invalid header name")]
    InvalidHeaderName,
    #[error("Invalid header value")]
    InvalidHeaderValue,
    #[error("IoError: {0}")]
    Io(#[from] io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl Error {
    /// The `message` field of a server error body, when the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Status { body, .. } => body.get("message").and_then(Value::as_str),
            _ => None,
        }
    }

    /// What a failed call should show the user: the server's `message` when
    /// it is truthy, with non-string values rendered as JSON text. `""`,
    /// `null`, `false` and zero count as no message.
    pub fn notification_message(&self) -> Option<String> {
        let message = match self {
            Error::Status { body, .. } => body.get("message")?,
            _ => return None,
        };

        match message {
            Value::Null | Value::Bool(false) => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            other => Some(other.to_string()),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<figment::Error> for Error {
    fn from(e: figment::Error) -> Self {
        Error::Config(Box::new(e))
    }
}

impl From<reqwest::header::InvalidHeaderName> for Error {
    fn from(_: reqwest::header::InvalidHeaderName) -> Self {
        Error::InvalidHeaderName
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(_: reqwest::header::InvalidHeaderValue) -> Self {
        Error::InvalidHeaderValue
    }
}
