use super::ResponseInterceptor;
use crate::{error::Error, notifier::Notifier, settings::DEFAULT_FALLBACK_ERROR_MESSAGE};
use std::sync::Arc;

/// Shows the server's `message` (or a fixed fallback) for every failed call.
#[derive(Debug)]
pub struct ErrorNotificationInterceptor {
    notifier: Arc<dyn Notifier + Send + Sync>,
    fallback_message: String,
}

impl ErrorNotificationInterceptor {
    pub fn new(notifier: Arc<dyn Notifier + Send + Sync>) -> Self {
        Self {
            notifier,
            fallback_message: DEFAULT_FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn with_fallback_message<S: Into<String>>(mut self, message: S) -> Self {
        self.fallback_message = message.into();
        self
    }
}

impl ResponseInterceptor for ErrorNotificationInterceptor {
    fn on_error(&self, error: &Error) {
        match error.notification_message() {
            Some(message) => self.notifier.error(&message),
            None => self.notifier.error(&self.fallback_message),
        }
    }
}
