mod add_header_interceptor;
mod bearer_auth_interceptor;
mod error_notification_interceptor;

pub use add_header_interceptor::AddHeaderInterceptor;
pub use bearer_auth_interceptor::BearerAuthInterceptor;
pub use error_notification_interceptor::ErrorNotificationInterceptor;

use crate::{
    error::Error, notifier::Notifier, token_store::TokenStore, RequestConfig, ResponseEnvelope,
};
use std::{fmt::Debug, sync::Arc};

/// Runs on every outgoing request, in registration order. Returning an error
/// aborts the request before it reaches the transport.
pub trait RequestInterceptor: Debug {
    fn intercept(&self, config: &mut RequestConfig) -> Result<(), Error>;
}

/// Runs on every settled request. The error hook only observes: the error is
/// always handed back to the caller afterwards.
pub trait ResponseInterceptor: Debug {
    fn on_success(&self, _response: &mut ResponseEnvelope) -> Result<(), Error> {
        Ok(())
    }

    fn on_error(&self, _error: &Error) {}
}

#[derive(Debug, Default)]
pub struct Interceptors {
    request: Vec<Box<dyn RequestInterceptor + Send + Sync>>,
    response: Vec<Box<dyn ResponseInterceptor + Send + Sync>>,
}

impl Interceptors {
    pub fn apply_request(&self, config: &mut RequestConfig) -> Result<(), Error> {
        for interceptor in &self.request {
            interceptor.intercept(config)?;
        }
        Ok(())
    }

    pub fn apply_success(&self, response: &mut ResponseEnvelope) -> Result<(), Error> {
        for interceptor in &self.response {
            interceptor.on_success(response)?;
        }
        Ok(())
    }

    pub fn apply_error(&self, error: &Error) {
        for interceptor in &self.response {
            interceptor.on_error(error);
        }
    }
}

pub struct InterceptorsBuilder {
    interceptors: Interceptors,
}

impl InterceptorsBuilder {
    pub(crate) fn new() -> Self {
        Self {
            interceptors: Interceptors::default(),
        }
    }

    pub fn bearer_auth(&mut self, token_store: Arc<dyn TokenStore + Send + Sync>) -> &mut Self {
        self.add_request_interceptor(BearerAuthInterceptor::new(token_store))
    }

    pub fn add_header<S1: Into<String>, S2: Into<String>>(
        &mut self,
        header_name: S1,
        header_value: S2,
    ) -> &mut Self {
        self.add_request_interceptor(AddHeaderInterceptor::new(header_name, header_value))
    }

    pub fn notify_errors(&mut self, notifier: Arc<dyn Notifier + Send + Sync>) -> &mut Self {
        self.add_response_interceptor(ErrorNotificationInterceptor::new(notifier))
    }

    pub fn notify_errors_with_fallback<S: Into<String>>(
        &mut self,
        notifier: Arc<dyn Notifier + Send + Sync>,
        fallback_message: S,
    ) -> &mut Self {
        self.add_response_interceptor(
            ErrorNotificationInterceptor::new(notifier).with_fallback_message(fallback_message),
        )
    }

    pub fn add_request_interceptor<RI: RequestInterceptor + Send + Sync + 'static>(
        &mut self,
        interceptor: RI,
    ) -> &mut Self {
        self.interceptors.request.push(Box::new(interceptor));
        self
    }

    pub fn add_response_interceptor<RI: ResponseInterceptor + Send + Sync + 'static>(
        &mut self,
        interceptor: RI,
    ) -> &mut Self {
        self.interceptors.response.push(Box::new(interceptor));
        self
    }

    pub fn build(self) -> Interceptors {
        self.interceptors
    }
}

impl Default for InterceptorsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
