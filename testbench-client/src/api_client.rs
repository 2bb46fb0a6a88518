use crate::{
    error::{Error, Result},
    http_client::{HttpClient, ReqwestHttpClient},
    interceptors::{Interceptors, InterceptorsBuilder},
    notifier::Notifier,
    settings::ApiSettings,
    token_store::TokenStore,
    util, RequestConfig,
};
use serde::Serialize;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use url::Url;

/// Builder used to build an ApiClient instance
#[derive(Default)]
pub struct ApiClientBuilder {
    settings: ApiSettings,
    http_client: Option<Arc<dyn HttpClient + Send + Sync>>,
    interceptors: InterceptorsBuilder,
}

impl ApiClientBuilder {
    /// Create a new ApiClientBuilder with the default settings (`/api`, 10 seconds).
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all settings at once, e.g. with the output of a `SettingsLoader`.
    pub fn with_settings(mut self, settings: ApiSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Use the given base URL when building an ApiClient instance.
    ///
    /// # Arguments
    /// `base_url` - a path resolved against the origin, or an absolute URL.
    ///
    /// # Returns
    /// This builder.
    pub fn with_base_url<T: Into<String>>(mut self, base_url: T) -> Self {
        self.settings.base_url = base_url.into();
        self
    }

    pub fn with_origin<T: Into<String>>(mut self, origin: T) -> Self {
        self.settings.origin = origin.into();
        self
    }

    /// Use the given timeout for every request that doesn't override it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Use the given transport instead of the default reqwest one.
    ///
    /// # Arguments
    /// `http_client` - any `HttpClient` implementation. The timeout and user
    ///     agent settings are then up to that transport.
    ///
    /// # Returns
    /// This builder.
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient + Send + Sync>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Register interceptors. May be called more than once; interceptors run
    /// in registration order.
    pub fn with_interceptors<F: FnOnce(&mut InterceptorsBuilder) -> &mut InterceptorsBuilder>(
        mut self,
        func: F,
    ) -> Self {
        let _ = func(&mut self.interceptors);
        self
    }

    /// Consume the builder and create an ApiClient instance using all of the
    /// previously configured values or their defaults.
    ///
    /// # Returns
    /// An ApiClient, or an error when the settings are invalid or the
    /// transport can't be created.
    pub fn build(self) -> Result<ApiClient> {
        self.settings.validate()?;
        let base_url = self.settings.resolved_base_url()?;

        let http = match self.http_client {
            Some(http) => http,
            None => Arc::new(ReqwestHttpClient::new(
                self.settings.timeout(),
                &self.settings.user_agent,
            )?),
        };

        Ok(ApiClient {
            base_url,
            http,
            interceptors: Arc::new(self.interceptors.build()),
        })
    }
}

/// Client for the test-platform backend. Build it once at startup and clone
/// it wherever it is needed; clones share the transport and interceptors.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: Arc<dyn HttpClient + Send + Sync>,
    interceptors: Arc<Interceptors>,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }

    /// The standard wiring: bearer auth from `token_store` and error
    /// notifications through `notifier`.
    pub fn from_settings(
        settings: ApiSettings,
        token_store: Arc<dyn TokenStore + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
    ) -> Result<Self> {
        let fallback_message = settings.fallback_error_message.clone();

        ApiClientBuilder::new()
            .with_settings(settings)
            .with_interceptors(|interceptors| {
                interceptors
                    .bearer_auth(token_store)
                    .notify_errors_with_fallback(notifier, fallback_message)
            })
            .build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Runs the request through the interceptors and the transport and
    /// resolves to the response body only. Every failure, local or remote,
    /// is shown to the response interceptors before being returned.
    pub async fn send(&self, config: RequestConfig) -> Result<Value> {
        match self.dispatch(config).await {
            Ok(body) => Ok(body),
            Err(error) => Err(self.reject(error)),
        }
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.send(RequestConfig::get(path)).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value> {
        let body = match serde_json::to_value(body) {
            Ok(body) => body,
            Err(e) => return Err(self.reject(e.into())),
        };

        self.send(RequestConfig::post(path).with_json(body)).await
    }

    /// Hands an error raised outside the pipeline to the response interceptors.
    pub(crate) fn reject(&self, error: Error) -> Error {
        self.interceptors.apply_error(&error);
        error
    }

    async fn dispatch(&self, mut config: RequestConfig) -> Result<Value> {
        self.interceptors.apply_request(&mut config)?;

        let url = util::combine_url(self.base_url.as_str(), &config.url);
        let url = Url::parse(&url).map_err(|source| Error::InvalidUrl { url, source })?;

        tracing::debug!(method = %config.method, url = %url, "dispatching request");
        let mut response = self.http.send(&url, &config).await?;

        if !response.is_success() {
            tracing::warn!(status = response.status_code, url = %url, "request failed");
            return Err(Error::Status {
                status: response.status_code,
                body: response.body,
            });
        }

        self.interceptors.apply_success(&mut response)?;
        Ok(response.into_body())
    }
}
