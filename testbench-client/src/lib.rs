mod api_client;
mod data;
mod error;
mod form;
mod http_client;
mod notifier;
mod settings;
mod token_store;
mod util;

pub mod interceptors;

pub use api_client::{ApiClient, ApiClientBuilder};
pub use data::{RequestBody, RequestConfig, ResponseEnvelope};
pub use error::{Error, Result, TokenError};
pub use form::{FieldValue, FormField, FormPayload};
pub use http_client::{HttpClient, ReqwestHttpClient};
pub use notifier::{Notifier, RecordingNotifier, TracingNotifier};
pub use settings::{ApiSettings, SettingsLoader, DEFAULT_FALLBACK_ERROR_MESSAGE};
pub use token_store::{FileTokenStore, MemoryTokenStore, StaticTokenStore, TokenStore};
pub use unit_test::{ExcelFile, PlotDetails, PlotRecord, TestCase, TestSummary, UnitTestReport};
