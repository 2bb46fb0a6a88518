use super::RequestInterceptor;
use crate::{error::Error, token_store::TokenStore, RequestConfig};
use std::sync::Arc;

const AUTHORIZATION: &str = "Authorization";

/// Adds `Authorization: Bearer <token>` whenever the store has a non-empty token.
#[derive(Debug)]
pub struct BearerAuthInterceptor {
    token_store: Arc<dyn TokenStore + Send + Sync>,
}

impl BearerAuthInterceptor {
    pub fn new(token_store: Arc<dyn TokenStore + Send + Sync>) -> Self {
        Self { token_store }
    }
}

impl RequestInterceptor for BearerAuthInterceptor {
    fn intercept(&self, config: &mut RequestConfig) -> Result<(), Error> {
        if let Some(token) = self.token_store.get_token()?.filter(|t| !t.is_empty()) {
            config
                .headers
                .retain(|key, _| !key.eq_ignore_ascii_case(AUTHORIZATION));
            config
                .headers
                .insert(AUTHORIZATION.to_string(), format!("Bearer {}", token));
        }
        Ok(())
    }
}
