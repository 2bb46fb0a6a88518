use crate::{error::Error, util, RequestBody, RequestConfig, ResponseEnvelope};
use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client};
use std::{fmt::Debug, time::Duration};
use url::Url;

/// Transport seam. Returns the envelope for every response the server sent,
/// whatever its status; only failures to get a response are errors here.
#[async_trait]
pub trait HttpClient: Debug {
    async fn send(&self, url: &Url, request: &RequestConfig) -> Result<ResponseEnvelope, Error>;
}

#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, url: &Url, request: &RequestConfig) -> Result<ResponseEnvelope, Error> {
        let mut headers = HeaderMap::new();
        util::put_headers(&mut headers, &request.headers)?;

        let mut request_builder = self
            .client
            .request(request.method.clone(), url.clone())
            .headers(headers);

        if let Some(timeout) = request.timeout {
            request_builder = request_builder.timeout(timeout);
        }

        request_builder = match &request.body {
            RequestBody::Empty => request_builder,
            RequestBody::Json(value) => request_builder.json(value),
            RequestBody::Form(form) => request_builder.multipart(form.to_multipart()?),
        };

        let response = request_builder.send().await?;

        let status_code = response.status().as_u16();
        let headers = util::extract_headers(response.headers());
        let body = response.bytes().await?;

        Ok(ResponseEnvelope {
            status_code,
            headers,
            body: util::parse_body(&body),
        })
    }
}
