//! Fetching from certificate-infrastructure servers.

use axum::body::Bytes;
use axum::http::{Method, StatusCode};
use futures_util::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use crate::error::ProxyError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: String,
    /// Forwarded verbatim on POST.
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

pub trait Upstream: Send + Sync {
    fn fetch(&self, request: UpstreamRequest) -> BoxFuture<'_, Result<UpstreamResponse, ProxyError>>;
}

/// [`Upstream`] backed by a pooled `reqwest` client.
pub struct HttpUpstream {
    http_client: reqwest::Client,
}

impl HttpUpstream {
    /// Without a `timeout` the client's default applies; a slow destination
    /// then shows up as a slow response.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, ProxyError> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ProxyError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http_client })
    }
}

impl Upstream for HttpUpstream {
    fn fetch(&self, request: UpstreamRequest) -> BoxFuture<'_, Result<UpstreamResponse, ProxyError>> {
        Box::pin(async move {
            let mut builder = if request.method == Method::POST {
                let mut post = self.http_client.post(&request.url).body(request.body);
                if let Some(content_type) = &request.content_type {
                    post = post.header(CONTENT_TYPE, content_type.as_str());
                }
                post
            } else {
                self.http_client.get(&request.url)
            };
            builder = builder.header(reqwest::header::ACCEPT, "*/*");

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    ProxyError::Upstream(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    ProxyError::Upstream(format!("connection failed: {e}"))
                } else {
                    ProxyError::Upstream(e.to_string())
                }
            })?;

            let status = StatusCode::from_u16(response.status().as_u16())
                .map_err(|e| ProxyError::Upstream(format!("invalid upstream status: {e}")))?;
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response
                .bytes()
                .await
                .map_err(|e| ProxyError::Upstream(format!("failed to read upstream body: {e}")))?;

            Ok(UpstreamResponse {
                status,
                content_type,
                body,
            })
        })
    }
}
