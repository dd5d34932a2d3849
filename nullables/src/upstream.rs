//! Nullable upstream — canned responses instead of network fetches.

use axum::body::Bytes;
use axum::http::StatusCode;
use edoc_proxy::{ProxyError, Upstream, UpstreamRequest, UpstreamResponse};
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Mutex;

/// Answers every fetch from a script keyed by destination URL.
///
/// Unscripted URLs get `200 OK` with an empty DER body.
#[derive(Default)]
pub struct NullUpstream {
    responses: Mutex<HashMap<String, Result<UpstreamResponse, String>>>,
    requests: Mutex<Vec<UpstreamRequest>>,
}

impl NullUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, status: StatusCode, content_type: Option<&str>, body: &[u8]) {
        self.responses.lock().unwrap().insert(
            url.to_string(),
            Ok(UpstreamResponse {
                status,
                content_type: content_type.map(str::to_string),
                body: Bytes::copy_from_slice(body),
            }),
        );
    }

    /// Fetches of `url` fail as if the destination were unreachable.
    pub fn fail(&self, url: &str, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(message.to_string()));
    }

    /// Every fetch made so far (for assertions).
    pub fn requests(&self) -> Vec<UpstreamRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Upstream for NullUpstream {
    fn fetch(&self, request: UpstreamRequest) -> BoxFuture<'_, Result<UpstreamResponse, ProxyError>> {
        let scripted = self.responses.lock().unwrap().get(&request.url).cloned();
        self.requests.lock().unwrap().push(request);
        let outcome = match scripted {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(ProxyError::Upstream(message)),
            None => Ok(UpstreamResponse {
                status: StatusCode::OK,
                content_type: None,
                body: Bytes::new(),
            }),
        };
        Box::pin(async move { outcome })
    }
}
