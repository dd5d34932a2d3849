//! HTTP surface of the revocation proxy.
//!
//! Every path is handled by the proxy itself (the destination travels in the
//! `url` query parameter), except `/metrics` when metrics are enabled.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::service::{ProxyRequest, ProxyResponse, RevocationProxy};

#[derive(Debug, Deserialize)]
struct ProxyQuery {
    url: Option<String>,
}

pub fn router(proxy: Arc<RevocationProxy>, enable_metrics: bool) -> Router {
    let mut app = Router::new();
    if enable_metrics {
        app = app.route("/metrics", get(metrics_handler));
    }
    app.fallback(proxy_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(proxy)
}

async fn proxy_handler(
    State(proxy): State<Arc<RevocationProxy>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    query: Option<Query<ProxyQuery>>,
    body: Bytes,
) -> ProxyResponse {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let request = ProxyRequest {
        method,
        cache_key: uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string()),
        origin: header_str(header::ORIGIN),
        destination: query.and_then(|Query(q)| q.url),
        content_type: header_str(header::CONTENT_TYPE),
        body,
    };
    proxy.handle(request).await
}

async fn metrics_handler(State(proxy): State<Arc<RevocationProxy>>) -> impl IntoResponse {
    match proxy.metrics().encode() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!("failed to encode metrics: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// The proxy bound to its configured address.
pub struct ProxyServer {
    bind: String,
    enable_metrics: bool,
    proxy: Arc<RevocationProxy>,
}

impl ProxyServer {
    pub fn new(bind: impl Into<String>, proxy: Arc<RevocationProxy>, enable_metrics: bool) -> Self {
        Self {
            bind: bind.into(),
            enable_metrics,
            proxy,
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let proxy = RevocationProxy::from_config(config)?;
        Ok(Self::new(
            config.bind.clone(),
            Arc::new(proxy),
            config.enable_metrics,
        ))
    }

    pub fn proxy(&self) -> &Arc<RevocationProxy> {
        &self.proxy
    }

    /// Bind the configured address and serve until `shutdown` fires.
    pub async fn serve(&self, shutdown: broadcast::Receiver<()>) -> Result<(), ProxyError> {
        let listener = TcpListener::bind(&self.bind).await?;
        self.serve_on(listener, shutdown).await
    }

    /// Serve on an already bound listener; in-flight requests finish before
    /// this returns.
    pub async fn serve_on(
        &self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ProxyError> {
        let addr = listener.local_addr()?;
        info!(%addr, metrics = self.enable_metrics, "revocation proxy listening");

        let app = router(self.proxy.clone(), self.enable_metrics);
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        info!("revocation proxy stopped");
        Ok(())
    }
}
