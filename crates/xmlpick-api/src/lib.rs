//! HTTP surface for xmlpick: remote document relay, outline and extraction

#![forbid(unsafe_code)]

use std::future::Future;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use xmlpick::{EncodeOptions, OutlineOptions, Session};

/// Accept header sent when fetching remote documents
pub const ACCEPT_XML: &str = "application/xml,text/xml,*/*";

/// Failure to fetch a remote document
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Upstream answered with a non-success status
    #[error("upstream returned status {0}")]
    Status(u16),
    /// Request never produced a response
    #[error("fetch failed: {0}")]
    Transport(String),
}

/// Source of remote document text
pub trait Fetch: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// [`Fetch`] over HTTP with reqwest
#[derive(Clone, Debug, Default)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Fetch for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT_XML)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct ProxyRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OutlineRequest {
    pub content: String,
    /// Number of levels to list (0 or absent means unlimited)
    #[serde(default)]
    pub depth: usize,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub content: String,
    pub paths: Vec<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub unwrap_root: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse {
    Ok { data: serde_json::Value },
    Err { error: String },
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    status: &'static str,
    filename: String,
    mime: &'static str,
    content: String,
    skipped: Vec<String>,
}

type Reply<T> = (StatusCode, Json<T>);

fn failure(status: StatusCode, error: impl ToString) -> Reply<ApiResponse> {
    (
        status,
        Json(ApiResponse::Err {
            error: error.to_string(),
        }),
    )
}

/// Build the application router around a document fetcher
pub fn router<F: Fetch>(fetcher: F) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/proxy", post(proxy::<F>))
        .route("/api/outline", post(outline))
        .route("/api/extract", post(extract))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(Arc::new(fetcher))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

async fn proxy<F: Fetch>(
    State(fetcher): State<Arc<F>>,
    Json(payload): Json<ProxyRequest>,
) -> Reply<ApiResponse> {
    let Some(url) = payload.url.filter(|url| !url.trim().is_empty()) else {
        return failure(StatusCode::BAD_REQUEST, "URL is required");
    };

    match fetcher.fetch(&url).await {
        Ok(body) => {
            info!(%url, bytes = body.len(), "relayed remote document");
            (
                StatusCode::OK,
                Json(ApiResponse::Ok {
                    data: serde_json::Value::String(body),
                }),
            )
        }
        Err(err @ FetchError::Status(code)) => {
            warn!(%url, code, "upstream refused");
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY);
            failure(status, err)
        }
        Err(err @ FetchError::Transport(_)) => {
            warn!(%url, %err, "relay failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, err)
        }
    }
}

async fn outline(Json(payload): Json<OutlineRequest>) -> Reply<ApiResponse> {
    let mut session = Session::new();
    if let Err(err) = session.load(&payload.content) {
        return failure(StatusCode::BAD_REQUEST, err);
    }

    let entries = session.outline(&OutlineOptions::with_max_depth(payload.depth));
    match serde_json::to_value(entries) {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::Ok { data })),
        Err(err) => failure(StatusCode::INTERNAL_SERVER_ERROR, err),
    }
}

async fn extract(
    Json(payload): Json<ExtractRequest>,
) -> Result<Reply<ExtractResponse>, Reply<ApiResponse>> {
    let mut session = Session::new();
    session
        .load(&payload.content)
        .map_err(|err| failure(StatusCode::BAD_REQUEST, err))?;
    for path in &payload.paths {
        session
            .select(path)
            .map_err(|err| failure(StatusCode::BAD_REQUEST, err))?;
    }

    let skipped = session
        .extract()
        .map(|report| report.skipped.iter().map(ToString::to_string).collect())
        .unwrap_or_default();

    let options = EncodeOptions::default().with_unwrap_single_root(payload.unwrap_root);
    let export = session
        .export(payload.filename.as_deref(), &options)
        .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "no paths selected"))?;

    Ok((
        StatusCode::OK,
        Json(ExtractResponse {
            status: "ok",
            filename: export.filename().to_string(),
            mime: export.mime_type(),
            content: export.into_content(),
            skipped,
        }),
    ))
}
