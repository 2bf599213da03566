//! HTTP request handlers

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::IndexError;
use crate::index::scan_directory;
use crate::state::AppState;

use super::query::filter_from_params;

/// HTTP error type
#[derive(Debug)]
pub enum HttpError {
    InternalError(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            HttpError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, body).into_response()
    }
}

impl From<IndexError> for HttpError {
    fn from(err: IndexError) -> Self {
        HttpError::InternalError(err.to_string())
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Version endpoint
pub async fn version_check() -> &'static str {
    concat!("nvr-meta-server v", env!("CARGO_PKG_VERSION"))
}

/// Recording metadata query
/// GET /files?tstart=&tend=&nest=
///
/// Always answers 200 with a JSON body: either the aggregated recordings,
/// newest first, or `{"error":"Directory not found"}`.
pub async fn list_recordings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, HttpError> {
    let filter = filter_from_params(&params);
    let index = state.index_config().clone();

    // Directory scan is blocking IO, keep it off the async workers
    let result = tokio::task::spawn_blocking(move || scan_directory(&index, &filter))
        .await
        .map_err(|e| HttpError::InternalError(e.to_string()))?;

    let body = match result {
        Ok(aggregation) => aggregation
            .to_pretty_json()
            .map_err(|e| HttpError::InternalError(format!("Failed to encode result: {}", e)))?,
        Err(IndexError::DirectoryNotFound(dir)) => {
            tracing::warn!("Metadata directory not found: {:?}", dir);
            serde_json::json!({ "error": "Directory not found" }).to_string()
        }
        Err(e) => return Err(e.into()),
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    Ok((headers, body).into_response())
}
