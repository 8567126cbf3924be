use std::sync::Arc;

use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use vigil_client::SourceClient;
use vigil_core::AnalysisDocument;

/// Shared server state: the upstream client plus the bucket names
/// advertised by the health endpoint.
pub struct ApiState {
    pub client: SourceClient,
    pub raw_bucket: String,
    pub results_bucket: String,
}

pub fn router() -> Router {
    Router::new()
        .route("/api/getData", get(get_data))
        .route("/api/health", get(health))
}

/// Fetch the analysis document, degrading to the canned fallback. The
/// response is always a document, stamped with serve time and origin.
async fn analysis_response(state: &Arc<ApiState>) -> AnalysisDocument {
    let shared = Arc::clone(state);
    let fetched = tokio::task::spawn_blocking(move || shared.client.fetch_document()).await;

    let mut doc = match fetched {
        Ok(Ok(doc)) => doc,
        Ok(Err(e)) => {
            eprintln!("[vigil-api] upstream fetch failed: {e}");
            AnalysisDocument::fallback()
        }
        Err(e) => {
            eprintln!("[vigil-api] fetch task failed: {e}");
            AnalysisDocument::fallback()
        }
    };

    if doc.source.is_none() {
        doc.source = Some("upstream".into());
    }
    doc.timestamp = Some(chrono::Utc::now().to_rfc3339());
    doc
}

// GET /api/getData
async fn get_data(Extension(state): Extension<Arc<ApiState>>) -> impl IntoResponse {
    Json(analysis_response(&state).await)
}

// GET /api/health
async fn health(Extension(state): Extension<Arc<ApiState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "buckets": {
            "raw": state.raw_bucket,
            "results": state.results_bucket,
        }
    }))
}
