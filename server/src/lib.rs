use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use edurec_core::persist::CachePaths;
use edurec_core::{load_catalog, Engine, EngineError, ResourceSummary, Snapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Deserialize)]
pub struct AssignmentRequest {
    pub description: String,
    #[serde(default)]
    pub grade_level: Option<String>,
}

#[derive(Serialize)]
pub struct RecommendationResponse {
    pub resource_url: String,
    pub subject: String,
    pub grade_level: String,
    pub similarity_score: f32,
}

#[derive(Serialize)]
pub struct ResourceList {
    pub resources: Vec<ResourceSummary>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

/// Load the catalog, build (or restore) the model snapshot, and assemble the
/// router. A malformed or missing catalog is fatal here; cache problems are
/// recovered by rebuilding.
pub fn build_app(catalog_path: &str, cache_dir: Option<&str>) -> Result<Router> {
    let entries = load_catalog(catalog_path)?;
    let snapshot = match cache_dir {
        Some(dir) => Snapshot::from_cache_or_build(entries, &CachePaths::new(dir)),
        None => Snapshot::build(entries),
    };
    tracing::info!(
        resources = snapshot.index.len(),
        terms = snapshot.model.vocab_size(),
        "matching engine ready"
    );
    let state = AppState { engine: Arc::new(Engine::new(snapshot)) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(|| async { "ok" }))
        .route("/recommend", post(recommend_handler))
        .route("/resources", get(resources_handler))
        .with_state(state)
        .layer(cors);
    Ok(app)
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to the Resource Recommendation API"
    }))
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    Json(req): Json<AssignmentRequest>,
) -> Result<Json<RecommendationResponse>, (StatusCode, Json<serde_json::Value>)> {
    // An empty or blank grade level means "no filter", not a filter that
    // can never match.
    let grade_level = req
        .grade_level
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty());
    match state.engine.match_resource(&req.description, grade_level) {
        Ok(m) => Ok(Json(RecommendationResponse {
            resource_url: m.entry.url,
            subject: m.entry.subject,
            grade_level: m.entry.grade_level,
            similarity_score: m.score,
        })),
        Err(e) => Err(error_response(e)),
    }
}

pub async fn resources_handler(State(state): State<AppState>) -> Json<ResourceList> {
    Json(ResourceList { resources: state.engine.list_all() })
}

/// Not-found outcomes map to 404; anything else is an internal fault.
fn error_response(e: EngineError) -> (StatusCode, Json<serde_json::Value>) {
    let status = if e.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        tracing::error!(error = %e, "recommendation failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(serde_json::json!({ "detail": e.to_string() })))
}
