use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use wayfarer_core::{Destination, DisplayRecord, ExchangeRate, RateSource, TravelAdvisor, DEFAULT_TOP_K};

#[derive(Deserialize)]
pub struct RecommendParams {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub interest: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_country() -> String { "India".to_string() }
fn default_k() -> usize { DEFAULT_TOP_K }

#[derive(Serialize)]
pub struct RecommendResponse {
    pub country: String,
    pub interest: String,
    pub took_s: f64,
    pub rate: ExchangeRate,
    pub total: usize,
    pub results: Vec<DisplayRecord>,
}

pub struct AppState<S> {
    pub advisor: Arc<TravelAdvisor<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self { advisor: self.advisor.clone() }
    }
}

pub fn build_app<S: RateSource + 'static>(advisor: TravelAdvisor<S>) -> Router {
    let app_state = AppState { advisor: Arc::new(advisor) };

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
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/recommend", get(recommend_handler::<S>))
        .route("/destinations/:id", get(destination_handler::<S>))
        .route("/rate", get(rate_handler::<S>))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn recommend_handler<S: RateSource + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<RecommendParams>,
) -> Json<RecommendResponse> {
    let start = std::time::Instant::now();
    let k = params.k.clamp(1, 100);
    let results = state.advisor.recommend(&params.country, &params.interest, k).await;
    let rate = state.advisor.rate().await.clone();
    let elapsed = start.elapsed();
    Json(RecommendResponse {
        country: params.country,
        interest: params.interest,
        took_s: elapsed.as_secs_f64(),
        rate,
        total: results.len(),
        results,
    })
}

pub async fn destination_handler<S: RateSource + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<u32>,
) -> Result<Json<Destination>, (StatusCode, Json<serde_json::Value>)> {
    match state.advisor.recommender().destination(id) {
        Some(d) => Ok(Json(d.clone())),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" })))),
    }
}

pub async fn rate_handler<S: RateSource + 'static>(State(state): State<AppState<S>>) -> Json<ExchangeRate> {
    Json(state.advisor.rate().await.clone())
}
