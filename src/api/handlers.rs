//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{AsyncCache, StatsSnapshot};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, ClearResponse, DeleteResponse, GetResponse, HealthResponse, MGetRequest,
    MGetResponse,
};
use crate::origin::SimulatedOrigin;

/// Application state shared across all handlers.
///
/// The cache is internally synchronized, so handlers share it by cloning.
#[derive(Clone)]
pub struct AppState {
    /// Read-through cache in front of the origin
    pub cache: AsyncCache<String>,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: AsyncCache<String>) -> Self {
        Self { cache }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the simulated origin and a cache in front of it.
    pub fn from_config(config: &Config) -> Self {
        let origin = SimulatedOrigin::new(
            config.origin_latency(),
            config.origin_fail_prefix.clone(),
        );
        Self::new(AsyncCache::with_settings(config.cache_settings(), origin))
    }
}

/// Handler for GET /get/:key
///
/// Returns the cached value, loading it from the origin on a miss.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    if let Some(error_msg) = validate_key(&key) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let value = state.cache.get(&key).await?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for POST /mget
///
/// Per-key failures are reported in the `errors` map; the request itself
/// succeeds as long as the body is valid.
pub async fn mget_handler(
    State(state): State<AppState>,
    Json(req): Json<MGetRequest>,
) -> Result<Json<MGetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let batch = state.cache.mget(req.keys).await;

    Ok(Json(MGetResponse::from(batch)))
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.cache.remove(&key).await?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for DELETE /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear_all().await;

    Json(ClearResponse::new())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.cache.stats().await)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
