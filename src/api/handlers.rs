//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::Cache;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    validate_name, ClearResponse, DeleteResponse, GetResponse, HealthResponse, SetRequest,
    SetResponse, StatsResponse, StoresResponse,
};

/// Application state shared across all handlers.
///
/// The cache does its own locking, so handlers share it through a plain Arc.
#[derive(Clone)]
pub struct AppState {
    /// Shared partitioned cache
    pub cache: Arc<Cache>,
    /// TTL in seconds for writes without one
    pub default_ttl: u64,
    /// Largest accepted payload in bytes
    pub max_value_size: usize,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: Arc<Cache>, config: &Config) -> Self {
        Self {
            cache,
            default_ttl: config.default_ttl,
            max_value_size: config.max_value_size,
        }
    }

    /// Creates a new AppState with an empty cache.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(Cache::new()), config)
    }
}

fn check_path(store: &str, key: Option<&str>) -> Result<()> {
    if let Some(msg) = validate_name("Store name", store) {
        return Err(ApiError::InvalidRequest(msg));
    }
    if let Some(msg) = key.and_then(|key| validate_name("Key", key)) {
        return Err(ApiError::InvalidRequest(msg));
    }
    Ok(())
}

/// Handler for PUT /stores/:store/:key
///
/// Stores a payload in the named store with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Path((store, key)): Path<(String, String)>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    check_path(&store, Some(key.as_str()))?;
    if let Some(error_msg) = req.validate(state.max_value_size) {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.unwrap_or(state.default_ttl);
    state
        .cache
        .add(&store, &key, req.value, Duration::from_secs(ttl))
        .await;

    Ok(Json(SetResponse::new(store, key, ttl)))
}

/// Handler for GET /stores/:store/:key
///
/// Retrieves an entry from the named store.
pub async fn get_handler(
    State(state): State<AppState>,
    Path((store, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let entry = state
        .cache
        .get(&store, &key)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("{}/{}", store, key)))?;

    Ok(Json(GetResponse::from_entry(store, &entry)))
}

/// Handler for DELETE /stores/:store/:key
///
/// Removes a single entry before its deadline.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((store, key)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    if !state.cache.remove(&store, &key).await {
        return Err(ApiError::NotFound(format!("{}/{}", store, key)));
    }

    Ok(Json(DeleteResponse::new(store, key)))
}

/// Handler for DELETE /stores/:store
///
/// Clears the named store. Unknown stores are cleared trivially.
pub async fn clear_handler(
    State(state): State<AppState>,
    Path(store): Path<String>,
) -> Result<Json<ClearResponse>> {
    check_path(&store, None)?;
    let cleared = state.cache.clear(&store).await;

    Ok(Json(ClearResponse::new(store, cleared)))
}

/// Handler for GET /stores
pub async fn stores_handler(State(state): State<AppState>) -> Json<StoresResponse> {
    Json(StoresResponse {
        stores: state.cache.store_names().await,
    })
}

/// Handler for GET /stats/:store
///
/// Returns statistics for one store.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(store): Path<String>,
) -> Result<Json<StatsResponse>> {
    let stats = state
        .cache
        .stats(&store)
        .await
        .ok_or_else(|| ApiError::NotFound(store.clone()))?;

    Ok(Json(StatsResponse::new(store, stats)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
