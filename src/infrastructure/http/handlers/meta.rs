//! Service metadata handlers
//!
//! 这些端点不依赖外部引擎，始终返回 200

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Json};

use crate::infrastructure::http::dto::{HealthResponse, RootResponse, StatusResponse};
use crate::infrastructure::http::state::AppState;

const SERVICE_NAME: &str = "ShopSage API";

/// GET / - 服务描述
pub async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    let endpoints = BTreeMap::from([
        ("POST /recommend", "Get shopping recommendations"),
        ("POST /search", "Search for products without analysis"),
        ("POST /analyze", "Analyze and rank already retrieved products"),
        ("GET /health", "Health check endpoint"),
    ]);

    Json(RootResponse {
        name: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        platform: state.runtime.platform(),
        description: "AI-powered shopping recommendations",
        endpoints,
    })
}

/// GET /health - 健康检查
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        platform: state.runtime.platform_short(),
        region: state.runtime.region().to_string(),
    })
}

/// GET /_ah/warmup - 冷启动预热
pub async fn warmup() -> Json<StatusResponse> {
    tracing::debug!("Warmup request received");
    Json(StatusResponse {
        status: "warmed up",
    })
}
