//! HTTP Routes
//!
//! API Endpoints:
//! - /               GET   服务描述
//! - /health         GET   健康检查
//! - /recommend      POST  完整推荐（body: {"question": "..."}）
//! - /search         POST  仅搜索（query: query, max_results）
//! - /analyze        POST  仅排名（query: question, body: 商品列表）
//! - /_ah/warmup     GET   Cloud Run 预热

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/recommend", post(handlers::recommend))
        .route("/search", post(handlers::search_products))
        .route("/analyze", post(handlers::analyze_products))
        .route("/_ah/warmup", get(handlers::warmup))
}
