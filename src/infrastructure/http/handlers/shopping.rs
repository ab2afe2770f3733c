//! Shopping Handlers
//!
//! 每个端点委托给一个 command handler

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};

use crate::application::{AnalyzeProductsCommand, RecommendCommand, SearchProductsCommand};
use crate::domain::{ProductRecord, Recommendation, ShoppingQuery};
use crate::infrastructure::http::dto::{AnalyzeParams, SearchParams, SearchResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// Recommend
// ============================================================================

/// POST /recommend - 搜索 → 分析 → 排名
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ShoppingQuery>, JsonRejection>,
) -> Result<Json<Recommendation>, ApiError> {
    let Json(query) = payload?;

    let result = state
        .recommend_handler
        .handle(RecommendCommand {
            question: query.question,
        })
        .await?;

    Ok(Json(result.recommendation))
}

// ============================================================================
// Search
// ============================================================================

/// POST /search?query=...&max_results=8
pub async fn search_products(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params?;

    let result = state
        .search_products_handler
        .handle(SearchProductsCommand {
            query: params.query,
            max_results: params.max_results,
        })
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(SearchResponse {
        query: result.query,
        results: result.results,
    }))
}

// ============================================================================
// Analyze
// ============================================================================

/// POST /analyze?question=... ，请求体为商品列表
pub async fn analyze_products(
    State(state): State<Arc<AppState>>,
    params: Result<Query<AnalyzeParams>, QueryRejection>,
    products: Result<Json<Vec<ProductRecord>>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Query(params) = params?;
    let Json(products) = products?;

    let result = state
        .analyze_products_handler
        .handle(AnalyzeProductsCommand {
            question: params.question,
            products,
        })
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(result.verdict.into_inner()))
}
