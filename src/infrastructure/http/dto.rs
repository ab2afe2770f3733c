//! Data Transfer Objects

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Service metadata
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub platform: &'static str,
    pub description: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub platform: &'static str,
    pub region: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

// ============================================================================
// Shopping DTOs
// ============================================================================

/// `/search` 查询参数
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// `/analyze` 查询参数（商品列表在请求体中）
#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<Value>,
}
