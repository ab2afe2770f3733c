//! Shopping Commands - 购物相关命令

use serde_json::Value;

use crate::domain::{ProductRecord, Recommendation, Verdict};

/// 完整推荐命令
#[derive(Debug, Clone)]
pub struct RecommendCommand {
    pub question: String,
}

/// 完整推荐响应
#[derive(Debug, Clone)]
pub struct RecommendResponse {
    pub recommendation: Recommendation,
}

/// 仅搜索命令
#[derive(Debug, Clone)]
pub struct SearchProductsCommand {
    pub query: String,
    /// 未指定时使用默认值 8
    pub max_results: Option<usize>,
}

/// 搜索响应
#[derive(Debug, Clone)]
pub struct SearchProductsResponse {
    pub query: String,
    pub results: Vec<Value>,
}

/// 仅评审命令
#[derive(Debug, Clone)]
pub struct AnalyzeProductsCommand {
    pub question: String,
    pub products: Vec<ProductRecord>,
}

/// 评审响应
#[derive(Debug, Clone)]
pub struct AnalyzeProductsResponse {
    pub verdict: Verdict,
}
