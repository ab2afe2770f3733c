//! Shopping Engine Ports - 外部购物引擎抽象
//!
//! 搜索、排名、推理都在外部引擎中完成，这里只定义调用契约，
//! 具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{ProductRecord, Recommendation, SearchLimit, Verdict};

/// 引擎错误
#[derive(Debug, Error)]
pub enum EngineError {
    /// 输入被引擎判定为无效（对应客户端错误）
    #[error("{0}")]
    Validation(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl EngineError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// 完整流水线：搜索 → 分析 → 排名
#[async_trait]
pub trait RecommendationPipelinePort: Send + Sync {
    async fn run_pipeline(&self, question: &str) -> Result<Recommendation, EngineError>;
}

/// 仅搜索
#[async_trait]
pub trait ProductSearchPort: Send + Sync {
    async fn search(&self, query: &str, max_results: SearchLimit)
        -> Result<Vec<Value>, EngineError>;
}

/// 仅排名（对已有商品列表做评审）
#[async_trait]
pub trait ProductJudgePort: Send + Sync {
    async fn judge_products(
        &self,
        question: &str,
        products: Vec<ProductRecord>,
    ) -> Result<Verdict, EngineError>;
}
