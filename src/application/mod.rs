//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 端口定义（外部购物引擎、密钥存储）
//! - commands: 命令及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

// Re-exports
pub use commands::{
    handlers::{AnalyzeProductsHandler, RecommendHandler, SearchProductsHandler},
    AnalyzeProductsCommand, AnalyzeProductsResponse, RecommendCommand, RecommendResponse,
    SearchProductsCommand, SearchProductsResponse,
};

pub use error::ApplicationError;

pub use ports::{
    EngineError, ProductJudgePort, ProductSearchPort, RecommendationPipelinePort, SecretError,
    SecretStorePort,
};
