//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod secret_store;
mod shopping_engine;

pub use secret_store::{latest_version_name, SecretError, SecretStorePort};
pub use shopping_engine::{
    EngineError, ProductJudgePort, ProductSearchPort, RecommendationPipelinePort,
};
