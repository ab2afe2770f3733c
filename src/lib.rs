//! ShopSage - AI 购物推荐 HTTP 服务
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Shopping Context: 问题、商品、推荐结果等传输形状
//!
//! 应用层 (application/):
//! - Ports: 外部购物引擎（流水线、搜索、评审）与密钥存储
//! - Commands: 每个端点对应的命令处理器
//!
//! 配置 (config/):
//! - 多源配置、运行环境检测、凭据加载
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: JSON API
//! - Adapters: HTTP/Fake 引擎客户端、GCP Secret Manager

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
