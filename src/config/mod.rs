//! Configuration Module
//!
//! 提供应用配置管理功能，支持多层级配置来源：
//! - 平台环境变量（`PORT`、`GCP_PROJECT_ID`）
//! - 前缀环境变量（`SHOPSAGE_`）
//! - 配置文件（TOML 格式）
//! - 默认值
//!
//! 以及启动阶段的运行环境检测与凭据加载

mod credentials;
mod loader;
mod types;

pub use credentials::{
    dotenv_path, load_dotenv, CredentialError, CredentialLoader, Credentials, RuntimeEnvironment,
    DOTENV_PATH_ENV, REGION_ENV, SERVICE_ENV,
};
pub use loader::{load_config, load_config_from_path, print_config, ConfigError};
pub use types::{AppConfig, EngineConfig, LogConfig, SecretsConfig, ServerConfig};
