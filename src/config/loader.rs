//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 平台环境变量（`PORT`、`GCP_PROJECT_ID`）
//! 2. 环境变量（前缀 `SHOPSAGE_`）
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 平台约定的端口变量
pub const PORT_ENV: &str = "PORT";

/// 平台约定的项目 ID 变量
pub const PROJECT_ID_ENV: &str = "GCP_PROJECT_ID";

/// 加载应用配置
///
/// # 环境变量示例
/// - `PORT=9090`
/// - `GCP_PROJECT_ID=shop-prod`
/// - `SHOPSAGE_ENGINE__URL=http://engine:8000`
/// - `SHOPSAGE_SECRETS__NAMES=TAVILY_API_KEY,OPENAI_API_KEY`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    build_config(
        config_path,
        std::env::var(PORT_ENV).ok(),
        std::env::var(PROJECT_ID_ENV).ok(),
    )
}

fn build_config(
    config_path: Option<&Path>,
    port: Option<String>,
    project_id: Option<String>,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("engine.url", "http://localhost:8000")?
        .set_default("engine.timeout_secs", 120)?
        .set_default("engine.fake", false)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 前缀环境变量
    // 例如: SHOPSAGE_ENGINE__URL=http://engine:8000
    builder = builder.add_source(
        Environment::with_prefix("SHOPSAGE")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("secrets.names")
            .try_parsing(true),
    );

    // 4. 平台变量（最高优先级）
    builder = builder
        .set_override_option("server.port", port)?
        .set_override_option("secrets.project_id", project_id)?;

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if !config.engine.fake && config.engine.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Engine URL cannot be empty".to_string(),
        ));
    }

    if config.engine.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Engine timeout cannot be 0".to_string(),
        ));
    }

    if config.secrets.names.is_empty() {
        return Err(ConfigError::ValidationError(
            "At least one required secret name must be configured".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    if config.engine.fake {
        tracing::info!("Engine: in-process fake");
    } else {
        tracing::info!("Engine URL: {}", config.engine.url);
        tracing::info!("Engine Timeout: {}s", config.engine.timeout_secs);
    }
    tracing::info!("GCP Project: {}", config.secrets.project_id);
    tracing::info!("Required Secrets: {}", config.secrets.names.join(", "));
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
