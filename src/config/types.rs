//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 外部购物引擎配置
    #[serde(default)]
    pub engine: EngineConfig,

    /// 密钥配置
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口（`PORT` 环境变量优先）
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 外部购物引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// 引擎服务基础 URL
    #[serde(default = "default_engine_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,

    /// 使用进程内的 fake 引擎（本地演示）
    #[serde(default)]
    pub fake: bool,
}

fn default_engine_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_engine_timeout() -> u64 {
    120
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: default_engine_url(),
            timeout_secs: default_engine_timeout(),
            fake: false,
        }
    }
}

/// 密钥配置
#[derive(Debug, Clone, Deserialize)]
pub struct SecretsConfig {
    /// GCP 项目 ID（`GCP_PROJECT_ID` 环境变量优先）
    #[serde(default = "default_project_id")]
    pub project_id: String,

    /// 启动时必须存在的凭据名
    #[serde(default = "default_secret_names")]
    pub names: Vec<String>,

    /// Secret Manager REST 地址
    #[serde(default = "default_secret_api_url")]
    pub api_url: String,

    /// metadata server 地址
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,
}

pub const DEFAULT_PROJECT_ID: &str = "your-project-id";

fn default_project_id() -> String {
    DEFAULT_PROJECT_ID.to_string()
}

fn default_secret_names() -> Vec<String> {
    vec!["TAVILY_API_KEY".to_string(), "OPENAI_API_KEY".to_string()]
}

fn default_secret_api_url() -> String {
    "https://secretmanager.googleapis.com".to_string()
}

fn default_metadata_url() -> String {
    "http://metadata.google.internal".to_string()
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            project_id: default_project_id(),
            names: default_secret_names(),
            api_url: default_secret_api_url(),
            metadata_url: default_metadata_url(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.engine.url, "http://localhost:8000");
        assert_eq!(config.secrets.project_id, "your-project-id");
        assert_eq!(
            config.secrets.names,
            vec!["TAVILY_API_KEY".to_string(), "OPENAI_API_KEY".to_string()]
        );
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8080");
    }
}
