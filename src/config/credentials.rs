//! Runtime Detection & Credential Loading
//!
//! 启动时（tokio runtime 启动之前）确定运行环境并准备凭据：
//! - 本地开发: `load_dotenv` 把整个 dotenv 文件载入进程环境，已存在的环境变量优先
//! - Cloud Run（存在 `K_SERVICE`）: 从 Secret Manager 读取，失败时退回同名环境变量
//!
//! 任何必需凭据缺失或为空都会让启动失败。
//!
//! 所有写进程环境的函数（`load_dotenv`、`Credentials::export`）只能在
//! 没有其他线程运行时调用。

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use super::types::SecretsConfig;
use crate::application::ports::SecretStorePort;

/// Cloud Run 注入的服务名变量
pub const SERVICE_ENV: &str = "K_SERVICE";

/// 区域变量
pub const REGION_ENV: &str = "K_SERVICE_REGION";

/// 覆盖 dotenv 文件路径的变量
pub const DOTENV_PATH_ENV: &str = "SHOPSAGE_DOTENV_PATH";

const DEFAULT_DOTENV_PATH: &str = ".env";

/// 凭据加载错误
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Missing required credentials: {}", .names.join(", "))]
    Missing { names: Vec<String> },

    #[error("Failed to read dotenv file {path}: {message}")]
    Dotenv { path: String, message: String },
}

/// 运行环境
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    /// 托管平台（Cloud Run）
    Managed { service: String, region: String },
    /// 本地开发
    Local,
}

impl RuntimeEnvironment {
    /// 从进程环境检测
    pub fn detect() -> Self {
        Self::detect_from(|key| std::env::var(key).ok())
    }

    pub fn detect_from<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(SERVICE_ENV) {
            Some(service) => Self::Managed {
                service,
                region: lookup(REGION_ENV).unwrap_or_else(|| "unknown".to_string()),
            },
            None => Self::Local,
        }
    }

    pub fn is_managed(&self) -> bool {
        matches!(self, Self::Managed { .. })
    }

    pub fn platform(&self) -> &'static str {
        match self {
            Self::Managed { .. } => "Google Cloud Run",
            Self::Local => "Local",
        }
    }

    /// health 响应中使用的平台短名
    pub fn platform_short(&self) -> &'static str {
        match self {
            Self::Managed { .. } => "Cloud Run",
            Self::Local => "Local",
        }
    }

    pub fn region(&self) -> &str {
        match self {
            Self::Managed { region, .. } => region,
            Self::Local => "unknown",
        }
    }
}

/// 已加载的凭据（secret 名 -> 值）
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials(BTreeMap<String, String>);

impl Credentials {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.0.clone()
    }

    /// 写入进程环境变量
    ///
    /// 只能在启动阶段、tokio runtime 之外调用（`set_var` 要求没有并发读取环境的线程）。
    pub fn export(&self) {
        for (name, value) in &self.0 {
            std::env::set_var(name, value);
        }
        tracing::info!(count = self.0.len(), "Credentials exported to process environment");
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.keys().map(|k| (k, "<redacted>")))
            .finish()
    }
}

/// dotenv 文件路径：`SHOPSAGE_DOTENV_PATH`，默认 `.env`
pub fn dotenv_path() -> PathBuf {
    std::env::var(DOTENV_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DOTENV_PATH))
}

/// 把 dotenv 文件中的所有 key/value 载入进程环境
///
/// 已存在的环境变量不会被覆盖；文件不存在时返回 `Ok(false)`。
/// 必须在 `load_config` 之前、tokio runtime 启动之前调用。
pub fn load_dotenv(path: &Path) -> Result<bool, CredentialError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CredentialError::Dotenv {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}

/// 凭据加载器
pub struct CredentialLoader {
    config: SecretsConfig,
    store: Option<Arc<dyn SecretStorePort>>,
}

impl CredentialLoader {
    pub fn new(config: SecretsConfig, store: Option<Arc<dyn SecretStorePort>>) -> Self {
        Self { config, store }
    }

    /// 使用进程环境加载
    pub async fn load(&self, runtime: &RuntimeEnvironment) -> Result<Credentials, CredentialError> {
        self.load_with(runtime, |key| std::env::var(key).ok()).await
    }

    /// 本地模式下 dotenv 已由 `load_dotenv` 载入环境，这里只读环境
    pub async fn load_with<F>(
        &self,
        runtime: &RuntimeEnvironment,
        lookup: F,
    ) -> Result<Credentials, CredentialError>
    where
        F: Fn(&str) -> Option<String> + Send + Sync,
    {
        let mut values = BTreeMap::new();

        for name in &self.config.names {
            let remote = if runtime.is_managed() {
                self.fetch_remote(name).await
            } else {
                None
            };
            if let Some(value) = remote.or_else(|| lookup(name.as_str())) {
                values.insert(name.clone(), value);
            }
        }

        let missing: Vec<String> = self
            .config
            .names
            .iter()
            .filter(|name| values.get(*name).map_or(true, |v| v.trim().is_empty()))
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Err(CredentialError::Missing { names: missing });
        }

        tracing::info!(
            platform = runtime.platform(),
            count = values.len(),
            "Credentials loaded"
        );

        Ok(Credentials(values))
    }

    async fn fetch_remote(&self, name: &str) -> Option<String> {
        let Some(store) = &self.store else {
            tracing::warn!(secret = %name, "No secret store configured, falling back to environment");
            return None;
        };

        match store.access_latest(&self.config.project_id, name).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    secret = %name,
                    project_id = %self.config.project_id,
                    error = %e,
                    "Error loading secret, falling back to environment"
                );
                None
            }
        }
    }
}
