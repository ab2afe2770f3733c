//! Secret Store Port - 远程密钥存储抽象

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Failed to obtain access token: {0}")]
    Auth(String),

    #[error("Secret not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Secret store error: {0}")]
    ServiceError(String),

    #[error("Invalid secret payload: {0}")]
    InvalidPayload(String),
}

/// 完整资源名：`projects/{project}/secrets/{secret}/versions/latest`
pub fn latest_version_name(project_id: &str, secret_id: &str) -> String {
    format!("projects/{}/secrets/{}/versions/latest", project_id, secret_id)
}

/// Secret Store Port
#[async_trait]
pub trait SecretStorePort: Send + Sync {
    /// 读取密钥最新版本的明文
    async fn access_latest(&self, project_id: &str, secret_id: &str)
        -> Result<String, SecretError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_version_name() {
        assert_eq!(
            latest_version_name("shop-prod", "OPENAI_API_KEY"),
            "projects/shop-prod/secrets/OPENAI_API_KEY/versions/latest"
        );
    }
}
