//! GCP Secret Manager Client
//!
//! 实现 SecretStorePort，通过 REST 接口读取密钥:
//! 1. 从 metadata server 获取服务账号 access token
//! 2. GET {api_url}/v1/projects/{p}/secrets/{s}/versions/latest:access
//! 3. payload.data 为 base64 编码的明文

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::application::ports::{latest_version_name, SecretError, SecretStorePort};

const METADATA_TOKEN_PATH: &str =
    "computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Debug, Deserialize)]
struct AccessToken {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct AccessSecretVersionResponse {
    payload: SecretPayload,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    data: String,
}

/// GCP Secret Manager 配置
#[derive(Debug, Clone)]
pub struct GcpSecretManagerConfig {
    pub api_url: String,
    pub metadata_url: String,
    pub timeout_secs: u64,
}

impl Default for GcpSecretManagerConfig {
    fn default() -> Self {
        Self {
            api_url: "https://secretmanager.googleapis.com".to_string(),
            metadata_url: "http://metadata.google.internal".to_string(),
            timeout_secs: 10,
        }
    }
}

/// GCP Secret Manager 客户端
pub struct GcpSecretManager {
    client: Client,
    config: GcpSecretManagerConfig,
}

impl GcpSecretManager {
    pub fn new(config: GcpSecretManagerConfig) -> Result<Self, SecretError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SecretError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn access_token(&self) -> Result<String, SecretError> {
        let url = format!(
            "{}/{}",
            self.config.metadata_url.trim_end_matches('/'),
            METADATA_TOKEN_PATH
        );

        let response = self
            .client
            .get(&url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| SecretError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SecretError::Auth(format!(
                "metadata server returned HTTP {}",
                response.status()
            )));
        }

        let token: AccessToken = response
            .json()
            .await
            .map_err(|e| SecretError::Auth(e.to_string()))?;
        Ok(token.access_token)
    }
}

/// 解码 payload.data
fn decode_payload(data: &str) -> Result<String, SecretError> {
    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| SecretError::InvalidPayload(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SecretError::InvalidPayload(e.to_string()))
}

#[async_trait]
impl SecretStorePort for GcpSecretManager {
    async fn access_latest(
        &self,
        project_id: &str,
        secret_id: &str,
    ) -> Result<String, SecretError> {
        let name = latest_version_name(project_id, secret_id);
        let token = self.access_token().await?;
        let url = format!(
            "{}/v1/{}:access",
            self.config.api_url.trim_end_matches('/'),
            name
        );

        tracing::debug!(secret = %name, "Accessing secret version");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SecretError::NetworkError(e.to_string()))?;

        match response.status() {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => return Err(SecretError::NotFound(name)),
            s => {
                let error_text = response.text().await.unwrap_or_default();
                return Err(SecretError::ServiceError(format!("HTTP {}: {}", s, error_text)));
            }
        }

        let body: AccessSecretVersionResponse = response
            .json()
            .await
            .map_err(|e| SecretError::InvalidPayload(e.to_string()))?;

        decode_payload(&body.payload.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::HeaderMap, routing::get, Json, Router};
    use base64::Engine as _;
    use serde_json::json;

    async fn spawn_fake_gcp() -> String {
        let router = Router::new()
            .route(
                "/computeMetadata/v1/instance/service-accounts/default/token",
                get(|headers: HeaderMap| async move {
                    if headers.get("Metadata-Flavor").is_none() {
                        return Err(axum::http::StatusCode::FORBIDDEN);
                    }
                    Ok(Json(json!({ "access_token": "ya29.test", "expires_in": 3599 })))
                }),
            )
            .route(
                "/v1/projects/:project/secrets/:secret/versions/:version",
                get(|Path((_, secret, _)): Path<(String, String, String)>| async move {
                    if secret == "MISSING" {
                        return Err(axum::http::StatusCode::NOT_FOUND);
                    }
                    let data = STANDARD.encode(format!("value-of-{}", secret));
                    Ok(Json(json!({
                        "name": format!("projects/p/secrets/{}/versions/1", secret),
                        "payload": { "data": data }
                    })))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn manager(base: &str) -> GcpSecretManager {
        GcpSecretManager::new(GcpSecretManagerConfig {
            api_url: base.to_string(),
            metadata_url: base.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_decode_payload() {
        assert_eq!(decode_payload("c2stdGVzdA==").unwrap(), "sk-test");
        assert!(decode_payload("not base64!").is_err());
    }

    #[tokio::test]
    async fn test_access_latest() {
        let base = spawn_fake_gcp().await;
        let value = manager(&base)
            .access_latest("shop-prod", "OPENAI_API_KEY")
            .await
            .unwrap();
        assert_eq!(value, "value-of-OPENAI_API_KEY");
    }

    #[tokio::test]
    async fn test_missing_secret() {
        let base = spawn_fake_gcp().await;
        let err = manager(&base)
            .access_latest("shop-prod", "MISSING")
            .await
            .unwrap_err();
        assert!(matches!(err, SecretError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_metadata_unreachable_is_auth_error() {
        let err = manager("http://127.0.0.1:1")
            .access_latest("shop-prod", "OPENAI_API_KEY")
            .await
            .unwrap_err();
        assert!(matches!(err, SecretError::Auth(_)));
    }
}
