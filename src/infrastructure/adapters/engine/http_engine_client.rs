//! HTTP Engine Client - 调用外部购物引擎 HTTP 服务
//!
//! 实现三个引擎端口，通过 HTTP 调用外部引擎
//!
//! 外部引擎 API:
//! POST {base_url}/pipeline  {"question": "..."}                 -> Recommendation
//! POST {base_url}/search    {"query": "...", "max_results": 8}  -> [ {...}, ... ]
//! POST {base_url}/judge     {"question": "...", "products": []} -> {...}
//!
//! 400/422 响应体为 {"detail": "..."}，视为输入校验错误

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::ports::{
    EngineError, ProductJudgePort, ProductSearchPort, RecommendationPipelinePort,
};
use crate::domain::{ProductRecord, Recommendation, SearchLimit, Verdict};

#[derive(Debug, Serialize)]
struct PipelineRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
}

#[derive(Debug, Serialize)]
struct JudgeRequest<'a> {
    question: &'a str,
    products: Vec<ProductRecord>,
}

#[derive(Debug, Deserialize)]
struct EngineErrorBody {
    detail: Value,
}

/// HTTP 引擎客户端配置
#[derive(Debug, Clone)]
pub struct HttpEngineClientConfig {
    /// 引擎服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 随请求转发的凭据（secret 名 -> 值）
    pub credentials: BTreeMap<String, String>,
}

impl Default for HttpEngineClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
            credentials: BTreeMap::new(),
        }
    }
}

impl HttpEngineClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_credentials(mut self, credentials: BTreeMap<String, String>) -> Self {
        self.credentials = credentials;
        self
    }
}

/// `TAVILY_API_KEY` -> `x-tavily-api-key`
pub fn credential_header_name(secret_name: &str) -> String {
    format!("x-{}", secret_name.to_ascii_lowercase().replace('_', "-"))
}

/// HTTP 引擎客户端
pub struct HttpEngineClient {
    client: Client,
    config: HttpEngineClientConfig,
}

impl HttpEngineClient {
    pub fn new(config: HttpEngineClientConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn with_credentials(&self, mut builder: RequestBuilder) -> RequestBuilder {
        for (name, value) in &self.config.credentials {
            builder = builder.header(credential_header_name(name), value);
        }
        builder
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, EngineError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(url = %url, "Sending engine request");

        let response = self
            .with_credentials(self.client.post(&url))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EngineError::Timeout
                } else if e.is_connect() {
                    EngineError::NetworkError(format!("Cannot connect to shopping engine: {}", e))
                } else {
                    EngineError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &error_text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))
    }
}

/// 将非 2xx 响应映射为 EngineError
fn classify_failure(status: StatusCode, body: &str) -> EngineError {
    let detail = serde_json::from_str::<EngineErrorBody>(body)
        .map(|b| match b.detail {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            EngineError::Validation(detail)
        }
        _ => EngineError::ServiceError(format!("HTTP {}: {}", status, detail)),
    }
}

#[async_trait]
impl RecommendationPipelinePort for HttpEngineClient {
    async fn run_pipeline(&self, question: &str) -> Result<Recommendation, EngineError> {
        self.post_json("pipeline", &PipelineRequest { question }).await
    }
}

#[async_trait]
impl ProductSearchPort for HttpEngineClient {
    async fn search(
        &self,
        query: &str,
        max_results: SearchLimit,
    ) -> Result<Vec<Value>, EngineError> {
        let request = SearchRequest {
            query,
            max_results: max_results.get(),
        };
        self.post_json("search", &request).await
    }
}

#[async_trait]
impl ProductJudgePort for HttpEngineClient {
    async fn judge_products(
        &self,
        question: &str,
        products: Vec<ProductRecord>,
    ) -> Result<Verdict, EngineError> {
        self.post_json("judge", &JudgeRequest { question, products })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, routing::post, Json, Router};
    use serde_json::json;

    async fn spawn_engine(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: String) -> HttpEngineClient {
        let mut credentials = BTreeMap::new();
        credentials.insert("TAVILY_API_KEY".to_string(), "tvly-test".to_string());
        HttpEngineClient::new(HttpEngineClientConfig::new(base_url).with_credentials(credentials))
            .unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = HttpEngineClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_credential_header_name() {
        assert_eq!(credential_header_name("OPENAI_API_KEY"), "x-openai-api-key");
    }

    #[test]
    fn test_classify_failure() {
        let err = classify_failure(StatusCode::BAD_REQUEST, r#"{"detail":"empty question"}"#);
        assert!(matches!(err, EngineError::Validation(ref m) if m == "empty question"));

        let err = classify_failure(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(matches!(err, EngineError::ServiceError(ref m) if m.contains("upstream down")));
    }

    #[tokio::test]
    async fn test_pipeline_round_trip_with_credentials() {
        let router = Router::new().route(
            "/pipeline",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let key = headers
                    .get("x-tavily-api-key")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({
                    "query": body["question"],
                    "winner": key,
                    "ranking": [key],
                    "reasons": [],
                    "sources": [],
                }))
            }),
        );
        let engine = client(spawn_engine(router).await);

        let rec = engine.run_pipeline("best mouse").await.unwrap();
        assert_eq!(rec.query, "best mouse");
        assert_eq!(rec.winner, "tvly-test");
    }

    #[tokio::test]
    async fn test_search_sends_limit() {
        let router = Router::new().route(
            "/search",
            post(|Json(body): Json<Value>| async move {
                let n = body["max_results"].as_u64().unwrap_or(0);
                Json(json!((0..n).map(|i| json!({ "i": i })).collect::<Vec<_>>()))
            }),
        );
        let engine = client(spawn_engine(router).await);

        let results = engine.search("desk", SearchLimit::default()).await.unwrap();
        assert_eq!(results.len(), 8);
    }

    #[tokio::test]
    async fn test_judge_validation_error() {
        let router = Router::new().route(
            "/judge",
            post(|| async {
                (
                    axum::http::StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "detail": "products must not be empty" })),
                )
            }),
        );
        let engine = client(spawn_engine(router).await);

        let err = engine.judge_products("which", vec![]).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_malformed_recommendation_is_invalid_response() {
        let router = Router::new().route(
            "/pipeline",
            post(|| async { Json(json!({ "query": "x" })) }),
        );
        let engine = client(spawn_engine(router).await);

        let err = engine.run_pipeline("x").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_engine_is_network_error() {
        let engine = client("http://127.0.0.1:1".to_string());
        let err = engine.run_pipeline("x").await.unwrap_err();
        assert!(matches!(err, EngineError::NetworkError(_)));
    }
}
