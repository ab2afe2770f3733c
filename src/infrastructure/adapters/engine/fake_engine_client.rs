//! Fake Engine Client - 用于测试和本地演示的购物引擎
//!
//! 不调用任何外部服务，返回确定性的结果

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::application::ports::{
    EngineError, ProductJudgePort, ProductSearchPort, RecommendationPipelinePort,
};
use crate::domain::{ProductInfo, ProductRecord, Recommendation, SearchLimit, Verdict};

/// 注入的失败模式
#[derive(Debug, Clone)]
pub enum FakeFailure {
    /// 所有调用返回 `EngineError::Validation`
    Validation(String),
    /// 所有调用返回 `EngineError::ServiceError`
    Service(String),
    /// 流水线返回 winner 不在 ranking 中的结果
    UnrankedWinner,
}

/// Fake Engine Client 配置
#[derive(Debug, Clone)]
pub struct FakeEngineClientConfig {
    /// 流水线固定返回的候选数量
    pub candidates: usize,
    /// 模拟延迟（毫秒）
    pub latency_ms: u64,
    pub failure: Option<FakeFailure>,
}

impl Default for FakeEngineClientConfig {
    fn default() -> Self {
        Self {
            candidates: 3,
            latency_ms: 0,
            failure: None,
        }
    }
}

/// Fake Engine Client
pub struct FakeEngineClient {
    config: FakeEngineClientConfig,
    pipeline_calls: AtomicUsize,
    last_search_limit: Mutex<Option<usize>>,
}

impl FakeEngineClient {
    pub fn new(config: FakeEngineClientConfig) -> Self {
        tracing::info!(
            candidates = config.candidates,
            failure = ?config.failure,
            "FakeEngineClient initialized"
        );
        Self {
            config,
            pipeline_calls: AtomicUsize::new(0),
            last_search_limit: Mutex::new(None),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeEngineClientConfig::default())
    }

    pub fn pipeline_calls(&self) -> usize {
        self.pipeline_calls.load(Ordering::SeqCst)
    }

    pub fn last_search_limit(&self) -> Option<usize> {
        self.last_search_limit.lock().ok().and_then(|guard| *guard)
    }

    async fn simulate(&self) -> Result<(), EngineError> {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
        match &self.config.failure {
            Some(FakeFailure::Validation(msg)) => Err(EngineError::Validation(msg.clone())),
            Some(FakeFailure::Service(msg)) => Err(EngineError::ServiceError(msg.clone())),
            _ => Ok(()),
        }
    }

    fn product(query: &str, index: usize) -> ProductInfo {
        ProductInfo::new(
            format!("{} #{}", query, index),
            format!("https://shop.example.com/p/{}", index),
            format!("Candidate {} for \"{}\"", index, query),
        )
    }
}

#[async_trait]
impl RecommendationPipelinePort for FakeEngineClient {
    async fn run_pipeline(&self, question: &str) -> Result<Recommendation, EngineError> {
        self.pipeline_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate().await?;

        let ranking: Vec<String> = (1..=self.config.candidates)
            .map(|i| format!("product-{}", i))
            .collect();
        let winner = match self.config.failure {
            Some(FakeFailure::UnrankedWinner) => "product-unranked".to_string(),
            _ => ranking.first().cloned().unwrap_or_default(),
        };
        let sources = (1..=self.config.candidates)
            .map(|i| Self::product(question, i).into_record())
            .collect::<Vec<Map<String, Value>>>();

        Ok(Recommendation {
            query: question.to_string(),
            winner,
            ranking,
            reasons: vec![
                "Best overall match for the question".to_string(),
                "Strongest reviews among the candidates".to_string(),
            ],
            sources,
        })
    }
}

#[async_trait]
impl ProductSearchPort for FakeEngineClient {
    async fn search(
        &self,
        query: &str,
        max_results: SearchLimit,
    ) -> Result<Vec<Value>, EngineError> {
        if let Ok(mut guard) = self.last_search_limit.lock() {
            *guard = Some(max_results.get());
        }
        self.simulate().await?;

        Ok((1..=max_results.get())
            .map(|i| Value::Object(Self::product(query, i).into_record()))
            .collect())
    }
}

#[async_trait]
impl ProductJudgePort for FakeEngineClient {
    async fn judge_products(
        &self,
        question: &str,
        products: Vec<ProductRecord>,
    ) -> Result<Verdict, EngineError> {
        self.simulate().await?;

        let ranking: Vec<Value> = products
            .iter()
            .enumerate()
            .map(|(i, p)| {
                p.get("title")
                    .cloned()
                    .unwrap_or_else(|| Value::String(format!("product-{}", i + 1)))
            })
            .collect();
        let winner = ranking.first().cloned().unwrap_or(Value::Null);

        Ok(Verdict(json!({
            "question": question,
            "winner": winner,
            "ranking": ranking,
            "reasons": ["Ranked in submission order"],
        })))
    }
}
