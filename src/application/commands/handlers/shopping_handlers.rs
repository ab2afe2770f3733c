//! Shopping Command Handlers
//!
//! 每个 handler 只做一件事：校验输入 → 调用外部引擎 → 校验返回形状

use std::sync::Arc;

use crate::application::commands::shopping_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{ProductJudgePort, ProductSearchPort, RecommendationPipelinePort};
use crate::domain::{SearchLimit, ShoppingQuery};

/// Recommend Handler - 完整推荐流水线
pub struct RecommendHandler {
    pipeline: Arc<dyn RecommendationPipelinePort>,
}

impl RecommendHandler {
    pub fn new(pipeline: Arc<dyn RecommendationPipelinePort>) -> Self {
        Self { pipeline }
    }

    pub async fn handle(&self, cmd: RecommendCommand) -> Result<RecommendResponse, ApplicationError> {
        let query = ShoppingQuery::new(cmd.question)?;

        tracing::info!(question = %query.question, "Running recommendation pipeline");

        let recommendation = self.pipeline.run_pipeline(&query.question).await?;

        recommendation
            .validate()
            .map_err(|e| ApplicationError::InvalidCollaboratorResponse(e.to_string()))?;

        tracing::info!(
            winner = %recommendation.winner,
            ranked = recommendation.ranking.len(),
            sources = recommendation.sources.len(),
            "Recommendation completed"
        );

        Ok(RecommendResponse { recommendation })
    }
}

/// SearchProducts Handler - 仅搜索
pub struct SearchProductsHandler {
    search: Arc<dyn ProductSearchPort>,
}

impl SearchProductsHandler {
    pub fn new(search: Arc<dyn ProductSearchPort>) -> Self {
        Self { search }
    }

    pub async fn handle(
        &self,
        cmd: SearchProductsCommand,
    ) -> Result<SearchProductsResponse, ApplicationError> {
        let limit = match cmd.max_results {
            Some(n) => SearchLimit::new(n)?,
            None => SearchLimit::default(),
        };

        tracing::debug!(query = %cmd.query, max_results = limit.get(), "Searching products");

        let results = self.search.search(&cmd.query, limit).await?;

        tracing::info!(query = %cmd.query, found = results.len(), "Product search completed");

        Ok(SearchProductsResponse {
            query: cmd.query,
            results,
        })
    }
}

/// AnalyzeProducts Handler - 对已有商品排名
pub struct AnalyzeProductsHandler {
    judge: Arc<dyn ProductJudgePort>,
}

impl AnalyzeProductsHandler {
    pub fn new(judge: Arc<dyn ProductJudgePort>) -> Self {
        Self { judge }
    }

    pub async fn handle(
        &self,
        cmd: AnalyzeProductsCommand,
    ) -> Result<AnalyzeProductsResponse, ApplicationError> {
        tracing::debug!(
            question = %cmd.question,
            products = cmd.products.len(),
            "Judging products"
        );

        let verdict = self.judge.judge_products(&cmd.question, cmd.products).await?;

        Ok(AnalyzeProductsResponse { verdict })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::{FakeEngineClient, FakeEngineClientConfig, FakeFailure};
    use serde_json::json;

    fn fake(failure: Option<FakeFailure>) -> Arc<FakeEngineClient> {
        Arc::new(FakeEngineClient::new(FakeEngineClientConfig {
            failure,
            ..Default::default()
        }))
    }

    #[tokio::test]
    async fn test_recommend_winner_in_ranking() {
        let handler = RecommendHandler::new(fake(None));
        let resp = handler
            .handle(RecommendCommand {
                question: "best noise cancelling headphones".to_string(),
            })
            .await
            .unwrap();

        let rec = resp.recommendation;
        assert_eq!(rec.query, "best noise cancelling headphones");
        assert!(rec.ranking.contains(&rec.winner));
    }

    #[tokio::test]
    async fn test_recommend_blank_question_is_validation() {
        let engine = fake(None);
        let handler = RecommendHandler::new(engine.clone());
        let err = handler
            .handle(RecommendCommand {
                question: "  ".to_string(),
            })
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(engine.pipeline_calls(), 0);
    }

    #[tokio::test]
    async fn test_recommend_engine_validation_passes_message() {
        let handler = RecommendHandler::new(fake(Some(FakeFailure::Validation(
            "Question too vague".to_string(),
        ))));
        let err = handler
            .handle(RecommendCommand {
                question: "stuff".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(ref m) if m == "Question too vague"));
    }

    #[tokio::test]
    async fn test_recommend_unranked_winner_rejected() {
        let handler = RecommendHandler::new(fake(Some(FakeFailure::UnrankedWinner)));
        let err = handler
            .handle(RecommendCommand {
                question: "best kettle".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::InvalidCollaboratorResponse(_)));
    }

    #[tokio::test]
    async fn test_search_defaults_to_eight() {
        let engine = fake(None);
        let handler = SearchProductsHandler::new(engine.clone());
        let resp = handler
            .handle(SearchProductsCommand {
                query: "usb-c hub".to_string(),
                max_results: None,
            })
            .await
            .unwrap();

        assert_eq!(resp.query, "usb-c hub");
        assert_eq!(resp.results.len(), 8);
        assert_eq!(engine.last_search_limit(), Some(8));
    }

    #[tokio::test]
    async fn test_search_zero_limit_rejected() {
        let handler = SearchProductsHandler::new(fake(None));
        let err = handler
            .handle(SearchProductsCommand {
                query: "usb-c hub".to_string(),
                max_results: Some(0),
            })
            .await
            .unwrap_err();

        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_analyze_forwards_products() {
        let handler = AnalyzeProductsHandler::new(fake(None));
        let products = vec![
            json!({ "title": "A", "url": "https://a" }).as_object().unwrap().clone(),
            json!({ "title": "B", "url": "https://b" }).as_object().unwrap().clone(),
        ];
        let resp = handler
            .handle(AnalyzeProductsCommand {
                question: "which is better".to_string(),
                products,
            })
            .await
            .unwrap();

        let verdict = resp.verdict.into_inner();
        assert_eq!(verdict["winner"], json!("A"));
        assert_eq!(verdict["ranking"], json!(["A", "B"]));
    }

    #[tokio::test]
    async fn test_analyze_service_failure() {
        let handler = AnalyzeProductsHandler::new(fake(Some(FakeFailure::Service(
            "LLM quota exceeded".to_string(),
        ))));
        let err = handler
            .handle(AnalyzeProductsCommand {
                question: "which".to_string(),
                products: vec![],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ExternalServiceError(_)));
    }
}
