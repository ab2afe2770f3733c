//! Application State

use std::sync::Arc;

use crate::application::{
    AnalyzeProductsHandler, ProductJudgePort, ProductSearchPort, RecommendHandler,
    RecommendationPipelinePort, SearchProductsHandler,
};
use crate::config::RuntimeEnvironment;

/// 应用状态
///
/// 启动后只读，请求之间不共享可变状态
pub struct AppState {
    pub runtime: RuntimeEnvironment,

    // ========== Command Handlers ==========
    pub recommend_handler: RecommendHandler,
    pub search_products_handler: SearchProductsHandler,
    pub analyze_products_handler: AnalyzeProductsHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        runtime: RuntimeEnvironment,
        pipeline: Arc<dyn RecommendationPipelinePort>,
        search: Arc<dyn ProductSearchPort>,
        judge: Arc<dyn ProductJudgePort>,
    ) -> Self {
        Self {
            runtime,
            recommend_handler: RecommendHandler::new(pipeline),
            search_products_handler: SearchProductsHandler::new(search),
            analyze_products_handler: AnalyzeProductsHandler::new(judge),
        }
    }

    /// 三个端口由同一个引擎客户端实现时的便捷构造
    pub fn with_engine<E>(runtime: RuntimeEnvironment, engine: Arc<E>) -> Self
    where
        E: RecommendationPipelinePort + ProductSearchPort + ProductJudgePort + 'static,
    {
        Self::new(runtime, engine.clone(), engine.clone(), engine)
    }
}
