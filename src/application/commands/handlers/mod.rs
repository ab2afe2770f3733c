//! Command Handlers

mod shopping_handlers;

pub use shopping_handlers::{AnalyzeProductsHandler, RecommendHandler, SearchProductsHandler};
