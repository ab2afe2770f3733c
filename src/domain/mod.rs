//! Domain Layer - 领域层
//!
//! Shopping Context: 购物问答的传输形状与结构校验
//! (搜索、排名、推理都由外部引擎完成，这里只有纯数据)

pub mod shopping;

pub use shopping::{
    DomainError, ProductInfo, ProductRecord, Recommendation, SearchLimit, ShoppingQuery, Verdict,
};
