//! Shopping Context - Value Objects
//!
//! 所有类型都是构造后不可变的传输形状，没有生命周期

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::DomainError;

/// 单条商品记录（自由形式的 key/value）
pub type ProductRecord = Map<String, Value>;

/// 用户的购物问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingQuery {
    /// Shopping question or comparison query
    pub question: String,
}

impl ShoppingQuery {
    pub fn new(question: impl Into<String>) -> Result<Self, DomainError> {
        let query = Self {
            question: question.into(),
        };
        query.validate()?;
        Ok(query)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.question.trim().is_empty() {
            return Err(DomainError::EmptyQuestion);
        }
        Ok(())
    }
}

/// 搜索返回的候选商品
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub title: String,
    pub url: String,
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl ProductInfo {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
            summary: None,
        }
    }

    /// 转换为自由形式记录
    pub fn into_record(self) -> ProductRecord {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => ProductRecord::new(),
        }
    }
}

/// 完整流水线的推荐结果
///
/// `ranking` 保持外部引擎给出的顺序；`winner` 必须出现在其中。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub query: String,
    pub winner: String,
    pub ranking: Vec<String>,
    pub reasons: Vec<String>,
    pub sources: Vec<Map<String, Value>>,
}

impl Recommendation {
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.ranking.iter().any(|id| id == &self.winner) {
            return Err(DomainError::WinnerNotRanked(self.winner.clone()));
        }
        Ok(())
    }
}

/// 搜索条数上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimit(usize);

impl SearchLimit {
    pub const DEFAULT: usize = 8;

    pub fn new(value: usize) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::InvalidSearchLimit(value));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for SearchLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// 评审结果，结构由外部引擎决定，原样透传
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Verdict(pub Value);

impl Verdict {
    pub fn into_inner(self) -> Value {
        self.0
    }
}
