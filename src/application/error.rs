//! 应用层错误定义
//!
//! 统一的命令错误类型

use thiserror::Error;

use crate::application::ports::EngineError;
use crate::domain::DomainError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 验证错误（输入无效，客户端错误）
    #[error("{0}")]
    ValidationError(String),

    /// 外部引擎错误
    #[error("{0}")]
    ExternalServiceError(String),

    /// 外部引擎返回了不符合契约的数据
    #[error("Invalid response from shopping engine: {0}")]
    InvalidCollaboratorResponse(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<EngineError> for ApplicationError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(msg) => Self::ValidationError(msg),
            EngineError::InvalidResponse(msg) => Self::InvalidCollaboratorResponse(msg),
            other => Self::ExternalServiceError(other.to_string()),
        }
    }
}
