//! Shopping Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Question must not be empty")]
    EmptyQuestion,

    #[error("max_results must be at least 1, got {0}")]
    InvalidSearchLimit(usize),

    #[error("Winner '{0}' does not appear in the ranking")]
    WinnerNotRanked(String),
}
