//! 应用层 - 命令
//!
//! 每个命令对应一次外部引擎调用

mod shopping_commands;

pub mod handlers;

pub use shopping_commands::*;
