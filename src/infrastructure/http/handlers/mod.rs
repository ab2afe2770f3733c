//! HTTP Handlers

mod meta;
mod shopping;

pub use meta::*;
pub use shopping::*;
