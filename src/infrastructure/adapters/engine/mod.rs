//! Engine Adapter - 外部购物引擎客户端实现

mod fake_engine_client;
mod http_engine_client;

pub use fake_engine_client::{FakeEngineClient, FakeEngineClientConfig, FakeFailure};
pub use http_engine_client::*;
