//! Secret Store Adapter

mod gcp_secret_manager;

pub use gcp_secret_manager::{GcpSecretManager, GcpSecretManagerConfig};
