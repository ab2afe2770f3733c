//! ShopSage - AI 购物推荐 HTTP 服务
//!
//! 启动顺序：dotenv（仅本地）→ 配置 → 日志 → 运行环境 → 凭据（缺失则失败）→ 引擎 → HTTP
//!
//! 写进程环境（dotenv、凭据导出）都发生在多线程 runtime 启动之前。

use std::sync::Arc;

use shopsage::application::SecretStorePort;
use shopsage::config::{
    dotenv_path, load_config, load_dotenv, print_config, AppConfig, CredentialLoader,
    Credentials, RuntimeEnvironment,
};
use shopsage::infrastructure::adapters::{
    FakeEngineClient, GcpSecretManager, GcpSecretManagerConfig, HttpEngineClient,
    HttpEngineClientConfig,
};
use shopsage::infrastructure::http::{AppState, HttpServer, ServerConfig};

fn main() -> anyhow::Result<()> {
    // 本地开发：先载入 dotenv，配置和凭据都能看到文件里的值
    let runtime = RuntimeEnvironment::detect();
    let dotenv_loaded = if runtime.is_managed() {
        false
    } else {
        load_dotenv(&dotenv_path())?
    };

    // 加载配置（优先级：平台变量 > 环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},shopsage={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));
    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    tracing::info!("ShopSage API v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);
    tracing::info!(
        platform = runtime.platform(),
        region = runtime.region(),
        dotenv_loaded,
        "Runtime detected"
    );

    // 凭据在单线程 runtime 中加载，runtime 销毁后再写入进程环境
    let credentials = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(load_credentials(&config, &runtime))?;
    credentials.export();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(serve(config, runtime, credentials))
}

/// 托管环境走 Secret Manager，本地只读进程环境
async fn load_credentials(
    config: &AppConfig,
    runtime: &RuntimeEnvironment,
) -> anyhow::Result<Credentials> {
    let secret_store: Option<Arc<dyn SecretStorePort>> = if runtime.is_managed() {
        let store = GcpSecretManager::new(GcpSecretManagerConfig {
            api_url: config.secrets.api_url.clone(),
            metadata_url: config.secrets.metadata_url.clone(),
            ..Default::default()
        })?;
        Some(Arc::new(store))
    } else {
        None
    };

    let credentials = CredentialLoader::new(config.secrets.clone(), secret_store)
        .load(runtime)
        .await?;
    Ok(credentials)
}

async fn serve(
    config: AppConfig,
    runtime: RuntimeEnvironment,
    credentials: Credentials,
) -> anyhow::Result<()> {
    // 创建外部购物引擎客户端
    let state = if config.engine.fake {
        tracing::warn!("Using in-process fake shopping engine");
        AppState::with_engine(runtime, Arc::new(FakeEngineClient::with_defaults()))
    } else {
        let engine_config = HttpEngineClientConfig::new(config.engine.url.clone())
            .with_timeout(config.engine.timeout_secs)
            .with_credentials(credentials.to_map());
        AppState::with_engine(runtime, Arc::new(HttpEngineClient::new(engine_config)?))
    };

    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let server = HttpServer::new(server_config, state);

    server.run_with_shutdown(shutdown_signal()).await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Ctrl-C 或 SIGTERM（Cloud Run 缩容时发送）
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Received shutdown signal");
}
