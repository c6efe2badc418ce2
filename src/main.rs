use syncit_backend::config::AppConfig;
use syncit_backend::db::DbEngine;
use syncit_backend::logging;
use syncit_backend::router::create_router;
use syncit_backend::state::AppState;

/// 等待退出信号（Ctrl+C / SIGTERM），用于优雅关闭
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Ctrl+C 信号处理器安装失败: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("SIGTERM 信号处理器安装失败: {e}");
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

    tracing::info!("接收到退出信号，开始优雅关闭 HTTP 服务器...");
}

#[tokio::main]
async fn main() {
    // 本地开发的 .env 支持（缺失时静默跳过）
    dotenvy::dotenv().ok();

    // Load config
    if let Err(e) = AppConfig::init_global() {
        eprintln!("Config init failed: {e}");
        std::process::exit(1);
    }
    let config = AppConfig::global();

    logging::init(&config.logging, config.debug);
    tracing::info!(
        "environment = {}, debug = {}, database = {}",
        config.environment,
        config.debug,
        config.database.redacted_display()
    );

    // 显式构造连接池并注入应用状态（惰性建连）
    let db = DbEngine::new(&config.database);
    if let Err(e) = db.init_schema().await {
        // 数据库暂不可达时照常启动，由 /health/ready 反映就绪状态
        tracing::warn!("Schema init skipped: {e}");
    }

    let state = AppState { db };
    let app = create_router(state, &config.api.prefix);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Bind address failed {addr}: {e}");
            std::process::exit(1);
        });

    tracing::info!("Server: http://{addr}");
    tracing::info!("Docs: http://{addr}{}/docs", config.api.prefix);
    tracing::info!("Health: http://{addr}{}/health", config.api.prefix);

    let graceful = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    if let Err(e) = graceful.await {
        tracing::error!("服务器运行错误: {e}");
        std::process::exit(1);
    }

    tracing::info!("服务器已优雅关闭");
}
