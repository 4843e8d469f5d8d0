//! axumサーバー起動・シャットダウンハンドリング

use crate::app::PluginApp;
use crate::shutdown::ShutdownController;
use autoplugin_common::error::PluginResult;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// サーバーを起動し、Ctrl+C / SIGTERM まで待機する
pub async fn launch(app: &PluginApp, host: &str, port: u16) -> PluginResult<()> {
    launch_with_shutdown(app, &format!("{}:{}", host, port), ShutdownController::default()).await
}

/// サーバーを起動し、シグナルまたは `shutdown` の要求まで待機する
pub async fn launch_with_shutdown(
    app: &PluginApp,
    bind_addr: &str,
    shutdown: ShutdownController,
) -> PluginResult<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!(
        addr = %listener.local_addr()?,
        endpoints = app.routes().len(),
        "Plugin server listening"
    );
    serve(app.router(), listener, shutdown_signal(shutdown)).await
}

/// バインド済みのリスナーでルーターを動かす
pub(crate) async fn serve<F>(router: Router, listener: TcpListener, signal: F) -> PluginResult<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(signal)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// シャットダウンシグナルを待機
async fn shutdown_signal(shutdown: ShutdownController) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
        _ = shutdown.wait() => {
            info!("Shutdown requested, shutting down...");
        }
    }
}
