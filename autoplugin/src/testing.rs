//! テスト用サーバー
//!
//! アプリをバックグラウンドタスクで起動し、スコープを抜けるときに必ず停止する。

use crate::app::PluginApp;
use crate::shutdown::ShutdownController;
use autoplugin_common::error::{PluginError, PluginResult};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

/// バックグラウンドで動くテスト用サーバー
///
/// `stop()` を呼ぶか、ドロップされると停止を要求する
pub struct TestServer {
    addr: SocketAddr,
    shutdown: ShutdownController,
    handle: Option<JoinHandle<PluginResult<()>>>,
}

impl TestServer {
    /// サーバーを起動する（`port` に0を渡すと空きポートを使う）
    ///
    /// 戻った時点で接続を受け付けられる
    pub async fn spawn(app: &PluginApp, host: &str, port: u16) -> PluginResult<Self> {
        let listener = TcpListener::bind((host, port)).await?;
        let addr = listener.local_addr()?;
        let shutdown = ShutdownController::default();

        let signal = {
            let shutdown = shutdown.clone();
            async move { shutdown.wait().await }
        };
        let handle = tokio::spawn(crate::server::serve(app.router(), listener, signal));
        info!(addr = %addr, "Test server started");

        Ok(Self {
            addr,
            shutdown,
            handle: Some(handle),
        })
    }

    /// 待ち受けアドレス
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://host:port`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// パスを付けたURL
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    /// 停止してタスクの終了を待つ
    pub async fn stop(mut self) -> PluginResult<()> {
        self.shutdown.request_shutdown();
        match self.handle.take() {
            Some(handle) => handle
                .await
                .map_err(|e| PluginError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?,
            None => Ok(()),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.request_shutdown();
    }
}

/// テスト用サーバーを起動してクロージャにベースURLを渡す
///
/// クロージャが終わるとサーバーを停止する
pub async fn with_test_server<F, Fut, T>(
    app: &PluginApp,
    host: &str,
    port: u16,
    f: F,
) -> PluginResult<T>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = T>,
{
    let server = TestServer::spawn(app, host, port).await?;
    let output = f(server.base_url()).await;
    server.stop().await?;
    Ok(output)
}

/// レスポンスを `Response: <json>` または `Error: <status> - <text>` の形式で表す
pub async fn format_response(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    if status.is_success() {
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(json) => format!("Response: {}", json),
            Err(_) => format!("Response: {}", text),
        }
    } else {
        format!("Error: {} - {}", status.as_u16(), text)
    }
}
