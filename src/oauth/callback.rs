//! Loopback redirect listener for the consent flow.
//!
//! Binds an ephemeral port on 127.0.0.1 and serves a single redirect. The
//! wait blocks on external action (human + browser + identity provider);
//! the operator aborts with Ctrl-C, no timeout is imposed.

use crate::error::SetupError;
use crate::Result;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

const LANDING_PAGE: &str = "<html><body style=\"font-family: sans-serif; text-align: center; padding-top: 4em\">\
<h2>Authorization received</h2><p>You can close this window and return to the terminal.</p>\
</body></html>";

/// Query parameters delivered on the redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

type ParamsSender = Arc<Mutex<Option<oneshot::Sender<CallbackParams>>>>;

pub struct CallbackServer {
    listener: TcpListener,
    port: u16,
}

impl CallbackServer {
    /// Bind 127.0.0.1 on an ephemeral port.
    pub async fn bind() -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let port = listener.local_addr()?.port();
        Ok(Self { listener, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The redirect URI registered with the authorization request.
    pub fn redirect_uri(&self) -> String {
        format!("http://127.0.0.1:{}/", self.port)
    }

    /// Serve until the redirect arrives, then validate it and return the
    /// authorization code.
    pub async fn wait_for_code(self, expected_state: &str) -> Result<String> {
        let (tx, rx) = oneshot::channel::<CallbackParams>();
        let tx: ParamsSender = Arc::new(Mutex::new(Some(tx)));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = Router::new().route("/", get(handle_redirect)).with_state(tx);
        let server = tokio::spawn(async move {
            let _ = axum::serve(self.listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        let params = rx
            .await
            .map_err(|_| anyhow::anyhow!("authorization callback listener stopped unexpectedly"));

        // Graceful shutdown lets the landing page flush to the browser
        let _ = shutdown_tx.send(());
        let _ = server.await;
        let params = params?;

        if let Some(error) = params.error {
            return Err(SetupError::AuthorizationDenied { reason: error }.into());
        }
        if params.state.as_deref() != Some(expected_state) {
            anyhow::bail!("authorization redirect carried an unexpected state parameter");
        }
        params
            .code
            .ok_or_else(|| anyhow::anyhow!("authorization redirect carried no code"))
    }
}

async fn handle_redirect(
    State(tx): State<ParamsSender>,
    Query(params): Query<CallbackParams>,
) -> Html<&'static str> {
    if let Some(sender) = tx.lock().ok().and_then(|mut guard| guard.take()) {
        let _ = sender.send(params);
    }
    Html(LANDING_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_assigns_ephemeral_port() {
        let server = CallbackServer::bind().await.unwrap();
        assert_ne!(server.port(), 0);
        assert_eq!(
            server.redirect_uri(),
            format!("http://127.0.0.1:{}/", server.port())
        );
    }

    #[tokio::test]
    async fn test_wait_for_code_returns_code() {
        let server = CallbackServer::bind().await.unwrap();
        let uri = server.redirect_uri();

        let fetch = tokio::spawn(async move {
            // Give the listener a moment to start serving
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            reqwest::get(format!("{}?code=abc123&state=expected", uri))
                .await
                .unwrap()
        });

        let code = server.wait_for_code("expected").await.unwrap();
        assert_eq!(code, "abc123");

        let response = fetch.await.unwrap();
        assert!(response.status().is_success());
    }

    #[tokio::test]
    async fn test_wait_for_code_denied() {
        let server = CallbackServer::bind().await.unwrap();
        let uri = server.redirect_uri();

        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            let _ = reqwest::get(format!("{}?error=access_denied", uri)).await;
        });

        let err = server.wait_for_code("expected").await.unwrap_err();
        let setup = err.downcast::<SetupError>().unwrap();
        assert!(matches!(setup, SetupError::AuthorizationDenied { .. }));
    }

    #[tokio::test]
    async fn test_wait_for_code_state_mismatch() {
        let server = CallbackServer::bind().await.unwrap();
        let uri = server.redirect_uri();

        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            let _ = reqwest::get(format!("{}?code=abc&state=wrong", uri)).await;
        });

        let err = server.wait_for_code("expected").await.unwrap_err();
        assert!(err.to_string().contains("state"));
    }
}
