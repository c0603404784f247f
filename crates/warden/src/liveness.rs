//! Plain HTTP liveness probe, independent of the bot.

use std::{
    net::{SocketAddr, TcpListener},
    thread::{self, JoinHandle},
};

use axum::{routing::get, Router};

use warden_core::Result;

pub const BODY: &str = "I'm alive!";

/// Every GET, on any path, answers `200 I'm alive!`.
pub fn router() -> Router {
    Router::new().fallback_service(get(alive))
}

async fn alive() -> &'static str {
    BODY
}

/// Bind `addr` and serve on a dedicated OS thread with its own runtime.
///
/// Binding happens on the caller's thread so a busy port fails startup.
pub fn spawn(addr: SocketAddr) -> Result<JoinHandle<()>> {
    spawn_on(TcpListener::bind(addr)?)
}

/// Serve on an already-bound listener from a dedicated OS thread.
pub fn spawn_on(listener: TcpListener) -> Result<JoinHandle<()>> {
    listener.set_nonblocking(true)?;

    let handle = thread::Builder::new()
        .name("liveness".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!("liveness runtime failed to start: {e}");
                    return;
                }
            };
            runtime.block_on(async move {
                if let Err(e) = serve(listener).await {
                    tracing::error!("liveness endpoint stopped: {e}");
                }
            });
        })?;

    Ok(handle)
}

async fn serve(listener: TcpListener) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::from_std(listener)?;
    axum::serve(listener, router()).await
}
