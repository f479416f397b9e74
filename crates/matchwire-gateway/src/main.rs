//! matchwire gateway binary.
//!
//! - WebSocket endpoint: /ws/:user_id (identifier trusted, auth upstream)
//! - One task per connection; registry fan-out for chat, typing, calls,
//!   game rooms, and voice relay
//! - Heartbeat ping + idle timeout
//! - /health and /metrics ops endpoints

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matchwire_gateway::{app_state::AppState, config, infra::InMemoryMatchDirectory, router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::load_from_file("matchwire.yaml").expect("config load failed");
    let listen: SocketAddr = cfg
        .gateway
        .listen
        .parse()
        .expect("gateway.listen must be a valid SocketAddr");

    // The relational store behind match membership belongs to the HTTP
    // layer; the standalone binary boots against the in-memory directory.
    let matches = Arc::new(InMemoryMatchDirectory::new());
    let state = AppState::new(cfg, matches);
    let registry = Arc::clone(state.registry());

    tracing::info!(%listen, "matchwire-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .expect("failed to bind");

    axum::serve(listener, router::build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");

    // Disconnect whatever is still registered on the way out.
    registry.drain();
    tracing::info!("registry drained, bye");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
