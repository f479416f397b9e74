//! WebSocket session handling.
//!
//! One task per connection: an mpsc queue feeds the writer half while the
//! reader half decodes and dispatches one frame at a time, so a sender's
//! frames reach the registry in the order they were issued. The session
//! pings on an interval and closes after `idle_timeout_ms` of silence, since
//! a vanished peer would otherwise sit in the registry until the next failed
//! write.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};

use matchwire_core::error::MatchwireError;
use matchwire_core::protocol::server::{now_millis, PreparedFrame, ServerFrame};
use matchwire_core::types::UserId;

use crate::app_state::AppState;
use crate::realtime::Connection;
use crate::services;
use crate::transport::codec;

pub async fn ws_upgrade(
    State(app): State<AppState>,
    Path(user_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    // The identifier is trusted here; authentication happened upstream.
    ws.on_upgrade(move |socket| run_session(app, UserId(user_id), socket))
}

async fn run_session(app: AppState, user: UserId, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(app.cfg().gateway.outbound_queue);

    let seq = app
        .registry()
        .connect(user.clone(), Connection { tx: out_tx.clone() });
    app.metrics().connections_opened.inc();
    app.metrics().connections_active.inc();
    tracing::info!(user = %user, "session opened");

    if let Ok(hello) = PreparedFrame::encode(&ServerFrame::Connected {
        user_id: user.clone(),
        timestamp: now_millis(),
    }) {
        let _ = out_tx.send(Message::Text(hello.into_string())).await;
    }

    let ping_every = Duration::from_millis(app.cfg().gateway.ping_interval_ms);
    let idle_timeout = Duration::from_millis(app.cfg().gateway.idle_timeout_ms);
    let mut ping = interval(ping_every);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_seen = Instant::now();

    loop {
        tokio::select! {
            maybe_out = out_rx.recv() => {
                match maybe_out {
                    Some(m) => {
                        if ws_tx.send(m).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            _ = ping.tick() => {
                if last_seen.elapsed() >= idle_timeout {
                    tracing::info!(user = %user, "idle timeout");
                    break;
                }
                if ws_tx.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }

            incoming = ws_rx.next() => {
                let Some(Ok(msg)) = incoming else { break; };
                last_seen = Instant::now();

                match &msg {
                    Message::Ping(payload) => {
                        let _ = out_tx.send(Message::Pong(payload.clone())).await;
                        continue;
                    }
                    Message::Pong(_) => continue,
                    Message::Close(_) => break,
                    _ => {}
                }

                // Decode once. A bad frame answers the sender and leaves the
                // session (and everyone else's) running.
                let frame = match codec::decode(&msg) {
                    Ok(Some(frame)) => frame,
                    Ok(None) => continue,
                    Err(e) => {
                        app.metrics().decode_errors.inc();
                        tracing::warn!(user = %user, error = %e, "dropping malformed frame");
                        send_error(&out_tx, &e).await;
                        continue;
                    }
                };

                if let Err(e) = app.dispatcher().dispatch(&user, frame).await {
                    tracing::debug!(user = %user, error = %e, "dispatch rejected frame");
                    send_error(&out_tx, &e).await;
                }
            }
        }
    }

    // Scoped removal: a superseded session must not evict its successor.
    app.registry().disconnect_session(&user, seq);
    for room in app.rooms().cleanup_user(&user) {
        let _ = services::game::broadcast_roster(app.dispatcher(), &room);
    }
    app.metrics().connections_active.dec();
    tracing::info!(user = %user, "session closed");
}

async fn send_error(out_tx: &mpsc::Sender<Message>, err: &MatchwireError) {
    if let Ok(frame) = PreparedFrame::encode(&ServerFrame::Error {
        code: err.client_code().as_str(),
        message: err.to_string(),
        timestamp: now_millis(),
    }) {
        let _ = out_tx.send(Message::Text(frame.into_string())).await;
    }
}
