//! WebSocket chat handler
//!
//! Each connection gets a writer task (outbound channel + keepalive pings)
//! and a reader task that processes inbound frames strictly in order.
//! Whichever finishes first ends the connection, which is then unregistered.

use crate::chat::error::ChatError;
use crate::chat::message::{
    ChatMessage, IncomingMessage, GENERATING_NOTICE, INVALID_FORMAT_NOTICE,
};
use crate::chat::registry::{Connection, ConnectionId, RegistrationGuard};
use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        ConnectInfo, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Interval between keepalive pings
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// WebSocket upgrade handler for `/ws/chat`
pub async fn chat_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, remote, state))
}

// Handle one chat connection from upgrade to close
async fn handle_socket(socket: WebSocket, remote: SocketAddr, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let (connection, mut outbound) = Connection::channel(remote.to_string());
    let connection_id = connection.id();
    state.registry.register(connection);
    let _registration = RegistrationGuard::new(state.registry.clone(), connection_id);

    info!(connection_id = %connection_id, remote = %remote, "Client connected");

    // Drain the outbound channel into the socket, pinging periodically
    let mut send_task = tokio::spawn(async move {
        let mut keepalive = tokio::time::interval(PING_INTERVAL);
        keepalive.tick().await;
        loop {
            tokio::select! {
                text = outbound.recv() => {
                    let Some(text) = text else { break };
                    if let Err(e) = sender.send(Message::Text(text)).await {
                        debug!(error = %e, "Failed to send message");
                        break;
                    }
                }
                _ = keepalive.tick() => {
                    if sender.send(Message::Ping(Vec::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if let Err(e) = process_text(&recv_state, connection_id, &text).await {
                        if e.is_fatal() {
                            debug!(connection_id = %connection_id, error = %e, "Connection unusable");
                            break;
                        }
                        error!(connection_id = %connection_id, error = %e, "Error processing message");
                        let reply = ChatMessage::system(format!(
                            "Server error processing message: {}",
                            e
                        ));
                        let sent = reply
                            .to_json()
                            .and_then(|json| recv_state.registry.send_to(connection_id, &json));
                        if sent.is_err() {
                            break;
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    info!(connection_id = %connection_id, "Client disconnected");
                    break;
                }
                Ok(Message::Binary(data)) => {
                    debug!(connection_id = %connection_id, len = data.len(), "Ignoring binary frame");
                }
                Ok(_) => {
                    // Ping/pong are answered by axum
                }
                Err(e) => {
                    warn!(connection_id = %connection_id, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.registry.unregister(connection_id);
    info!(connection_id = %connection_id, remote = %remote, "WebSocket connection closed");
}

/// Process one inbound text frame
///
/// * Unparseable text: a system error goes back to the sender only.
/// * `/describe`: a notice and then the AI answer are broadcast.
/// * Anything else: the raw text is broadcast unchanged.
///
/// # Arguments
/// * `state` - Application state
/// * `connection_id` - Connection the text arrived on
/// * `text` - Raw frame text
///
/// # Errors
/// Fatal errors (see `ChatError::is_fatal`) mean the sender is gone.
pub async fn process_text(
    state: &AppState,
    connection_id: ConnectionId,
    text: &str,
) -> Result<(), ChatError> {
    let incoming = match IncomingMessage::parse(text) {
        Ok(incoming) => incoming,
        Err(e) => {
            warn!(connection_id = %connection_id, error = %e, data = %text, "Invalid JSON received");
            let reply = ChatMessage::system(INVALID_FORMAT_NOTICE).to_json()?;
            return state.registry.send_to(connection_id, &reply);
        }
    };

    if incoming.is_describe_command() {
        info!(
            connection_id = %connection_id,
            sender_id = %incoming.sender_id,
            "Received /describe command"
        );
        state
            .registry
            .broadcast(&ChatMessage::system(GENERATING_NOTICE).to_json()?);
        let description = state.describer.describe().await;
        state
            .registry
            .broadcast(&ChatMessage::ai(description).to_json()?);
    } else {
        state.registry.broadcast(text);
    }

    Ok(())
}
