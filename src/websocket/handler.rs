//! WebSocket Handler
//!
//! Handles WebSocket upgrade requests and manages the connection lifecycle.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::messages::{ClientMessage, ServerMessage};
use crate::api::auth::{RequireAuth, Session};
use crate::api::AppState;

type Outbox = mpsc::UnboundedSender<ServerMessage>;

/// WebSocket upgrade handler
///
/// Unauthenticated upgrades are rejected with 401 before the handshake.
pub async fn chat_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, session))
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, session: Session) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let user_id = session.user.id.clone();

    let chat = state.chats.session(&session.user).await;
    let connected = {
        let chat = chat.lock().await;
        ServerMessage::Connected {
            session_id: chat.id().to_string(),
            messages: chat.messages().to_vec(),
        }
    };
    let _ = tx.send(connected);
    tracing::debug!(user_id = %user_id, "Chat socket connected");

    // Task to forward messages from channel to WebSocket
    let user_for_send = user_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(text) => {
                    if sender.send(Message::Text(text)).await.is_err() {
                        tracing::debug!(user_id = %user_for_send, "WebSocket send failed, closing connection");
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize message");
                }
            }
        }
    });

    // Task to receive messages from WebSocket and handle them
    let user_for_recv = user_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(msg) => {
                    if !handle_ws_message(&state, &session, &tx, msg).await {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(user_id = %user_for_recv, error = %e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    tracing::debug!(user_id = %user_id, "Chat socket closed");
}

/// Handle a received WebSocket message
///
/// Returns false if the connection should be closed.
async fn handle_ws_message(state: &AppState, session: &Session, tx: &Outbox, message: Message) -> bool {
    match message {
        Message::Text(text) => {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_client_message(state, session, tx, client_msg).await,
                Err(e) => {
                    tracing::debug!(user_id = %session.user.id, error = %e, "Invalid client message");
                    // Send error but keep connection open
                    let _ = tx.send(ServerMessage::Error {
                        message: format!("Invalid message format: {}", e),
                    });
                }
            }
            true
        }
        Message::Binary(_) => {
            let _ = tx.send(ServerMessage::Error {
                message: "Binary messages not supported".to_string(),
            });
            true
        }
        // Axum answers pings itself
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            tracing::debug!(user_id = %session.user.id, "Client requested close");
            false
        }
    }
}

/// Handle a parsed client message
async fn handle_client_message(state: &AppState, session: &Session, tx: &Outbox, message: ClientMessage) {
    match message {
        ClientMessage::Send { text } => {
            let chat = state.chats.session(&session.user).await;
            let mut chat = chat.lock().await;
            let result = chat
                .send_stream(&state.ai, &text, |chunk| {
                    let _ = tx.send(ServerMessage::Chunk {
                        text: chunk.to_string(),
                    });
                })
                .await;

            let reply = match result {
                Ok(message) => ServerMessage::Done { message },
                Err(e) => ServerMessage::Error {
                    message: e.to_string(),
                },
            };
            let _ = tx.send(reply);
        }
        ClientMessage::History => {
            let messages = state.chats.transcript(&session.user).await;
            let _ = tx.send(ServerMessage::Transcript { messages });
        }
        ClientMessage::Reset => {
            state.chats.reset(&session.user.id).await;
            let _ = tx.send(ServerMessage::Cleared);
        }
        ClientMessage::Ping => {
            let _ = tx.send(ServerMessage::Pong);
        }
    }
}
