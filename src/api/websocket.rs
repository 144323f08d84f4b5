//! WebSocket stream of the notification queue
//!
//! View layers connect, receive the current queue and every change after
//! it, and may dismiss toasts (with the session token) over the same socket.

use axum::{
    extract::{ws::*, State},
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::server::SharedState;
use crate::notifications::{Notification, NotificationId, ToastSlot};

// ============================================================================
// Message Types
// ============================================================================

/// Messages from client to server
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "PascalCase")]
pub enum ClientMessage {
    /// Close a toast; `token` must match the session CSRF token
    Dismiss { id: NotificationId, token: String },
    /// Keep-alive ping
    Ping,
}

/// Messages from server to client
#[derive(Debug, Serialize, Clone)]
#[serde(tag = "type", rename_all = "PascalCase")]
pub enum ServerMessage {
    /// Full queue contents with their stacked slots
    Snapshot {
        notifications: Vec<Notification>,
        slots: Vec<ToastSlot>,
    },
    /// Confirmation of a dismissal
    Dismissed { id: NotificationId, removed: bool },
    /// Error message
    Error { message: String },
    /// Response to Ping
    Pong,
}

// ============================================================================
// WebSocket Handler
// ============================================================================

/// Handle WebSocket upgrade requests
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

fn snapshot_message(state: &SharedState, notifications: Vec<Notification>) -> ServerMessage {
    let slots = state.layout.arrange(notifications.iter().map(|n| n.id));
    ServerMessage::Snapshot {
        notifications,
        slots,
    }
}

/// Handle individual WebSocket connections
async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();
    let mut updates = state.center().subscribe();

    let initial = updates.borrow_and_update().clone();
    if send(&mut sender, &snapshot_message(&state, initial)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let notifications = updates.borrow_and_update().clone();
                if send(&mut sender, &snapshot_message(&state, notifications)).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                let Some(Ok(msg)) = incoming else {
                    break;
                };
                let reply = match msg {
                    Message::Text(text) => handle_client_message(&state, text.as_str()).await,
                    Message::Close(_) => break,
                    _ => continue,
                };
                if send(&mut sender, &reply).await.is_err() {
                    break;
                }
            }
        }
    }

    debug!("WebSocket client disconnected");
}

async fn handle_client_message(state: &SharedState, text: &str) -> ServerMessage {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Dismiss { id, token }) => {
            if !state.guard.validate_token(&token) {
                return ServerMessage::Error {
                    message: "CSRF token missing or mismatched".to_string(),
                };
            }
            let removed = state.notifications.dismiss(id).await;
            ServerMessage::Dismissed { id, removed }
        }
        Ok(ClientMessage::Ping) => ServerMessage::Pong,
        Err(e) => ServerMessage::Error {
            message: format!("Invalid message: {}", e),
        },
    }
}

async fn send<S>(sender: &mut S, msg: &ServerMessage) -> Result<(), ()>
where
    S: SinkExt<Message> + Unpin,
{
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    sender.send(Message::Text(json.into())).await.map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::server::AppState;
    use crate::config::Config;
    use crate::notifications::Toast;
    use std::sync::Arc;

    fn state() -> SharedState {
        Arc::new(AppState::new(Config::default()).unwrap())
    }

    #[test]
    fn test_client_message_format() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"Dismiss","id":17,"token":"abc"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Dismiss { id, .. } if id == NotificationId::from(17)));

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"Ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_server_message_format() {
        let json = serde_json::to_string(&ServerMessage::Pong).unwrap();
        assert_eq!(json, r#"{"type":"Pong"}"#);
    }

    #[tokio::test]
    async fn test_dismiss_requires_token() {
        let state = state();
        let id = state.notifications.enqueue(Toast::info("hello")).await;

        let text = format!(r#"{{"type":"Dismiss","id":{},"token":"wrong"}}"#, id);
        let reply = handle_client_message(&state, &text).await;
        assert!(matches!(reply, ServerMessage::Error { .. }));
        assert!(state.center().contains(id).await);

        let token = state.guard.get_token().unwrap();
        let text = format!(
            r#"{{"type":"Dismiss","id":{},"token":"{}"}}"#,
            id, token
        );
        let reply = handle_client_message(&state, &text).await;
        assert!(matches!(reply, ServerMessage::Dismissed { removed: true, .. }));
        assert!(!state.center().contains(id).await);
    }

    #[tokio::test]
    async fn test_invalid_message() {
        let state = state();
        let reply = handle_client_message(&state, "not json").await;
        assert!(matches!(reply, ServerMessage::Error { .. }));
        let reply = handle_client_message(&state, r#"{"type":"Ping"}"#).await;
        assert!(matches!(reply, ServerMessage::Pong));
    }
}
