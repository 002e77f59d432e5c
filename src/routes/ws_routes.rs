use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::models::{ChatMessage, WsChatRequest, WsEvent};
use crate::service::chat_service::{ChatListener, ChatService};

/// GET `/ws/chat`: upgrades to a WebSocket driving one conversation.
pub async fn ws_chat_handler(
    ws: WebSocketUpgrade,
    State(svc): State<ChatService>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, svc))
}

/// Forwards session events to the socket writer.
struct ChannelListener(mpsc::UnboundedSender<WsEvent>);

impl ChatListener for ChannelListener {
    fn on_reply(&self, message: &ChatMessage) {
        let _ = self.0.send(WsEvent::Reply { message: message.clone() });
    }

    fn on_composing_change(&self, composing: bool) {
        let _ = self.0.send(WsEvent::Composing { composing });
    }
}

/// Handles a single WebSocket connection.
///
/// Protocol:
/// - Client sends JSON `{ "message": "..." }`
/// - Server answers with:
///   1. `{ "type": "composing", "composing": true }`
///   2. `{ "type": "reply", "message": { ... } }`
///   3. `{ "type": "composing", "composing": false }`
///   or `{ "type": "error", "message": "..." }` when the utterance is rejected,
///   including while a previous one is still composing.
///
/// Closing the socket closes the chat and drops the conversation.
async fn handle_socket(socket: WebSocket, svc: ChatService) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsEvent>();

    let session = svc
        .session(None)
        .await
        .with_listener(Arc::new(ChannelListener(tx.clone())));
    info!("WebSocket client connected");

    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let Ok(json) = serde_json::to_string(&event) else { continue };
            if sink.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = stream.next().await {
        let text = match msg {
            Ok(Message::Text(t)) => t.to_string(),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!("WebSocket receive error: {e}");
                break;
            }
        };

        let request: WsChatRequest = match serde_json::from_str(&text) {
            Ok(r) => r,
            Err(e) => {
                let _ = tx.send(WsEvent::Error { message: format!("Invalid request: {e}") });
                continue;
            }
        };

        let session = session.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = session.submit_utterance(&request.message).await {
                let _ = tx.send(WsEvent::Error { message: e.to_string() });
            }
        });
    }

    svc.close(session.id()).await;
    writer.abort();
    info!("WebSocket client disconnected");
}
