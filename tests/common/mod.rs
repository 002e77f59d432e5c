//! In-process stand-in for the chat-completions endpoint.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::Mutex;

pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

#[derive(Clone)]
pub enum Behaviour {
    Reply(String),
    Status(u16),
    Raw(String),
    Delay(Duration),
}

/// Requests received by the mock: (authorization header, JSON body).
#[derive(Clone, Default)]
pub struct Recorded(pub Arc<Mutex<Vec<(Option<String>, Value)>>>);

impl Recorded {
    pub async fn len(&self) -> usize {
        self.0.lock().await.len()
    }

    pub async fn last(&self) -> Option<(Option<String>, Value)> {
        self.0.lock().await.last().cloned()
    }
}

#[derive(Clone)]
struct MockState {
    behaviour: Behaviour,
    recorded: Recorded,
}

async fn completions(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.recorded.0.lock().await.push((auth, body));

    match state.behaviour {
        Behaviour::Reply(content) => Json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        }))
        .into_response(),
        Behaviour::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap();
            (status, "upstream failure").into_response()
        }
        Behaviour::Raw(body) => {
            ([("content-type", "application/json")], body).into_response()
        }
        Behaviour::Delay(delay) => {
            tokio::time::sleep(delay).await;
            Json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "trop tard" } }]
            }))
            .into_response()
        }
    }
}

/// Starts the mock and returns its completions URL and request log.
pub async fn spawn_completions(behaviour: Behaviour) -> (String, Recorded) {
    let recorded = Recorded::default();
    let router = Router::new()
        .route(COMPLETIONS_PATH, post(completions))
        .with_state(MockState { behaviour, recorded: recorded.clone() });

    let url = spawn(router).await;
    (format!("{url}{COMPLETIONS_PATH}"), recorded)
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
