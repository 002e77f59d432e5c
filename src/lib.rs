pub mod agent;
pub mod booking;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod faq;
pub mod models;
pub mod pricing;
pub mod quiz;
pub mod routes;
pub mod service;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes::api_routes::{
    booking_handler, chat_handler, faq_handler, list_destinations_handler, list_messages_handler,
    pricing_handler, quiz_questions_handler, quiz_result_handler, reset_history_handler,
    status_handler,
};
use crate::routes::ws_routes::ws_chat_handler;
use crate::service::chat_service::ChatService;

/// Builds the HTTP router around `chat_service`.
pub fn app(chat_service: ChatService) -> Router {
    Router::new()
        // Chat
        .route("/api/status", get(status_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/conversations/{id}/messages", get(list_messages_handler))
        .route("/api/conversations/{id}/history", delete(reset_history_handler))
        .route("/ws/chat", get(ws_chat_handler))
        // Site content
        .route("/api/destinations", get(list_destinations_handler))
        .route("/api/pricing", get(pricing_handler))
        .route("/api/faq", get(faq_handler))
        .route("/api/quiz", get(quiz_questions_handler).post(quiz_result_handler))
        .route("/api/bookings", post(booking_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(chat_service)
}
