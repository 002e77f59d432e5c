use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::booking::BookingForm;
use crate::catalog;
use crate::errors::AppError;
use crate::faq;
use crate::models::ChatRequest;
use crate::pricing;
use crate::quiz::{self, QuizSubmission};
use crate::service::chat_service::ChatService;

// ── Chat ──────────────────────────────────────────────────────────────────────

/// POST `/api/chat`: resolve one utterance, returns the agent reply as JSON
pub async fn chat_handler(
    State(svc): State<ChatService>,
    Json(request): Json<ChatRequest>,
) -> Response {
    match svc.chat(request).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => error_response(&err),
    }
}

/// GET `/api/status`: whether replies may come from the remote model
pub async fn status_handler(State(svc): State<ChatService>) -> impl IntoResponse {
    Json(svc.status())
}

/// GET `/api/conversations/{id}/messages`: transcript of a conversation
pub async fn list_messages_handler(
    Path(id): Path<String>,
    State(svc): State<ChatService>,
) -> Response {
    match svc.get_messages(&id).await {
        Ok(msgs) => Json(msgs).into_response(),
        Err(e) => error_response(&e),
    }
}

/// DELETE `/api/conversations/{id}/history`: close the chat, forgetting model context
pub async fn reset_history_handler(
    Path(id): Path<String>,
    State(svc): State<ChatService>,
) -> Response {
    match svc.reset_history(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(&e),
    }
}

// ── Site content ──────────────────────────────────────────────────────────────

/// GET `/api/destinations`
pub async fn list_destinations_handler() -> impl IntoResponse {
    Json(catalog::DESTINATIONS)
}

/// GET `/api/pricing`
pub async fn pricing_handler() -> impl IntoResponse {
    Json(json!({
        "plans": pricing::PLANS,
        "recommended": pricing::recommended().map(|p| p.id),
        "notice": pricing::NOTICE,
    }))
}

/// GET `/api/faq`
pub async fn faq_handler() -> impl IntoResponse {
    Json(json!({ "items": faq::ITEMS, "footer": faq::FOOTER }))
}

/// GET `/api/quiz`
pub async fn quiz_questions_handler() -> impl IntoResponse {
    Json(quiz::QUESTIONS)
}

/// POST `/api/quiz`: recommended destination for the submitted answers
pub async fn quiz_result_handler(Json(submission): Json<QuizSubmission>) -> Response {
    match quiz::recommend(&submission) {
        Ok(destination) => Json(destination).into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST `/api/bookings`
pub async fn booking_handler(Json(form): Json<BookingForm>) -> Response {
    match form.submit() {
        Ok(confirmation) => (StatusCode::CREATED, Json(confirmation)).into_response(),
        Err(errors) => (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response(),
    }
}

// ── Helper ────────────────────────────────────────────────────────────────────

fn error_response(err: &AppError) -> Response {
    let status = if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_conflict() {
        StatusCode::CONFLICT
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
