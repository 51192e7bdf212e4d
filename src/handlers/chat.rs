use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::services::ai::intent::extract_intent;
use crate::services::billing::call_billing_api;
use crate::services::formatter::format_reply;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    pub extracted_intent: String,
    pub user_friendly_response: String,
}

// POST /chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    tracing::info!(message = %payload.message, "received chat message");

    let extraction = extract_intent(state.llm.as_ref(), &payload.message)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "intent extraction failed");
            AppError::Ai(e.to_string())
        })?;

    let raw = call_billing_api(state.billing.as_ref(), &extraction.record, token).await;
    tracing::debug!(response = %raw, "billing API response");

    let reply = format_reply(&extraction.record, &raw);

    Ok(Json(ChatResponse {
        message: payload.message,
        extracted_intent: extraction.raw,
        user_friendly_response: reply,
    }))
}
