// SPDX-FileCopyrightText: 2026 Qissa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the chat REST API.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use qissa_core::types::{ChatId, ChatKind, ChatSummary, Conversation, Role, Turn, UserId};
use qissa_core::QissaError;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Request body for POST /api/chats.
#[derive(Debug, Deserialize)]
pub struct CreateChatRequest {
    /// Seed user message.
    pub text: String,
    /// Declared generation kind.
    #[serde(rename = "type")]
    pub kind: ChatKind,
}

/// Response body for POST /api/chats.
#[derive(Debug, Serialize)]
pub struct CreateChatResponse {
    pub conversation_id: ChatId,
}

/// Query parameters for GET /api/userchats.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(rename = "type")]
    pub kind: Option<ChatKind>,
}

/// Request body for POST /api/chats/{id}/message.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub question: String,
}

/// Response body for POST /api/chats/{id}/message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub answer: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// POST /api/chats
///
/// Seeds a conversation, runs the declared backend once, and returns the
/// new conversation id. On a generation failure the conversation survives
/// with only its seed turn and the error is surfaced.
pub async fn create_chat(
    State(state): State<GatewayState>,
    Extension(user): Extension<UserId>,
    Json(body): Json<CreateChatRequest>,
) -> Result<Response, ApiError> {
    if body.text.trim().is_empty() {
        return Err(QissaError::NoContent("text is required".into()).into());
    }

    let chat = state.ledger.create_chat(&user, body.kind, &body.text).await?;
    info!(%chat, kind = %body.kind, "conversation created");

    let answer = state
        .router
        .respond(body.kind, &chat, &user, &body.text, &[])
        .await?;

    // Video pipelines append their model turn after the artifact write;
    // text kinds are appended here.
    if !body.kind.is_video() {
        state
            .ledger
            .append_turns(&chat, &user, &[Turn::text(Role::Model, answer)])
            .await?;
    }

    Ok((
        StatusCode::CREATED,
        Json(CreateChatResponse {
            conversation_id: chat,
        }),
    )
        .into_response())
}

/// GET /api/userchats?type=<kind>
pub async fn get_user_chats(
    State(state): State<GatewayState>,
    Extension(user): Extension<UserId>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ChatSummary>>, ApiError> {
    let summaries = state.ledger.list_chats(&user, params.kind).await?;
    Ok(Json(summaries))
}

/// GET /api/chats/{id}
pub async fn get_chat(
    State(state): State<GatewayState>,
    Extension(user): Extension<UserId>,
    Path(id): Path<String>,
) -> Result<Json<Conversation>, ApiError> {
    let conversation = state.ledger.get_chat(&ChatId(id), &user).await?;
    Ok(Json(conversation))
}

/// GET /api/chats/{id}/pdf
///
/// Renders the latest model turn as a downloadable PDF.
pub async fn get_chat_pdf(
    State(state): State<GatewayState>,
    Extension(user): Extension<UserId>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let conversation = state.ledger.get_chat(&ChatId(id), &user).await?;
    let story = conversation
        .latest_model_text()
        .ok_or_else(|| QissaError::NoContent("no story to generate PDF".into()))?;

    let bytes = qissa_pdf::render_story(&story, &state.pdf)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=Story.pdf",
            ),
        ],
        bytes,
    )
        .into_response())
}

/// POST /api/chats/{id}/message
///
/// Continues a conversation under its stored kind. Text kinds append the
/// user question and the model answer as one combined update; video kinds
/// append the user turn first and let the pipeline link the artifact turn.
pub async fn post_message(
    State(state): State<GatewayState>,
    Extension(user): Extension<UserId>,
    Path(id): Path<String>,
    Json(body): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if body.question.trim().is_empty() {
        return Err(QissaError::NoContent("question is required".into()).into());
    }

    let chat = ChatId(id);
    let conversation = state.ledger.get_chat(&chat, &user).await?;
    let kind = conversation.kind;

    let answer = if kind.is_video() {
        state
            .ledger
            .append_turns(&chat, &user, &[Turn::text(Role::User, &body.question)])
            .await?;
        state
            .router
            .respond(kind, &chat, &user, &body.question, &conversation.history)
            .await?
    } else {
        let answer = state
            .router
            .respond(kind, &chat, &user, &body.question, &conversation.history)
            .await?;
        state
            .ledger
            .append_turns(
                &chat,
                &user,
                &[
                    Turn::text(Role::User, &body.question),
                    Turn::text(Role::Model, &answer),
                ],
            )
            .await?;
        answer
    };

    Ok(Json(MessageResponse { answer }))
}

/// GET /health
///
/// Public, unauthenticated liveness probe.
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
