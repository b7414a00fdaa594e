use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use learnhub_core::session;
use learnhub_core::support::{ChatMessage, ChatSession, ChatState};

use crate::error::AppError;
use crate::AppState;

#[derive(Serialize)]
pub struct TranscriptView {
    pub state: ChatState,
    pub messages: Vec<ChatMessage>,
}

impl TranscriptView {
    fn of(chat: &ChatSession) -> Self {
        Self {
            state: chat.state(),
            messages: chat.transcript().to_vec(),
        }
    }
}

pub async fn open(State(state): State<Arc<AppState>>) -> Result<Json<TranscriptView>, AppError> {
    let user = session::current_user(state.progress().storage())?;

    let mut chat = state.chat();
    chat.set_user_name(user.map(|u| u.username));
    chat.open(Utc::now());
    Ok(Json(TranscriptView::of(&chat)))
}

#[derive(Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

/// Records the message and schedules the bot's reply after the typing
/// delay. A newer reply or closing the chat aborts the scheduled one.
pub async fn message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MessageRequest>,
) -> Result<(StatusCode, Json<TranscriptView>), AppError> {
    let mut chat = state.chat();
    let Some(reply) = chat.submit(&req.text, &state.reply_delay, Utc::now())? else {
        return Ok((StatusCode::OK, Json(TranscriptView::of(&chat))));
    };
    let view = TranscriptView::of(&chat);
    drop(chat);

    let shared = Arc::clone(&state);
    let task = tokio::spawn(async move {
        tokio::time::sleep(reply.delay).await;
        shared.chat().deliver(reply, Utc::now());
    });

    if let Some(previous) = state.chat_reply().replace(task) {
        previous.abort();
    }

    Ok((StatusCode::ACCEPTED, Json(view)))
}

pub async fn transcript(State(state): State<Arc<AppState>>) -> Json<TranscriptView> {
    let view = TranscriptView::of(&state.chat());
    Json(view)
}

pub async fn close(State(state): State<Arc<AppState>>) -> Json<TranscriptView> {
    if let Some(pending) = state.chat_reply().take() {
        pending.abort();
    }

    let mut chat = state.chat();
    chat.close();
    Json(TranscriptView::of(&chat))
}
