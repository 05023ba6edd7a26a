use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tracing::{debug, warn};

use crate::telegram::{Message, ParseMode, SendMessageRequest, TelegramClient, Update};

const ECHO_PREFIX: &str = "*You just said:*";

// ── Shared state ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    client: Arc<TelegramClient>,
}

impl AppState {
    pub fn new(client: TelegramClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(handle_update))
        .with_state(state)
}

// ── Handler ────────────────────────────────────────────────────────────────────

/// Build the reply for an inbound message.
pub fn echo_request(msg: &Message) -> SendMessageRequest {
    SendMessageRequest {
        chat_id: msg.chat.id,
        text: format!("{ECHO_PREFIX}{}", msg.text),
        reply_to_message_id: msg.message_id,
        parse_mode: ParseMode::Markdown,
    }
}

async fn handle_update(State(state): State<AppState>, body: Bytes) -> Response {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Rejecting malformed update: {}", e);
            return bad_request(e.to_string());
        }
    };

    debug!(
        update_id = update.update_id,
        chat_id = update.message.chat.id,
        "Received update"
    );

    let req = echo_request(&update.message);
    if let Err(e) = state.client.send_message(&req).await {
        warn!(update_id = update.update_id, "sendMessage failed: {}", e);
        return bad_request(e.to_string());
    }

    StatusCode::OK.into_response()
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
