use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, warn};

use placement_types::api::{MessageDto, SendMessageRequest};

use crate::auth::AppState;
use crate::blocking::with_db;
use crate::error::ApiError;
use crate::middleware::CurrentAccount;
use crate::serialize;

/// GET /api/messages/: the caller's inbox, newest first.
pub async fn get_messages(
    State(state): State<AppState>,
    Extension(account): Extension<CurrentAccount>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let rows = with_db(&state, move |db| db.inbox(&account.id)).await?;
    Ok(Json(rows.iter().map(serialize::message).collect()))
}

/// POST /api/messages/: send a message to another account by username.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(account): Extension<CurrentAccount>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let recipient_name = req
        .recipient
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::BadRequest("recipient required".into()))?;

    let sender_id = account.id.clone();
    let lookup = recipient_name.clone();
    let row = with_db(&state, move |db| {
        let Some(recipient) = db.get_account_by_username(&lookup)? else {
            return Ok(None);
        };
        db.insert_message(Some(&sender_id), &recipient.id, &req.subject, &req.body)
            .map(Some)
    })
    .await?;

    let Some(row) = row else {
        warn!(from = %account.username, to = %recipient_name, "message to unknown recipient");
        return Err(ApiError::NotFound("recipient not found".into()));
    };

    info!(from = %account.username, to = %recipient_name, "message sent");
    Ok((StatusCode::CREATED, Json(serialize::message(&row))))
}
