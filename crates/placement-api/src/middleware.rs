use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::AppState;
use crate::blocking::with_db;
use crate::error::ApiError;

/// The authenticated caller, inserted into request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentAccount {
    pub id: String,
    pub username: String,
}

/// Resolve the bearer token in the Authorization header to an account.
/// Accepts both `Bearer <key>` and `Token <key>`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let key = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_header)
        .ok_or_else(|| ApiError::Unauthorized("authentication credentials were not provided".into()))?
        .to_string();

    let account = with_db(&state, move |db| db.get_account_by_token(&key))
        .await?
        .ok_or_else(|| {
            warn!("request with unknown token");
            ApiError::Unauthorized("invalid token".into())
        })?;

    req.extensions_mut().insert(CurrentAccount {
        id: account.id,
        username: account.username,
    });
    Ok(next.run(req).await)
}

fn token_from_header(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("Token "))
        .map(str::trim)
        .filter(|key| !key.is_empty())
}
