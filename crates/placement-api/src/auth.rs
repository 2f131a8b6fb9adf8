use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use rand::Rng;
use tracing::{info, warn};

use placement_db::Database;
use placement_db::models::{NewAccount, NewStudent};
use placement_types::api::{AuthResponse, LoginRequest, RegisterRequest};
use placement_types::models::Role;

use crate::blocking::with_db;
use crate::error::ApiError;
use crate::serialize;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let (username, password) = required_credentials(req.username, req.password)?;

    let year = match &req.year {
        Some(year) => year
            .parse()
            .ok_or_else(|| ApiError::BadRequest("year must be an integer".into()))?,
        None => 1,
    };
    let role = Role::derive(year, req.role_keyword.as_deref());

    // Cheap rejection before paying for the hash; create_account re-checks under the lock
    let lookup = username.clone();
    if with_db(&state, move |db| db.get_account_by_username(&lookup))
        .await?
        .is_some()
    {
        warn!(%username, "registration rejected: username exists");
        return Err(ApiError::Conflict("username exists".into()));
    }

    let registration = with_db(&state, move |db| {
        let password_hash = hash_password(&password)?;
        db.create_account(
            &NewAccount {
                username: &username,
                password_hash: &password_hash,
                first_name: &req.first_name,
                last_name: &req.last_name,
                email: &req.email,
            },
            &NewStudent {
                roll_number: &req.roll_number,
                year,
                role,
                college: &req.college,
            },
            &generate_token_key(),
        )
    })
    .await?
    .ok_or_else(|| ApiError::Conflict("username exists".into()))?;

    info!(
        username = %registration.account.username,
        role = %role,
        "account registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token: registration.token,
            user: serialize::user(&registration.account),
            student: Some(serialize::student(&registration.student)),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let (username, password) = required_credentials(req.username, req.password)?;

    let result = with_db(&state, move |db| {
        let Some(account) = db.get_account_by_username(&username)? else {
            return Ok(None);
        };
        if !verify_password(&password, &account.password)? {
            return Ok(None);
        }
        let token = db.get_or_create_token(&account.id, &generate_token_key())?;
        let student = db.get_student_by_account(&account.id)?;
        Ok(Some((account, student, token)))
    })
    .await?;

    let Some((account, student, token)) = result else {
        warn!("login rejected: invalid credentials");
        return Err(ApiError::Unauthorized("invalid credentials".into()));
    };

    info!(username = %account.username, "account logged in");
    Ok(Json(AuthResponse {
        token,
        user: serialize::user(&account),
        student: student.as_ref().map(serialize::student),
    }))
}

fn required_credentials(
    username: Option<String>,
    password: Option<String>,
) -> Result<(String, String), ApiError> {
    match (username, password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Ok((u, p)),
        _ => Err(ApiError::BadRequest("username and password required".into())),
    }
}

/// Argon2id hash in PHC string format.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("argon2 hash failed: {}", e))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("stored hash unreadable: {}", e))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Fresh 40-character hex token key.
pub fn generate_token_key() -> String {
    let mut bytes = [0u8; 20];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}
