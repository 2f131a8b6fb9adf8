use axum::{
    Json, Router, middleware,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::auth::{self, AppState};
use crate::middleware::require_auth;
use crate::{dashboard, listings, messages, statistics};

/// All `/api/` routes. Register, login and the index are public; everything
/// else requires a token.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/", get(api_home))
        .route("/api/register/", post(auth::register))
        .route("/api/login/", post(auth::login));

    let protected_routes = Router::new()
        .route("/api/dashboard/", get(dashboard::get_dashboard))
        .route(
            "/api/messages/",
            get(messages::get_messages).post(messages::send_message),
        )
        .route("/api/placements/", get(listings::list_placements))
        .route("/api/experiences/", get(listings::list_experiences))
        .route("/api/statistics/", get(statistics::get_statistics))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn api_home() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the DU MCA Placement Portal API",
        "available_endpoints": {
            "register": "/api/register/",
            "login": "/api/login/",
            "dashboard": "/api/dashboard/",
            "messages": "/api/messages/",
            "placements": "/api/placements/",
            "experiences": "/api/experiences/",
            "statistics": "/api/statistics/",
        }
    }))
}
