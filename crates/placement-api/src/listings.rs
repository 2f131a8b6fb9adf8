use axum::{Json, extract::State};

use placement_types::api::{ExperienceDto, PlacementDto};

use crate::auth::AppState;
use crate::blocking::with_db;
use crate::error::ApiError;
use crate::serialize;

const LISTING_LIMIT: u32 = 50;

/// GET /api/placements/
pub async fn list_placements(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlacementDto>>, ApiError> {
    let rows = with_db(&state, |db| db.recent_placements(LISTING_LIMIT)).await?;
    Ok(Json(rows.iter().map(serialize::placement).collect()))
}

/// GET /api/experiences/
pub async fn list_experiences(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExperienceDto>>, ApiError> {
    let rows = with_db(&state, |db| db.recent_experiences(LISTING_LIMIT)).await?;
    Ok(Json(rows.iter().map(serialize::experience).collect()))
}
