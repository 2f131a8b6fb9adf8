use axum::{Json, extract::State};

use placement_types::api::{PackageDistribution, StatisticsResponse};

use crate::auth::AppState;
use crate::blocking::with_db;
use crate::error::ApiError;
use crate::serialize;

const TOP_COMPANIES: u32 = 10;

/// GET /api/statistics/: package histogram and the first ten companies.
pub async fn get_statistics(
    State(state): State<AppState>,
) -> Result<Json<StatisticsResponse>, ApiError> {
    let (counts, companies) = with_db(&state, |db| {
        Ok((db.package_histogram()?, db.top_companies(TOP_COMPANIES)?))
    })
    .await?;

    Ok(Json(StatisticsResponse {
        package_distribution: PackageDistribution::from_counts(counts),
        top_companies: companies.iter().map(serialize::top_company).collect(),
    }))
}
