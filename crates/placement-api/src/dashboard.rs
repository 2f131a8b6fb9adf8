use axum::{Json, extract::State};

use placement_types::api::{DashboardResponse, LiveUpdates};

use crate::auth::AppState;
use crate::blocking::with_db;
use crate::error::ApiError;
use crate::serialize;

const FEED_LIMIT: u32 = 5;

/// GET /api/dashboard/
///
/// The message feed is the global latest-five, not the caller's inbox.
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();

    let (summary, placements, messages, experiences, premium) = with_db(&state, move |db| {
        Ok((
            db.placement_summary()?,
            db.recent_placements(FEED_LIMIT)?,
            db.recent_messages(FEED_LIMIT)?,
            db.recent_experiences(FEED_LIMIT)?,
            db.upcoming_premium_opportunities(&today, FEED_LIMIT)?,
        ))
    })
    .await?;

    let total = summary.total_students.max(0) as u64;
    let placed = summary.placed_students.max(0) as u64;

    Ok(Json(DashboardResponse {
        placement_rate_percent: placement_rate(placed, total),
        placed_students_count: placed,
        total_students_count: total,
        avg_package_lpa: round2(summary.avg_package.unwrap_or(0.0)),
        highest_package_lpa: summary.max_package.unwrap_or(0.0),
        companies_count: summary.companies.max(0) as u64,
        still_looking: total.saturating_sub(placed),
        live_updates: LiveUpdates {
            placements: placements.iter().map(serialize::placement).collect(),
            messages: messages.iter().map(serialize::message).collect(),
            experiences: experiences.iter().map(serialize::experience).collect(),
        },
        premium_upcoming: premium.iter().map(serialize::premium_opportunity).collect(),
    }))
}

/// Percentage of students with at least one placement, two decimals.
pub fn placement_rate(placed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(placed as f64 / total as f64 * 100.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
