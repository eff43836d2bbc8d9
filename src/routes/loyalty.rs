use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::loyalty;
use crate::models::LoyaltyProfile;

#[derive(Deserialize)]
struct UserQuery {
    user_id: Uuid,
}

pub fn routes(pool: PgPool) -> Router {
    Router::new()
        .route("/loyalty", get(get_loyalty))
        .with_state(pool)
}

async fn get_loyalty(
    State(pool): State<PgPool>,
    Query(query): Query<UserQuery>,
) -> Result<Json<LoyaltyProfile>, StatusCode> {
    let dates = db::fetch_entry_dates(&pool, query.user_id)
        .await
        .map_err(|e| {
            tracing::error!("❌ Failed to fetch entry dates: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let today = chrono::Utc::now().date_naive();
    let streak = loyalty::current_streak(&dates, today);

    Ok(Json(loyalty::loyalty_profile(streak)))
}
