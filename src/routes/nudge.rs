use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::models::NudgeState;
use crate::nudge::{self, NudgeResponse};

#[derive(Deserialize)]
struct UserQuery {
    user_id: Uuid,
}

#[derive(Deserialize)]
pub struct FollowUpRequest {
    pub user_id: Uuid,
    pub response: NudgeResponse,
    pub date: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct NudgeView {
    pub state: NudgeState,
    pub should_show_nudge: bool,
    pub should_auto_book: bool,
}

impl NudgeView {
    fn from_state(state: NudgeState) -> Self {
        let should_show_nudge = nudge::should_show_nudge(&state);
        let should_auto_book = nudge::should_auto_book(&state);
        NudgeView {
            state,
            should_show_nudge,
            should_auto_book,
        }
    }
}

pub fn routes(pool: PgPool) -> Router {
    Router::new()
        .route("/nudge", get(get_nudge))
        .route("/nudge/response", post(post_response))
        .with_state(pool)
}

async fn get_nudge(
    State(pool): State<PgPool>,
    Query(query): Query<UserQuery>,
) -> Result<Json<NudgeView>, StatusCode> {
    let state = db::load_nudge_state(&pool, query.user_id)
        .await
        .map_err(|e| {
            tracing::error!("❌ Failed to load nudge state: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(NudgeView::from_state(state)))
}

async fn post_response(
    State(pool): State<PgPool>,
    Json(body): Json<FollowUpRequest>,
) -> Result<Json<NudgeView>, StatusCode> {
    let date = body
        .date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let mut state = db::load_nudge_state(&pool, body.user_id)
        .await
        .map_err(|e| {
            tracing::error!("❌ Failed to load nudge state: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    nudge::apply_response(&mut state, body.response, date);

    db::save_nudge_state(&pool, body.user_id, &state)
        .await
        .map_err(|e| {
            tracing::error!("❌ Failed to save nudge state: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(NudgeView::from_state(state)))
}
