use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::analysis::{self, CheckInOutcome};
use crate::db;
use crate::models::{Analysis, CheckInEntry, StoredEntry};

#[derive(Deserialize)]
pub struct NewCheckIn {
    pub user_id: Uuid,
    pub entry: CheckInEntry,
}

#[derive(Deserialize)]
struct UserQuery {
    user_id: Uuid,
}

#[derive(Deserialize)]
struct AnalysisQuery {
    user_id: Uuid,
    date: NaiveDate,
}

pub fn routes(pool: PgPool) -> Router {
    Router::new()
        .route("/checkin", post(create_check_in))
        .route("/checkins", get(get_check_ins))
        .route("/checkin/analysis", get(get_analysis))
        .with_state(pool)
}

async fn create_check_in(
    State(pool): State<PgPool>,
    Json(body): Json<NewCheckIn>,
) -> Result<(StatusCode, Json<Analysis>), (StatusCode, String)> {
    match analysis::run_check_in(&pool, body.user_id, body.entry).await {
        Ok(CheckInOutcome::Created(provisional)) => {
            Ok((StatusCode::CREATED, Json(provisional)))
        }
        Ok(CheckInOutcome::Duplicate) => Err((
            StatusCode::CONFLICT,
            "An entry for this day already exists".into(),
        )),
        Err(e) => {
            tracing::error!("❌ Failed to store check-in: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "DB error".into()))
        }
    }
}

async fn get_check_ins(
    State(pool): State<PgPool>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<StoredEntry>>, StatusCode> {
    let entries = db::fetch_entries(&pool, query.user_id).await.map_err(|e| {
        tracing::error!("❌ Failed to fetch check-ins: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(entries))
}

async fn get_analysis(
    State(pool): State<PgPool>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<Analysis>, StatusCode> {
    let analysis = db::fetch_analysis(&pool, query.user_id, query.date)
        .await
        .map_err(|e| {
            tracing::error!("❌ Failed to fetch analysis: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    match analysis {
        Some(analysis) => Ok(Json(analysis)),
        None => Err(StatusCode::NOT_FOUND),
    }
}
