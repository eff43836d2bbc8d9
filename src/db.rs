use anyhow::Context;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{Analysis, CheckInEntry, NudgeState, StoredEntry};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS check_in_entries (
            user_id UUID NOT NULL,
            entry_date DATE NOT NULL,
            entry JSONB NOT NULL,
            analysis JSONB,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            PRIMARY KEY (user_id, entry_date)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS nudge_states (
            user_id UUID PRIMARY KEY,
            state JSONB NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Inserts one day's entry. Entries are append-once per (user, date): a
/// second create for the same day is ignored and reported as `false`.
pub async fn create_entry(
    pool: &PgPool,
    user_id: Uuid,
    entry: &CheckInEntry,
    analysis: &Analysis,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO check_in_entries (user_id, entry_date, entry, analysis)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, entry_date) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(entry.date)
    .bind(serde_json::to_value(entry).context("serialize entry")?)
    .bind(serde_json::to_value(analysis).context("serialize analysis")?)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Replaces the entry's analysis wholesale. Safe to apply more than once.
pub async fn set_analysis(
    pool: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
    analysis: &Analysis,
) -> anyhow::Result<()> {
    sqlx::query(
        "UPDATE check_in_entries SET analysis = $3 WHERE user_id = $1 AND entry_date = $2",
    )
    .bind(user_id)
    .bind(date)
    .bind(serde_json::to_value(analysis).context("serialize analysis")?)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn fetch_entries(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<StoredEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT user_id, entry_date, entry, analysis, created_at
        FROM check_in_entries
        WHERE user_id = $1
        ORDER BY entry_date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let entry: serde_json::Value = row.get("entry");
        let analysis: Option<serde_json::Value> = row.get("analysis");
        entries.push(StoredEntry {
            user_id: row.get("user_id"),
            date: row.get("entry_date"),
            entry: serde_json::from_value(entry).context("deserialize entry")?,
            analysis: analysis
                .map(serde_json::from_value)
                .transpose()
                .context("deserialize analysis")?,
            created_at: row.get("created_at"),
        });
    }

    Ok(entries)
}

pub async fn fetch_analysis(
    pool: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
) -> anyhow::Result<Option<Analysis>> {
    let row = sqlx::query(
        "SELECT analysis FROM check_in_entries WHERE user_id = $1 AND entry_date = $2",
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let analysis: Option<serde_json::Value> = row.get("analysis");
    analysis
        .map(serde_json::from_value)
        .transpose()
        .context("deserialize analysis")
}

/// Entry dates newest-first, used for the consistency streak.
pub async fn fetch_entry_dates(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<NaiveDate>> {
    let rows = sqlx::query(
        "SELECT entry_date FROM check_in_entries WHERE user_id = $1 ORDER BY entry_date DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row.get("entry_date")).collect())
}

/// Missing row reads as the zero state, so a first-time user starts clean.
pub async fn load_nudge_state(pool: &PgPool, user_id: Uuid) -> anyhow::Result<NudgeState> {
    let row = sqlx::query("SELECT state FROM nudge_states WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let state: serde_json::Value = row.get("state");
            serde_json::from_value(state).context("deserialize nudge state")
        }
        None => Ok(NudgeState::default()),
    }
}

/// Single-row JSON upsert, so readers never observe a half-written state.
pub async fn save_nudge_state(
    pool: &PgPool,
    user_id: Uuid,
    state: &NudgeState,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO nudge_states (user_id, state, updated_at)
        VALUES ($1, $2, now())
        ON CONFLICT (user_id) DO UPDATE
        SET state = EXCLUDED.state, updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(serde_json::to_value(state).context("serialize nudge state")?)
    .execute(pool)
    .await?;

    Ok(())
}
