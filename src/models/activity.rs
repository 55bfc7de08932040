use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::error::Result;

/// Logged exercise session
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    pub user_id: i64,
    pub activity_type: String,
    pub duration_min: f64,
    pub calories_burned: f64,
    pub performed_on: NaiveDate,
    pub created_at: NaiveDateTime,
}

pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    activity_type: &str,
    duration_min: f64,
    calories_burned: f64,
    performed_on: NaiveDate,
) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO activities (user_id, activity_type, duration_min, calories_burned, performed_on)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(activity_type)
    .bind(duration_min)
    .bind(calories_burned)
    .bind(performed_on)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Activity>> {
    let activity = sqlx::query_as::<_, Activity>("SELECT * FROM activities WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(activity)
}

pub async fn list(
    pool: &SqlitePool,
    user_id: i64,
    date: Option<NaiveDate>,
) -> Result<Vec<Activity>> {
    let activities = match date {
        Some(date) => {
            sqlx::query_as::<_, Activity>(
                "SELECT * FROM activities WHERE user_id = ? AND performed_on = ? ORDER BY created_at",
            )
            .bind(user_id)
            .bind(date)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Activity>(
                "SELECT * FROM activities WHERE user_id = ? ORDER BY performed_on DESC, created_at",
            )
            .bind(user_id)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(activities)
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    activity_type: &str,
    duration_min: f64,
    calories_burned: f64,
    performed_on: NaiveDate,
) -> Result<()> {
    sqlx::query(
        "UPDATE activities SET activity_type = ?, duration_min = ?, calories_burned = ?, performed_on = ?
         WHERE id = ?",
    )
    .bind(activity_type)
    .bind(duration_min)
    .bind(calories_burned)
    .bind(performed_on)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM activities WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
