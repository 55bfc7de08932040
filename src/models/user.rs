use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::error::Result;

/// User account row
///
/// Physical attributes and goal settings are optional until the user fills
/// in their profile; the goals endpoint requires them.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub sex: Option<String>,
    pub age: Option<i64>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Profile fields accepted on update; None leaves the column untouched
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub sex: Option<String>,
    pub age: Option<i64>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
}

pub async fn create(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    name: &str,
) -> Result<i64> {
    let result = sqlx::query("INSERT INTO users (email, password_hash, name) VALUES (?, ?, ?)")
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn update_profile(pool: &SqlitePool, id: i64, update: ProfileUpdate) -> Result<()> {
    sqlx::query(
        "UPDATE users SET
            name = COALESCE(?, name),
            sex = COALESCE(?, sex),
            age = COALESCE(?, age),
            height_cm = COALESCE(?, height_cm),
            weight_kg = COALESCE(?, weight_kg),
            activity_level = COALESCE(?, activity_level),
            goal = COALESCE(?, goal)
         WHERE id = ?",
    )
    .bind(update.name)
    .bind(update.sex)
    .bind(update.age)
    .bind(update.height_cm)
    .bind(update.weight_kg)
    .bind(update.activity_level)
    .bind(update.goal)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete the account; child rows cascade via foreign keys
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
