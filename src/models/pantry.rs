use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::error::{AppError, Result};

/// Household inventory row
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryItem {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub expires_on: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

/// Fields for creating or replacing a pantry item
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPantryItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub unit: Option<String>,
    pub expires_on: Option<NaiveDate>,
}

fn default_quantity() -> f64 {
    1.0
}

pub async fn list(pool: &SqlitePool, user_id: i64) -> Result<Vec<PantryItem>> {
    let items = sqlx::query_as::<_, PantryItem>(
        "SELECT * FROM pantry_items WHERE user_id = ? ORDER BY name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<PantryItem>> {
    let item = sqlx::query_as::<_, PantryItem>("SELECT * FROM pantry_items WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(item)
}

pub async fn create(pool: &SqlitePool, user_id: i64, new: &NewPantryItem) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO pantry_items (user_id, name, quantity, unit, expires_on) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(&new.name)
    .bind(new.quantity)
    .bind(&new.unit)
    .bind(new.expires_on)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Insert a batch of pantry items atomically
///
/// One invalid row (empty name, non-positive quantity) rolls back the
/// entire batch.
pub async fn bulk_create(
    pool: &SqlitePool,
    user_id: i64,
    items: &[NewPantryItem],
) -> Result<Vec<i64>> {
    let mut tx = pool.begin().await?;
    let mut ids = Vec::with_capacity(items.len());

    for item in items {
        if item.name.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Pantry item name must not be empty".to_string(),
            ));
        }
        if item.quantity <= 0.0 {
            return Err(AppError::InvalidInput(format!(
                "Quantity for '{}' must be positive",
                item.name
            )));
        }

        let result = sqlx::query(
            "INSERT INTO pantry_items (user_id, name, quantity, unit, expires_on)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(&item.unit)
        .bind(item.expires_on)
        .execute(&mut *tx)
        .await?;

        ids.push(result.last_insert_rowid());
    }

    tx.commit().await?;

    Ok(ids)
}

pub async fn update(pool: &SqlitePool, id: i64, new: &NewPantryItem) -> Result<()> {
    sqlx::query("UPDATE pantry_items SET name = ?, quantity = ?, unit = ?, expires_on = ? WHERE id = ?")
        .bind(&new.name)
        .bind(new.quantity)
        .bind(&new.unit)
        .bind(new.expires_on)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM pantry_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
