use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::error::Result;

/// Shopping list row
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub purchased: bool,
    pub created_at: NaiveDateTime,
}

/// Fields for creating or replacing a shopping list item
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShoppingListItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    pub unit: Option<String>,
    #[serde(default)]
    pub purchased: bool,
}

fn default_quantity() -> f64 {
    1.0
}

pub async fn list(pool: &SqlitePool, user_id: i64) -> Result<Vec<ShoppingListItem>> {
    let items = sqlx::query_as::<_, ShoppingListItem>(
        "SELECT * FROM shopping_list_items WHERE user_id = ? ORDER BY purchased, name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<ShoppingListItem>> {
    let item =
        sqlx::query_as::<_, ShoppingListItem>("SELECT * FROM shopping_list_items WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(item)
}

pub async fn create(pool: &SqlitePool, user_id: i64, new: &NewShoppingListItem) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO shopping_list_items (user_id, name, quantity, unit, purchased)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(&new.name)
    .bind(new.quantity)
    .bind(&new.unit)
    .bind(new.purchased)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update(pool: &SqlitePool, id: i64, new: &NewShoppingListItem) -> Result<()> {
    sqlx::query(
        "UPDATE shopping_list_items SET name = ?, quantity = ?, unit = ?, purchased = ? WHERE id = ?",
    )
    .bind(&new.name)
    .bind(new.quantity)
    .bind(&new.unit)
    .bind(new.purchased)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM shopping_list_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
