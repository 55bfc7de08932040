use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::error::Result;

/// Recipe row
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub servings: i64,
    pub created_at: NaiveDateTime,
}

/// Fields for creating or replacing a recipe
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_servings")]
    pub servings: i64,
}

fn default_servings() -> i64 {
    1
}

pub async fn list(pool: &SqlitePool, user_id: i64) -> Result<Vec<Recipe>> {
    let recipes =
        sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE user_id = ? ORDER BY name")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    Ok(recipes)
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(recipe)
}

pub async fn create(pool: &SqlitePool, user_id: i64, new: &NewRecipe) -> Result<i64> {
    let result =
        sqlx::query("INSERT INTO recipes (user_id, name, description, servings) VALUES (?, ?, ?, ?)")
            .bind(user_id)
            .bind(&new.name)
            .bind(&new.description)
            .bind(new.servings)
            .execute(pool)
            .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update(pool: &SqlitePool, id: i64, new: &NewRecipe) -> Result<()> {
    sqlx::query("UPDATE recipes SET name = ?, description = ?, servings = ? WHERE id = ?")
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.servings)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
