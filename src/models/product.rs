use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use strsim::jaro_winkler;

use crate::constants::{FUZZY_MATCH_THRESHOLD, MAX_FUZZY_CANDIDATES, MAX_FUZZY_RESULTS};
use crate::error::Result;

/// Product row with nutrition facts per 100 g
///
/// `user_id` is NULL for public rows imported from external APIs and set
/// for user-created ("custom") products.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    pub source: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
    pub sodium_mg: f64,
    pub created_at: NaiveDateTime,
}

/// Fields for creating or replacing a product
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
    #[serde(default)]
    pub fiber_g: f64,
    #[serde(default)]
    pub sugar_g: f64,
    #[serde(default)]
    pub sodium_mg: f64,
}

/// List products visible to a user: their own plus public rows
pub async fn list_visible(pool: &SqlitePool, user_id: i64) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE user_id = ? OR user_id IS NULL ORDER BY name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

pub async fn create(
    pool: &SqlitePool,
    user_id: Option<i64>,
    source: &str,
    new: &NewProduct,
) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO products
            (user_id, name, brand, barcode, source,
             calories, protein_g, carbs_g, fat_g, fiber_g, sugar_g, sodium_mg)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(&new.name)
    .bind(&new.brand)
    .bind(&new.barcode)
    .bind(source)
    .bind(new.calories)
    .bind(new.protein_g)
    .bind(new.carbs_g)
    .bind(new.fat_g)
    .bind(new.fiber_g)
    .bind(new.sugar_g)
    .bind(new.sodium_mg)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update(pool: &SqlitePool, id: i64, new: &NewProduct) -> Result<()> {
    sqlx::query(
        "UPDATE products SET
            name = ?, brand = ?, barcode = ?,
            calories = ?, protein_g = ?, carbs_g = ?, fat_g = ?,
            fiber_g = ?, sugar_g = ?, sodium_mg = ?
         WHERE id = ?",
    )
    .bind(&new.name)
    .bind(&new.brand)
    .bind(&new.barcode)
    .bind(new.calories)
    .bind(new.protein_g)
    .bind(new.carbs_g)
    .bind(new.fat_g)
    .bind(new.fiber_g)
    .bind(new.sugar_g)
    .bind(new.sodium_mg)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Fuzzy local search, used when the external APIs fail or return nothing
///
/// Scans a bounded number of visible rows and ranks them by Jaro-Winkler
/// similarity between the query and the product name. First match wins on
/// equal scores.
pub async fn fuzzy_search(pool: &SqlitePool, user_id: i64, query: &str) -> Result<Vec<Product>> {
    let candidates = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE user_id = ? OR user_id IS NULL LIMIT ?",
    )
    .bind(user_id)
    .bind(MAX_FUZZY_CANDIDATES)
    .fetch_all(pool)
    .await?;

    Ok(rank_by_similarity(candidates, query))
}

fn rank_by_similarity(candidates: Vec<Product>, query: &str) -> Vec<Product> {
    let needle = query.to_lowercase();

    let mut scored: Vec<(f64, Product)> = candidates
        .into_iter()
        .filter_map(|p| {
            let score = jaro_winkler(&needle, &p.name.to_lowercase());
            (score >= FUZZY_MATCH_THRESHOLD).then_some((score, p))
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(MAX_FUZZY_RESULTS);

    scored.into_iter().map(|(_, p)| p).collect()
}
