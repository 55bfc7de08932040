use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::error::{AppError, Result};

/// Meal row; items live in `meal_items`
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub eaten_on: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Item payload on meal create/update
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMealItem {
    pub product_id: i64,
    pub quantity_g: f64,
}

/// Meal item joined with its product, nutrition already scaled by quantity
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealItemDetail {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity_g: f64,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Derived nutrition sum over meal items
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl NutritionTotals {
    pub fn from_items(items: &[MealItemDetail]) -> Self {
        let mut totals = Self::default();
        for item in items {
            totals.calories += item.calories;
            totals.protein_g += item.protein_g;
            totals.carbs_g += item.carbs_g;
            totals.fat_g += item.fat_g;
        }
        totals
    }
}

/// Meal with its items and derived totals, as returned by the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealWithItems {
    #[serde(flatten)]
    pub meal: Meal,
    pub items: Vec<MealItemDetail>,
    pub totals: NutritionTotals,
}

/// Create a meal and its items in one transaction
///
/// Every referenced product must be visible to the caller (their own or
/// public); anything else rolls the whole insert back and surfaces as a
/// validation error.
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    name: &str,
    eaten_on: NaiveDate,
    items: &[NewMealItem],
) -> Result<i64> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("INSERT INTO meals (user_id, name, eaten_on) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(name)
        .bind(eaten_on)
        .execute(&mut *tx)
        .await?;
    let meal_id = result.last_insert_rowid();

    insert_items(&mut tx, user_id, meal_id, items).await?;

    tx.commit().await?;

    Ok(meal_id)
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Meal>> {
    let meal = sqlx::query_as::<_, Meal>("SELECT * FROM meals WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(meal)
}

pub async fn list(pool: &SqlitePool, user_id: i64, date: Option<NaiveDate>) -> Result<Vec<Meal>> {
    let meals = match date {
        Some(date) => {
            sqlx::query_as::<_, Meal>(
                "SELECT * FROM meals WHERE user_id = ? AND eaten_on = ? ORDER BY created_at",
            )
            .bind(user_id)
            .bind(date)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Meal>(
                "SELECT * FROM meals WHERE user_id = ? ORDER BY eaten_on DESC, created_at",
            )
            .bind(user_id)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(meals)
}

/// Fetch the items of a meal with nutrition scaled to each quantity
pub async fn items(pool: &SqlitePool, meal_id: i64) -> Result<Vec<MealItemDetail>> {
    let items = sqlx::query_as::<_, MealItemDetail>(
        "SELECT
            mi.id,
            mi.product_id,
            p.name AS product_name,
            mi.quantity_g,
            p.calories * mi.quantity_g / 100.0 AS calories,
            p.protein_g * mi.quantity_g / 100.0 AS protein_g,
            p.carbs_g * mi.quantity_g / 100.0 AS carbs_g,
            p.fat_g * mi.quantity_g / 100.0 AS fat_g
         FROM meal_items mi
         JOIN products p ON p.id = mi.product_id
         WHERE mi.meal_id = ?
         ORDER BY mi.id",
    )
    .bind(meal_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn with_items(pool: &SqlitePool, meal: Meal) -> Result<MealWithItems> {
    let items = items(pool, meal.id).await?;
    let totals = NutritionTotals::from_items(&items);

    Ok(MealWithItems {
        meal,
        items,
        totals,
    })
}

/// Update a meal and replace its items in one transaction
pub async fn update(
    pool: &SqlitePool,
    user_id: i64,
    meal_id: i64,
    name: &str,
    eaten_on: NaiveDate,
    items: &[NewMealItem],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE meals SET name = ?, eaten_on = ? WHERE id = ?")
        .bind(name)
        .bind(eaten_on)
        .bind(meal_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM meal_items WHERE meal_id = ?")
        .bind(meal_id)
        .execute(&mut *tx)
        .await?;

    insert_items(&mut tx, user_id, meal_id, items).await?;

    tx.commit().await?;

    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM meals WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Nutrition aggregate across all of a user's meals on one date
pub async fn daily_summary(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> Result<DailySummary> {
    let summary = sqlx::query_as::<_, DailySummary>(
        "SELECT
            COUNT(DISTINCT m.id) AS meal_count,
            COALESCE(SUM(p.calories * mi.quantity_g / 100.0), 0.0) AS calories,
            COALESCE(SUM(p.protein_g * mi.quantity_g / 100.0), 0.0) AS protein_g,
            COALESCE(SUM(p.carbs_g * mi.quantity_g / 100.0), 0.0) AS carbs_g,
            COALESCE(SUM(p.fat_g * mi.quantity_g / 100.0), 0.0) AS fat_g
         FROM meals m
         LEFT JOIN meal_items mi ON mi.meal_id = m.id
         LEFT JOIN products p ON p.id = mi.product_id
         WHERE m.user_id = ? AND m.eaten_on = ?",
    )
    .bind(user_id)
    .bind(date)
    .fetch_one(pool)
    .await?;

    Ok(summary)
}

/// Per-day aggregate returned by the summary endpoint
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub meal_count: i64,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

async fn insert_items(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    user_id: i64,
    meal_id: i64,
    items: &[NewMealItem],
) -> Result<()> {
    for item in items {
        if item.quantity_g <= 0.0 {
            return Err(AppError::InvalidInput(
                "Item quantity must be positive".to_string(),
            ));
        }

        // Only the caller's own products and public rows may be referenced;
        // another user's custom product would leak through the item details
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE id = ? AND (user_id IS NULL OR user_id = ?)",
        )
        .bind(item.product_id)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;
        if exists == 0 {
            return Err(AppError::InvalidInput(format!(
                "Unknown product id {}",
                item.product_id
            )));
        }

        sqlx::query("INSERT INTO meal_items (meal_id, product_id, quantity_g) VALUES (?, ?, ?)")
            .bind(meal_id)
            .bind(item.product_id)
            .bind(item.quantity_g)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(calories: f64, protein_g: f64) -> MealItemDetail {
        MealItemDetail {
            id: 0,
            product_id: 0,
            product_name: "test".to_string(),
            quantity_g: 100.0,
            calories,
            protein_g,
            carbs_g: 0.0,
            fat_g: 0.0,
        }
    }

    #[test]
    fn test_totals_sum_items() {
        let items = vec![item(120.0, 10.0), item(80.5, 4.5)];
        let totals = NutritionTotals::from_items(&items);

        assert!((totals.calories - 200.5).abs() < 1e-9);
        assert!((totals.protein_g - 14.5).abs() < 1e-9);
    }

    #[test]
    fn test_totals_empty_meal() {
        let totals = NutritionTotals::from_items(&[]);
        assert_eq!(totals.calories, 0.0);
    }
}
