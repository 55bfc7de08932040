use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::models::meal::{self, DailySummary, Meal, MealWithItems, NewMealItem};
use crate::routes::validation::require_non_empty;
use crate::routes::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRequest {
    pub name: String,
    pub eaten_on: NaiveDate,
    #[serde(default)]
    pub items: Vec<NewMealItem>,
}

#[derive(Debug, Deserialize)]
pub struct DateFilter {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct DateParam {
    pub date: NaiveDate,
}

pub async fn list_meals(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<DateFilter>,
) -> Result<Json<ApiResponse<Vec<MealWithItems>>>> {
    let meals = meal::list(&state.pool, auth.user_id, filter.date).await?;

    let mut detailed = Vec::with_capacity(meals.len());
    for m in meals {
        detailed.push(meal::with_items(&state.pool, m).await?);
    }

    Ok(ApiResponse::ok(detailed))
}

/// Create a meal with its items; the insert is transactional
pub async fn create_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<MealRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MealWithItems>>)> {
    require_non_empty("Meal name", &payload.name)?;

    let id = meal::create(
        &state.pool,
        auth.user_id,
        payload.name.trim(),
        payload.eaten_on,
        &payload.items,
    )
    .await?;

    let created = find_owned(&state, auth.user_id, id).await?;
    let detailed = meal::with_items(&state.pool, created).await?;

    Ok((StatusCode::CREATED, ApiResponse::ok(detailed)))
}

pub async fn get_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<MealWithItems>>> {
    let found = find_owned(&state, auth.user_id, id).await?;
    let detailed = meal::with_items(&state.pool, found).await?;

    Ok(ApiResponse::ok(detailed))
}

/// Update a meal; the item list is replaced wholesale
pub async fn update_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<MealRequest>,
) -> Result<Json<ApiResponse<MealWithItems>>> {
    require_non_empty("Meal name", &payload.name)?;
    find_owned(&state, auth.user_id, id).await?;

    meal::update(
        &state.pool,
        auth.user_id,
        id,
        payload.name.trim(),
        payload.eaten_on,
        &payload.items,
    )
    .await?;

    let updated = find_owned(&state, auth.user_id, id).await?;
    let detailed = meal::with_items(&state.pool, updated).await?;

    Ok(ApiResponse::ok(detailed))
}

pub async fn delete_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    find_owned(&state, auth.user_id, id).await?;
    meal::delete(&state.pool, id).await?;

    Ok(ApiResponse::with_message((), "Meal deleted"))
}

/// Aggregate nutrition across all meals on one date
pub async fn daily_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<DateParam>,
) -> Result<Json<ApiResponse<DailySummary>>> {
    let summary = meal::daily_summary(&state.pool, auth.user_id, params.date).await?;
    Ok(ApiResponse::ok(summary))
}

async fn find_owned(state: &AppState, user_id: i64, meal_id: i64) -> Result<Meal> {
    let found = meal::find(&state.pool, meal_id)
        .await?
        .ok_or(AppError::NotFound("Meal"))?;

    if found.user_id != user_id {
        return Err(AppError::Forbidden);
    }

    Ok(found)
}
