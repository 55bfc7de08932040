use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::constants::DEFAULT_BODY_WEIGHT_KG;
use crate::error::{AppError, Result};
use crate::models::activity::{self, Activity};
use crate::models::user;
use crate::nutrition::estimate_calories;
use crate::routes::validation::{require_non_empty, validate_positive};
use crate::routes::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    pub activity_type: String,
    pub duration_min: f64,
    /// When absent, estimated from the MET table and the profile weight
    pub calories_burned: Option<f64>,
    pub performed_on: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct DateFilter {
    pub date: Option<NaiveDate>,
}

pub async fn list_activities(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<DateFilter>,
) -> Result<Json<ApiResponse<Vec<Activity>>>> {
    let activities = activity::list(&state.pool, auth.user_id, filter.date).await?;
    Ok(ApiResponse::ok(activities))
}

/// Log an activity, estimating calories via MET when the client omits them
pub async fn create_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ActivityRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Activity>>)> {
    let calories = validate_and_resolve_calories(&state, auth.user_id, &payload).await?;

    let id = activity::create(
        &state.pool,
        auth.user_id,
        payload.activity_type.trim(),
        payload.duration_min,
        calories,
        payload.performed_on,
    )
    .await?;

    let created = activity::find(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Activity"))?;

    Ok((StatusCode::CREATED, ApiResponse::ok(created)))
}

pub async fn update_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<ActivityRequest>,
) -> Result<Json<ApiResponse<Activity>>> {
    find_owned(&state, auth.user_id, id).await?;

    let calories = validate_and_resolve_calories(&state, auth.user_id, &payload).await?;

    activity::update(
        &state.pool,
        id,
        payload.activity_type.trim(),
        payload.duration_min,
        calories,
        payload.performed_on,
    )
    .await?;

    let updated = activity::find(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Activity"))?;

    Ok(ApiResponse::ok(updated))
}

pub async fn delete_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    find_owned(&state, auth.user_id, id).await?;
    activity::delete(&state.pool, id).await?;

    Ok(ApiResponse::with_message((), "Activity deleted"))
}

async fn validate_and_resolve_calories(
    state: &AppState,
    user_id: i64,
    payload: &ActivityRequest,
) -> Result<f64> {
    require_non_empty("Activity type", &payload.activity_type)?;
    validate_positive("Duration", payload.duration_min)?;

    match payload.calories_burned {
        Some(calories) => {
            validate_positive("Calories burned", calories)?;
            Ok(calories)
        }
        None => {
            let weight_kg = user::find_by_id(&state.pool, user_id)
                .await?
                .and_then(|u| u.weight_kg)
                .unwrap_or(DEFAULT_BODY_WEIGHT_KG);

            Ok(estimate_calories(
                payload.activity_type.trim(),
                payload.duration_min,
                weight_kg,
            ))
        }
    }
}

async fn find_owned(state: &AppState, user_id: i64, activity_id: i64) -> Result<Activity> {
    let found = activity::find(&state.pool, activity_id)
        .await?
        .ok_or(AppError::NotFound("Activity"))?;

    if found.user_id != user_id {
        return Err(AppError::Forbidden);
    }

    Ok(found)
}
