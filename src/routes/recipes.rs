use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::models::recipe::{self, NewRecipe, Recipe};
use crate::routes::validation::{require_non_empty, validate_positive};
use crate::routes::ApiResponse;
use crate::AppState;

pub async fn list_recipes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Recipe>>>> {
    let recipes = recipe::list(&state.pool, auth.user_id).await?;
    Ok(ApiResponse::ok(recipes))
}

pub async fn create_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewRecipe>,
) -> Result<(StatusCode, Json<ApiResponse<Recipe>>)> {
    require_non_empty("Recipe name", &payload.name)?;
    validate_positive("Servings", payload.servings as f64)?;

    let id = recipe::create(&state.pool, auth.user_id, &payload).await?;
    let created = recipe::find(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;

    Ok((StatusCode::CREATED, ApiResponse::ok(created)))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Recipe>>> {
    let found = find_owned(&state, auth.user_id, id).await?;
    Ok(ApiResponse::ok(found))
}

pub async fn update_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<NewRecipe>,
) -> Result<Json<ApiResponse<Recipe>>> {
    require_non_empty("Recipe name", &payload.name)?;
    validate_positive("Servings", payload.servings as f64)?;
    find_owned(&state, auth.user_id, id).await?;

    recipe::update(&state.pool, id, &payload).await?;
    let updated = recipe::find(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;

    Ok(ApiResponse::ok(updated))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    find_owned(&state, auth.user_id, id).await?;
    recipe::delete(&state.pool, id).await?;

    Ok(ApiResponse::with_message((), "Recipe deleted"))
}

async fn find_owned(state: &AppState, user_id: i64, recipe_id: i64) -> Result<Recipe> {
    let found = recipe::find(&state.pool, recipe_id)
        .await?
        .ok_or(AppError::NotFound("Recipe"))?;

    if found.user_id != user_id {
        return Err(AppError::Forbidden);
    }

    Ok(found)
}
