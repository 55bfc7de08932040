use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::models::shopping::{self, NewShoppingListItem, ShoppingListItem};
use crate::routes::validation::{require_non_empty, validate_positive};
use crate::routes::ApiResponse;
use crate::AppState;

pub async fn list_shopping(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<ShoppingListItem>>>> {
    let items = shopping::list(&state.pool, auth.user_id).await?;
    Ok(ApiResponse::ok(items))
}

pub async fn add_shopping_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewShoppingListItem>,
) -> Result<(StatusCode, Json<ApiResponse<ShoppingListItem>>)> {
    require_non_empty("Shopping item name", &payload.name)?;
    validate_positive("Quantity", payload.quantity)?;

    let id = shopping::create(&state.pool, auth.user_id, &payload).await?;
    let created = shopping::find(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Shopping item"))?;

    Ok((StatusCode::CREATED, ApiResponse::ok(created)))
}

/// Update a shopping item, typically to mark it purchased
pub async fn update_shopping_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<NewShoppingListItem>,
) -> Result<Json<ApiResponse<ShoppingListItem>>> {
    require_non_empty("Shopping item name", &payload.name)?;
    validate_positive("Quantity", payload.quantity)?;
    find_owned(&state, auth.user_id, id).await?;

    shopping::update(&state.pool, id, &payload).await?;
    let updated = shopping::find(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Shopping item"))?;

    Ok(ApiResponse::ok(updated))
}

pub async fn delete_shopping_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    find_owned(&state, auth.user_id, id).await?;
    shopping::delete(&state.pool, id).await?;

    Ok(ApiResponse::with_message((), "Shopping item deleted"))
}

async fn find_owned(state: &AppState, user_id: i64, item_id: i64) -> Result<ShoppingListItem> {
    let found = shopping::find(&state.pool, item_id)
        .await?
        .ok_or(AppError::NotFound("Shopping item"))?;

    if found.user_id != user_id {
        return Err(AppError::Forbidden);
    }

    Ok(found)
}
