use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::models::pantry::{self, NewPantryItem, PantryItem};
use crate::routes::validation::{require_non_empty, validate_positive};
use crate::routes::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAddRequest {
    pub items: Vec<NewPantryItem>,
}

pub async fn list_pantry(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<PantryItem>>>> {
    let items = pantry::list(&state.pool, auth.user_id).await?;
    Ok(ApiResponse::ok(items))
}

pub async fn add_pantry_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewPantryItem>,
) -> Result<(StatusCode, Json<ApiResponse<PantryItem>>)> {
    require_non_empty("Pantry item name", &payload.name)?;
    validate_positive("Quantity", payload.quantity)?;

    let id = pantry::create(&state.pool, auth.user_id, &payload).await?;
    let created = pantry::find(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Pantry item"))?;

    Ok((StatusCode::CREATED, ApiResponse::ok(created)))
}

/// Add a batch of pantry items in one transaction
///
/// A single invalid row rolls back the whole batch.
pub async fn bulk_add_pantry(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<BulkAddRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<PantryItem>>>)> {
    if payload.items.is_empty() {
        return Err(AppError::InvalidInput(
            "Bulk add requires at least one item".to_string(),
        ));
    }

    let ids = pantry::bulk_create(&state.pool, auth.user_id, &payload.items).await?;

    let mut created = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(item) = pantry::find(&state.pool, id).await? {
            created.push(item);
        }
    }

    tracing::info!(
        "User {} bulk-added {} pantry items",
        auth.user_id,
        created.len()
    );

    Ok((StatusCode::CREATED, ApiResponse::ok(created)))
}

pub async fn update_pantry_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<NewPantryItem>,
) -> Result<Json<ApiResponse<PantryItem>>> {
    require_non_empty("Pantry item name", &payload.name)?;
    validate_positive("Quantity", payload.quantity)?;
    find_owned(&state, auth.user_id, id).await?;

    pantry::update(&state.pool, id, &payload).await?;
    let updated = pantry::find(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Pantry item"))?;

    Ok(ApiResponse::ok(updated))
}

pub async fn delete_pantry_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    find_owned(&state, auth.user_id, id).await?;
    pantry::delete(&state.pool, id).await?;

    Ok(ApiResponse::with_message((), "Pantry item deleted"))
}

async fn find_owned(state: &AppState, user_id: i64, item_id: i64) -> Result<PantryItem> {
    let found = pantry::find(&state.pool, item_id)
        .await?
        .ok_or(AppError::NotFound("Pantry item"))?;

    if found.user_id != user_id {
        return Err(AppError::Forbidden);
    }

    Ok(found)
}
