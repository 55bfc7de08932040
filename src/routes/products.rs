use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::constants::{ERR_EMPTY_QUERY, SEARCH_CACHE_TTL_SECS};
use crate::error::{AppError, Result};
use crate::external::ExternalProduct;
use crate::models::product::{self, NewProduct, Product};
use crate::models::rate_limit::check_search_quota;
use crate::routes::validation::require_non_empty;
use crate::routes::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub async fn list_products(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Product>>>> {
    let products = product::list_visible(&state.pool, auth.user_id).await?;
    Ok(ApiResponse::ok(products))
}

/// Create a custom product owned by the caller
pub async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewProduct>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>)> {
    require_non_empty("Product name", &payload.name)?;
    validate_nutrition(&payload)?;

    let id = product::create(&state.pool, Some(auth.user_id), "custom", &payload).await?;
    let created = product::find(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Product"))?;

    Ok((StatusCode::CREATED, ApiResponse::ok(created)))
}

pub async fn get_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Product>>> {
    let found = product::find(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Product"))?;

    // Public rows and the caller's own rows are readable
    if found.user_id.is_some() && found.user_id != Some(auth.user_id) {
        return Err(AppError::Forbidden);
    }

    Ok(ApiResponse::ok(found))
}

pub async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<NewProduct>,
) -> Result<Json<ApiResponse<Product>>> {
    require_non_empty("Product name", &payload.name)?;
    validate_nutrition(&payload)?;
    require_owned(&state, auth.user_id, id).await?;

    product::update(&state.pool, id, &payload).await?;
    let updated = product::find(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Product"))?;

    Ok(ApiResponse::ok(updated))
}

pub async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    require_owned(&state, auth.user_id, id).await?;
    product::delete(&state.pool, id).await?;

    Ok(ApiResponse::with_message((), "Product deleted"))
}

/// Search products by name
///
/// Queries the external nutrition APIs first (results are cached); when
/// the external call fails or returns nothing, falls back to a fuzzy
/// match over the local database. Empty queries are rejected.
pub async fn search_products(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>> {
    let query = params.q.trim().to_lowercase();
    if query.is_empty() {
        return Err(AppError::InvalidInput(ERR_EMPTY_QUERY.to_string()));
    }

    let cache_key = format!("search:{}", query);
    if let Some(cached) = state.cache.get_json::<Vec<ExternalProduct>>(&cache_key).await {
        tracing::debug!("Search cache hit for '{}'", query);
        return Ok(envelope("cache", json!(cached)));
    }

    // The quota guards the external APIs; cache hits are free
    check_search_quota(&state.search_limits, auth.user_id, Utc::now().timestamp())?;

    match state.nutrition_api.search(&query).await {
        Ok(results) if !results.is_empty() => {
            state
                .cache
                .put_json(&cache_key, &results, SEARCH_CACHE_TTL_SECS)
                .await;
            let source = results[0].source.clone();
            Ok(envelope(&source, json!(results)))
        }
        Ok(_) => {
            tracing::debug!("External search empty for '{}', using local fallback", query);
            local_fallback(&state, auth.user_id, &query).await
        }
        Err(e) => {
            tracing::warn!("External search failed for '{}': {}", query, e);
            local_fallback(&state, auth.user_id, &query).await
        }
    }
}

async fn local_fallback(state: &AppState, user_id: i64, query: &str) -> Result<Json<Value>> {
    let results = product::fuzzy_search(&state.pool, user_id, query).await?;
    Ok(envelope("local", json!(results)))
}

fn envelope(source: &str, results: Value) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "source": source,
            "results": results,
        }
    }))
}

async fn require_owned(state: &AppState, user_id: i64, product_id: i64) -> Result<()> {
    let found = product::find(&state.pool, product_id)
        .await?
        .ok_or(AppError::NotFound("Product"))?;

    // Public rows are read-only; custom rows only mutable by their owner
    if found.user_id != Some(user_id) {
        return Err(AppError::Forbidden);
    }

    Ok(())
}

fn validate_nutrition(payload: &NewProduct) -> Result<()> {
    let fields = [
        ("Calories", payload.calories),
        ("Protein", payload.protein_g),
        ("Carbs", payload.carbs_g),
        ("Fat", payload.fat_g),
        ("Fiber", payload.fiber_g),
        ("Sugar", payload.sugar_g),
        ("Sodium", payload.sodium_mg),
    ];

    for (name, value) in fields {
        if value < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "{} must not be negative",
                name
            )));
        }
    }

    Ok(())
}
