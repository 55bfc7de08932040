//! NutriJournal Server Library
//!
//! This module exports the core types and router for testing and reuse.

pub mod auth;
pub mod cache;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod external;
pub mod models;
pub mod nutrition;
pub mod routes;

pub use cache::Cache;
pub use config::Config;
pub use error::{AppError, Result};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    routing::{get, post, put},
    Router,
};

use external::NutritionApi;
use models::rate_limit::RateLimiter;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub config: Config,
    pub cache: Cache,
    pub nutrition_api: NutritionApi,
    pub search_limits: RateLimiter,
}

impl AppState {
    /// Create a new AppState with the given pool, configuration and cache
    pub fn new(pool: sqlx::SqlitePool, config: Config, cache: Cache) -> Self {
        let nutrition_api = NutritionApi::new(config.usda_api_key.clone());
        Self {
            pool,
            config,
            cache,
            nutrition_api,
            search_limits: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

/// Build the API router
///
/// Shared between `main` and the integration tests so both exercise the
/// same routing table.
pub fn app(state: AppState) -> Router {
    use routes::activities::*;
    use routes::health::health_check;
    use routes::meals::*;
    use routes::pantry::*;
    use routes::products::*;
    use routes::recipes::*;
    use routes::shopping::*;
    use routes::users::*;

    Router::new()
        .route("/health", get(health_check))
        .route("/api/users/register", post(register))
        .route("/api/users/login", post(login))
        .route(
            "/api/users/me",
            get(get_profile).put(update_profile).delete(delete_account),
        )
        .route("/api/users/me/goals", get(get_goals))
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/search", get(search_products))
        .route(
            "/api/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/meals", get(list_meals).post(create_meal))
        .route("/api/meals/summary", get(daily_summary))
        .route(
            "/api/meals/:id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
        .route(
            "/api/activities",
            get(list_activities).post(create_activity),
        )
        .route(
            "/api/activities/:id",
            put(update_activity).delete(delete_activity),
        )
        .route("/api/pantry", get(list_pantry).post(add_pantry_item))
        .route("/api/pantry/bulk", post(bulk_add_pantry))
        .route(
            "/api/pantry/:id",
            put(update_pantry_item).delete(delete_pantry_item),
        )
        .route(
            "/api/shopping-list",
            get(list_shopping).post(add_shopping_item),
        )
        .route(
            "/api/shopping-list/:id",
            put(update_shopping_item).delete(delete_shopping_item),
        )
        .route("/api/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/api/recipes/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .with_state(state)
}
