//! Integration tests for the NutriJournal Server API
//!
//! These tests verify the complete request/response cycle for all endpoints
//! against an in-memory SQLite database. External nutrition APIs are never
//! asserted on directly; the only search test exercises input validation.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

const TEST_JWT_SECRET: &str = "test-jwt-secret";

// =============================================================================
// Test Helpers
// =============================================================================

/// Create a test configuration
fn test_config() -> nutrijournal_server::Config {
    nutrijournal_server::Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0, // Random port
        database_url: "sqlite::memory:".to_string(),
        allowed_origins: vec!["http://localhost:8100".to_string()],
        environment: "test".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        token_ttl_hours: 1,
        usda_api_key: None,
        redis_url: None,
    }
}

/// Create a test app backed by a fresh in-memory database
async fn create_test_app() -> Router {
    // A single connection keeps every query on the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    nutrijournal_server::db::init_schema(&pool)
        .await
        .expect("Failed to initialize schema");

    let state = nutrijournal_server::AppState::new(
        pool,
        test_config(),
        nutrijournal_server::Cache::disabled(),
    );

    nutrijournal_server::app(state)
}

/// Parse response body as JSON
async fn body_to_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn delete_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("DELETE").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Register a user and return their bearer token
async fn register_user(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/register",
            None,
            json!({
                "email": email,
                "password": "password123",
                "name": "Test User"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response.into_body()).await;
    body["data"]["token"].as_str().unwrap().to_string()
}

/// Create a custom product and return its id
async fn create_product(app: &Router, token: &str, name: &str, calories: f64) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/products",
            Some(token),
            json!({
                "name": name,
                "calories": calories,
                "proteinG": 10.0,
                "carbsG": 20.0,
                "fatG": 5.0
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response.into_body()).await;
    body["data"]["id"].as_i64().unwrap()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;

    let response = app.oneshot(get_request("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

// =============================================================================
// Registration & Login
// =============================================================================

#[tokio::test]
async fn test_register_returns_token_and_user() {
    let app = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/register",
            None,
            json!({
                "email": "alice@example.com",
                "password": "password123",
                "name": "Alice"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].as_str().is_some());
    assert_eq!(body["data"]["user"]["email"], "alice@example.com");
    // Password hash must never leak
    assert!(body["data"]["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflict() {
    let app = create_test_app().await;
    register_user(&app, "dup@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/register",
            None,
            json!({
                "email": "dup@example.com",
                "password": "password123",
                "name": "Second"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_register_invalid_email_rejected() {
    let app = create_test_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/register",
            None,
            json!({
                "email": "not-an-email",
                "password": "password123",
                "name": "Bob"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_short_password_rejected() {
    let app = create_test_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/register",
            None,
            json!({
                "email": "bob@example.com",
                "password": "short",
                "name": "Bob"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_roundtrip() {
    let app = create_test_app().await;
    register_user(&app, "carol@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            None,
            json!({ "email": "carol@example.com", "password": "password123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert!(body["data"]["token"].as_str().is_some());

    // Wrong password
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            None,
            json!({ "email": "carol@example.com", "password": "wrongpassword" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Unknown email
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            None,
            json!({ "email": "nobody@example.com", "password": "password123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Authentication guard
// =============================================================================

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = create_test_app().await;

    for uri in ["/api/users/me", "/api/meals", "/api/pantry", "/api/recipes"] {
        let response = app.clone().oneshot(get_request(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri: {}", uri);
    }

    let response = app
        .oneshot(get_request("/api/users/me", Some("garbage-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Profile & Goals
// =============================================================================

#[tokio::test]
async fn test_profile_update_and_fetch() {
    let app = create_test_app().await;
    let token = register_user(&app, "dave@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/users/me",
            Some(&token),
            json!({
                "sex": "male",
                "age": 30,
                "heightCm": 180.0,
                "weightKg": 80.0,
                "activityLevel": "sedentary",
                "goal": "maintain"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request("/api/users/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["data"]["sex"], "male");
    assert_eq!(body["data"]["age"], 30);
    assert_eq!(body["data"]["weightKg"], 80.0);
    // Name was not sent, must be unchanged
    assert_eq!(body["data"]["name"], "Test User");
}

#[tokio::test]
async fn test_profile_update_rejects_bad_values() {
    let app = create_test_app().await;
    let token = register_user(&app, "erin@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/users/me",
            Some(&token),
            json!({ "sex": "robot" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/users/me",
            Some(&token),
            json!({ "age": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_goals_require_complete_profile() {
    let app = create_test_app().await;
    let token = register_user(&app, "frank@example.com").await;

    let response = app
        .oneshot(get_request("/api/users/me/goals", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_goals_computed_from_profile() {
    let app = create_test_app().await;
    let token = register_user(&app, "grace@example.com").await;

    app.clone()
        .oneshot(json_request(
            "PUT",
            "/api/users/me",
            Some(&token),
            json!({
                "sex": "male",
                "age": 30,
                "heightCm": 180.0,
                "weightKg": 80.0,
                "activityLevel": "sedentary",
                "goal": "maintain"
            }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(get_request("/api/users/me/goals", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    // Mifflin-St Jeor: 10*80 + 6.25*180 - 5*30 + 5 = 1780; sedentary 1.2x
    assert_eq!(body["data"]["bmr"], 1780.0);
    assert_eq!(body["data"]["tdee"], 2136.0);
    assert_eq!(body["data"]["calories"], 2136.0);
    // 30% protein at 4 kcal/g
    assert_eq!(body["data"]["proteinG"], 160.0);
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_product_crud() {
    let app = create_test_app().await;
    let token = register_user(&app, "heidi@example.com").await;

    let id = create_product(&app, &token, "Oatmeal", 379.0).await;

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/products/{}", id), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["data"]["name"], "Oatmeal");
    assert_eq!(body["data"]["source"], "custom");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/products/{}", id),
            Some(&token),
            json!({ "name": "Rolled Oats", "calories": 380.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["data"]["name"], "Rolled Oats");

    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/products/{}", id), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(&format!("/api/products/{}", id), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_ownership_enforced() {
    let app = create_test_app().await;
    let owner = register_user(&app, "owner@example.com").await;
    let intruder = register_user(&app, "intruder@example.com").await;

    let id = create_product(&app, &owner, "Secret Sauce", 100.0).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/products/{}", id),
            Some(&intruder),
            json!({ "name": "Hijacked" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(delete_request(&format!("/api/products/{}", id), Some(&intruder)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_product_negative_nutrition_rejected() {
    let app = create_test_app().await;
    let token = register_user(&app, "ivan@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/products",
            Some(&token),
            json!({ "name": "Antimatter", "calories": -5.0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_empty_query_rejected() {
    let app = create_test_app().await;
    let token = register_user(&app, "judy@example.com").await;

    let response = app
        .oneshot(get_request("/api/products/search?q=", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_quota_enforced_per_minute() {
    let app = create_test_app().await;
    let token = register_user(&app, "karl@example.com").await;

    for i in 0..nutrijournal_server::constants::MAX_SEARCHES_PER_MINUTE {
        let response = app
            .clone()
            .oneshot(get_request("/api/products/search?q=oatmeal", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "search {} should pass", i);
    }

    let response = app
        .oneshot(get_request("/api/products/search?q=oatmeal", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

// =============================================================================
// Meals
// =============================================================================

#[tokio::test]
async fn test_meal_create_derives_totals() {
    let app = create_test_app().await;
    let token = register_user(&app, "kim@example.com").await;
    let product_id = create_product(&app, &token, "Oatmeal", 100.0).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/meals",
            Some(&token),
            json!({
                "name": "Breakfast",
                "eatenOn": "2026-08-30",
                "items": [ { "productId": product_id, "quantityG": 200.0 } ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response.into_body()).await;
    // 200g of a 100 kcal/100g product
    assert_eq!(body["data"]["totals"]["calories"], 200.0);
    assert_eq!(body["data"]["totals"]["proteinG"], 20.0);
    assert_eq!(body["data"]["items"][0]["productName"], "Oatmeal");
}

#[tokio::test]
async fn test_meal_unknown_product_rolls_back() {
    let app = create_test_app().await;
    let token = register_user(&app, "liam@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/meals",
            Some(&token),
            json!({
                "name": "Ghost Meal",
                "eatenOn": "2026-08-30",
                "items": [ { "productId": 9999, "quantityG": 100.0 } ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The meal row must not have been committed
    let response = app
        .oneshot(get_request("/api/meals", Some(&token)))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_meal_rejects_foreign_private_product() {
    let app = create_test_app().await;
    let owner = register_user(&app, "chef@example.com").await;
    let intruder = register_user(&app, "snoop@example.com").await;

    let product_id = create_product(&app, &owner, "Secret Formula", 123.0).await;

    // Direct read is forbidden
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/products/{}", product_id), Some(&intruder)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Attaching it to a meal must not become a side channel for the same data
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/meals",
            Some(&intruder),
            json!({
                "name": "Espionage",
                "eatenOn": "2026-08-30",
                "items": [ { "productId": product_id, "quantityG": 100.0 } ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // And the rejected meal must not have been committed
    let response = app
        .oneshot(get_request("/api/meals", Some(&intruder)))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_meal_update_rejects_foreign_private_product() {
    let app = create_test_app().await;
    let owner = register_user(&app, "baker@example.com").await;
    let intruder = register_user(&app, "peeker@example.com").await;

    let private_id = create_product(&app, &owner, "House Blend", 200.0).await;
    let own_id = create_product(&app, &intruder, "Plain Toast", 250.0).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/meals",
            Some(&intruder),
            json!({
                "name": "Breakfast",
                "eatenOn": "2026-08-30",
                "items": [ { "productId": own_id, "quantityG": 50.0 } ]
            }),
        ))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    let meal_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/meals/{}", meal_id),
            Some(&intruder),
            json!({
                "name": "Breakfast",
                "eatenOn": "2026-08-30",
                "items": [ { "productId": private_id, "quantityG": 100.0 } ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The original items survive the rolled-back update
    let response = app
        .oneshot(get_request(&format!("/api/meals/{}", meal_id), Some(&intruder)))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["data"]["items"][0]["productName"], "Plain Toast");
}

#[tokio::test]
async fn test_meal_ownership_enforced() {
    let app = create_test_app().await;
    let owner = register_user(&app, "mary@example.com").await;
    let intruder = register_user(&app, "mallory@example.com").await;
    let product_id = create_product(&app, &owner, "Rice", 130.0).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/meals",
            Some(&owner),
            json!({
                "name": "Lunch",
                "eatenOn": "2026-08-30",
                "items": [ { "productId": product_id, "quantityG": 150.0 } ]
            }),
        ))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    let meal_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/meals/{}", meal_id), Some(&intruder)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(get_request(&format!("/api/meals/{}", meal_id), Some(&intruder)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_daily_summary_aggregates_meals() {
    let app = create_test_app().await;
    let token = register_user(&app, "nina@example.com").await;
    let product_id = create_product(&app, &token, "Pasta", 150.0).await;

    for name in ["Breakfast", "Dinner"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/meals",
                Some(&token),
                json!({
                    "name": name,
                    "eatenOn": "2026-08-30",
                    "items": [ { "productId": product_id, "quantityG": 100.0 } ]
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(get_request("/api/meals/summary?date=2026-08-30", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["data"]["mealCount"], 2);
    assert_eq!(body["data"]["calories"], 300.0);
}

#[tokio::test]
async fn test_meal_update_replaces_items() {
    let app = create_test_app().await;
    let token = register_user(&app, "oscar@example.com").await;
    let first = create_product(&app, &token, "Bread", 250.0).await;
    let second = create_product(&app, &token, "Cheese", 400.0).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/meals",
            Some(&token),
            json!({
                "name": "Snack",
                "eatenOn": "2026-08-30",
                "items": [ { "productId": first, "quantityG": 100.0 } ]
            }),
        ))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    let meal_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/meals/{}", meal_id),
            Some(&token),
            json!({
                "name": "Bigger Snack",
                "eatenOn": "2026-08-30",
                "items": [ { "productId": second, "quantityG": 50.0 } ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["data"]["name"], "Bigger Snack");
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["items"][0]["productName"], "Cheese");
    assert_eq!(body["data"]["totals"]["calories"], 200.0);
}

// =============================================================================
// Activities
// =============================================================================

#[tokio::test]
async fn test_activity_met_estimate_when_calories_absent() {
    let app = create_test_app().await;
    let token = register_user(&app, "paula@example.com").await;

    // 70kg profile weight
    app.clone()
        .oneshot(json_request(
            "PUT",
            "/api/users/me",
            Some(&token),
            json!({ "weightKg": 70.0 }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/activities",
            Some(&token),
            json!({
                "activityType": "running",
                "durationMin": 30.0,
                "performedOn": "2026-08-30"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response.into_body()).await;
    // running MET 9.8 * 70kg * 0.5h = 343
    assert_eq!(body["data"]["caloriesBurned"], 343.0);
}

#[tokio::test]
async fn test_activity_explicit_calories_kept() {
    let app = create_test_app().await;
    let token = register_user(&app, "quentin@example.com").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/activities",
            Some(&token),
            json!({
                "activityType": "parkour",
                "durationMin": 45.0,
                "caloriesBurned": 512.0,
                "performedOn": "2026-08-30"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["data"]["caloriesBurned"], 512.0);
}

#[tokio::test]
async fn test_activity_ownership_enforced() {
    let app = create_test_app().await;
    let owner = register_user(&app, "rachel@example.com").await;
    let intruder = register_user(&app, "rupert@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/activities",
            Some(&owner),
            json!({
                "activityType": "yoga",
                "durationMin": 60.0,
                "performedOn": "2026-08-30"
            }),
        ))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .oneshot(delete_request(&format!("/api/activities/{}", id), Some(&intruder)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// =============================================================================
// Pantry
// =============================================================================

#[tokio::test]
async fn test_pantry_crud() {
    let app = create_test_app().await;
    let token = register_user(&app, "sam@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/pantry",
            Some(&token),
            json!({ "name": "Flour", "quantity": 2.0, "unit": "kg" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response.into_body()).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/pantry/{}", id),
            Some(&token),
            json!({ "name": "Flour", "quantity": 1.5, "unit": "kg" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["data"]["quantity"], 1.5);

    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/pantry/{}", id), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request("/api/pantry", Some(&token)))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_pantry_bulk_add_is_atomic() {
    let app = create_test_app().await;
    let token = register_user(&app, "tina@example.com").await;

    // One invalid row poisons the whole batch
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/pantry/bulk",
            Some(&token),
            json!({
                "items": [
                    { "name": "Rice", "quantity": 1.0 },
                    { "name": "", "quantity": 2.0 },
                    { "name": "Beans", "quantity": 3.0 }
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get_request("/api/pantry", Some(&token)))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // A valid batch commits all rows
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/pantry/bulk",
            Some(&token),
            json!({
                "items": [
                    { "name": "Rice", "quantity": 1.0 },
                    { "name": "Beans", "quantity": 3.0 }
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(get_request("/api/pantry", Some(&token)))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

// =============================================================================
// Shopping list & Recipes
// =============================================================================

#[tokio::test]
async fn test_shopping_list_mark_purchased() {
    let app = create_test_app().await;
    let token = register_user(&app, "uma@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/shopping-list",
            Some(&token),
            json!({ "name": "Milk", "quantity": 2.0, "unit": "l" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response.into_body()).await;
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["purchased"], false);

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/shopping-list/{}", id),
            Some(&token),
            json!({ "name": "Milk", "quantity": 2.0, "unit": "l", "purchased": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["data"]["purchased"], true);
}

#[tokio::test]
async fn test_recipe_crud_and_ownership() {
    let app = create_test_app().await;
    let owner = register_user(&app, "vera@example.com").await;
    let intruder = register_user(&app, "victor@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/recipes",
            Some(&owner),
            json!({ "name": "Porridge", "description": "Oats and milk", "servings": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_json(response.into_body()).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/recipes/{}", id), Some(&intruder)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/recipes/{}", id),
            Some(&owner),
            json!({ "name": "Golden Porridge", "servings": 4 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["data"]["name"], "Golden Porridge");
    assert_eq!(body["data"]["servings"], 4);

    let response = app
        .oneshot(delete_request(&format!("/api/recipes/{}", id), Some(&owner)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Account deletion
// =============================================================================

#[tokio::test]
async fn test_delete_account_cascades() {
    let app = create_test_app().await;
    let token = register_user(&app, "wanda@example.com").await;
    let product_id = create_product(&app, &token, "Yogurt", 60.0).await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/meals",
            Some(&token),
            json!({
                "name": "Breakfast",
                "eatenOn": "2026-08-30",
                "items": [ { "productId": product_id, "quantityG": 150.0 } ]
            }),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(delete_request("/api/users/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Profile is gone; the stateless token no longer resolves to a user
    let response = app
        .clone()
        .oneshot(get_request("/api/users/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Owned rows cascaded away
    let response = app
        .clone()
        .oneshot(get_request("/api/meals", Some(&token)))
        .await
        .unwrap();
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // Login for the deleted account fails
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            None,
            json!({ "email": "wanda@example.com", "password": "password123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
