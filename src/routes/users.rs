use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::auth::{hash_password, issue_token, verify_password, AuthUser};
use crate::constants::ERR_INCOMPLETE_PROFILE;
use crate::error::{AppError, Result};
use crate::models::user::{self, ProfileUpdate, User};
use crate::nutrition::{self, ActivityLevel, Goal, NutritionTargets, Sex};
use crate::routes::validation::{
    require_non_empty, validate_email, validate_password, validate_range,
};
use crate::routes::ApiResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub sex: Option<String>,
    pub age: Option<i64>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
}

/// Register a new account
///
/// Returns 409 Conflict when the email is already registered.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthPayload>>)> {
    let email = payload.email.trim().to_lowercase();
    validate_email(&email)?;
    validate_password(&payload.password)?;
    require_non_empty("Name", &payload.name)?;

    if user::find_by_email(&state.pool, &email).await?.is_some() {
        tracing::info!("Registration rejected, email already in use");
        return Err(AppError::EmailTaken);
    }

    let password_hash = hash_password(&payload.password)?;
    let user_id = user::create(&state.pool, &email, &password_hash, payload.name.trim()).await?;

    let account = user::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    let token = issue_token(user_id, &state.config.jwt_secret, state.config.token_ttl_hours)?;

    tracing::info!("New user registered: {}", user_id);

    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(
            AuthPayload {
                token,
                user: account,
            },
            "Account created",
        ),
    ))
}

/// Verify credentials and issue a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthPayload>>> {
    let email = payload.email.trim().to_lowercase();

    let account = user::find_by_email(&state.pool, &email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&payload.password, &account.password_hash)? {
        tracing::info!("Failed login attempt for user {}", account.id);
        return Err(AppError::InvalidCredentials);
    }

    let token = issue_token(
        account.id,
        &state.config.jwt_secret,
        state.config.token_ttl_hours,
    )?;

    Ok(ApiResponse::ok(AuthPayload {
        token,
        user: account,
    }))
}

pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<User>>> {
    let account = user::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(ApiResponse::ok(account))
}

/// Update profile attributes; absent fields keep their current value
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<User>>> {
    if let Some(name) = &payload.name {
        require_non_empty("Name", name)?;
    }
    if let Some(sex) = &payload.sex {
        Sex::parse(sex)?;
    }
    if let Some(level) = &payload.activity_level {
        ActivityLevel::parse(level)?;
    }
    if let Some(goal) = &payload.goal {
        Goal::parse(goal)?;
    }
    validate_range("Age", payload.age.map(|a| a as f64), 1.0, 120.0)?;
    validate_range("Height", payload.height_cm, 50.0, 280.0)?;
    validate_range("Weight", payload.weight_kg, 20.0, 500.0)?;

    let update = ProfileUpdate {
        name: payload.name,
        sex: payload.sex.map(|s| s.to_lowercase()),
        age: payload.age,
        height_cm: payload.height_cm,
        weight_kg: payload.weight_kg,
        activity_level: payload.activity_level.map(|l| l.to_lowercase()),
        goal: payload.goal.map(|g| g.to_lowercase()),
    };

    user::update_profile(&state.pool, auth.user_id, update).await?;

    let account = user::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(ApiResponse::ok(account))
}

/// Delete the account; owned meals, products, activities and household
/// records cascade away with it
pub async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<()>>> {
    let deleted = user::delete(&state.pool, auth.user_id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("User"));
    }

    tracing::info!("User {} deleted their account", auth.user_id);

    Ok(ApiResponse::with_message(
        (),
        "Account and all associated data deleted",
    ))
}

/// Compute daily calorie and macro targets from the stored profile
pub async fn get_goals(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<NutritionTargets>>> {
    let account = user::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let (sex, age, height_cm, weight_kg, level, goal) = match (
        &account.sex,
        account.age,
        account.height_cm,
        account.weight_kg,
        &account.activity_level,
        &account.goal,
    ) {
        (Some(sex), Some(age), Some(height), Some(weight), Some(level), Some(goal)) => {
            (sex, age, height, weight, level, goal)
        }
        _ => return Err(AppError::InvalidInput(ERR_INCOMPLETE_PROFILE.to_string())),
    };

    let targets = nutrition::daily_targets(
        Sex::parse(sex)?,
        weight_kg,
        height_cm,
        age as f64,
        ActivityLevel::parse(level)?,
        Goal::parse(goal)?,
    );

    Ok(ApiResponse::ok(targets))
}
