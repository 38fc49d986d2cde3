/// User endpoints
///
/// There are no passwords: an email address identifies the user, and every
/// successful create/find-or-create/authenticate call returns a fresh
/// seven-day bearer token.
///
/// # Endpoints
///
/// - `POST /users` - Register a new user
/// - `POST /users/find-or-create` - Register or fetch by email
/// - `POST /users/authenticate` - Exchange a known email for a token
/// - `GET /users/find?email=` - Look a user up (requires a token)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extract::{ApiJson, ApiQuery},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tasklist_shared::{auth::jwt, models::user::User, services::ServiceError};
use validator::Validate;

/// Request body shared by the user endpoints
#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    /// Email address
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Query for `GET /users/find`
#[derive(Debug, Deserialize)]
pub struct FindUserQuery {
    pub email: Option<String>,
}

/// Response carrying a user and a token
#[derive(Debug, Serialize)]
pub struct UserTokenResponse {
    pub message: String,
    pub user: User,
    pub token: String,
}

/// Find-or-create response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindOrCreateResponse {
    pub message: String,
    pub user: User,
    pub token: String,
    pub is_new_user: bool,
}

/// 409 body for a duplicate signup
#[derive(Debug, Serialize)]
pub struct ConflictResponse {
    pub error: String,
    pub message: String,
    pub user: User,
}

/// Lookup responses
#[derive(Debug, Serialize)]
pub struct FindUserResponse {
    pub user: User,
    pub exists: bool,
}

#[derive(Debug, Serialize)]
pub struct UserNotFoundResponse {
    pub error: String,
    pub message: String,
    pub exists: bool,
}

/// Trims and validates the email in a request body
fn validated_email(req: EmailRequest) -> ApiResult<String> {
    let req = EmailRequest {
        email: req.email.trim().to_string(),
    };

    if req.email.is_empty() {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "email".to_string(),
            message: "Email is required".to_string(),
        }]));
    }

    req.validate()?;
    Ok(req.email)
}

/// Register a new user
///
/// # Errors
///
/// - `400 Bad Request`: Missing or malformed email
/// - `409 Conflict`: Email already registered; the body includes the existing user
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EmailRequest>,
) -> ApiResult<Response> {
    let email = validated_email(req)?;

    let user = match state.users.create_user(&email).await {
        Ok(user) => user,
        Err(ServiceError::Conflict { message, user }) => {
            let body = ConflictResponse {
                error: "conflict".to_string(),
                message,
                user,
            };
            return Ok((StatusCode::CONFLICT, Json(body)).into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let token = jwt::issue_token(&user, &state.jwt_secret)?;

    let body = UserTokenResponse {
        message: "User created successfully".to_string(),
        user,
        token,
    };
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

/// Return the user for an email, creating it if needed
///
/// `isNewUser` tells the two cases apart; the status is 200 either way.
pub async fn find_or_create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EmailRequest>,
) -> ApiResult<Json<FindOrCreateResponse>> {
    let email = validated_email(req)?;

    let (user, is_new_user) = state.users.find_or_create(&email).await?;
    let token = jwt::issue_token(&user, &state.jwt_secret)?;

    let message = if is_new_user {
        "User created successfully"
    } else {
        "User found"
    };

    Ok(Json(FindOrCreateResponse {
        message: message.to_string(),
        user,
        token,
        is_new_user,
    }))
}

/// Exchange a registered email for a token
///
/// # Errors
///
/// - `400 Bad Request`: Missing or malformed email
/// - `404 Not Found`: No user with this email
pub async fn authenticate(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EmailRequest>,
) -> ApiResult<Json<UserTokenResponse>> {
    let email = validated_email(req)?;

    let user = state.users.authenticate(&email).await?;
    let token = jwt::issue_token(&user, &state.jwt_secret)?;

    tracing::debug!(user_id = %user.id, "User authenticated");

    Ok(Json(UserTokenResponse {
        message: "Authentication successful".to_string(),
        user,
        token,
    }))
}

/// Look a user up by email
pub async fn find_user(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<FindUserQuery>,
) -> ApiResult<Response> {
    let email = query
        .email
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Email query parameter is required".to_string()))?;

    match state.users.find_by_email(&email).await? {
        Some(user) => Ok(Json(FindUserResponse { user, exists: true }).into_response()),
        None => {
            let body = UserNotFoundResponse {
                error: "not_found".to_string(),
                message: "User not found".to_string(),
                exists: false,
            };
            Ok((StatusCode::NOT_FOUND, Json(body)).into_response())
        }
    }
}
