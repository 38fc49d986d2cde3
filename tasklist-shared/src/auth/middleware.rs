/// Authentication middleware for Axum
///
/// Validates `Authorization: Bearer <token>` headers and stores the caller's
/// identity in the request extensions as an [`AuthContext`]. Handlers behind
/// the middleware take `AuthContext` as an extractor.
///
/// Every failure (missing header, wrong scheme, bad token) is a 401.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{middleware, routing::get, Router};
/// use tasklist_shared::auth::middleware::{jwt_auth_middleware, AuthContext};
///
/// async fn protected_handler(auth: AuthContext) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
///
/// let secret: Arc<str> = Arc::from("your-jwt-secret");
/// let app: Router = Router::new()
///     .route("/protected", get(protected_handler))
///     .layer(middleware::from_fn_with_state(secret, jwt_auth_middleware));
/// ```

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::jwt::{validate_token, Claims};

/// Identity of the authenticated caller
///
/// Added to the request by [`jwt_auth_middleware`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID (the token subject)
    pub user_id: String,

    /// Email recorded in the token
    pub email: String,
}

impl AuthContext {
    /// Creates auth context from verified JWT claims
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

/// Error type for authentication middleware
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Authentication token not provided")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("Invalid token format")]
    InvalidFormat,

    /// Token verification failed
    #[error("Invalid or expired token")]
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": "unauthorized",
            "message": self.to_string(),
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Splits an `Authorization` header value into its bearer token
///
/// The value must be exactly two whitespace-separated parts, the first being
/// `Bearer`. Runs of whitespace between the parts count as one separator.
pub fn extract_bearer_token(value: &str) -> Result<&str, AuthError> {
    let mut parts = value.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(AuthError::InvalidFormat),
    }
}

/// Verifies the bearer token in a header map
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat)?;

    let token = extract_bearer_token(auth_header)?;

    let claims = validate_token(token, secret).map_err(|_| AuthError::InvalidToken)?;

    Ok(AuthContext::from_claims(claims))
}

/// JWT authentication middleware
///
/// On success the request continues with an [`AuthContext`] extension;
/// otherwise a 401 is returned and the handler never runs.
pub async fn jwt_auth_middleware(
    State(secret): State<Arc<str>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_context = authenticate(req.headers(), &secret).map_err(|e| {
        tracing::debug!(error = %e, path = %req.uri().path(), "Rejected unauthenticated request");
        e
    })?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use axum::{body::Body, http::HeaderValue, middleware, routing::get, Router};
    use chrono::Duration;
    use tower::ServiceExt;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn app() -> Router {
        async fn whoami(auth: AuthContext) -> String {
            auth.user_id
        }

        let secret: Arc<str> = Arc::from(SECRET);
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(secret, jwt_auth_middleware))
    }

    async fn call(authorization: Option<String>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Ok("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), Err(AuthError::InvalidFormat));
        assert_eq!(extract_bearer_token("Bearer"), Err(AuthError::InvalidFormat));
        assert_eq!(extract_bearer_token("Bearer a b"), Err(AuthError::InvalidFormat));
        assert_eq!(extract_bearer_token("bearer abc"), Err(AuthError::InvalidFormat));
    }

    #[test]
    fn test_extra_whitespace_between_parts_is_accepted() {
        assert_eq!(extract_bearer_token("Bearer  abc"), Ok("abc"));
        assert_eq!(extract_bearer_token(" Bearer\tabc "), Ok("abc"));
    }

    #[test]
    fn test_non_utf8_header_is_invalid_format() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );

        assert_eq!(authenticate(&headers, SECRET), Err(AuthError::InvalidFormat));
        assert_eq!(
            authenticate(&HeaderMap::new(), SECRET),
            Err(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn test_auth_context_from_claims() {
        let context = AuthContext::from_claims(Claims::new("user-1", "user@example.com"));

        assert_eq!(context.user_id, "user-1");
        assert_eq!(context.email, "user@example.com");
    }

    #[test]
    fn test_auth_errors_are_unauthorized() {
        for err in [
            AuthError::MissingCredentials,
            AuthError::InvalidFormat,
            AuthError::InvalidToken,
        ] {
            assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_valid_token_injects_identity() {
        let token = create_token(&Claims::new("user-42", "u@example.com"), SECRET).unwrap();

        let (status, body) = call(Some(format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "user-42");
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        let (status, body) = call(None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("not provided"));
    }

    #[tokio::test]
    async fn test_wrong_scheme_rejected() {
        let token = create_token(&Claims::new("user-42", "u@example.com"), SECRET).unwrap();

        let (status, _) = call(Some(format!("Token {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_and_forged_tokens_rejected_uniformly() {
        let expired = create_token(
            &Claims::with_expiration("user-42", "u@example.com", Duration::seconds(-60)),
            SECRET,
        )
        .unwrap();
        let forged = create_token(&Claims::new("user-42", "u@example.com"), "another-secret").unwrap();

        let (expired_status, expired_body) = call(Some(format!("Bearer {}", expired))).await;
        let (forged_status, forged_body) = call(Some(format!("Bearer {}", forged))).await;

        assert_eq!(expired_status, StatusCode::UNAUTHORIZED);
        assert_eq!(forged_status, StatusCode::UNAUTHORIZED);
        assert_eq!(expired_body, forged_body);
    }
}
