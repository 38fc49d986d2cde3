/// JWT token generation and validation module
///
/// Tokens are signed with HS256 and carry the user's ID as subject plus the
/// user's email. Every token lives for seven days.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: 7 days, validated with zero leeway
/// - **Failure reporting**: malformed, expired and forged tokens are all
///   reported as [`JwtError::InvalidOrExpired`], so callers cannot tell them apart
///
/// # Example
///
/// ```
/// use tasklist_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new("user-id", "user@example.com");
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated.sub, "user-id");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// Lifetime of every issued token
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token could not be verified, for whatever reason
    #[error("Invalid or expired token")]
    InvalidOrExpired,
}

/// JWT claims structure
///
/// - `sub`: User ID
/// - `email`: User email at issue time
/// - `iat`: Issued at (Unix timestamp)
/// - `exp`: Expiration (Unix timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: String,

    /// User email
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims expiring after [`TOKEN_TTL_DAYS`]
    pub fn new(user_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_expiration(user_id, email, Duration::days(TOKEN_TTL_DAYS))
    }

    /// Creates claims with a custom lifetime
    ///
    /// A negative duration yields already-expired claims, which is handy in
    /// tests.
    ///
    /// # Example
    ///
    /// ```
    /// use tasklist_shared::auth::jwt::Claims;
    /// use chrono::Duration;
    ///
    /// let claims = Claims::with_expiration("user-id", "a@b.c", Duration::hours(1));
    /// assert!(!claims.is_expired());
    /// ```
    pub fn with_expiration(
        user_id: impl Into<String>,
        email: impl Into<String>,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id.into(),
            email: email.into(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Builds claims for a persisted user
    pub fn for_user(user: &User) -> Self {
        Self::new(user.id.clone(), user.email.clone())
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a signed JWT from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues a seven-day token for a user
///
/// # Example
///
/// ```
/// use tasklist_shared::auth::jwt::{issue_token, validate_token};
/// use tasklist_shared::models::user::User;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user = User::new("user@example.com");
/// let token = issue_token(&user, "secret")?;
/// assert_eq!(validate_token(&token, "secret")?.sub, user.id);
/// # Ok(())
/// # }
/// ```
pub fn issue_token(user: &User, secret: &str) -> Result<String, JwtError> {
    create_token(&Claims::for_user(user), secret)
}

/// Validates a JWT and extracts its claims
///
/// Verifies the HS256 signature and the `exp` claim. Any failure collapses
/// into [`JwtError::InvalidOrExpired`].
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        tracing::debug!(reason = %e, "Token rejected");
        JwtError::InvalidOrExpired
    })?;

    Ok(token_data.claims)
}

/// Extracts the user ID (subject) from a token
pub fn user_id_from_token(token: &str, secret: &str) -> Result<String, JwtError> {
    validate_token(token, secret).map(|claims| claims.sub)
}
