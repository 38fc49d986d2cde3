/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`jwt`]: Token issuance and verification (HS256, 7-day lifetime)
/// - [`middleware`]: Bearer-token middleware and the `AuthContext` extractor
/// - [`authorization`]: Ownership checks for task operations
///
/// # Example
///
/// ```
/// use tasklist_shared::auth::jwt::{issue_token, validate_token};
/// use tasklist_shared::models::user::User;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user = User::new("user@example.com");
/// let token = issue_token(&user, "secret-key")?;
/// assert_eq!(validate_token(&token, "secret-key")?.sub, user.id);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
