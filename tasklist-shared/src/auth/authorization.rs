/// Ownership checks
///
/// Tasks have a single owner. Reading a task by ID, updating it, toggling its
/// completion and deleting it are all reserved to that owner. Failing the
/// check is a 403 regardless of the operation.
///
/// # Example
///
/// ```
/// use tasklist_shared::auth::authorization::require_owner;
/// use tasklist_shared::auth::middleware::AuthContext;
///
/// let auth = AuthContext {
///     user_id: "user-a".to_string(),
///     email: "a@example.com".to_string(),
/// };
///
/// assert!(require_owner(&auth, "user-a").is_ok());
/// assert!(require_owner(&auth, "user-b").is_err());
/// ```

use super::middleware::AuthContext;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Caller doesn't own the resource
    #[error("You do not have permission to access this task")]
    NotOwner,
}

/// Checks that the authenticated caller owns a resource
///
/// # Errors
///
/// Returns `AuthzError::NotOwner` when the stored owner differs from the
/// caller's user ID.
pub fn require_owner(auth: &AuthContext, owner_id: &str) -> Result<(), AuthzError> {
    if auth.user_id == owner_id {
        Ok(())
    } else {
        tracing::warn!(
            user_id = %auth.user_id,
            owner_id = %owner_id,
            "Ownership check failed"
        );
        Err(AuthzError::NotOwner)
    }
}
