/// Business logic on top of the repositories
///
/// - [`user_service::UserService`]: signup, find-or-create and email login
/// - [`task_service::TaskService`]: task CRUD with ownership checks
///
/// Both services hold only `Arc`s to repositories and are cheap to clone.

pub mod task_service;
pub mod user_service;

use crate::auth::authorization::AuthzError;
use crate::models::user::User;
use crate::store::StoreError;

/// Error type shared by the services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input rejected before reaching the store
    #[error("{0}")]
    Validation(String),

    /// Referenced record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Email already registered; carries the existing user
    #[error("{message}")]
    Conflict { message: String, user: User },

    /// Caller does not own the resource
    #[error(transparent)]
    Authz(#[from] AuthzError),

    /// Store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Store state that should be impossible
    #[error("{0}")]
    Internal(String),
}

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;
