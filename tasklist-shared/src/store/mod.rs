/// Document store abstraction
///
/// Services talk to persistence only through the [`UserRepository`] and
/// [`TaskRepository`] traits. Two backends implement them:
///
/// - [`memory::MemoryStore`]: process-local maps, used for development and tests
/// - [`postgres`]: PostgreSQL tables through sqlx
///
/// Operations are independent; there are no transactions spanning calls.
///
/// # Example
///
/// ```
/// use tasklist_shared::store::Store;
/// use tasklist_shared::models::user::User;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Store::memory();
/// let user = store.users.create(User::new("user@example.com")).await?;
/// assert!(store.users.find_by_id(&user.id).await?.is_some());
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{
    task::{Task, UpdateTask},
    user::User,
};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A user with this email already exists
    #[error("A user with email {0} already exists")]
    DuplicateEmail(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// User collection
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by ID
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>>;

    /// Finds a user by exact email
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Inserts a user, failing with [`StoreError::DuplicateEmail`] if the
    /// email is taken
    async fn create(&self, user: User) -> StoreResult<User>;

    /// Verifies the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}

/// Task collection
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Finds a task by ID
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Task>>;

    /// Lists a user's tasks ordered by creation time, newest first
    async fn find_all_by_user_id(&self, user_id: &str) -> StoreResult<Vec<Task>>;

    /// Inserts a task
    async fn create(&self, task: Task) -> StoreResult<Task>;

    /// Applies a partial update, returning `None` if the task doesn't exist
    async fn update(&self, id: &str, patch: UpdateTask) -> StoreResult<Option<Task>>;

    /// Deletes a task, returning whether it existed
    async fn delete(&self, id: &str) -> StoreResult<bool>;
}

/// Handles to both collections
#[derive(Clone)]
pub struct Store {
    /// User collection
    pub users: Arc<dyn UserRepository>,

    /// Task collection
    pub tasks: Arc<dyn TaskRepository>,

    backend: &'static str,
}

impl Store {
    /// Creates a store over explicit repositories
    pub fn new(
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
        backend: &'static str,
    ) -> Self {
        Self {
            users,
            tasks,
            backend,
        }
    }

    /// Creates an empty in-memory store
    pub fn memory() -> Self {
        let store = Arc::new(memory::MemoryStore::new());
        Self::new(store.clone(), store, "memory")
    }

    /// Creates a PostgreSQL-backed store
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(postgres::PgUserRepository::new(pool.clone())),
            Arc::new(postgres::PgTaskRepository::new(pool)),
            "postgres",
        )
    }

    /// Backend name ("memory" or "postgres")
    pub fn backend(&self) -> &'static str {
        self.backend
    }
}
