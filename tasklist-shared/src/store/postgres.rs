/// PostgreSQL-backed repositories
///
/// Thin adapters from the repository traits to the sqlx queries on the
/// models. The schema is created by [`crate::db::migrations::run_migrations`].

use async_trait::async_trait;
use sqlx::PgPool;

use super::{StoreError, StoreResult, TaskRepository, UserRepository};
use crate::db::pool::health_check;
use crate::models::{
    task::{Task, UpdateTask},
    user::User,
};

/// User collection over the `users` table
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Task collection over the `tasks` table
#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique violation on the email column to `DuplicateEmail`
fn map_insert_error(err: sqlx::Error, email: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.constraint().is_some_and(|c| c.contains("email")) {
            return StoreError::DuplicateEmail(email.to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn create(&self, user: User) -> StoreResult<User> {
        User::insert(&self.pool, &user)
            .await
            .map_err(|e| map_insert_error(e, &user.email))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn find_all_by_user_id(&self, user_id: &str) -> StoreResult<Vec<Task>> {
        Ok(Task::list_by_user(&self.pool, user_id).await?)
    }

    async fn create(&self, task: Task) -> StoreResult<Task> {
        Ok(Task::insert(&self.pool, &task).await?)
    }

    async fn update(&self, id: &str, patch: UpdateTask) -> StoreResult<Option<Task>> {
        Ok(Task::update(&self.pool, id, patch).await?)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, id).await?)
    }
}
