/// Task use cases
///
/// Every operation acts on behalf of an authenticated [`AuthContext`]. New
/// tasks are always owned by the caller, and reads by ID, updates and
/// deletes require the caller to be the stored owner.

use std::sync::Arc;

use tracing::info;

use super::{ServiceError, ServiceResult};
use crate::auth::{authorization::require_owner, middleware::AuthContext};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::store::{TaskRepository, UserRepository};

/// Task use cases
#[derive(Clone)]
pub struct TaskService {
    users: Arc<dyn UserRepository>,
    tasks: Arc<dyn TaskRepository>,
}

fn task_not_found() -> ServiceError {
    ServiceError::NotFound("Task not found".to_string())
}

fn validate_title(title: &str) -> ServiceResult<()> {
    if title.trim().is_empty() {
        return Err(ServiceError::Validation("Title is required".to_string()));
    }
    Ok(())
}

impl TaskService {
    pub fn new(users: Arc<dyn UserRepository>, tasks: Arc<dyn TaskRepository>) -> Self {
        Self { users, tasks }
    }

    /// Lists the caller's tasks, newest first
    pub async fn list_for_user(&self, user_id: &str) -> ServiceResult<Vec<Task>> {
        Ok(self.tasks.find_all_by_user_id(user_id).await?)
    }

    /// Creates a task owned by the caller
    ///
    /// # Errors
    ///
    /// - `Validation` if the title is blank
    /// - `NotFound` if the caller's user record no longer exists
    pub async fn create_task(
        &self,
        auth: &AuthContext,
        title: String,
        description: Option<String>,
    ) -> ServiceResult<Task> {
        validate_title(&title)?;

        if self.users.find_by_id(&auth.user_id).await?.is_none() {
            return Err(ServiceError::NotFound("User not found".to_string()));
        }

        let task = self
            .tasks
            .create(Task::new(CreateTask {
                title,
                description: description.unwrap_or_default(),
                user_id: auth.user_id.clone(),
            }))
            .await?;

        info!(task_id = %task.id, user_id = %task.user_id, "Task created");
        Ok(task)
    }

    /// Fetches a task the caller owns
    pub async fn get_task(&self, auth: &AuthContext, id: &str) -> ServiceResult<Task> {
        self.load_owned(auth, id).await
    }

    /// Applies a partial update to a task the caller owns
    ///
    /// An empty patch returns the task unchanged.
    pub async fn update_task(
        &self,
        auth: &AuthContext,
        id: &str,
        patch: UpdateTask,
    ) -> ServiceResult<Task> {
        let task = self.load_owned(auth, id).await?;

        if let Some(title) = &patch.title {
            validate_title(title)?;
        }

        if patch.is_empty() {
            return Ok(task);
        }

        self.tasks.update(id, patch).await?.ok_or_else(task_not_found)
    }

    /// Marks a task the caller owns as completed or not
    pub async fn set_completion(
        &self,
        auth: &AuthContext,
        id: &str,
        completed: bool,
    ) -> ServiceResult<Task> {
        self.load_owned(auth, id).await?;

        let patch = UpdateTask {
            completed: Some(completed),
            ..Default::default()
        };

        self.tasks.update(id, patch).await?.ok_or_else(task_not_found)
    }

    /// Deletes a task the caller owns
    pub async fn delete_task(&self, auth: &AuthContext, id: &str) -> ServiceResult<()> {
        self.load_owned(auth, id).await?;

        if !self.tasks.delete(id).await? {
            return Err(task_not_found());
        }

        info!(task_id = %id, user_id = %auth.user_id, "Task deleted");
        Ok(())
    }

    /// Loads a task, failing with 404 if absent and 403 if owned by someone else
    async fn load_owned(&self, auth: &AuthContext, id: &str) -> ServiceResult<Task> {
        let task = self.tasks.find_by_id(id).await?.ok_or_else(task_not_found)?;
        require_owner(auth, &task.user_id)?;
        Ok(task)
    }
}
