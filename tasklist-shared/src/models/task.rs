/// Task model and database operations
///
/// A task is a to-do item owned by exactly one user. Only the owner may read
/// it by ID, change it or delete it; that rule is enforced by the service
/// layer, not by the database.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id TEXT PRIMARY KEY,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     user_id TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE INDEX idx_tasks_user_created ON tasks (user_id, created_at DESC);
/// ```
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::models::task::{CreateTask, Task, UpdateTask};
/// use tasklist_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::insert(&pool, &Task::new(CreateTask {
///     title: "Write report".to_string(),
///     description: String::new(),
///     user_id: "user-id".to_string(),
/// })).await?;
///
/// Task::update(&pool, &task.id, UpdateTask {
///     completed: Some(true),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const TASK_COLUMNS: &str = "id, title, description, completed, user_id, created_at";

/// Task model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID (UUID v4 rendered as a string)
    pub id: String,

    /// Short title, never empty
    pub title: String,

    /// Free-form description (empty when not provided)
    pub description: String,

    /// Whether the task is done
    pub completed: bool,

    /// Owning user ID
    pub user_id: String,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Task description
    #[serde(default)]
    pub description: String,

    /// Owner
    pub user_id: String,
}

/// Field-level partial update
///
/// All fields are optional. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New completion flag
    pub completed: Option<bool>,
}

impl UpdateTask {
    /// True when the patch carries no fields
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    /// Applies the patch to an in-memory task
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

impl Task {
    /// Builds a new, not yet persisted task in the open state
    pub fn new(data: CreateTask) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: data.title,
            description: data.description,
            completed: false,
            user_id: data.user_id,
            created_at: Utc::now(),
        }
    }

    /// Inserts a task row
    pub async fn insert(pool: &PgPool, task: &Task) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks ({TASK_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {TASK_COLUMNS}"
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(&task.id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.completed)
            .bind(&task.user_id)
            .bind(task.created_at)
            .fetch_one(pool)
            .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(task)
    }

    /// Lists a user's tasks, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC, id ASC"
        );

        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(tasks)
    }

    /// Applies a partial update
    ///
    /// Returns `None` if no task has the given ID. An empty patch is a plain
    /// read.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut assignments = Vec::new();
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            assignments.push(format!("title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            assignments.push(format!("description = ${}", bind_count));
        }
        if data.completed.is_some() {
            bind_count += 1;
            assignments.push(format!("completed = ${}", bind_count));
        }

        let query = format!(
            "UPDATE tasks SET {} WHERE id = $1 RETURNING {TASK_COLUMNS}",
            assignments.join(", ")
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(completed) = data.completed {
            q = q.bind(completed);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task::new(CreateTask {
            title: "Original".to_string(),
            description: "Original description".to_string(),
            user_id: "owner".to_string(),
        })
    }

    #[test]
    fn test_new_task_defaults() {
        let task = sample_task();
        assert!(!task.completed);
        assert_eq!(task.user_id, "owner");
        assert!(Uuid::parse_str(&task.id).is_ok());
    }

    #[test]
    fn test_create_task_description_defaults_to_empty() {
        let data: CreateTask =
            serde_json::from_str(r#"{"title":"t","user_id":"u"}"#).unwrap();
        assert_eq!(data.description, "");
    }

    #[test]
    fn test_update_task_is_empty() {
        assert!(UpdateTask::default().is_empty());
        assert!(!UpdateTask {
            completed: Some(false),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_partial_update_only_changes_supplied_fields() {
        let mut task = sample_task();
        let before = task.clone();

        UpdateTask {
            description: Some("New description".to_string()),
            ..Default::default()
        }
        .apply_to(&mut task);

        assert_eq!(task.description, "New description");
        assert_eq!(task.title, before.title);
        assert_eq!(task.completed, before.completed);
        assert_eq!(task.user_id, before.user_id);
        assert_eq!(task.created_at, before.created_at);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let json = serde_json::to_value(sample_task()).unwrap();
        assert_eq!(json["userId"], "owner");
        assert_eq!(json["completed"], false);
        assert!(json.get("createdAt").is_some());
    }
}
