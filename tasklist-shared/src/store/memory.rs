/// In-memory document store
///
/// Both collections live in `HashMap`s behind `tokio::sync::RwLock`s. Email
/// uniqueness is checked under the users write lock, so concurrent inserts of
/// the same email cannot both succeed.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, TaskRepository, UserRepository};
use crate::models::{
    task::{Task, UpdateTask},
    user::User,
};

/// Process-local store implementing both repositories
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    tasks: RwLock<HashMap<String, Task>>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }

        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Task>> {
        Ok(self.tasks.read().await.get(id).cloned())
    }

    async fn find_all_by_user_id(&self, user_id: &str) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;

        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();

        owned.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(owned)
    }

    async fn create(&self, task: Task) -> StoreResult<Task> {
        self.tasks
            .write()
            .await
            .insert(task.id.clone(), task.clone());
        Ok(task)
    }

    async fn update(&self, id: &str, patch: UpdateTask) -> StoreResult<Option<Task>> {
        let mut tasks = self.tasks.write().await;

        Ok(tasks.get_mut(id).map(|task| {
            patch.apply_to(task);
            task.clone()
        }))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        Ok(self.tasks.write().await.remove(id).is_some())
    }
}
