/// Task endpoints
///
/// All routes sit behind bearer authentication. The caller is always the
/// owner of the tasks it creates; a `userId` sent in a body is ignored.
///
/// # Endpoints
///
/// - `GET /tasks/user` - List the caller's tasks, newest first
/// - `GET /tasks/user/:user_id` - Same, addressed by user ID (must be the caller)
/// - `POST /tasks` - Create a task
/// - `GET /tasks/:id` - Fetch a task
/// - `PUT /tasks/:id` - Partially update a task
/// - `PATCH /tasks/:id/toggle-completion` - Set the completion flag
/// - `DELETE /tasks/:id` - Delete a task
///
/// Tasks owned by someone else answer 403; unknown IDs answer 404.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tasklist_shared::{
    auth::{authorization::require_owner, middleware::AuthContext},
    models::task::{Task, UpdateTask},
};

/// Create task request
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,

    pub description: Option<String>,
}

/// Update task request; absent fields are left untouched
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl From<UpdateTaskRequest> for UpdateTask {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            completed: req.completed,
        }
    }
}

/// Toggle completion request
#[derive(Debug, Deserialize)]
pub struct ToggleCompletionRequest {
    pub completed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub task: Task,
}

#[derive(Debug, Serialize)]
pub struct TaskMessageResponse {
    pub message: String,
    pub task: Task,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// List the caller's tasks
pub async fn list_user_tasks(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<TaskListResponse>> {
    let tasks = state.tasks.list_for_user(&auth.user_id).await?;
    Ok(Json(TaskListResponse { tasks }))
}

/// List a user's tasks by ID
///
/// Only the caller's own ID is accepted; anything else is a 403.
pub async fn list_tasks_by_user_id(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<String>,
) -> ApiResult<Json<TaskListResponse>> {
    require_owner(&auth, &user_id)?;

    let tasks = state.tasks.list_for_user(&user_id).await?;
    Ok(Json(TaskListResponse { tasks }))
}

/// Create a task owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: Missing or blank title
/// - `404 Not Found`: The caller's user record no longer exists
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskMessageResponse>)> {
    let task = state
        .tasks
        .create_task(&auth, req.title, req.description)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TaskMessageResponse {
            message: "Task created successfully".to_string(),
            task,
        }),
    ))
}

/// Fetch one of the caller's tasks
pub async fn get_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskResponse>> {
    let task = state.tasks.get_task(&auth, &id).await?;
    Ok(Json(TaskResponse { task }))
}

/// Update the supplied fields of one of the caller's tasks
pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> ApiResult<Json<TaskMessageResponse>> {
    let task = state.tasks.update_task(&auth, &id, req.into()).await?;

    Ok(Json(TaskMessageResponse {
        message: "Task updated successfully".to_string(),
        task,
    }))
}

/// Set the completion flag of one of the caller's tasks
pub async fn toggle_completion(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ToggleCompletionRequest>,
) -> ApiResult<Json<TaskMessageResponse>> {
    let completed = req
        .completed
        .ok_or_else(|| ApiError::BadRequest("Completed status is required".to_string()))?;

    let task = state.tasks.set_completion(&auth, &id, completed).await?;

    let message = if task.completed {
        "Task marked as completed"
    } else {
        "Task marked as not completed"
    };

    Ok(Json(TaskMessageResponse {
        message: message.to_string(),
        task,
    }))
}

/// Delete one of the caller's tasks
pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state.tasks.delete_task(&auth, &id).await?;

    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
