use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use super::todo::{NewTask, Task, TaskId, Todo, TodoId};
use super::user::{User, UserId};

#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Inserts a new account. The store enforces email uniqueness; callers
    /// check first so the duplicate case never reaches the constraint.
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User>;
    async fn user_by_id(&self, id: UserId) -> Result<Option<User>>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync + 'static {
    async fn insert_session(&self, token: &str, user: UserId) -> Result<()>;
    async fn session_user(&self, token: &str) -> Result<Option<UserId>>;
    /// Deleting a token that does not exist is not an error.
    async fn delete_session(&self, token: &str) -> Result<()>;
}

#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    /// Inserts the todo and its first task in one transaction; a todo is
    /// never created empty.
    async fn create_todo_with_first_task(
        &self,
        owner: UserId,
        title: &str,
        first_task: NewTask,
    ) -> Result<(Todo, Task)>;
    async fn todo_by_id(&self, id: TodoId) -> Result<Option<Todo>>;
    async fn todos_for_user(&self, owner: UserId) -> Result<Vec<Todo>>;
    async fn rename_todo(&self, id: TodoId, title: &str) -> Result<()>;
    /// Deletes the todo and all its tasks in one transaction; no orphan
    /// tasks survive.
    async fn delete_todo_with_tasks(&self, id: TodoId) -> Result<()>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    async fn insert_task(&self, todo: TodoId, task: NewTask) -> Result<Task>;
    async fn task_by_id(&self, id: TaskId) -> Result<Option<Task>>;
    /// Tasks of one todo filtered by the important flag, ordered by id.
    async fn tasks_for_todo(&self, todo: TodoId, important: bool) -> Result<Vec<Task>>;
    async fn update_task(&self, id: TaskId, info: &str, due: Option<NaiveDate>) -> Result<()>;
    /// Flips the important flag in place.
    async fn toggle_important(&self, id: TaskId) -> Result<()>;
    async fn delete_task(&self, id: TaskId) -> Result<()>;
}

/// Everything the application layer needs from persistence.
pub trait Store:
    UserRepository + SessionRepository + TodoRepository + TaskRepository + Clone
{
}

impl<S> Store for S where
    S: UserRepository + SessionRepository + TodoRepository + TaskRepository + Clone
{
}
