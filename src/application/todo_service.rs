use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::error::AppError;
use crate::domain::repository::Store;
use crate::domain::todo::{NewTask, Task, TaskId, Todo, TodoId, TodoView};
use crate::domain::user::User;

/// Raw task fields as submitted by the client. The due date stays free text
/// until it is validated here; an empty string means no date was supplied.
#[derive(Debug, Clone)]
pub struct TaskInput {
    pub info: String,
    pub due: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateTodo {
    pub title: String,
    pub first_task: TaskInput,
}

/// Owner-scoped operations on todos and their tasks. Every method takes the
/// authenticated user resolved by the session gate and rejects access to
/// rows that user does not own.
#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn create_todo(&self, owner: &User, input: CreateTodo) -> Result<TodoView, AppError>;
    async fn todo_view(&self, owner: &User, id: TodoId) -> Result<TodoView, AppError>;
    async fn list_todos(&self, owner: &User) -> Result<Vec<Todo>, AppError>;
    async fn rename_todo(&self, owner: &User, id: TodoId, title: String) -> Result<Todo, AppError>;
    async fn delete_todo(&self, owner: &User, id: TodoId) -> Result<(), AppError>;
    async fn add_task(&self, owner: &User, todo: TodoId, input: TaskInput) -> Result<Task, AppError>;
    async fn edit_task(&self, owner: &User, task: TaskId, input: TaskInput) -> Result<Task, AppError>;
    async fn toggle_star(&self, owner: &User, task: TaskId) -> Result<Task, AppError>;
    async fn delete_task(&self, owner: &User, task: TaskId) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<S: Store> {
    store: S,
}

impl<S: Store> TodoServiceImpl<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn owned_todo(&self, owner: &User, id: TodoId) -> Result<Todo, AppError> {
        let todo = self.store.todo_by_id(id).await?.ok_or(AppError::NotFound)?;
        if todo.user_id != owner.id {
            return Err(AppError::Forbidden);
        }
        Ok(todo)
    }

    /// Ownership of a task is ownership of its parent todo.
    async fn owned_task(&self, owner: &User, id: TaskId) -> Result<Task, AppError> {
        let task = self.store.task_by_id(id).await?.ok_or(AppError::NotFound)?;
        self.owned_todo(owner, task.todo_id).await?;
        Ok(task)
    }
}

#[async_trait]
impl<S: Store> TodoService for TodoServiceImpl<S> {
    async fn create_todo(&self, owner: &User, input: CreateTodo) -> Result<TodoView, AppError> {
        // Validate the date before anything is written; a malformed date
        // must leave the store untouched.
        let due = optional_due(input.first_task.due.as_deref())?;
        let first = NewTask {
            info: input.first_task.info,
            due,
        };
        let (todo, task) = self
            .store
            .create_todo_with_first_task(owner.id, &input.title, first)
            .await?;
        Ok(TodoView {
            todo,
            tasks: vec![task],
            important: Vec::new(),
        })
    }

    async fn todo_view(&self, owner: &User, id: TodoId) -> Result<TodoView, AppError> {
        let todo = self.owned_todo(owner, id).await?;
        let tasks = self.store.tasks_for_todo(id, false).await?;
        let important = self.store.tasks_for_todo(id, true).await?;
        Ok(TodoView {
            todo,
            tasks,
            important,
        })
    }

    async fn list_todos(&self, owner: &User) -> Result<Vec<Todo>, AppError> {
        Ok(self.store.todos_for_user(owner.id).await?)
    }

    async fn rename_todo(&self, owner: &User, id: TodoId, title: String) -> Result<Todo, AppError> {
        let mut todo = self.owned_todo(owner, id).await?;
        self.store.rename_todo(id, &title).await?;
        todo.title = title;
        Ok(todo)
    }

    async fn delete_todo(&self, owner: &User, id: TodoId) -> Result<(), AppError> {
        self.owned_todo(owner, id).await?;
        Ok(self.store.delete_todo_with_tasks(id).await?)
    }

    async fn add_task(&self, owner: &User, todo: TodoId, input: TaskInput) -> Result<Task, AppError> {
        self.owned_todo(owner, todo).await?;
        let due = optional_due(input.due.as_deref())?;
        Ok(self
            .store
            .insert_task(
                todo,
                NewTask {
                    info: input.info,
                    due,
                },
            )
            .await?)
    }

    async fn edit_task(&self, owner: &User, id: TaskId, input: TaskInput) -> Result<Task, AppError> {
        let mut task = self.owned_task(owner, id).await?;
        task.info = input.info;
        // An empty due field leaves the stored date alone; it is not a clear.
        if let Some(due) = optional_due(input.due.as_deref())? {
            task.due = Some(due);
        }
        self.store.update_task(task.id, &task.info, task.due).await?;
        Ok(task)
    }

    async fn toggle_star(&self, owner: &User, id: TaskId) -> Result<Task, AppError> {
        let mut task = self.owned_task(owner, id).await?;
        self.store.toggle_important(task.id).await?;
        task.important = !task.important;
        Ok(task)
    }

    async fn delete_task(&self, owner: &User, id: TaskId) -> Result<(), AppError> {
        let task = self.owned_task(owner, id).await?;
        Ok(self.store.delete_task(task.id).await?)
    }
}

fn optional_due(due: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match due {
        Some(text) if !text.is_empty() => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::InvalidDate),
        _ => Ok(None),
    }
}
