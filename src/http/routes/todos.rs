use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::application::auth_service::AuthService;
use crate::application::todo_service::{CreateTodo, TaskInput, TodoService};
use crate::domain::error::AppError;
use crate::domain::todo::{Task, TaskId, Todo, TodoId, TodoView};
use crate::http::extract::CurrentUser;
use crate::http::types::{CreateTodoBody, RenameTodoBody, TaskBody};

use super::AppState;

pub fn router<A, T>() -> Router<AppState<A, T>>
where
    A: AuthService + Clone,
    T: TodoService + Clone,
{
    Router::new()
        .route("/todos", post(create_todo::<A, T>).get(list_todos::<A, T>))
        .route(
            "/todos/:id",
            get(todo_view::<A, T>)
                .put(rename_todo::<A, T>)
                .delete(delete_todo::<A, T>),
        )
        .route("/todos/:id/tasks", post(add_task::<A, T>))
        .route("/tasks/:id", put(edit_task::<A, T>).delete(delete_task::<A, T>))
        .route("/tasks/:id/star", post(toggle_star::<A, T>))
}

async fn create_todo<A: AuthService, T: TodoService>(
    State(state): State<AppState<A, T>>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateTodoBody>,
) -> Result<(StatusCode, Json<TodoView>), AppError> {
    let input = CreateTodo {
        title: body.title,
        first_task: TaskInput {
            info: body.first_task,
            due: body.due,
        },
    };
    let view = state.todos.create_todo(&user, input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn list_todos<A: AuthService, T: TodoService>(
    State(state): State<AppState<A, T>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Todo>>, AppError> {
    Ok(Json(state.todos.list_todos(&user).await?))
}

async fn todo_view<A: AuthService, T: TodoService>(
    State(state): State<AppState<A, T>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<TodoView>, AppError> {
    Ok(Json(state.todos.todo_view(&user, TodoId(id)).await?))
}

async fn rename_todo<A: AuthService, T: TodoService>(
    State(state): State<AppState<A, T>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<RenameTodoBody>,
) -> Result<Json<Todo>, AppError> {
    Ok(Json(
        state.todos.rename_todo(&user, TodoId(id), body.title).await?,
    ))
}

async fn delete_todo<A: AuthService, T: TodoService>(
    State(state): State<AppState<A, T>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.todos.delete_todo(&user, TodoId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_task<A: AuthService, T: TodoService>(
    State(state): State<AppState<A, T>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<TaskBody>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let input = TaskInput {
        info: body.info,
        due: body.due,
    };
    let task = state.todos.add_task(&user, TodoId(id), input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn edit_task<A: AuthService, T: TodoService>(
    State(state): State<AppState<A, T>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(body): Json<TaskBody>,
) -> Result<Json<Task>, AppError> {
    let input = TaskInput {
        info: body.info,
        due: body.due,
    };
    Ok(Json(state.todos.edit_task(&user, TaskId(id), input).await?))
}

async fn toggle_star<A: AuthService, T: TodoService>(
    State(state): State<AppState<A, T>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Task>, AppError> {
    Ok(Json(state.todos.toggle_star(&user, TaskId(id)).await?))
}

async fn delete_task<A: AuthService, T: TodoService>(
    State(state): State<AppState<A, T>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.todos.delete_task(&user, TaskId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
