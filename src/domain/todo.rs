use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::user::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub i64);

/// A named task list owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub user_id: UserId,
}

/// A single work item under a todo. `important` is the starred flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub info: String,
    pub due: Option<NaiveDate>,
    pub todo_id: TodoId,
    pub important: bool,
}

/// Validated field values for a task about to be inserted.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub info: String,
    pub due: Option<NaiveDate>,
}

/// A todo together with its tasks, split by the important flag. The two
/// sequences are disjoint and together hold every task of the todo.
#[derive(Debug, Clone, Serialize)]
pub struct TodoView {
    pub todo: Todo,
    pub tasks: Vec<Task>,
    pub important: Vec<Task>,
}
