use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::repository::{SessionRepository, TaskRepository, TodoRepository, UserRepository};
use crate::domain::todo::{NewTask, Task, TaskId, Todo, TodoId};
use crate::domain::user::{User, UserId};

#[derive(Default)]
struct Tables {
    users: HashMap<i64, User>,
    sessions: HashMap<String, i64>,
    todos: HashMap<i64, Todo>,
    tasks: HashMap<i64, Task>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory stand-in for the SQLite store, for service-level tests.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    fn with<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        f(&mut self.tables.lock().unwrap())
    }

    pub fn user_count(&self) -> usize {
        self.with(|t| t.users.len())
    }

    pub fn session_count(&self) -> usize {
        self.with(|t| t.sessions.len())
    }

    pub fn todo_count(&self) -> usize {
        self.with(|t| t.todos.len())
    }

    pub fn task_count(&self) -> usize {
        self.with(|t| t.tasks.len())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User> {
        Ok(self.with(|t| {
            let user = User {
                id: UserId(t.next_id()),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
            };
            t.users.insert(user.id.0, user.clone());
            user
        }))
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.with(|t| t.users.get(&id.0).cloned()))
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.with(|t| t.users.values().find(|u| u.email == email).cloned()))
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn insert_session(&self, token: &str, user: UserId) -> Result<()> {
        self.with(|t| t.sessions.insert(token.to_string(), user.0));
        Ok(())
    }

    async fn session_user(&self, token: &str) -> Result<Option<UserId>> {
        Ok(self.with(|t| t.sessions.get(token).copied().map(UserId)))
    }

    async fn delete_session(&self, token: &str) -> Result<()> {
        self.with(|t| t.sessions.remove(token));
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for InMemoryStore {
    async fn create_todo_with_first_task(
        &self,
        owner: UserId,
        title: &str,
        first_task: NewTask,
    ) -> Result<(Todo, Task)> {
        Ok(self.with(|t| {
            let todo = Todo {
                id: TodoId(t.next_id()),
                title: title.to_string(),
                user_id: owner,
            };
            let task = Task {
                id: TaskId(t.next_id()),
                info: first_task.info,
                due: first_task.due,
                todo_id: todo.id,
                important: false,
            };
            t.todos.insert(todo.id.0, todo.clone());
            t.tasks.insert(task.id.0, task.clone());
            (todo, task)
        }))
    }

    async fn todo_by_id(&self, id: TodoId) -> Result<Option<Todo>> {
        Ok(self.with(|t| t.todos.get(&id.0).cloned()))
    }

    async fn todos_for_user(&self, owner: UserId) -> Result<Vec<Todo>> {
        Ok(self.with(|t| {
            let mut todos: Vec<Todo> = t
                .todos
                .values()
                .filter(|todo| todo.user_id == owner)
                .cloned()
                .collect();
            todos.sort_by_key(|todo| todo.id.0);
            todos
        }))
    }

    async fn rename_todo(&self, id: TodoId, title: &str) -> Result<()> {
        self.with(|t| {
            if let Some(todo) = t.todos.get_mut(&id.0) {
                todo.title = title.to_string();
            }
        });
        Ok(())
    }

    async fn delete_todo_with_tasks(&self, id: TodoId) -> Result<()> {
        self.with(|t| {
            t.tasks.retain(|_, task| task.todo_id != id);
            t.todos.remove(&id.0);
        });
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn insert_task(&self, todo: TodoId, task: NewTask) -> Result<Task> {
        Ok(self.with(|t| {
            let task = Task {
                id: TaskId(t.next_id()),
                info: task.info,
                due: task.due,
                todo_id: todo,
                important: false,
            };
            t.tasks.insert(task.id.0, task.clone());
            task
        }))
    }

    async fn task_by_id(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.with(|t| t.tasks.get(&id.0).cloned()))
    }

    async fn tasks_for_todo(&self, todo: TodoId, important: bool) -> Result<Vec<Task>> {
        Ok(self.with(|t| {
            let mut tasks: Vec<Task> = t
                .tasks
                .values()
                .filter(|task| task.todo_id == todo && task.important == important)
                .cloned()
                .collect();
            tasks.sort_by_key(|task| task.id.0);
            tasks
        }))
    }

    async fn update_task(&self, id: TaskId, info: &str, due: Option<NaiveDate>) -> Result<()> {
        self.with(|t| {
            if let Some(task) = t.tasks.get_mut(&id.0) {
                task.info = info.to_string();
                task.due = due;
            }
        });
        Ok(())
    }

    async fn toggle_important(&self, id: TaskId) -> Result<()> {
        self.with(|t| {
            if let Some(task) = t.tasks.get_mut(&id.0) {
                task.important = !task.important;
            }
        });
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.with(|t| t.tasks.remove(&id.0));
        Ok(())
    }
}
