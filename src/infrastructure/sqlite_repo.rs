use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};

use crate::domain::{
    repository::{SessionRepository, TaskRepository, TodoRepository, UserRepository},
    todo::{NewTask, Task, TaskId, Todo, TodoId},
    user::{User, UserId},
};

#[derive(Clone)]
pub struct SqliteStore {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        // An in-memory database exists per connection, so it must not be
        // spread across a pool.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool: Arc::new(pool) })
    }

    pub async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
            )",
        )
        .execute(&*self.pool)
        .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todo (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                user_id INTEGER NOT NULL REFERENCES user(id)
            )",
        )
        .execute(&*self.pool)
        .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS task (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                info TEXT NOT NULL,
                due TEXT,
                title_id INTEGER NOT NULL REFERENCES todo(id),
                important INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&*self.pool)
        .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS session (
                token TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES user(id)
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for SqliteStore {
    async fn insert_user(&self, email: &str, password_hash: &str) -> Result<User> {
        let result = sqlx::query("INSERT INTO user (email, password) VALUES (?1, ?2)")
            .bind(email)
            .bind(password_hash)
            .execute(&*self.pool)
            .await?;
        Ok(User {
            id: UserId(result.last_insert_rowid()),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        })
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, email, password FROM user WHERE id = ?1")
            .bind(id.0)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.map(row_to_user))
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, email, password FROM user WHERE email = ?1")
            .bind(email)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.map(row_to_user))
    }
}

#[async_trait]
impl SessionRepository for SqliteStore {
    async fn insert_session(&self, token: &str, user: UserId) -> Result<()> {
        sqlx::query("INSERT INTO session (token, user_id) VALUES (?1, ?2)")
            .bind(token)
            .bind(user.0)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn session_user(&self, token: &str) -> Result<Option<UserId>> {
        let row = sqlx::query("SELECT user_id FROM session WHERE token = ?1")
            .bind(token)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.map(|r| UserId(r.get("user_id"))))
    }

    async fn delete_session(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM session WHERE token = ?1")
            .bind(token)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for SqliteStore {
    async fn create_todo_with_first_task(
        &self,
        owner: UserId,
        title: &str,
        first_task: NewTask,
    ) -> Result<(Todo, Task)> {
        let mut tx = self.pool.begin().await?;
        let todo_id = sqlx::query("INSERT INTO todo (title, user_id) VALUES (?1, ?2)")
            .bind(title)
            .bind(owner.0)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
        let task_id = sqlx::query("INSERT INTO task (info, due, title_id) VALUES (?1, ?2, ?3)")
            .bind(&first_task.info)
            .bind(first_task.due)
            .bind(todo_id)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
        tx.commit().await?;
        Ok((
            Todo {
                id: TodoId(todo_id),
                title: title.to_string(),
                user_id: owner,
            },
            Task {
                id: TaskId(task_id),
                info: first_task.info,
                due: first_task.due,
                todo_id: TodoId(todo_id),
                important: false,
            },
        ))
    }

    async fn todo_by_id(&self, id: TodoId) -> Result<Option<Todo>> {
        let row = sqlx::query("SELECT id, title, user_id FROM todo WHERE id = ?1")
            .bind(id.0)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.map(row_to_todo))
    }

    async fn todos_for_user(&self, owner: UserId) -> Result<Vec<Todo>> {
        let rows = sqlx::query("SELECT id, title, user_id FROM todo WHERE user_id = ?1 ORDER BY id")
            .bind(owner.0)
            .fetch_all(&*self.pool)
            .await?;
        Ok(rows.into_iter().map(row_to_todo).collect())
    }

    async fn rename_todo(&self, id: TodoId, title: &str) -> Result<()> {
        sqlx::query("UPDATE todo SET title = ?2 WHERE id = ?1")
            .bind(id.0)
            .bind(title)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn delete_todo_with_tasks(&self, id: TodoId) -> Result<()> {
        // The cascade is spelled out: tasks first, then the todo, one
        // transaction.
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM task WHERE title_id = ?1")
            .bind(id.0)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM todo WHERE id = ?1")
            .bind(id.0)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for SqliteStore {
    async fn insert_task(&self, todo: TodoId, task: NewTask) -> Result<Task> {
        let result = sqlx::query("INSERT INTO task (info, due, title_id) VALUES (?1, ?2, ?3)")
            .bind(&task.info)
            .bind(task.due)
            .bind(todo.0)
            .execute(&*self.pool)
            .await?;
        Ok(Task {
            id: TaskId(result.last_insert_rowid()),
            info: task.info,
            due: task.due,
            todo_id: todo,
            important: false,
        })
    }

    async fn task_by_id(&self, id: TaskId) -> Result<Option<Task>> {
        let row = sqlx::query("SELECT id, info, due, title_id, important FROM task WHERE id = ?1")
            .bind(id.0)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.map(row_to_task))
    }

    async fn tasks_for_todo(&self, todo: TodoId, important: bool) -> Result<Vec<Task>> {
        let rows = sqlx::query(
            "SELECT id, info, due, title_id, important FROM task
             WHERE title_id = ?1 AND important = ?2 ORDER BY id",
        )
        .bind(todo.0)
        .bind(important)
        .fetch_all(&*self.pool)
        .await?;
        Ok(rows.into_iter().map(row_to_task).collect())
    }

    async fn update_task(&self, id: TaskId, info: &str, due: Option<NaiveDate>) -> Result<()> {
        sqlx::query("UPDATE task SET info = ?2, due = ?3 WHERE id = ?1")
            .bind(id.0)
            .bind(info)
            .bind(due)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn toggle_important(&self, id: TaskId) -> Result<()> {
        sqlx::query("UPDATE task SET important = NOT important WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        sqlx::query("DELETE FROM task WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        Ok(())
    }
}

fn row_to_user(row: SqliteRow) -> User {
    User {
        id: UserId(row.get("id")),
        email: row.get("email"),
        password_hash: row.get("password"),
    }
}

fn row_to_todo(row: SqliteRow) -> Todo {
    Todo {
        id: TodoId(row.get("id")),
        title: row.get("title"),
        user_id: UserId(row.get("user_id")),
    }
}

fn row_to_task(row: SqliteRow) -> Task {
    Task {
        id: TaskId(row.get("id")),
        info: row.get("info"),
        due: row.get("due"),
        todo_id: TodoId(row.get("title_id")),
        important: row.get("important"),
    }
}
