pub mod auth;
pub mod todos;

use crate::application::auth_service::AuthService;
use crate::application::todo_service::TodoService;

#[derive(Clone)]
pub struct AppState<A: AuthService, T: TodoService> {
    pub auth: A,
    pub todos: T,
}
