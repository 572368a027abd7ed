use axum::routing::get;
use axum::Router;

use crate::application::auth_service::AuthService;
use crate::application::todo_service::TodoService;

use super::routes::{self, AppState};

pub fn app<A, T>(state: AppState<A, T>) -> Router
where
    A: AuthService + Clone,
    T: TodoService + Clone,
{
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(routes::auth::router())
        .merge(routes::todos::router())
        .with_state(state)
}
