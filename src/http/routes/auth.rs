use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::application::auth_service::AuthService;
use crate::application::todo_service::TodoService;
use crate::domain::error::AppError;
use crate::http::extract::{bearer_token, CurrentUser};
use crate::http::types::{CredentialsBody, SessionResponse, UserResponse};

use super::AppState;

pub fn router<A, T>() -> Router<AppState<A, T>>
where
    A: AuthService + Clone,
    T: TodoService + Clone,
{
    Router::new()
        .route("/register", post(register::<A, T>))
        .route("/login", post(login::<A, T>))
        .route("/logout", post(logout::<A, T>))
        .route("/me", get(me::<A, T>))
}

async fn register<A: AuthService, T: TodoService>(
    State(state): State<AppState<A, T>>,
    Json(body): Json<CredentialsBody>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let session = state.auth.register(&body.email, &body.password).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

async fn login<A: AuthService, T: TodoService>(
    State(state): State<AppState<A, T>>,
    Json(body): Json<CredentialsBody>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.auth.login(&body.email, &body.password).await?;
    Ok(Json(session.into()))
}

// Deliberately not behind `CurrentUser`: logging out with a missing or
// already-dead token still succeeds.
async fn logout<A: AuthService, T: TodoService>(
    State(state): State<AppState<A, T>>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    if let Some(token) = bearer_token(&headers) {
        state.auth.logout(&token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn me<A: AuthService, T: TodoService>(
    CurrentUser(user): CurrentUser,
) -> Json<UserResponse> {
    Json(user.into())
}
