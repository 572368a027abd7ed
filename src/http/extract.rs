use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::application::auth_service::AuthService;
use crate::application::todo_service::TodoService;
use crate::domain::error::AppError;
use crate::domain::user::User;

use super::routes::AppState;

/// The authenticated identity for one request, resolved from the bearer
/// token before the handler body runs. Protected handlers take this as an
/// argument; without a valid session they are never entered.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<A, T> FromRequestParts<AppState<A, T>> for CurrentUser
where
    A: AuthService + Clone,
    T: TodoService + Clone,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<A, T>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthenticated)?;
        let user = state.auth.current_user(&token).await?;
        Ok(CurrentUser(user))
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    header.strip_prefix("Bearer ").map(str::to_string)
}
