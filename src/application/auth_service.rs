use anyhow::anyhow;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::AppError;
use crate::domain::repository::Store;
use crate::domain::user::User;

/// An established session: the opaque token handed back to the client plus
/// the user it authenticates.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// The session/identity gate. Registration and login open a session;
/// `current_user` is the per-request check every protected operation
/// goes through.
#[async_trait]
pub trait AuthService: Send + Sync + 'static {
    async fn register(&self, email: &str, password: &str) -> Result<Session, AppError>;
    async fn login(&self, email: &str, password: &str) -> Result<Session, AppError>;
    /// Idempotent; a token that no longer resolves is not an error.
    async fn logout(&self, token: &str) -> Result<(), AppError>;
    async fn current_user(&self, token: &str) -> Result<User, AppError>;
}

#[derive(Clone)]
pub struct AuthServiceImpl<S: Store> {
    store: S,
}

impl<S: Store> AuthServiceImpl<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn open_session(&self, user: User) -> Result<Session, AppError> {
        let token = Uuid::new_v4().to_string();
        self.store.insert_session(&token, user.id).await?;
        Ok(Session { token, user })
    }
}

#[async_trait]
impl<S: Store> AuthService for AuthServiceImpl<S> {
    async fn register(&self, email: &str, password: &str) -> Result<Session, AppError> {
        if self.store.user_by_email(email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }
        let hash = hash_password(password)?;
        let user = self.store.insert_user(email, &hash).await?;
        tracing::info!(user = user.id.0, "registered");
        self.open_session(user).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let user = self
            .store
            .user_by_email(email)
            .await?
            .ok_or(AppError::UnknownEmail)?;
        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::BadPassword);
        }
        self.open_session(user).await
    }

    async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.store.delete_session(token).await?;
        Ok(())
    }

    async fn current_user(&self, token: &str) -> Result<User, AppError> {
        let user_id = self
            .store
            .session_user(token)
            .await?
            .ok_or(AppError::Unauthenticated)?;
        match self.store.user_by_id(user_id).await? {
            Some(user) => Ok(user),
            None => {
                // The account behind this session is gone; drop the stale row.
                self.store.delete_session(token).await?;
                Err(AppError::Unauthenticated)
            }
        }
    }
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow!("password hashing failed: {e}")))
}

fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow!("stored credential unreadable: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
