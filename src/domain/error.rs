use thiserror::Error;

/// Every way a request can fail. Identity errors surface as user-visible
/// messages; `Internal` wraps repository or hashing failures.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("an account with that email already exists")]
    DuplicateEmail,

    #[error("that email does not exist")]
    UnknownEmail,

    #[error("password incorrect")]
    BadPassword,

    #[error("not signed in")]
    Unauthenticated,

    #[error("not the owner of this list")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("invalid due date, expected YYYY-MM-DD")]
    InvalidDate,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
