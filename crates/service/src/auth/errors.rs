use thiserror::Error;

/// Failures from registration, login, and token verification. The HTTP
/// layer maps the first four to 400/409/404/401; the rest are internal.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("account already exists")]
    Conflict,
    #[error("account not found")]
    NotFound,
    #[error("invalid credentials")]
    Unauthorized,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("token issue failed: {0}")]
    Token(String),
    #[error("auth storage error: {0}")]
    Repo(String),
}
