//! Authentication and authorization
//!
//! Session tokens are HS256 JWTs backed by a server-side session record;
//! passwords are hashed with argon2.

mod access;
mod jwt;
mod middleware;
mod password;

pub use access::AccessControl;
pub use jwt::{SessionClaims, SessionTokenCodec, SESSION_LIFETIME_DAYS};
pub use middleware::{authenticate, AuthenticationStage};
pub use password::PasswordService;

use thiserror::Error;

/// Failures of the credential primitives
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("Failed to sign session token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}
