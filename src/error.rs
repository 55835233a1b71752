use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Job not found: {0}")]
    JobNotFound(Uuid),

    #[error("Job {0} is no longer available")]
    ClaimConflict(Uuid),

    #[error("{0}")]
    Validation(String),

    #[error("Not signed in")]
    Unauthorized,

    #[error("Invalid email or password")]
    BadCredentials,

    #[error("Not permitted: {0}")]
    Forbidden(String),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QueueError>;
