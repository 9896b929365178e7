use strum::Display;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Failed to save user: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

/// Tag written to the error log for each failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    #[strum(serialize = "ValidationError")]
    Validation,
    #[strum(serialize = "DuplicateEmailError")]
    DuplicateEmail,
    #[strum(serialize = "PersistenceError")]
    Persistence,
    #[strum(serialize = "UnexpectedError")]
    Unexpected,
}

impl UserError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::Validation(_) => ErrorKind::Validation,
            UserError::DuplicateEmail(_) => ErrorKind::DuplicateEmail,
            UserError::Persistence(_) => ErrorKind::Persistence,
            UserError::Internal(_) => ErrorKind::Unexpected,
        }
    }

    /// Handled failures abandon one add attempt; anything else must reach the caller.
    pub fn is_handled(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Unexpected)
    }
}
