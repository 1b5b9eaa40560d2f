//! Shared repository error type.

use crate::db::DbError;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure reported by a record store.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A unique key rejected the write, e.g. `pizzas.title_key`.
    UniqueViolation { constraint: String },
    InvalidData(String),
    /// Store-specific failure without a richer classification.
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UniqueViolation { constraint } => {
                write!(f, "unique constraint violated: {constraint}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Unavailable(message) => write!(f, "record store unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(ref err, Some(ref message))
                if err.code == ErrorCode::ConstraintViolation
                    && message.starts_with("UNIQUE constraint failed") =>
            {
                let constraint = message
                    .split_once(": ")
                    .map(|(_, columns)| columns.trim().to_string())
                    .unwrap_or_default();
                Self::UniqueViolation { constraint }
            }
            other => Self::Db(DbError::Sqlite(other)),
        }
    }
}
