//! Persistence error shared by every store backend.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Backing store could not serve a read or accept a write.
#[derive(Debug)]
pub enum PersistenceError {
    /// Local SQLite failure.
    Db(DbError),
    /// Remote store could not be reached.
    Unreachable(String),
    /// Remote store answered but refused the request.
    Rejected { status: u16, message: String },
    /// Stored data does not have the expected shape.
    InvalidData(String),
}

impl PersistenceError {
    /// Stable machine-readable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Db(_) => "db_error",
            Self::Unreachable(_) => "store_unreachable",
            Self::Rejected { .. } => "store_rejected",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "local store error: {err}"),
            Self::Unreachable(message) => write!(f, "store unreachable: {message}"),
            Self::Rejected { status, message } => {
                write!(f, "store rejected request (status {status}): {message}")
            }
            Self::InvalidData(message) => write!(f, "invalid stored data: {message}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unreachable(_) | Self::Rejected { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
