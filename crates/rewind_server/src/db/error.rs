//! Database error types.

use derive_more::{Display, Error};

/// Broad category of a database failure, used to pick an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DbErrorKind {
    /// A uniqueness rule would be broken.
    #[display("conflict")]
    Conflict,
    /// A referenced row does not exist.
    #[display("not found")]
    NotFound,
    /// Anything else: connection, query or migration failure.
    #[display("query")]
    Query,
}

/// Database error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Database error ({}): {} at {}:{}", kind, message, file, line)]
pub struct DbError {
    /// Failure category.
    pub kind: DbErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a query error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(DbErrorKind::Query, message)
    }

    /// Creates a uniqueness conflict.
    #[track_caller]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_kind(DbErrorKind::Conflict, message)
    }

    /// Creates a missing-row error.
    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_kind(DbErrorKind::NotFound, message)
    }

    #[track_caller]
    fn with_kind(kind: DbErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};
        match err {
            Error::NotFound => Self::not_found("Record not found"),
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::conflict(info.message().to_string())
            }
            other => Self::new(format!("Diesel error: {}", other)),
        }
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}
