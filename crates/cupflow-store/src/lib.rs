// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod orders;
mod schema;

use rusqlite::Connection;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub const CRATE_NAME: &str = "cupflow-store";

pub use orders::{OrderFilter, UpsertOutcome};
pub use schema::SCHEMA_VERSION;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    NotFound,
    Validation,
    Io,
    Internal,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation_error",
            Self::Io => "io_error",
            Self::Internal => "internal_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(id: impl Display) -> Self {
        Self::new(StoreErrorCode::NotFound, format!("order not found: {id}"))
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Validation, message)
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::QueryReturnedNoRows => {
                Self::new(StoreErrorCode::NotFound, "no matching row")
            }
            other => Self::new(StoreErrorCode::Internal, other.to_string()),
        }
    }
}

/// Owns the single SQLite connection everything persists through. Handlers
/// share it behind a mutex; there is no pooling and none is needed at this
/// scale.
pub struct OrderStore {
    conn: Connection,
}

impl OrderStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        schema::init(&conn)?;
        Ok(Self { conn })
    }

    /// Fresh in-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::new(StoreErrorCode::Io, e.to_string()))?;
        schema::init(&conn)?;
        Ok(Self { conn })
    }
}
