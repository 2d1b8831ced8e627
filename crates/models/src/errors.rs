use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<DbErr> for ModelError {
    fn from(e: DbErr) -> Self {
        if is_unique_violation(&e) {
            ModelError::Conflict(e.to_string())
        } else {
            ModelError::Db(e.to_string())
        }
    }
}

/// Whether the driver rejected a write because of a unique constraint.
pub fn is_unique_violation(e: &DbErr) -> bool {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
        return true;
    }
    // Fallback for drivers whose error codes sea-orm does not classify.
    let msg = e.to_string();
    msg.contains("duplicate key value violates unique constraint") || msg.contains("UNIQUE constraint failed")
}
