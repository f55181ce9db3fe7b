use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("error with sqlx")]
    DatabaseError(#[source] sqlx::Error),

    #[error("the resource already exists")]
    OnConflict,

    #[error("the resource is referenced by or references a missing row")]
    ForeignKey,

    #[error("stored row is malformed: {0}")]
    InvalidRow(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(database_error) = err.as_database_error() {
            if database_error.is_unique_violation() {
                return StoreError::OnConflict;
            }
            if database_error.is_foreign_key_violation() {
                return StoreError::ForeignKey;
            }
        }

        StoreError::DatabaseError(err)
    }
}
