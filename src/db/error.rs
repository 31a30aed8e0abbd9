use thiserror::Error;

#[derive(Error, Debug)]
#[allow(unused)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate record")]
    Duplicate,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
