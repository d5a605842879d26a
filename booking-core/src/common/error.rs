use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{message}")]
    Validation { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

pub type Result<T> = std::result::Result<T, BookingError>;
