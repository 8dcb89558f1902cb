use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    DatabaseError(String),
    DuplicateKey(String),
    InvalidRequest(String),
}

impl AppError {
    /// Raw failure text, without the variant prefix used by `Display`.
    pub fn message(&self) -> &str {
        match self {
            AppError::DatabaseError(msg)
            | AppError::DuplicateKey(msg)
            | AppError::InvalidRequest(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::DuplicateKey(msg) => write!(f, "Duplicate key: {}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        if crate::database::is_duplicate_key(&err) {
            AppError::DuplicateKey(err.to_string())
        } else {
            AppError::DatabaseError(err.to_string())
        }
    }
}
