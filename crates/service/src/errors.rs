use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Write attempted against the read-only file source. Strategy-routed
    /// writes always target the database adapter, so reaching this through
    /// the public service API is a programming error.
    #[error("read-only source: {0}")]
    ReadOnlySource(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }

    pub fn read_only(op: &str) -> Self {
        Self::ReadOnlySource(format!("cannot {} on the JSON snapshot source", op))
    }
}
