use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Failed to connect to the database: {0}")]
    ConnectionError(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Transaction failure: {0}")]
    TransactionFailure(String),

    #[error("An unknown error occurred: {0}")]
    Unknown(String),

    #[error("Storage operation failed: {0}")]
    Other(String),
}
