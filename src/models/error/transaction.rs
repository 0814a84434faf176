use crate::{
    models::{ApiError, RepositoryError},
    services::NotifierError,
};
use log::error;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Transaction validation error: {0}")]
    ValidationError(String),

    #[error("Notifier error: {0}")]
    NotifierError(#[from] NotifierError),

    #[error("Lineage cycle detected: {0}")]
    LineageCycle(String),

    #[error("Lineage too deep: {0}")]
    LineageTooDeep(String),

    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

impl From<ValidationErrors> for TransactionError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        messages.sort();
        TransactionError::ValidationError(messages.join("; "))
    }
}

impl From<TransactionError> for ApiError {
    fn from(error: TransactionError) -> Self {
        match error {
            TransactionError::ValidationError(msg) => ApiError::BadRequest(msg),
            TransactionError::LineageCycle(msg) => {
                ApiError::BadRequest(format!("Replacement would create a cycle: {}", msg))
            }
            TransactionError::LineageTooDeep(msg) => {
                ApiError::BadRequest(format!("Replacement chain is too long: {}", msg))
            }
            TransactionError::NotifierError(err) => {
                error!("Notifier rejected watch request: {}", err);
                ApiError::BadRequest("Failed to register transaction with notifier".to_string())
            }
            TransactionError::RepositoryError(err) => {
                error!("Repository failure: {}", err);
                ApiError::BadRequest("Failed to persist transaction".to_string())
            }
        }
    }
}
