//! Helpers shared by Redis repository implementations: JSON encoding of
//! stored documents and translation of Redis failures.

use crate::models::RepositoryError;
use log::{error, warn};
use redis::{ErrorKind, RedisError};
use serde::{de::DeserializeOwned, Serialize};

/// Mixed into Redis-backed repositories. `id` arguments only label log lines
/// and error messages.
pub trait RedisRepository {
    fn encode<T: Serialize>(&self, entity: &T, id: &str) -> Result<String, RepositoryError> {
        serde_json::to_string(entity).map_err(|e| invalid_document("encode", id, e))
    }

    fn decode<T: DeserializeOwned>(&self, json: &str, id: &str) -> Result<T, RepositoryError> {
        serde_json::from_str(json).map_err(|e| invalid_document("decode", id, e))
    }

    /// Maps a Redis failure onto the repository error kinds; `operation` names the caller.
    fn map_redis_error(&self, error: RedisError, operation: &str) -> RepositoryError {
        warn!("Redis {} failed: {}", operation, error);

        if error.is_connection_dropped() || error.is_connection_refusal() || error.is_timeout() {
            return RepositoryError::ConnectionError(format!(
                "Redis unavailable during {}: {}",
                operation, error
            ));
        }

        let message = format!("{} failed: {}", operation, error);
        match error.kind() {
            ErrorKind::TypeError => RepositoryError::InvalidData(message),
            ErrorKind::ExecAbortError => RepositoryError::TransactionFailure(message),
            ErrorKind::AuthenticationFailed => {
                RepositoryError::ConnectionError("Redis authentication failed".to_string())
            }
            _ => RepositoryError::Other(message),
        }
    }
}

fn invalid_document(action: &str, id: &str, error: serde_json::Error) -> RepositoryError {
    error!("Cannot {} stored document {}: {}", action, id, error);
    RepositoryError::InvalidData(format!("Cannot {} document {}: {}", action, id, error))
}
