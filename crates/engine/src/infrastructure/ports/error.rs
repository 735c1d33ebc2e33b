//! Error types for port operations.

/// Persistence errors (timezone section of the configuration store).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Reading or writing the backing store failed - includes operation name for tracing.
    #[error("I/O error in {operation}: {message}")]
    Io {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Create an Io error with operation context.
    pub fn io(operation: &'static str, message: impl ToString) -> Self {
        Self::Io {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}

/// Errors from the game server's player registry.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    #[error("Player registry unavailable")]
    Unavailable,
    #[error("Player registry query {operation} failed: {message}")]
    Query {
        operation: &'static str,
        message: String,
    },
}

impl RegistryError {
    pub fn query(operation: &'static str, message: impl ToString) -> Self {
        Self::Query {
            operation,
            message: message.to_string(),
        }
    }
}

/// Errors from the permission system client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PermissionError {
    #[error("Permission system unavailable")]
    Unavailable,
    #[error("Loading user {0} was interrupted")]
    Interrupted(String),
    #[error("Permission lookup failed: {0}")]
    LookupFailed(String),
}

/// Errors from the AFK-status integration.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AfkError {
    #[error("AFK status lookup failed: {0}")]
    LookupFailed(String),
}
