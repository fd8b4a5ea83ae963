/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored value could not be interpreted
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create an invalid value error
    pub fn invalid_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl From<StorageError> for gamma_core::GammaError {
    fn from(err: StorageError) -> Self {
        gamma_core::GammaError::storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_into_core_storage_error() {
        let err: gamma_core::GammaError =
            StorageError::invalid_value("onboarding.seen", "maybe").into();
        assert!(
            matches!(err, gamma_core::GammaError::Storage(msg) if msg.contains("onboarding.seen"))
        );
    }
}
