//! Registry errors

use thiserror::Error;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Invalid name '{name}': does not match pattern '{pattern}'")]
    InvalidName { name: String, pattern: String },

    #[error("Name already registered: {0}")]
    DuplicateName(String),

    #[error("Invalid name pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::InvalidName { .. } => "CQ_INVALID_NAME",
            RegistryError::DuplicateName(_) => "CQ_DUPLICATE_NAME",
            RegistryError::InvalidPattern { .. } => "CQ_INVALID_PATTERN",
            RegistryError::Internal(_) => "CQ_REGISTRY_INTERNAL",
        }
    }

    /// Returns true if the error is API misuse
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, RegistryError::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::InvalidName {
            name: "getChildren".into(),
            pattern: "^cq\\.".into(),
        };
        assert!(err.to_string().contains("getChildren"));
        assert_eq!(err.code(), "CQ_INVALID_NAME");

        let err = RegistryError::DuplicateName("cq.getChildren".into());
        assert_eq!(err.to_string(), "Name already registered: cq.getChildren");
        assert!(err.is_caller_error());
    }
}
