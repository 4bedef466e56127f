//! Error types for cardkit operations.
//!
//! This module provides structured error types for the cardkit library,
//! enabling precise error handling and recovery strategies.

use std::fmt;

use crate::validation::ValidationError;

/// Error codes for FFI and mobile integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CardkitErrorCode {
    /// Feature not implemented
    Unimplemented = 1000,
    /// Transport/network layer error
    Transport = 2000,
    /// Connection timeout
    ConnectionTimeout = 2002,
    /// Client session rejected by the API
    Auth = 3000,
    /// Resource not found
    NotFound = 4000,
    /// Invalid request/data
    InvalidData = 5000,
    /// Validation failed
    ValidationFailed = 5001,
    /// Serialization error
    Serialization = 5002,
    /// Decoding of an API document failed
    Decode = 5003,
    /// Encryption of customer input failed
    Encryption = 6000,
    /// Configuration missing or invalid
    Config = 7000,
    /// Rate limited
    RateLimited = 8000,
    /// Internal/unexpected error
    Internal = 9999,
}

/// Comprehensive error type for cardkit operations.
#[derive(Debug)]
pub enum CardkitError {
    /// Feature not compiled in or not implemented.
    Unimplemented(&'static str),

    /// Transport/network layer error.
    Transport(String),

    /// Request timed out.
    ConnectionTimeout {
        /// Operation that timed out
        operation: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// The client session was rejected.
    Auth(String),

    /// Resource not found (payment product, account on file, field, etc.).
    NotFound {
        /// Type of resource (e.g., "payment product", "field")
        resource_type: String,
        /// Resource identifier
        identifier: String,
    },

    /// Invalid data provided.
    InvalidData {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// One or more field values failed validation.
    ValidationFailed(Vec<ValidationError>),

    /// Serialization error.
    Serialization(String),

    /// An API document could not be decoded into the model.
    Decode {
        /// Kind of document (e.g., "account on file")
        document: String,
        /// Underlying decode error
        reason: String,
    },

    /// Encrypting customer input failed.
    Encryption(String),

    /// Configuration missing or invalid.
    Config(String),

    /// Rate limited, should retry after delay.
    RateLimited {
        /// Suggested retry delay in milliseconds
        retry_after_ms: u64,
    },

    /// Internal/unexpected error.
    Internal(String),
}

impl CardkitError {
    /// Get the error code for FFI/mobile integration.
    pub fn code(&self) -> CardkitErrorCode {
        match self {
            Self::Unimplemented(_) => CardkitErrorCode::Unimplemented,
            Self::Transport(_) => CardkitErrorCode::Transport,
            Self::ConnectionTimeout { .. } => CardkitErrorCode::ConnectionTimeout,
            Self::Auth(_) => CardkitErrorCode::Auth,
            Self::NotFound { .. } => CardkitErrorCode::NotFound,
            Self::InvalidData { .. } => CardkitErrorCode::InvalidData,
            Self::ValidationFailed(_) => CardkitErrorCode::ValidationFailed,
            Self::Serialization(_) => CardkitErrorCode::Serialization,
            Self::Decode { .. } => CardkitErrorCode::Decode,
            Self::Encryption(_) => CardkitErrorCode::Encryption,
            Self::Config(_) => CardkitErrorCode::Config,
            Self::RateLimited { .. } => CardkitErrorCode::RateLimited,
            Self::Internal(_) => CardkitErrorCode::Internal,
        }
    }

    /// Get the error message as an owned String (useful for FFI).
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns true if this error is potentially recoverable by retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::ConnectionTimeout { .. } | Self::RateLimited { .. }
        )
    }

    /// Returns a suggested retry delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            Self::ConnectionTimeout { .. } => Some(1000),
            Self::Transport(_) => Some(1000),
            _ => None,
        }
    }

    /// Validation errors carried by this error, if any.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::ValidationFailed(errors) => errors,
            _ => &[],
        }
    }

    /// Create a transport error from any error type.
    pub fn transport<E: std::error::Error>(err: E) -> Self {
        Self::Transport(err.to_string())
    }

    /// Create a not found error.
    pub fn not_found(resource_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a decode error for the given document kind.
    pub fn decode(document: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Decode {
            document: document.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for CardkitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unimplemented(label) => write!(f, "{} is not implemented", label),
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::ConnectionTimeout {
                operation,
                timeout_ms,
            } => {
                write!(f, "{} timed out after {}ms", operation, timeout_ms)
            }
            Self::Auth(msg) => write!(f, "client session rejected: {}", msg),
            Self::NotFound {
                resource_type,
                identifier,
            } => {
                write!(f, "{} not found: {}", resource_type, identifier)
            }
            Self::InvalidData { field, reason } => {
                write!(f, "invalid {}: {}", field, reason)
            }
            Self::ValidationFailed(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field_id.as_str()).collect();
                write!(f, "validation failed for: {}", fields.join(", "))
            }
            Self::Serialization(msg) => write!(f, "serialization error: {}", msg),
            Self::Decode { document, reason } => {
                write!(f, "could not decode {}: {}", document, reason)
            }
            Self::Encryption(msg) => write!(f, "encryption error: {}", msg),
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::RateLimited { retry_after_ms } => {
                write!(f, "rate limited, retry after {}ms", retry_after_ms)
            }
            Self::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for CardkitError {}

impl From<serde_json::Error> for CardkitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<crate::encryption::EncryptionError> for CardkitError {
    fn from(err: crate::encryption::EncryptionError) -> Self {
        Self::Encryption(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationRule;

    #[test]
    fn test_error_codes() {
        let err = CardkitError::RateLimited {
            retry_after_ms: 1000,
        };
        assert_eq!(err.code(), CardkitErrorCode::RateLimited);
        assert!(err.is_retryable());
        assert_eq!(err.retry_after_ms(), Some(1000));
    }

    #[test]
    fn test_validation_failed_display() {
        let err = CardkitError::ValidationFailed(vec![
            ValidationError::new("cardNumber", ValidationRule::Luhn),
            ValidationError::new("cvv", ValidationRule::Required),
        ]);
        assert_eq!(err.code(), CardkitErrorCode::ValidationFailed);
        assert!(!err.is_retryable());
        assert_eq!(err.validation_errors().len(), 2);
        assert_eq!(err.to_string(), "validation failed for: cardNumber, cvv");
    }

    #[test]
    fn test_helper_constructors() {
        let err = CardkitError::not_found("payment product", "1");
        assert_eq!(err.code(), CardkitErrorCode::NotFound);
        assert!(err.validation_errors().is_empty());

        let err = CardkitError::invalid_data("amount", "must be positive");
        assert_eq!(err.code(), CardkitErrorCode::InvalidData);

        let err = CardkitError::decode("account on file", "missing field `id`");
        assert_eq!(err.code(), CardkitErrorCode::Decode);
        assert!(err.to_string().contains("account on file"));
    }
}
