//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use qlog_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const THROTTLED: i32 = 4003;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Validation(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::Domain(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Serialization(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::NotFound(msg) => ErrorObjectOwned::owned(code::NOT_FOUND, msg, None::<()>),
        AppError::Database(msg) => {
            let code = if msg.starts_with("Unique constraint") {
                code::CONFLICT
            } else {
                code::DB_ERROR
            };
            ErrorObjectOwned::owned(code, msg, None::<()>)
        }
        AppError::Io(e) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, e.to_string(), None::<()>),
        AppError::Config(msg) | AppError::Rpc(msg) | AppError::Internal(msg) => {
            ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>)
        }
    }
}

/// Error for a request that ran out of rate-limit tokens
pub fn throttled() -> ErrorObjectOwned {
    ErrorObjectOwned::owned(
        code::THROTTLED,
        "Rate limit exceeded. Please slow down.",
        None::<()>,
    )
}

/// Error for a request missing a required field
pub fn missing_field(fields: &str) -> ErrorObjectOwned {
    ErrorObjectOwned::owned(
        code::VALIDATION_ERROR,
        format!("Missing required fields: {}", fields),
        None::<()>,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_4000() {
        let err = to_rpc_error(AppError::Validation("bad".to_string()));
        assert_eq!(err.code(), code::VALIDATION_ERROR);
        assert_eq!(err.message(), "bad");
    }

    #[test]
    fn test_unique_violation_maps_to_conflict() {
        let err = to_rpc_error(AppError::Database(
            "Unique constraint violation: question_logs.id (1555)".to_string(),
        ));
        assert_eq!(err.code(), code::CONFLICT);

        let err = to_rpc_error(AppError::Database("Database full: x".to_string()));
        assert_eq!(err.code(), code::DB_ERROR);
    }

    #[test]
    fn test_missing_field_message() {
        let err = missing_field("question_id, model_choices (array)");
        assert_eq!(err.code(), code::VALIDATION_ERROR);
        assert!(err.message().contains("question_id"));
    }
}
