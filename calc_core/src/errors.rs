//! # Error Types
//!
//! The calculators never fail: degenerate geometry is clamped or reported as
//! a "no data" result. Errors only come out of the boundaries around them,
//! namely project files, the estimator configuration and work-item codes typed
//! in by the user.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn check_tax(tax_pct: f64) -> CalcResult<()> {
//!     if tax_pct < 0.0 {
//!         return Err(CalcError::invalid_input("tax_pct", tax_pct.to_string(), "Tax cannot be negative"));
//!     }
//!     Ok(())
//! }
//!
//! let err = check_tax(-1.0).unwrap_err();
//! assert_eq!(err.error_code(), "INVALID_INPUT");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type CalcResult<T> = Result<T, CalcError>;

/// Failure at the file or configuration boundary.
///
/// Serialized as `{"type": ..., "details": {...}}` so a front end can show
/// the fields without parsing the message.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A configured percentage or price is out of range
    #[error("Invalid value for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A work-item code asked for by name is not in the recipe table
    #[error("Unknown work item code: {code}")]
    UnknownWorkItem { code: String },

    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Another estimator has the project open
    #[error("Project '{path}' is open by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// Project JSON could not be written or parsed
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    #[error("Project schema {file_version} is not readable by this version ({expected_version})")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// The TOML configuration could not be parsed or written
    #[error("Configuration error in '{path}': {reason}")]
    ConfigError { path: String, reason: String },
}

impl CalcError {
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_work_item(code: impl Into<String>) -> Self {
        CalcError::UnknownWorkItem { code: code.into() }
    }

    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError { reason: reason.into() }
    }

    pub fn config_error(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ConfigError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Short stable code, printed by the CLI next to the message
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownWorkItem { .. } => "UNKNOWN_WORK_ITEM",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::ConfigError { .. } => "CONFIG_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_json_is_tagged() {
        let error = CalcError::file_locked("induk.rab", "budi (PC-07)", "2024-03-01T08:00:00Z");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"FileLocked\""));
        assert!(json.contains("\"locked_by\":\"budi (PC-07)\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::unknown_work_item("X.99").error_code(), "UNKNOWN_WORK_ITEM");
        assert_eq!(CalcError::config_error("rab.toml", "bad").error_code(), "CONFIG_ERROR");
        assert_eq!(CalcError::serialization("eof").error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_version_message() {
        let error = CalcError::VersionMismatch {
            file_version: "0.2.0".to_string(),
            expected_version: "0.1.0".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Project schema 0.2.0 is not readable by this version (0.1.0)"
        );
    }
}
