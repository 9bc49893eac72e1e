//! Runtime error types

use crate::memory::Region;
use hackvm_spec::SpecError;
use thiserror::Error;

/// Failures that stop a run before any verdict is reached
///
/// Programs themselves cannot fail: every word executes. These errors only
/// cover malformed inputs and the worker transport.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Spec error: {0}")]
    SpecError(#[from] SpecError),

    #[error("{region} data is {len} bytes, region holds {capacity}")]
    RegionOverflow {
        region: Region,
        len: usize,
        capacity: usize,
    },

    #[error("Invalid hex in `{field}`: {source}")]
    InvalidHex {
        field: &'static str,
        source: hex::FromHexError,
    },

    #[error("Malformed request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use hackvm_spec::ConfigError;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_region_overflow_display() {
        let err = RuntimeError::RegionOverflow {
            region: Region::Output,
            len: 0x2001,
            capacity: 0x2000,
        };
        assert_eq!(err.to_string(), "output code data is 8193 bytes, region holds 8192");
    }

    #[test]
    fn test_invalid_hex_display() {
        let err = RuntimeError::InvalidHex {
            field: "hash",
            source: hex::FromHexError::OddLength,
        };
        assert!(err.to_string().starts_with("Invalid hex in `hash`"));
    }

    #[test]
    fn test_spec_error_from() {
        let runtime_err: RuntimeError = SpecError::from(ConfigError::ZeroBudget).into();
        assert!(runtime_err.to_string().contains("non-zero"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = IoError::new(ErrorKind::BrokenPipe, "pipe closed");
        let runtime_err: RuntimeError = io_err.into();
        assert!(runtime_err.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_json_error_from() {
        let json_err = serde_json::from_str::<u8>("{").unwrap_err();
        let runtime_err: RuntimeError = json_err.into();
        assert!(runtime_err.to_string().starts_with("Malformed request"));
    }
}
