//! # Error Types for hackvm

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Unknown register: {0}")]
    UnknownRegister(String),

    #[error("Invalid register index: {0} (valid range: 0-7)")]
    InvalidRegister(u8),

    #[error("Unknown irq type \"{0}\"")]
    UnknownIrq(String),
}

pub type Result<T> = std::result::Result<T, SpecError>;
