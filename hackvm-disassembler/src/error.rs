//! Disassembler errors
//!
//! Decoding itself never fails: every word decodes to some instruction,
//! possibly `Invalid`. Only reading input can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisassemblerError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
