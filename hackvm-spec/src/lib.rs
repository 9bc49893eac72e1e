//! # hackvm Specification
//!
//! 16-bit register instruction set used to decide whether a ledger output
//! may be spent. A locking program and an unlocking program run on two
//! register machines that share one memory buffer.
//!
//! ## Key Features
//! - 16-bit words, wraparound arithmetic, no traps
//! - 8 registers, `r0` hard-wired to zero
//! - 8 primary opcodes selected by the top 3 bits of each word
//! - Two interrupt kinds (`success`, `yield`) that drive the verdict
//! - Flat 0x10000-word memory with fixed hash/output/input regions

pub mod config;
pub mod encoding;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod register;

pub use config::{ConfigError, VmConfig};
pub use error::{Result, SpecError};
pub use instruction::Instruction;
pub use opcode::{IrqKind, Opcode};
pub use register::{Register, NUM_REGISTERS};

/// Machine word (registers, memory cells and instructions)
pub type Word = u16;

/// Memory layout (word offsets)
pub const HASH_OFFSET: u16 = 0x0000;
pub const OUTPUT_OFFSET: u16 = 0x1000;
pub const INPUT_OFFSET: u16 = 0x2000;

/// Width of one region in words. Loaded code never exceeds it.
pub const REGION_WORDS: usize = 0x1000;

/// Width of one region in bytes
pub const REGION_BYTES: usize = REGION_WORDS * 2;

/// Total memory: 0x10000 16-bit words
pub const MEMORY_WORDS: usize = 0x10000;
pub const MEMORY_SIZE: usize = MEMORY_WORDS * 2;

/// Size of the previous-output hash placed in the hash region
pub const HASH_SIZE: usize = 32;
