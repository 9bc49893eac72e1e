//! # hackvm Disassembler
//!
//! Turn hackvm code back into instructions and assembly text.
//!
//! Decoding is total: every 16-bit word decodes to exactly one
//! [`Instruction`](hackvm_spec::Instruction), with words that fit no valid
//! form reported as `Invalid`.
//!
//! ## Example
//!
//! ```rust
//! use hackvm_disassembler::{format, Disassembler};
//!
//! let code = [0xE0, 0x81, 0xC0, 0x7F];
//! let text: Vec<String> = Disassembler::new(&code).iter().map(|i| format(&i)).collect();
//! assert_eq!(text, ["irq yield", "beq r0, r0, -1"]);
//! ```

pub mod decoder;
pub mod disassembler;
pub mod error;
pub mod formatter;

pub use decoder::decode;
pub use disassembler::{disassemble, disassemble_file, Disassembler, Instructions};
pub use error::{DisassemblerError, Result};
pub use formatter::format;
