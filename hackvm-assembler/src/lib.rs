//! hackvm Assembler
//!
//! Encode hackvm instructions into the big-endian byte stream the register
//! machines fetch from. Programs can be built with the typed [`Assembler`]
//! or assembled from text.
//!
//! ## Example
//!
//! ```rust
//! use hackvm_assembler::{assemble, Assembler};
//! use hackvm_spec::{IrqKind, Register};
//!
//! let from_text = assemble(r#"
//!     irq yield
//!     movi r1, 0x123
//!     irq success
//! "#).unwrap();
//!
//! let mut asm = Assembler::new();
//! asm.irq(IrqKind::Yield).unwrap();
//! asm.movi(Register::R1, 0x123).unwrap();
//! asm.irq(IrqKind::Success).unwrap();
//!
//! assert_eq!(asm.finish().unwrap(), from_text);
//! ```

pub mod assembler;
pub mod encoder;
pub mod error;
pub mod lexer;
pub mod masm;
pub mod parser;

pub use assembler::{assemble, assemble_file, assemble_statements};
pub use encoder::{encode, encode_all};
pub use error::{AssemblerError, Result};
pub use masm::{Assembler, Label};
pub use parser::{parse, parse_instruction, parse_register};
