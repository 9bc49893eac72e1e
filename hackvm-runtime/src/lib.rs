//! # hackvm Runtime
//!
//! Decide whether an unlocking program may spend an output guarded by a
//! locking program.
//!
//! Both programs run on 16-bit register machines ([`Thread`]) that share a
//! single [`Memory`]. The [`Interpreter`] seeds memory, runs the locking
//! program alone, then runs both in lockstep and reports a [`Verdict`].
//!
//! ## Example
//!
//! ```rust
//! use hackvm_runtime::{Interpreter, RunContext, Decision};
//!
//! let hash = [0u8; 32];
//! let lock = [0xE0, 0x01]; // irq success
//! let unlock = [0xC0, 0x7F]; // hlt
//!
//! let mut interp = Interpreter::new();
//! let result = interp.run(&RunContext::new(&hash, &lock, &unlock)).unwrap();
//! assert!(result.is_accept());
//! assert_eq!(result.reason, Decision::SoloSuccess);
//! ```

pub mod error;
pub mod execute;
pub mod interpreter;
pub mod memory;
pub mod state;
pub mod thread;
pub mod worker;

pub use error::{Result, RuntimeError};
pub use interpreter::{Decision, ExecutionResult, Interpreter, RunContext, Verdict};
pub use memory::{Memory, Region};
pub use state::{PendingWrite, RegisterFile, ThreadState};
pub use thread::Thread;
pub use worker::{handle_request, serve, RunRequest, RunResponse};

/// One-shot validation with default budgets
///
/// Returns `true` when `unlocking_code` may spend the output locked by
/// `locking_code`.
pub fn validate(hash: &[u8], locking_code: &[u8], unlocking_code: &[u8]) -> Result<bool> {
    let mut interpreter = Interpreter::new();
    let result = interpreter.run(&RunContext::new(hash, locking_code, unlocking_code))?;
    Ok(result.is_accept())
}
