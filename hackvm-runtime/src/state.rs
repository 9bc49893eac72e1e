//! Machine state

use hackvm_spec::{Register, NUM_REGISTERS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a register machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadState {
    #[default]
    Running,
    /// Stopped at `irq yield`; the orchestrator may resume it
    Yielded,
    /// Stopped at `irq success`
    Succeeded,
}

impl ThreadState {
    /// Yielded or succeeded
    pub fn is_done(self) -> bool {
        self != ThreadState::Running
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadState::Running => write!(f, "running"),
            ThreadState::Yielded => write!(f, "yielded"),
            ThreadState::Succeeded => write!(f, "succeeded"),
        }
    }
}

/// A store staged by `sw`, applied on commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingWrite {
    /// Word address
    pub address: u16,
    pub value: u16,
}

/// Register file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegisterFile {
    regs: [u16; NUM_REGISTERS],
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read register (r0 always returns 0)
    #[inline]
    pub fn read(&self, reg: Register) -> u16 {
        if reg == Register::ZERO {
            0
        } else {
            self.regs[reg.index()]
        }
    }

    /// Write register (writes to r0 are ignored)
    #[inline]
    pub fn write(&mut self, reg: Register, value: u16) {
        if reg != Register::ZERO {
            self.regs[reg.index()] = value;
        }
    }

    pub fn as_array(&self) -> [u16; NUM_REGISTERS] {
        self.regs
    }
}
