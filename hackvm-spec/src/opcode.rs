//! # hackvm Opcode Definitions
//!
//! The top 3 bits of every instruction word select one of eight opcodes.
//! Opcode 7 is shared by `jalr` and `irq`; bit 0 tells them apart.

use crate::error::{Result, SpecError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Instruction opcode (3 bits)
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// ADD: a = b + c
    Add = 0,
    /// ADDI: a = b + sign_extend(imm7)
    Addi = 1,
    /// NAND: a = !(b & c)
    Nand = 2,
    /// LUI: a = imm16 (low 6 bits zero)
    Lui = 3,
    /// SW: mem[b + imm7] = a (staged until commit)
    Sw = 4,
    /// LW: a = mem[b + imm7]
    Lw = 5,
    /// BEQ: if a == b { pc = pc + 1 + imm7 }
    Beq = 6,
    /// JALR / IRQ
    Jalr = 7,
}

impl Opcode {
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Add),
            1 => Some(Self::Addi),
            2 => Some(Self::Nand),
            3 => Some(Self::Lui),
            4 => Some(Self::Sw),
            5 => Some(Self::Lw),
            6 => Some(Self::Beq),
            7 => Some(Self::Jalr),
            _ => None,
        }
    }

    /// Opcode of an instruction word. Total: every word has one.
    pub const fn from_word(word: u16) -> Self {
        match word >> 13 {
            0 => Self::Add,
            1 => Self::Addi,
            2 => Self::Nand,
            3 => Self::Lui,
            4 => Self::Sw,
            5 => Self::Lw,
            6 => Self::Beq,
            _ => Self::Jalr,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Addi => "addi",
            Self::Nand => "nand",
            Self::Lui => "lui",
            Self::Sw => "sw",
            Self::Lw => "lw",
            Self::Beq => "beq",
            Self::Jalr => "jalr",
        }
    }

    /// Opcodes whose third field is a signed 7-bit immediate
    pub fn has_imm7(self) -> bool {
        matches!(self, Self::Addi | Self::Sw | Self::Lw | Self::Beq)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Interrupt kind carried in bits 7-9 of an `irq` word
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IrqKind {
    Success = 0,
    Yield = 1,
}

impl IrqKind {
    pub const fn code(self) -> u16 {
        self as u16
    }

    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::Yield),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Yield => "yield",
        }
    }
}

impl FromStr for IrqKind {
    type Err = SpecError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "success" => Ok(Self::Success),
            "yield" => Ok(Self::Yield),
            _ => Err(SpecError::UnknownIrq(name.to_string())),
        }
    }
}

impl fmt::Display for IrqKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
