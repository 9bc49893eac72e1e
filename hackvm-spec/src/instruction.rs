//! hackvm Instruction Set
//!
//! Decoded view of an instruction word. Used for encoding, inspection and
//! listings; the register machine executes raw words directly.

use crate::opcode::{IrqKind, Opcode};
use crate::register::Register;
use serde::{Deserialize, Serialize};

/// hackvm instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    /// ADD: a = b + c (mod 2^16)
    Add { a: Register, b: Register, c: Register },

    /// ADDI: a = b + imm (imm in -64..=63)
    Addi { a: Register, b: Register, imm: i32 },

    /// NAND: a = !(b & c)
    Nand { a: Register, b: Register, c: Register },

    /// LUI: a = imm (imm & 0x3f == 0)
    Lui { a: Register, imm: u16 },

    /// SW: mem[b + imm] = a
    Sw { a: Register, b: Register, imm: i32 },

    /// LW: a = mem[b + imm]
    Lw { a: Register, b: Register, imm: i32 },

    /// BEQ: if a == b { pc = pc + 1 + imm }
    Beq { a: Register, b: Register, imm: i32 },

    /// JALR: a = pc + 1; pc = b
    Jalr { a: Register, b: Register },

    /// IRQ: change machine state
    Irq { kind: IrqKind },

    /// Word with reserved bits set: an `add`/`nand` with bits 3-6 non-zero, or
    /// an opcode-7 word that is neither a well-formed `jalr` nor `irq`
    Invalid { raw: u16 },
}

impl Instruction {
    /// Get instruction mnemonic
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Irq { .. } => "irq",
            Instruction::Invalid { .. } => "<invalid>",
            other => other.opcode().mnemonic(),
        }
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Add { .. } => Opcode::Add,
            Instruction::Addi { .. } => Opcode::Addi,
            Instruction::Nand { .. } => Opcode::Nand,
            Instruction::Lui { .. } => Opcode::Lui,
            Instruction::Sw { .. } => Opcode::Sw,
            Instruction::Lw { .. } => Opcode::Lw,
            Instruction::Beq { .. } => Opcode::Beq,
            Instruction::Jalr { .. } | Instruction::Irq { .. } => Opcode::Jalr,
            Instruction::Invalid { raw } => Opcode::from_word(*raw),
        }
    }

    /// Destination register, if the instruction writes one
    pub fn destination(&self) -> Option<Register> {
        match self {
            Instruction::Add { a, .. }
            | Instruction::Addi { a, .. }
            | Instruction::Nand { a, .. }
            | Instruction::Lui { a, .. }
            | Instruction::Lw { a, .. }
            | Instruction::Jalr { a, .. } => Some(*a),
            _ => None,
        }
    }

    /// Whether executing the instruction stages a memory write
    pub fn is_store(&self) -> bool {
        matches!(self, Instruction::Sw { .. })
    }

    /// Whether the instruction may redirect control flow
    pub fn is_control_flow(&self) -> bool {
        matches!(
            self,
            Instruction::Beq { .. } | Instruction::Jalr { .. } | Instruction::Irq { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mnemonics() {
        let add = Instruction::Add { a: Register::R1, b: Register::R2, c: Register::R3 };
        assert_eq!(add.mnemonic(), "add");
        assert_eq!(Instruction::Irq { kind: IrqKind::Yield }.mnemonic(), "irq");
        assert_eq!(Instruction::Invalid { raw: 0xFFFF }.mnemonic(), "<invalid>");
        assert_eq!(Instruction::Jalr { a: Register::R0, b: Register::R1 }.mnemonic(), "jalr");
    }

    #[test]
    fn test_opcode_of_invalid_is_seven() {
        assert_eq!(Instruction::Invalid { raw: 0xE002 }.opcode(), Opcode::Jalr);
    }

    #[test]
    fn test_destination() {
        let sw = Instruction::Sw { a: Register::R1, b: Register::R2, imm: 0 };
        assert_eq!(sw.destination(), None);
        assert!(sw.is_store());

        let lw = Instruction::Lw { a: Register::R3, b: Register::R0, imm: 4 };
        assert_eq!(lw.destination(), Some(Register::R3));
        assert!(!lw.is_store());
    }

    #[test]
    fn test_control_flow() {
        assert!(Instruction::Beq { a: Register::R0, b: Register::R0, imm: -1 }.is_control_flow());
        assert!(Instruction::Irq { kind: IrqKind::Success }.is_control_flow());
        assert!(!Instruction::Lui { a: Register::R1, imm: 0x40 }.is_control_flow());
    }
}
