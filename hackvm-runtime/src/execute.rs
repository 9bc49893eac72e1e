//! Instruction semantics
//!
//! Executes the raw word rather than a decoded [`Instruction`]: opcode 7
//! runs as `jalr` whenever bit 0 is clear, even when the decoder would call
//! the word invalid.
//!
//! [`Instruction`]: hackvm_spec::Instruction

use crate::memory::Memory;
use crate::state::{PendingWrite, RegisterFile};
use hackvm_spec::encoding::{
    extract_a, extract_b, extract_c, extract_irq_type, extract_lui_imm, sign_extend_imm7,
    IRQ_FLAG,
};
use hackvm_spec::{IrqKind, Opcode, Register};
use tracing::warn;

/// Side effects of one instruction beyond register writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub next_pc: u16,
    pub write: Option<PendingWrite>,
    pub irq: Option<IrqKind>,
}

impl Outcome {
    fn next(pc: u16) -> Self {
        Self::jump(pc.wrapping_add(1))
    }

    fn jump(target: u16) -> Self {
        Self {
            next_pc: target,
            write: None,
            irq: None,
        }
    }
}

/// Execute single instruction word at `pc`
///
/// Register results land in `regs` immediately; stores are returned in
/// the outcome for the caller to stage.
pub fn execute(word: u16, pc: u16, regs: &mut RegisterFile, memory: &Memory) -> Outcome {
    let a = Register::from_field(extract_a(word));
    let b = Register::from_field(extract_b(word));
    let c = Register::from_field(extract_c(word));
    let imm = sign_extend_imm7(word);

    match Opcode::from_word(word) {
        Opcode::Add => {
            regs.write(a, regs.read(b).wrapping_add(regs.read(c)));
            Outcome::next(pc)
        }
        Opcode::Addi => {
            regs.write(a, regs.read(b).wrapping_add(imm));
            Outcome::next(pc)
        }
        Opcode::Nand => {
            regs.write(a, !(regs.read(b) & regs.read(c)));
            Outcome::next(pc)
        }
        Opcode::Lui => {
            regs.write(a, extract_lui_imm(word));
            Outcome::next(pc)
        }
        Opcode::Sw => {
            let write = PendingWrite {
                address: regs.read(b).wrapping_add(imm),
                value: regs.read(a),
            };
            Outcome {
                write: Some(write),
                ..Outcome::next(pc)
            }
        }
        Opcode::Lw => {
            let address = regs.read(b).wrapping_add(imm);
            regs.write(a, memory.load_word(address));
            Outcome::next(pc)
        }
        Opcode::Beq => {
            if regs.read(a) == regs.read(b) {
                Outcome::jump(pc.wrapping_add(1).wrapping_add(imm))
            } else {
                Outcome::next(pc)
            }
        }
        Opcode::Jalr if word & IRQ_FLAG == 0 => {
            // Target is read before the link so `jalr r1, r1` jumps to the old r1
            let target = regs.read(b);
            regs.write(a, pc.wrapping_add(1));
            Outcome::jump(target)
        }
        Opcode::Jalr => {
            let code = extract_irq_type(word);
            let irq = IrqKind::from_code(code);
            if irq.is_none() {
                warn!(pc, word, code, "ignoring unknown irq type");
            }
            Outcome {
                irq,
                ..Outcome::next(pc)
            }
        }
    }
}
