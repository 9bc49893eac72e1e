//! Instruction decoder

use hackvm_spec::encoding::{
    extract_a, extract_b, extract_c, extract_imm7_signed, extract_irq_type, extract_lui_imm,
    IMM7_MASK, IRQ_FLAG, IRQ_RESERVED_MASK, RRR_RESERVED_MASK,
};
use hackvm_spec::{Instruction, IrqKind, Opcode, Register};

/// Decode a 16-bit instruction word
///
/// Total: words with reserved bits set come back as `Invalid { raw }`, so
/// re-encoding any result reproduces the original word.
pub fn decode(word: u16) -> Instruction {
    let a = Register::from_field(extract_a(word));
    let b = Register::from_field(extract_b(word));

    match Opcode::from_word(word) {
        Opcode::Add | Opcode::Nand if word & RRR_RESERVED_MASK != 0 => {
            Instruction::Invalid { raw: word }
        }
        Opcode::Add => Instruction::Add { a, b, c: Register::from_field(extract_c(word)) },
        Opcode::Addi => Instruction::Addi { a, b, imm: extract_imm7_signed(word) },
        Opcode::Nand => Instruction::Nand { a, b, c: Register::from_field(extract_c(word)) },
        Opcode::Lui => Instruction::Lui { a, imm: extract_lui_imm(word) },
        Opcode::Sw => Instruction::Sw { a, b, imm: extract_imm7_signed(word) },
        Opcode::Lw => Instruction::Lw { a, b, imm: extract_imm7_signed(word) },
        Opcode::Beq => Instruction::Beq { a, b, imm: extract_imm7_signed(word) },
        Opcode::Jalr => decode_system(word, a, b),
    }
}

/// Opcode 7: `jalr` when the low 7 bits are clear, `irq` when bit 0 is set
/// and every other non-type bit is clear, `Invalid` otherwise
fn decode_system(word: u16, a: Register, b: Register) -> Instruction {
    if word & IRQ_FLAG == 0 {
        if word & IMM7_MASK == 0 {
            return Instruction::Jalr { a, b };
        }
        return Instruction::Invalid { raw: word };
    }

    if word & IRQ_RESERVED_MASK != 0 {
        return Instruction::Invalid { raw: word };
    }

    match IrqKind::from_code(extract_irq_type(word)) {
        Some(kind) => Instruction::Irq { kind },
        None => Instruction::Invalid { raw: word },
    }
}
