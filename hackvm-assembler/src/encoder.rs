//! Instruction encoding to 16-bit words
//!
//! Range checks happen here; the bit-packing itself lives in
//! `hackvm_spec::encoding`.

use crate::error::{AssemblerError, Result};
use hackvm_spec::encoding::{
    encode_irq, encode_jalr, encode_lui, encode_rri, encode_rrr, is_well_formed, IMM7_MAX, IMM7_MIN,
    LUI_LOW_MASK,
};
use hackvm_spec::{Instruction, Opcode, Register};

/// Encode instruction to a 16-bit word
pub fn encode(instr: &Instruction) -> Result<u16> {
    let word = match *instr {
        Instruction::Add { a, b, c } => encode_rrr(Opcode::Add, field(a), field(b), field(c)),
        Instruction::Nand { a, b, c } => encode_rrr(Opcode::Nand, field(a), field(b), field(c)),

        Instruction::Addi { a, b, imm } => {
            encode_rri(Opcode::Addi, field(a), field(b), check_imm7("addi", imm)?)
        }
        Instruction::Sw { a, b, imm } => {
            encode_rri(Opcode::Sw, field(a), field(b), check_imm7("sw", imm)?)
        }
        Instruction::Lw { a, b, imm } => {
            encode_rri(Opcode::Lw, field(a), field(b), check_imm7("lw", imm)?)
        }
        Instruction::Beq { a, b, imm } => {
            encode_rri(Opcode::Beq, field(a), field(b), check_imm7("beq", imm)?)
        }

        Instruction::Lui { a, imm } => {
            if imm & LUI_LOW_MASK != 0 {
                return Err(AssemblerError::MisalignedLui(imm as u32));
            }
            encode_lui(field(a), imm)
        }

        Instruction::Jalr { a, b } => encode_jalr(field(a), field(b)),
        Instruction::Irq { kind } => encode_irq(kind.code()),
        Instruction::Invalid { raw } => {
            if is_well_formed(raw) {
                return Err(AssemblerError::WellFormedRawWord(raw));
            }
            raw
        }
    };

    Ok(word)
}

/// Encode a sequence of instructions into a big-endian byte stream
pub fn encode_all(instrs: &[Instruction]) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(instrs.len() * 2);
    for instr in instrs {
        bytes.extend_from_slice(&encode(instr)?.to_be_bytes());
    }
    Ok(bytes)
}

/// Reject a signed immediate that does not fit 7 bits
pub fn check_imm7(mnemonic: &str, imm: i32) -> Result<i32> {
    if (IMM7_MIN..=IMM7_MAX).contains(&imm) {
        Ok(imm)
    } else {
        Err(AssemblerError::ImmediateOutOfRange {
            mnemonic: mnemonic.to_string(),
            value: imm as i64,
            min: IMM7_MIN as i64,
            max: IMM7_MAX as i64,
        })
    }
}

/// Reject an unsigned immediate that does not fit 16 bits
pub fn check_imm16(mnemonic: &str, imm: u32) -> Result<u16> {
    u16::try_from(imm).map_err(|_| AssemblerError::ImmediateOutOfRange {
        mnemonic: mnemonic.to_string(),
        value: imm as i64,
        min: 0,
        max: u16::MAX as i64,
    })
}

#[inline]
fn field(reg: Register) -> u16 {
    reg.index() as u16
}
