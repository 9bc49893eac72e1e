//! # Instruction Encoding Constants and Helpers
//!
//! ## Instruction Format (16-bit)
//!
//! ```text
//! RRR:  [opcode:3][a:3][b:3][0:4][c:3]     add, nand
//! RRI:  [opcode:3][a:3][b:3][imm:7]        addi, sw, lw, beq
//! RI:   [opcode:3][a:3][imm:10]            lui (imm16 >> 6)
//! JALR: [111][a:3][b:3][0000000]
//! IRQ:  [111][000][type:3][000000][1]
//! ```
//!
//! Instruction words are stored big-endian. Data words read and written by
//! `lw`/`sw` are little-endian.

use crate::{IrqKind, Opcode};

// ============================================================================
// Bit Position Constants
// ============================================================================

/// Opcode field: bits 13-15
pub const OPCODE_SHIFT: u32 = 13;

/// Register `a` field: bits 10-12
pub const REG_A_SHIFT: u32 = 10;

/// Register `b` field: bits 7-9
pub const REG_B_SHIFT: u32 = 7;

/// Irq type field: bits 7-9
pub const IRQ_TYPE_SHIFT: u32 = 7;

/// Upper-immediate shift: `lui` stores imm16 >> 6
pub const LUI_SHIFT: u32 = 6;

// ============================================================================
// Field Masks
// ============================================================================

pub const OPCODE_MASK: u16 = 0x7;
pub const REGISTER_MASK: u16 = 0x7;
pub const IMM7_MASK: u16 = 0x7F;
pub const LUI_MASK: u16 = 0x3FF;

/// Low bits of a `lui` immediate that must be zero
pub const LUI_LOW_MASK: u16 = 0x3F;

/// Bits 3-6 of an `add`/`nand` word, always zero when well formed
pub const RRR_RESERVED_MASK: u16 = 0x0078;

/// Bit 0 of an opcode-7 word: set for `irq`, clear for `jalr`
pub const IRQ_FLAG: u16 = 0x1;

/// Bits that must be zero in a well-formed `irq` word besides the opcode
pub const IRQ_RESERVED_MASK: u16 = 0x1C7E;

pub const IMM7_MIN: i32 = -64;
pub const IMM7_MAX: i32 = 63;

// ============================================================================
// Field Extraction Functions
// ============================================================================

#[inline]
pub const fn extract_opcode(inst: u16) -> u16 {
    (inst >> OPCODE_SHIFT) & OPCODE_MASK
}

#[inline]
pub const fn extract_a(inst: u16) -> u16 {
    (inst >> REG_A_SHIFT) & REGISTER_MASK
}

#[inline]
pub const fn extract_b(inst: u16) -> u16 {
    (inst >> REG_B_SHIFT) & REGISTER_MASK
}

#[inline]
pub const fn extract_c(inst: u16) -> u16 {
    inst & REGISTER_MASK
}

/// Extract the 7-bit immediate with sign extension
#[inline]
pub const fn extract_imm7_signed(inst: u16) -> i32 {
    let imm = (inst & IMM7_MASK) as i32;
    if imm & 0x40 != 0 {
        imm - 0x80
    } else {
        imm
    }
}

/// Extract the full 16-bit value loaded by `lui`
#[inline]
pub const fn extract_lui_imm(inst: u16) -> u16 {
    (inst & LUI_MASK) << LUI_SHIFT
}

#[inline]
pub const fn extract_irq_type(inst: u16) -> u16 {
    (inst >> IRQ_TYPE_SHIFT) & REGISTER_MASK
}

#[inline]
pub const fn is_irq(inst: u16) -> bool {
    extract_opcode(inst) == Opcode::Jalr as u16 && inst & IRQ_FLAG != 0
}

/// Whether `inst` has a canonical decoding. Reserved bits must be clear, and
/// an opcode-7 word must be `jalr` or a known `irq` type.
pub const fn is_well_formed(inst: u16) -> bool {
    match extract_opcode(inst) {
        // add, nand
        0 | 2 => inst & RRR_RESERVED_MASK == 0,
        7 if inst & IRQ_FLAG == 0 => inst & IMM7_MASK == 0,
        7 => {
            inst & IRQ_RESERVED_MASK == 0 && IrqKind::from_code(extract_irq_type(inst)).is_some()
        }
        _ => true,
    }
}

/// Sign-extend a 7-bit immediate to a 16-bit two's complement word
#[inline]
pub const fn sign_extend_imm7(inst: u16) -> u16 {
    extract_imm7_signed(inst) as i16 as u16
}

// ============================================================================
// Instruction Encoding Functions
// ============================================================================
//
// Operands are masked to their field width; range checking is the caller's
// job (see the assembler's encoder).

#[inline]
pub const fn encode_rrr(opcode: Opcode, a: u16, b: u16, c: u16) -> u16 {
    ((opcode as u16) << OPCODE_SHIFT)
        | ((a & REGISTER_MASK) << REG_A_SHIFT)
        | ((b & REGISTER_MASK) << REG_B_SHIFT)
        | (c & REGISTER_MASK)
}

#[inline]
pub const fn encode_rri(opcode: Opcode, a: u16, b: u16, imm: i32) -> u16 {
    ((opcode as u16) << OPCODE_SHIFT)
        | ((a & REGISTER_MASK) << REG_A_SHIFT)
        | ((b & REGISTER_MASK) << REG_B_SHIFT)
        | ((imm as u16) & IMM7_MASK)
}

#[inline]
pub const fn encode_lui(a: u16, imm: u16) -> u16 {
    ((Opcode::Lui as u16) << OPCODE_SHIFT)
        | ((a & REGISTER_MASK) << REG_A_SHIFT)
        | ((imm >> LUI_SHIFT) & LUI_MASK)
}

#[inline]
pub const fn encode_jalr(a: u16, b: u16) -> u16 {
    ((Opcode::Jalr as u16) << OPCODE_SHIFT)
        | ((a & REGISTER_MASK) << REG_A_SHIFT)
        | ((b & REGISTER_MASK) << REG_B_SHIFT)
}

#[inline]
pub const fn encode_irq(kind: u16) -> u16 {
    ((Opcode::Jalr as u16) << OPCODE_SHIFT) | ((kind & REGISTER_MASK) << IRQ_TYPE_SHIFT) | IRQ_FLAG
}
