//! Integration tests for the hackvm assembler
//!
//! Tests the complete assembly workflow including:
//! - Macro-assembler label resolution and pseudo-ops
//! - Text assembly through the lexer and parser
//! - Agreement with the disassembler

use hackvm_assembler::{assemble, encode_all, Assembler};
use hackvm_disassembler::Disassembler;
use hackvm_spec::{Instruction, IrqKind, Register};

fn check(asm: Assembler, expected: &[Instruction]) {
    let bytes = asm.finish().unwrap();
    let decoded: Vec<_> = Disassembler::new(&bytes).iter().collect();
    assert_eq!(decoded, expected);
}

const NOP: Instruction = Instruction::Add { a: Register::R0, b: Register::R0, c: Register::R0 };

fn beq0(imm: i32) -> Instruction {
    Instruction::Beq { a: Register::R0, b: Register::R0, imm }
}

fn far_jump_to(address: u16, low: i32) -> Vec<Instruction> {
    vec![
        Instruction::Lui { a: Register::R1, imm: address },
        Instruction::Addi { a: Register::R1, b: Register::R1, imm: low },
        Instruction::Jalr { a: Register::R0, b: Register::R1 },
        NOP,
    ]
}

// ============================================================================
// Macro Assembler
// ============================================================================

#[test]
fn test_backward_jmp() {
    let mut asm = Assembler::new();
    let label = asm.bind_new();
    asm.jmp(label).unwrap();
    check(asm, &[beq0(-1)]);
}

#[test]
fn test_forward_jmp() {
    let mut asm = Assembler::new();
    let label = asm.label();
    asm.jmp(label).unwrap();
    asm.bind(label).unwrap();
    asm.nop().unwrap();
    check(asm, &[beq0(0), NOP]);
}

#[test]
fn test_farjmp() {
    let mut asm = Assembler::new();
    let label = asm.label();
    asm.farjmp(Register::R1, label).unwrap();
    asm.nop().unwrap();
    asm.bind(label).unwrap();
    check(asm, &far_jump_to(0, 4));
}

#[test]
fn test_code_offset_applies_to_later_binds() {
    let mut asm = Assembler::new();
    let label = asm.label();
    asm.farjmp(Register::R1, label).unwrap();
    asm.nop().unwrap();
    asm.code_offset(0x1000);
    asm.bind(label).unwrap();
    check(asm, &far_jump_to(0x1000, 4));
}

#[test]
fn test_movi() {
    let mut asm = Assembler::new();
    asm.movi(Register::R1, 0x1358).unwrap();
    check(
        asm,
        &[
            Instruction::Lui { a: Register::R1, imm: 0x1340 },
            Instruction::Addi { a: Register::R1, b: Register::R1, imm: 0x18 },
        ],
    );
}

#[test]
fn test_hlt() {
    let mut asm = Assembler::new();
    asm.hlt().unwrap();
    check(asm, &[beq0(-1)]);
}

#[test]
fn test_data_word_decodes_invalid() {
    let mut asm = Assembler::new();
    asm.data(0xFFFF).unwrap();
    check(asm, &[Instruction::Invalid { raw: 0xFFFF }]);
}

#[test]
fn test_backward_lea() {
    let mut asm = Assembler::new();
    asm.code_offset(0x1001);
    let label = asm.bind_named("lbl").unwrap();
    asm.lea(Register::R1, label).unwrap();
    check(
        asm,
        &[
            Instruction::Lui { a: Register::R1, imm: 0x1000 },
            Instruction::Addi { a: Register::R1, b: Register::R1, imm: 1 },
        ],
    );
}

#[test]
fn test_forward_lea() {
    let mut asm = Assembler::new();
    asm.code_offset(0x1000);
    let label = asm.named_label("lbl");
    asm.lea(Register::R1, label).unwrap();
    asm.bind(label).unwrap();
    check(
        asm,
        &[
            Instruction::Lui { a: Register::R1, imm: 0x1000 },
            Instruction::Addi { a: Register::R1, b: Register::R1, imm: 2 },
        ],
    );
}

#[test]
fn test_backward_beq() {
    let mut asm = Assembler::new();
    let label = asm.bind_new();
    asm.beq_label(Register::R0, Register::R0, label).unwrap();
    check(asm, &[beq0(-1)]);
}

#[test]
fn test_forward_beq() {
    let mut asm = Assembler::new();
    let label = asm.label();
    asm.beq_label(Register::R0, Register::R0, label).unwrap();
    asm.bind(label).unwrap();
    check(asm, &[beq0(0)]);
}

#[test]
fn test_forward_beq_with_code_offset() {
    let mut asm = Assembler::new();
    let label = asm.label();
    asm.code_offset(0x1000);
    asm.beq_label(Register::R0, Register::R0, label).unwrap();
    asm.bind(label).unwrap();
    check(asm, &[beq0(0)]);
}

#[test]
fn test_named_jmp() {
    let mut asm = Assembler::new();
    let label = asm.named_label("lbl");
    asm.jmp(label).unwrap();
    asm.bind_named("lbl").unwrap();
    asm.nop().unwrap();
    check(asm, &[beq0(0), NOP]);
}

#[test]
fn test_named_farjmp() {
    let mut asm = Assembler::new();
    let label = asm.named_label("lbl");
    asm.farjmp(Register::R1, label).unwrap();
    asm.nop().unwrap();
    asm.bind_named("lbl").unwrap();
    check(asm, &far_jump_to(0, 4));
}

#[test]
fn test_branch_limits() {
    // 63 words forward is the furthest reachable target
    let mut asm = Assembler::new();
    let label = asm.label();
    asm.jmp(label).unwrap();
    for _ in 0..63 {
        asm.nop().unwrap();
    }
    asm.bind(label).unwrap();
    let bytes = asm.finish().unwrap();
    assert_eq!(Disassembler::new(&bytes).iter().next(), Some(beq0(63)));

    // 64 words back is the furthest reachable source
    let mut asm = Assembler::new();
    let label = asm.bind_new();
    for _ in 0..63 {
        asm.nop().unwrap();
    }
    asm.jmp(label).unwrap();
    let bytes = asm.finish().unwrap();
    assert_eq!(Disassembler::new(&bytes).iter().last(), Some(beq0(-64)));
}

// ============================================================================
// Text Assembly
// ============================================================================

#[test]
fn test_text_matches_macro_assembler() {
    let source = r#"
        .offset 0x1000
    start:
        irq yield
        lea r2, value
        lw r1, r2, 0
        beq r1, r0, start
        farjmp r3, done
    value:
        .offset 0x1000
    done:
        irq success
    "#;

    let mut asm = Assembler::new();
    asm.code_offset(0x1000);
    let start = asm.bind_named("start").unwrap();
    asm.irq(IrqKind::Yield).unwrap();
    let value = asm.named_label("value");
    asm.lea(Register::R2, value).unwrap();
    asm.lw(Register::R1, Register::R2, 0).unwrap();
    asm.beq_label(Register::R1, Register::R0, start).unwrap();
    let done = asm.named_label("done");
    asm.farjmp(Register::R3, done).unwrap();
    asm.bind(value).unwrap();
    asm.code_offset(0x1000);
    asm.bind(done).unwrap();
    asm.irq(IrqKind::Success).unwrap();

    assert_eq!(assemble(source).unwrap(), asm.finish().unwrap());
}

#[test]
fn test_text_immediates() {
    let bytes = assemble("addi r1, r0, -0x40\naddi r1, r0, 0b111111\nmovi r2, 65535").unwrap();
    let decoded: Vec<_> = Disassembler::new(&bytes).iter().collect();
    assert_eq!(
        decoded,
        vec![
            Instruction::Addi { a: Register::R1, b: Register::R0, imm: -64 },
            Instruction::Addi { a: Register::R1, b: Register::R0, imm: 63 },
            Instruction::Lui { a: Register::R2, imm: 0xFFC0 },
            Instruction::Addi { a: Register::R2, b: Register::R2, imm: 0x3F },
        ]
    );
}

#[test]
fn test_text_data_and_comments() {
    let source = "data 0x1234 ; little-endian\n# whole-line comment\nnop";
    assert_eq!(assemble(source).unwrap(), vec![0x34, 0x12, 0x00, 0x00]);
}

#[test]
fn test_empty_program() {
    assert!(assemble("").unwrap().is_empty());
    assert!(assemble("; nothing\n\n").unwrap().is_empty());
}

#[test]
fn test_encode_all_is_big_endian() {
    let bytes = encode_all(&[Instruction::Irq { kind: IrqKind::Success }, beq0(-1)]).unwrap();
    assert_eq!(bytes, vec![0xE0, 0x01, 0xC0, 0x7F]);
}
