//! Main assembler logic
//!
//! Drives the [`Assembler`] from parsed statements. This is where operand
//! counts and operand kinds are checked against each mnemonic.

use crate::error::{AssemblerError, Result};
use crate::masm::{Assembler, Label};
use crate::parser::{parse, Operand, Statement, StatementKind};
use hackvm_spec::{IrqKind, Register};
use std::path::Path;
use tracing::debug;

/// Mnemonics accepted by the text front end
pub const MNEMONICS: &[&str] = &[
    "add", "addi", "nand", "lui", "sw", "lw", "beq", "jalr", "irq", "movi", "nop", "hlt", "data",
    "lea", "jmp", "farjmp",
];

/// Assemble source code into a byte stream
pub fn assemble(source: &str) -> Result<Vec<u8>> {
    let statements = parse(source)?;
    assemble_statements(&statements)
}

/// Assemble a source file from disk
pub fn assemble_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let source = std::fs::read_to_string(path)?;
    assemble(&source)
}

/// Assemble an already parsed statement list
pub fn assemble_statements(statements: &[Statement]) -> Result<Vec<u8>> {
    let mut asm = Assembler::new();

    for statement in statements {
        apply(&mut asm, statement).map_err(|err| err.at_line(statement.line))?;
    }

    let bytes = asm.finish()?;
    debug!(statements = statements.len(), bytes = bytes.len(), "assembled");
    Ok(bytes)
}

fn apply(asm: &mut Assembler, statement: &Statement) -> Result<()> {
    match &statement.kind {
        StatementKind::Label(name) => asm.bind_named(name).map(|_| ()),
        StatementKind::Directive { name, operands } => directive(asm, name, operands),
        StatementKind::Instruction { mnemonic, operands } => {
            instruction(asm, mnemonic, operands)
        }
    }
}

fn directive(asm: &mut Assembler, name: &str, operands: &[Operand]) -> Result<()> {
    match name {
        "offset" => {
            let ops = Operands::new(name, operands, 1)?;
            let offset = ops.imm_u16(0)?;
            asm.code_offset(offset);
            Ok(())
        }
        _ => Err(AssemblerError::InvalidDirective(format!(".{}", name))),
    }
}

fn instruction(asm: &mut Assembler, mnemonic: &str, operands: &[Operand]) -> Result<()> {
    let arity = match mnemonic {
        "add" | "nand" | "addi" | "sw" | "lw" | "beq" => 3,
        "lui" | "jalr" | "movi" | "lea" | "farjmp" => 2,
        "irq" | "data" | "jmp" => 1,
        "nop" | "hlt" => 0,
        _ => return Err(AssemblerError::UnknownInstruction(mnemonic.to_string())),
    };
    let ops = Operands::new(mnemonic, operands, arity)?;

    match mnemonic {
        "add" => asm.add(ops.reg(0)?, ops.reg(1)?, ops.reg(2)?),
        "nand" => asm.nand(ops.reg(0)?, ops.reg(1)?, ops.reg(2)?),
        "addi" => asm.addi(ops.reg(0)?, ops.reg(1)?, ops.imm_i32(2)?),
        "sw" => asm.sw(ops.reg(0)?, ops.reg(1)?, ops.imm_i32(2)?),
        "lw" => asm.lw(ops.reg(0)?, ops.reg(1)?, ops.imm_i32(2)?),
        "beq" => {
            let (a, b) = (ops.reg(0)?, ops.reg(1)?);
            match &operands[2] {
                Operand::Symbol(name) => {
                    let label = asm.named_label(name);
                    asm.beq_label(a, b, label)
                }
                _ => asm.beq(a, b, ops.imm_i32(2)?),
            }
        }
        "lui" => asm.lui(ops.reg(0)?, ops.imm_u32(1)?),
        "jalr" => asm.jalr(ops.reg(0)?, ops.reg(1)?),
        "irq" => asm.irq(ops.irq(0)?),
        "movi" => asm.movi(ops.reg(0)?, ops.imm_u32(1)?),
        "nop" => asm.nop(),
        "hlt" => asm.hlt(),
        "data" => asm.data(ops.imm_u32(0)?),
        "lea" => {
            let reg = ops.reg(0)?;
            let label = ops.label(asm, 1)?;
            asm.lea(reg, label)
        }
        "jmp" => {
            let label = ops.label(asm, 0)?;
            asm.jmp(label)
        }
        "farjmp" => {
            let reg = ops.reg(0)?;
            let label = ops.label(asm, 1)?;
            asm.farjmp(reg, label)
        }
        _ => Err(AssemblerError::UnknownInstruction(mnemonic.to_string())),
    }
}

/// Typed access to an operand list that has passed the arity check
struct Operands<'a> {
    mnemonic: &'a str,
    operands: &'a [Operand],
}

impl<'a> Operands<'a> {
    fn new(mnemonic: &'a str, operands: &'a [Operand], expected: usize) -> Result<Self> {
        if operands.len() != expected {
            return Err(AssemblerError::ArgumentCount {
                mnemonic: mnemonic.to_string(),
                expected,
                found: operands.len(),
            });
        }
        Ok(Self { mnemonic, operands })
    }

    fn mismatch(&self, index: usize, expected: &'static str) -> AssemblerError {
        AssemblerError::OperandType {
            mnemonic: self.mnemonic.to_string(),
            index: index + 1,
            expected,
        }
    }

    fn reg(&self, index: usize) -> Result<Register> {
        match &self.operands[index] {
            Operand::Register(reg) => Ok(*reg),
            Operand::Symbol(name) => Err(AssemblerError::UnknownRegister(name.clone())),
            Operand::Immediate(_) => Err(self.mismatch(index, "register")),
        }
    }

    fn imm(&self, index: usize) -> Result<i64> {
        match &self.operands[index] {
            Operand::Immediate(value) => Ok(*value),
            _ => Err(self.mismatch(index, "immediate")),
        }
    }

    fn imm_i32(&self, index: usize) -> Result<i32> {
        let value = self.imm(index)?;
        i32::try_from(value).map_err(|_| self.out_of_range(value, i32::MIN as i64, i32::MAX as i64))
    }

    fn imm_u32(&self, index: usize) -> Result<u32> {
        let value = self.imm(index)?;
        u32::try_from(value).map_err(|_| self.out_of_range(value, 0, u16::MAX as i64))
    }

    fn imm_u16(&self, index: usize) -> Result<u16> {
        let value = self.imm(index)?;
        u16::try_from(value).map_err(|_| self.out_of_range(value, 0, u16::MAX as i64))
    }

    fn out_of_range(&self, value: i64, min: i64, max: i64) -> AssemblerError {
        AssemblerError::ImmediateOutOfRange {
            mnemonic: self.mnemonic.to_string(),
            value,
            min,
            max,
        }
    }

    fn irq(&self, index: usize) -> Result<IrqKind> {
        match &self.operands[index] {
            Operand::Symbol(name) => Ok(name.parse::<IrqKind>()?),
            _ => Err(self.mismatch(index, "irq type (success or yield)")),
        }
    }

    fn label(&self, asm: &mut Assembler, index: usize) -> Result<Label> {
        match &self.operands[index] {
            Operand::Symbol(name) => Ok(asm.named_label(name)),
            _ => Err(self.mismatch(index, "label")),
        }
    }
}
