//! Macro assembler
//!
//! Builds a binary instruction stream from typed operations. Besides the
//! base instruction set it provides the usual pseudo-ops (`movi`, `nop`,
//! `hlt`, `data`, `lea`, `jmp`, `farjmp`) and labels.
//!
//! ## Labels
//!
//! Binding a label records `code_offset + words emitted so far`. A use of a
//! label that is already bound is encoded on the spot. A use of a pending
//! label reserves the exact byte window the final encoding needs and records
//! a [`Fixup`]; [`Assembler::finish`] resolves every fixup in a second pass
//! once all labels are known, so forward and backward references end up in
//! the same bytes.

use crate::encoder::{check_imm16, check_imm7, encode};
use crate::error::{AssemblerError, Result};
use hackvm_spec::encoding::LUI_LOW_MASK;
use hackvm_spec::{Instruction, IrqKind, Register};
use std::collections::HashMap;
use tracing::trace;

/// Handle to a label owned by an [`Assembler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(usize);

#[derive(Debug, Clone)]
struct LabelSlot {
    name: Option<String>,
    address: Option<u16>,
}

/// How a pending label use must be encoded once the label is bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixupKind {
    /// `beq a, b, delta` (one word)
    Branch { a: Register, b: Register },
    /// `movi reg, address` (two words)
    Lea { reg: Register },
    /// `movi reg, address` + `jalr r0, reg` (three words)
    FarJump { reg: Register },
}

impl FixupKind {
    /// Size of the reserved window in bytes
    pub const fn size(self) -> usize {
        match self {
            FixupKind::Branch { .. } => 2,
            FixupKind::Lea { .. } => 4,
            FixupKind::FarJump { .. } => 6,
        }
    }
}

/// Deferred label use: a reserved byte window to be filled in `finish`
#[derive(Debug, Clone, Copy)]
pub struct Fixup {
    /// Byte offset of the window in the output buffer
    pub offset: usize,
    /// Address of the first word of the window
    pub site: u16,
    pub label: Label,
    pub kind: FixupKind,
}

/// hackvm macro assembler
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    buffer: Vec<u8>,
    labels: Vec<LabelSlot>,
    names: HashMap<String, Label>,
    fixups: Vec<Fixup>,
    code_offset: u16,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the word address added to subsequently bound labels
    pub fn code_offset(&mut self, offset: u16) {
        self.code_offset = offset;
    }

    /// Number of bytes emitted so far
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Address the next emitted word will be assigned
    pub fn position(&self) -> u16 {
        self.code_offset.wrapping_add((self.buffer.len() >> 1) as u16)
    }

    // ========================================================================
    // Labels
    // ========================================================================

    /// Create a new pending anonymous label
    pub fn label(&mut self) -> Label {
        self.new_label(None)
    }

    /// Look up a label by name, creating it if needed
    pub fn named_label(&mut self, name: &str) -> Label {
        if let Some(label) = self.names.get(name) {
            return *label;
        }
        let label = self.new_label(Some(name.to_string()));
        self.names.insert(name.to_string(), label);
        label
    }

    /// Bind `label` to the current position
    pub fn bind(&mut self, label: Label) -> Result<()> {
        if self.address_of(label).is_some() {
            return Err(AssemblerError::LabelRebound(self.label_name(label)));
        }
        let address = self.position();
        self.labels[label.0].address = Some(address);
        trace!(label = %self.label_name(label), address, "bind");
        Ok(())
    }

    /// Create a label bound to the current position
    pub fn bind_new(&mut self) -> Label {
        let label = self.new_label(None);
        self.labels[label.0].address = Some(self.position());
        label
    }

    /// Bind the label called `name` to the current position
    pub fn bind_named(&mut self, name: &str) -> Result<Label> {
        let label = self.named_label(name);
        self.bind(label)?;
        Ok(label)
    }

    /// Address of a bound label
    pub fn address_of(&self, label: Label) -> Option<u16> {
        self.labels.get(label.0).and_then(|slot| slot.address)
    }

    fn new_label(&mut self, name: Option<String>) -> Label {
        self.labels.push(LabelSlot { name, address: None });
        Label(self.labels.len() - 1)
    }

    fn label_name(&self, label: Label) -> String {
        match &self.labels[label.0].name {
            Some(name) => format!("\"{}\"", name),
            None => format!("<anonymous #{}>", label.0),
        }
    }

    // ========================================================================
    // Base instructions
    // ========================================================================

    /// Encode and append one instruction
    pub fn emit(&mut self, instr: Instruction) -> Result<()> {
        let word = encode(&instr)?;
        self.buffer.extend_from_slice(&word.to_be_bytes());
        Ok(())
    }

    pub fn add(&mut self, a: Register, b: Register, c: Register) -> Result<()> {
        self.emit(Instruction::Add { a, b, c })
    }

    pub fn addi(&mut self, a: Register, b: Register, imm: i32) -> Result<()> {
        self.emit(Instruction::Addi { a, b, imm })
    }

    pub fn nand(&mut self, a: Register, b: Register, c: Register) -> Result<()> {
        self.emit(Instruction::Nand { a, b, c })
    }

    pub fn lui(&mut self, a: Register, imm: u32) -> Result<()> {
        let imm = check_imm16("lui", imm)?;
        if imm & LUI_LOW_MASK != 0 {
            return Err(AssemblerError::MisalignedLui(imm as u32));
        }
        self.emit(Instruction::Lui { a, imm })
    }

    pub fn sw(&mut self, a: Register, b: Register, imm: i32) -> Result<()> {
        self.emit(Instruction::Sw { a, b, imm })
    }

    pub fn lw(&mut self, a: Register, b: Register, imm: i32) -> Result<()> {
        self.emit(Instruction::Lw { a, b, imm })
    }

    pub fn beq(&mut self, a: Register, b: Register, imm: i32) -> Result<()> {
        self.emit(Instruction::Beq { a, b, imm })
    }

    pub fn jalr(&mut self, a: Register, b: Register) -> Result<()> {
        self.emit(Instruction::Jalr { a, b })
    }

    pub fn irq(&mut self, kind: IrqKind) -> Result<()> {
        self.emit(Instruction::Irq { kind })
    }

    // ========================================================================
    // Pseudo-ops
    // ========================================================================

    /// Load a 16-bit immediate: `lui` (upper 10 bits) + `addi` (lower 6 bits)
    pub fn movi(&mut self, reg: Register, imm: u32) -> Result<()> {
        let imm = check_imm16("movi", imm)? as u32;
        self.lui(reg, imm & !(LUI_LOW_MASK as u32))?;
        self.addi(reg, reg, (imm & LUI_LOW_MASK as u32) as i32)
    }

    /// `add r0, r0, r0`
    pub fn nop(&mut self) -> Result<()> {
        self.add(Register::R0, Register::R0, Register::R0)
    }

    /// `beq r0, r0, -1`: spin forever without reaching a decision
    pub fn hlt(&mut self) -> Result<()> {
        self.beq(Register::R0, Register::R0, -1)
    }

    /// Emit a raw data word, little-endian as `lw` reads it
    pub fn data(&mut self, word: u32) -> Result<()> {
        let word = check_imm16("data", word)?;
        self.buffer.extend_from_slice(&word.to_le_bytes());
        Ok(())
    }

    /// Load the address of `label` into `reg`
    pub fn lea(&mut self, reg: Register, label: Label) -> Result<()> {
        self.use_label(label, FixupKind::Lea { reg })
    }

    /// Relative jump to `label` (within -64..=63 words)
    pub fn jmp(&mut self, label: Label) -> Result<()> {
        self.beq_label(Register::R0, Register::R0, label)
    }

    /// `beq` whose target is a label
    pub fn beq_label(&mut self, a: Register, b: Register, label: Label) -> Result<()> {
        self.use_label(label, FixupKind::Branch { a, b })
    }

    /// Absolute jump through `reg`, for targets beyond the branch range
    pub fn farjmp(&mut self, reg: Register, label: Label) -> Result<()> {
        self.use_label(label, FixupKind::FarJump { reg })
    }

    fn use_label(&mut self, label: Label, kind: FixupKind) -> Result<()> {
        let site = self.position();
        let offset = self.buffer.len();

        self.buffer.resize(offset + kind.size(), 0);
        let fixup = Fixup { offset, site, label, kind };

        match self.address_of(label) {
            Some(address) => self.patch(&fixup, address).map_err(|err| {
                self.buffer.truncate(offset);
                err
            }),
            None => {
                self.fixups.push(fixup);
                Ok(())
            }
        }
    }

    /// Encode `fixup` against the resolved `address` into its window
    fn patch(&mut self, fixup: &Fixup, address: u16) -> Result<()> {
        let words = match fixup.kind {
            FixupKind::Branch { a, b } => {
                let delta = address as i64 - (fixup.site as i64 + 1);
                let imm = check_imm7("beq", delta as i32).map_err(|_| {
                    AssemblerError::BranchOutOfRange {
                        label: self.label_name(fixup.label),
                        delta,
                    }
                })?;
                vec![encode(&Instruction::Beq { a, b, imm })?]
            }
            FixupKind::Lea { reg } => movi_words(reg, address)?,
            FixupKind::FarJump { reg } => {
                let mut words = movi_words(reg, address)?;
                words.push(encode(&Instruction::Jalr { a: Register::R0, b: reg })?);
                words
            }
        };

        let window = &mut self.buffer[fixup.offset..fixup.offset + fixup.kind.size()];
        for (chunk, word) in window.chunks_exact_mut(2).zip(words) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        Ok(())
    }

    /// Resolve pending label uses and return the rendered byte stream
    pub fn finish(mut self) -> Result<Vec<u8>> {
        if let Some(index) = self.labels.iter().position(|slot| slot.address.is_none()) {
            return Err(AssemblerError::UnboundLabel(self.label_name(Label(index))));
        }

        for fixup in std::mem::take(&mut self.fixups) {
            let address = self
                .address_of(fixup.label)
                .ok_or_else(|| AssemblerError::UnboundLabel(self.label_name(fixup.label)))?;
            self.patch(&fixup, address)?;
        }

        Ok(self.buffer)
    }
}

fn movi_words(reg: Register, imm: u16) -> Result<Vec<u16>> {
    Ok(vec![
        encode(&Instruction::Lui { a: reg, imm: imm & !LUI_LOW_MASK })?,
        encode(&Instruction::Addi { a: reg, b: reg, imm: (imm & LUI_LOW_MASK) as i32 })?,
    ])
}
