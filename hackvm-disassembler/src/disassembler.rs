//! Byte-stream disassembly
//!
//! Code is a stream of big-endian 16-bit words. A trailing odd byte is not
//! a word and is ignored.

use crate::decoder::decode;
use crate::error::Result;
use crate::formatter::format;
use hackvm_spec::Instruction;
use std::path::Path;

/// Lazy view over a code buffer
///
/// Iterating never allocates and can be restarted any number of times.
#[derive(Debug, Clone, Copy)]
pub struct Disassembler<'a> {
    bytes: &'a [u8],
}

impl<'a> Disassembler<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Number of whole words in the buffer
    pub fn len(&self) -> usize {
        self.bytes.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decoded instructions in order
    pub fn iter(&self) -> Instructions<'a> {
        Instructions {
            words: self.bytes.chunks_exact(2),
        }
    }

    /// Raw words alongside their decoding
    pub fn words(&self) -> impl Iterator<Item = (u16, Instruction)> + 'a {
        self.bytes.chunks_exact(2).map(|pair| {
            let word = u16::from_be_bytes([pair[0], pair[1]]);
            (word, decode(word))
        })
    }
}

impl<'a> IntoIterator for &Disassembler<'a> {
    type Item = Instruction;
    type IntoIter = Instructions<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`Disassembler::iter`]
#[derive(Debug, Clone)]
pub struct Instructions<'a> {
    words: std::slice::ChunksExact<'a, u8>,
}

impl Iterator for Instructions<'_> {
    type Item = Instruction;

    fn next(&mut self) -> Option<Self::Item> {
        self.words
            .next()
            .map(|pair| decode(u16::from_be_bytes([pair[0], pair[1]])))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.words.size_hint()
    }
}

impl ExactSizeIterator for Instructions<'_> {}

/// Render a code buffer as an address/word/instruction listing
///
/// `base` is the word address of the first instruction.
pub fn disassemble(bytes: &[u8], base: u16) -> String {
    let disasm = Disassembler::new(bytes);
    let mut output = String::new();

    for (index, (word, instr)) in disasm.words().enumerate() {
        let address = base.wrapping_add(index as u16);
        output.push_str(&format!("{:04x}:  {:04x}  {}\n", address, word, format(&instr)));
    }

    if bytes.len() % 2 != 0 {
        output.push_str(&format!("; ignored trailing byte {:#04x}\n", bytes[bytes.len() - 1]));
    }

    output
}

/// Read a code file and render it with [`disassemble`]
pub fn disassemble_file(path: impl AsRef<Path>, base: u16) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(disassemble(&bytes, base))
}
