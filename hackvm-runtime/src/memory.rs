//! Shared memory
//!
//! One flat buffer of 0x10000 16-bit words. Instruction fetch reads words
//! big-endian; `lw`/`sw` access words little-endian. Every address wraps,
//! so no access can fall outside the buffer.

use crate::error::{Result, RuntimeError};
use hackvm_spec::{HASH_OFFSET, INPUT_OFFSET, MEMORY_SIZE, OUTPUT_OFFSET, REGION_BYTES};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed regions seeded before a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Hash of the previous transaction
    Hash,
    /// Locking program
    Output,
    /// Unlocking program
    Input,
}

impl Region {
    /// First word of the region
    pub const fn word_offset(self) -> u16 {
        match self {
            Region::Hash => HASH_OFFSET,
            Region::Output => OUTPUT_OFFSET,
            Region::Input => INPUT_OFFSET,
        }
    }

    pub const fn capacity(self) -> usize {
        REGION_BYTES
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Hash => write!(f, "hash"),
            Region::Output => write!(f, "output code"),
            Region::Input => write!(f, "input code"),
        }
    }
}

#[derive(Clone)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Memory {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    /// Zero the whole buffer
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Read an instruction word (big-endian) at a byte offset
    #[inline]
    pub fn fetch(&self, byte_offset: usize) -> u16 {
        let hi = self.bytes[byte_offset % MEMORY_SIZE];
        let lo = self.bytes[(byte_offset + 1) % MEMORY_SIZE];
        u16::from_be_bytes([hi, lo])
    }

    /// Read a data word (little-endian) at a word address
    #[inline]
    pub fn load_word(&self, address: u16) -> u16 {
        let offset = address as usize * 2;
        u16::from_le_bytes([self.bytes[offset], self.bytes[offset + 1]])
    }

    /// Write a data word (little-endian) at a word address
    #[inline]
    pub fn store_word(&mut self, address: u16, value: u16) {
        let offset = address as usize * 2;
        self.bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    /// Copy `data` verbatim to the start of `region`
    pub fn load_region(&mut self, region: Region, data: &[u8]) -> Result<()> {
        if data.len() > region.capacity() {
            return Err(RuntimeError::RegionOverflow {
                region,
                len: data.len(),
                capacity: region.capacity(),
            });
        }
        let start = region.word_offset() as usize * 2;
        self.bytes[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let used = self.bytes.iter().filter(|&&b| b != 0).count();
        f.debug_struct("Memory")
            .field("size", &self.bytes.len())
            .field("nonzero_bytes", &used)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_is_big_endian() {
        let mut mem = Memory::new();
        mem.load_region(Region::Hash, &[0xC0, 0x7F]).unwrap();
        assert_eq!(mem.fetch(0), 0xC07F);
    }

    #[test]
    fn test_data_words_are_little_endian() {
        let mut mem = Memory::new();
        mem.store_word(14, 0x2100);
        assert_eq!(mem.as_bytes()[28], 0x00);
        assert_eq!(mem.as_bytes()[29], 0x21);
        assert_eq!(mem.load_word(14), 0x2100);
    }

    #[test]
    fn test_fetch_wraps_at_end() {
        let mut mem = Memory::new();
        mem.store_word(0xFFFF, 0x00AB);
        mem.store_word(0, 0x00CD);
        // Last byte of memory, then byte 0
        assert_eq!(mem.fetch(MEMORY_SIZE - 1), 0x00CD);
        assert_eq!(mem.fetch(MEMORY_SIZE - 2), 0xAB00);
    }

    #[test]
    fn test_highest_word() {
        let mut mem = Memory::new();
        mem.store_word(0xFFFF, 0xBEEF);
        assert_eq!(mem.load_word(0xFFFF), 0xBEEF);
    }

    #[test]
    fn test_load_region_offsets() {
        let mut mem = Memory::new();
        mem.load_region(Region::Output, &[1, 2, 3]).unwrap();
        mem.load_region(Region::Input, &[4]).unwrap();
        assert_eq!(&mem.as_bytes()[0x2000..0x2004], &[1, 2, 3, 0]);
        assert_eq!(mem.as_bytes()[0x4000], 4);
    }

    #[test]
    fn test_load_region_capacity() {
        let mut mem = Memory::new();
        assert!(mem.load_region(Region::Output, &vec![0xFF; REGION_BYTES]).is_ok());
        let err = mem.load_region(Region::Input, &vec![0; REGION_BYTES + 1]).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::RegionOverflow { region: Region::Input, len, .. } if len == REGION_BYTES + 1
        ));
    }

    #[test]
    fn test_clear() {
        let mut mem = Memory::new();
        mem.store_word(0x1234, 0xFFFF);
        mem.clear();
        assert!(mem.as_bytes().iter().all(|&b| b == 0));
    }
}
