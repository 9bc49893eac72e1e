//! Register definitions for hackvm

use crate::error::{Result, SpecError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of registers
pub const NUM_REGISTERS: usize = 8;

/// Register (r0-r7)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Register {
    R0 = 0, // hardwired to 0
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
}

impl Register {
    pub const ZERO: Self = Self::R0;

    pub const ALL: [Self; NUM_REGISTERS] = [
        Self::R0,
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::R5,
        Self::R6,
        Self::R7,
    ];

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Register from a 3-bit instruction field. Higher bits are masked off.
    #[inline]
    pub fn from_field(field: u16) -> Self {
        Self::ALL[(field & 0x7) as usize]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::R0 => "r0",
            Self::R1 => "r1",
            Self::R2 => "r2",
            Self::R3 => "r3",
            Self::R4 => "r4",
            Self::R5 => "r5",
            Self::R6 => "r6",
            Self::R7 => "r7",
        }
    }
}

impl TryFrom<u8> for Register {
    type Error = SpecError;

    fn try_from(index: u8) -> Result<Self> {
        Self::from_index(index as usize).ok_or(SpecError::InvalidRegister(index))
    }
}

impl FromStr for Register {
    type Err = SpecError;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|reg| reg.name() == name)
            .ok_or_else(|| SpecError::UnknownRegister(name.to_string()))
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index() {
        for i in 0..NUM_REGISTERS {
            assert_eq!(Register::from_index(i).unwrap().index(), i);
        }
        assert_eq!(Register::from_index(8), None);
    }

    #[test]
    fn test_from_field_masks() {
        assert_eq!(Register::from_field(0b1011), Register::R3);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("r0".parse::<Register>().unwrap(), Register::R0);
        assert_eq!("r7".parse::<Register>().unwrap(), Register::R7);
        assert_eq!(
            "r8".parse::<Register>(),
            Err(SpecError::UnknownRegister("r8".to_string()))
        );
        assert!("sp".parse::<Register>().is_err());
    }

    #[test]
    fn test_try_from_u8() {
        assert_eq!(Register::try_from(5u8).unwrap(), Register::R5);
        assert_eq!(Register::try_from(9u8), Err(SpecError::InvalidRegister(9)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Register::R4.to_string(), "r4");
        assert!(Register::R0.is_zero());
        assert!(!Register::R1.is_zero());
    }
}
