// SPDX-License-Identifier: MIT
//! Fixed-width primitives and the resize seam

use crate::error::{BitError, Result};

/// A single binary digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Bit {
    #[default]
    Zero,
    One,
}

impl Bit {
    #[inline]
    pub fn is_one(self) -> bool {
        self == Bit::One
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        match self {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }

    /// Bit at `index` (0 = most significant) of `byte`
    #[inline]
    pub fn of_byte(byte: u8, index: usize) -> Bit {
        Bit::from((byte >> (7 - index)) & 1 == 1)
    }
}

impl From<bool> for Bit {
    #[inline]
    fn from(value: bool) -> Self {
        if value {
            Bit::One
        } else {
            Bit::Zero
        }
    }
}

impl TryFrom<u8> for Bit {
    type Error = BitError;

    fn try_from(value: u8) -> Result<Self> {
        Bit::try_from(value as u64)
    }
}

impl TryFrom<u64> for Bit {
    type Error = BitError;

    fn try_from(value: u64) -> Result<Self> {
        match value {
            0 => Ok(Bit::Zero),
            1 => Ok(Bit::One),
            other => Err(BitError::Value(other)),
        }
    }
}

impl TryFrom<char> for Bit {
    type Error = BitError;

    fn try_from(value: char) -> Result<Self> {
        match value {
            '0' => Ok(Bit::Zero),
            '1' => Ok(Bit::One),
            other => Err(BitError::Value(other as u64)),
        }
    }
}

impl std::fmt::Display for Bit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// A single byte, a fixed eight-bit unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Byte(pub u8);

impl Byte {
    /// Bits of the byte, most significant first
    pub fn bits(self) -> [Bit; 8] {
        let mut out = [Bit::Zero; 8];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = Bit::of_byte(self.0, i);
        }
        out
    }
}

/// Units whose width can be changed independently of their neighbours
///
/// Lone bits and bytes have a width fixed by their type and reject every
/// operation here with `StaticWidth`.
pub trait Resizable: Sized {
    /// Current width in bits
    fn bit_width(&self) -> usize;

    /// Prepend `count` zero bits
    fn pad_left(&self, count: usize) -> Result<Self>;

    /// Append `count` zero bits
    fn pad_right(&self, count: usize) -> Result<Self>;

    /// Zero-extend on the left to exactly `width` bits
    fn resize_to(&self, width: usize) -> Result<Self> {
        let current = self.bit_width();
        if width < current {
            return Err(BitError::width(
                width,
                format!("cannot shrink {current}-bit unit"),
            ));
        }
        self.pad_left(width - current)
    }
}

impl Resizable for Bit {
    fn bit_width(&self) -> usize {
        1
    }

    fn pad_left(&self, _count: usize) -> Result<Self> {
        Err(BitError::StaticWidth("bit"))
    }

    fn pad_right(&self, _count: usize) -> Result<Self> {
        Err(BitError::StaticWidth("bit"))
    }

    fn resize_to(&self, _width: usize) -> Result<Self> {
        Err(BitError::StaticWidth("bit"))
    }
}

impl Resizable for Byte {
    fn bit_width(&self) -> usize {
        8
    }

    fn pad_left(&self, _count: usize) -> Result<Self> {
        Err(BitError::StaticWidth("byte"))
    }

    fn pad_right(&self, _count: usize) -> Result<Self> {
        Err(BitError::StaticWidth("byte"))
    }

    fn resize_to(&self, _width: usize) -> Result<Self> {
        Err(BitError::StaticWidth("byte"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_try_from() {
        assert_eq!(Bit::try_from(0u8), Ok(Bit::Zero));
        assert_eq!(Bit::try_from(1u8), Ok(Bit::One));
        assert_eq!(Bit::try_from(2u8), Err(BitError::Value(2)));
        assert_eq!(Bit::try_from('x'), Err(BitError::Value('x' as u64)));
    }

    #[test]
    fn test_of_byte_msb_first() {
        assert_eq!(Bit::of_byte(0b1000_0000, 0), Bit::One);
        assert_eq!(Bit::of_byte(0b1000_0000, 7), Bit::Zero);
        assert_eq!(Bit::of_byte(0b0000_0001, 7), Bit::One);
    }

    #[test]
    fn test_byte_bits() {
        let bits = Byte(0b1010_0001).bits();
        let as_u8: Vec<u8> = bits.iter().map(|b| b.as_u8()).collect();
        assert_eq!(as_u8, vec![1, 0, 1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_static_width_primitives() {
        assert_eq!(Bit::One.pad_left(1), Err(BitError::StaticWidth("bit")));
        assert_eq!(Bit::One.resize_to(8), Err(BitError::StaticWidth("bit")));
        assert_eq!(Byte(3).pad_right(2), Err(BitError::StaticWidth("byte")));
        assert_eq!(Byte(3).resize_to(16), Err(BitError::StaticWidth("byte")));
    }
}
