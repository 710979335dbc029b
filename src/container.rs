// SPDX-License-Identifier: MIT
//! Bit container core types
//!
//! A `BitContainer` is the storage unit underneath every sequence: a run of
//! whole bytes plus at most seven leftover bits, never wider than
//! [`ARCH_WIDTH`]. Bits are ordered most significant first, bytes before the
//! remainder.

use crate::bit::{Bit, Byte, Resizable};
use crate::config::ARCH_WIDTH;
use crate::error::{BitError, Result};

/// Payload shapes a container can take
///
/// Every mutation renormalizes, so `Bits` always holds fewer than eight bits
/// and `Mixed` always holds at least one byte and one to seven bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Payload {
    /// Whole bytes only
    Bytes(Vec<u8>),
    /// Fewer than eight bits and no bytes
    Bits(Vec<Bit>),
    /// Whole bytes followed by a sub-byte remainder
    Mixed { bytes: Vec<u8>, remainder: Vec<Bit> },
}

impl Payload {
    /// Pack a bit slice into bytes plus remainder
    fn pack(bits: &[Bit]) -> Self {
        let full = bits.len() / 8;
        let bytes: Vec<u8> = bits[..full * 8]
            .chunks_exact(8)
            .map(|chunk| chunk.iter().fold(0u8, |acc, b| (acc << 1) | b.as_u8()))
            .collect();
        let remainder = bits[full * 8..].to_vec();

        match (bytes.is_empty(), remainder.is_empty()) {
            (_, true) => Payload::Bytes(bytes),
            (true, false) => Payload::Bits(remainder),
            (false, false) => Payload::Mixed { bytes, remainder },
        }
    }

    fn bytes(&self) -> &[u8] {
        match self {
            Payload::Bytes(bytes) | Payload::Mixed { bytes, .. } => bytes,
            Payload::Bits(_) => &[],
        }
    }

    fn remainder(&self) -> &[Bit] {
        match self {
            Payload::Bits(bits) | Payload::Mixed { remainder: bits, .. } => bits,
            Payload::Bytes(_) => &[],
        }
    }
}

/// A byte-aligned payload plus a sub-byte remainder
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitContainer {
    payload: Payload,
}

impl BitContainer {
    /// Create a new empty container
    pub fn new() -> Self {
        Self {
            payload: Payload::Bytes(Vec::new()),
        }
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_width(bytes.len() * 8)?;
        Ok(Self {
            payload: Payload::Bytes(bytes.to_vec()),
        })
    }

    /// Create from individual bits
    pub fn from_bits(bits: &[Bit]) -> Result<Self> {
        check_width(bits.len())?;
        Ok(Self {
            payload: Payload::pack(bits),
        })
    }

    /// Create a `width`-bit container holding `value`, most significant bit first
    pub fn from_u64(value: u64, width: usize) -> Result<Self> {
        check_width(width)?;
        if width < 64 && value >> width != 0 {
            return Err(BitError::width(
                width,
                format!("value {value} does not fit"),
            ));
        }
        let bits: Vec<Bit> = (0..width)
            .rev()
            .map(|shift| Bit::from((value >> shift) & 1 == 1))
            .collect();
        Ok(Self {
            payload: Payload::pack(&bits),
        })
    }

    /// Width in bits
    #[inline]
    pub fn width(&self) -> usize {
        self.payload.bytes().len() * 8 + self.payload.remainder().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0
    }

    /// Number of leftover bits after the last whole byte
    #[inline]
    pub fn remainder_len(&self) -> usize {
        self.payload.remainder().len()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Bit at `index`, 0 being the most significant
    pub fn bit(&self, index: usize) -> Option<Bit> {
        let bytes = self.payload.bytes();
        if index < bytes.len() * 8 {
            Some(Bit::of_byte(bytes[index / 8], index % 8))
        } else {
            self.payload.remainder().get(index - bytes.len() * 8).copied()
        }
    }

    /// Iterate bits, most significant first
    pub fn bits(&self) -> impl Iterator<Item = Bit> + '_ {
        self.payload
            .bytes()
            .iter()
            .flat_map(|&b| Byte(b).bits())
            .chain(self.payload.remainder().iter().copied())
    }

    pub fn to_bit_vec(&self) -> Vec<Bit> {
        self.bits().collect()
    }

    /// New container over bits `[low, high)`
    pub fn read_range(&self, low: usize, high: usize) -> Result<Self> {
        let width = self.width();
        if low > high || high > width {
            return Err(BitError::range(low, high, width));
        }

        // Byte-aligned fast path
        if low % 8 == 0 && high % 8 == 0 && high <= self.payload.bytes().len() * 8 {
            return Ok(Self {
                payload: Payload::Bytes(self.payload.bytes()[low / 8..high / 8].to_vec()),
            });
        }

        let bits: Vec<Bit> = self.bits().skip(low).take(high - low).collect();
        Ok(Self {
            payload: Payload::pack(&bits),
        })
    }

    pub fn append_bit(&mut self, bit: Bit) -> Result<()> {
        self.append_bits(&[bit])
    }

    pub fn append_bits(&mut self, bits: &[Bit]) -> Result<()> {
        check_width(self.width() + bits.len())?;
        let mut all = self.to_bit_vec();
        all.extend_from_slice(bits);
        self.payload = Payload::pack(&all);
        Ok(())
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        check_width(self.width() + bytes.len() * 8)?;
        if let Payload::Bytes(own) = &mut self.payload {
            own.extend_from_slice(bytes);
            return Ok(());
        }
        let extra: Vec<Bit> = bytes.iter().flat_map(|&b| Byte(b).bits()).collect();
        self.append_bits(&extra)
    }

    pub fn append(&mut self, other: &BitContainer) -> Result<()> {
        self.append_bits(&other.to_bit_vec())
    }

    pub fn prepend_bit(&mut self, bit: Bit) -> Result<()> {
        self.prepend_bits(&[bit])
    }

    pub fn prepend_bits(&mut self, bits: &[Bit]) -> Result<()> {
        check_width(self.width() + bits.len())?;
        let mut all = bits.to_vec();
        all.extend(self.bits());
        self.payload = Payload::pack(&all);
        Ok(())
    }

    pub fn prepend_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        check_width(self.width() + bytes.len() * 8)?;
        if let Payload::Bytes(own) = &mut self.payload {
            own.splice(0..0, bytes.iter().copied());
            return Ok(());
        }
        let extra: Vec<Bit> = bytes.iter().flat_map(|&b| Byte(b).bits()).collect();
        self.prepend_bits(&extra)
    }

    pub fn prepend(&mut self, other: &BitContainer) -> Result<()> {
        self.prepend_bits(&other.to_bit_vec())
    }

    /// Reverse bit order
    pub fn reverse(&self) -> Self {
        let mut bits = self.to_bit_vec();
        bits.reverse();
        Self {
            payload: Payload::pack(&bits),
        }
    }

    /// Value of the container read as an unsigned integer
    pub fn as_u64(&self) -> u64 {
        self.bits()
            .fold(0u64, |acc, b| (acc << 1) | u64::from(b.as_u8()))
    }

    /// Bytes, with the remainder zero-padded on the right into a final byte
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut out = self.payload.bytes().to_vec();
        let remainder = self.payload.remainder();
        if !remainder.is_empty() {
            let packed = remainder
                .iter()
                .fold(0u8, |acc, b| (acc << 1) | b.as_u8());
            out.push(packed << (8 - remainder.len()));
        }
        out
    }
}

impl Default for BitContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Resizable for BitContainer {
    fn bit_width(&self) -> usize {
        self.width()
    }

    fn pad_left(&self, count: usize) -> Result<Self> {
        let mut out = self.clone();
        out.prepend_bits(&vec![Bit::Zero; count])?;
        Ok(out)
    }

    fn pad_right(&self, count: usize) -> Result<Self> {
        let mut out = self.clone();
        out.append_bits(&vec![Bit::Zero; count])?;
        Ok(out)
    }
}

#[inline]
fn check_width(width: usize) -> Result<()> {
    if width > ARCH_WIDTH {
        return Err(BitError::width(
            width,
            format!("container limit is {ARCH_WIDTH} bits"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(raw: &[u8]) -> Vec<Bit> {
        raw.iter().map(|&b| Bit::try_from(b).unwrap()).collect()
    }

    #[test]
    fn test_container_new() {
        let container = BitContainer::new();
        assert_eq!(container.width(), 0);
        assert!(container.is_empty());
        assert_eq!(container.payload(), &Payload::Bytes(vec![]));
    }

    #[test]
    fn test_from_bits_normalizes_variant() {
        let short = BitContainer::from_bits(&bits(&[1, 0, 1])).unwrap();
        assert!(matches!(short.payload(), Payload::Bits(b) if b.len() == 3));

        let exact = BitContainer::from_bits(&bits(&[1, 0, 0, 0, 0, 0, 0, 1])).unwrap();
        assert_eq!(exact.payload(), &Payload::Bytes(vec![0x81]));

        let mixed = BitContainer::from_bits(&bits(&[1, 1, 1, 1, 0, 0, 0, 0, 1])).unwrap();
        match mixed.payload() {
            Payload::Mixed { bytes, remainder } => {
                assert_eq!(bytes, &vec![0xF0]);
                assert_eq!(remainder, &vec![Bit::One]);
            }
            other => panic!("expected mixed payload, got {other:?}"),
        }
    }

    #[test]
    fn test_append_rolls_remainder_into_bytes() {
        let mut container = BitContainer::from_bits(&bits(&[1, 0, 1, 0, 1, 0, 1])).unwrap();
        assert_eq!(container.remainder_len(), 7);
        container.append_bit(Bit::Zero).unwrap();
        assert_eq!(container.remainder_len(), 0);
        assert_eq!(container.payload(), &Payload::Bytes(vec![0xAA]));
    }

    #[test]
    fn test_prepend_bytes_and_bits() {
        let mut container = BitContainer::from_bits(&bits(&[1])).unwrap();
        container.prepend_bytes(&[0xFF]).unwrap();
        assert_eq!(container.width(), 9);
        assert_eq!(container.as_u64(), 0b1_1111_1111);

        container.prepend_bit(Bit::Zero).unwrap();
        assert_eq!(container.width(), 10);
        assert_eq!(container.bit(0), Some(Bit::Zero));
        assert_eq!(container.bit(9), Some(Bit::One));
    }

    #[test]
    fn test_width_limit() {
        let too_wide = vec![0u8; ARCH_WIDTH / 8 + 1];
        assert!(matches!(
            BitContainer::from_bytes(&too_wide),
            Err(BitError::Width { .. })
        ));

        let mut full = BitContainer::from_bytes(&vec![0u8; ARCH_WIDTH / 8]).unwrap();
        assert!(full.append_bit(Bit::One).is_err());
        // failed append leaves the container untouched
        assert_eq!(full.width(), ARCH_WIDTH);
    }

    #[test]
    fn test_read_range() {
        let container = BitContainer::from_bytes(&[0b1100_1010, 0xFF]).unwrap();
        let middle = container.read_range(2, 6).unwrap();
        assert_eq!(middle.as_u64(), 0b0010);
        assert_eq!(middle.width(), 4);

        let aligned = container.read_range(8, 16).unwrap();
        assert_eq!(aligned.payload(), &Payload::Bytes(vec![0xFF]));

        assert!(matches!(
            container.read_range(5, 3),
            Err(BitError::Range { .. })
        ));
        assert!(matches!(
            container.read_range(0, 17),
            Err(BitError::Range { .. })
        ));
    }

    #[test]
    fn test_from_u64_and_back() {
        let container = BitContainer::from_u64(6, 3).unwrap();
        assert_eq!(container.to_bit_vec(), bits(&[1, 1, 0]));
        assert_eq!(container.as_u64(), 6);
        assert!(BitContainer::from_u64(8, 3).is_err());
    }

    #[test]
    fn test_reverse() {
        let container = BitContainer::from_bits(&bits(&[1, 1, 0, 1])).unwrap();
        assert_eq!(container.reverse().to_bit_vec(), bits(&[1, 0, 1, 1]));
    }

    #[test]
    fn test_as_bytes_pads_right() {
        let container = BitContainer::from_bits(&bits(&[1, 0, 1])).unwrap();
        assert_eq!(container.as_bytes(), vec![0b1010_0000]);
    }

    #[test]
    fn test_resizable() {
        let container = BitContainer::from_bits(&bits(&[1, 1])).unwrap();
        let padded = container.resize_to(5).unwrap();
        assert_eq!(padded.to_bit_vec(), bits(&[0, 0, 0, 1, 1]));
        assert_eq!(padded.as_u64(), 3);
        assert!(container.resize_to(1).is_err());
        assert_eq!(container.pad_right(2).unwrap().as_u64(), 0b1100);
    }
}
