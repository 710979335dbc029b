// SPDX-License-Identifier: MIT
//! Cursor for consuming a bit sequence from both ends
//!
//! Signatures are decoded from the head (approximation replay, ZLE keys) or
//! from the tail (passage sign bits). `BitReader` flattens the sequence once
//! and tracks both cursors.

use num_bigint::BigUint;

use crate::bit::Bit;
use crate::error::{BitError, Result};
use crate::sequence::BitSequence;

#[derive(Debug, Clone)]
pub struct BitReader {
    bits: Vec<Bit>,
    head: usize,
    tail: usize,
}

impl BitReader {
    pub fn new(sequence: &BitSequence) -> Self {
        let bits = sequence.to_bit_vec();
        let tail = bits.len();
        Self {
            bits,
            head: 0,
            tail,
        }
    }

    /// Bits not yet consumed from either end
    #[inline]
    pub fn remaining(&self) -> usize {
        self.tail - self.head
    }

    /// Bits consumed from the head so far
    #[inline]
    pub fn position(&self) -> usize {
        self.head
    }

    /// Next bit from the head, or `None` when exhausted
    pub fn next_bit(&mut self) -> Option<Bit> {
        if self.head == self.tail {
            return None;
        }
        let bit = self.bits[self.head];
        self.head += 1;
        Some(bit)
    }

    pub fn read_bit(&mut self) -> Result<Bit> {
        let (head, tail) = (self.head, self.tail);
        self.next_bit()
            .ok_or_else(|| BitError::range(head, head + 1, tail))
    }

    /// `width` bits from the head as an unsigned integer
    pub fn read_u64(&mut self, width: usize) -> Result<u64> {
        if width > 64 {
            return Err(BitError::width(width, "fixed-width read exceeds 64 bits"));
        }
        let end = self.claim_head(width)?;
        let value = self.bits[self.head..end]
            .iter()
            .fold(0u64, |acc, b| (acc << 1) | u64::from(b.as_u8()));
        self.head = end;
        Ok(value)
    }

    /// `width` bits from the head as a new sequence
    pub fn read_sequence(&mut self, width: usize) -> Result<BitSequence> {
        let end = self.claim_head(width)?;
        let out = BitSequence::from_bits(&self.bits[self.head..end])?;
        self.head = end;
        Ok(out)
    }

    /// Last unconsumed bit, taken from the tail
    pub fn pop_tail_bit(&mut self) -> Result<Bit> {
        if self.head == self.tail {
            return Err(BitError::range(self.tail, self.tail + 1, self.tail));
        }
        self.tail -= 1;
        Ok(self.bits[self.tail])
    }

    /// Everything between the cursors as an integer; consumes it
    pub fn take_rest_integer(&mut self) -> Result<BigUint> {
        let rest = self.read_sequence(self.remaining())?;
        Ok(rest.as_integer())
    }

    fn claim_head(&self, width: usize) -> Result<usize> {
        let end = self.head + width;
        if end > self.tail {
            return Err(BitError::range(self.head, end, self.tail));
        }
        Ok(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(s: &str) -> BitReader {
        BitReader::new(&s.parse::<BitSequence>().unwrap())
    }

    #[test]
    fn test_head_reads() {
        let mut r = reader("1011001");
        assert_eq!(r.read_bit().unwrap(), Bit::One);
        assert_eq!(r.read_u64(3).unwrap(), 0b011);
        assert_eq!(r.position(), 4);
        assert_eq!(r.read_sequence(3).unwrap().to_string(), "001");
        assert_eq!(r.remaining(), 0);
        assert!(r.next_bit().is_none());
        assert!(matches!(r.read_bit(), Err(BitError::Range { .. })));
    }

    #[test]
    fn test_tail_reads_meet_head() {
        let mut r = reader("110");
        assert_eq!(r.pop_tail_bit().unwrap(), Bit::Zero);
        assert_eq!(r.read_bit().unwrap(), Bit::One);
        assert_eq!(r.pop_tail_bit().unwrap(), Bit::One);
        assert!(r.pop_tail_bit().is_err());
    }

    #[test]
    fn test_overlong_read_does_not_consume() {
        let mut r = reader("10");
        assert!(matches!(r.read_u64(3), Err(BitError::Range { .. })));
        assert_eq!(r.remaining(), 2);
        assert!(matches!(r.read_u64(65), Err(BitError::Width { .. })));
    }

    #[test]
    fn test_take_rest_integer() {
        let mut r = reader("0101");
        r.read_bit().unwrap();
        assert_eq!(r.take_rest_integer().unwrap(), BigUint::from(5u32));
        assert_eq!(r.take_rest_integer().unwrap(), BigUint::from(0u32));
    }
}
