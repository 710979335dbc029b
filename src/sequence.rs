// SPDX-License-Identifier: MIT
//! Bit sequences of unbounded length
//!
//! A `BitSequence` is an ordered run of [`BitContainer`] members. Members may
//! have different widths; the logical bit string is their concatenation.
//! Reads, splits and alignment return new sequences and never drop or
//! duplicate a bit.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::bit::{Bit, Byte, Resizable};
use crate::config::{ARCH_WIDTH, DEFAULT_MAX_MEMBERS};
use crate::container::BitContainer;
use crate::error::{BitError, Result};

#[derive(Debug, Clone)]
pub struct BitSequence {
    members: Vec<BitContainer>,
    max_members: usize,
}

impl BitSequence {
    /// Create a new empty sequence
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_MEMBERS)
    }

    /// Create an empty sequence that may hold at most `max_members` members
    pub fn with_limit(max_members: usize) -> Self {
        Self {
            members: Vec::new(),
            max_members: max_members.max(1),
        }
    }

    /// Build from raw bytes, most significant bit of the first byte first
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut seq = Self::new();
        for chunk in bytes.chunks(ARCH_WIDTH / 8) {
            seq.push_member(BitContainer::from_bytes(chunk)?)?;
        }
        Ok(seq)
    }

    pub fn from_bits(bits: &[Bit]) -> Result<Self> {
        let mut seq = Self::new();
        seq.append_bits(bits)?;
        Ok(seq)
    }

    /// Build from existing members, keeping their individual widths
    pub fn from_containers(containers: Vec<BitContainer>) -> Result<Self> {
        let mut seq = Self::new();
        for container in containers {
            seq.push_member(container)?;
        }
        Ok(seq)
    }

    /// Binary representation of `value`, most significant bit first
    ///
    /// Zero is the empty sequence.
    pub fn from_integer(value: &BigUint) -> Result<Self> {
        let bit_len = value.bits() as usize;
        let bytes = value.to_bytes_be();
        let skip = bytes.len() * 8 - bit_len;
        let bits: Vec<Bit> = bytes
            .iter()
            .flat_map(|&b| Byte(b).bits())
            .skip(skip)
            .collect();
        Self::from_bits(&bits)
    }

    /// Binary representation of `value` left-padded to exactly `width` bits
    pub fn from_integer_width(value: &BigUint, width: usize) -> Result<Self> {
        let bit_len = value.bits() as usize;
        if bit_len > width {
            return Err(BitError::width(
                width,
                format!("value needs {bit_len} bits"),
            ));
        }
        Self::from_integer(value)?.pad_left(width - bit_len)
    }

    /// `width`-bit representation of a fixed-width integer
    pub fn from_u64(value: u64, width: usize) -> Result<Self> {
        if width > 64 {
            let padded = Self::from_u64(value, 64)?;
            return padded.pad_left(width - 64);
        }
        let container = BitContainer::from_u64(value, width)?;
        let mut seq = Self::new();
        seq.push_member(container)?;
        Ok(seq)
    }

    /// Total bit count
    pub fn width(&self) -> usize {
        self.members.iter().map(BitContainer::width).sum()
    }

    /// Alias of [`width`](Self::width)
    #[inline]
    pub fn bit_length(&self) -> usize {
        self.width()
    }

    pub fn is_empty(&self) -> bool {
        self.members.iter().all(BitContainer::is_empty)
    }

    pub fn members(&self) -> &[BitContainer] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Bit at `index`, 0 being the first (most significant) bit
    pub fn bit(&self, mut index: usize) -> Option<Bit> {
        for member in &self.members {
            let width = member.width();
            if index < width {
                return member.bit(index);
            }
            index -= width;
        }
        None
    }

    pub fn bits(&self) -> impl Iterator<Item = Bit> + '_ {
        self.members.iter().flat_map(|m| m.bits())
    }

    pub fn to_bit_vec(&self) -> Vec<Bit> {
        self.bits().collect()
    }

    /// New sequence over bits `[low, high)`
    pub fn read_range(&self, low: usize, high: usize) -> Result<Self> {
        let width = self.width();
        if low > high || high > width {
            return Err(BitError::range(low, high, width));
        }

        let mut out = Self::with_limit(self.max_members);
        let mut offset = 0;
        for member in &self.members {
            let member_width = member.width();
            let start = low.max(offset);
            let end = high.min(offset + member_width);
            if start < end {
                out.push_member(member.read_range(start - offset, end - offset)?)?;
            }
            offset += member_width;
            if offset >= high {
                break;
            }
        }
        Ok(out)
    }

    /// Bits `[low, high)` read as an unsigned integer, at most 64 bits wide
    pub fn read_u64(&self, low: usize, high: usize) -> Result<u64> {
        if high.saturating_sub(low) > 64 {
            return Err(BitError::width(high - low, "fixed-width read exceeds 64 bits"));
        }
        let range = self.read_range(low, high)?;
        Ok(range
            .bits()
            .fold(0u64, |acc, b| (acc << 1) | u64::from(b.as_u8())))
    }

    /// Split into `[0, at)` and `[at, width)`
    pub fn split(&self, at: usize) -> Result<(Self, Self)> {
        let width = self.width();
        if at > width {
            return Err(BitError::range(at, width, width));
        }
        Ok((self.read_range(0, at)?, self.read_range(at, width)?))
    }

    pub fn append_bit(&mut self, bit: Bit) -> Result<()> {
        match self.members.last_mut() {
            Some(last) if last.width() < ARCH_WIDTH => last.append_bit(bit),
            _ => self.push_member(BitContainer::from_bits(&[bit])?),
        }
    }

    pub fn append_bits(&mut self, bits: &[Bit]) -> Result<()> {
        let room = self
            .members
            .last()
            .map(|last| ARCH_WIDTH - last.width())
            .unwrap_or(0);
        let (head, tail) = bits.split_at(room.min(bits.len()));
        self.check_members(self.members.len() + tail.len().div_ceil(ARCH_WIDTH))?;
        if !head.is_empty() {
            if let Some(last) = self.members.last_mut() {
                last.append_bits(head)?;
            }
        }
        for chunk in tail.chunks(ARCH_WIDTH) {
            self.push_member(BitContainer::from_bits(chunk)?)?;
        }
        Ok(())
    }

    pub fn append_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let bits: Vec<Bit> = bytes.iter().flat_map(|&b| Byte(b).bits()).collect();
        self.append_bits(&bits)
    }

    /// Append `container` as its own member
    pub fn append_container(&mut self, container: BitContainer) -> Result<()> {
        self.push_member(container)
    }

    /// Append every member of `other`
    pub fn append(&mut self, other: &BitSequence) -> Result<()> {
        let incoming: Vec<BitContainer> = other
            .members
            .iter()
            .filter(|m| !m.is_empty())
            .cloned()
            .collect();
        self.check_members(self.members.len() + incoming.len())?;
        self.members.extend(incoming);
        Ok(())
    }

    pub fn prepend_bit(&mut self, bit: Bit) -> Result<()> {
        self.prepend_bits(&[bit])
    }

    pub fn prepend_bits(&mut self, bits: &[Bit]) -> Result<()> {
        let mut head = Self::with_limit(self.max_members);
        head.append_bits(bits)?;
        self.prepend(&head)
    }

    pub fn prepend_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let head = Self::from_bytes(bytes)?;
        self.prepend(&head)
    }

    /// Prepend every member of `other`
    pub fn prepend(&mut self, other: &BitSequence) -> Result<()> {
        let incoming: Vec<BitContainer> = other
            .members
            .iter()
            .filter(|m| !m.is_empty())
            .cloned()
            .collect();
        self.check_members(self.members.len() + incoming.len())?;
        self.members.splice(0..0, incoming);
        Ok(())
    }

    /// Repartition into members of exactly `width` bits, the last possibly short
    pub fn align(&self, width: usize) -> Result<Self> {
        if width == 0 {
            return Err(BitError::width(width, "alignment width must be positive"));
        }
        if width > ARCH_WIDTH {
            return Err(BitError::width(
                width,
                format!("alignment exceeds architecture width {ARCH_WIDTH}"),
            ));
        }

        let bits = self.to_bit_vec();
        let mut out = Self::with_limit(self.max_members);
        for chunk in bits.chunks(width) {
            out.push_member(BitContainer::from_bits(chunk)?)?;
        }
        Ok(out)
    }

    /// Reverse bit order; member widths are mirrored too
    pub fn reverse(&self) -> Self {
        Self {
            members: self.members.iter().rev().map(BitContainer::reverse).collect(),
            max_members: self.max_members,
        }
    }

    /// Read the whole sequence as an unsigned integer, most significant bit first
    pub fn as_integer(&self) -> BigUint {
        let width = self.width();
        if width == 0 {
            return BigUint::zero();
        }
        let pad = (8 - width % 8) % 8;
        let padded: Vec<Bit> = std::iter::repeat(Bit::Zero)
            .take(pad)
            .chain(self.bits())
            .collect();
        BigUint::from_bytes_be(&pack_bytes(&padded))
    }

    /// Bytes of the bit stream, the final partial byte zero-padded on the right
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut bits = self.to_bit_vec();
        let pad = (8 - bits.len() % 8) % 8;
        bits.extend(std::iter::repeat(Bit::Zero).take(pad));
        pack_bytes(&bits)
    }

    /// Bit-for-bit equality, ignoring member boundaries
    pub fn same_bits(&self, other: &BitSequence) -> bool {
        self.width() == other.width() && self.bits().eq(other.bits())
    }

    fn push_member(&mut self, member: BitContainer) -> Result<()> {
        if member.is_empty() {
            return Ok(());
        }
        self.check_members(self.members.len() + 1)?;
        self.members.push(member);
        Ok(())
    }

    fn check_members(&self, count: usize) -> Result<()> {
        if count > self.max_members {
            return Err(BitError::width(
                count,
                format!("sequence member limit is {}", self.max_members),
            ));
        }
        Ok(())
    }
}

fn pack_bytes(bits: &[Bit]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, b| (acc << 1) | b.as_u8()))
        .collect()
}

impl Default for BitSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural equality: same members with the same widths
impl PartialEq for BitSequence {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl Eq for BitSequence {}

impl Resizable for BitSequence {
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

impl std::fmt::Display for BitSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in self.bits() {
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

/// Parse a string of `0`/`1`; underscores are ignored as separators
impl std::str::FromStr for BitSequence {
    type Err = BitError;

    fn from_str(s: &str) -> Result<Self> {
        let bits = s
            .chars()
            .filter(|&c| c != '_')
            .map(Bit::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::from_bits(&bits)
    }
}
