// SPDX-License-Identifier: MIT
//! Zero-length-encoding (ZLE) key schemes
//!
//! A ZLE key is a self-delimiting prefix: bits are read until a `1` appears
//! or four bits have been consumed. The key picks one of five table rows, and
//! the row gives the width of the payload that follows.
//!
//! ```text
//! key    micro   doubling   scaled
//! 1      1       4          2-bit payload, values 0..=3
//! 01     2       8          3-bit payload + 4, values 4..=11
//! 001    3       16         8-bit payload + 12, values 12..=267
//! 0000   4       32         raw 16-bit payload
//! 0001   5       64         raw 64-bit payload
//! ```

use serde::{Deserialize, Serialize};

use crate::bit::Bit;
use crate::error::{BitError, Result};
use crate::reader::BitReader;
use crate::sequence::BitSequence;

/// Longest key, in bits
pub const MAX_KEY_BITS: usize = 4;

/// The five keys shared by every scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZleKey {
    /// `1`
    One,
    /// `01`
    ZeroOne,
    /// `001`
    ZeroZeroOne,
    /// `0000`
    FourZeros,
    /// `0001`
    ZeroZeroZeroOne,
}

impl ZleKey {
    /// Keys in table order
    pub fn all() -> &'static [ZleKey] {
        &[
            ZleKey::One,
            ZleKey::ZeroOne,
            ZleKey::ZeroZeroOne,
            ZleKey::FourZeros,
            ZleKey::ZeroZeroZeroOne,
        ]
    }

    /// Row of this key in every scheme table
    #[inline]
    pub fn row(self) -> usize {
        self as usize
    }

    pub fn bits(self) -> &'static [Bit] {
        use Bit::{One, Zero};
        match self {
            ZleKey::One => &[One],
            ZleKey::ZeroOne => &[Zero, One],
            ZleKey::ZeroZeroOne => &[Zero, Zero, One],
            ZleKey::FourZeros => &[Zero, Zero, Zero, Zero],
            ZleKey::ZeroZeroZeroOne => &[Zero, Zero, Zero, One],
        }
    }

    /// Look up an observed bit pattern
    pub fn from_bits(bits: &[Bit]) -> Result<Self> {
        ZleKey::all()
            .iter()
            .copied()
            .find(|key| key.bits() == bits)
            .ok_or_else(|| {
                let pattern: String = bits.iter().map(|b| b.to_string()).collect();
                BitError::InvalidKey(format!("pattern '{pattern}' matches no row"))
            })
    }

    /// Consume one key from the head of `reader`
    pub fn read(reader: &mut BitReader) -> Result<Self> {
        let mut seen = Vec::with_capacity(MAX_KEY_BITS);
        while seen.len() < MAX_KEY_BITS {
            let bit = reader.next_bit().ok_or_else(|| {
                BitError::InvalidKey(format!("truncated key after {} bits", seen.len()))
            })?;
            seen.push(bit);
            if bit.is_one() {
                break;
            }
        }
        Self::from_bits(&seen)
    }
}

/// How a row turns into a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Row {
    payload_width: usize,
    offset: u64,
}

const fn raw(payload_width: usize) -> Row {
    Row {
        payload_width,
        offset: 0,
    }
}

const MICRO: [Row; 5] = [raw(1), raw(2), raw(3), raw(4), raw(5)];
const DOUBLING: [Row; 5] = [raw(4), raw(8), raw(16), raw(32), raw(64)];
const SCALED: [Row; 5] = [
    Row {
        payload_width: 2,
        offset: 0,
    },
    Row {
        payload_width: 3,
        offset: 4,
    },
    Row {
        payload_width: 8,
        offset: 12,
    },
    raw(16),
    raw(64),
];

/// The three fixed ZLE variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZleScheme {
    /// Payload widths 1 to 5
    Micro,
    /// Payload widths 4, 8, 16, 32, 64
    Doubling,
    /// Offset ranges for small values, raw 16/64-bit payloads beyond
    #[default]
    Scaled,
}

impl ZleScheme {
    fn table(self) -> &'static [Row; 5] {
        match self {
            ZleScheme::Micro => &MICRO,
            ZleScheme::Doubling => &DOUBLING,
            ZleScheme::Scaled => &SCALED,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ZleScheme::Micro => "micro",
            ZleScheme::Doubling => "doubling",
            ZleScheme::Scaled => "scaled",
        }
    }

    /// Payload width selected by `key`
    pub fn width_for_key(self, key: ZleKey) -> usize {
        self.table()[key.row()].payload_width
    }

    /// Key announcing a payload of exactly `width` bits
    pub fn key_for_width(self, width: usize) -> Result<ZleKey> {
        ZleKey::all()
            .iter()
            .copied()
            .find(|&key| self.width_for_key(key) == width)
            .ok_or_else(|| {
                BitError::width(width, format!("no {} row carries this width", self.name()))
            })
    }

    /// Largest value the scheme can represent
    pub fn max_value(self) -> u64 {
        match self {
            ZleScheme::Micro => (1 << 5) - 1,
            ZleScheme::Doubling | ZleScheme::Scaled => u64::MAX,
        }
    }

    /// Pick the smallest row able to carry `value`
    fn row_for_value(self, value: u64) -> Result<ZleKey> {
        let needed = (64 - value.leading_zeros() as usize).max(1);
        ZleKey::all()
            .iter()
            .copied()
            .find(|&key| {
                let row = self.table()[key.row()];
                value >= row.offset && fits(value - row.offset, row.payload_width)
            })
            .ok_or_else(|| {
                BitError::width(
                    needed,
                    format!("value {value} exceeds the {} scheme", self.name()),
                )
            })
    }

    /// Key plus payload for `value`
    pub fn encode(self, value: u64) -> Result<BitSequence> {
        let key = self.row_for_value(value)?;
        let row = self.table()[key.row()];
        let mut out = BitSequence::from_bits(key.bits())?;
        out.append(&BitSequence::from_u64(value - row.offset, row.payload_width)?)?;
        Ok(out)
    }

    /// Bits `encode(value)` would produce
    pub fn encoded_len(self, value: u64) -> Result<usize> {
        let key = self.row_for_value(value)?;
        Ok(key.bits().len() + self.width_for_key(key))
    }

    /// Consume one key and its payload from the head of `reader`
    pub fn decode(self, reader: &mut BitReader) -> Result<u64> {
        let key = ZleKey::read(reader)?;
        let row = self.table()[key.row()];
        let payload = reader.read_u64(row.payload_width)?;
        payload
            .checked_add(row.offset)
            .ok_or_else(|| BitError::InvalidKey("payload overflows its row".to_string()))
    }
}

#[inline]
fn fits(value: u64, width: usize) -> bool {
    width >= 64 || value >> width == 0
}

impl std::str::FromStr for ZleScheme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "micro" => Ok(ZleScheme::Micro),
            "doubling" => Ok(ZleScheme::Doubling),
            "scaled" => Ok(ZleScheme::Scaled),
            other => Err(format!("unknown ZLE scheme: {other}")),
        }
    }
}

impl std::fmt::Display for ZleScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
