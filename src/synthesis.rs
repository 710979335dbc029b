// SPDX-License-Identifier: MIT
//! Synthesis engine
//!
//! Canonical bit patterns used as the vocabulary of corrections. Each
//! pattern has a sequence form and, where the search needs it, an integer
//! twin that skips materializing bits.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::bit::Bit;
use crate::error::{BitError, Result};
use crate::sequence::BitSequence;

/// `n` one bits
pub fn ones(n: usize) -> Result<BitSequence> {
    BitSequence::from_bits(&vec![Bit::One; n])
}

/// `n` zero bits
pub fn zeros(n: usize) -> Result<BitSequence> {
    BitSequence::from_bits(&vec![Bit::Zero; n])
}

/// `pattern` repeated and cut to exactly `n` bits
pub fn repeating(pattern: &BitSequence, n: usize) -> Result<BitSequence> {
    if n == 0 {
        return Ok(BitSequence::new());
    }
    let unit = pattern.to_bit_vec();
    if unit.is_empty() {
        return Err(BitError::width(0, "cannot repeat an empty pattern"));
    }
    let bits: Vec<Bit> = unit.iter().copied().cycle().take(n).collect();
    BitSequence::from_bits(&bits)
}

/// Bisection pivot for width `n`: a one followed by `n - 1` zeros
pub fn midpoint(n: usize) -> Result<BitSequence> {
    if n == 0 {
        return Err(BitError::width(0, "midpoint needs a positive width"));
    }
    let mut out = ones(1)?;
    out.append(&zeros(n - 1)?)?;
    Ok(out)
}

/// `2^(n-1)`; zero for `n == 0`
pub fn midpoint_value(n: usize) -> BigUint {
    if n == 0 {
        return BigUint::zero();
    }
    BigUint::one() << (n - 1)
}

/// `dark` ones followed by `light` zeros
pub fn trailing_zeros(dark: usize, light: usize) -> Result<BitSequence> {
    let mut out = ones(dark)?;
    out.append(&zeros(light)?)?;
    Ok(out)
}

/// `(2^dark - 1) * 2^light`
pub fn trailing_zeros_value(dark: usize, light: usize) -> BigUint {
    ((BigUint::one() << dark) - BigUint::one()) << light
}

/// `floor((2^width - 1) * index / resolution)` as a `width`-bit pattern
///
/// `index` is clamped into `[0, resolution]`.
pub fn subdivided(width: usize, index: u64, resolution: u64) -> Result<BitSequence> {
    let value = subdivided_value(width, index, resolution)?;
    BitSequence::from_integer_width(&value, width)
}

fn subdivided_value(width: usize, index: u64, resolution: u64) -> Result<BigUint> {
    if resolution == 0 {
        return Err(BitError::width(0, "resolution must be positive"));
    }
    let index = index.min(resolution);
    let span = (BigUint::one() << width) - BigUint::one();
    Ok(span * BigUint::from(index) / BigUint::from(resolution))
}

/// Index whose subdivided value is nearest `target`, rounding toward zero,
/// together with that subdivided pattern
pub fn approximate(target: &BigUint, width: usize, resolution: u64) -> Result<(u64, BitSequence)> {
    if width == 0 {
        return Err(BitError::width(0, "cannot subdivide an empty range"));
    }
    if resolution == 0 {
        return Err(BitError::width(0, "resolution must be positive"));
    }
    let span = (BigUint::one() << width) - BigUint::one();
    // largest i with floor(span * i / resolution) <= target
    let raw = ((target + 1u32) * BigUint::from(resolution) - 1u32) / span;
    let index = raw.to_u64().unwrap_or(resolution).min(resolution);
    Ok((index, subdivided(width, index, resolution)?))
}
