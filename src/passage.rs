// SPDX-License-Identifier: MIT
//! Passage: midpoint bisection and its exact inverse
//!
//! `bisect` walks a target down from `initial_width` to `delta_width`,
//! recording at each width `i` whether the running value lies below the
//! pivot `2^(i-1)` and keeping only its distance from the pivot. `perform`
//! replays those sign bits from the tail of the signature:
//!
//! ```text
//! sign = 1:  delta = midpoint(i) - delta
//! sign = 0:  delta = midpoint(i) + delta
//! ```
//!
//! for `i` in `delta_width + 1 ..= initial_width`. There is no recovery path;
//! a mismatch between the two directions is a defect.

use num_bigint::{BigInt, BigUint};
use tracing::debug;

use crate::bit::Bit;
use crate::config::CodecConfig;
use crate::error::{BitError, Result};
use crate::reader::BitReader;
use crate::sequence::BitSequence;
use crate::synthesis::midpoint_value;

/// Everything needed to recover a target from its bisection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    /// Sign bits, widest pivot first
    pub signature: BitSequence,
    /// Distance from the last pivot, in `[0, 2^delta_width]`
    ///
    /// The upper bound is inclusive, so storing the delta takes
    /// `delta_width + 1` bits.
    pub delta: BigUint,
    /// Width at which bisection stopped
    pub delta_width: usize,
    /// Width the target was bisected from
    pub initial_width: usize,
}

impl Movement {
    pub fn new(
        signature: BitSequence,
        delta: BigUint,
        delta_width: usize,
        initial_width: usize,
    ) -> Self {
        Self {
            signature,
            delta,
            delta_width,
            initial_width,
        }
    }

    /// Number of pivots between the two widths
    pub fn depth(&self) -> usize {
        self.initial_width.saturating_sub(self.delta_width)
    }

    /// Signature bits plus the bits of the delta
    pub fn encoded_bits(&self) -> usize {
        self.signature.width() + self.delta.bits() as usize
    }
}

/// Bisection encoder and reconstruction
#[derive(Debug, Clone, Copy, Default)]
pub struct Passage {
    config: CodecConfig,
}

impl Passage {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Bisect `target` from `initial_width` down to `delta_width`
    pub fn bisect(
        &self,
        target: &BigUint,
        initial_width: usize,
        delta_width: usize,
    ) -> Result<Movement> {
        self.check_widths(initial_width, delta_width)?;
        let target_bits = target.bits() as usize;
        if target_bits > initial_width {
            return Err(BitError::width(
                initial_width,
                format!("target needs {target_bits} bits"),
            ));
        }

        let mut signature = BitSequence::with_limit(self.config.max_members);
        let mut value = target.clone();
        for i in (delta_width + 1..=initial_width).rev() {
            let pivot = midpoint_value(i);
            if value < pivot {
                signature.append_bit(Bit::One)?;
                value = pivot - value;
            } else {
                signature.append_bit(Bit::Zero)?;
                value -= pivot;
            }
        }

        debug!(
            initial_width,
            delta_width,
            delta_bits = value.bits(),
            "bisected"
        );

        Ok(Movement::new(signature, value, delta_width, initial_width))
    }

    /// Recover the target of `movement` as an `initial_width`-bit sequence
    pub fn perform(&self, movement: &Movement) -> Result<BitSequence> {
        let target = self.perform_integer(movement)?;
        BitSequence::from_integer_width(&target, movement.initial_width)
    }

    pub fn perform_integer(&self, movement: &Movement) -> Result<BigUint> {
        self.check_widths(movement.initial_width, movement.delta_width)?;

        let needed = movement.depth();
        let available = movement.signature.width();
        if available < needed {
            return Err(BitError::range(0, needed, available));
        }

        let mut reader = BitReader::new(&movement.signature);
        let mut delta = BigInt::from(movement.delta.clone());
        for i in movement.delta_width + 1..=movement.initial_width {
            let pivot = BigInt::from(midpoint_value(i));
            delta = if reader.pop_tail_bit()?.is_one() {
                pivot - delta
            } else {
                pivot + delta
            };
        }

        debug!(
            initial_width = movement.initial_width,
            delta_width = movement.delta_width,
            "performed passage"
        );

        delta.to_biguint().ok_or(BitError::Underflow)
    }

    fn check_widths(&self, initial_width: usize, delta_width: usize) -> Result<()> {
        if initial_width > self.config.max_passage {
            return Err(BitError::IndexLimitExceeded {
                index_width: initial_width,
                max_passage: self.config.max_passage,
            });
        }
        if delta_width > initial_width {
            return Err(BitError::width(
                delta_width,
                format!("delta width exceeds initial width {initial_width}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage() -> Passage {
        Passage::new(CodecConfig::default())
    }

    #[test]
    fn test_bisect_concrete() {
        // 6 at width 3: 6 >= 4 -> 2, 2 >= 2 -> 0, 0 < 1 -> 1
        let movement = passage().bisect(&BigUint::from(6u32), 3, 0).unwrap();
        assert_eq!(movement.signature.to_string(), "001");
        assert_eq!(movement.delta, BigUint::from(1u32));
        assert_eq!(movement.depth(), 3);
        assert_eq!(movement.encoded_bits(), 4);
    }

    #[test]
    fn test_perform_concrete() {
        let movement = Movement::new("001".parse().unwrap(), BigUint::from(1u32), 0, 3);
        let target = passage().perform(&movement).unwrap();
        assert_eq!(target.to_string(), "110");
    }

    #[test]
    fn test_round_trip_exhaustive_small() {
        let p = passage();
        for initial_width in 1..=7 {
            for delta_width in 0..=initial_width {
                for t in 0u32..(1 << initial_width) {
                    let target = BigUint::from(t);
                    let movement = p.bisect(&target, initial_width, delta_width).unwrap();
                    assert_eq!(movement.signature.width(), initial_width - delta_width);
                    assert_eq!(p.perform_integer(&movement).unwrap(), target);
                }
            }
        }
    }

    #[test]
    fn test_delta_reaches_inclusive_bound() {
        // 0 at width 3: 0 < 4 -> 4, 4 >= 2 -> 2
        let movement = passage().bisect(&BigUint::from(0u32), 3, 1).unwrap();
        assert_eq!(movement.delta, BigUint::from(2u32));
        assert_eq!(movement.delta.bits(), 2);
        assert_eq!(passage().perform_integer(&movement).unwrap(), BigUint::from(0u32));

        let p = passage();
        for initial_width in 1..=6 {
            for delta_width in 0..=initial_width {
                let bound = BigUint::from(1u32) << delta_width;
                for t in 0u32..(1 << initial_width) {
                    let movement = p.bisect(&BigUint::from(t), initial_width, delta_width).unwrap();
                    assert!(movement.delta <= bound);
                }
            }
        }
    }

    #[test]
    fn test_extra_head_bits_are_ignored() {
        let p = passage();
        let mut movement = p.bisect(&BigUint::from(13u32), 4, 1).unwrap();
        movement.signature.prepend_bits(&[Bit::One, Bit::One]).unwrap();
        assert_eq!(p.perform_integer(&movement).unwrap(), BigUint::from(13u32));
    }

    #[test]
    fn test_short_signature() {
        let movement = Movement::new("0".parse().unwrap(), BigUint::from(0u32), 0, 3);
        assert!(matches!(
            passage().perform(&movement),
            Err(BitError::Range { .. })
        ));
    }

    #[test]
    fn test_width_errors() {
        let p = passage();
        assert!(matches!(
            p.bisect(&BigUint::from(9u32), 3, 0),
            Err(BitError::Width { .. })
        ));
        assert!(matches!(
            p.bisect(&BigUint::from(1u32), 3, 4),
            Err(BitError::Width { .. })
        ));

        let tight = Passage::new(CodecConfig::default().with_max_passage(8));
        assert!(matches!(
            tight.bisect(&BigUint::from(1u32), 9, 0),
            Err(BitError::IndexLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_corrupt_signature_underflows() {
        // sign 1 at width 1 with a delta of 5: 1 - 5
        let movement = Movement::new("1".parse().unwrap(), BigUint::from(5u32), 0, 1);
        assert_eq!(
            passage().perform_integer(&movement),
            Err(BitError::Underflow)
        );
    }
}
