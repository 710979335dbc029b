// SPDX-License-Identifier: MIT
//! Approximation engine
//!
//! Narrows the gap between a fixed target and a running value by adding or
//! subtracting trailing-zero corrections `(2^dark - 1) * 2^light`. Every
//! refinement step writes one record to the signature:
//!
//! ```text
//! sign (1 bit) | ZLE(dark) | ZLE(light)
//! ```
//!
//! The step whose winning `dark` is zero is the bailout. After it the
//! magnitude of the remaining delta is written in plain binary; its sign is
//! the bailout step's sign bit.
//!
//! The search in each step is exhaustive over `dark` descending and `light`
//! ascending, and a candidate replaces the current best when its absolute
//! delta is less than **or equal to** the best so far. Among equally good
//! corrections the last one scanned wins. Decoders depend on this order.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{Signed, ToPrimitive, Zero};
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::bit::Bit;
use crate::config::CodecConfig;
use crate::error::{BitError, Result};
use crate::reader::BitReader;
use crate::sequence::BitSequence;
use crate::synthesis::trailing_zeros_value;
use crate::writer::SignatureWriter;

/// One evaluated correction
#[derive(Debug, Clone)]
struct Candidate {
    dark: usize,
    light: usize,
    delta: BigInt,
    magnitude: BigUint,
}

impl Candidate {
    /// Tie-inclusive merge: `later` was scanned after `self`
    #[inline]
    fn or_later(self, later: Candidate) -> Candidate {
        if later.magnitude <= self.magnitude {
            later
        } else {
            self
        }
    }
}

/// Running approximation of a target integer
#[derive(Debug, Clone)]
pub struct Approximation {
    writer: SignatureWriter,
    target: BigUint,
    value: BigInt,
    delta: BigInt,
    bit_depth: usize,
    index_width: usize,
    steps: usize,
    config: CodecConfig,
}

impl Approximation {
    /// Start approximating `target` from zero with corrections up to
    /// `index_width` bits wide
    pub fn new(target: BigUint, index_width: usize, config: CodecConfig) -> Self {
        let bit_depth = target.bits() as usize;
        let delta = BigInt::from(target.clone());
        Self {
            writer: SignatureWriter::with_sequence(
                BitSequence::with_limit(config.max_members),
                config.scheme,
            ),
            target,
            value: BigInt::zero(),
            delta,
            bit_depth,
            index_width,
            steps: 0,
            config,
        }
    }

    /// Approximate the integer held by `target`, using its width as IndexWidth
    pub fn for_sequence(target: &BitSequence, config: CodecConfig) -> Self {
        Self::new(target.as_integer(), target.width(), config)
    }

    pub fn signature(&self) -> &BitSequence {
        self.writer.signature()
    }

    pub fn target(&self) -> &BigUint {
        &self.target
    }

    pub fn value(&self) -> &BigInt {
        &self.value
    }

    /// `target - value`
    pub fn delta(&self) -> &BigInt {
        &self.delta
    }

    /// Bit length of the target
    pub fn bit_depth(&self) -> usize {
        self.bit_depth
    }

    pub fn index_width(&self) -> usize {
        self.index_width
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Perform one refinement step and return the winning `dark` index
    ///
    /// The returned stride is the `position` for the next call; zero means no
    /// correction improves the delta at this depth.
    pub fn refine(&mut self, position: usize) -> Result<usize> {
        if self.index_width > self.config.max_passage {
            return Err(BitError::IndexLimitExceeded {
                index_width: self.index_width,
                max_passage: self.config.max_passage,
            });
        }

        let sign = Bit::from(self.delta.is_negative());
        let width = self.index_width - position.min(self.index_width);
        let best = self.search(sign, width);

        self.writer.write_record(sign, best.dark as u64, best.light as u64)?;

        self.value = BigInt::from(self.target.clone()) - &best.delta;
        self.delta = best.delta;
        self.steps += 1;

        trace!(
            step = self.steps,
            position,
            width,
            dark = best.dark,
            light = best.light,
            delta_bits = self.delta.bits(),
            "refined"
        );

        Ok(best.dark)
    }

    /// Refine until bailout, then append the final delta
    pub fn encode(mut self) -> Result<Encoding> {
        let mut position = 0;
        loop {
            let stride = self.refine(position)?;
            if stride == 0 {
                break;
            }
            position = stride;
        }

        let signature_bits = self.writer.width();
        let magnitude = self.delta.magnitude().clone();
        self.writer.write_delta(&magnitude)?;

        let stats = EncodingStats {
            target_bits: self.bit_depth,
            signature_bits,
            delta_bits: magnitude.bits() as usize,
            steps: self.steps,
        };

        debug!(
            target_bits = stats.target_bits,
            signature_bits = stats.signature_bits,
            delta_bits = stats.delta_bits,
            steps = stats.steps,
            bit_drop = stats.bit_drop(),
            "encoded"
        );

        Ok(Encoding {
            signature: self.writer.finish(),
            stats,
        })
    }

    /// Replay a signature produced by [`encode`](Self::encode)
    ///
    /// `config` must carry the same ZLE scheme the encoder used.
    pub fn decode(signature: &BitSequence, config: &CodecConfig) -> Result<BitSequence> {
        let target = Self::decode_integer(signature, config)?;
        BitSequence::from_integer(&target)
    }

    pub fn decode_integer(signature: &BitSequence, config: &CodecConfig) -> Result<BigUint> {
        let mut reader = BitReader::new(signature);
        let mut value = BigInt::zero();
        let mut steps = 0usize;

        let sign = loop {
            let sign = reader.read_bit()?;
            let dark = read_index(&mut reader, config)?;
            let light = read_index(&mut reader, config)?;
            let correction = BigInt::from(trailing_zeros_value(dark, light));
            if sign.is_one() {
                value -= correction;
            } else {
                value += correction;
            }
            steps += 1;
            if dark == 0 {
                break sign;
            }
        };

        let magnitude = BigInt::from(reader.take_rest_integer()?);
        let target = if sign.is_one() {
            value - magnitude
        } else {
            value + magnitude
        };

        debug!(steps, signature_bits = signature.width(), "decoded");

        target.to_biguint().ok_or(BitError::Underflow)
    }

    /// Best correction over `dark < width`, `light < width`
    fn search(&self, sign: Bit, width: usize) -> Candidate {
        if width == 0 {
            return self.unchanged();
        }
        if self.config.parallel {
            return self.search_parallel(sign, width);
        }
        self.search_sequential(sign, width)
    }

    fn search_sequential(&self, sign: Bit, width: usize) -> Candidate {
        (0..width)
            .rev()
            .map(|dark| self.row_best(sign, dark, width))
            .reduce(Candidate::or_later)
            .unwrap_or_else(|| self.unchanged())
    }

    /// Rows on the rayon pool, merged in scan order
    #[cfg(feature = "parallel")]
    fn search_parallel(&self, sign: Bit, width: usize) -> Candidate {
        (0..width)
            .into_par_iter()
            .rev()
            .map(|dark| self.row_best(sign, dark, width))
            .reduce_with(Candidate::or_later)
            .unwrap_or_else(|| self.unchanged())
    }

    /// Without the `parallel` feature the search is sequential
    #[cfg(not(feature = "parallel"))]
    fn search_parallel(&self, sign: Bit, width: usize) -> Candidate {
        self.search_sequential(sign, width)
    }

    /// Best candidate for one `dark` value, scanning `light` upward
    fn row_best(&self, sign: Bit, dark: usize, width: usize) -> Candidate {
        let mut correction = BigInt::from_biguint(Sign::Plus, trailing_zeros_value(dark, 0));
        let mut best: Option<Candidate> = None;

        for light in 0..width {
            let delta = if sign.is_one() {
                &self.delta + &correction
            } else {
                &self.delta - &correction
            };
            let candidate = Candidate {
                dark,
                light,
                magnitude: delta.magnitude().clone(),
                delta,
            };
            best = Some(match best {
                Some(current) => current.or_later(candidate),
                None => candidate,
            });
            correction <<= 1;
        }

        best.unwrap_or_else(|| self.unchanged())
    }

    fn unchanged(&self) -> Candidate {
        Candidate {
            dark: 0,
            light: 0,
            delta: self.delta.clone(),
            magnitude: self.delta.magnitude().clone(),
        }
    }
}

fn read_index(reader: &mut BitReader, config: &CodecConfig) -> Result<usize> {
    let raw = config.scheme.decode(reader)?;
    match raw.to_usize() {
        Some(index) if index <= config.max_passage => Ok(index),
        _ => Err(BitError::IndexLimitExceeded {
            index_width: raw.to_usize().unwrap_or(usize::MAX),
            max_passage: config.max_passage,
        }),
    }
}

/// Finished signature plus its accounting
#[derive(Debug, Clone)]
pub struct Encoding {
    pub signature: BitSequence,
    pub stats: EncodingStats,
}

/// Bit accounting for one encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingStats {
    /// Bit length of the raw target
    pub target_bits: usize,
    /// Signature bits before the trailing delta
    pub signature_bits: usize,
    /// Bits of the trailing delta
    pub delta_bits: usize,
    /// Refinement steps including the bailout
    pub steps: usize,
}

impl EncodingStats {
    /// `target_bits - (signature_bits + delta_bits)`; positive means savings
    pub fn bit_drop(&self) -> i64 {
        self.target_bits as i64 - (self.signature_bits + self.delta_bits) as i64
    }

    pub fn saves_bits(&self) -> bool {
        self.bit_drop() > 0
    }
}
