// SPDX-License-Identifier: MIT
//! Signature writer
//!
//! Appends the three kinds of records a signature is made of: sign bits,
//! ZLE-keyed correction indices, and the trailing binary delta.

use num_bigint::BigUint;

use crate::bit::Bit;
use crate::error::Result;
use crate::sequence::BitSequence;
use crate::zle::ZleScheme;

/// Builder for signatures
#[derive(Debug, Clone)]
pub struct SignatureWriter {
    signature: BitSequence,
    scheme: ZleScheme,
    sign_bits: usize,
    index_bits: usize,
}

impl SignatureWriter {
    pub fn new(scheme: ZleScheme) -> Self {
        Self::with_sequence(BitSequence::new(), scheme)
    }

    /// Continue writing onto an existing sequence
    pub fn with_sequence(signature: BitSequence, scheme: ZleScheme) -> Self {
        Self {
            signature,
            scheme,
            sign_bits: 0,
            index_bits: 0,
        }
    }

    pub fn scheme(&self) -> ZleScheme {
        self.scheme
    }

    pub fn write_sign(&mut self, sign: Bit) -> Result<()> {
        self.signature.append_bit(sign)?;
        self.sign_bits += 1;
        Ok(())
    }

    /// Write `index` as a ZLE key followed by its payload
    pub fn write_index(&mut self, index: u64) -> Result<()> {
        let encoded = self.scheme.encode(index)?;
        self.index_bits += encoded.width();
        self.signature.append_bits(&encoded.to_bit_vec())
    }

    /// Write one refinement record: sign, then `dark` and `light` as ZLE indices
    ///
    /// Both indices are encoded before anything is appended, so a failed
    /// record leaves the signature untouched.
    pub fn write_record(&mut self, sign: Bit, dark: u64, light: u64) -> Result<()> {
        let dark = self.scheme.encode(dark)?;
        let light = self.scheme.encode(light)?;

        let mut record = Vec::with_capacity(1 + dark.width() + light.width());
        record.push(sign);
        record.extend(dark.bits());
        record.extend(light.bits());
        self.signature.append_bits(&record)?;

        self.sign_bits += 1;
        self.index_bits += dark.width() + light.width();
        Ok(())
    }

    /// Write the magnitude of the final delta in plain binary
    pub fn write_delta(&mut self, magnitude: &BigUint) -> Result<()> {
        let bits = BitSequence::from_integer(magnitude)?;
        self.signature.append_bits(&bits.to_bit_vec())
    }

    pub fn signature(&self) -> &BitSequence {
        &self.signature
    }

    pub fn width(&self) -> usize {
        self.signature.width()
    }

    /// Sign bits written through this writer
    pub fn sign_bits(&self) -> usize {
        self.sign_bits
    }

    /// Key and payload bits written through this writer
    pub fn index_bits(&self) -> usize {
        self.index_bits
    }

    pub fn finish(self) -> BitSequence {
        self.signature
    }
}
