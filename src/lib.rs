// SPDX-License-Identifier: MIT
//! # Bisection Codec
//!
//! Arbitrary-width bit containers and a bisection-based approximation codec.
//!
//! ## Overview
//!
//! A large binary value can often be described by a short signature of
//! directional and index bits plus a small residual, instead of being stored
//! verbatim. This crate provides the bit storage that makes that bookkeeping
//! exact and the two engines that produce and consume such signatures.
//!
//! ## Components
//!
//! - **Bit containers**: [`BitContainer`] holds whole bytes plus a sub-byte
//!   remainder, at most [`ARCH_WIDTH`] bits. [`BitSequence`] strings
//!   containers together into bit strings of any length and converts to and
//!   from arbitrary-precision integers.
//! - **Synthesis**: [`synthesis`] builds the canonical patterns (ones, zeros,
//!   repeating, midpoints, trailing-zero runs, linear subdivisions).
//! - **Approximation**: [`Approximation`] repeatedly picks the trailing-zero
//!   correction `(2^dark - 1) * 2^light` that best shrinks the residual and
//!   records it in the signature.
//! - **Passage**: [`Passage`] bisects a value against midpoints `2^(i-1)` and
//!   inverts that bisection exactly.
//! - **ZLE keys**: [`ZleScheme`] prefix codes keep the recorded indices short.
//!
//! ## Signature Layout
//!
//! ```text
//! Approximation signature
//! =======================
//!
//! Per refinement step:
//! - Sign: 1 bit, set when the residual was negative
//! - Dark index: ZLE key + payload
//! - Light index: ZLE key + payload
//!
//! After the bailout step (dark index 0):
//! - |residual| in plain binary, most significant bit first
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use bisection_codec::{Approximation, BitSequence, CodecConfig, Passage};
//!
//! let config = CodecConfig::default();
//! let target: BitSequence = "1011_0110_1110_0101".parse().unwrap();
//!
//! // Approximation round trip
//! let encoding = Approximation::for_sequence(&target, config).encode().unwrap();
//! let decoded = Approximation::decode(&encoding.signature, &config).unwrap();
//! assert_eq!(decoded.as_integer(), target.as_integer());
//! println!("bit drop: {}", encoding.stats.bit_drop());
//!
//! // Midpoint bisection round trip
//! let passage = Passage::new(config);
//! let movement = passage.bisect(&target.as_integer(), target.width(), 4).unwrap();
//! let recovered = passage.perform(&movement).unwrap();
//! assert!(recovered.same_bits(&target));
//! ```
//!
//! ## Errors
//!
//! Every failure is reported through [`BitError`] at the point it is
//! detected. Nothing is retried or repaired internally.

pub mod approximation;
pub mod bit;
pub mod config;
pub mod container;
pub mod error;
pub mod passage;
pub mod reader;
pub mod sequence;
pub mod synthesis;
pub mod writer;
pub mod zle;

// Re-export main types
pub use approximation::{Approximation, Encoding, EncodingStats};
pub use bit::{Bit, Byte, Resizable};
pub use config::{CodecConfig, ARCH_WIDTH, DEFAULT_MAX_MEMBERS, DEFAULT_MAX_PASSAGE};
pub use container::{BitContainer, Payload};
pub use error::{BitError, ConfigError, Result};
pub use passage::{Movement, Passage};
pub use reader::BitReader;
pub use sequence::BitSequence;
pub use writer::SignatureWriter;
pub use zle::{ZleKey, ZleScheme};
