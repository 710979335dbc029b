// SPDX-License-Identifier: MIT
//! Error types shared by every layer of the codec
//!
//! All failures are fail-fast: nothing here is retried or absorbed, the
//! caller decides whether to shrink a width and try again.

use thiserror::Error;

/// Errors raised by containers, synthesis, approximation and passage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitError {
    /// A bit outside {0, 1} was supplied
    #[error("Invalid bit value: {0} (expected 0 or 1)")]
    Value(u64),

    /// A read or split fell outside the container
    #[error("Range [{low}, {high}) is invalid for width {width}")]
    Range {
        low: usize,
        high: usize,
        width: usize,
    },

    /// A zero or over-limit width was requested
    #[error("Invalid width {requested}: {reason}")]
    Width { requested: usize, reason: String },

    /// A fixed-width primitive was asked to pad or align itself
    #[error("Cannot resize fixed-width {0}")]
    StaticWidth(&'static str),

    /// IndexWidth above the configured passage ceiling
    #[error("Index width {index_width} exceeds max passage {max_passage}")]
    IndexLimitExceeded {
        index_width: usize,
        max_passage: usize,
    },

    /// A ZLE key matched no row of its table
    #[error("Invalid ZLE key: {0}")]
    InvalidKey(String),

    /// Reconstruction produced a negative target
    #[error("Reconstruction underflowed below zero")]
    Underflow,
}

impl BitError {
    pub(crate) fn width(requested: usize, reason: impl Into<String>) -> Self {
        BitError::Width {
            requested,
            reason: reason.into(),
        }
    }

    pub(crate) fn range(low: usize, high: usize, width: usize) -> Self {
        BitError::Range { low, high, width }
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, BitError>;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must be at least {min}, got {actual}")]
    TooSmall {
        name: &'static str,
        min: usize,
        actual: usize,
    },

    #[error("{name} must be at most {max}, got {actual}")]
    TooLarge {
        name: &'static str,
        max: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BitError::Value(2).to_string(),
            "Invalid bit value: 2 (expected 0 or 1)"
        );
        assert_eq!(
            BitError::range(4, 2, 8).to_string(),
            "Range [4, 2) is invalid for width 8"
        );
        assert_eq!(
            BitError::IndexLimitExceeded {
                index_width: 9000,
                max_passage: 4096
            }
            .to_string(),
            "Index width 9000 exceeds max passage 4096"
        );
    }

    #[test]
    fn test_width_helper() {
        let err = BitError::width(0, "width must be positive");
        assert!(matches!(err, BitError::Width { requested: 0, .. }));
    }
}
