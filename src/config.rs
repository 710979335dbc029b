// SPDX-License-Identifier: MIT
//! Codec configuration
//!
//! Limits that would otherwise live in module-level state are carried here
//! and passed explicitly into the engines that need them.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::zle::ZleScheme;

/// Bit width of the host architecture, the ceiling for a single container
pub const ARCH_WIDTH: usize = usize::BITS as usize;

/// Default ceiling for IndexWidth
pub const DEFAULT_MAX_PASSAGE: usize = 4096;

/// Hard upper bound accepted by `validate`
pub const MAX_PASSAGE_CEILING: usize = 1 << 16;

/// Default maximum number of members in a sequence
pub const DEFAULT_MAX_MEMBERS: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest IndexWidth accepted by refinement and passage
    pub max_passage: usize,
    /// Largest member count a sequence may grow to
    pub max_members: usize,
    /// ZLE variant used for refinement indices
    pub scheme: ZleScheme,
    /// Run the refinement search on the rayon pool (needs the `parallel` feature)
    pub parallel: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_passage: DEFAULT_MAX_PASSAGE,
            max_members: DEFAULT_MAX_MEMBERS,
            scheme: ZleScheme::Scaled,
            parallel: false,
        }
    }
}

impl CodecConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_passage: env_or("BISECTION_MAX_PASSAGE", defaults.max_passage),
            max_members: env_or("BISECTION_MAX_MEMBERS", defaults.max_members),
            scheme: env_or("BISECTION_ZLE_SCHEME", defaults.scheme),
            parallel: env_or("BISECTION_PARALLEL", defaults.parallel),
        }
    }

    /// Builder-style override for the passage ceiling
    pub fn with_max_passage(mut self, max_passage: usize) -> Self {
        self.max_passage = max_passage;
        self
    }

    pub fn with_scheme(mut self, scheme: ZleScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_passage < 1 {
            return Err(ConfigError::TooSmall {
                name: "max_passage",
                min: 1,
                actual: self.max_passage,
            });
        }

        if self.max_passage > MAX_PASSAGE_CEILING {
            return Err(ConfigError::TooLarge {
                name: "max_passage",
                max: MAX_PASSAGE_CEILING,
                actual: self.max_passage,
            });
        }

        if self.max_members < 1 {
            return Err(ConfigError::TooSmall {
                name: "max_members",
                min: 1,
                actual: self.max_members,
            });
        }

        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Unparsable configuration value, using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CodecConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scheme, ZleScheme::Scaled);
        assert!(!config.parallel);
    }

    #[test]
    fn test_validate_rejects_zero_passage() {
        let config = CodecConfig::default().with_max_passage(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooSmall {
                name: "max_passage",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_huge_passage() {
        let config = CodecConfig::default().with_max_passage(MAX_PASSAGE_CEILING + 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_fallback_on_garbage() {
        std::env::set_var("BISECTION_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("BISECTION_TEST_GARBAGE", 7usize), 7);
        std::env::remove_var("BISECTION_TEST_GARBAGE");
    }

    #[test]
    fn test_env_missing_uses_default() {
        assert_eq!(env_or("BISECTION_TEST_UNSET_KEY", 42usize), 42);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: CodecConfig =
            serde_json::from_str(r#"{"max_passage": 64, "scheme": "micro"}"#).unwrap();
        assert_eq!(config.max_passage, 64);
        assert_eq!(config.scheme, ZleScheme::Micro);
        assert_eq!(config.max_members, DEFAULT_MAX_MEMBERS);
    }
}
