// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Factory configuration.
//!
//! Constants below are the defaults; `FactoryConfig::default()` lets the
//! environment override them so deployments can tune a factory without a
//! rebuild:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `TYPEDESC_INITIAL_CAPACITY` | [`DEFAULT_INITIAL_CAPACITY`] |
//! | `TYPEDESC_MAX_DEPTH` | [`DEFAULT_MAX_DEPTH`] |

use crate::error::{DescriptorError, Result};

/// Number of cache slots allocated up front.
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Maximum nesting of `find` calls within one outermost lookup.
///
/// Recursive types terminate through the cache long before this; the limit only
/// catches pathological chains of distinct nested types.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Runtime configuration for a [`TypeDescriptorFactory`](crate::TypeDescriptorFactory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Cache pre-allocation.
    pub initial_capacity: usize,
    /// Maximum nested resolution depth (must be > 0).
    pub max_depth: usize,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: std::env::var("TYPEDESC_INITIAL_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_INITIAL_CAPACITY),
            max_depth: std::env::var("TYPEDESC_MAX_DEPTH")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|&depth| depth > 0)
                .unwrap_or(DEFAULT_MAX_DEPTH),
        }
    }
}

impl FactoryConfig {
    /// Set the cache pre-allocation.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the maximum nested resolution depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(DescriptorError::Configuration(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_depth_is_rejected() {
        let config = FactoryConfig::default().with_max_depth(0);
        assert!(matches!(
            config.validate(),
            Err(DescriptorError::Configuration(_))
        ));
    }

    #[test]
    fn builder_methods_override_defaults() {
        let config = FactoryConfig::default()
            .with_initial_capacity(8)
            .with_max_depth(3);
        assert_eq!(config.initial_capacity, 8);
        assert_eq!(config.max_depth, 3);
        assert!(config.validate().is_ok());
    }
}
