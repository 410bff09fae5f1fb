// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Errors produced while building factories and resolving descriptors.

use std::fmt;

/// Errors returned by descriptor resolution.
///
/// Every error is a synchronous failure of the call that produced it. Nothing is
/// retried in the background; callers decide whether to retry, skip the type, or
/// abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Factory built without an attribute registry, or with an invalid config.
    /// Fatal: the factory is never created.
    Configuration(String),

    // ========================================================================
    // Construction Errors
    // ========================================================================
    /// Classification or construction failed for a type. Nothing was inserted
    /// into the cache, so a later lookup may try again.
    Construction {
        /// Name of the type being constructed.
        type_name: &'static str,
        /// Why construction was refused.
        reason: String,
    },
    /// Nested resolution went deeper than the configured limit.
    DepthExceeded {
        /// Type whose lookup crossed the limit.
        type_name: &'static str,
        /// Configured limit.
        limit: usize,
    },

    // ========================================================================
    // Initialization Errors
    // ========================================================================
    /// A constructed descriptor failed to initialize. The entry (and every
    /// entry inserted by the same outermost lookup) was removed from the cache.
    Initialization {
        /// Name of the type whose initialization failed.
        type_name: &'static str,
        /// Underlying failure (usually a nested lookup error).
        source: Box<DescriptorError>,
    },
}

impl DescriptorError {
    pub(crate) fn construction(type_name: &'static str, reason: impl Into<String>) -> Self {
        Self::Construction {
            type_name,
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors raised before the descriptor reached the cache.
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::Construction { .. } | Self::DepthExceeded { .. })
    }

    /// Returns `true` for errors raised while initializing a cached descriptor.
    pub fn is_initialization(&self) -> bool {
        matches!(self, Self::Initialization { .. })
    }

    /// Innermost error in an initialization chain.
    pub fn root_cause(&self) -> &DescriptorError {
        match self {
            Self::Initialization { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            Self::Construction { type_name, reason } => {
                write!(f, "Cannot construct descriptor for {}: {}", type_name, reason)
            }
            Self::DepthExceeded { type_name, limit } => write!(
                f,
                "Descriptor resolution for {} exceeded max depth {}",
                type_name, limit
            ),
            Self::Initialization { type_name, source } => {
                write!(f, "Cannot initialize descriptor for {}: {}", type_name, source)
            }
        }
    }
}

impl std::error::Error for DescriptorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Initialization { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Convenient alias for results using [`DescriptorError`].
pub type Result<T> = core::result::Result<T, DescriptorError>;
