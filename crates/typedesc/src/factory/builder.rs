// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Builder for [`TypeDescriptorFactory`].

use super::TypeDescriptorFactory;
use crate::attributes::AttributeRegistry;
use crate::classify::{Classify, RuleClassifier};
use crate::config::FactoryConfig;
use crate::error::{DescriptorError, Result};
use std::sync::Arc;

/// Fluent configuration for a [`TypeDescriptorFactory`].
///
/// The attribute registry is mandatory; [`build`](Self::build) fails with
/// [`DescriptorError::Configuration`] without one.
///
/// ```rust
/// use std::sync::Arc;
/// use typedesc::{AttributeTable, FactoryConfig, TypeDescriptorFactory};
///
/// let factory = TypeDescriptorFactory::builder()
///     .attribute_registry(Arc::new(AttributeTable::new()))
///     .config(FactoryConfig::default().with_max_depth(32))
///     .build()?;
/// assert_eq!(factory.config().max_depth, 32);
///
/// assert!(TypeDescriptorFactory::builder().build().is_err());
/// # Ok::<(), typedesc::DescriptorError>(())
/// ```
#[derive(Default)]
pub struct FactoryBuilder {
    registry: Option<Arc<dyn AttributeRegistry>>,
    classifier: Option<Box<dyn Classify>>,
    config: Option<FactoryConfig>,
}

impl FactoryBuilder {
    /// Empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry forwarded to every descriptor.
    #[must_use]
    pub fn attribute_registry(mut self, registry: Arc<dyn AttributeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replace the default [`RuleClassifier`].
    #[must_use]
    pub fn classifier(mut self, classifier: impl Classify + 'static) -> Self {
        self.classifier = Some(Box::new(classifier));
        self
    }

    /// Replace the default [`FactoryConfig`].
    #[must_use]
    pub fn config(mut self, config: FactoryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the factory.
    ///
    /// # Errors
    ///
    /// [`DescriptorError::Configuration`] when no registry was supplied or the
    /// configuration is invalid.
    pub fn build(self) -> Result<TypeDescriptorFactory> {
        let registry = self.registry.ok_or_else(|| {
            DescriptorError::Configuration("attribute registry is required".to_string())
        })?;
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let classifier = self
            .classifier
            .unwrap_or_else(|| Box::new(RuleClassifier::default()));

        log::debug!(
            "[FactoryBuilder::build] max_depth={} initial_capacity={}",
            config.max_depth,
            config.initial_capacity
        );
        Ok(TypeDescriptorFactory::from_parts(
            registry, classifier, config,
        ))
    }
}
