// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Memoizing descriptor factory.
//!
//! [`TypeDescriptorFactory::find`] returns one descriptor instance per type for
//! the lifetime of the factory. On a miss the factory classifies the type,
//! inserts the constructed descriptor into the cache, then initializes it.
//! Inserting first is what lets a recursive type find itself during its own
//! initialization instead of rebuilding forever.
//!
//! # Locking
//!
//! The whole miss path (classify, insert, initialize) runs under a single
//! re-entrant lock per factory, so construction is serialized across threads
//! while nested lookups from the initializing thread go straight through. Hits
//! take the same lock.
//!
//! ```text
//!  find(Node)                       lock (depth 1)
//!    classify Node -> Object        insert Node [constructed]
//!    initialize Node
//!      find(Vec<Node>)              lock (depth 2)
//!        classify -> Collection     insert Vec<Node> [constructed]
//!        initialize Vec<Node>
//!          find(Node)               hit -> Node [constructed]
//!        Vec<Node> [initialized]
//!    Node [initialized]             unlock
//! ```
//!
//! # Failures
//!
//! Construction failures insert nothing. Initialization failures remove every
//! entry inserted since the failing lookup started, so a later lookup starts
//! from scratch and no half-built descriptor is ever served.

mod builder;

pub use builder::FactoryBuilder;

use crate::attributes::{AttributeRegistry, AttributeTable};
use crate::classify::Classify;
use crate::config::FactoryConfig;
use crate::descriptor::TypeDescriptor;
use crate::error::{DescriptorError, Result};
use crate::ty::{Reflect, Type};
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LookupStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that had to construct a descriptor.
    pub misses: u64,
    /// Lookups (nested ones included) that returned an error.
    pub failures: u64,
    /// Cache entries removed after failed initialization.
    pub rolled_back: u64,
    /// Duration of the last successful construction.
    pub last_miss_ns: u64,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<Type, Arc<TypeDescriptor>>,
    /// Types inserted by the lookup in progress, in insertion order.
    journal: Vec<Type>,
    /// Nesting of in-progress misses on the lock-holding thread.
    depth: usize,
    stats: LookupStats,
}

impl CacheState {
    fn hit(&mut self, ty: &Type) -> Option<Arc<TypeDescriptor>> {
        let hit = self.entries.get(ty).map(Arc::clone);
        if hit.is_some() {
            self.stats.hits = self.stats.hits.saturating_add(1);
        }
        hit
    }

    fn rollback(&mut self, mark: usize) -> usize {
        let removed: Vec<Type> = self.journal.drain(mark..).collect();
        for ty in &removed {
            self.entries.remove(ty);
        }
        self.stats.rolled_back = self.stats.rolled_back.saturating_add(removed.len() as u64);
        removed.len()
    }
}

type CacheGuard<'a> = ReentrantMutexGuard<'a, RefCell<CacheState>>;

/// One level of an in-progress miss. Dropping it without `commit` rolls back
/// whatever was inserted since it started, including on unwind.
struct Nesting<'g, 'a> {
    guard: &'g CacheGuard<'a>,
    ty: Type,
    mark: usize,
    committed: bool,
}

impl Nesting<'_, '_> {
    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Nesting<'_, '_> {
    fn drop(&mut self) {
        let mut state = self.guard.borrow_mut();
        if !self.committed {
            state.stats.failures = state.stats.failures.saturating_add(1);
            let removed = state.rollback(self.mark);
            if removed > 0 {
                log::warn!(
                    "[TypeDescriptorFactory::find] lookup of {} failed, rolled back {} cached descriptor(s)",
                    self.ty,
                    removed
                );
            }
        }
        state.depth -= 1;
        if state.depth == 0 {
            state.journal.clear();
        }
    }
}

/// Thread-safe, memoizing source of [`TypeDescriptor`]s.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use typedesc::{AttributeTable, ShapeCategory, Type, TypeDescriptorFactory};
///
/// let factory = TypeDescriptorFactory::new(Arc::new(AttributeTable::new()));
///
/// let list = factory.find(Type::of::<Vec<i32>>())?.expect("some type");
/// assert_eq!(list.category(), ShapeCategory::Collection);
///
/// let int = factory.find(Type::of::<i32>())?.expect("some type");
/// let element = list.as_collection().and_then(|c| c.element()).expect("initialized");
/// assert!(Arc::ptr_eq(&element, &int));
///
/// assert!(factory.find(None)?.is_none());
/// # Ok::<(), typedesc::DescriptorError>(())
/// ```
pub struct TypeDescriptorFactory {
    registry: Arc<dyn AttributeRegistry>,
    classifier: Box<dyn Classify>,
    config: FactoryConfig,
    cache: ReentrantMutex<RefCell<CacheState>>,
}

impl TypeDescriptorFactory {
    /// Factory over `registry` with the default classifier and configuration.
    pub fn new(registry: Arc<dyn AttributeRegistry>) -> Self {
        Self::from_parts(
            registry,
            Box::new(crate::classify::RuleClassifier::default()),
            FactoryConfig::default(),
        )
    }

    /// Factory over an optional registry.
    ///
    /// # Errors
    ///
    /// [`DescriptorError::Configuration`] if `registry` is `None`.
    pub fn try_new(registry: Option<Arc<dyn AttributeRegistry>>) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(registry) = registry {
            builder = builder.attribute_registry(registry);
        }
        builder.build()
    }

    /// Start configuring a factory.
    pub fn builder() -> FactoryBuilder {
        FactoryBuilder::new()
    }

    /// Process-wide factory over [`AttributeTable::global`].
    pub fn global() -> &'static TypeDescriptorFactory {
        static GLOBAL_FACTORY: OnceLock<TypeDescriptorFactory> = OnceLock::new();
        GLOBAL_FACTORY.get_or_init(|| TypeDescriptorFactory::new(AttributeTable::global().clone()))
    }

    pub(crate) fn from_parts(
        registry: Arc<dyn AttributeRegistry>,
        classifier: Box<dyn Classify>,
        config: FactoryConfig,
    ) -> Self {
        let state = CacheState {
            entries: HashMap::with_capacity(config.initial_capacity),
            ..CacheState::default()
        };
        Self {
            registry,
            classifier,
            config,
            cache: ReentrantMutex::new(RefCell::new(state)),
        }
    }

    /// Registry forwarded to every descriptor this factory builds.
    pub fn attribute_registry(&self) -> &Arc<dyn AttributeRegistry> {
        &self.registry
    }

    /// Active configuration.
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Descriptor for `ty`, or `None` when `ty` is `None`.
    ///
    /// A `None` type returns immediately without touching the cache.
    ///
    /// # Errors
    ///
    /// - [`DescriptorError::Construction`] / [`DescriptorError::DepthExceeded`]:
    ///   nothing was cached; a later call may retry.
    /// - [`DescriptorError::Initialization`]: the descriptor was cached then
    ///   removed again.
    pub fn find(&self, ty: impl Into<Option<Type>>) -> Result<Option<Arc<TypeDescriptor>>> {
        match ty.into() {
            Some(ty) => self.resolve(ty).map(Some),
            None => Ok(None),
        }
    }

    /// Descriptor for `T`.
    pub fn find_of<T: Reflect>(&self) -> Result<Arc<TypeDescriptor>> {
        self.resolve(Type::of::<T>())
    }

    /// Descriptor for `ty`.
    ///
    /// Called from a descriptor's own initialization this may return a
    /// descriptor that is still being initialized further up the stack.
    pub fn resolve(&self, ty: Type) -> Result<Arc<TypeDescriptor>> {
        let guard = self.cache.lock();

        let hit = guard.borrow_mut().hit(&ty);
        if let Some(descriptor) = hit {
            log::trace!("[TypeDescriptorFactory::find] hit {}", ty);
            return Ok(descriptor);
        }

        let mark = {
            let mut state = guard.borrow_mut();
            state.stats.misses = state.stats.misses.saturating_add(1);
            if state.depth >= self.config.max_depth {
                state.stats.failures = state.stats.failures.saturating_add(1);
                return Err(DescriptorError::DepthExceeded {
                    type_name: ty.name(),
                    limit: self.config.max_depth,
                });
            }
            state.depth += 1;
            state.journal.len()
        };
        let nesting = Nesting {
            guard: &guard,
            ty,
            mark,
            committed: false,
        };

        let start = Instant::now();
        let descriptor = self.build(&guard, ty)?;
        nesting.commit();

        let mut state = guard.borrow_mut();
        state.stats.last_miss_ns = start.elapsed().as_nanos() as u64;
        debug_assert!(state.depth > 0 || descriptor.is_initialized());
        Ok(descriptor)
    }

    fn build(&self, guard: &CacheGuard<'_>, ty: Type) -> Result<Arc<TypeDescriptor>> {
        let descriptor = match self.classifier.classify(ty, self) {
            Ok(descriptor) => Arc::new(descriptor),
            Err(err) => {
                log::debug!("[TypeDescriptorFactory::find] cannot construct {}: {}", ty, err);
                return Err(err);
            }
        };

        {
            let mut state = guard.borrow_mut();
            // A custom classifier may already have resolved `ty` through `find`.
            if let Some(existing) = state.entries.get(&ty) {
                return Ok(Arc::clone(existing));
            }
            state.entries.insert(ty, Arc::clone(&descriptor));
            state.journal.push(ty);
        }
        log::debug!(
            "[TypeDescriptorFactory::find] constructed {} descriptor for {}",
            descriptor.category(),
            ty
        );

        descriptor
            .initialize(self)
            .map_err(|source| DescriptorError::Initialization {
                type_name: ty.name(),
                source: Box::new(source),
            })?;
        log::debug!("[TypeDescriptorFactory::find] initialized {}", ty);
        Ok(descriptor)
    }

    /// Number of cached descriptors.
    pub fn len(&self) -> usize {
        self.cache.lock().borrow().entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `ty` has a cached descriptor.
    pub fn contains(&self, ty: Type) -> bool {
        self.cache.lock().borrow().entries.contains_key(&ty)
    }

    /// Types with a cached descriptor, in no particular order.
    pub fn cached_types(&self) -> Vec<Type> {
        self.cache.lock().borrow().entries.keys().copied().collect()
    }

    /// Snapshot of lookup statistics.
    pub fn stats(&self) -> LookupStats {
        self.cache.lock().borrow().stats
    }
}

impl Default for TypeDescriptorFactory {
    /// Factory over a fresh, empty [`AttributeTable`].
    fn default() -> Self {
        Self::new(Arc::new(AttributeTable::new()))
    }
}

impl fmt::Debug for TypeDescriptorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptorFactory")
            .field("cached", &self.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
