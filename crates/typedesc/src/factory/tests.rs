// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//! Tests for TypeDescriptorFactory.

use super::*;
use crate::attributes::Attribute;
use crate::classify::{RuleClassifier, ShapeCategory};
use crate::ty::{ArrayTraits, MemberInfo, TypeInfo};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;
use std::thread;

fn factory() -> TypeDescriptorFactory {
    TypeDescriptorFactory::new(Arc::new(AttributeTable::new()))
}

struct Node;

impl Reflect for Node {
    fn type_info() -> TypeInfo {
        TypeInfo::object(vec![
            MemberInfo::of::<String>("name"),
            MemberInfo::of::<Vec<Node>>("children"),
            MemberInfo::of::<Option<Box<[Node]>>>("siblings"),
        ])
    }
}

struct Broken;

impl Reflect for Broken {
    fn type_info() -> TypeInfo {
        TypeInfo::default().with_array(ArrayTraits {
            element: Type::of::<u8>(),
            length: 1,
            rank: 0,
        })
    }
}

struct Holder;

impl Reflect for Holder {
    fn type_info() -> TypeInfo {
        TypeInfo::object(vec![
            MemberInfo::of::<Vec<Holder>>("peers"),
            MemberInfo::of::<u32>("count"),
            MemberInfo::of::<Broken>("broken"),
        ])
    }
}

/// Counts classifications while delegating to the default rules.
struct CountingClassifier {
    inner: RuleClassifier,
    calls: Arc<AtomicUsize>,
}

impl Classify for CountingClassifier {
    fn classify(&self, ty: Type, factory: &TypeDescriptorFactory) -> Result<TypeDescriptor> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.classify(ty, factory)
    }
}

fn counting_factory() -> (TypeDescriptorFactory, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let factory = TypeDescriptorFactory::builder()
        .attribute_registry(Arc::new(AttributeTable::new()))
        .classifier(CountingClassifier {
            inner: RuleClassifier::new(),
            calls: Arc::clone(&calls),
        })
        .build()
        .expect("factory");
    (factory, calls)
}

#[test]
fn none_returns_none_without_touching_cache() {
    let factory = factory();
    assert!(factory.find(None).expect("find").is_none());
    assert!(factory.is_empty());
    assert_eq!(factory.stats(), LookupStats::default());
}

#[test]
fn cache_hit_and_miss_paths() {
    let (factory, calls) = counting_factory();
    let first = factory.find(Type::of::<i64>()).expect("find").expect("some");

    let stats = factory.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 0);

    let second = factory.find_of::<i64>().expect("find");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let stats = factory.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(factory.len(), 1);
}

#[test]
fn nested_types_are_cached_individually() {
    let factory = factory();
    let map = factory.find_of::<HashMapAlias>().expect("find");
    assert_eq!(map.category(), ShapeCategory::Dictionary);

    for ty in [Type::of::<String>(), Type::of::<Vec<u8>>(), Type::of::<u8>()] {
        assert!(factory.contains(ty), "{ty} cached");
    }
    assert_eq!(factory.len(), 4);
    assert_eq!(factory.cached_types().len(), 4);
}

type HashMapAlias = std::collections::HashMap<String, Vec<u8>>;

#[test]
fn self_referential_type_terminates() {
    let (factory, calls) = counting_factory();
    let node = factory.find_of::<Node>().expect("find");
    assert!(node.is_initialized());

    let object = node.as_object().expect("object shape");
    let children = object
        .member("children")
        .and_then(|m| m.descriptor())
        .expect("children bound");
    let element = children
        .as_collection()
        .and_then(|c| c.element())
        .expect("element bound");
    assert!(Arc::ptr_eq(&element, &node));
    assert!(children.is_initialized());

    // Node, String, Vec<Node>, Option<Box<[Node]>>, Box<[Node]>
    assert_eq!(calls.load(Ordering::SeqCst), 5);
    assert_eq!(factory.len(), 5);
    for ty in factory.cached_types() {
        let descriptor = factory.find(ty).expect("find").expect("some");
        assert!(descriptor.is_initialized(), "{ty} initialized");
    }
}

#[test]
fn construction_failure_caches_nothing_and_allows_retry() {
    let (factory, calls) = counting_factory();
    let err = factory.find_of::<Broken>().expect_err("rank 0");
    assert!(err.is_construction());
    assert!(factory.is_empty());

    let err = factory.find_of::<Broken>().expect_err("still rank 0");
    assert!(err.is_construction());
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let stats = factory.stats();
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.failures, 2);
    assert_eq!(stats.rolled_back, 0);
}

#[test]
fn initialization_failure_rolls_back_the_whole_lookup() {
    let factory = factory();
    let u32_before = factory.find_of::<u32>().expect("find");

    let err = factory.find_of::<Holder>().expect_err("broken member");
    assert!(err.is_initialization());
    assert!(matches!(
        err.root_cause(),
        DescriptorError::Construction { type_name, .. } if type_name.contains("Broken")
    ));

    // Holder and Vec<Holder> were cached in constructed state, then removed.
    assert!(!factory.contains(Type::of::<Holder>()));
    assert!(!factory.contains(Type::of::<Vec<Holder>>()));
    assert!(!factory.contains(Type::of::<Broken>()));
    // Entries from earlier lookups survive.
    let u32_after = factory.find_of::<u32>().expect("find");
    assert!(Arc::ptr_eq(&u32_before, &u32_after));
    assert_eq!(factory.len(), 1);
    assert_eq!(factory.stats().rolled_back, 2);

    // A retry starts from scratch and fails the same way.
    assert!(factory.find_of::<Holder>().expect_err("retry").is_initialization());
    assert_eq!(factory.len(), 1);

    // Removed descriptors are freed, not kept alive by their own links.
    assert_eq!(Arc::strong_count(&u32_after), 3);
    drop(u32_before);
    assert_eq!(Arc::strong_count(&u32_after), 2);
}

#[test]
fn recursive_graph_is_freed_with_the_factory() {
    let factory = factory();
    let node = factory.find_of::<Node>().expect("find");
    let children = node
        .as_object()
        .and_then(|o| o.member("children"))
        .and_then(|m| m.descriptor())
        .expect("children bound");
    let node_link = Arc::downgrade(&node);
    let children_link = Arc::downgrade(&children);
    drop(children);

    drop(factory);
    assert!(node_link.upgrade().is_some(), "caller still holds Node");
    assert!(children_link.upgrade().is_none());

    drop(node);
    assert!(node_link.upgrade().is_none());
}

/// Panics when asked to classify `u8`.
struct PanicsOnU8(RuleClassifier);

impl Classify for PanicsOnU8 {
    fn classify(&self, ty: Type, factory: &TypeDescriptorFactory) -> Result<TypeDescriptor> {
        if ty == Type::of::<u8>() {
            panic!("classifier failure for {ty}");
        }
        self.0.classify(ty, factory)
    }
}

#[test]
fn panic_during_lookup_rolls_back() {
    let factory = TypeDescriptorFactory::builder()
        .attribute_registry(Arc::new(AttributeTable::new()))
        .classifier(PanicsOnU8(RuleClassifier::new()))
        .build()
        .expect("factory");

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        factory.find_of::<Vec<u8>>()
    }));
    assert!(outcome.is_err());
    assert!(factory.is_empty());
    assert_eq!(factory.stats().failures, 2);
    assert_eq!(factory.stats().rolled_back, 1);

    // lock released and depth reset
    let list = factory.find_of::<Vec<u16>>().expect("find");
    assert!(list.is_initialized());
    assert_eq!(factory.len(), 2);
}

#[test]
fn depth_limit_is_enforced() {
    let factory = TypeDescriptorFactory::builder()
        .attribute_registry(Arc::new(AttributeTable::new()))
        .config(FactoryConfig::default().with_max_depth(2))
        .build()
        .expect("factory");

    assert!(factory.find_of::<Vec<u8>>().is_ok());

    let err = factory.find_of::<Vec<Vec<u16>>>().expect_err("three levels");
    assert!(matches!(
        err.root_cause(),
        DescriptorError::DepthExceeded { limit: 2, .. }
    ));
    assert!(!factory.contains(Type::of::<Vec<Vec<u16>>>()));
    assert!(!factory.contains(Type::of::<Vec<u16>>()));

    // cached levels do not count towards the limit
    assert!(factory.find_of::<Vec<u16>>().is_ok());
    assert!(factory.find_of::<Vec<Vec<u16>>>().is_ok());
}

#[test]
fn missing_registry_is_a_configuration_error() {
    assert!(matches!(
        TypeDescriptorFactory::builder().build(),
        Err(DescriptorError::Configuration(_))
    ));
    assert!(matches!(
        TypeDescriptorFactory::try_new(None),
        Err(DescriptorError::Configuration(_))
    ));
    let registry: Arc<dyn AttributeRegistry> = Arc::new(AttributeTable::new());
    assert!(TypeDescriptorFactory::try_new(Some(registry)).is_ok());
}

#[test]
fn invalid_config_is_a_configuration_error() {
    let result = TypeDescriptorFactory::builder()
        .attribute_registry(Arc::new(AttributeTable::new()))
        .config(FactoryConfig::default().with_max_depth(0))
        .build();
    assert!(matches!(result, Err(DescriptorError::Configuration(_))));
}

#[test]
fn registry_is_shared_with_descriptors() {
    let registry = Arc::new(AttributeTable::new());
    registry.register_type(Type::of::<Node>(), Attribute::DisplayName("Tree node".into()));
    let factory = TypeDescriptorFactory::new(registry.clone());

    let dyn_registry: Arc<dyn AttributeRegistry> = registry;
    assert!(Arc::ptr_eq(factory.attribute_registry(), &dyn_registry));
    assert_eq!(
        factory.find_of::<Node>().expect("find").display_name(),
        "Tree node"
    );
}

#[test]
fn concurrent_lookups_construct_once() {
    let (factory, calls) = counting_factory();
    let factory = Arc::new(factory);
    let barrier = Arc::new(Barrier::new(8));
    let mut handles = Vec::new();

    for _ in 0..8 {
        let factory = Arc::clone(&factory);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            factory.find_of::<Node>().expect("find")
        }));
    }

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread should succeed"))
        .collect();
    for descriptor in &results {
        assert!(Arc::ptr_eq(descriptor, &results[0]));
        assert!(descriptor.is_initialized());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 5);
    assert_eq!(factory.stats().misses, 5);
}

#[test]
fn concurrent_mixed_lookups_share_instances() {
    let factory = Arc::new(factory());
    let barrier = Arc::new(Barrier::new(6));
    let mut handles = Vec::new();

    for _ in 0..6 {
        let factory = Arc::clone(&factory);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..500 {
                let ty = match fastrand::usize(..4) {
                    0 => Type::of::<Node>(),
                    1 => Type::of::<HashMapAlias>(),
                    2 => Type::of::<[Option<u8>; 4]>(),
                    _ => Type::of::<String>(),
                };
                let descriptor = factory.find(ty).expect("find").expect("some");
                assert!(descriptor.is_initialized());
            }
        }));
    }
    for handle in handles {
        handle.join().expect("thread should succeed");
    }

    let stats = factory.stats();
    assert_eq!(stats.misses as usize, factory.len());
    assert!(stats.hits > stats.misses);
}

#[test]
fn global_factory_is_a_singleton() {
    let a = TypeDescriptorFactory::global();
    let b = TypeDescriptorFactory::global();
    assert!(std::ptr::eq(a, b));
    let first = a.find_of::<bool>().expect("find");
    let second = b.find_of::<bool>().expect("find");
    assert!(Arc::ptr_eq(&first, &second));
}
