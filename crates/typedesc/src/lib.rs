// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # typedesc - runtime type descriptors
//!
//! Resolves a runtime [`Type`] to a cached, reusable [`TypeDescriptor`] that
//! exposes a uniform shape contract: primitive, dictionary, collection, array,
//! nullable or object.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use typedesc::{MemberInfo, Reflect, ShapeCategory, TypeDescriptorFactory, TypeInfo};
//!
//! struct Sensor {
//!     id: u32,
//!     label: String,
//! }
//!
//! impl Reflect for Sensor {
//!     fn type_info() -> TypeInfo {
//!         TypeInfo::object(vec![
//!             MemberInfo::of::<u32>("id"),
//!             MemberInfo::of::<String>("label"),
//!         ])
//!     }
//! }
//!
//! let factory = TypeDescriptorFactory::global();
//! let by_name = factory.find_of::<HashMap<String, Sensor>>()?;
//! assert_eq!(by_name.category(), ShapeCategory::Dictionary);
//!
//! let value = by_name.as_dictionary().and_then(|d| d.value()).expect("initialized");
//! assert!(Arc::ptr_eq(&value, &factory.find_of::<Sensor>()?));
//! # Ok::<(), typedesc::DescriptorError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  TypeDescriptorFactory      find(type) -> Arc<TypeDescriptor>  |
//! |    re-entrant lock | append-only cache | rollback on failure   |
//! +---------------------------------------------------------------+
//! |  Classify / RuleClassifier  ordered ShapeRule list            |
//! |    primitive > dictionary > collection > array > nullable     |
//! |    > object                                                    |
//! +---------------------------------------------------------------+
//! |  TypeDescriptor             construct -> initialize            |
//! |  AttributeRegistry          type/member metadata               |
//! +---------------------------------------------------------------+
//! |  Type / TypeInfo / Reflect  runtime type identity and traits   |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for [`ShapeCategory`], [`ScalarKind`],
//!   [`Attribute`] and [`LookupStats`].

pub mod attributes;
pub mod classify;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod factory;
pub mod ty;

pub use attributes::{Attribute, AttributeRegistry, AttributeTable};
pub use classify::{
    category_of, is_array, is_collection, is_dictionary, is_nullable, is_primitive, Classify,
    RuleClassifier, ShapeCategory, ShapeRule, DEFAULT_RULES,
};
pub use config::FactoryConfig;
pub use descriptor::{
    ArrayDescriptor, CollectionDescriptor, DictionaryDescriptor, MemberDescriptor,
    NullableDescriptor, ObjectDescriptor, PrimitiveDescriptor, Shape, TypeDescriptor,
};
pub use error::{DescriptorError, Result};
pub use factory::{FactoryBuilder, LookupStats, TypeDescriptorFactory};
pub use ty::{
    ArrayTraits, KeyedTraits, MemberInfo, Reflect, ScalarKind, SequenceTraits, Type, TypeInfo,
};
