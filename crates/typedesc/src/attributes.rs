// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Attribute registry: type- and member-level metadata consulted by descriptors.
//!
//! A factory holds exactly one [`AttributeRegistry`] for its lifetime and
//! forwards it to every descriptor it builds. Descriptors merge what the
//! registry reports with the attributes a type declares in its
//! [`TypeInfo`](crate::TypeInfo); they never drop members based on attributes.

use crate::ty::Type;
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

/// A single piece of metadata attached to a type or a member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    /// Human readable name.
    DisplayName(String),
    /// Name to use when the member or type is serialized.
    SerializedName(String),
    /// Ordering hint among siblings.
    Order(i32),
    /// Free-form key/value hint.
    Tag { key: String, value: String },
}

impl Attribute {
    /// Free-form key/value hint.
    pub fn tag(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Tag {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Source of attributes for types and their members.
pub trait AttributeRegistry: Send + Sync {
    /// Attributes registered for `ty` itself.
    fn type_attributes(&self, ty: Type) -> Vec<Attribute>;

    /// Attributes registered for member `member` of `owner`.
    fn member_attributes(&self, owner: Type, member: &str) -> Vec<Attribute>;
}

/// Concurrent [`AttributeRegistry`] that accepts registrations at runtime.
///
/// Registrations made after a descriptor has been built are not seen by that
/// descriptor: descriptors are immutable once initialized.
#[derive(Debug, Default)]
pub struct AttributeTable {
    types: DashMap<Type, Vec<Attribute>>,
    members: DashMap<(Type, String), Vec<Attribute>>,
}

impl AttributeTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared table backing [`TypeDescriptorFactory::global`](crate::TypeDescriptorFactory::global).
    pub fn global() -> &'static Arc<AttributeTable> {
        static GLOBAL_ATTRIBUTES: OnceLock<Arc<AttributeTable>> = OnceLock::new();
        GLOBAL_ATTRIBUTES.get_or_init(|| Arc::new(AttributeTable::new()))
    }

    /// Attach `attribute` to `ty`.
    pub fn register_type(&self, ty: Type, attribute: Attribute) {
        self.types.entry(ty).or_default().push(attribute);
    }

    /// Attach `attribute` to member `member` of `owner`.
    pub fn register_member(&self, owner: Type, member: &str, attribute: Attribute) {
        self.members
            .entry((owner, member.to_string()))
            .or_default()
            .push(attribute);
    }

    /// Number of types and members carrying at least one attribute.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len() + self.members.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.members.is_empty()
    }
}

impl AttributeRegistry for AttributeTable {
    fn type_attributes(&self, ty: Type) -> Vec<Attribute> {
        self.types
            .get(&ty)
            .map(|attrs| attrs.value().clone())
            .unwrap_or_default()
    }

    fn member_attributes(&self, owner: Type, member: &str) -> Vec<Attribute> {
        self.members
            .get(&(owner, member.to_string()))
            .map(|attrs| attrs.value().clone())
            .unwrap_or_default()
    }
}

/// Declared attributes followed by registered ones, without duplicates.
pub(crate) fn merge(declared: &[Attribute], registered: Vec<Attribute>) -> Vec<Attribute> {
    let mut merged = declared.to_vec();
    for attribute in registered {
        if !merged.contains(&attribute) {
            merged.push(attribute);
        }
    }
    merged
}
