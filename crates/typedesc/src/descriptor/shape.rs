// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-shape descriptor bodies.
//!
//! Nested descriptors live in `OnceLock` slots that are empty while the owning
//! descriptor is only *constructed* and filled by `initialize`. A slot may hold
//! a descriptor that is itself still being initialized (recursive types); its
//! own slots fill before the outermost `find` returns.
//!
//! Slots hold `Weak` links. The factory cache owns every descriptor, so a
//! recursive graph is released together with the factory (or with a rollback)
//! and nested accessors return `None` once their target is gone.

use super::TypeDescriptor;
use crate::attributes::Attribute;
use crate::error::Result;
use crate::factory::TypeDescriptorFactory;
use crate::ty::{ScalarKind, Type};
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

type Slot = OnceLock<Weak<TypeDescriptor>>;

/// Resolve `ty` through the factory and store a link to it in `slot`.
///
/// `initialize` runs once per descriptor instance, so the slot is empty here.
fn bind(slot: &Slot, ty: Type, factory: &TypeDescriptorFactory) -> Result<()> {
    let resolved = factory.resolve(ty)?;
    let _ = slot.set(Arc::downgrade(&resolved));
    Ok(())
}

fn upgrade(slot: &Slot) -> Option<Arc<TypeDescriptor>> {
    slot.get().and_then(Weak::upgrade)
}

fn resolved(slot: &Slot) -> &'static str {
    match slot.get() {
        Some(link) if link.strong_count() > 0 => "resolved",
        Some(_) => "released",
        None => "pending",
    }
}

/// Leaf value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveDescriptor {
    kind: ScalarKind,
}

impl PrimitiveDescriptor {
    pub(crate) fn new(kind: ScalarKind) -> Self {
        Self { kind }
    }

    /// Scalar kind.
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }
}

/// Keyed mapping.
pub struct DictionaryDescriptor {
    key_type: Type,
    value_type: Type,
    key: Slot,
    value: Slot,
}

impl DictionaryDescriptor {
    pub(crate) fn new(key_type: Type, value_type: Type) -> Self {
        Self {
            key_type,
            value_type,
            key: OnceLock::new(),
            value: OnceLock::new(),
        }
    }

    /// Key type.
    pub fn key_type(&self) -> Type {
        self.key_type
    }

    /// Value type.
    pub fn value_type(&self) -> Type {
        self.value_type
    }

    /// Key descriptor (`None` until initialized or once released).
    pub fn key(&self) -> Option<Arc<TypeDescriptor>> {
        upgrade(&self.key)
    }

    /// Value descriptor (`None` until initialized or once released).
    pub fn value(&self) -> Option<Arc<TypeDescriptor>> {
        upgrade(&self.value)
    }

    pub(crate) fn initialize(&self, factory: &TypeDescriptorFactory) -> Result<()> {
        bind(&self.key, self.key_type, factory)?;
        bind(&self.value, self.value_type, factory)
    }
}

impl fmt::Debug for DictionaryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DictionaryDescriptor")
            .field("key_type", &self.key_type)
            .field("value_type", &self.value_type)
            .field("key", &resolved(&self.key))
            .field("value", &resolved(&self.value))
            .finish()
    }
}

/// Ordered, appendable, homogeneous sequence.
pub struct CollectionDescriptor {
    element_type: Type,
    element: Slot,
}

impl CollectionDescriptor {
    pub(crate) fn new(element_type: Type) -> Self {
        Self {
            element_type,
            element: OnceLock::new(),
        }
    }

    /// Element type.
    pub fn element_type(&self) -> Type {
        self.element_type
    }

    /// Element descriptor (`None` until initialized or once released).
    pub fn element(&self) -> Option<Arc<TypeDescriptor>> {
        upgrade(&self.element)
    }

    pub(crate) fn initialize(&self, factory: &TypeDescriptorFactory) -> Result<()> {
        bind(&self.element, self.element_type, factory)
    }
}

impl fmt::Debug for CollectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionDescriptor")
            .field("element_type", &self.element_type)
            .field("element", &resolved(&self.element))
            .finish()
    }
}

/// Native fixed-size array.
pub struct ArrayDescriptor {
    element_type: Type,
    length: usize,
    rank: usize,
    element: Slot,
}

impl ArrayDescriptor {
    pub(crate) fn new(element_type: Type, length: usize, rank: usize) -> Self {
        Self {
            element_type,
            length,
            rank,
            element: OnceLock::new(),
        }
    }

    /// Element type.
    pub fn element_type(&self) -> Type {
        self.element_type
    }

    /// Total element count.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Element descriptor (`None` until initialized or once released).
    pub fn element(&self) -> Option<Arc<TypeDescriptor>> {
        upgrade(&self.element)
    }

    pub(crate) fn initialize(&self, factory: &TypeDescriptorFactory) -> Result<()> {
        bind(&self.element, self.element_type, factory)
    }
}

impl fmt::Debug for ArrayDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayDescriptor")
            .field("element_type", &self.element_type)
            .field("length", &self.length)
            .field("rank", &self.rank)
            .field("element", &resolved(&self.element))
            .finish()
    }
}

/// Value-or-absence wrapper.
pub struct NullableDescriptor {
    underlying_type: Type,
    underlying: Slot,
}

impl NullableDescriptor {
    pub(crate) fn new(underlying_type: Type) -> Self {
        Self {
            underlying_type,
            underlying: OnceLock::new(),
        }
    }

    /// Wrapped type.
    pub fn underlying_type(&self) -> Type {
        self.underlying_type
    }

    /// Wrapped type's descriptor (`None` until initialized or once released).
    pub fn underlying(&self) -> Option<Arc<TypeDescriptor>> {
        upgrade(&self.underlying)
    }

    pub(crate) fn initialize(&self, factory: &TypeDescriptorFactory) -> Result<()> {
        bind(&self.underlying, self.underlying_type, factory)
    }
}

impl fmt::Debug for NullableDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NullableDescriptor")
            .field("underlying_type", &self.underlying_type)
            .field("underlying", &resolved(&self.underlying))
            .finish()
    }
}

/// Named member of an object descriptor.
pub struct MemberDescriptor {
    name: &'static str,
    ty: Type,
    attributes: Vec<Attribute>,
    descriptor: Slot,
}

impl MemberDescriptor {
    pub(crate) fn new(name: &'static str, ty: Type, attributes: Vec<Attribute>) -> Self {
        Self {
            name,
            ty,
            attributes,
            descriptor: OnceLock::new(),
        }
    }

    /// Member name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Member type.
    pub fn ty(&self) -> Type {
        self.ty
    }

    /// Declared and registered attributes.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Display name attribute, falling back to the member name.
    pub fn display_name(&self) -> &str {
        self.attributes
            .iter()
            .find_map(|attr| match attr {
                Attribute::DisplayName(name) => Some(name.as_str()),
                _ => None,
            })
            .unwrap_or(self.name)
    }

    /// Member type's descriptor (`None` until initialized or once released).
    pub fn descriptor(&self) -> Option<Arc<TypeDescriptor>> {
        upgrade(&self.descriptor)
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("attributes", &self.attributes)
            .field("descriptor", &resolved(&self.descriptor))
            .finish()
    }
}

/// Structured type with named members.
#[derive(Debug)]
pub struct ObjectDescriptor {
    members: Vec<MemberDescriptor>,
}

impl ObjectDescriptor {
    pub(crate) fn new(members: Vec<MemberDescriptor>) -> Self {
        Self { members }
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    /// Member by name.
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }

    pub(crate) fn initialize(&self, factory: &TypeDescriptorFactory) -> Result<()> {
        for member in &self.members {
            bind(&member.descriptor, member.ty, factory)?;
        }
        Ok(())
    }
}
