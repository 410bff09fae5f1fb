// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors: the uniform introspection object produced per type.
//!
//! A descriptor goes through two phases:
//!
//! ```text
//!   construct()            initialize()
//!   ----------> constructed -----------> initialized
//!   (fields set, nested    (nested descriptors resolved,
//!    slots empty)           immutable from here on)
//! ```
//!
//! The factory caches a descriptor between the two phases, which is what lets
//! a type reach itself during its own initialization.

mod shape;

pub use shape::{
    ArrayDescriptor, CollectionDescriptor, DictionaryDescriptor, MemberDescriptor,
    NullableDescriptor, ObjectDescriptor, PrimitiveDescriptor,
};

use crate::attributes::{merge, Attribute, AttributeRegistry};
use crate::classify::ShapeCategory;
use crate::error::{DescriptorError, Result};
use crate::factory::TypeDescriptorFactory;
use crate::ty::{Type, TypeInfo};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shape-specific body of a descriptor.
#[derive(Debug)]
pub enum Shape {
    Primitive(PrimitiveDescriptor),
    Dictionary(DictionaryDescriptor),
    Collection(CollectionDescriptor),
    Array(ArrayDescriptor),
    Nullable(NullableDescriptor),
    Object(ObjectDescriptor),
}

impl Shape {
    /// Category of this shape.
    pub fn category(&self) -> ShapeCategory {
        match self {
            Self::Primitive(_) => ShapeCategory::Primitive,
            Self::Dictionary(_) => ShapeCategory::Dictionary,
            Self::Collection(_) => ShapeCategory::Collection,
            Self::Array(_) => ShapeCategory::Array,
            Self::Nullable(_) => ShapeCategory::Nullable,
            Self::Object(_) => ShapeCategory::Object,
        }
    }
}

/// Descriptor for one type.
pub struct TypeDescriptor {
    ty: Type,
    attributes: Vec<Attribute>,
    shape: Shape,
    initialized: AtomicBool,
}

impl TypeDescriptor {
    /// Build a descriptor of `category` for `ty`, in the constructed state.
    ///
    /// Used by [`Classify`](crate::Classify) implementations. Fails when `info`
    /// lacks the traits the category needs or they are malformed.
    pub fn construct(
        ty: Type,
        info: TypeInfo,
        category: ShapeCategory,
        registry: &dyn AttributeRegistry,
    ) -> Result<Self> {
        let name = ty.name();
        let missing = |traits: &str| {
            DescriptorError::construction(
                name,
                format!("{} shape requires {} traits", category, traits),
            )
        };

        let shape = match category {
            ShapeCategory::Primitive => {
                let kind = info.scalar.ok_or_else(|| missing("scalar"))?;
                Shape::Primitive(PrimitiveDescriptor::new(kind))
            }
            ShapeCategory::Dictionary => {
                let keyed = info.keyed.ok_or_else(|| missing("keyed"))?;
                Shape::Dictionary(DictionaryDescriptor::new(keyed.key, keyed.value))
            }
            ShapeCategory::Collection => {
                let seq = info.sequence.ok_or_else(|| missing("sequence"))?;
                Shape::Collection(CollectionDescriptor::new(seq.element))
            }
            ShapeCategory::Array => {
                let array = info.array.ok_or_else(|| missing("array"))?;
                if array.rank == 0 {
                    return Err(DescriptorError::construction(
                        name,
                        "array rank must be at least 1",
                    ));
                }
                Shape::Array(ArrayDescriptor::new(array.element, array.length, array.rank))
            }
            ShapeCategory::Nullable => {
                let inner = info.optional.ok_or_else(|| missing("optional"))?;
                Shape::Nullable(NullableDescriptor::new(inner))
            }
            ShapeCategory::Object => {
                let mut seen = HashSet::new();
                let mut members = Vec::with_capacity(info.members.len());
                for member in &info.members {
                    if !seen.insert(member.name) {
                        return Err(DescriptorError::construction(
                            name,
                            format!("duplicate member `{}`", member.name),
                        ));
                    }
                    let attributes = merge(
                        &member.attributes,
                        registry.member_attributes(ty, member.name),
                    );
                    members.push(MemberDescriptor::new(member.name, member.ty, attributes));
                }
                Shape::Object(ObjectDescriptor::new(members))
            }
        };

        Ok(Self {
            ty,
            attributes: merge(&info.attributes, registry.type_attributes(ty)),
            shape,
            initialized: AtomicBool::new(false),
        })
    }

    /// Resolve nested descriptors. Called once by the factory, after the
    /// descriptor has been cached.
    pub(crate) fn initialize(&self, factory: &TypeDescriptorFactory) -> Result<()> {
        match &self.shape {
            Shape::Primitive(_) => {}
            Shape::Dictionary(d) => d.initialize(factory)?,
            Shape::Collection(c) => c.initialize(factory)?,
            Shape::Array(a) => a.initialize(factory)?,
            Shape::Nullable(n) => n.initialize(factory)?,
            Shape::Object(o) => o.initialize(factory)?,
        }
        self.initialized.store(true, Ordering::Release);
        Ok(())
    }

    /// Described type.
    pub fn ty(&self) -> Type {
        self.ty
    }

    /// Described type's name.
    pub fn name(&self) -> &'static str {
        self.ty.name()
    }

    /// Display name attribute, falling back to the type name.
    pub fn display_name(&self) -> &str {
        self.attributes
            .iter()
            .find_map(|attr| match attr {
                Attribute::DisplayName(name) => Some(name.as_str()),
                _ => None,
            })
            .unwrap_or(self.ty.name())
    }

    /// Shape category.
    pub fn category(&self) -> ShapeCategory {
        self.shape.category()
    }

    /// Shape-specific body.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Declared and registered type-level attributes.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// `true` once nested descriptors are resolved.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Primitive body, if this is a primitive.
    pub fn as_primitive(&self) -> Option<&PrimitiveDescriptor> {
        match &self.shape {
            Shape::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Dictionary body, if this is a dictionary.
    pub fn as_dictionary(&self) -> Option<&DictionaryDescriptor> {
        match &self.shape {
            Shape::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Collection body, if this is a collection.
    pub fn as_collection(&self) -> Option<&CollectionDescriptor> {
        match &self.shape {
            Shape::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// Array body, if this is an array.
    pub fn as_array(&self) -> Option<&ArrayDescriptor> {
        match &self.shape {
            Shape::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Nullable body, if this is a nullable wrapper.
    pub fn as_nullable(&self) -> Option<&NullableDescriptor> {
        match &self.shape {
            Shape::Nullable(n) => Some(n),
            _ => None,
        }
    }

    /// Object body, if this is an object.
    pub fn as_object(&self) -> Option<&ObjectDescriptor> {
        match &self.shape {
            Shape::Object(o) => Some(o),
            _ => None,
        }
    }
}

// Nested descriptors are printed as pending/resolved only: recursive types form
// cycles.
impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("ty", &self.ty)
            .field("initialized", &self.is_initialized())
            .field("attributes", &self.attributes)
            .field("shape", &self.shape)
            .finish()
    }
}
