// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type identities and their structural traits.
//!
//! A [`Type`] is a cheap, `Copy` handle naming one Rust type inside the
//! process. It is backed by [`std::any::TypeId`], so equal handles always refer
//! to the same type. The handle also carries a function pointer producing the
//! type's [`TypeInfo`], which is what the classifier inspects.
//!
//! Types opt in by implementing [`Reflect`]. Nested types (members, elements,
//! keys) are referenced by [`Type`] handles rather than by value, which keeps
//! self-referential types such as a tree node holding `Vec<Self>` finite.

mod reflect;

pub use reflect::Reflect;

use crate::attributes::Attribute;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Opaque identity of a reflected runtime type.
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    name: &'static str,
    info: fn() -> TypeInfo,
}

impl Type {
    /// Identity of `T`.
    #[must_use]
    pub fn of<T: Reflect>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            info: <T as Reflect>::type_info,
        }
    }

    /// Underlying [`std::any::TypeId`].
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully-qualified type name (`alloc::vec::Vec<i32>`).
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Structural traits of this type.
    ///
    /// Computed on demand; the factory only calls this on a cache miss.
    #[must_use]
    pub fn info(&self) -> TypeInfo {
        (self.info)()
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({})", self.name)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Built-in scalar kinds. Any type reporting one of these is a leaf value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalarKind {
    Unit,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    I128,
    Isize,
    U8,
    U16,
    U32,
    U64,
    U128,
    Usize,
    F32,
    F64,
    String,
    /// Field-less enumeration.
    Enum,
    /// Elapsed time (`Duration`).
    Duration,
    /// Wall-clock instant (`SystemTime`).
    Timestamp,
}

impl ScalarKind {
    /// Integer or floating point number.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::I128
                | Self::Isize
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
                | Self::U128
                | Self::Usize
                | Self::F32
                | Self::F64
        )
    }

    /// Date or time value.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Duration | Self::Timestamp)
    }
}

/// Keyed-mapping traits: what a type offers for key based access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyedTraits {
    /// Key type.
    pub key: Type,
    /// Value type.
    pub value: Type,
    /// Entries can be enumerated as key/value pairs.
    pub enumerates_entries: bool,
    /// Values can be looked up by key.
    pub indexed_by_key: bool,
}

impl KeyedTraits {
    /// Full map: enumerable entries and lookup by key.
    pub fn map(key: Type, value: Type) -> Self {
        Self {
            key,
            value,
            enumerates_entries: true,
            indexed_by_key: true,
        }
    }
}

/// Sequence traits: what a type offers for element access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceTraits {
    /// Element type.
    pub element: Type,
    /// Elements can be appended.
    pub appendable: bool,
    /// Element count is known without iterating.
    pub counted: bool,
    /// Enumeration order is stable.
    pub ordered: bool,
}

impl SequenceTraits {
    /// Growable, counted, ordered sequence (`Vec`-like).
    pub fn list(element: Type) -> Self {
        Self {
            element,
            appendable: true,
            counted: true,
            ordered: true,
        }
    }

    /// Enumerable and counted, but fixed content.
    pub fn read_only(element: Type) -> Self {
        Self {
            element,
            appendable: false,
            counted: true,
            ordered: true,
        }
    }

    /// Override the ordering flag.
    pub fn unordered(mut self) -> Self {
        self.ordered = false;
        self
    }
}

/// Native fixed-size array traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayTraits {
    /// Element type.
    pub element: Type,
    /// Total number of elements.
    pub length: usize,
    /// Number of dimensions (at least 1).
    pub rank: usize,
}

/// A declared member of a structured type.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberInfo {
    /// Member name.
    pub name: &'static str,
    /// Member type.
    pub ty: Type,
    /// Attributes declared alongside the member.
    pub attributes: Vec<Attribute>,
}

impl MemberInfo {
    /// Member `name` of type `T`.
    pub fn of<T: Reflect>(name: &'static str) -> Self {
        Self {
            name,
            ty: Type::of::<T>(),
            attributes: Vec::new(),
        }
    }

    /// Attach a declared attribute.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// Structural traits of a type, as inspected by the shape predicates.
///
/// Several traits may be present at once (a string is a scalar that also
/// enumerates characters; an ordered map is both keyed and a sequence of
/// pairs). Picking one shape is the classifier's job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeInfo {
    /// Scalar kind, for leaf value types.
    pub scalar: Option<ScalarKind>,
    /// Keyed-mapping traits.
    pub keyed: Option<KeyedTraits>,
    /// Sequence traits.
    pub sequence: Option<SequenceTraits>,
    /// Native array traits.
    pub array: Option<ArrayTraits>,
    /// Type wrapped by an optional (value-or-absence) wrapper.
    pub optional: Option<Type>,
    /// Declared members, in declaration order.
    pub members: Vec<MemberInfo>,
    /// Type-level declared attributes.
    pub attributes: Vec<Attribute>,
}

impl TypeInfo {
    /// Leaf scalar.
    pub fn scalar(kind: ScalarKind) -> Self {
        Self {
            scalar: Some(kind),
            ..Self::default()
        }
    }

    /// Keyed map from `key` to `value`.
    pub fn map(key: Type, value: Type) -> Self {
        Self {
            keyed: Some(KeyedTraits::map(key, value)),
            ..Self::default()
        }
    }

    /// Growable list of `element`.
    pub fn list(element: Type) -> Self {
        Self {
            sequence: Some(SequenceTraits::list(element)),
            ..Self::default()
        }
    }

    /// One-dimensional array of `length` elements.
    pub fn array(element: Type, length: usize) -> Self {
        Self {
            array: Some(ArrayTraits {
                element,
                length,
                rank: 1,
            }),
            ..Self::default()
        }
    }

    /// Optional wrapper around `inner`.
    pub fn optional(inner: Type) -> Self {
        Self {
            optional: Some(inner),
            ..Self::default()
        }
    }

    /// Structured type with the given members.
    pub fn object(members: Vec<MemberInfo>) -> Self {
        Self {
            members,
            ..Self::default()
        }
    }

    /// Add keyed-mapping traits.
    pub fn with_keyed(mut self, keyed: KeyedTraits) -> Self {
        self.keyed = Some(keyed);
        self
    }

    /// Add sequence traits.
    pub fn with_sequence(mut self, sequence: SequenceTraits) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Add native array traits.
    pub fn with_array(mut self, array: ArrayTraits) -> Self {
        self.array = Some(array);
        self
    }

    /// Append a member.
    pub fn with_member(mut self, member: MemberInfo) -> Self {
        self.members.push(member);
        self
    }

    /// Attach a type-level attribute.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}
