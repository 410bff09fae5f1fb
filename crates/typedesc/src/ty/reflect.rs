// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `Reflect` trait and implementations for std types.

use super::{ArrayTraits, MemberInfo, ScalarKind, SequenceTraits, Type, TypeInfo};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::time::{Duration, SystemTime};

/// Types that can describe their own structure at runtime.
///
/// # Example
///
/// ```rust
/// use typedesc::{MemberInfo, Reflect, TypeInfo};
///
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// impl Reflect for Point {
///     fn type_info() -> TypeInfo {
///         TypeInfo::object(vec![MemberInfo::of::<f64>("x"), MemberInfo::of::<f64>("y")])
///     }
/// }
/// ```
pub trait Reflect: 'static {
    /// Structural traits of `Self`.
    fn type_info() -> TypeInfo;
}

macro_rules! reflect_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::scalar(ScalarKind::$kind)
                }
            }
        )*
    };
}

reflect_scalar! {
    () => Unit,
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    Duration => Duration,
    SystemTime => Timestamp,
}

// A string also enumerates, counts and appends chars; it must still classify as
// a scalar.
impl Reflect for String {
    fn type_info() -> TypeInfo {
        TypeInfo::scalar(ScalarKind::String)
            .with_sequence(SequenceTraits::list(Type::of::<char>()))
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::list(Type::of::<T>())
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::list(Type::of::<T>())
    }
}

impl<T: Reflect> Reflect for BTreeSet<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::list(Type::of::<T>())
    }
}

impl<T: Reflect> Reflect for Box<[T]> {
    fn type_info() -> TypeInfo {
        TypeInfo::default().with_sequence(SequenceTraits::read_only(Type::of::<T>()))
    }
}

// Maps are also sequences of `(K, V)` pairs.
impl<K: Reflect, V: Reflect, S: 'static> Reflect for HashMap<K, V, S> {
    fn type_info() -> TypeInfo {
        TypeInfo::map(Type::of::<K>(), Type::of::<V>())
            .with_sequence(SequenceTraits::list(Type::of::<(K, V)>()).unordered())
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::map(Type::of::<K>(), Type::of::<V>())
            .with_sequence(SequenceTraits::list(Type::of::<(K, V)>()))
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::optional(Type::of::<T>())
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_info() -> TypeInfo {
        TypeInfo::default().with_array(ArrayTraits {
            element: Type::of::<T>(),
            length: N,
            rank: 1,
        })
    }
}

impl<A: Reflect, B: Reflect> Reflect for (A, B) {
    fn type_info() -> TypeInfo {
        TypeInfo::object(vec![MemberInfo::of::<A>("0"), MemberInfo::of::<B>("1")])
    }
}

impl<A: Reflect, B: Reflect, C: Reflect> Reflect for (A, B, C) {
    fn type_info() -> TypeInfo {
        TypeInfo::object(vec![
            MemberInfo::of::<A>("0"),
            MemberInfo::of::<B>("1"),
            MemberInfo::of::<C>("2"),
        ])
    }
}
