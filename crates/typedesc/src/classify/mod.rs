// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shape classification.
//!
//! Maps a [`Type`] to one of six [`ShapeCategory`] values by walking an ordered
//! list of [`ShapeRule`]s, first match wins, with [`ShapeCategory::Object`] as
//! the terminal fallback. The order matters because the predicates overlap:
//!
//! ```text
//!   1. primitive    scalar kind present          (String also enumerates chars)
//!   2. dictionary   keyed entries + key indexer  (maps are also sequences of pairs)
//!   3. collection   append + count + ordered
//!   4. array        native fixed-size array
//!   5. nullable     optional wrapper
//!   6. object       always
//! ```
//!
//! Every predicate is a pure function of [`TypeInfo`] and is public so shape
//! boundaries can be checked in isolation.

use crate::descriptor::TypeDescriptor;
use crate::error::Result;
use crate::factory::TypeDescriptorFactory;
use crate::ty::{Type, TypeInfo};
use std::fmt;

/// The six descriptor shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeCategory {
    Primitive,
    Dictionary,
    Collection,
    Array,
    Nullable,
    Object,
}

impl fmt::Display for ShapeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Primitive => "primitive",
            Self::Dictionary => "dictionary",
            Self::Collection => "collection",
            Self::Array => "array",
            Self::Nullable => "nullable",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

/// Built-in scalar kind: numbers, strings, booleans, enums, dates.
pub fn is_primitive(info: &TypeInfo) -> bool {
    info.scalar.is_some()
}

/// Enumerates key/value entries and can be indexed by key.
pub fn is_dictionary(info: &TypeInfo) -> bool {
    info.keyed
        .is_some_and(|keyed| keyed.enumerates_entries && keyed.indexed_by_key)
}

/// Appendable, counted, ordered sequence of one element type.
pub fn is_collection(info: &TypeInfo) -> bool {
    info.sequence
        .is_some_and(|seq| seq.appendable && seq.counted && seq.ordered)
}

/// Native fixed-size array.
pub fn is_array(info: &TypeInfo) -> bool {
    info.array.is_some()
}

/// Wraps exactly one value type, representing value-or-absence.
pub fn is_nullable(info: &TypeInfo) -> bool {
    info.optional.is_some()
}

/// One step of the classification chain.
#[derive(Clone, Copy)]
pub struct ShapeRule {
    /// Name used in logs.
    pub name: &'static str,
    /// Category assigned when `predicate` matches.
    pub category: ShapeCategory,
    /// Pure test over the type's structural traits.
    pub predicate: fn(&TypeInfo) -> bool,
}

impl ShapeRule {
    /// Create a rule.
    pub const fn new(
        name: &'static str,
        category: ShapeCategory,
        predicate: fn(&TypeInfo) -> bool,
    ) -> Self {
        Self {
            name,
            category,
            predicate,
        }
    }

    /// Returns `true` if the rule applies to `info`.
    pub fn matches(&self, info: &TypeInfo) -> bool {
        (self.predicate)(info)
    }
}

impl fmt::Debug for ShapeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeRule")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish()
    }
}

/// Built-in classification order. [`ShapeCategory::Object`] is implied after
/// the last rule.
pub const DEFAULT_RULES: [ShapeRule; 5] = [
    ShapeRule::new("primitive", ShapeCategory::Primitive, is_primitive),
    ShapeRule::new("dictionary", ShapeCategory::Dictionary, is_dictionary),
    ShapeRule::new("collection", ShapeCategory::Collection, is_collection),
    ShapeRule::new("array", ShapeCategory::Array, is_array),
    ShapeRule::new("nullable", ShapeCategory::Nullable, is_nullable),
];

/// Category picked by the built-in rules.
pub fn category_of(info: &TypeInfo) -> ShapeCategory {
    first_match(&DEFAULT_RULES, info)
}

fn first_match(rules: &[ShapeRule], info: &TypeInfo) -> ShapeCategory {
    rules
        .iter()
        .find(|rule| rule.matches(info))
        .map_or(ShapeCategory::Object, |rule| rule.category)
}

/// Classification step of a [`TypeDescriptorFactory`].
///
/// Implementations return a descriptor in the *constructed* state; the factory
/// caches it and then initializes it. They must not touch the factory's cache
/// other than through `find`.
pub trait Classify: Send + Sync {
    /// Build the constructed descriptor for `ty`.
    fn classify(&self, ty: Type, factory: &TypeDescriptorFactory) -> Result<TypeDescriptor>;
}

/// Rule-list classifier used by default.
///
/// Custom rules run after the ones already in the list and before the
/// [`ShapeCategory::Object`] fallback, unless placed explicitly with
/// [`RuleClassifier::insert_rule`].
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    rules: Vec<ShapeRule>,
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
        }
    }
}

impl RuleClassifier {
    /// Classifier with [`DEFAULT_RULES`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[ShapeRule] {
        &self.rules
    }

    /// Append a rule ahead of the fallback.
    pub fn push_rule(&mut self, rule: ShapeRule) {
        self.rules.push(rule);
    }

    /// Insert a rule at `index` (clamped to the list length).
    pub fn insert_rule(&mut self, index: usize, rule: ShapeRule) {
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
    }

    /// Builder form of [`push_rule`](Self::push_rule).
    #[must_use]
    pub fn with_rule(mut self, rule: ShapeRule) -> Self {
        self.push_rule(rule);
        self
    }

    /// Category for `info` under this rule list.
    pub fn category_of(&self, info: &TypeInfo) -> ShapeCategory {
        first_match(&self.rules, info)
    }
}

impl Classify for RuleClassifier {
    fn classify(&self, ty: Type, factory: &TypeDescriptorFactory) -> Result<TypeDescriptor> {
        let info = ty.info();
        let category = self.category_of(&info);
        log::trace!("[RuleClassifier::classify] {} -> {}", ty, category);
        TypeDescriptor::construct(ty, info, category, factory.attribute_registry().as_ref())
    }
}
