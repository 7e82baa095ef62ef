//! Constructors for the pattern variants.
//!
//! Bare values convert through [`IntoPattern`]; these functions cover the
//! variants a bare value cannot express.

use crate::matcher::MatchError;
use crate::pattern::{IntoPattern, MappingPattern, ObjectPattern, Pattern, Predicate};
use patmatch_value::{Value, ValueModel};
use regex::Regex;
use std::error::Error as StdError;

/// Convert anything pattern-like into a [`Pattern`].
pub fn pat<V: ValueModel>(pattern: impl IntoPattern<V>) -> Pattern<V> {
    pattern.into_pattern()
}

/// All patterns must match the same value. Matches anything when empty.
///
/// See also [`all_of!`](crate::all_of) for mixed argument types.
pub fn conjunction<V: ValueModel>(patterns: impl IntoIterator<Item = Pattern<V>>) -> Pattern<V> {
    Pattern::All(patterns.into_iter().collect())
}

/// The first matching pattern wins. Never matches when empty.
///
/// See also [`any_of!`](crate::any_of) for mixed argument types.
pub fn disjunction<V: ValueModel>(patterns: impl IntoIterator<Item = Pattern<V>>) -> Pattern<V> {
    Pattern::Any(patterns.into_iter().collect())
}

/// Matches any value and binds nothing.
pub fn wildcard<V: ValueModel>() -> Pattern<V> {
    Pattern::All(Vec::new())
}

pub fn predicate<V, F>(test: F) -> Pattern<V>
where
    V: ValueModel,
    F: Fn(&V) -> bool + Send + Sync + 'static,
{
    Pattern::Predicate(Predicate::new("predicate", move |value| Ok(test(value))))
}

/// A predicate whose errors surface as [`MatchError::Predicate`], subject to
/// the matcher's [`PredicateErrors`](crate::PredicateErrors) policy.
pub fn try_predicate<V, F, E>(test: F) -> Pattern<V>
where
    V: ValueModel,
    F: Fn(&V) -> Result<bool, E> + Send + Sync + 'static,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    Pattern::Predicate(Predicate::new("try_predicate", move |value| {
        test(value).map_err(|e| MatchError::Predicate(e.into()))
    }))
}

/// Split a non-empty sequence into its first element and the rest, which
/// keeps the sequence's kind.
pub fn cons<V: ValueModel>(head: impl IntoPattern<V>, tail: impl IntoPattern<V>) -> Pattern<V> {
    Pattern::Cons {
        head: Box::new(head.into_pattern()),
        tail: Box::new(tail.into_pattern()),
    }
}

/// Deep equality, even when the value is a type descriptor or a sequence.
pub fn literal_equals<V: ValueModel>(value: impl Into<V>) -> Pattern<V> {
    Pattern::Literal(value.into())
}

/// The value's type must be exactly `ty`; subtypes do not match.
pub fn exact_type<V: ValueModel>(ty: impl Into<V::Type>) -> Pattern<V> {
    Pattern::ExactType(ty.into())
}

/// A record of any type when `expected` is `None`; add fields with
/// [`ObjectPattern::field`].
pub fn object_shape<V: ValueModel>(expected: Option<V::Type>) -> ObjectPattern<V> {
    ObjectPattern::new(expected)
}

/// A record whose type is `ty` or derives from it.
pub fn object_of<V: ValueModel>(ty: impl Into<V::Type>) -> ObjectPattern<V> {
    ObjectPattern::new(Some(ty.into()))
}

pub fn mapping_shape<V: ValueModel>() -> MappingPattern<V> {
    MappingPattern::new()
}

// ============ Value-specific ============

/// Matches strings containing a match of `source`. Non-strings never match.
pub fn regex(source: &str) -> Result<Pattern, MatchError> {
    let re = Regex::new(source)?;
    Ok(Pattern::Predicate(Predicate::new(source, move |value: &Value| {
        Ok(value.as_str().is_some_and(|s| re.is_match(s)))
    })))
}
