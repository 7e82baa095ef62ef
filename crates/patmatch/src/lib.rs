//! Structural pattern matching over dynamic values.
//!
//! A [`Pattern`] describes the shape a value must have: literals, types,
//! sequences, mappings, records, predicates, and combinations of these.
//! Captures record the sub-values they meet into a [`Context`], but only
//! when the whole match succeeds; a failed match leaves every context as it
//! was.
//!
//! # Example
//!
//! ```
//! use patmatch::{any_of, matches, Context, IntoPattern, TypeTag, Value};
//!
//! let ctx = Context::new();
//! let pattern = any_of!(
//!     ((ctx.capture("a"), ctx.capture("b")), ctx.capture("c")),
//!     vec![ctx.capture("a"), ctx.capture("b")],
//! );
//!
//! let value = Value::list([1, 2]);
//! assert!(matches(&pattern, &value).unwrap());
//! assert_eq!(ctx.get("a").unwrap(), Value::Int(1));
//! assert_eq!(ctx.get("b").unwrap(), Value::Int(2));
//! assert!(ctx.get("c").is_err());
//!
//! // Bare values and types are patterns too.
//! let pair = (1, TypeTag::Int).into_pattern();
//! assert!(matches(&pair, &Value::tuple([1, 2])).unwrap());
//! ```

/// Conjunction of any pattern-like arguments. `all_of!()` matches anything.
#[macro_export]
macro_rules! all_of {
    ($($pattern:expr),* $(,)?) => {
        $crate::Pattern::All(::std::vec![$($crate::IntoPattern::into_pattern($pattern)),*])
    };
}

/// Disjunction of any pattern-like arguments. `any_of!()` never matches.
#[macro_export]
macro_rules! any_of {
    ($($pattern:expr),* $(,)?) => {
        $crate::Pattern::Any(::std::vec![$($crate::IntoPattern::into_pattern($pattern)),*])
    };
}

mod bindings;
pub mod combinators;
mod context;
mod matcher;
mod pattern;

pub use bindings::Bindings;
pub use combinators::{
    cons, conjunction, disjunction, exact_type, literal_equals, mapping_shape, object_of,
    object_shape, pat, predicate, regex, try_predicate, wildcard,
};
pub use context::{BindingError, Capture, Context, ContextId};
pub use matcher::{matches, MatchError, MatchResult, Matcher, PredicateErrors};
pub use pattern::{IntoPattern, MappingPattern, ObjectPattern, Pattern, Predicate};

pub use patmatch_value::{Map, Record, RecordType, SeqKind, TypeTag, Value, ValueModel};
