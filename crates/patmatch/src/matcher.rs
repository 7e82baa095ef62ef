//! The match engine.

use crate::bindings::Bindings;
use crate::pattern::Pattern;
use patmatch_value::{Value, ValueModel};
use std::error::Error as StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("failed to build regex: {0}")]
    RegexBuild(#[from] regex::Error),
    #[error("predicate failed: {0}")]
    Predicate(Box<dyn StdError + Send + Sync>),
}

/// What a predicate error does to the match in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PredicateErrors {
    /// Abort the whole match and return the error.
    #[default]
    Propagate,
    /// Treat the predicate as not satisfied.
    Fail,
}

#[derive(Debug)]
pub enum MatchResult<V: ValueModel = Value> {
    /// The captures recorded on the winning path, not yet committed.
    Match(Bindings<V>),
    NoMatch,
}

impl<V: ValueModel> MatchResult<V> {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Match(_))
    }
}

/// Runs patterns against values.
///
/// # Example
///
/// ```
/// use patmatch::{try_predicate, Matcher, PredicateErrors, Value};
///
/// let strict = try_predicate(|v: &Value| match v {
///     Value::Int(n) => Ok(*n > 0),
///     _ => Err("not an int"),
/// });
///
/// assert!(Matcher::new().matches(&strict, &Value::from("x")).is_err());
///
/// let lenient = Matcher::new().predicate_errors(PredicateErrors::Fail);
/// assert!(!lenient.matches(&strict, &Value::from("x")).unwrap());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    predicate_errors: PredicateErrors,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predicate_errors(mut self, policy: PredicateErrors) -> Self {
        self.predicate_errors = policy;
        self
    }

    /// Match `value` against `pattern`, writing captures to their contexts
    /// only when the whole match succeeds.
    pub fn matches<V: ValueModel>(&self, pattern: &Pattern<V>, value: &V) -> Result<bool, MatchError> {
        match self.match_extract(pattern, value)? {
            MatchResult::Match(bindings) => {
                bindings.commit();
                Ok(true)
            }
            MatchResult::NoMatch => Ok(false),
        }
    }

    /// Match without touching any context; the caller decides whether to
    /// commit the returned bindings.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn match_extract<V: ValueModel>(
        &self,
        pattern: &Pattern<V>,
        value: &V,
    ) -> Result<MatchResult<V>, MatchError> {
        let mut bindings = Bindings::new();
        if self.attempt(pattern, value, &mut bindings)? {
            tracing::trace!(captures = bindings.len(), "matched");
            Ok(MatchResult::Match(bindings))
        } else {
            tracing::trace!("no match");
            Ok(MatchResult::NoMatch)
        }
    }

    fn attempt<V: ValueModel>(
        &self,
        pattern: &Pattern<V>,
        value: &V,
        bindings: &mut Bindings<V>,
    ) -> Result<bool, MatchError> {
        match pattern {
            Pattern::Literal(expected) => Ok(value.deep_eq(expected)),
            Pattern::TypeMatch(ty) => Ok(V::is_subtype(&value.type_of(), ty)),
            Pattern::ExactType(ty) => Ok(V::same_type(&value.type_of(), ty)),
            Pattern::Sequence { kind, items } => {
                let Some((actual_kind, elements)) = value.as_sequence() else {
                    return Ok(false);
                };
                if actual_kind != *kind || elements.len() != items.len() {
                    return Ok(false);
                }
                for (item, element) in items.iter().zip(elements) {
                    if !self.attempt(item, element, bindings)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Pattern::Cons { head, tail } => {
                let Some((kind, elements)) = value.as_sequence() else {
                    return Ok(false);
                };
                let Some((first, rest)) = elements.split_first() else {
                    return Ok(false);
                };
                if !self.attempt(head, first, bindings)? {
                    return Ok(false);
                }
                let rest = V::from_sequence(kind, rest.to_vec());
                self.attempt(tail, &rest, bindings)
            }
            Pattern::Mapping(entries) => {
                if !value.is_mapping() {
                    return Ok(false);
                }
                for (key, item) in entries {
                    let Some(found) = value.lookup(key) else {
                        return Ok(false);
                    };
                    if !self.attempt(item, found, bindings)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Pattern::Object { expected, fields } => {
                if !value.is_record() {
                    return Ok(false);
                }
                if let Some(ty) = expected {
                    if !V::is_subtype(&value.type_of(), ty) {
                        return Ok(false);
                    }
                }
                for (name, item) in fields {
                    let Some(found) = value.field(name) else {
                        return Ok(false);
                    };
                    if !self.attempt(item, found, bindings)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Pattern::All(patterns) => {
                let mut merged = bindings.clone();
                for item in patterns {
                    let mut branch = bindings.clone();
                    if !self.attempt(item, value, &mut branch)? || !merged.absorb(branch) {
                        return Ok(false);
                    }
                }
                *bindings = merged;
                Ok(true)
            }
            Pattern::Any(patterns) => {
                for (index, item) in patterns.iter().enumerate() {
                    let mut branch = bindings.clone();
                    if self.attempt(item, value, &mut branch)? {
                        tracing::trace!(branch = index, "alternative matched");
                        *bindings = branch;
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Pattern::Predicate(predicate) => match predicate.test(value) {
                Ok(satisfied) => Ok(satisfied),
                Err(error) => match self.predicate_errors {
                    PredicateErrors::Propagate => Err(error),
                    PredicateErrors::Fail => {
                        tracing::debug!(predicate = predicate.label(), %error, "predicate error treated as failure");
                        Ok(false)
                    }
                },
            },
            Pattern::Capture(capture) => Ok(bindings.bind(capture, value)),
        }
    }
}

/// Match with the default [`Matcher`].
pub fn matches<V: ValueModel>(pattern: &Pattern<V>, value: &V) -> Result<bool, MatchError> {
    Matcher::new().matches(pattern, value)
}
