//! Pattern variants and conversion of bare values into patterns.

use crate::context::Capture;
use crate::matcher::MatchError;
use patmatch_value::{RecordType, SeqKind, TypeTag, Value, ValueModel};
use std::fmt;
use std::sync::Arc;

/// An immutable description of the shape a value must have.
///
/// Build patterns with the functions in [`crate::combinators`], with
/// [`Context::capture`](crate::Context::capture), or from bare values through
/// [`IntoPattern`]. A pattern can be matched any number of times.
#[derive(Debug, Clone)]
pub enum Pattern<V: ValueModel = Value> {
    /// Deep equality with the payload.
    Literal(V),
    /// The value's type is the descriptor or derives from it.
    TypeMatch(V::Type),
    /// The value's type is exactly the descriptor.
    ExactType(V::Type),
    /// A sequence of this kind and length, matched element-wise.
    Sequence {
        kind: SeqKind,
        items: Vec<Pattern<V>>,
    },
    /// A non-empty sequence split into first element and remainder.
    Cons {
        head: Box<Pattern<V>>,
        tail: Box<Pattern<V>>,
    },
    /// A mapping holding every listed key. Other keys are ignored.
    Mapping(Vec<(V, Pattern<V>)>),
    /// A record, optionally of an expected type, holding every listed field.
    Object {
        expected: Option<V::Type>,
        fields: Vec<(String, Pattern<V>)>,
    },
    /// Every sub-pattern matches the same value.
    All(Vec<Pattern<V>>),
    /// The first sub-pattern that matches wins.
    Any(Vec<Pattern<V>>),
    Predicate(Predicate<V>),
    Capture(Capture<V>),
}

impl<V: ValueModel> Pattern<V> {
    /// Interpret a bare value: type descriptors become [`Pattern::TypeMatch`],
    /// sequences become [`Pattern::Sequence`] with each element interpreted
    /// the same way, and anything else becomes [`Pattern::Literal`].
    pub fn from_value(value: V) -> Self {
        if let Some(ty) = value.as_type() {
            return Pattern::TypeMatch(ty.clone());
        }
        if let Some((kind, items)) = value.as_sequence() {
            return Pattern::Sequence {
                kind,
                items: items.iter().cloned().map(Pattern::from_value).collect(),
            };
        }
        Pattern::Literal(value)
    }

    /// Conjunction of `self` and `other`, flattening an existing conjunction.
    pub fn and(self, other: impl IntoPattern<V>) -> Self {
        match self {
            Pattern::All(mut patterns) => {
                patterns.push(other.into_pattern());
                Pattern::All(patterns)
            }
            first => Pattern::All(vec![first, other.into_pattern()]),
        }
    }

    /// Disjunction of `self` and `other`, flattening an existing disjunction.
    pub fn or(self, other: impl IntoPattern<V>) -> Self {
        match self {
            Pattern::Any(mut patterns) => {
                patterns.push(other.into_pattern());
                Pattern::Any(patterns)
            }
            first => Pattern::Any(vec![first, other.into_pattern()]),
        }
    }
}

// ============ Predicates ============

type TestFn<V> = dyn Fn(&V) -> Result<bool, MatchError> + Send + Sync;

/// A caller-supplied test embedded in a pattern.
pub struct Predicate<V: ValueModel = Value> {
    label: String,
    test: Arc<TestFn<V>>,
}

impl<V: ValueModel> Predicate<V> {
    pub(crate) fn new<F>(label: impl Into<String>, test: F) -> Self
    where
        F: Fn(&V) -> Result<bool, MatchError> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn test(&self, value: &V) -> Result<bool, MatchError> {
        (self.test)(value)
    }
}

impl<V: ValueModel> Clone for Predicate<V> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            test: Arc::clone(&self.test),
        }
    }
}

impl<V: ValueModel> fmt::Debug for Predicate<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.label).finish()
    }
}

// ============ Shape Builders ============

/// Builder for [`Pattern::Object`]. See [`object_shape`](crate::object_shape).
#[derive(Debug, Clone)]
pub struct ObjectPattern<V: ValueModel = Value> {
    expected: Option<V::Type>,
    fields: Vec<(String, Pattern<V>)>,
}

impl<V: ValueModel> ObjectPattern<V> {
    pub(crate) fn new(expected: Option<V::Type>) -> Self {
        Self {
            expected,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, pattern: impl IntoPattern<V>) -> Self {
        self.fields.push((name.into(), pattern.into_pattern()));
        self
    }
}

/// Builder for [`Pattern::Mapping`]. See [`mapping_shape`](crate::mapping_shape).
#[derive(Debug, Clone)]
pub struct MappingPattern<V: ValueModel = Value> {
    entries: Vec<(V, Pattern<V>)>,
}

impl<V: ValueModel> MappingPattern<V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn entry(mut self, key: impl Into<V>, pattern: impl IntoPattern<V>) -> Self {
        self.entries.push((key.into(), pattern.into_pattern()));
        self
    }
}

impl<V: ValueModel> From<ObjectPattern<V>> for Pattern<V> {
    fn from(shape: ObjectPattern<V>) -> Self {
        Pattern::Object {
            expected: shape.expected,
            fields: shape.fields,
        }
    }
}

impl<V: ValueModel> From<MappingPattern<V>> for Pattern<V> {
    fn from(shape: MappingPattern<V>) -> Self {
        Pattern::Mapping(shape.entries)
    }
}

// ============ IntoPattern ============

/// Conversion of bare values and builders into patterns.
///
/// Scalars and strings become literals, type descriptors become type filters,
/// a `Vec` becomes a list-kind sequence and a Rust tuple a tuple-kind sequence.
pub trait IntoPattern<V: ValueModel = Value> {
    fn into_pattern(self) -> Pattern<V>;
}

impl<V: ValueModel> IntoPattern<V> for Pattern<V> {
    fn into_pattern(self) -> Pattern<V> {
        self
    }
}

impl<V: ValueModel> IntoPattern<V> for &Pattern<V> {
    fn into_pattern(self) -> Pattern<V> {
        self.clone()
    }
}

impl<V: ValueModel> IntoPattern<V> for ObjectPattern<V> {
    fn into_pattern(self) -> Pattern<V> {
        self.into()
    }
}

impl<V: ValueModel> IntoPattern<V> for MappingPattern<V> {
    fn into_pattern(self) -> Pattern<V> {
        self.into()
    }
}

impl IntoPattern for Value {
    fn into_pattern(self) -> Pattern {
        Pattern::from_value(self)
    }
}

impl IntoPattern for TypeTag {
    fn into_pattern(self) -> Pattern {
        Pattern::TypeMatch(self)
    }
}

impl IntoPattern for RecordType {
    fn into_pattern(self) -> Pattern {
        Pattern::TypeMatch(TypeTag::Record(self))
    }
}

macro_rules! literal_into_pattern {
    ($($ty:ty),*) => {
        $(
            impl IntoPattern for $ty {
                fn into_pattern(self) -> Pattern {
                    Pattern::Literal(Value::from(self))
                }
            }
        )*
    };
}

literal_into_pattern!(bool, i32, i64, f64, &str, String);

impl<V: ValueModel, P: IntoPattern<V>> IntoPattern<V> for Vec<P> {
    fn into_pattern(self) -> Pattern<V> {
        Pattern::Sequence {
            kind: SeqKind::List,
            items: self.into_iter().map(IntoPattern::into_pattern).collect(),
        }
    }
}

impl<V: ValueModel> IntoPattern<V> for () {
    fn into_pattern(self) -> Pattern<V> {
        Pattern::Sequence {
            kind: SeqKind::Tuple,
            items: Vec::new(),
        }
    }
}

macro_rules! tuple_into_pattern {
    ($($name:ident),+) => {
        impl<V: ValueModel, $($name: IntoPattern<V>),+> IntoPattern<V> for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_pattern(self) -> Pattern<V> {
                let ($($name,)+) = self;
                Pattern::Sequence {
                    kind: SeqKind::Tuple,
                    items: vec![$($name.into_pattern()),+],
                }
            }
        }
    };
}

tuple_into_pattern!(A);
tuple_into_pattern!(A, B);
tuple_into_pattern!(A, B, C);
tuple_into_pattern!(A, B, C, D);
tuple_into_pattern!(A, B, C, D, E);
tuple_into_pattern!(A, B, C, D, E, F);
tuple_into_pattern!(A, B, C, D, E, F, G);
tuple_into_pattern!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_and_len(p: &Pattern) -> Option<(SeqKind, usize)> {
        match p {
            Pattern::Sequence { kind, items } => Some((*kind, items.len())),
            _ => None,
        }
    }

    #[test]
    fn test_bare_values() {
        assert!(matches!(5i64.into_pattern(), Pattern::Literal(Value::Int(5))));
        assert!(matches!("x".into_pattern(), Pattern::Literal(Value::Str(_))));
        assert!(matches!(
            TypeTag::Int.into_pattern(),
            Pattern::TypeMatch(TypeTag::Int)
        ));
        assert!(matches!(
            Value::Type(TypeTag::Str).into_pattern(),
            Pattern::TypeMatch(TypeTag::Str)
        ));
    }

    #[test]
    fn test_bare_sequences() {
        let list: Pattern = vec![TypeTag::Int, TypeTag::Str].into_pattern();
        assert_eq!(kind_and_len(&list), Some((SeqKind::List, 2)));

        let tuple: Pattern = (1, TypeTag::Int).into_pattern();
        assert_eq!(kind_and_len(&tuple), Some((SeqKind::Tuple, 2)));

        let unit: Pattern = ().into_pattern();
        assert_eq!(kind_and_len(&unit), Some((SeqKind::Tuple, 0)));
    }

    #[test]
    fn test_sequence_values_are_interpreted_recursively() {
        let value = Value::list([Value::Type(TypeTag::Int), Value::tuple([Value::Int(1)])]);
        let Pattern::Sequence { kind, items } = Pattern::from_value(value) else {
            panic!("expected a sequence pattern");
        };
        assert_eq!(kind, SeqKind::List);
        assert!(matches!(items[0], Pattern::TypeMatch(TypeTag::Int)));
        assert_eq!(kind_and_len(&items[1]), Some((SeqKind::Tuple, 1)));
    }

    #[test]
    fn test_maps_stay_literal() {
        let value = Value::map([("a", Value::Type(TypeTag::Int))]);
        assert!(matches!(value.into_pattern(), Pattern::Literal(Value::Map(_))));
    }

    #[test]
    fn test_and_or_flatten() {
        let all: Pattern = TypeTag::Int.into_pattern().and(1).and(2);
        assert!(matches!(&all, Pattern::All(items) if items.len() == 3));

        let any: Pattern = 1i64.into_pattern().or(2).or(3);
        assert!(matches!(&any, Pattern::Any(items) if items.len() == 3));
    }

    #[test]
    fn test_predicate_debug_shows_label() {
        let p: Predicate = Predicate::new("positive", |v: &Value| Ok(v.as_f64().unwrap_or(0.0) > 0.0));
        assert_eq!(format!("{:?}", p), "Predicate(\"positive\")");
    }
}
