//! Dynamic value model for patmatch.
//!
//! The matching engine never inspects values directly. It goes through the
//! [`ValueModel`] trait, which a host representation implements once. This
//! crate ships one such representation, [`Value`]:
//!
//! - Scalars: `None`, `Bool`, `Int`, `Float`, `Str`
//! - Sequences: `List` and `Tuple`, never interchangeable
//! - Mappings: [`Map`], keyed by arbitrary values
//! - Records: [`Record`], an instance of a named [`RecordType`]
//! - Types: [`TypeTag`], a type used as a value
//!
//! # Example
//!
//! ```
//! use patmatch_value::{Record, RecordType, TypeTag, Value, ValueModel};
//!
//! let book = RecordType::new("Book");
//! let jazz = Value::from(Record::new(&book).with("year", 1922));
//!
//! assert!(jazz.type_of().is_subtype_of(&TypeTag::Object));
//! assert_eq!(jazz.field("year"), Some(&Value::Int(1922)));
//! ```

mod json;
mod types;

pub use types::{RecordType, TypeTag};

use std::collections::BTreeMap;
use std::fmt;

// ============ Value Model ============

/// Distinguishes ordered containers the engine treats as non-interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeqKind {
    List,
    Tuple,
}

/// What the matching engine needs from a host value representation.
pub trait ValueModel: Clone + fmt::Debug + Send + Sync + 'static {
    /// A type descriptor.
    type Type: Clone + fmt::Debug + Send + Sync + 'static;

    fn deep_eq(&self, other: &Self) -> bool;

    fn type_of(&self) -> Self::Type;

    /// The descriptor this value denotes, if the value is itself a type.
    fn as_type(&self) -> Option<&Self::Type>;

    /// Subtype-or-equal.
    fn is_subtype(sub: &Self::Type, sup: &Self::Type) -> bool;

    fn same_type(a: &Self::Type, b: &Self::Type) -> bool;

    fn as_sequence(&self) -> Option<(SeqKind, &[Self])>;

    fn from_sequence(kind: SeqKind, items: Vec<Self>) -> Self;

    fn is_mapping(&self) -> bool;

    /// Key lookup on a mapping. `None` when absent or when `self` is not a mapping.
    fn lookup(&self, key: &Self) -> Option<&Self>;

    fn is_record(&self) -> bool;

    /// Field access on a record. `None` when absent or when `self` is not a record.
    fn field(&self, name: &str) -> Option<&Self>;
}

// ============ Value Types ============

/// A dynamic value.
///
/// `Int` and `Float` are equal when they denote exactly the same number.
/// `Bool` is never equal to a number, even though `bool` is a subtype of
/// `int`: `TypeTag::Int` matches `Value::Bool(true)`, but
/// `Value::Bool(true) != Value::Int(1)`.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Map(Map),
    Record(Record),
    Type(TypeTag),
}

impl Value {
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Value {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    pub fn tuple<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Value {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    pub fn map<K: Into<Value>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Value {
        Value::Map(entries.into_iter().collect())
    }

    pub fn type_name(&self) -> &str {
        match self {
            Value::Record(r) => r.record_type().name(),
            other => match other.type_of() {
                TypeTag::None => "none_type",
                TypeTag::Bool => "bool",
                TypeTag::Int => "int",
                TypeTag::Float => "float",
                TypeTag::Str => "str",
                TypeTag::List => "list",
                TypeTag::Tuple => "tuple",
                TypeTag::Map => "map",
                _ => "type",
            },
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view of `Int` and `Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::List(items) | Value::Tuple(items) => Some(items.len()),
            Value::Map(m) => Some(m.len()),
            _ => None,
        }
    }
}

fn floats_equal(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Exact comparison: `i` converts to `f` only when no rounding is involved.
fn int_equals_float(i: i64, f: f64) -> bool {
    const BOUND: f64 = 9_223_372_036_854_775_808.0; // 2^63
    f.fract() == 0.0 && (-BOUND..BOUND).contains(&f) && f as i64 == i
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::None, Value::None) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => floats_equal(*a, *b),
        (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => {
            int_equals_float(*i, *f)
        }
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Map(a), Value::Map(b)) => a == b,
        (Value::Record(a), Value::Record(b)) => a == b,
        (Value::Type(a), Value::Type(b)) => a == b,
        _ => false,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        values_equal(self, other)
    }
}

impl ValueModel for Value {
    type Type = TypeTag;

    fn deep_eq(&self, other: &Self) -> bool {
        values_equal(self, other)
    }

    fn type_of(&self) -> TypeTag {
        match self {
            Value::None => TypeTag::None,
            Value::Bool(_) => TypeTag::Bool,
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::Str(_) => TypeTag::Str,
            Value::List(_) => TypeTag::List,
            Value::Tuple(_) => TypeTag::Tuple,
            Value::Map(_) => TypeTag::Map,
            Value::Record(r) => TypeTag::Record(r.record_type().clone()),
            Value::Type(_) => TypeTag::Type,
        }
    }

    fn as_type(&self) -> Option<&TypeTag> {
        match self {
            Value::Type(t) => Some(t),
            _ => None,
        }
    }

    fn is_subtype(sub: &TypeTag, sup: &TypeTag) -> bool {
        sub.is_subtype_of(sup)
    }

    fn same_type(a: &TypeTag, b: &TypeTag) -> bool {
        a == b
    }

    fn as_sequence(&self) -> Option<(SeqKind, &[Value])> {
        match self {
            Value::List(items) => Some((SeqKind::List, items)),
            Value::Tuple(items) => Some((SeqKind::Tuple, items)),
            _ => None,
        }
    }

    fn from_sequence(kind: SeqKind, items: Vec<Value>) -> Value {
        match kind {
            SeqKind::List => Value::List(items),
            SeqKind::Tuple => Value::Tuple(items),
        }
    }

    fn is_mapping(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    fn lookup(&self, key: &Value) -> Option<&Value> {
        match self {
            Value::Map(m) => m.get(key),
            _ => None,
        }
    }

    fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record(r) => r.get(name),
            _ => None,
        }
    }
}

// ============ Map ============

/// An insertion-ordered mapping keyed by arbitrary values.
///
/// Keys are compared with deep equality, so `1` and `1.0` address the same
/// entry. Equality between maps ignores insertion order.
#[derive(Debug, Clone, Default)]
pub struct Map {
    entries: Vec<(Value, Value)>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, returning the previous value for `key`.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| values_equal(k, &key)) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| values_equal(k, key))
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).map(|ov| values_equal(v, ov)).unwrap_or(false))
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

// ============ Record ============

/// An instance of a [`RecordType`] with named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    ty: RecordType,
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(ty: &RecordType) -> Self {
        Self {
            ty: ty.clone(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn record_type(&self) -> &RecordType {
        &self.ty
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ============ Conversions ============

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl From<TypeTag> for Value {
    fn from(t: TypeTag) -> Self {
        Value::Type(t)
    }
}

impl From<RecordType> for Value {
    fn from(t: RecordType) -> Self {
        Value::Type(TypeTag::Record(t))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::None)
    }
}

// ============ Display ============

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Record(r) => {
                write!(f, "{}(", r.record_type().name())?;
                for (i, (name, v)) in r.fields().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", name, v)?;
                }
                write!(f, ")")
            }
            Value::Type(t) => write!(f, "{}", t),
        }
    }
}
