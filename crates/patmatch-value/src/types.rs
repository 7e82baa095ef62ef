//! Type descriptors and the subtype relation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// The runtime type of a [`Value`](crate::Value), or a type used as a value.
///
/// Builtin types form a shallow hierarchy rooted at `Object`. `Bool` derives
/// from `Int`. Record types carry identity and may declare a parent record type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Object,
    None,
    Bool,
    Int,
    Float,
    Str,
    List,
    Tuple,
    Map,
    Type,
    Record(RecordType),
}

impl TypeTag {
    /// Look up a builtin type by its keyword.
    pub fn builtin(name: &str) -> Option<TypeTag> {
        let ty = match name {
            "object" => TypeTag::Object,
            "none_type" => TypeTag::None,
            "bool" => TypeTag::Bool,
            "int" => TypeTag::Int,
            "float" => TypeTag::Float,
            "str" => TypeTag::Str,
            "list" => TypeTag::List,
            "tuple" => TypeTag::Tuple,
            "map" => TypeTag::Map,
            "type" => TypeTag::Type,
            _ => return None,
        };
        Some(ty)
    }

    pub fn name(&self) -> &str {
        match self {
            TypeTag::Object => "object",
            TypeTag::None => "none_type",
            TypeTag::Bool => "bool",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Str => "str",
            TypeTag::List => "list",
            TypeTag::Tuple => "tuple",
            TypeTag::Map => "map",
            TypeTag::Type => "type",
            TypeTag::Record(r) => r.name(),
        }
    }

    /// The direct supertype, or `None` for `Object`.
    pub fn parent(&self) -> Option<TypeTag> {
        match self {
            TypeTag::Object => None,
            TypeTag::Bool => Some(TypeTag::Int),
            TypeTag::Record(r) => Some(
                r.parent()
                    .map(|p| TypeTag::Record(p.clone()))
                    .unwrap_or(TypeTag::Object),
            ),
            _ => Some(TypeTag::Object),
        }
    }

    /// True if `self` is `other` or derives from it.
    pub fn is_subtype_of(&self, other: &TypeTag) -> bool {
        let mut current = Some(self.clone());
        while let Some(ty) = current {
            if &ty == other {
                return true;
            }
            current = ty.parent();
        }
        false
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<type {}>", self.name())
    }
}

impl From<RecordType> for TypeTag {
    fn from(ty: RecordType) -> Self {
        TypeTag::Record(ty)
    }
}

/// A user-declared record type.
///
/// Equality is identity: two declarations sharing a name are still distinct
/// types. Clones refer to the same declaration.
#[derive(Clone)]
pub struct RecordType(Arc<RecordTypeDef>);

struct RecordTypeDef {
    name: String,
    parent: Option<RecordType>,
}

impl RecordType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(Arc::new(RecordTypeDef {
            name: name.into(),
            parent: None,
        }))
    }

    pub fn with_parent(name: impl Into<String>, parent: &RecordType) -> Self {
        Self(Arc::new(RecordTypeDef {
            name: name.into(),
            parent: Some(parent.clone()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn parent(&self) -> Option<&RecordType> {
        self.0.parent.as_ref()
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for RecordType {}

impl Hash for RecordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordType").field(&self.0.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(TypeTag::builtin("int"), Some(TypeTag::Int));
        assert_eq!(TypeTag::builtin("none_type"), Some(TypeTag::None));
        assert_eq!(TypeTag::builtin("integer"), None);
        assert_eq!(TypeTag::Str.name(), "str");
    }

    #[test]
    fn test_builtin_subtyping() {
        assert!(TypeTag::Int.is_subtype_of(&TypeTag::Int));
        assert!(TypeTag::Bool.is_subtype_of(&TypeTag::Int));
        assert!(TypeTag::Bool.is_subtype_of(&TypeTag::Object));
        assert!(!TypeTag::Int.is_subtype_of(&TypeTag::Bool));
        assert!(!TypeTag::Float.is_subtype_of(&TypeTag::Int));
        assert!(!TypeTag::Object.is_subtype_of(&TypeTag::Int));
    }

    #[test]
    fn test_record_identity() {
        let a = RecordType::new("Book");
        let b = RecordType::new("Book");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_record_subtyping() {
        let media = RecordType::new("Media");
        let book = RecordType::with_parent("Book", &media);
        let film = RecordType::new("Film");

        let book_tag = TypeTag::from(book);
        assert!(book_tag.is_subtype_of(&TypeTag::Record(media.clone())));
        assert!(book_tag.is_subtype_of(&TypeTag::Object));
        assert!(!book_tag.is_subtype_of(&TypeTag::Record(film)));
        assert!(!TypeTag::Record(media).is_subtype_of(&book_tag));
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeTag::Map.to_string(), "<type map>");
        assert_eq!(TypeTag::from(RecordType::new("Film")).to_string(), "<type Film>");
    }
}
