//! Binding contexts: named slots filled by successful matches.

use crate::pattern::Pattern;
use parking_lot::RwLock;
use patmatch_value::{Value, ValueModel};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("slot '{slot}' is not bound")]
    Unbound { slot: String },
}

/// Identity of a context, unique per [`Context::new`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx#{}", self.0)
    }
}

/// Identity of one capture: the owning context plus the slot name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct SlotKey {
    pub(crate) context: ContextId,
    pub(crate) slot: Arc<str>,
}

struct ContextInner<V> {
    id: ContextId,
    slots: RwLock<HashMap<Arc<str>, V>>,
}

/// A mutable map from slot names to values captured by successful matches.
///
/// `Context` is a handle: clones share the same slots. Slots are written only
/// when a match referencing the context succeeds, and are never cleared.
///
/// ```
/// use patmatch::{matches, Context, IntoPattern, TypeTag, Value};
///
/// let ctx = Context::new();
/// let pattern = (TypeTag::Int, ctx.capture("rest")).into_pattern();
/// assert!(matches(&pattern, &Value::tuple([1, 2])).unwrap());
/// assert_eq!(ctx.get("rest").unwrap(), Value::Int(2));
/// ```
pub struct Context<V: ValueModel = Value> {
    inner: Arc<ContextInner<V>>,
}

impl<V: ValueModel> Context<V> {
    pub fn new() -> Self {
        let id = ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            inner: Arc::new(ContextInner {
                id,
                slots: RwLock::new(HashMap::new()),
            }),
        }
    }

    pub fn id(&self) -> ContextId {
        self.inner.id
    }

    /// A pattern that matches anything and records the value under `name`.
    ///
    /// Calling this twice with the same name yields the same capture, so both
    /// uses must see deep-equal values for the match to succeed.
    pub fn capture(&self, name: &str) -> Pattern<V> {
        Pattern::Capture(Capture {
            context: self.clone(),
            slot: Arc::from(name),
        })
    }

    pub fn get(&self, name: &str) -> Result<V, BindingError> {
        self.inner
            .slots
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| BindingError::Unbound {
                slot: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.slots.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.slots.read().is_empty()
    }

    /// Copy of every bound slot.
    pub fn snapshot(&self) -> HashMap<String, V> {
        self.inner
            .slots
            .read()
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    /// Write a batch of slots under a single lock acquisition.
    pub(crate) fn commit(&self, slots: impl IntoIterator<Item = (Arc<str>, V)>) {
        let mut guard = self.inner.slots.write();
        for (slot, value) in slots {
            guard.insert(slot, value);
        }
    }
}

impl<V: ValueModel> Default for Context<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ValueModel> Clone for Context<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: ValueModel> fmt::Debug for Context<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self
            .inner
            .slots
            .read()
            .keys()
            .map(|name| name.to_string())
            .collect();
        names.sort();
        f.debug_struct("Context")
            .field("id", &self.inner.id)
            .field("slots", &names)
            .finish()
    }
}

// ============ Capture ============

/// The payload of [`Pattern::Capture`].
pub struct Capture<V: ValueModel = Value> {
    context: Context<V>,
    slot: Arc<str>,
}

impl<V: ValueModel> Capture<V> {
    pub fn context(&self) -> &Context<V> {
        &self.context
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub(crate) fn key(&self) -> SlotKey {
        SlotKey {
            context: self.context.id(),
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<V: ValueModel> Clone for Capture<V> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<V: ValueModel> fmt::Debug for Capture<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capture({}.{})", self.context.id(), self.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unbound_slot() {
        let ctx: Context = Context::new();
        assert_eq!(
            ctx.get("x"),
            Err(BindingError::Unbound {
                slot: "x".to_string()
            })
        );
        assert!(ctx.is_empty());
        assert!(!ctx.contains("x"));
    }

    #[test]
    fn test_commit_and_read() {
        let ctx: Context = Context::new();
        ctx.commit([(Arc::from("x"), Value::Int(1)), (Arc::from("y"), Value::from("a"))]);
        assert_eq!(ctx.get("x").unwrap(), Value::Int(1));
        assert_eq!(ctx.len(), 2);
        assert!(ctx.contains("y"));

        ctx.commit([(Arc::from("x"), Value::Int(2))]);
        assert_eq!(ctx.get("x").unwrap(), Value::Int(2));
        assert_eq!(ctx.get("y").unwrap(), Value::from("a"));
    }

    #[test]
    fn test_clones_share_slots() {
        let ctx: Context = Context::new();
        let handle = ctx.clone();
        handle.commit([(Arc::from("x"), Value::Int(1))]);
        assert_eq!(ctx.get("x").unwrap(), Value::Int(1));
        assert_eq!(ctx.id(), handle.id());
    }

    #[test]
    fn test_contexts_have_distinct_ids() {
        let a: Context = Context::new();
        let b: Context = Context::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_capture_identity_is_stable() {
        let ctx: Context = Context::new();
        let (Pattern::Capture(first), Pattern::Capture(second)) = (ctx.capture("x"), ctx.capture("x"))
        else {
            panic!("expected capture patterns");
        };
        assert_eq!(first.key(), second.key());
        assert_eq!(first.slot(), "x");

        let Pattern::Capture(other) = Context::<Value>::new().capture("x") else {
            panic!("expected a capture pattern");
        };
        assert_ne!(first.key(), other.key());
    }

    #[test]
    fn test_snapshot() {
        let ctx: Context = Context::new();
        ctx.commit([(Arc::from("x"), Value::Int(1))]);
        let snapshot = ctx.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["x"], Value::Int(1));
    }

    #[test]
    fn test_debug_lists_slot_names() {
        let ctx: Context = Context::new();
        ctx.commit([(Arc::from("b"), Value::None), (Arc::from("a"), Value::None)]);
        let rendered = format!("{:?}", ctx);
        assert!(rendered.contains(r#"slots: ["a", "b"]"#), "{}", rendered);
    }
}
