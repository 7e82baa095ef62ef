//! Transient binding sets built while a match is in progress.

use crate::context::{Capture, Context, ContextId, SlotKey};
use patmatch_value::{Value, ValueModel};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

struct Bound<V: ValueModel> {
    context: Context<V>,
    value: V,
}

impl<V: ValueModel> Clone for Bound<V> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            value: self.value.clone(),
        }
    }
}

/// Captures recorded by one successful match that have not yet been written
/// to their contexts.
///
/// Returned by [`Matcher::match_extract`](crate::Matcher::match_extract).
/// Dropping it discards the captures; [`Bindings::commit`] writes them.
pub struct Bindings<V: ValueModel = Value> {
    slots: HashMap<SlotKey, Bound<V>>,
}

impl<V: ValueModel> Bindings<V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The value recorded for `slot` of `context`, if any.
    pub fn get(&self, context: &Context<V>, slot: &str) -> Option<&V> {
        let key = SlotKey {
            context: context.id(),
            slot: Arc::from(slot),
        };
        self.slots.get(&key).map(|bound| &bound.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Context<V>, &str, &V)> {
        self.slots
            .iter()
            .map(|(key, bound)| (&bound.context, &*key.slot, &bound.value))
    }

    /// Record `value` for `capture`. An existing binding must be deep-equal.
    pub(crate) fn bind(&mut self, capture: &Capture<V>, value: &V) -> bool {
        match self.slots.get(&capture.key()) {
            Some(existing) => existing.value.deep_eq(value),
            None => {
                self.slots.insert(
                    capture.key(),
                    Bound {
                        context: capture.context().clone(),
                        value: value.clone(),
                    },
                );
                true
            }
        }
    }

    /// Merge `other` into `self`, failing on a slot bound to different values.
    pub(crate) fn absorb(&mut self, other: Bindings<V>) -> bool {
        for (key, bound) in other.slots {
            match self.slots.get(&key) {
                Some(existing) if !existing.value.deep_eq(&bound.value) => return false,
                Some(_) => {}
                None => {
                    self.slots.insert(key, bound);
                }
            }
        }
        true
    }

    /// Write every recorded capture to its context, one lock per context.
    pub fn commit(self) {
        let mut grouped: HashMap<ContextId, (Context<V>, Vec<(Arc<str>, V)>)> = HashMap::new();
        for (key, bound) in self.slots {
            grouped
                .entry(key.context)
                .or_insert_with(|| (bound.context.clone(), Vec::new()))
                .1
                .push((key.slot, bound.value));
        }
        for (id, (context, slots)) in grouped {
            tracing::trace!(context = %id, slots = slots.len(), "committing captures");
            context.commit(slots);
        }
    }
}

impl<V: ValueModel> Clone for Bindings<V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}

impl<V: ValueModel> fmt::Debug for Bindings<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self
            .slots
            .iter()
            .map(|(key, bound)| (format!("{}.{}", key.context, key.slot), &bound.value))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        f.debug_map().entries(entries).finish()
    }
}
