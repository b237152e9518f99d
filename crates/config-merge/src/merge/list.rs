use std::collections::{HashMap, hash_map};

use super::{FieldPolicy, Keyed, Merge, MergeContext, MergeError, PolicyTable, Side};

/// Concatenates `parent` and `child`, for lists that don't correlate their elements.
///
/// Two empty lists produce an empty (unallocated) list, so that a merged document can round-trip to one where
/// the field is omitted.
pub fn concat<T: Clone>(parent: &[T], child: &[T]) -> Vec<T> {
    if parent.is_empty() && child.is_empty() {
        return Vec::new();
    }
    let mut merged = Vec::with_capacity(parent.len() + child.len());
    merged.extend_from_slice(parent);
    merged.extend_from_slice(child);
    merged
}

/// The correlation key of `item`. Empty keys identify nothing, so they are treated like missing ones.
fn identity<T: Keyed>(item: &T) -> Option<String> {
    item.key().filter(|key| !key.is_empty())
}

/// Where a keyed element lives inside the struct that is being merged
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Slot {
    field: &'static str,
    position: usize,
}

/// Keys of one side of a merge, grouped by handle
#[derive(Debug, Default)]
struct KeyTable {
    handles: HashMap<&'static str, HashMap<String, Slot>>,
}

impl KeyTable {
    fn insert<T: Keyed>(
        &mut self,
        side: Side,
        handle: &'static str,
        field: &'static str,
        items: &[T],
        context: &MergeContext<'_>,
    ) -> Result<(), MergeError> {
        let keys = self.handles.entry(handle).or_default();
        for (position, item) in items.iter().enumerate() {
            let Some(key) = identity(item) else {
                continue;
            };
            match keys.entry(key) {
                hash_map::Entry::Occupied(entry) => {
                    return Err(context.error_duplicate_key(
                        side,
                        handle,
                        entry.key(),
                        entry.get().field,
                        field,
                    ));
                }
                hash_map::Entry::Vacant(entry) => {
                    entry.insert(Slot { field, position });
                }
            }
        }
        Ok(())
    }

    fn lookup(&self, handle: &str, key: &str) -> Option<Slot> {
        self.handles.get(handle)?.get(key).copied()
    }
}

/// Correlates the elements of all keyed list fields of one struct.
///
/// Every correlated field must be [inserted](Self::insert_field) before any of them is
/// [merged](Self::merge_field), since a parent element may have moved to any child field that shares its
/// handle.
///
/// Keys must be unique per handle on each side, keys that collide are rejected with
/// [`MergeProblem::DuplicateKey`](super::MergeProblem::DuplicateKey). This only covers the lists of values that
/// are actually merged: lists nested in an element that has no counterpart on the other side are copied
/// without being inspected. Merging a value with itself visits every list.
#[derive(Debug)]
pub struct CorrelationIndex {
    policy: PolicyTable,
    parent: KeyTable,
    child: KeyTable,
}

impl CorrelationIndex {
    pub fn new(policy: PolicyTable) -> Self {
        Self {
            policy,
            parent: KeyTable::default(),
            child: KeyTable::default(),
        }
    }

    /// Registers the parent and child values of the list field `field`.
    ///
    /// `context` should point at the struct that owns the field.
    pub fn insert_field<T: Keyed>(
        &mut self,
        field: &'static str,
        parent: &[T],
        child: &[T],
        context: &MergeContext<'_>,
    ) -> Result<(), MergeError> {
        let FieldPolicy::Correlate { handle } = self.policy.resolve(field) else {
            return Ok(());
        };
        self.parent
            .insert(Side::Parent, handle, field, parent, context)?;
        self.child.insert(Side::Child, handle, field, child, context)
    }

    /// Merges the list field `field`.
    ///
    /// Parent elements keep their order and are merged with the child element of the same key. Parent
    /// elements whose key moved to a different field (with the same handle) in the child are dropped, since
    /// they are emitted by that other field. Child elements that are new to this field are appended afterwards,
    /// in their own order.
    ///
    /// `context` should point at the field itself.
    pub fn merge_field<T: Keyed + Merge + Clone>(
        &self,
        field: &'static str,
        parent: &[T],
        child: &[T],
        context: MergeContext<'_>,
    ) -> Result<Vec<T>, MergeError> {
        let handle = match self.policy.resolve(field) {
            FieldPolicy::IgnoreDuplicates => return Ok(concat(parent, child)),
            FieldPolicy::Correlate { handle } => handle,
        };
        if parent.is_empty() && child.is_empty() {
            return Ok(Vec::new());
        }

        let mut merged = Vec::with_capacity(parent.len() + child.len());
        for parent_item in parent {
            let Some(key) = identity(parent_item) else {
                merged.push(parent_item.clone());
                continue;
            };
            match self.child.lookup(handle, &key) {
                Some(slot) if slot.field == field => match child.get(slot.position) {
                    Some(child_item) => {
                        merged.push(T::merge_with(parent_item, child_item, context.field(&key))?);
                    }
                    None => merged.push(parent_item.clone()),
                },
                Some(slot) => {
                    tracing::trace!(
                        field,
                        key = %key,
                        moved_to = slot.field,
                        "dropping parent entry that moved to a sibling field"
                    );
                }
                None => merged.push(parent_item.clone()),
            }
        }

        for child_item in child {
            let in_parent = identity(child_item).is_some_and(|key| {
                self.parent
                    .lookup(handle, &key)
                    .is_some_and(|slot| slot.field == field)
            });
            if !in_parent {
                merged.push(child_item.clone());
            }
        }
        Ok(merged)
    }
}
