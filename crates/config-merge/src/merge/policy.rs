use std::collections::{BTreeMap, BTreeSet};

/// Declares how the list fields of a type are merged.
///
/// Every list field is correlated by [`Keyed::key`](super::Keyed::key) unless it is listed in
/// [`ignored_duplicates`](Self::ignored_duplicates), in which case the parent and child lists are
/// simply concatenated.
///
/// By default, a correlated field only looks for matching elements within itself. Fields that share a
/// handle in [`merged_key_handles`](Self::merged_key_handles) are correlated *together*: an element
/// that moves from one such field in the parent to another field in the child is moved rather than
/// duplicated.
///
/// This is implemented by [`derive@super::Merge`] from the `#[merge(ignore_duplicates)]` and
/// `#[merge(merged_key = "...")]` field attributes.
pub trait MergePolicy {
    /// Names of the list fields that are concatenated instead of correlated
    fn ignored_duplicates() -> &'static [&'static str] {
        &[]
    }

    /// `(field, handle)` pairs for list fields that are correlated together with other fields
    fn merged_key_handles() -> &'static [(&'static str, &'static str)] {
        &[]
    }
}

/// How a single list field is merged
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Parent elements followed by child elements, verbatim
    IgnoreDuplicates,

    /// Elements are matched by key against all child fields sharing `handle`
    Correlate { handle: &'static str },
}

/// The resolved [`MergePolicy`] of a type, built once per merge of a value of that type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyTable {
    ignored: BTreeSet<&'static str>,
    handles: BTreeMap<&'static str, &'static str>,
}

impl PolicyTable {
    pub fn of<T: MergePolicy + ?Sized>() -> Self {
        Self {
            ignored: T::ignored_duplicates().iter().copied().collect(),
            handles: T::merged_key_handles().iter().copied().collect(),
        }
    }

    pub fn resolve(&self, field: &'static str) -> FieldPolicy {
        if self.ignored.contains(field) {
            FieldPolicy::IgnoreDuplicates
        } else {
            FieldPolicy::Correlate {
                handle: self.handle(field),
            }
        }
    }

    /// The correlation handle of `field`, which is the field's own name unless declared otherwise
    pub fn handle(&self, field: &'static str) -> &'static str {
        self.handles.get(field).copied().unwrap_or(field)
    }
}
