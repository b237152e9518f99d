use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod merge;

/// Derives [`Merge`](trait.Merge.html) (and its merge policy) for a configuration struct.
///
/// Every field is merged according to its type: atomic values take the child value, [`Option`]s take the
/// child value if present, and nested structs are merged recursively. Fields of type `Vec<T>` are merged
/// according to their list policy.
///
/// # Container attributes
///
/// - `#[merge(key = "field")]` also implements `Keyed`, using the key of `field` as the identity of the
///   struct when it is used as a list element.
/// - `#[merge(bound = "T: Merge")]` adds predicates to the where clause of the generated impls.
/// - `#[merge(path_overrides(merge = "path"))]` overrides the path to the `config_merge::merge` module.
///
/// # Field attributes
///
/// - `#[merge(ignore_duplicates)]` concatenates the parent and child lists instead of correlating them.
/// - `#[merge(merged_key = "handle")]` correlates the list together with all other list fields of the
///   struct that use the same handle.
#[proc_macro_derive(Merge, attributes(merge))]
pub fn derive_merge(input: TokenStream) -> TokenStream {
    merge::derive(parse_macro_input!(input as DeriveInput)).into()
}
