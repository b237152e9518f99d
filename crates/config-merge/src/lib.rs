//! Layered merging of strongly typed configuration documents.
//!
//! Configuration is often assembled from several fragments: a base document shipped with a platform, overridden
//! by a document for a class of machines, overridden again by one for a single machine. Each fragment is a
//! complete, valid document of the same schema, and the fragments are merged pairwise from the most general
//! (the *parent*) to the most specific (the *child*).
//!
//! The [`merge`] module contains the merge engine, which is driven by the [`Merge`](merge::Merge) trait and its
//! derive macro. The rules are deliberately simple:
//!
//! - Atomic values (numbers, strings, enums) always take the child value.
//! - Optional values take the child value if it is present, otherwise the parent value. They are never merged
//!   any deeper.
//! - Nested structs are merged field by field.
//! - Lists are either concatenated, or correlated by a key (such as a file path), in which case matching
//!   elements are merged and new child elements are appended. Several lists can share a correlation *handle*,
//!   which lets an element move from one list to another (for example, a file that becomes a link).
//!
//! The [`document`] module adds schema versions on top: only documents of the same version are merged, and
//! documents can be parsed from YAML or JSON. The [`provisioning`] module contains a complete machine
//! provisioning schema built on both.

// Lets the derive macro refer to `::config_merge` from within this crate
extern crate self as config_merge;

pub mod document;
pub mod merge;
pub mod provisioning;
