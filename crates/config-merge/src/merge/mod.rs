use std::{
    collections::{BTreeMap, HashMap, btree_map, hash_map},
    fmt::Display,
    hash::Hash,
};

mod context;
mod key;
mod list;
mod policy;

pub use config_merge_derive::Merge;
pub use context::{MergeContext, MergeError, MergeProblem, Side};
pub use key::Keyed;
pub use list::{CorrelationIndex, concat};
pub use policy::{FieldPolicy, MergePolicy, PolicyTable};

/// A type whose values can be layered on top of each other.
///
/// This is intended to be implemented for configuration documents that are composed from several fragments,
/// where a more specific fragment (the `child`) overrides a more general one (the `parent`).
///
/// Most users will want to implement this for custom types using [the associated derive macro](`derive@Merge`).
///
/// # Example
///
/// ```
/// # use config_merge::merge::{Merge, merge};
///
/// #[derive(Merge, Clone, Debug, PartialEq, Eq)]
/// struct Foo {
///     bar: Option<u8>,
///     baz: Option<u8>,
///     name: String,
/// }
///
/// let parent = Foo {
///     bar: Some(0),
///     baz: Some(1),
///     name: "parent".to_owned(),
/// };
/// let child = Foo {
///     bar: None,
///     baz: Some(2),
///     name: String::new(),
/// };
/// assert_eq!(merge(&parent, &child).unwrap(), Foo {
///     bar: Some(0),     // Absent in the child, the parent is kept
///     baz: Some(2),     // Present in the child, the child wins
///     name: String::new(), // Primitives always take the child value
/// });
/// ```
///
/// # Field kinds
///
/// - [`Atomic`] values (numbers, strings, user enums) always take the child value, even if it is "empty".
/// - [`Option`]s take the child value if it is present, and the parent value otherwise. The contained value is
///   never merged any deeper.
/// - Nested structs are merged recursively.
/// - Lists are either concatenated or correlated by [`Keyed::key`], see [`MergePolicy`].
pub trait Merge: Sized {
    /// Produce a new value from `parent`, overridden by `child`.
    ///
    /// `context` locates the value inside the document being merged, and is used to build errors.
    fn merge_with(parent: &Self, child: &Self, context: MergeContext<'_>) -> Result<Self, MergeError>;
}

/// Merge `child` on top of `parent`, starting at the document root.
///
/// Neither input is modified.
pub fn merge<T: Merge>(parent: &T, child: &T) -> Result<T, MergeError> {
    T::merge_with(parent, child, MergeContext::root())
}

/// Reduces a sequence of layers into one, from the most general (first) to the most specific (last).
///
/// Returns [`None`] if there are no layers at all.
///
/// ```
/// # use config_merge::merge::{Merge, merge_all};
/// #[derive(Clone, Default, Merge, PartialEq)]
/// struct MyConfig {
///     field: Option<i32>,
/// }
///
/// let layers = [
///     MyConfig { field: Some(23) },
///     MyConfig { field: None },
///     MyConfig { field: Some(7) },
/// ];
///
/// let merged = merge_all(&layers).unwrap();
/// assert_eq!(7, merged.unwrap().field.unwrap());
/// ```
pub fn merge_all<'a, T>(layers: impl IntoIterator<Item = &'a T>) -> Result<Option<T>, MergeError>
where
    T: Merge + Clone + 'a,
{
    let mut layers = layers.into_iter();
    let Some(first) = layers.next() else {
        return Ok(None);
    };
    layers
        .try_fold(first.clone(), |merged, layer| merge(&merged, layer))
        .map(Some)
}

/// A marker trait for types that are merged atomically (as one single value) rather than
/// trying to merge each field individually
pub trait Atomic: Clone {}

macro_rules! atomic {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Atomic for $ty {}

            impl Keyed for $ty {
                fn key(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

atomic!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char, String,
);

impl Atomic for &str {}
impl Keyed for &str {
    fn key(&self) -> Option<String> {
        Some((*self).to_owned())
    }
}

impl<T: Atomic> Merge for T {
    fn merge_with(_parent: &Self, child: &Self, _context: MergeContext<'_>) -> Result<Self, MergeError> {
        Ok(child.clone())
    }
}

impl<T: Clone> Merge for Option<T> {
    fn merge_with(parent: &Self, child: &Self, _context: MergeContext<'_>) -> Result<Self, MergeError> {
        Ok(child.as_ref().or(parent.as_ref()).cloned())
    }
}

/// Lists that are not fields of a derived struct (for example map values) are correlated with themselves only.
impl<T: Keyed + Merge + Clone> Merge for Vec<T> {
    fn merge_with(parent: &Self, child: &Self, context: MergeContext<'_>) -> Result<Self, MergeError> {
        const ITEMS: &str = "items";

        let mut index = CorrelationIndex::new(PolicyTable::default());
        index.insert_field(ITEMS, parent, child, &context)?;
        index.merge_field(ITEMS, parent, child, context)
    }
}

impl<K, V> Merge for BTreeMap<K, V>
where
    K: Ord + Clone + Display,
    V: Merge + Clone,
{
    fn merge_with(parent: &Self, child: &Self, context: MergeContext<'_>) -> Result<Self, MergeError> {
        let mut merged = parent.clone();
        for (k, child_v) in child {
            match merged.entry(k.clone()) {
                btree_map::Entry::Occupied(mut entry) => {
                    let value = V::merge_with(entry.get(), child_v, context.field(k))?;
                    entry.insert(value);
                }
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(child_v.clone());
                }
            }
        }
        Ok(merged)
    }
}

impl<K, V> Merge for HashMap<K, V>
where
    K: Hash + Eq + Clone + Display,
    V: Merge + Clone,
{
    fn merge_with(parent: &Self, child: &Self, context: MergeContext<'_>) -> Result<Self, MergeError> {
        let mut merged = parent.clone();
        for (k, child_v) in child {
            match merged.entry(k.clone()) {
                hash_map::Entry::Occupied(mut entry) => {
                    let value = V::merge_with(entry.get(), child_v, context.field(k))?;
                    entry.insert(value);
                }
                hash_map::Entry::Vacant(entry) => {
                    entry.insert(child_v.clone());
                }
            }
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::{Keyed, Merge, MergeContext, MergeError, MergeProblem, Side, merge, merge_all};

    #[derive(Debug, PartialEq, Eq, Clone)]
    struct Accumulator(u8);
    impl Merge for Accumulator {
        fn merge_with(
            parent: &Self,
            child: &Self,
            _context: MergeContext<'_>,
        ) -> Result<Self, MergeError> {
            Ok(Self(parent.0 + child.0))
        }
    }

    #[test]
    fn merge_derived_struct() {
        #[derive(Merge, PartialEq, Eq, Debug)]
        #[merge(path_overrides(merge = "super"))]
        struct Mergeable {
            one: Option<u8>,
            two: Option<bool>,
            three: u8,
        }

        assert_eq!(
            merge(
                &Mergeable {
                    one: Some(1),
                    two: None,
                    three: 3,
                },
                &Mergeable {
                    one: None,
                    two: None,
                    three: 0,
                }
            )
            .unwrap(),
            Mergeable {
                one: Some(1),
                two: None,
                three: 0,
            }
        );
        assert_eq!(
            merge(
                &Mergeable {
                    one: Some(1),
                    two: Some(true),
                    three: 3,
                },
                &Mergeable {
                    one: Some(0),
                    two: Some(false),
                    three: 4,
                }
            )
            .unwrap(),
            Mergeable {
                one: Some(0),
                two: Some(false),
                three: 4,
            }
        );
    }

    #[test]
    fn merge_nested_derived_struct() {
        #[derive(Merge, PartialEq, Eq, Debug)]
        #[merge(path_overrides(merge = "super"))]
        struct Parent {
            one: Option<u8>,
            child: Child,
        }
        #[derive(Merge, PartialEq, Eq, Debug)]
        #[merge(path_overrides(merge = "super"))]
        struct Child {
            two: Option<u8>,
            three: Option<bool>,
        }

        assert_eq!(
            merge(
                &Parent {
                    one: None,
                    child: Child {
                        two: Some(1),
                        three: Some(false),
                    }
                },
                &Parent {
                    one: Some(0),
                    child: Child {
                        two: None,
                        three: Some(true),
                    }
                },
            )
            .unwrap(),
            Parent {
                one: Some(0),
                child: Child {
                    two: Some(1),
                    three: Some(true)
                },
            }
        );
    }

    #[test]
    fn merge_optional_struct_is_not_merged_deeply() {
        #[derive(Merge, Clone, PartialEq, Eq, Debug)]
        #[merge(path_overrides(merge = "super"))]
        struct Inner {
            a: Option<u8>,
            b: Option<u8>,
        }
        #[derive(Merge, PartialEq, Eq, Debug)]
        #[merge(path_overrides(merge = "super"))]
        struct Outer {
            inner: Option<Inner>,
        }

        let parent = Outer {
            inner: Some(Inner {
                a: Some(1),
                b: Some(2),
            }),
        };
        let child = Outer {
            inner: Some(Inner {
                a: None,
                b: Some(3),
            }),
        };
        assert_eq!(merge(&parent, &child).unwrap(), child);
        assert_eq!(
            merge(&parent, &Outer { inner: None }).unwrap(),
            parent,
            "an absent child keeps the parent"
        );
    }

    #[test]
    fn merge_derived_struct_with_generics() {
        #[derive(Merge, PartialEq, Eq, Debug)]
        #[merge(bound = "B: Merge", path_overrides(merge = "super"))]
        struct Mergeable<'a, B, const C: u8> {
            one: Option<&'a str>,
            two: B,
            three: ParametrizedUnit<C>,
        }
        #[derive(PartialEq, Eq, Debug)]
        struct ParametrizedUnit<const N: u8>;
        impl<const N: u8> Merge for ParametrizedUnit<N> {
            fn merge_with(
                _parent: &Self,
                _child: &Self,
                _context: MergeContext<'_>,
            ) -> Result<Self, MergeError> {
                Ok(Self)
            }
        }

        assert_eq!(
            merge(
                &Mergeable {
                    one: Some("abc"),
                    two: None,
                    three: ParametrizedUnit::<23>,
                },
                &Mergeable {
                    one: None,
                    two: Some(23),
                    three: ParametrizedUnit,
                },
            )
            .unwrap(),
            Mergeable {
                one: Some("abc"),
                two: Some(23),
                three: ParametrizedUnit,
            }
        );
    }

    #[test]
    fn merge_derived_tuple_struct() {
        #[derive(Merge, PartialEq, Eq, Debug)]
        #[merge(path_overrides(merge = "super"))]
        struct Mergeable(Option<u8>, Option<u16>, Vec<String>);

        assert_eq!(
            merge(
                &Mergeable(Some(2), Some(3), vec!["a".to_owned()]),
                &Mergeable(Some(1), None, vec!["b".to_owned(), "a".to_owned()])
            )
            .unwrap(),
            Mergeable(Some(1), Some(3), vec!["a".to_owned(), "b".to_owned()])
        );
    }

    #[test]
    fn merge_atomic_enum() {
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        enum Mode {
            Fast,
            Slow,
        }
        impl super::Atomic for Mode {}

        #[derive(Merge, PartialEq, Eq, Debug)]
        #[merge(path_overrides(merge = "super"))]
        struct Mergeable {
            mode: Mode,
            fallback: Option<Mode>,
        }

        assert_eq!(
            merge(
                &Mergeable {
                    mode: Mode::Fast,
                    fallback: Some(Mode::Slow),
                },
                &Mergeable {
                    mode: Mode::Slow,
                    fallback: None,
                },
            )
            .unwrap(),
            Mergeable {
                mode: Mode::Slow,
                fallback: Some(Mode::Slow),
            }
        );
    }

    #[test]
    fn merge_hash_map() {
        use self::Accumulator as Acc;
        assert_eq!(
            merge(
                &HashMap::from([("a", Acc(1)), ("b", Acc(2))]),
                &[("a", Acc(3)), ("c", Acc(5))].into()
            )
            .unwrap(),
            HashMap::from([("a", Acc(4)), ("b", Acc(2)), ("c", Acc(5))])
        );
    }

    #[test]
    fn merge_btree_map() {
        use self::Accumulator as Acc;
        assert_eq!(
            merge(
                &BTreeMap::from([("a", Acc(1)), ("b", Acc(2))]),
                &[("a", Acc(3)), ("c", Acc(5))].into()
            )
            .unwrap(),
            BTreeMap::from([("a", Acc(4)), ("b", Acc(2)), ("c", Acc(5))])
        );
    }

    #[test]
    fn merge_map_of_lists() {
        let parent = BTreeMap::from([("ports".to_owned(), vec![80u16, 443])]);
        let child = BTreeMap::from([("ports".to_owned(), vec![8080u16, 80])]);

        assert_eq!(
            merge(&parent, &child).unwrap(),
            BTreeMap::from([("ports".to_owned(), vec![80u16, 443, 8080])])
        );
    }

    #[test]
    fn merge_standalone_list_rejects_duplicates() {
        let err = merge(&vec![1u8, 2], &vec![3u8, 3]).unwrap_err();
        assert!(matches!(
            err.problem(),
            MergeProblem::DuplicateKey {
                side: Side::Child,
                ..
            }
        ));
    }

    #[test]
    fn merge_all_folds_from_first_to_last() {
        #[derive(Merge, Clone, PartialEq, Eq, Debug)]
        #[merge(path_overrides(merge = "super"))]
        struct Layer {
            a: Option<u8>,
            b: Option<u8>,
            tags: Vec<String>,
        }

        let layers = [
            Layer {
                a: Some(1),
                b: Some(1),
                tags: vec!["base".to_owned()],
            },
            Layer {
                a: Some(2),
                b: None,
                tags: vec!["role".to_owned()],
            },
            Layer {
                a: None,
                b: Some(3),
                tags: vec!["base".to_owned(), "group".to_owned()],
            },
        ];

        let folded = merge_all(&layers).unwrap().unwrap();
        let stepwise = merge(&merge(&layers[0], &layers[1]).unwrap(), &layers[2]).unwrap();
        assert_eq!(folded, stepwise);
        assert_eq!(
            folded,
            Layer {
                a: Some(2),
                b: Some(3),
                tags: vec!["base".to_owned(), "role".to_owned(), "group".to_owned()],
            }
        );

        assert_eq!(merge_all::<Layer>([]).unwrap(), None);
    }

    #[test]
    fn primitives_are_keyed_by_their_display_form() {
        assert_eq!(42u32.key().as_deref(), Some("42"));
        assert_eq!("ssh-ed25519 AAAA".key().as_deref(), Some("ssh-ed25519 AAAA"));
        assert_eq!(true.key().as_deref(), Some("true"));
    }
}
