use std::collections::BTreeMap;

use config_merge::merge::{Atomic, Merge, merge};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Level {
    Info,
    Debug,
}

impl Atomic for Level {}

#[derive(Clone, Debug, PartialEq, Eq, Merge)]
#[merge(bound = "T: Merge + Clone")]
struct Layered<T> {
    value: T,
    overrides: BTreeMap<String, T>,
}

fn main() {
    let parent = Layered {
        value: Level::Info,
        overrides: BTreeMap::from([("app".to_owned(), Level::Info)]),
    };
    let child = Layered {
        value: Level::Debug,
        overrides: BTreeMap::from([("db".to_owned(), Level::Debug)]),
    };

    let merged = merge(&parent, &child).unwrap();
    assert_eq!(merged.value, Level::Debug);
    assert_eq!(merged.overrides.len(), 2);
}
