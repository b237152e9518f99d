use config_merge::merge::{Keyed, Merge, merge};

#[derive(Clone, Debug, PartialEq, Eq, Merge)]
struct Tags(Vec<String>, Option<String>);

#[derive(Clone, Debug, PartialEq, Eq, Merge)]
struct Marker;

#[derive(Clone, Debug, PartialEq, Eq, Merge)]
struct Empty {}

/// Never correlated, so entries from both sides are kept
#[derive(Clone, Debug, PartialEq, Eq, Merge)]
struct Note {
    text: String,
}

impl Keyed for Note {}

#[derive(Clone, Debug, PartialEq, Eq, Merge)]
struct Notes {
    notes: Vec<Note>,
    marker: Marker,
    empty: Empty,
}

fn main() {
    let tags = merge(
        &Tags(vec!["a".to_owned()], Some("parent".to_owned())),
        &Tags(vec!["b".to_owned()], None),
    )
    .unwrap();
    assert_eq!(tags, Tags(vec!["a".to_owned(), "b".to_owned()], Some("parent".to_owned())));

    let note = |text: &str| Note {
        text: text.to_owned(),
    };
    let notes = merge(
        &Notes {
            notes: vec![note("same")],
            marker: Marker,
            empty: Empty {},
        },
        &Notes {
            notes: vec![note("same")],
            marker: Marker,
            empty: Empty {},
        },
    )
    .unwrap();
    assert_eq!(notes.notes, [note("same"), note("same")]);
}
