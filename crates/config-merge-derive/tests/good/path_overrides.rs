mod reexport {
    pub use config_merge::merge as layering;
}

use reexport::layering::{Merge, merge};

#[derive(Clone, Debug, PartialEq, Eq, Merge)]
#[merge(path_overrides(merge = "reexport::layering"))]
struct Settings {
    name: String,
    retries: Option<u8>,
}

fn main() {
    let merged = merge(
        &Settings {
            name: "base".to_owned(),
            retries: Some(3),
        },
        &Settings {
            name: "machine".to_owned(),
            retries: None,
        },
    )
    .unwrap();

    assert_eq!(merged.name, "machine");
    assert_eq!(merged.retries, Some(3));
}
