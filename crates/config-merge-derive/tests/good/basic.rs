use config_merge::merge::{Merge, merge};

#[derive(Clone, Debug, Default, PartialEq, Eq, Merge)]
#[merge(key = "path")]
struct File {
    path: String,
    mode: Option<u32>,
    #[merge(ignore_duplicates)]
    append: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Merge)]
#[merge(key = "path")]
struct Link {
    path: String,
    target: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Merge)]
struct Storage {
    #[merge(merged_key = "path")]
    files: Vec<File>,
    #[merge(merged_key = "path")]
    links: Vec<Link>,
    mount_options: Vec<String>,
}

fn main() {
    let parent = Storage {
        files: vec![File {
            path: "/etc/motd".to_owned(),
            mode: Some(0o644),
            append: vec!["a".to_owned()],
        }],
        links: Vec::new(),
        mount_options: vec!["noatime".to_owned()],
    };
    let child = Storage {
        files: Vec::new(),
        links: vec![Link {
            path: "/etc/motd".to_owned(),
            target: Some("/run/motd".to_owned()),
        }],
        mount_options: vec!["noatime".to_owned(), "nodev".to_owned()],
    };

    let merged = merge(&parent, &child).unwrap();
    assert!(merged.files.is_empty());
    assert_eq!(merged.links, child.links);
    assert_eq!(merged.mount_options, ["noatime", "nodev"]);
}
