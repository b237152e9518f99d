use serde::{Deserialize, Serialize};

use super::{Resource, is_default};
use crate::merge::{Keyed, Merge};

/// Disks, filesystems and the nodes (files, directories and links) placed on them.
///
/// Files, directories and links are all keyed by their path, and share a correlation handle: replacing a file
/// with a link of the same path in a more specific fragment removes the file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
pub struct Storage {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disks: Vec<Disk>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub raid: Vec<Raid>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filesystems: Vec<Filesystem>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[merge(merged_key = "path")]
    pub files: Vec<File>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[merge(merged_key = "path")]
    pub directories: Vec<Directory>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[merge(merged_key = "path")]
    pub links: Vec<Link>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
#[merge(key = "device")]
pub struct Disk {
    pub device: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wipe_table: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partitions: Vec<Partition>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
pub struct Partition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Partition number, `0` picks the next free number
    #[serde(default)]
    pub number: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_mib: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_mib: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_guid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wipe_partition_entry: Option<bool>,
}

/// Partitions are identified by number, or by label if they don't have a fixed number yet.
impl Keyed for Partition {
    fn key(&self) -> Option<String> {
        if self.number != 0 {
            Some(self.number.to_string())
        } else {
            self.label.clone()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
#[merge(key = "name")]
pub struct Raid {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spares: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
#[merge(key = "device")]
pub struct Filesystem {
    pub device: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wipe_filesystem: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mount_options: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
pub struct NodeUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
pub struct NodeGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
#[merge(key = "path")]
pub struct File {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,

    #[serde(default, skip_serializing_if = "is_default")]
    pub user: NodeUser,

    #[serde(default, skip_serializing_if = "is_default")]
    pub group: NodeGroup,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Resource>,

    /// Fragments appended to the file, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[merge(ignore_duplicates)]
    pub append: Vec<Resource>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
#[merge(key = "path")]
pub struct Directory {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,

    #[serde(default, skip_serializing_if = "is_default")]
    pub user: NodeUser,

    #[serde(default, skip_serializing_if = "is_default")]
    pub group: NodeGroup,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
#[merge(key = "path")]
pub struct Link {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,

    #[serde(default, skip_serializing_if = "is_default")]
    pub user: NodeUser,

    #[serde(default, skip_serializing_if = "is_default")]
    pub group: NodeGroup,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard: Option<bool>,
}
