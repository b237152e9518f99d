//! A machine provisioning schema, in the style of Ignition configs.
//!
//! A provisioning [`Config`] describes the disks, files, systemd units and users of a machine. Configs are
//! usually layered: a base config shared by a fleet, overridden by a config for a machine role, overridden by
//! one for the individual machine.
//!
//! ```
//! use config_merge::{document, provisioning::Config};
//!
//! let merged: Config = document::merge_sources([
//!     r#"{"ignition": {"version": "3.0.0"}, "storage": {"files": [{"path": "/etc/motd", "mode": 420}]}}"#,
//!     r#"{"ignition": {"version": "3.0.0"}, "storage": {"files": [{"path": "/etc/motd", "mode": 384}]}}"#,
//! ])
//! .unwrap();
//!
//! assert_eq!(merged.storage.files[0].mode, Some(384));
//! ```
use serde::{Deserialize, Serialize};

use crate::{document::Document, merge::Merge};

mod passwd;
mod storage;
mod systemd;

pub use passwd::{Passwd, PasswdGroup, PasswdUser};
pub use storage::{
    Directory, Disk, File, Filesystem, Link, NodeGroup, NodeUser, Partition, Raid, Storage,
};
pub use systemd::{Dropin, Systemd, Unit};

pub(crate) fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub ignition: Ignition,

    #[serde(default, skip_serializing_if = "is_default")]
    pub storage: Storage,

    #[serde(default, skip_serializing_if = "is_default")]
    pub systemd: Systemd,

    #[serde(default, skip_serializing_if = "is_default")]
    pub passwd: Passwd,
}

impl Document for Config {
    const VERSION: &'static str = "3.0.0";

    fn version(&self) -> &str {
        &self.ignition.version
    }

    fn raw_version(raw: &serde_yaml::Value) -> Option<&serde_yaml::Value> {
        raw.get("ignition")?.get("version")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
pub struct Ignition {
    pub version: String,

    #[serde(default, skip_serializing_if = "is_default")]
    pub config: IgnitionConfig,

    #[serde(default, skip_serializing_if = "is_default")]
    pub timeouts: Timeouts,
}

/// References to other configs that are fetched when the machine boots
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
pub struct IgnitionConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[merge(ignore_duplicates)]
    pub merge: Vec<Resource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<Resource>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
pub struct Timeouts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_response_headers: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_total: Option<u32>,
}

/// Remote (or inline `data:`) content
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,

    #[serde(default, skip_serializing_if = "is_default")]
    pub verification: Verification,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}
