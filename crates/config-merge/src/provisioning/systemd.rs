use serde::{Deserialize, Serialize};

use crate::merge::Merge;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
pub struct Systemd {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<Unit>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
#[merge(key = "name")]
pub struct Unit {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropins: Vec<Dropin>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
#[merge(key = "name")]
pub struct Dropin {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
}
