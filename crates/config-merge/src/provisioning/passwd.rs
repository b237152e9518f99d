use serde::{Deserialize, Serialize};

use crate::merge::Merge;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
pub struct Passwd {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<PasswdUser>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<PasswdGroup>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
#[merge(key = "name")]
pub struct PasswdUser {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    /// Keys are correlated by value, so a key is only authorized once
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssh_authorized_keys: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gecos: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_create_home: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_group: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Merge)]
#[serde(rename_all = "camelCase")]
#[merge(key = "name")]
pub struct PasswdGroup {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gid: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<bool>,
}
