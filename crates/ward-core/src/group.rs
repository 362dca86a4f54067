// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host and service group entities (spec.md §3) — plain name aggregations
//! consumed by the notification and router layers for `!hostgroup` style
//! targeting.

use crate::host::HostId;
use crate::service::ServiceId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    pub struct HostGroupId;
}

crate::define_id! {
    pub struct ServiceGroupId;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostGroup {
    pub id: HostGroupId,
    pub alias: String,
    pub members: Vec<HostId>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub notes_url: String,
    #[serde(default)]
    pub action_url: String,
}

impl HostGroup {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: HostGroupId::new(name.clone()),
            alias: name,
            members: Vec::new(),
            notes: String::new(),
            notes_url: String::new(),
            action_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceGroup {
    pub id: ServiceGroupId,
    pub alias: String,
    pub members: Vec<ServiceId>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub notes_url: String,
    #[serde(default)]
    pub action_url: String,
}

impl ServiceGroup {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: ServiceGroupId::new(name.clone()),
            alias: name,
            members: Vec::new(),
            notes: String::new(),
            notes_url: String::new(),
            action_url: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_membership_accumulates() {
        let mut g = HostGroup::new("web-tier");
        g.members.push(HostId::new("web1"));
        g.members.push(HostId::new("web2"));
        assert_eq!(g.members.len(), 2);
    }
}
