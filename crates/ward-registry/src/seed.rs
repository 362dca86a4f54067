// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The applier's output contract (spec.md §1: "only its output contract
//! is consumed"). Configuration-file parsing lives outside this
//! workspace; what the daemon actually reads at startup is a flat JSON
//! document shaped like this module's `RegistrySeed`, one array per
//! entity kind, already fully resolved (no includes, no templates, no
//! inheritance) the way the applier's output is documented to be.

use crate::error::RegistryError;
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use ward_core::{
    Command, Comment, Connector, Contact, ContactGroup, Dependency, Downtime, Escalation, Host,
    HostGroup, Service, ServiceGroup, TimePeriod,
};

/// One entity per field, each already in its runtime shape. Downtimes and
/// comments carry their own ids (restored via `Registry::restore_downtime`/
/// `restore_comment` rather than `create_downtime`/`create_comment`, which
/// allocate fresh ones), since a seed is restoring state the applier or a
/// retention reload (spec.md §6) already assigned ids to.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegistrySeed {
    #[serde(default)]
    pub timeperiods: Vec<TimePeriod>,
    #[serde(default)]
    pub commands: Vec<Command>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub contact_groups: Vec<ContactGroup>,
    #[serde(default)]
    pub hosts: Vec<Host>,
    #[serde(default)]
    pub host_groups: Vec<HostGroup>,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub service_groups: Vec<ServiceGroup>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub escalations: Vec<Escalation>,
    #[serde(default)]
    pub downtimes: Vec<Downtime>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl RegistrySeed {
    /// Parses a seed document without touching the filesystem, so tests
    /// can exercise malformed input directly.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Reads and parses a seed file (the daemon's `--seed` argument).
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents).map_err(|source| SeedError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Materializes this seed into a fresh `Registry`. Entities are
    /// inserted in dependency order (timeperiods/commands/connectors
    /// before hosts, hosts before services) since later entities
    /// reference earlier ones by name.
    pub fn into_registry(self) -> Result<Registry, RegistryError> {
        let mut reg = Registry::new();
        for tp in self.timeperiods {
            reg.insert_timeperiod(tp);
        }
        for cmd in self.commands {
            reg.insert_command(cmd);
        }
        for conn in self.connectors {
            reg.insert_connector(conn);
        }
        for contact in self.contacts {
            reg.insert_contact(contact);
        }
        for group in self.contact_groups {
            reg.insert_contact_group(group);
        }
        for host in self.hosts {
            reg.insert_host(host)?;
        }
        for group in self.host_groups {
            reg.insert_host_group(group);
        }
        for service in self.services {
            reg.insert_service(service)?;
        }
        for group in self.service_groups {
            reg.insert_service_group(group);
        }
        for dep in self.dependencies {
            reg.add_dependency(dep);
        }
        for esc in self.escalations {
            reg.add_escalation(esc);
        }
        for dt in self.downtimes {
            reg.restore_downtime(dt);
        }
        for c in self.comments {
            reg.restore_comment(c);
        }
        Ok(reg)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read registry seed {path}: {source}")]
    Read { path: String, source: std::io::Error },

    #[error("failed to parse registry seed {path}: {source}")]
    Parse { path: String, source: serde_json::Error },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_seed_still_has_24x7() {
        let seed = RegistrySeed::default();
        let reg = seed.into_registry().unwrap();
        assert!(reg.timeperiod("24x7").is_some());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(RegistrySeed::from_json("not json").is_err());
    }

    #[test]
    fn host_then_service_resolves() {
        use ward_core::{CommandRef, HostId};

        let seed = RegistrySeed {
            hosts: vec![Host::new("web1", CommandRef::new("check_ping"))],
            services: vec![Service::new(HostId::new("web1"), "http", CommandRef::new("check_http"))],
            ..Default::default()
        };
        let reg = seed.into_registry().unwrap();
        assert!(reg.host("web1").is_some());
        assert!(reg.service("web1", "http").is_some());
    }

    #[test]
    fn service_referencing_missing_host_is_still_stored() {
        // Services are keyed by (host_name, description), not validated
        // against a live host at insert time (spec.md §7: a missing
        // referenced entity is caught lazily, per-event, not at load
        // time for every cross-reference).
        use ward_core::{CommandRef, HostId};

        let seed = RegistrySeed {
            services: vec![Service::new(HostId::new("ghost"), "http", CommandRef::new("check_http"))],
            ..Default::default()
        };
        let reg = seed.into_registry().unwrap();
        assert!(reg.service("ghost", "http").is_some());
        assert!(reg.host("ghost").is_none());
    }
}
