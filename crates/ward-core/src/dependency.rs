// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host/service dependency entity (spec.md §3/§4.4 dependency suppression
//! step).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyKind {
    Notification,
    Execution,
}

/// Which states of the master object suppress the dependent (spec.md §3:
/// a bitset over {up/ok, down/warning, unreachable/critical, pending,
/// unknown (service only)}).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureOptions {
    pub on_up_or_ok: bool,
    pub on_down_or_warning: bool,
    pub on_unreachable_or_critical: bool,
    pub on_unknown: bool,
    pub on_pending: bool,
}

/// A dependency of one host/service on another: the dependent is skipped
/// (checks, notifications, or both per `kind`) when the master is in one
/// of the configured failure states.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    pub kind: DependencyKind,
    pub dependent_host_name: String,
    pub dependent_service_description: Option<String>,
    pub master_host_name: String,
    pub master_service_description: Option<String>,
    pub failure_options: FailureOptions,
    pub dependency_period: Option<String>,
    pub inherits_parent: bool,
}

impl Dependency {
    pub fn new(
        kind: DependencyKind,
        dependent_host_name: impl Into<String>,
        master_host_name: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            dependent_host_name: dependent_host_name.into(),
            dependent_service_description: None,
            master_host_name: master_host_name.into(),
            master_service_description: None,
            failure_options: FailureOptions::default(),
            dependency_period: None,
            inherits_parent: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_options_default_to_no_suppression() {
        let dep = Dependency::new(DependencyKind::Notification, "web1", "router1");
        assert!(!dep.failure_options.on_down_or_warning);
    }
}
