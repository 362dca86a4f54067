// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Contact and contact group entities (spec.md §3).

use crate::custom_vars::CustomVars;
use crate::host::HostNotifyOptions;
use crate::service::ServiceNotifyOptions;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Stable textual identifier for a contact (its unique `name`).
    pub struct ContactId;
}

crate::define_id! {
    /// Stable textual identifier for a contact group.
    pub struct ContactGroupId;
}

/// A notification target address. Index 1-6 correspond to
/// `$CONTACTADDRESS1$`..`$CONTACTADDRESS6$`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactAddresses(pub [String; 6]);

impl ContactAddresses {
    pub fn get(&self, n: u8) -> &str {
        self.0.get((n as usize).saturating_sub(1)).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, n: u8, value: impl Into<String>) {
        if let Some(slot) = self.0.get_mut((n as usize).saturating_sub(1)) {
            *slot = value.into();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub alias: String,
    pub email: String,
    pub pager: String,
    pub addresses: ContactAddresses,
    pub host_notify_options: HostNotifyOptions,
    pub service_notify_options: ServiceNotifyOptions,
    pub host_notification_period: String,
    pub service_notification_period: String,
    pub host_notification_commands: Vec<String>,
    pub service_notification_commands: Vec<String>,
    pub custom_vars: CustomVars,
    pub can_submit_commands: bool,
    pub retain_status_information: bool,
}

impl Contact {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: ContactId::new(name.clone()),
            alias: name.clone(),
            name,
            email: String::new(),
            pager: String::new(),
            addresses: ContactAddresses::default(),
            host_notify_options: HostNotifyOptions::default(),
            service_notify_options: ServiceNotifyOptions::default(),
            host_notification_period: "24x7".to_string(),
            service_notification_period: "24x7".to_string(),
            host_notification_commands: Vec::new(),
            service_notification_commands: Vec::new(),
            custom_vars: CustomVars::new(),
            can_submit_commands: false,
            retain_status_information: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactGroup {
    pub id: ContactGroupId,
    pub alias: String,
    pub members: Vec<ContactId>,
}

impl ContactGroup {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: ContactGroupId::new(name.clone()),
            alias: name,
            members: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_are_one_indexed() {
        let mut addrs = ContactAddresses::default();
        addrs.set(1, "slack://ops");
        assert_eq!(addrs.get(1), "slack://ops");
        assert_eq!(addrs.get(6), "");
    }

    #[test]
    fn new_contact_defaults_to_24x7() {
        let c = Contact::new("jdoe");
        assert_eq!(c.host_notification_period, "24x7");
        assert!(!c.can_submit_commands);
    }
}
