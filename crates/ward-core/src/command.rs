// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configured command and connector entities (spec.md §3/§4.2). This crate
//! only defines the shapes; `ward-exec` owns running them.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// A configured command's unique name (e.g. `check_ping`).
    pub struct CommandId;
}

crate::define_id! {
    /// A configured connector's unique name.
    pub struct ConnectorId;
}

/// A configured command: its name and the `$ARGn$`-templated command line
/// run when it's invoked. Macro expansion happens in `ward-macros` before
/// `ward-exec` forks or hands the line to a connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    pub id: CommandId,
    pub line: String,
    /// If set, this command is dispatched through the named long-lived
    /// connector process instead of a fresh fork-exec (spec.md §4.2).
    pub connector: Option<ConnectorId>,
}

impl Command {
    pub fn new(name: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            id: CommandId::new(name),
            line: line.into(),
            connector: None,
        }
    }

    pub fn with_connector(mut self, connector: ConnectorId) -> Self {
        self.connector = Some(connector);
        self
    }
}

/// A long-lived external process that accepts framed command requests on
/// stdin and replies with framed results on stdout, avoiding a fork-exec
/// per check (spec.md §4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    pub id: ConnectorId,
    pub exec_line: String,
    /// Milliseconds to wait for the connector to report itself ready
    /// after spawn before falling back to raw fork-exec for pending
    /// checks.
    pub startup_timeout_ms: u64,
}

impl Connector {
    pub fn new(name: impl Into<String>, exec_line: impl Into<String>) -> Self {
        Self {
            id: ConnectorId::new(name),
            exec_line: exec_line.into(),
            startup_timeout_ms: 5_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_can_target_a_connector() {
        let cmd = Command::new("check_ping", "$USER1$/check_ping -H $HOSTADDRESS$")
            .with_connector(ConnectorId::new("perl-connector"));
        assert!(cmd.connector.is_some());
    }
}
