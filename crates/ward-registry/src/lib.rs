// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ward-registry: the entity registry (L4, spec.md §3).
//!
//! Owns every host, service, contact, group, command, connector,
//! timeperiod, dependency, escalation, downtime, and comment the daemon
//! knows about, keyed for O(1) lookup by name or id. Implements
//! `ward_time::TimePeriodLookup` and `ward_macros::MacroLookup` so the
//! evaluator and macro expander never depend on this crate directly —
//! only on the traits they declare.

pub mod error;
pub mod registry;
pub mod seed;

pub use error::RegistryError;
pub use registry::{Registry, SharedRegistry};
pub use seed::{RegistrySeed, SeedError};
