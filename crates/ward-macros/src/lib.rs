// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ward-macros: the `$TOKEN$` template expander (L3, spec.md §4.6).
//!
//! Scanning (`token`) and expansion (`environment`/`expand`) are split so
//! the scanner stays a pure, allocation-light pass over `&str` while the
//! resolver owns everything that needs a registry lookup, a clock, or a
//! user-macro table.

pub mod clean;
pub mod environment;
pub mod error;
pub mod expand;
pub mod resource;
pub mod standard;
pub mod token;

pub use clean::{clean, CleanOptions};
pub use environment::{ArgMacros, MacroContext, MacroLookup, NotificationMacros, StatusSummary, UserMacros};
pub use error::MacroError;
pub use expand::expand;
pub use resource::{load_resource_file, parse_resource_file};
pub use standard::{StandardMacro, STANDARD_MACRO_COUNT};
pub use token::{scan, Token};
