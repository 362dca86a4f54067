// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ward-router: the external-command router (X, spec.md §4.7).
//!
//! Parsing (`parse`) and application (`router`) are split the way the
//! rest of the workspace splits a pure scan from a registry-touching
//! resolver: `parse_line` never sees a `Registry`, `apply` never sees
//! raw text. `reader` sits in front of both, buffering a byte stream into
//! newline-delimited records the way a FIFO tailer hands lines to a
//! command processor.

pub mod command;
pub mod error;
pub mod parse;
pub mod reader;
pub mod router;

pub use command::ExternalCommand;
pub use error::{ApplyError, RouterError};
pub use parse::parse_line;
pub use reader::CommandReader;
pub use router::{apply, RouterEffect};
