// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type for macro expansion and resource-file loading.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MacroError {
    #[error("resource file {path}: {source}")]
    ResourceFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("resource file {path}: malformed line {line}")]
    ResourceFileSyntax { path: String, line: usize },

    #[error(transparent)]
    Timeperiod(#[from] ward_time::TimeperiodError),
}
