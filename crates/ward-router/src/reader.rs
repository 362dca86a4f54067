// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Buffers an arbitrarily-chunked byte stream (a FIFO, a socket) into
//! complete `[<timestamp>] VERB;...` records (spec.md §4.7: "partial
//! records are buffered until newline"). Feeding it one byte at a time or
//! one megabyte at a time yields the same sequence of parsed commands.

use tracing::warn;

use crate::command::ExternalCommand;
use crate::parse::parse_line;
use crate::error::RouterError;

/// Accumulates bytes until a newline completes a record, then parses it.
/// Malformed records are logged and dropped (spec.md §4.7) rather than
/// stalling the stream — one bad line never blocks the ones after it.
#[derive(Debug, Default)]
pub struct CommandReader {
    buffer: String,
}

impl CommandReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `chunk` to the internal buffer and returns every complete,
    /// successfully-parsed record it now contains. Anything after the
    /// last newline stays buffered for the next call.
    pub fn feed(&mut self, chunk: &str) -> Vec<(i64, ExternalCommand)> {
        self.buffer.push_str(chunk);
        let mut out = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line = self.buffer[..pos].to_string();
            self.buffer.drain(..=pos);
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(&line) {
                Ok(parsed) => out.push(parsed),
                Err(err) => warn!(%line, error = %err, "dropping malformed external command record"),
            }
        }
        out
    }

    /// Parses a single already-delimited line without going through the
    /// buffer, surfacing the error instead of swallowing it — used by
    /// callers (tests, `PROCESS_*_CHECK_RESULT` submitted synchronously)
    /// that want to react to a malformed record themselves.
    pub fn parse_one(line: &str) -> Result<(i64, ExternalCommand), RouterError> {
        parse_line(line)
    }

    /// Whether a partial (newline-less) record is still buffered.
    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_yields_nothing_until_newline() {
        let mut reader = CommandReader::new();
        assert!(reader.feed("[1000] ENABLE_NOTIFICATIONS").is_empty());
        assert!(reader.has_pending());
    }

    #[test]
    fn split_across_two_feeds_still_parses() {
        let mut reader = CommandReader::new();
        assert!(reader.feed("[1000] ENABLE_NOTIF").is_empty());
        let parsed = reader.feed("ICATIONS\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].0, 1000);
        assert!(!reader.has_pending());
    }

    #[test]
    fn multiple_records_in_one_chunk_all_parse() {
        let mut reader = CommandReader::new();
        let parsed = reader.feed("[1000] ENABLE_NOTIFICATIONS\n[1001] DISABLE_NOTIFICATIONS\n");
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn malformed_record_is_dropped_not_fatal() {
        let mut reader = CommandReader::new();
        let parsed = reader.feed("garbage no timestamp\n[1000] ENABLE_NOTIFICATIONS\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].0, 1000);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut reader = CommandReader::new();
        let parsed = reader.feed("\n\n[1000] ENABLE_NOTIFICATIONS\n");
        assert_eq!(parsed.len(), 1);
    }
}
