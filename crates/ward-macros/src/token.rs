// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scans a template string for `$...$` macro tokens.
//!
//! The scanner is a single left-to-right pass; it never looks inside an
//! already-expanded value (expansion output is not re-scanned).

/// One piece of a scanned template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Raw text to copy through unchanged.
    Literal(&'a str),
    /// A `$NAME$` or `$NAME:arg1:arg2$` reference. `name` is the bare macro
    /// name (no leading `_` handling here — custom-variable macros keep
    /// their `_HOST`/`_SERVICE`/`_CONTACT` prefix in `name`).
    Macro { name: &'a str, args: Vec<&'a str> },
}

/// Scan `template` into literal and macro tokens.
///
/// A lone unmatched `$` (no closing `$`) is treated as a literal for the
/// remainder of the string, matching the historical behavior of leaving
/// malformed input alone rather than erroring.
pub fn scan(template: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = template;

    while let Some(dollar) = rest.find('$') {
        if dollar > 0 {
            tokens.push(Token::Literal(&rest[..dollar]));
        }
        let after = &rest[dollar + 1..];
        match after.find('$') {
            Some(close) => {
                let body = &after[..close];
                if body.is_empty() {
                    // "$$" is a literal escaped dollar sign.
                    tokens.push(Token::Literal("$"));
                } else {
                    tokens.push(parse_macro_body(body));
                }
                rest = &after[close + 1..];
            }
            None => {
                // No closing '$': everything from here on is literal.
                tokens.push(Token::Literal(&rest[dollar..]));
                rest = "";
                break;
            }
        }
    }
    if !rest.is_empty() {
        tokens.push(Token::Literal(rest));
    }
    tokens
}

fn parse_macro_body(body: &str) -> Token<'_> {
    let mut parts = body.split(':');
    let name = parts.next().unwrap_or(body);
    let args = parts.collect();
    Token::Macro { name, args }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
