// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loader for the historical `resource.cfg` file backing `$USERn$`
//! (spec.md §4.6/§6). This is a closed, pre-existing wire format (one
//! `$USERn$=value` assignment per line) rather than new configuration
//! surface, so it gets a small dedicated parser instead of `toml`.

use crate::environment::UserMacros;
use crate::error::MacroError;
use std::path::Path;

/// Parses a resource file's contents into a `UserMacros` table.
///
/// Blank lines and lines starting with `#` are skipped. Every other line
/// must be `$USERn$=value`; anything else is a syntax error reported with
/// its 1-based line number.
pub fn parse_resource_file(contents: &str, path: &Path) -> Result<UserMacros, MacroError> {
    let mut macros = UserMacros::default();
    for (idx, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or_else(|| MacroError::ResourceFileSyntax {
            path: path.display().to_string(),
            line: idx + 1,
        })?;
        let n = key
            .strip_prefix('$')
            .and_then(|k| k.strip_suffix('$'))
            .and_then(|k| k.strip_prefix("USER"))
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|n| (1..=256).contains(n))
            .ok_or_else(|| MacroError::ResourceFileSyntax {
                path: path.display().to_string(),
                line: idx + 1,
            })?;
        macros.set(n, value);
    }
    Ok(macros)
}

/// Reads and parses `path` as a resource file.
pub fn load_resource_file(path: impl AsRef<Path>) -> Result<UserMacros, MacroError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| MacroError::ResourceFile {
        path: path.display().to_string(),
        source,
    })?;
    parse_resource_file(&contents, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn p() -> PathBuf {
        PathBuf::from("resource.cfg")
    }

    #[test]
    fn parses_user_macro_assignments() {
        let src = "# comment\n\n$USER1$=/usr/lib/nagios/plugins\n$USER2$=hunter2\n";
        let macros = parse_resource_file(src, &p()).unwrap();
        assert_eq!(macros.get(1), "/usr/lib/nagios/plugins");
        assert_eq!(macros.get(2), "hunter2");
    }

    #[test]
    fn rejects_malformed_line() {
        let err = parse_resource_file("not an assignment\n", &p()).unwrap_err();
        assert!(matches!(err, MacroError::ResourceFileSyntax { line: 1, .. }));
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = parse_resource_file("$USER999$=x\n", &p()).unwrap_err();
        assert!(matches!(err, MacroError::ResourceFileSyntax { line: 1, .. }));
    }
}
