// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom variable maps (`$_HOSTfoo$`, `$_SERVICEfoo$`, `$_CONTACTfoo$`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single custom variable: its value, and whether it should be exported
/// to the probe's environment as `NAGIOS__HOSTFOO` (per spec.md §6's
/// `MACRO_ENV_VAR_PREFIX`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomVar {
    pub value: String,
    #[serde(default)]
    pub exported_to_env: bool,
}

impl CustomVar {
    pub fn new(value: impl Into<String>, exported_to_env: bool) -> Self {
        Self {
            value: value.into(),
            exported_to_env,
        }
    }
}

/// Ordered map from custom variable name (without the leading `_`) to its
/// value. `IndexMap` preserves insertion order so macro/env expansion is
/// deterministic across runs, matching the teacher's use of `indexmap` for
/// anything whose iteration order is externally observable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomVars(pub IndexMap<String, CustomVar>);

impl CustomVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, var: CustomVar) {
        self.0.insert(name.into(), var);
    }

    pub fn get(&self, name: &str) -> Option<&CustomVar> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CustomVar)> {
        self.0.iter()
    }

    pub fn exported(&self) -> impl Iterator<Item = (&String, &CustomVar)> {
        self.0.iter().filter(|(_, v)| v.exported_to_env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exported_filters() {
        let mut vars = CustomVars::new();
        vars.insert("region", CustomVar::new("us-east", true));
        vars.insert("owner", CustomVar::new("sre", false));
        let exported: Vec<_> = vars.exported().map(|(k, _)| k.as_str()).collect();
        assert_eq!(exported, vec!["region"]);
    }
}
