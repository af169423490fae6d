// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Alias table: a human-chosen, versioned pointer to a value id.
//!
//! Binding a new value to an alias never overwrites history — it appends.
//! `resolve("x")` returns the latest binding; `resolve("x@1")` returns the
//! first one. Matches the "one lock guards one map" idiom used throughout
//! the rest of this workspace.

use crate::error::DataError;
use kiara_core::ValueId;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};

/// One historical binding of an alias to a value id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasBinding {
    pub value_id: ValueId,
    pub version: u64,
}

/// Validate a candidate alias name.
///
/// `.` is the hierarchical separator (`"dataset.main"`); callers that need a
/// flat, single-segment name (e.g. a module-local result name, not a
/// user-facing hierarchical alias) pass `allow_hierarchical = false` and get
/// `InvalidAlias` back for any embedded `.`.
pub fn validate_alias_name(alias: &str, allow_hierarchical: bool) -> Result<(), DataError> {
    if alias.is_empty() {
        return Err(DataError::InvalidAlias(alias.to_string()));
    }
    if !allow_hierarchical && alias.contains('.') {
        return Err(DataError::InvalidAlias(alias.to_string()));
    }
    Ok(())
}

/// Append-only alias → value_id history, with an optional reverse index
/// (`value_id -> {alias}`) for `find_aliases`.
///
/// Whether the reverse index keeps old pointers after a rebind is a
/// deliberate configuration knob (spec.md §8 scenario (e) and §9 pin this
/// behavior to configuration rather than a fixed assumption): the default
/// drops the old value's reverse pointer on rebind.
pub struct AliasTable {
    history: RwLock<HashMap<String, Vec<AliasBinding>>>,
    reverse: RwLock<HashMap<ValueId, BTreeSet<String>>>,
    keep_reverse_pointers: bool,
}

impl AliasTable {
    pub fn new(keep_reverse_pointers: bool) -> Self {
        Self {
            history: RwLock::new(HashMap::new()),
            reverse: RwLock::new(HashMap::new()),
            keep_reverse_pointers,
        }
    }

    /// Bind `alias` to `value_id`, appending a new version. Returns the new
    /// version number (1-based: the first binding is version 1).
    pub fn set_alias(
        &self,
        alias: &str,
        value_id: ValueId,
        allow_hierarchical: bool,
    ) -> Result<u64, DataError> {
        validate_alias_name(alias, allow_hierarchical)?;

        let previous = {
            let mut history = self.history.write();
            let bindings = history.entry(alias.to_string()).or_default();
            let previous = bindings.last().map(|b| b.value_id.clone());
            let version = bindings.len() as u64 + 1;
            bindings.push(AliasBinding {
                value_id: value_id.clone(),
                version,
            });
            previous
        };

        let mut reverse = self.reverse.write();
        if let Some(prev) = &previous {
            if *prev != value_id && !self.keep_reverse_pointers {
                if let Some(set) = reverse.get_mut(prev) {
                    set.remove(alias);
                }
            }
        }
        reverse.entry(value_id).or_default().insert(alias.to_string());

        let version = {
            let history = self.history.read();
            history.get(alias).map(|b| b.len() as u64).unwrap_or(0)
        };
        Ok(version)
    }

    /// Resolve `"alias"` (latest binding) or `"alias@version"` (a specific
    /// historical binding).
    pub fn resolve(&self, alias_spec: &str) -> Option<ValueId> {
        let history = self.history.read();
        match alias_spec.split_once('@') {
            Some((name, version_str)) => {
                let version: u64 = version_str.parse().ok()?;
                history
                    .get(name)?
                    .iter()
                    .find(|b| b.version == version)
                    .map(|b| b.value_id.clone())
            }
            None => history.get(alias_spec)?.last().map(|b| b.value_id.clone()),
        }
    }

    /// The full version history of `alias`, oldest first.
    pub fn history(&self, alias: &str) -> Vec<AliasBinding> {
        self.history.read().get(alias).cloned().unwrap_or_default()
    }

    /// Aliases currently (or, if configured, ever) bound to `value_id`.
    pub fn find_aliases(&self, value_id: &ValueId) -> BTreeSet<String> {
        self.reverse.read().get(value_id).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "alias_tests.rs"]
mod tests;
