// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Environment`: the recognized configuration options for a [`crate::Context`]
//! (spec.md §6), loadable from YAML/JSON with strict (`deny_unknown_fields`)
//! deserialization the way the lead crate loads its own config structs.

use kiara_scheduler::JobCacheStrategy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Whether job submission requires a provenance comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeProfile {
    #[default]
    Default,
    /// Every job submission must carry a non-empty `comment` (spec.md §6).
    Strict,
}

/// The configuration surface spec.md §6 names. Unknown keys are rejected so
/// a typo in a config file fails loudly instead of being silently ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Environment {
    /// Result-cache strategy the scheduler probes before running a job.
    pub job_cache: JobCacheStrategy,
    /// Whether blueprints may reference external files (e.g. `!include`
    /// directives). The core does not resolve such references itself; this
    /// flag is consulted by the (out-of-scope) blueprint loader.
    pub allow_external: bool,
    /// Acquire a cross-process lock on context open. The core does not own
    /// a filesystem lock backend (concrete archives do); this flag is
    /// surfaced for an embedding archive to honor.
    pub lock_context: bool,
    pub runtime_profile: RuntimeProfile,
    /// Additional blueprint search paths, consulted by the (out-of-scope)
    /// blueprint loader rather than the core itself.
    pub extra_pipeline_folders: Vec<PathBuf>,
    /// Resolves the spec.md §9 open question on alias reverse-index upkeep:
    /// when `false` (default), rebinding an alias drops the old value's
    /// reverse pointer; when `true`, `find_aliases` keeps returning the
    /// alias for every value it was ever bound to.
    pub keep_alias_reverse_pointers: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            job_cache: JobCacheStrategy::ValueId,
            allow_external: false,
            lock_context: false,
            runtime_profile: RuntimeProfile::default(),
            extra_pipeline_folders: Vec::new(),
            keep_alias_reverse_pointers: false,
        }
    }
}

impl Environment {
    /// Parse an `Environment` from a YAML document.
    pub fn from_yaml(input: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }

    /// Parse an `Environment` from a JSON document.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
