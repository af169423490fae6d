// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Manifest`: a module-type plus module-config pair addressing a concrete
//! operation class. Shared between the module registry, the pipeline
//! structure builder, and the job scheduler so all three hash it the same
//! way.

use crate::hash::{cid_json, Cid, FloatNotAllowed};
use serde::{Deserialize, Serialize};

/// Multiple manifests may name the same `module_type` with different
/// `module_config`s; the pair is what actually identifies a runnable
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub module_type: String,
    #[serde(default)]
    pub module_config: serde_json::Value,
}

impl Manifest {
    pub fn new(module_type: impl Into<String>) -> Self {
        Self {
            module_type: module_type.into(),
            module_config: serde_json::Value::Null,
        }
    }

    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.module_config = config;
        self
    }

    /// Canonical hash over `{module_type, module_config}`. Fails if
    /// `module_config` contains a float — module configs must be
    /// integral/string/bool-only, matching the canonical hashing contract.
    pub fn manifest_hash(&self) -> Result<Cid, FloatNotAllowed> {
        cid_json(&serde_json::json!({
            "module_type": self.module_type,
            "module_config": self.module_config,
        }))
    }
}

/// A lightweight pointer to a [`Manifest`] by its hash, carried inside a
/// [`crate::event::Event`] or a `Pedigree` without re-embedding the full
/// config payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRef {
    pub module_type: String,
    pub manifest_hash: Cid,
}

impl TryFrom<&Manifest> for ManifestRef {
    type Error = FloatNotAllowed;

    fn try_from(manifest: &Manifest) -> Result<Self, FloatNotAllowed> {
        Ok(Self {
            module_type: manifest.module_type.clone(),
            manifest_hash: manifest.manifest_hash()?,
        })
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
