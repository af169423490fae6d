// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Module class registration and per-manifest instance caching (spec.md
//! §4.4). Grounded on the original `ModuleRegistry.create_module`, which
//! keyed a nested `module_type -> manifest_hash -> instance` cache before
//! constructing a fresh module instance.

use crate::error::ModulesError;
use crate::module::Module;
use kiara_core::{Cid, Manifest};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Constructs module instances of one `module_type` from a manifest's
/// `module_config`.
pub trait ModuleClass: Send + Sync {
    fn module_type(&self) -> &str;

    fn create(&self, module_config: &serde_json::Value) -> Result<Arc<dyn Module>, ModulesError>;
}

/// Registered module classes plus a cache of constructed instances keyed
/// by `(module_type, manifest_hash)`, so repeated manifests with identical
/// config reuse the same instance instead of reconstructing it per job.
pub struct ModuleRegistry {
    classes: RwLock<HashMap<String, Arc<dyn ModuleClass>>>,
    instances: Mutex<HashMap<(String, Cid), Arc<dyn Module>>>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            classes: RwLock::new(HashMap::new()),
            instances: Mutex::new(HashMap::new()),
        }
    }

    pub fn register_class(&self, class: Arc<dyn ModuleClass>) -> Result<(), ModulesError> {
        let module_type = class.module_type().to_string();
        let mut guard = self.classes.write();
        if guard.contains_key(&module_type) {
            return Err(ModulesError::DuplicateModule(module_type));
        }
        guard.insert(module_type, class);
        Ok(())
    }

    pub fn module_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn get_class(&self, module_type: &str) -> Option<Arc<dyn ModuleClass>> {
        self.classes.read().get(module_type).cloned()
    }

    /// Build (or return the cached) module instance for `manifest`.
    pub fn create(&self, manifest: &Manifest) -> Result<Arc<dyn Module>, ModulesError> {
        let manifest_hash = manifest
            .manifest_hash()
            .map_err(|_| ModulesError::InvalidManifest {
                module_type: manifest.module_type.clone(),
                reason: "module_config contains a float, which cannot be hashed".to_string(),
            })?;
        let key = (manifest.module_type.clone(), manifest_hash);

        if let Some(existing) = self.instances.lock().get(&key) {
            return Ok(Arc::clone(existing));
        }

        let class = self
            .get_class(&manifest.module_type)
            .ok_or_else(|| ModulesError::NoSuchModule(manifest.module_type.clone()))?;
        let instance = class.create(&manifest.module_config)?;

        let mut guard = self.instances.lock();
        Ok(Arc::clone(
            guard.entry(key).or_insert(instance),
        ))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
