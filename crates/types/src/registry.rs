// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The data type registry: a map of type name to type handler, plus the
//! lineage graph handlers are registered into.

use crate::TypesError;
use kiara_core::hash::Cid;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Four operations every data type provides on payloads of its native
/// representation.
///
/// `type_config` is the arbitrary, structurally-hashable configuration a
/// schema attaches to this type (e.g. a string type's `max_len`).
pub trait DataTypeHandler: Send + Sync {
    /// The name this type is registered under.
    fn type_name(&self) -> &str;

    /// The parent type in the lineage graph. `any`'s parent is itself — the
    /// registry's `lineage` walk stops there.
    fn parent_type(&self) -> &str;

    /// Check that `payload` is a legal value of this type under `config`.
    fn validate(&self, config: &serde_json::Value, payload: &serde_json::Value) -> Result<(), TypesError>;

    /// Size of `payload` in bytes, for accounting and storage planning.
    fn calculate_size(&self, payload: &serde_json::Value) -> u64;

    /// Content hash of `payload`, used as the value's `data_hash`.
    fn calculate_hash(&self, payload: &serde_json::Value) -> Result<Cid, TypesError>;

    /// Coerce a raw, language-native input into this type's canonical
    /// representation.
    fn parse(&self, config: &serde_json::Value, raw: &serde_json::Value) -> Result<serde_json::Value, TypesError>;
}

/// Registry of data type handlers, keyed by `type_name`, with a lineage
/// graph rooted at `any`.
///
/// A single `RwLock` around the map mirrors the "one lock guards one map"
/// idiom used throughout the lead crate's storage/engine layers — lookups
/// vastly outnumber registrations, so readers never contend with each
/// other.
#[derive(Default)]
pub struct TypeRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn DataTypeHandler>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Fails with `DuplicateType` if the name is
    /// already taken.
    pub fn register(&self, handler: Arc<dyn DataTypeHandler>) -> Result<(), TypesError> {
        let mut handlers = self.handlers.write();
        let name = handler.type_name().to_string();
        if handlers.contains_key(&name) {
            return Err(TypesError::DuplicateType(name));
        }
        handlers.insert(name, handler);
        Ok(())
    }

    pub fn get(&self, type_name: &str) -> Result<Arc<dyn DataTypeHandler>, TypesError> {
        self.handlers
            .read()
            .get(type_name)
            .cloned()
            .ok_or_else(|| TypesError::NoSuchType(type_name.to_string()))
    }

    /// The chain from `type_name` up to and including `any`.
    pub fn lineage(&self, type_name: &str) -> Result<Vec<String>, TypesError> {
        let handlers = self.handlers.read();
        let mut chain = Vec::new();
        let mut current = type_name.to_string();
        loop {
            let handler = handlers
                .get(&current)
                .ok_or_else(|| TypesError::NoSuchType(current.clone()))?;
            chain.push(current.clone());
            let parent = handler.parent_type().to_string();
            if parent == current {
                break;
            }
            current = parent;
        }
        Ok(chain)
    }

    pub fn is_subtype(&self, child: &str, parent: &str) -> Result<bool, TypesError> {
        Ok(self.lineage(child)?.iter().any(|t| t == parent))
    }

    pub fn validate(
        &self,
        type_name: &str,
        config: &serde_json::Value,
        payload: &serde_json::Value,
    ) -> Result<(), TypesError> {
        self.get(type_name)?.validate(config, payload)
    }

    pub fn parse(
        &self,
        type_name: &str,
        config: &serde_json::Value,
        raw: &serde_json::Value,
    ) -> Result<serde_json::Value, TypesError> {
        self.get(type_name)?.parse(config, raw)
    }

    /// All registered type names.
    pub fn type_names(&self) -> Vec<String> {
        self.handlers.read().keys().cloned().collect()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
