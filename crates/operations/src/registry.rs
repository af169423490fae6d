// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Operation Registry (C9, spec.md §4.9): indexes modules by operation
//! type and serves id- and type-driven lookups.

use crate::error::OperationsError;
use crate::operation::Operation;
use crate::operation_type::OperationType;
use kiara_core::{Manifest, OperationId};
use kiara_modules::ModuleRegistry;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Registered operation types plus the operations they've indexed.
pub struct OperationRegistry {
    types: RwLock<HashMap<String, Arc<dyn OperationType>>>,
    operations: RwLock<HashMap<OperationId, Operation>>,
    by_type: RwLock<HashMap<String, Vec<OperationId>>>,
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self {
            types: RwLock::new(HashMap::new()),
            operations: RwLock::new(HashMap::new()),
            by_type: RwLock::new(HashMap::new()),
        }
    }

    /// Register `operation_type`, then index it against every module
    /// currently known to `modules` plus its own [`OperationType::included_configs`].
    pub fn register_type(
        &self,
        operation_type: Arc<dyn OperationType>,
        modules: &ModuleRegistry,
    ) -> Result<(), OperationsError> {
        let type_name = operation_type.operation_type_name().to_string();
        {
            let mut guard = self.types.write();
            if guard.contains_key(&type_name) {
                return Err(OperationsError::DuplicateOperationType(type_name));
            }
            guard.insert(type_name.clone(), Arc::clone(&operation_type));
        }

        for module_type in modules.module_types() {
            let manifest = Manifest::new(module_type.clone());
            self.index_manifest(&*operation_type, &type_name, manifest, modules)?;
        }

        for config in operation_type.included_configs() {
            self.index_manifest(&*operation_type, &type_name, config.manifest(), modules)?;
        }

        Ok(())
    }

    fn index_manifest(
        &self,
        operation_type: &dyn OperationType,
        type_name: &str,
        manifest: Manifest,
        modules: &ModuleRegistry,
    ) -> Result<(), OperationsError> {
        let module = modules.create(&manifest)?;
        let Some(details) = operation_type.matches(&manifest.module_type, &*module) else {
            return Ok(());
        };

        let operation_id = OperationId::new(format!("{}::{}", type_name, manifest.module_type));
        let operation = Operation {
            operation_id: operation_id.clone(),
            manifest,
            module,
            details,
        };

        let mut operations = self.operations.write();
        if operations.contains_key(&operation_id) {
            return Err(OperationsError::DuplicateOperationId {
                operation_id,
                operation_type: type_name.to_string(),
            });
        }
        operations.insert(operation_id.clone(), operation);
        drop(operations);

        self.by_type.write().entry(type_name.to_string()).or_default().push(operation_id);
        Ok(())
    }

    pub fn operations_by_type(&self, operation_type: &str) -> Vec<Operation> {
        let operations = self.operations.read();
        self.by_type
            .read()
            .get(operation_type)
            .into_iter()
            .flatten()
            .filter_map(|id| operations.get(id).cloned())
            .collect()
    }

    pub fn operation_by_id(&self, operation_id: &OperationId) -> Result<Operation, OperationsError> {
        self.operations
            .read()
            .get(operation_id)
            .cloned()
            .ok_or_else(|| OperationsError::NoSuchOperation(operation_id.clone()))
    }

    /// Type-driven lookup: every registered operation whose details match
    /// the given, non-`None` filters. `None` filters match anything.
    pub fn find(&self, source_type: Option<&str>, target_type: Option<&str>) -> Vec<Operation> {
        self.operations
            .read()
            .values()
            .filter(|op| {
                source_type
                    .map(|t| op.details.source_type.as_deref() == Some(t))
                    .unwrap_or(true)
                    && target_type
                        .map(|t| op.details.target_type.as_deref() == Some(t))
                        .unwrap_or(true)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
