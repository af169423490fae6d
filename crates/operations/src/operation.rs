// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shapes an [`crate::OperationType`] classifies modules into (spec.md
//! §4.9): a generic `Operation` handle plus the per-type `OperationDetails`
//! an operation type attaches to it.

use kiara_core::{Manifest, OperationId};
use kiara_modules::Module;
use kiara_types::ValueSchema;
use std::collections::HashMap;
use std::sync::Arc;

/// What an [`crate::OperationType`] learned about a module it matched.
///
/// `source_type`/`target_type` are only meaningful for conversion-style
/// operation types (e.g. "render `table` as `terminal`"); other operation
/// types leave them `None`.
#[derive(Debug, Clone)]
pub struct OperationDetails {
    pub operation_type: String,
    pub inputs_schema: HashMap<String, ValueSchema>,
    pub outputs_schema: HashMap<String, ValueSchema>,
    pub is_internal: bool,
    pub doc: Option<String>,
    pub source_type: Option<String>,
    pub target_type: Option<String>,
}

impl OperationDetails {
    pub fn new(operation_type: impl Into<String>, module: &dyn Module) -> Self {
        Self {
            operation_type: operation_type.into(),
            inputs_schema: module.inputs_schema(),
            outputs_schema: module.outputs_schema(),
            is_internal: module.characteristics().is_internal,
            doc: None,
            source_type: None,
            target_type: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_conversion(mut self, source_type: impl Into<String>, target_type: impl Into<String>) -> Self {
        self.source_type = Some(source_type.into());
        self.target_type = Some(target_type.into());
        self
    }
}

/// A module configuration an [`crate::OperationType`] wants indexed
/// proactively, independent of whatever modules happen to already be
/// registered (e.g. "every zero-config module is a `custom_module`
/// operation").
#[derive(Debug, Clone)]
pub struct OperationConfig {
    pub module_type: String,
    pub module_config: serde_json::Value,
    pub doc: Option<String>,
}

impl OperationConfig {
    pub fn new(module_type: impl Into<String>) -> Self {
        Self {
            module_type: module_type.into(),
            module_config: serde_json::Value::Null,
            doc: None,
        }
    }

    pub fn manifest(&self) -> Manifest {
        Manifest::new(self.module_type.clone()).with_config(self.module_config.clone())
    }
}

/// A named, ready-to-run module instantiation discoverable through the
/// operation registry.
#[derive(Clone)]
pub struct Operation {
    pub operation_id: OperationId,
    pub manifest: Manifest,
    pub module: Arc<dyn Module>,
    pub details: OperationDetails,
}
