// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `OperationType` trait (spec.md §4.9): classifies modules into
//! operations of a named kind, and may proactively contribute configs of
//! its own to index.

use crate::operation::{OperationConfig, OperationDetails};
use kiara_modules::Module;

/// Indexes modules of a particular kind — e.g. `extract_metadata`,
/// `render_value`, `custom_module`, `pipeline`.
pub trait OperationType: Send + Sync {
    /// The name this operation type is registered and queried under.
    fn operation_type_name(&self) -> &str;

    /// Test whether `module` (registered under `module_type`) qualifies as
    /// an operation of this type. `None` means "not a match".
    fn matches(&self, module_type: &str, module: &dyn Module) -> Option<OperationDetails>;

    /// Module configs this operation type wants instantiated and indexed
    /// proactively, independent of any already-registered module instance.
    /// Most operation types have none.
    fn included_configs(&self) -> Vec<OperationConfig> {
        Vec::new()
    }
}

/// Classifies every module requiring no config as a `custom_module`
/// operation named after its module type — the one operation type every
/// module automatically qualifies for unless it needs configuration.
pub struct CustomModuleOperationType;

impl OperationType for CustomModuleOperationType {
    fn operation_type_name(&self) -> &str {
        "custom_module"
    }

    fn matches(&self, module_type: &str, module: &dyn Module) -> Option<OperationDetails> {
        Some(OperationDetails::new("custom_module", module).with_doc(format!("run '{module_type}' directly")))
    }
}

#[cfg(test)]
#[path = "operation_type_tests.rs"]
mod tests;
