// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use kiara_core::{ErrorKind, KiaraError};

/// Failure modes of the module registry.
#[derive(Debug, thiserror::Error)]
pub enum ModulesError {
    #[error("no such module type: {0}")]
    NoSuchModule(String),

    #[error("module type already registered: {0}")]
    DuplicateModule(String),

    #[error("invalid manifest for module '{module_type}': {reason}")]
    InvalidManifest { module_type: String, reason: String },
}

impl From<ModulesError> for KiaraError {
    fn from(err: ModulesError) -> Self {
        let message = err.to_string();
        match &err {
            ModulesError::NoSuchModule(module_type) => {
                KiaraError::new(ErrorKind::Configuration, message).with_detail("module_type", module_type)
            }
            ModulesError::DuplicateModule(module_type) => {
                KiaraError::new(ErrorKind::Configuration, message).with_detail("module_type", module_type)
            }
            ModulesError::InvalidManifest { module_type, .. } => {
                KiaraError::new(ErrorKind::Configuration, message).with_detail("module_type", module_type)
            }
        }
    }
}

/// The error a [`crate::Module::process`] implementation returns on
/// failure. Carried verbatim into `JobFailReason::Error` by the scheduler.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct ModuleError(pub String);

impl ModuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<String> for ModuleError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for ModuleError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}
