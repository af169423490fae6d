// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use kiara_core::{ErrorKind, KiaraError, OperationId};

/// Failure modes of the operation registry.
#[derive(Debug, thiserror::Error)]
pub enum OperationsError {
    #[error("operation type already registered: {0}")]
    DuplicateOperationType(String),

    #[error("no such operation type: {0}")]
    NoSuchOperationType(String),

    #[error("no such operation: {0}")]
    NoSuchOperation(OperationId),

    #[error("duplicate operation id '{operation_id}' from operation type '{operation_type}'")]
    DuplicateOperationId {
        operation_id: OperationId,
        operation_type: String,
    },

    #[error(transparent)]
    Modules(#[from] kiara_modules::ModulesError),
}

impl From<OperationsError> for KiaraError {
    fn from(err: OperationsError) -> Self {
        KiaraError::new(ErrorKind::Data, err.to_string())
    }
}
