// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use kiara_core::{ErrorKind, KiaraError};

/// Failure modes of [`crate::structure::build`] (spec.md §4.5 step 4-6).
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("duplicate step id: {0}")]
    DuplicateStepId(String),

    #[error("step '{step_id}' links unknown field '{field}' to unresolved reference '{reference}'")]
    UnresolvedLink {
        step_id: String,
        field: String,
        reference: String,
    },

    #[error("step '{step_id}' input '{field}' (type {input_type}) is not a supertype of '{reference}' (type {output_type})")]
    SchemaMismatch {
        step_id: String,
        field: String,
        reference: String,
        input_type: String,
        output_type: String,
    },

    #[error("pipeline contains a cycle involving step '{0}'")]
    PipelineCycle(String),

    #[error("alias '{alias}' maps to incompatible schemas from '{first}' and '{second}'")]
    AliasCollision {
        alias: String,
        first: String,
        second: String,
    },

    #[error("module error for step '{step_id}': {source}")]
    Module {
        step_id: String,
        #[source]
        source: kiara_modules::ModulesError,
    },

    #[error("unknown step id referenced: {0}")]
    UnknownStep(String),
}

impl From<PipelineError> for KiaraError {
    fn from(err: PipelineError) -> Self {
        let message = err.to_string();
        KiaraError::new(ErrorKind::Configuration, message)
    }
}
