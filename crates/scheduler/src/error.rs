// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use kiara_core::{ErrorKind, KiaraError};

/// Failure modes of the job scheduler (spec.md §4.7).
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("missing required input '{field}' for module '{module_type}'")]
    MissingInput { module_type: String, field: String },

    #[error(transparent)]
    Modules(#[from] kiara_modules::ModulesError),

    #[error(transparent)]
    Data(#[from] kiara_data::DataError),

    #[error(transparent)]
    Storage(#[from] kiara_storage::StorageError),

    #[error("module_config cannot be hashed: it contains a float")]
    UnhashableManifest,

    #[error("no such job: {0}")]
    NoSuchJob(String),

    #[error("job {0} has not succeeded; no record available")]
    JobNotSucceeded(String),
}

impl From<SchedulerError> for KiaraError {
    fn from(err: SchedulerError) -> Self {
        KiaraError::new(ErrorKind::Scheduling, err.to_string())
    }
}
