// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use kiara_core::{ErrorKind, KiaraError};

/// Failure modes that only arise at the `Context` boundary, once every
/// component crate's own errors have already been folded into
/// [`KiaraError`].
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("no archive mounted under the name '{0}'")]
    NoSuchArchive(String),

    #[error("an archive named '{0}' is already mounted")]
    DuplicateArchive(String),

    #[error("runtime_profile is 'strict': job submission requires a non-empty comment")]
    MissingComment,

    #[error("context is locked by another process")]
    ContextLocked,

    #[error(transparent)]
    Types(#[from] kiara_types::TypesError),

    #[error(transparent)]
    Modules(#[from] kiara_modules::ModulesError),

    #[error(transparent)]
    Data(#[from] kiara_data::DataError),

    #[error(transparent)]
    Pipeline(#[from] kiara_pipeline::PipelineError),

    #[error(transparent)]
    Scheduler(#[from] kiara_scheduler::SchedulerError),

    #[error(transparent)]
    Operations(#[from] kiara_operations::OperationsError),
}

impl From<ContextError> for KiaraError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::NoSuchArchive(ref name) => {
                KiaraError::new(ErrorKind::Storage, err.to_string()).with_detail("archive_name", name)
            }
            ContextError::DuplicateArchive(ref name) => {
                KiaraError::new(ErrorKind::Configuration, err.to_string()).with_detail("archive_name", name)
            }
            ContextError::MissingComment => KiaraError::new(ErrorKind::Configuration, err.to_string()),
            ContextError::ContextLocked => KiaraError::new(ErrorKind::System, err.to_string()),
            ContextError::Types(e) => e.into(),
            ContextError::Modules(e) => e.into(),
            ContextError::Data(e) => e.into(),
            ContextError::Pipeline(e) => e.into(),
            ContextError::Scheduler(e) => e.into(),
            ContextError::Operations(e) => e.into(),
        }
    }
}
