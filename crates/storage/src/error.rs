// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use kiara_core::{ErrorKind, KiaraError};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("write to archive {archive_name} failed: {reason}")]
    ArchiveWriteFailed { archive_name: String, reason: String },

    #[error("read from archive {archive_name} failed: {reason}")]
    ArchiveReadFailed { archive_name: String, reason: String },

    #[error("archive {archive_name} is read-only")]
    ArchiveReadOnly { archive_name: String },
}

impl From<StorageError> for KiaraError {
    fn from(err: StorageError) -> Self {
        let message = err.to_string();
        let archive_name = match &err {
            StorageError::ArchiveWriteFailed { archive_name, .. }
            | StorageError::ArchiveReadFailed { archive_name, .. }
            | StorageError::ArchiveReadOnly { archive_name } => archive_name.clone(),
        };
        KiaraError::new(ErrorKind::Storage, message).with_detail("archive_name", archive_name)
    }
}
