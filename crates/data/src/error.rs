// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use kiara_core::{ErrorKind, KiaraError};
use kiara_types::TypesError;

/// Failure modes of the value model and data registry.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("payload does not satisfy schema for type {type_name}: {reason}")]
    SchemaViolation { type_name: String, reason: String },

    #[error(transparent)]
    Type(#[from] TypesError),

    #[error("value not found: {0}")]
    ValueNotFound(String),

    #[error("alias not found: {0}")]
    AliasNotFound(String),

    #[error("alias '{0}' is invalid: '.' is reserved as the hierarchy separator")]
    InvalidAlias(String),

    #[error("pedigree unavailable for orphan value {0}")]
    PedigreeMissing(String),

    #[error("value {0} is an orphan and cannot be stored unless marked storable")]
    OrphanNotStorable(String),

    #[error(transparent)]
    Storage(#[from] kiara_storage::StorageError),
}

impl From<DataError> for KiaraError {
    fn from(err: DataError) -> Self {
        let message = err.to_string();
        match &err {
            DataError::SchemaViolation { type_name, .. } => {
                KiaraError::new(ErrorKind::Data, message).with_detail("type_name", type_name)
            }
            DataError::Type(_) => KiaraError::new(ErrorKind::Data, message),
            DataError::ValueNotFound(id) => {
                KiaraError::new(ErrorKind::Data, message).with_detail("value_id", id)
            }
            DataError::AliasNotFound(alias) => {
                KiaraError::new(ErrorKind::Data, message).with_detail("alias", alias)
            }
            DataError::InvalidAlias(alias) => {
                KiaraError::new(ErrorKind::Configuration, message).with_detail("alias", alias)
            }
            DataError::PedigreeMissing(id) => {
                KiaraError::new(ErrorKind::Data, message).with_detail("value_id", id)
            }
            DataError::OrphanNotStorable(id) => {
                KiaraError::new(ErrorKind::Data, message).with_detail("value_id", id)
            }
            DataError::Storage(_) => KiaraError::new(ErrorKind::Storage, message),
        }
    }
}
