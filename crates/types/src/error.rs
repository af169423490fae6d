// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use kiara_core::{ErrorKind, KiaraError};

/// Failure modes of the data type registry.
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    #[error("no such data type: {0}")]
    NoSuchType(String),

    #[error("data type already registered: {0}")]
    DuplicateType(String),

    #[error("payload does not satisfy schema for type {type_name}: {reason}")]
    TypeMismatch { type_name: String, reason: String },

    #[error("could not parse raw input as {type_name}: {reason}")]
    InvalidPayload { type_name: String, reason: String },
}

impl From<TypesError> for KiaraError {
    fn from(err: TypesError) -> Self {
        let message = err.to_string();
        match &err {
            TypesError::NoSuchType(type_name) => {
                KiaraError::new(ErrorKind::Configuration, message).with_detail("type_name", type_name)
            }
            TypesError::DuplicateType(type_name) => {
                KiaraError::new(ErrorKind::Configuration, message).with_detail("type_name", type_name)
            }
            TypesError::TypeMismatch { type_name, .. } => {
                KiaraError::new(ErrorKind::Data, message).with_detail("type_name", type_name)
            }
            TypesError::InvalidPayload { type_name, .. } => {
                KiaraError::new(ErrorKind::Data, message).with_detail("type_name", type_name)
            }
        }
    }
}
