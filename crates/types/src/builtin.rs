// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The built-in primitive types: `any` (the lineage root), `boolean`,
//! `integer`, `string`, `bytes`.

use crate::registry::{DataTypeHandler, TypeRegistry};
use crate::TypesError;
use kiara_core::hash::{cid_json, Cid};
use std::sync::Arc;

/// The root of every lineage. Accepts any payload without inspection.
pub struct AnyType;

impl DataTypeHandler for AnyType {
    fn type_name(&self) -> &str {
        "any"
    }

    fn parent_type(&self) -> &str {
        "any"
    }

    fn validate(&self, _config: &serde_json::Value, _payload: &serde_json::Value) -> Result<(), TypesError> {
        Ok(())
    }

    fn calculate_size(&self, payload: &serde_json::Value) -> u64 {
        serde_json::to_vec(payload).map(|b| b.len() as u64).unwrap_or(0)
    }

    fn calculate_hash(&self, payload: &serde_json::Value) -> Result<Cid, TypesError> {
        hash_json_payload("any", payload)
    }

    fn parse(&self, _config: &serde_json::Value, raw: &serde_json::Value) -> Result<serde_json::Value, TypesError> {
        Ok(raw.clone())
    }
}

pub struct BooleanType;

impl DataTypeHandler for BooleanType {
    fn type_name(&self) -> &str {
        "boolean"
    }

    fn parent_type(&self) -> &str {
        "any"
    }

    fn validate(&self, _config: &serde_json::Value, payload: &serde_json::Value) -> Result<(), TypesError> {
        if payload.is_boolean() {
            Ok(())
        } else {
            Err(TypesError::TypeMismatch {
                type_name: self.type_name().to_string(),
                reason: format!("expected a boolean, got {payload}"),
            })
        }
    }

    fn calculate_size(&self, _payload: &serde_json::Value) -> u64 {
        1
    }

    fn calculate_hash(&self, payload: &serde_json::Value) -> Result<Cid, TypesError> {
        hash_json_payload(self.type_name(), payload)
    }

    fn parse(&self, _config: &serde_json::Value, raw: &serde_json::Value) -> Result<serde_json::Value, TypesError> {
        match raw {
            serde_json::Value::Bool(_) => Ok(raw.clone()),
            serde_json::Value::String(s) => match s.as_str() {
                "true" => Ok(serde_json::Value::Bool(true)),
                "false" => Ok(serde_json::Value::Bool(false)),
                other => Err(TypesError::InvalidPayload {
                    type_name: self.type_name().to_string(),
                    reason: format!("cannot parse '{other}' as boolean"),
                }),
            },
            other => Err(TypesError::InvalidPayload {
                type_name: self.type_name().to_string(),
                reason: format!("cannot parse {other} as boolean"),
            }),
        }
    }
}

pub struct IntegerType;

impl DataTypeHandler for IntegerType {
    fn type_name(&self) -> &str {
        "integer"
    }

    fn parent_type(&self) -> &str {
        "any"
    }

    fn validate(&self, _config: &serde_json::Value, payload: &serde_json::Value) -> Result<(), TypesError> {
        if payload.is_i64() || payload.is_u64() {
            Ok(())
        } else {
            Err(TypesError::TypeMismatch {
                type_name: self.type_name().to_string(),
                reason: format!("expected an integer, got {payload}"),
            })
        }
    }

    fn calculate_size(&self, _payload: &serde_json::Value) -> u64 {
        8
    }

    fn calculate_hash(&self, payload: &serde_json::Value) -> Result<Cid, TypesError> {
        hash_json_payload(self.type_name(), payload)
    }

    fn parse(&self, _config: &serde_json::Value, raw: &serde_json::Value) -> Result<serde_json::Value, TypesError> {
        match raw {
            serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => Ok(raw.clone()),
            serde_json::Value::String(s) => s.parse::<i64>().map(|i| i.into()).map_err(|_| {
                TypesError::InvalidPayload {
                    type_name: self.type_name().to_string(),
                    reason: format!("cannot parse '{s}' as integer"),
                }
            }),
            other => Err(TypesError::InvalidPayload {
                type_name: self.type_name().to_string(),
                reason: format!("cannot parse {other} as integer"),
            }),
        }
    }
}

pub struct StringType;

impl DataTypeHandler for StringType {
    fn type_name(&self) -> &str {
        "string"
    }

    fn parent_type(&self) -> &str {
        "any"
    }

    fn validate(&self, config: &serde_json::Value, payload: &serde_json::Value) -> Result<(), TypesError> {
        let s = payload.as_str().ok_or_else(|| TypesError::TypeMismatch {
            type_name: self.type_name().to_string(),
            reason: format!("expected a string, got {payload}"),
        })?;
        if let Some(max_len) = config.get("max_len").and_then(|v| v.as_u64()) {
            if s.len() as u64 > max_len {
                return Err(TypesError::TypeMismatch {
                    type_name: self.type_name().to_string(),
                    reason: format!("string of length {} exceeds max_len {max_len}", s.len()),
                });
            }
        }
        Ok(())
    }

    fn calculate_size(&self, payload: &serde_json::Value) -> u64 {
        payload.as_str().map(|s| s.len() as u64).unwrap_or(0)
    }

    fn calculate_hash(&self, payload: &serde_json::Value) -> Result<Cid, TypesError> {
        hash_json_payload(self.type_name(), payload)
    }

    fn parse(&self, _config: &serde_json::Value, raw: &serde_json::Value) -> Result<serde_json::Value, TypesError> {
        match raw {
            serde_json::Value::String(_) => Ok(raw.clone()),
            serde_json::Value::Number(_) | serde_json::Value::Bool(_) => Ok(raw.to_string().into()),
            other => Err(TypesError::InvalidPayload {
                type_name: self.type_name().to_string(),
                reason: format!("cannot parse {other} as string"),
            }),
        }
    }
}

/// Bytes are carried as a base64-encoded JSON string; `validate` checks the
/// encoding round-trips.
pub struct BytesType;

impl DataTypeHandler for BytesType {
    fn type_name(&self) -> &str {
        "bytes"
    }

    fn parent_type(&self) -> &str {
        "any"
    }

    fn validate(&self, _config: &serde_json::Value, payload: &serde_json::Value) -> Result<(), TypesError> {
        let s = payload.as_str().ok_or_else(|| TypesError::TypeMismatch {
            type_name: self.type_name().to_string(),
            reason: format!("expected a base64 string, got {payload}"),
        })?;
        base64::Engine::decode(&base64::engine::general_purpose::STANDARD, s).map_err(|e| {
            TypesError::TypeMismatch {
                type_name: self.type_name().to_string(),
                reason: format!("invalid base64 payload: {e}"),
            }
        })?;
        Ok(())
    }

    fn calculate_size(&self, payload: &serde_json::Value) -> u64 {
        payload
            .as_str()
            .and_then(|s| base64::Engine::decode(&base64::engine::general_purpose::STANDARD, s).ok())
            .map(|b| b.len() as u64)
            .unwrap_or(0)
    }

    fn calculate_hash(&self, payload: &serde_json::Value) -> Result<Cid, TypesError> {
        hash_json_payload(self.type_name(), payload)
    }

    fn parse(&self, _config: &serde_json::Value, raw: &serde_json::Value) -> Result<serde_json::Value, TypesError> {
        match raw {
            serde_json::Value::String(s) => {
                base64::Engine::decode(&base64::engine::general_purpose::STANDARD, s).map_err(|e| {
                    TypesError::InvalidPayload {
                        type_name: self.type_name().to_string(),
                        reason: format!("invalid base64 payload: {e}"),
                    }
                })?;
                Ok(raw.clone())
            }
            other => Err(TypesError::InvalidPayload {
                type_name: self.type_name().to_string(),
                reason: format!("cannot parse {other} as bytes"),
            }),
        }
    }
}

fn hash_json_payload(type_name: &str, payload: &serde_json::Value) -> Result<Cid, TypesError> {
    cid_json(payload).map_err(|_| TypesError::TypeMismatch {
        type_name: type_name.to_string(),
        reason: "floats are not permitted in hashed payloads".to_string(),
    })
}

/// Register the five built-in primitive types into `registry`.
pub fn register_builtins(registry: &TypeRegistry) -> Result<(), TypesError> {
    registry.register(Arc::new(AnyType))?;
    registry.register(Arc::new(BooleanType))?;
    registry.register(Arc::new(IntegerType))?;
    registry.register(Arc::new(StringType))?;
    registry.register(Arc::new(BytesType))?;
    Ok(())
}

#[cfg(test)]
#[path = "builtin_tests.rs"]
mod tests;
