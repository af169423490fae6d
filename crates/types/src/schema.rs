// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ValueSchema`: the declared shape of a module input/output field.

use serde::{Deserialize, Serialize};

/// The declared type, config, and optionality of a field.
///
/// Two schemas are equivalent iff `type_name`, `type_config`, and
/// `optional` all match. A schema is satisfied by a value iff the value's
/// type is a sub-type of the schema's type and the configs are compatible
/// (checked via [`crate::TypeRegistry::validate`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueSchema {
    pub type_name: String,
    #[serde(default)]
    pub type_config: serde_json::Value,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl ValueSchema {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            type_config: serde_json::Value::Null,
            optional: false,
            default: None,
            doc: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.type_config = config;
        self
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
