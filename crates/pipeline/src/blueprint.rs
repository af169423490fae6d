// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The declarative shape a pipeline is authored in (spec.md §4.5), before
//! it is resolved into a [`crate::PipelineStructure`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single step reference, either another step's output field
/// (`"step_id.field"`) or a bare pipeline-input name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputLink {
    One(String),
    Many(Vec<String>),
}

impl InputLink {
    pub fn refs(&self) -> Vec<&str> {
        match self {
            InputLink::One(reference) => vec![reference.as_str()],
            InputLink::Many(references) => references.iter().map(String::as_str).collect(),
        }
    }
}

/// One node in a [`PipelineBlueprint`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepSpec {
    pub step_id: String,
    pub module_type: String,
    #[serde(default)]
    pub module_config: serde_json::Value,
    #[serde(default)]
    pub input_links: HashMap<String, InputLink>,
}

/// The declarative, user-authored pipeline description; input to
/// [`crate::structure::build`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineBlueprint {
    pub pipeline_name: String,
    pub steps: Vec<StepSpec>,
    #[serde(default)]
    pub input_aliases: HashMap<String, String>,
    #[serde(default)]
    pub output_aliases: HashMap<String, String>,
    #[serde(default)]
    pub doc: Option<String>,
}

#[cfg(test)]
#[path = "blueprint_tests.rs"]
mod tests;
