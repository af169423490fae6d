// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolving a [`PipelineBlueprint`] into an immutable [`PipelineStructure`]
//! (spec.md §4.5): schema resolution, the data-flow DAG, and stage
//! stratification.

use crate::blueprint::{InputLink, PipelineBlueprint, StepSpec};
use crate::error::PipelineError;
use kiara_core::Manifest;
use kiara_modules::ModuleRegistry;
use kiara_types::{TypeRegistry, ValueSchema};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Where a step input field's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSource {
    PipelineInput(String),
    StepOutput { step_id: String, field: String },
}

/// The resolved source(s) of one step input field. More than one source
/// means the field was declared with a list-valued [`InputLink::Many`].
#[derive(Debug, Clone)]
pub struct StepInputBinding {
    pub field: String,
    pub sources: Vec<LinkSource>,
}

/// Derived, immutable resolution of a [`PipelineBlueprint`]: schemas,
/// the data-flow DAG, and execution stages.
#[derive(Debug, Clone)]
pub struct PipelineStructure {
    pub pipeline_name: String,
    steps: Vec<StepSpec>,
    step_inputs_schema: HashMap<String, HashMap<String, ValueSchema>>,
    step_outputs_schema: HashMap<String, HashMap<String, ValueSchema>>,
    step_input_bindings: HashMap<String, Vec<StepInputBinding>>,
    /// alias -> step input fields it feeds, as `(step_id, field)`.
    pipeline_inputs: BTreeMap<String, Vec<(String, String)>>,
    /// alias -> the single step output field it exposes.
    pipeline_outputs: BTreeMap<String, (String, String)>,
    stages: Vec<Vec<String>>,
}

impl PipelineStructure {
    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    pub fn stages(&self) -> &[Vec<String>] {
        &self.stages
    }

    pub fn stage_of(&self, step_id: &str) -> Option<usize> {
        self.stages.iter().position(|stage| stage.iter().any(|s| s == step_id))
    }

    pub fn step_inputs_schema(&self, step_id: &str) -> Option<&HashMap<String, ValueSchema>> {
        self.step_inputs_schema.get(step_id)
    }

    pub fn step_outputs_schema(&self, step_id: &str) -> Option<&HashMap<String, ValueSchema>> {
        self.step_outputs_schema.get(step_id)
    }

    pub fn step_input_bindings(&self, step_id: &str) -> &[StepInputBinding] {
        self.step_input_bindings
            .get(step_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn pipeline_inputs(&self) -> &BTreeMap<String, Vec<(String, String)>> {
        &self.pipeline_inputs
    }

    pub fn pipeline_outputs(&self) -> &BTreeMap<String, (String, String)> {
        &self.pipeline_outputs
    }

    /// Downstream `(step_id, field)` pairs whose binding references this
    /// step output, plus the pipeline-output alias if the output is
    /// exposed under one.
    pub fn consumers_of(&self, step_id: &str, field: &str) -> Vec<(String, String)> {
        let mut consumers = Vec::new();
        for (dst_step, bindings) in &self.step_input_bindings {
            for binding in bindings {
                for source in &binding.sources {
                    if let LinkSource::StepOutput {
                        step_id: src_step,
                        field: src_field,
                    } = source
                    {
                        if src_step == step_id && src_field == field {
                            consumers.push((dst_step.clone(), binding.field.clone()));
                        }
                    }
                }
            }
        }
        consumers
    }

    pub fn output_alias_of(&self, step_id: &str, field: &str) -> Option<&str> {
        self.pipeline_outputs
            .iter()
            .find(|(_, (s, f))| s == step_id && f == field)
            .map(|(alias, _)| alias.as_str())
    }
}

fn parse_ref(reference: &str) -> LinkSource {
    match reference.split_once('.') {
        Some((step_id, field)) => LinkSource::StepOutput {
            step_id: step_id.to_string(),
            field: field.to_string(),
        },
        None => LinkSource::PipelineInput(reference.to_string()),
    }
}

/// Resolve `blueprint` into an executable [`PipelineStructure`].
pub fn build(
    blueprint: &PipelineBlueprint,
    modules: &ModuleRegistry,
    types: &TypeRegistry,
) -> Result<PipelineStructure, PipelineError> {
    let mut seen_ids = BTreeSet::new();
    for step in &blueprint.steps {
        if !seen_ids.insert(step.step_id.clone()) {
            return Err(PipelineError::DuplicateStepId(step.step_id.clone()));
        }
    }

    let mut step_inputs_schema = HashMap::new();
    let mut step_outputs_schema = HashMap::new();
    for step in &blueprint.steps {
        let manifest = Manifest::new(step.module_type.clone()).with_config(step.module_config.clone());
        let instance = modules.create(&manifest).map_err(|source| PipelineError::Module {
            step_id: step.step_id.clone(),
            source,
        })?;
        step_inputs_schema.insert(step.step_id.clone(), instance.inputs_schema());
        step_outputs_schema.insert(step.step_id.clone(), instance.outputs_schema());
    }

    let mut step_input_bindings: HashMap<String, Vec<StepInputBinding>> = HashMap::new();
    let mut pipeline_input_groups: BTreeMap<String, Vec<(String, String, ValueSchema)>> = BTreeMap::new();

    for step in &blueprint.steps {
        let inputs = &step_inputs_schema[&step.step_id];
        let mut bindings = Vec::new();
        for (field, input_schema) in inputs {
            let sources: Vec<LinkSource> = match step.input_links.get(field) {
                Some(link) => link.refs().into_iter().map(parse_ref).collect(),
                None => {
                    let alias = blueprint
                        .input_aliases
                        .get(&format!("{}.{}", step.step_id, field))
                        .cloned()
                        .unwrap_or_else(|| field.clone());
                    vec![LinkSource::PipelineInput(alias)]
                }
            };

            for source in &sources {
                match source {
                    LinkSource::StepOutput { step_id: src_step, field: src_field } => {
                        let src_outputs = step_outputs_schema.get(src_step).ok_or_else(|| {
                            PipelineError::UnresolvedLink {
                                step_id: step.step_id.clone(),
                                field: field.clone(),
                                reference: format!("{src_step}.{src_field}"),
                            }
                        })?;
                        let output_schema = src_outputs.get(src_field).ok_or_else(|| {
                            PipelineError::UnresolvedLink {
                                step_id: step.step_id.clone(),
                                field: field.clone(),
                                reference: format!("{src_step}.{src_field}"),
                            }
                        })?;
                        let compatible = types
                            .is_subtype(&output_schema.type_name, &input_schema.type_name)
                            .unwrap_or(false)
                            || output_schema.type_name == input_schema.type_name;
                        if !compatible {
                            return Err(PipelineError::SchemaMismatch {
                                step_id: step.step_id.clone(),
                                field: field.clone(),
                                reference: format!("{src_step}.{src_field}"),
                                input_type: input_schema.type_name.clone(),
                                output_type: output_schema.type_name.clone(),
                            });
                        }
                    }
                    LinkSource::PipelineInput(alias) => {
                        pipeline_input_groups.entry(alias.clone()).or_default().push((
                            step.step_id.clone(),
                            field.clone(),
                            input_schema.clone(),
                        ));
                    }
                }
            }

            bindings.push(StepInputBinding {
                field: field.clone(),
                sources,
            });
        }
        step_input_bindings.insert(step.step_id.clone(), bindings);
    }

    for (alias, group) in &pipeline_input_groups {
        check_schema_collision(alias, group)?;
    }
    let pipeline_inputs: BTreeMap<String, Vec<(String, String)>> = pipeline_input_groups
        .into_iter()
        .map(|(alias, group)| (alias, group.into_iter().map(|(s, f, _)| (s, f)).collect()))
        .collect();

    // Referenced-as-link-target outputs are internal; the remainder are
    // exposed as pipeline outputs unless `output_aliases` narrows the set.
    let mut linked_targets: BTreeSet<(String, String)> = BTreeSet::new();
    for bindings in step_input_bindings.values() {
        for binding in bindings {
            for source in &binding.sources {
                if let LinkSource::StepOutput { step_id, field } = source {
                    linked_targets.insert((step_id.clone(), field.clone()));
                }
            }
        }
    }

    let mut pipeline_output_groups: BTreeMap<String, Vec<(String, String, ValueSchema)>> = BTreeMap::new();
    if blueprint.output_aliases.is_empty() {
        for step in &blueprint.steps {
            for (field, schema) in &step_outputs_schema[&step.step_id] {
                if !linked_targets.contains(&(step.step_id.clone(), field.clone())) {
                    let alias = format!("{}.{}", step.step_id, field);
                    pipeline_output_groups.entry(alias).or_default().push((
                        step.step_id.clone(),
                        field.clone(),
                        schema.clone(),
                    ));
                }
            }
        }
    } else {
        for (reference, alias) in &blueprint.output_aliases {
            let (step_id, field) = reference.split_once('.').ok_or_else(|| PipelineError::UnresolvedLink {
                step_id: String::new(),
                field: String::new(),
                reference: reference.clone(),
            })?;
            let schema = step_outputs_schema
                .get(step_id)
                .and_then(|outputs| outputs.get(field))
                .ok_or_else(|| PipelineError::UnresolvedLink {
                    step_id: step_id.to_string(),
                    field: field.to_string(),
                    reference: reference.clone(),
                })?;
            pipeline_output_groups.entry(alias.clone()).or_default().push((
                step_id.to_string(),
                field.to_string(),
                schema.clone(),
            ));
        }
    }

    for (alias, group) in &pipeline_output_groups {
        check_schema_collision(alias, group)?;
    }
    let pipeline_outputs: BTreeMap<String, (String, String)> = pipeline_output_groups
        .into_iter()
        .map(|(alias, mut group)| {
            let (step_id, field, _) = group.remove(0);
            (alias, (step_id, field))
        })
        .collect();

    let mut graph = DiGraph::<String, ()>::new();
    let mut node_of: HashMap<String, NodeIndex> = HashMap::new();
    for step in &blueprint.steps {
        let idx = graph.add_node(step.step_id.clone());
        node_of.insert(step.step_id.clone(), idx);
    }
    for (step_id, bindings) in &step_input_bindings {
        for binding in bindings {
            for source in &binding.sources {
                if let LinkSource::StepOutput { step_id: src_step, .. } = source {
                    let src_idx = *node_of.get(src_step).ok_or_else(|| PipelineError::UnknownStep(src_step.clone()))?;
                    let dst_idx = node_of[step_id];
                    graph.update_edge(src_idx, dst_idx, ());
                }
            }
        }
    }

    let order = toposort(&graph, None).map_err(|cycle| {
        PipelineError::PipelineCycle(graph[cycle.node_id()].clone())
    })?;

    let mut stage_of: HashMap<NodeIndex, usize> = HashMap::new();
    for node in &order {
        let stage = graph
            .neighbors_directed(*node, Direction::Incoming)
            .map(|pred| stage_of[&pred] + 1)
            .max()
            .unwrap_or(0);
        stage_of.insert(*node, stage);
    }
    let max_stage = stage_of.values().copied().max().unwrap_or(0);
    let mut stages: Vec<Vec<String>> = vec![Vec::new(); max_stage + 1];
    for (node, stage) in &stage_of {
        stages[*stage].push(graph[*node].clone());
    }
    for stage in &mut stages {
        stage.sort();
    }

    Ok(PipelineStructure {
        pipeline_name: blueprint.pipeline_name.clone(),
        steps: blueprint.steps.clone(),
        step_inputs_schema,
        step_outputs_schema,
        step_input_bindings,
        pipeline_inputs,
        pipeline_outputs,
        stages,
    })
}

fn check_schema_collision(alias: &str, group: &[(String, String, ValueSchema)]) -> Result<(), PipelineError> {
    let Some((first_step, first_field, first_schema)) = group.first() else {
        return Ok(());
    };
    for (step_id, field, schema) in &group[1..] {
        if schema.type_name != first_schema.type_name {
            return Err(PipelineError::AliasCollision {
                alias: alias.to_string(),
                first: format!("{first_step}.{first_field}"),
                second: format!("{step_id}.{field}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "structure_tests.rs"]
mod tests;
