// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-instance mutable pipeline state (spec.md §4.6): propagating input
//! and output changes through the data-flow DAG, and tracking per-step
//! status.

use crate::structure::PipelineStructure;
use kiara_bus::Producer;
use kiara_core::{Event, PipelineInstanceId, ValueId};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Where a step currently sits in its execution lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Stale,
    InputsReady,
    Running,
    ResultsReady,
    Failed,
}

#[derive(Default)]
struct State {
    pipeline_inputs: BTreeMap<String, Option<ValueId>>,
    step_inputs: HashMap<String, HashMap<String, Option<ValueId>>>,
    step_outputs: HashMap<String, HashMap<String, Option<ValueId>>>,
    pipeline_outputs: BTreeMap<String, Option<ValueId>>,
    step_status: HashMap<String, StepStatus>,
}

/// A running instance of a [`PipelineStructure`]. Thread-safe: the
/// scheduler drives it from worker threads as jobs complete.
pub struct PipelineRuntime {
    pipeline_id: PipelineInstanceId,
    structure: PipelineStructure,
    state: RwLock<State>,
}

impl PipelineRuntime {
    pub fn new(pipeline_id: PipelineInstanceId, structure: PipelineStructure) -> Self {
        let mut pipeline_inputs = BTreeMap::new();
        for alias in structure.pipeline_inputs().keys() {
            pipeline_inputs.insert(alias.clone(), None);
        }
        let mut pipeline_outputs = BTreeMap::new();
        for alias in structure.pipeline_outputs().keys() {
            pipeline_outputs.insert(alias.clone(), None);
        }

        let mut step_inputs = HashMap::new();
        let mut step_outputs = HashMap::new();
        let mut step_status = HashMap::new();
        for step in structure.steps() {
            let inputs = structure
                .step_inputs_schema(&step.step_id)
                .map(|schema| schema.keys().map(|field| (field.clone(), None)).collect())
                .unwrap_or_default();
            step_inputs.insert(step.step_id.clone(), inputs);

            let outputs = structure
                .step_outputs_schema(&step.step_id)
                .map(|schema| schema.keys().map(|field| (field.clone(), None)).collect())
                .unwrap_or_default();
            step_outputs.insert(step.step_id.clone(), outputs);

            step_status.insert(step.step_id.clone(), StepStatus::Stale);
        }

        Self {
            pipeline_id,
            structure,
            state: RwLock::new(State {
                pipeline_inputs,
                step_inputs,
                step_outputs,
                pipeline_outputs,
                step_status,
            }),
        }
    }

    pub fn pipeline_id(&self) -> &PipelineInstanceId {
        &self.pipeline_id
    }

    pub fn structure(&self) -> &PipelineStructure {
        &self.structure
    }

    pub fn get_step_status(&self, step_id: &str) -> Option<StepStatus> {
        self.state.read().step_status.get(step_id).copied()
    }

    pub fn get_pipeline_outputs(&self) -> BTreeMap<String, Option<ValueId>> {
        self.state.read().pipeline_outputs.clone()
    }

    pub fn get_step_inputs(&self, step_id: &str) -> Option<HashMap<String, Option<ValueId>>> {
        self.state.read().step_inputs.get(step_id).cloned()
    }

    pub fn get_step_outputs(&self, step_id: &str) -> Option<HashMap<String, Option<ValueId>>> {
        self.state.read().step_outputs.get(step_id).cloned()
    }

    /// Write new values into pipeline-input slots, propagate them to every
    /// bound step input, and transition affected steps back to `STALE`.
    pub fn set_pipeline_inputs(&self, inputs: HashMap<String, ValueId>, producer: &Producer) {
        let mut changed_pipeline_fields = BTreeSet::new();
        let mut per_step_changes: HashMap<String, BTreeSet<String>> = HashMap::new();

        {
            let mut state = self.state.write();
            for (alias, value_id) in &inputs {
                if state.pipeline_inputs.get(alias) == Some(&Some(value_id.clone())) {
                    continue;
                }
                state
                    .pipeline_inputs
                    .insert(alias.clone(), Some(value_id.clone()));
                changed_pipeline_fields.insert(alias.clone());

                if let Some(bindings) = self.structure.pipeline_inputs().get(alias) {
                    for (step_id, field) in bindings {
                        state
                            .step_inputs
                            .entry(step_id.clone())
                            .or_default()
                            .insert(field.clone(), Some(value_id.clone()));
                        state.step_status.insert(step_id.clone(), StepStatus::Stale);
                        per_step_changes
                            .entry(step_id.clone())
                            .or_default()
                            .insert(field.clone());
                    }
                }
            }
            for step_id in per_step_changes.keys() {
                recompute_status(&mut state, step_id);
            }
        }

        if changed_pipeline_fields.is_empty() {
            return;
        }

        producer.emit(Event::PipelineInputChanged {
            pipeline_id: self.pipeline_id.clone(),
            changed_fields: changed_pipeline_fields,
        });
        for (step_id, changed_fields) in per_step_changes {
            producer.emit(Event::StepInputChanged {
                pipeline_id: self.pipeline_id.clone(),
                step_id,
                changed_fields,
            });
        }
    }

    /// Mark `step_id` as dispatched to the scheduler.
    pub fn mark_running(&self, step_id: &str) {
        self.state
            .write()
            .step_status
            .insert(step_id.to_string(), StepStatus::Running);
    }

    /// Mark `step_id` as failed; its outputs remain unset.
    pub fn mark_failed(&self, step_id: &str) {
        self.state
            .write()
            .step_status
            .insert(step_id.to_string(), StepStatus::Failed);
    }

    /// Record a step's successful outputs, propagate them to every
    /// downstream step input and pipeline output, and cascade `STALE`
    /// transitions to affected downstream steps.
    pub fn notify_step_outputs(
        &self,
        step_id: &str,
        outputs: HashMap<String, ValueId>,
        producer: &Producer,
    ) {
        let mut changed_step_fields = BTreeSet::new();
        let mut changed_pipeline_fields = BTreeSet::new();
        let mut downstream_changes: HashMap<String, BTreeSet<String>> = HashMap::new();

        {
            let mut state = self.state.write();
            for (field, value_id) in &outputs {
                state
                    .step_outputs
                    .entry(step_id.to_string())
                    .or_default()
                    .insert(field.clone(), Some(value_id.clone()));
                changed_step_fields.insert(field.clone());

                if let Some(alias) = self.structure.output_alias_of(step_id, field) {
                    state
                        .pipeline_outputs
                        .insert(alias.to_string(), Some(value_id.clone()));
                    changed_pipeline_fields.insert(alias.to_string());
                }

                for (downstream_step, downstream_field) in self.structure.consumers_of(step_id, field) {
                    state
                        .step_inputs
                        .entry(downstream_step.clone())
                        .or_default()
                        .insert(downstream_field.clone(), Some(value_id.clone()));
                    state
                        .step_status
                        .insert(downstream_step.clone(), StepStatus::Stale);
                    downstream_changes
                        .entry(downstream_step)
                        .or_default()
                        .insert(downstream_field);
                }
            }

            state
                .step_status
                .insert(step_id.to_string(), StepStatus::ResultsReady);
            for downstream_step in downstream_changes.keys() {
                recompute_status(&mut state, downstream_step);
            }
        }

        if !changed_step_fields.is_empty() {
            producer.emit(Event::StepOutputChanged {
                pipeline_id: self.pipeline_id.clone(),
                step_id: step_id.to_string(),
                changed_fields: changed_step_fields,
            });
        }
        if !changed_pipeline_fields.is_empty() {
            producer.emit(Event::PipelineOutputChanged {
                pipeline_id: self.pipeline_id.clone(),
                changed_fields: changed_pipeline_fields,
            });
        }
        for (downstream_step, changed_fields) in downstream_changes {
            producer.emit(Event::StepInputChanged {
                pipeline_id: self.pipeline_id.clone(),
                step_id: downstream_step,
                changed_fields,
            });
        }
    }

    /// Steps whose every input slot is set and which are not yet running
    /// or complete — ready for the scheduler to dispatch.
    pub fn ready_steps(&self) -> Vec<String> {
        let state = self.state.read();
        state
            .step_status
            .iter()
            .filter(|(_, status)| **status == StepStatus::InputsReady)
            .map(|(step_id, _)| step_id.clone())
            .collect()
    }
}

fn recompute_status(state: &mut State, step_id: &str) {
    let current = state.step_status.get(step_id).copied().unwrap_or(StepStatus::Stale);
    if current == StepStatus::Running || current == StepStatus::ResultsReady || current == StepStatus::Failed {
        return;
    }
    let all_set = state
        .step_inputs
        .get(step_id)
        .map(|fields| fields.values().all(Option::is_some))
        .unwrap_or(true);
    state.step_status.insert(
        step_id.to_string(),
        if all_set { StepStatus::InputsReady } else { StepStatus::Stale },
    );
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
