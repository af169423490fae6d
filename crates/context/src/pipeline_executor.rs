// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives a [`PipelineRuntime`] to completion by repeatedly dispatching its
//! ready steps to the job scheduler (spec.md §2: "For pipelines, C5 yields a
//! stage-ordered execution plan that C6 and C7 walk step by step").
//!
//! Neither `kiara-pipeline` nor `kiara-scheduler` depends on the other
//! (spec.md's component table keeps C5/C6 and C7 as siblings under C10), so
//! this glue lives here, in the one crate that already depends on both.

use kiara_bus::Producer;
use kiara_core::{Manifest, PipelineInstanceId, ValueId};
use kiara_pipeline::{PipelineRuntime, PipelineStructure};
use kiara_scheduler::{JobScheduler, JobStatus, SchedulerError};
use std::collections::{BTreeMap, HashMap};

/// Build a fresh [`PipelineRuntime`] from `structure`, seed it with
/// `pipeline_inputs`, then loop over [`PipelineRuntime::ready_steps`] —
/// dispatching each to `scheduler` and feeding its result back in — until no
/// step is ready to run. A failed step leaves its downstream steps `STALE`
/// forever rather than aborting the whole pipeline (spec.md §8 scenario f).
pub fn run_to_completion(
    structure: PipelineStructure,
    pipeline_id: PipelineInstanceId,
    pipeline_inputs: HashMap<String, ValueId>,
    scheduler: &JobScheduler,
    producer: &Producer,
) -> Result<PipelineRuntime, SchedulerError> {
    let runtime = PipelineRuntime::new(pipeline_id, structure);
    runtime.set_pipeline_inputs(pipeline_inputs, producer);

    loop {
        let ready = runtime.ready_steps();
        if ready.is_empty() {
            break;
        }

        for step_id in ready {
            runtime.mark_running(&step_id);

            let step = runtime
                .structure()
                .steps()
                .iter()
                .find(|s| s.step_id == step_id)
                .cloned();
            let Some(step) = step else {
                runtime.mark_failed(&step_id);
                continue;
            };

            let manifest = Manifest::new(step.module_type.clone()).with_config(step.module_config.clone());
            let inputs: BTreeMap<String, ValueId> = runtime
                .get_step_inputs(&step_id)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|(field, value_id)| value_id.map(|v| (field, v)))
                .collect();

            let job_id = scheduler.execute(manifest, inputs, true, None)?;
            match scheduler.status(&job_id)? {
                JobStatus::Succeeded => {
                    let outputs: HashMap<String, ValueId> = scheduler
                        .results(&job_id)?
                        .into_iter()
                        .map(|(field, value)| (field, value.value_id))
                        .collect();
                    runtime.notify_step_outputs(&step_id, outputs, producer);
                }
                _ => runtime.mark_failed(&step_id),
            }
        }
    }

    Ok(runtime)
}

#[cfg(test)]
#[path = "pipeline_executor_tests.rs"]
mod tests;
