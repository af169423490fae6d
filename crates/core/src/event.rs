// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event catalogue published on the orchestration core's event bus.

use crate::id::ShortId;
use crate::{JobId, PipelineInstanceId, ValueId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Why a job stopped without succeeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum JobFailReason {
    /// Cancelled cooperatively before it produced a result.
    Cancelled,
    /// Exceeded its configured timeout.
    Timeout,
    /// The module's `process` returned an error.
    Error { message: String },
}

/// Events published by the orchestration core.
///
/// Serializes as `{"type": "value:created", ...fields}`; unknown type tags
/// deserialize to [`Event::Custom`] so older consumers don't choke on an
/// event catalogue that has grown since they were built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // -- value registry --
    #[serde(rename = "value:created")]
    ValueCreated {
        value_id: ValueId,
        data_type: String,
        data_hash: String,
    },

    #[serde(rename = "value:pre_store")]
    ValuePreStore { value_id: ValueId },

    #[serde(rename = "value:stored")]
    ValueStored {
        value_id: ValueId,
        archive_id: String,
    },

    #[serde(rename = "alias:pre_store")]
    AliasPreStore { alias: String, value_id: ValueId },

    #[serde(rename = "alias:stored")]
    AliasStored {
        alias: String,
        value_id: ValueId,
        version: u64,
    },

    // -- job scheduler --
    #[serde(rename = "job:created")]
    JobCreated {
        job_id: JobId,
        module_type: String,
        job_hash: String,
    },

    #[serde(rename = "job:started")]
    JobStarted { job_id: JobId },

    #[serde(rename = "job:succeeded")]
    JobSucceeded {
        job_id: JobId,
        output_value_ids: HashMap<String, ValueId>,
    },

    #[serde(rename = "job:failed")]
    JobFailed {
        job_id: JobId,
        #[serde(flatten)]
        reason: JobFailReason,
    },

    #[serde(rename = "job_record:pre_store")]
    JobRecordPreStore { job_id: JobId },

    #[serde(rename = "job_record:stored")]
    JobRecordStored { job_id: JobId },

    // -- pipeline runtime --
    #[serde(rename = "pipeline:input_changed")]
    PipelineInputChanged {
        pipeline_id: PipelineInstanceId,
        changed_fields: BTreeSet<String>,
    },

    #[serde(rename = "step:input_changed")]
    StepInputChanged {
        pipeline_id: PipelineInstanceId,
        step_id: String,
        changed_fields: BTreeSet<String>,
    },

    #[serde(rename = "step:output_changed")]
    StepOutputChanged {
        pipeline_id: PipelineInstanceId,
        step_id: String,
        changed_fields: BTreeSet<String>,
    },

    #[serde(rename = "pipeline:output_changed")]
    PipelineOutputChanged {
        pipeline_id: PipelineInstanceId,
        changed_fields: BTreeSet<String>,
    },

    /// Catch-all for forward-compatible event tags this build doesn't know
    /// about yet.
    #[serde(other, skip_serializing)]
    Custom,
}

impl Event {
    pub fn name(&self) -> &str {
        match self {
            Event::ValueCreated { .. } => "value:created",
            Event::ValuePreStore { .. } => "value:pre_store",
            Event::ValueStored { .. } => "value:stored",
            Event::AliasPreStore { .. } => "alias:pre_store",
            Event::AliasStored { .. } => "alias:stored",
            Event::JobCreated { .. } => "job:created",
            Event::JobStarted { .. } => "job:started",
            Event::JobSucceeded { .. } => "job:succeeded",
            Event::JobFailed { .. } => "job:failed",
            Event::JobRecordPreStore { .. } => "job_record:pre_store",
            Event::JobRecordStored { .. } => "job_record:stored",
            Event::PipelineInputChanged { .. } => "pipeline:input_changed",
            Event::StepInputChanged { .. } => "step:input_changed",
            Event::StepOutputChanged { .. } => "step:output_changed",
            Event::PipelineOutputChanged { .. } => "pipeline:output_changed",
            Event::Custom => "custom",
        }
    }

    pub fn log_summary(&self) -> String {
        let t = self.name();
        match self {
            Event::ValueCreated {
                value_id,
                data_type,
                data_hash,
            } => format!(
                "{t} value={value_id} type={data_type} hash={}",
                data_hash.short(12)
            ),
            Event::ValuePreStore { value_id } => format!("{t} value={value_id}"),
            Event::ValueStored {
                value_id,
                archive_id,
            } => format!("{t} value={value_id} archive={archive_id}"),
            Event::AliasPreStore { alias, value_id } => {
                format!("{t} alias={alias} value={value_id}")
            }
            Event::AliasStored {
                alias,
                value_id,
                version,
            } => format!("{t} alias={alias} value={value_id} version={version}"),
            Event::JobCreated {
                job_id,
                module_type,
                job_hash,
            } => format!(
                "{t} job={job_id} module={module_type} hash={}",
                job_hash.short(12)
            ),
            Event::JobStarted { job_id } => format!("{t} job={job_id}"),
            Event::JobSucceeded {
                job_id,
                output_value_ids,
            } => format!("{t} job={job_id} outputs={}", output_value_ids.len()),
            Event::JobFailed { job_id, reason } => format!("{t} job={job_id} reason={reason:?}"),
            Event::JobRecordPreStore { job_id } => format!("{t} job={job_id}"),
            Event::JobRecordStored { job_id } => format!("{t} job={job_id}"),
            Event::PipelineInputChanged {
                pipeline_id,
                changed_fields,
            } => format!(
                "{t} pipeline={pipeline_id} fields={}",
                changed_fields.len()
            ),
            Event::StepInputChanged {
                pipeline_id,
                step_id,
                changed_fields,
            } => format!(
                "{t} pipeline={pipeline_id} step={step_id} fields={}",
                changed_fields.len()
            ),
            Event::StepOutputChanged {
                pipeline_id,
                step_id,
                changed_fields,
            } => format!(
                "{t} pipeline={pipeline_id} step={step_id} fields={}",
                changed_fields.len()
            ),
            Event::PipelineOutputChanged {
                pipeline_id,
                changed_fields,
            } => format!(
                "{t} pipeline={pipeline_id} fields={}",
                changed_fields.len()
            ),
            Event::Custom => t.to_string(),
        }
    }

    /// The job this event concerns, if any — used by subscribers that only
    /// care about a single job's lifecycle.
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            Event::JobCreated { job_id, .. }
            | Event::JobStarted { job_id }
            | Event::JobSucceeded { job_id, .. }
            | Event::JobFailed { job_id, .. }
            | Event::JobRecordPreStore { job_id }
            | Event::JobRecordStored { job_id } => Some(job_id),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
