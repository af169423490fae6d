// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job scheduler (spec.md §4.7, C7): fingerprints jobs, probes the
//! configured cache strategy, hands misses to a [`Processor`], and
//! persists successful results.

use crate::error::SchedulerError;
use crate::job::{JobCacheStrategy, JobConfig, JobRecord, JobStatus};
use crate::processor::{JobOutcome, Processor, RunnableJob};
use kiara_bus::Producer;
use kiara_core::{Cid, Clock, Event, JobFailReason, JobId, Manifest, ManifestRef, ValueId};
use kiara_data::{DataRegistry, Pedigree, Value};
use kiara_modules::{ModuleInputs, ModuleRegistry};
use kiara_storage::Archive;
use kiara_types::ValueSchema;
use parking_lot::{Condvar, Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct ActiveJob {
    status: Mutex<JobStatus>,
    terminal: Condvar,
    cancel: Arc<AtomicBool>,
    inputs: BTreeMap<String, ValueId>,
    outputs: Mutex<Option<BTreeMap<String, ValueId>>>,
    submitted_at_millis: i64,
    started_at_millis: i64,
}

impl ActiveJob {
    fn is_terminal(status: &JobStatus) -> bool {
        matches!(status, JobStatus::Succeeded | JobStatus::Failed { .. })
    }
}

/// State shared between [`JobScheduler`] and the completion callback handed
/// to a [`Processor`]. Kept separate from `JobScheduler` itself so the
/// callback closure doesn't need an `Arc<JobScheduler>` back-reference
/// through the scheduler's own `processor` field.
struct SchedulerState {
    data: Arc<DataRegistry>,
    archive: Arc<dyn Archive>,
    events: Producer,
    clock: Arc<dyn Clock>,
    active: RwLock<HashMap<JobId, Arc<ActiveJob>>>,
    running_by_hash: Mutex<HashMap<Cid, JobId>>,
    succeeded_by_value_id_hash: RwLock<HashMap<Cid, Vec<JobId>>>,
    succeeded_by_data_hash: RwLock<HashMap<Cid, Vec<JobId>>>,
}

/// Drives job execution: fingerprinting, cache probing, dispatch to a
/// [`Processor`], and persisting [`JobRecord`]s on success.
pub struct JobScheduler {
    modules: Arc<ModuleRegistry>,
    processor: Arc<dyn Processor>,
    cache_strategy: JobCacheStrategy,
    state: Arc<SchedulerState>,
}

impl JobScheduler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        modules: Arc<ModuleRegistry>,
        data: Arc<DataRegistry>,
        archive: Arc<dyn Archive>,
        events: Producer,
        clock: Arc<dyn Clock>,
        processor: Arc<dyn Processor>,
        cache_strategy: JobCacheStrategy,
    ) -> Self {
        Self {
            modules,
            processor,
            cache_strategy,
            state: Arc::new(SchedulerState {
                data,
                archive,
                events,
                clock,
                active: RwLock::new(HashMap::new()),
                running_by_hash: Mutex::new(HashMap::new()),
                succeeded_by_value_id_hash: RwLock::new(HashMap::new()),
                succeeded_by_data_hash: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Coerce `inputs` against `manifest`'s module, probe the cache, and
    /// either return a cached `JobId` or dispatch a fresh job. If `wait` is
    /// true, blocks until the job reaches a terminal status (or `timeout`
    /// elapses, in which case the job is marked `FAILED(TIMEOUT)`).
    pub fn execute(
        &self,
        manifest: Manifest,
        inputs: BTreeMap<String, ValueId>,
        wait: bool,
        timeout: Option<Duration>,
    ) -> Result<JobId, SchedulerError> {
        let module = self.modules.create(&manifest)?;
        let manifest_ref =
            ManifestRef::try_from(&manifest).map_err(|_| SchedulerError::UnhashableManifest)?;

        for (field, schema) in module.inputs_schema() {
            if !schema.optional && schema.default.is_none() && !inputs.contains_key(&field) {
                return Err(SchedulerError::MissingInput {
                    module_type: manifest.module_type.clone(),
                    field,
                });
            }
        }

        let config = JobConfig {
            manifest_ref: manifest_ref.clone(),
            inputs: inputs.clone(),
        };

        let characteristics = module.characteristics();
        if !characteristics.unique_result_values {
            if let Some(job_id) = self.probe_cache(&config)? {
                // Spec §8(c): a cache hit still emits `JobCreated` — there is
                // simply no `JobStarted` to follow it, since no `process`
                // call is made.
                self.state.events.emit(Event::JobCreated {
                    job_id: job_id.clone(),
                    module_type: manifest.module_type.clone(),
                    job_hash: config.value_id_hash().to_string(),
                });
                return Ok(job_id);
            }
        }

        let job_hash = config.value_id_hash();
        let mut running = self.state.running_by_hash.lock();
        if let Some(existing) = running.get(&job_hash).cloned() {
            drop(running);
            // Follower: someone else is already running this job_hash. Wait
            // alongside them if asked, so the caller observes the same
            // terminal state and ValueIds as the leader (spec.md §4.7/§5).
            if wait {
                self.wait_for(&existing, timeout)?;
            }
            return Ok(existing);
        }
        let job_id = JobId::default();
        running.insert(job_hash.clone(), job_id.clone());
        drop(running);

        let submitted_at_millis = self.state.clock.now_millis();
        let cancel = Arc::new(AtomicBool::new(false));
        let active_job = Arc::new(ActiveJob {
            status: Mutex::new(JobStatus::Created),
            terminal: Condvar::new(),
            cancel: Arc::clone(&cancel),
            inputs: inputs.clone(),
            outputs: Mutex::new(None),
            submitted_at_millis,
            started_at_millis: self.state.clock.now_millis(),
        });
        self.state.active.write().insert(job_id.clone(), Arc::clone(&active_job));
        self.state.events.emit(Event::JobCreated {
            job_id: job_id.clone(),
            module_type: manifest.module_type.clone(),
            job_hash: job_hash.to_string(),
        });

        *active_job.status.lock() = JobStatus::Started;
        self.state.events.emit(Event::JobStarted { job_id: job_id.clone() });

        let module_inputs = self.coerce_inputs(&module.inputs_schema(), &inputs)?;
        let runnable = RunnableJob {
            module,
            inputs: module_inputs,
            cancel,
        };

        let state = Arc::clone(&self.state);
        let completion_job_id = job_id.clone();
        self.processor.submit(
            runnable,
            Box::new(move |outcome| {
                complete(&state, completion_job_id, job_hash, manifest_ref, active_job, outcome);
            }),
        );

        if wait {
            self.wait_for(&job_id, timeout)?;
        }

        Ok(job_id)
    }

    fn coerce_inputs(
        &self,
        schema: &HashMap<String, ValueSchema>,
        inputs: &BTreeMap<String, ValueId>,
    ) -> Result<ModuleInputs, SchedulerError> {
        let mut values = HashMap::new();
        for field in schema.keys() {
            if let Some(value_id) = inputs.get(field) {
                let value = self.state.data.get(value_id.as_str())?;
                values.insert(field.clone(), value.data.unwrap_or(serde_json::Value::Null));
            }
        }
        Ok(ModuleInputs::new(values))
    }

    fn probe_cache(&self, config: &JobConfig) -> Result<Option<JobId>, SchedulerError> {
        match self.cache_strategy {
            JobCacheStrategy::NoCache => Ok(None),
            JobCacheStrategy::ValueId => {
                let hash = config.value_id_hash();
                Ok(earliest(&self.state.succeeded_by_value_id_hash, &hash))
            }
            JobCacheStrategy::DataHash => {
                let mut data_hashes = BTreeMap::new();
                for (field, value_id) in &config.inputs {
                    let value = self.state.data.get(value_id.as_str())?;
                    if let Some(data_hash) = value.data_hash {
                        data_hashes.insert(field.clone(), data_hash);
                    }
                }
                let hash = config.data_hash_hash(&data_hashes);
                Ok(earliest(&self.state.succeeded_by_data_hash, &hash))
            }
        }
    }

    pub fn status(&self, job_id: &JobId) -> Result<JobStatus, SchedulerError> {
        let active = self.state.active.read();
        let job = active
            .get(job_id)
            .ok_or_else(|| SchedulerError::NoSuchJob(job_id.to_string()))?;
        Ok(job.status.lock().clone())
    }

    pub fn cancel(&self, job_id: &JobId) -> Result<(), SchedulerError> {
        let active = self.state.active.read();
        let job = active
            .get(job_id)
            .ok_or_else(|| SchedulerError::NoSuchJob(job_id.to_string()))?;
        job.cancel.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub fn results(&self, job_id: &JobId) -> Result<HashMap<String, Value>, SchedulerError> {
        let active = self.state.active.read();
        let job = active
            .get(job_id)
            .ok_or_else(|| SchedulerError::NoSuchJob(job_id.to_string()))?;
        let outputs = job
            .outputs
            .lock()
            .clone()
            .ok_or_else(|| SchedulerError::JobNotSucceeded(job_id.to_string()))?;
        let mut results = HashMap::new();
        for (field, value_id) in outputs {
            results.insert(field, self.state.data.get(value_id.as_str())?);
        }
        Ok(results)
    }

    fn wait_for(&self, job_id: &JobId, timeout: Option<Duration>) -> Result<(), SchedulerError> {
        let active = self.state.active.read();
        let job = Arc::clone(
            active
                .get(job_id)
                .ok_or_else(|| SchedulerError::NoSuchJob(job_id.to_string()))?,
        );
        drop(active);

        let mut status = job.status.lock();
        match timeout {
            Some(timeout) => {
                let result = job
                    .terminal
                    .wait_while_for(&mut status, |s| !ActiveJob::is_terminal(s), timeout);
                if result.timed_out() {
                    job.cancel.store(true, Ordering::SeqCst);
                    *status = JobStatus::Failed { reason: JobFailReason::Timeout };
                    self.state.events.emit(Event::JobFailed {
                        job_id: job_id.clone(),
                        reason: JobFailReason::Timeout,
                    });
                }
            }
            None => {
                job.terminal.wait_while(&mut status, |s| !ActiveJob::is_terminal(s));
            }
        }
        Ok(())
    }
}

fn earliest(index: &RwLock<HashMap<Cid, Vec<JobId>>>, hash: &Cid) -> Option<JobId> {
    // Candidates are appended in SUCCESS order, so the first entry is also
    // the earliest by timestamp.
    index.read().get(hash).and_then(|candidates| candidates.first()).cloned()
}

fn complete(
    state: &SchedulerState,
    job_id: JobId,
    job_hash: Cid,
    manifest_ref: ManifestRef,
    active_job: Arc<ActiveJob>,
    outcome: JobOutcome,
) {
    state.running_by_hash.lock().remove(&job_hash);

    match outcome.fail_reason {
        None => {
            let outputs = outcome.outputs.unwrap_or_default();
            let mut output_value_ids = BTreeMap::new();
            for (field, payload) in outputs {
                let pedigree = Pedigree::Job {
                    manifest: manifest_ref.clone(),
                    inputs: active_job.inputs.clone(),
                    output_field: field.clone(),
                };
                match state.data.register_data(payload, ValueSchema::new("any"), pedigree) {
                    Ok(value) => {
                        output_value_ids.insert(field, value.value_id);
                    }
                    Err(err) => {
                        tracing::error!(job = %job_id, error = %err, "failed to register job output");
                    }
                }
            }

            *active_job.outputs.lock() = Some(output_value_ids.clone());
            *active_job.status.lock() = JobStatus::Succeeded;
            active_job.terminal.notify_all();

            state.events.emit(Event::JobSucceeded {
                job_id: job_id.clone(),
                output_value_ids: output_value_ids.clone().into_iter().collect(),
            });

            state
                .succeeded_by_value_id_hash
                .write()
                .entry(job_hash.clone())
                .or_default()
                .push(job_id.clone());

            let mut data_hashes = BTreeMap::new();
            for (field, value_id) in &active_job.inputs {
                if let Ok(value) = state.data.get(value_id.as_str()) {
                    if let Some(data_hash) = value.data_hash {
                        data_hashes.insert(field.clone(), data_hash);
                    }
                }
            }
            let config = JobConfig {
                manifest_ref: manifest_ref.clone(),
                inputs: active_job.inputs.clone(),
            };
            let data_hash_key = config.data_hash_hash(&data_hashes);
            state
                .succeeded_by_data_hash
                .write()
                .entry(data_hash_key)
                .or_default()
                .push(job_id.clone());

            let record = JobRecord {
                job_id: job_id.clone(),
                manifest: manifest_ref,
                inputs: active_job.inputs.clone(),
                outputs: output_value_ids,
                status: JobStatus::Succeeded,
                submitted_at_millis: active_job.submitted_at_millis,
                started_at_millis: active_job.started_at_millis,
                finished_at_millis: state.clock.now_millis(),
            };
            state.events.emit(Event::JobRecordPreStore { job_id: job_id.clone() });
            match serde_json::to_value(&record) {
                Ok(payload) => match state.archive.put(job_id.as_str(), payload) {
                    Ok(()) => state.events.emit(Event::JobRecordStored { job_id }),
                    Err(err) => tracing::error!(job = %job_id, error = %err, "failed to persist job record"),
                },
                Err(err) => tracing::error!(job = %job_id, error = %err, "failed to serialize job record"),
            }
        }
        Some(reason) => {
            *active_job.status.lock() = JobStatus::Failed { reason: reason.clone() };
            active_job.terminal.notify_all();
            state.events.emit(Event::JobFailed { job_id, reason });
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
