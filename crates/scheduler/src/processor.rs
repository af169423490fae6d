// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The two processor variants (spec.md §4.7): run a job inline on the
//! caller's thread, or hand it to a fixed-size worker pool.

use kiara_core::JobFailReason;
use kiara_modules::{JobLog, Module, ModuleInputs, ModuleOutputs};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// A job ready to run: the constructed module instance, its coerced
/// inputs, and a cooperative cancel flag the scheduler may set from
/// another thread.
pub struct RunnableJob {
    pub module: Arc<dyn Module>,
    pub inputs: ModuleInputs,
    pub cancel: Arc<AtomicBool>,
}

/// What came out of running a [`RunnableJob`] to completion.
pub struct JobOutcome {
    pub outputs: Option<HashMap<String, serde_json::Value>>,
    pub job_log: JobLog,
    pub fail_reason: Option<JobFailReason>,
}

type Completion = Box<dyn FnOnce(JobOutcome) + Send>;

fn run(job: RunnableJob) -> JobOutcome {
    if job.cancel.load(Ordering::SeqCst) {
        return JobOutcome {
            outputs: None,
            job_log: JobLog::new(),
            fail_reason: Some(JobFailReason::Cancelled),
        };
    }

    let mut outputs = ModuleOutputs::new();
    let mut job_log = JobLog::new();
    match job.module.process(&job.inputs, &mut outputs, &mut job_log) {
        Ok(()) => JobOutcome {
            outputs: Some(outputs.into_map()),
            job_log,
            fail_reason: None,
        },
        Err(err) => JobOutcome {
            outputs: None,
            job_log,
            fail_reason: Some(JobFailReason::Error { message: err.to_string() }),
        },
    }
}

/// Runs jobs to completion and reports the outcome exactly once.
pub trait Processor: Send + Sync {
    fn submit(&self, job: RunnableJob, on_complete: Completion);
}

/// Runs every job inline, on the calling thread. Ordering is strictly
/// FIFO by call order since there are no suspension points.
#[derive(Debug, Default)]
pub struct SequentialProcessor;

impl Processor for SequentialProcessor {
    fn submit(&self, job: RunnableJob, on_complete: Completion) {
        on_complete(run(job));
    }
}

/// A fixed-size worker pool; each worker holds at most one job at a time.
/// Submission order is FIFO across the shared channel, though which
/// specific worker picks up a given job is not guaranteed.
pub struct WorkerPoolProcessor {
    sender: crossbeam_channel::Sender<(RunnableJob, Completion)>,
    _workers: Vec<JoinHandle<()>>,
}

impl WorkerPoolProcessor {
    pub fn new(worker_count: usize) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded::<(RunnableJob, Completion)>();
        let workers = (0..worker_count.max(1))
            .map(|_| {
                let receiver = receiver.clone();
                std::thread::spawn(move || {
                    while let Ok((job, on_complete)) = receiver.recv() {
                        let outcome = run(job);
                        on_complete(outcome);
                    }
                })
            })
            .collect();

        Self {
            sender,
            _workers: workers,
        }
    }
}

impl Processor for WorkerPoolProcessor {
    fn submit(&self, job: RunnableJob, on_complete: Completion) {
        // The channel is unbounded and outlives every sender clone, so the
        // only way `send` fails is if every worker thread has panicked.
        let _ = self.sender.send((job, on_complete));
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
