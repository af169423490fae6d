// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline structure resolution and runtime (spec.md §4.5-4.6, C5/C6):
//! compiling a [`PipelineBlueprint`] into an immutable [`PipelineStructure`]
//! and driving a mutable per-instance [`PipelineRuntime`] from it.

pub mod blueprint;
pub mod error;
pub mod runtime;
pub mod structure;

pub use blueprint::{InputLink, PipelineBlueprint, StepSpec};
pub use error::PipelineError;
pub use runtime::{PipelineRuntime, StepStatus};
pub use structure::{build, LinkSource, PipelineStructure, StepInputBinding};
