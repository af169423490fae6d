// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Module registration and execution (spec.md §4.4, C4). Deliberately has
//! no dependency on `kiara-data`: modules exchange raw JSON payloads via
//! [`ModuleInputs`]/[`ModuleOutputs`], and the job scheduler is the one
//! component that sits above both `kiara-modules` and `kiara-data` to
//! coerce payloads through declared output schemas into registered values.

pub mod error;
pub mod io;
pub mod module;
pub mod registry;

pub use error::{ModuleError, ModulesError};
pub use io::{JobLog, ModuleInputs, ModuleOutputs};
pub use module::{Characteristics, Module};
pub use registry::{ModuleClass, ModuleRegistry};
