// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The Operation Registry (spec.md §4.9, C9): indexes modules by operation
//! type (`extract_metadata`, `render_value`, `custom_module`, `pipeline`,
//! …) and serves id- and type-driven lookups.

pub mod error;
pub mod operation;
pub mod operation_type;
pub mod registry;

pub use error::OperationsError;
pub use operation::{Operation, OperationConfig, OperationDetails};
pub use operation_type::{CustomModuleOperationType, OperationType};
pub use registry::OperationRegistry;
