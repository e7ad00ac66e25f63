// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Resource kinds, fetched objects and run reports.

pub mod kind;
pub mod report;
pub mod resource;

pub use kind::{creation_tiers, ResourceKind};
pub use report::{
    NamespaceState, OutputFormat, OutcomeStatus, ReplicationOutcome, ReplicationReport,
};
pub use resource::{ResourceObject, ResourceSet};
