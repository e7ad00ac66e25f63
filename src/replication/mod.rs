// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace replication: sanitizing, ordering and creating copied objects.

pub mod orchestrator;
pub mod sanitize;
pub mod shutdown;

pub use orchestrator::{ReplicationOptions, Replicator};
pub use sanitize::sanitize;
pub use shutdown::{shutdown_channel, Shutdown, ShutdownTrigger};
