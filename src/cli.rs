// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Command line arguments

use crate::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::types::{OutputFormat, ResourceKind};
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "kopy",
    version,
    about = "Copy a namespace and its resources from one Kubernetes context to another"
)]
pub struct Cli {
    /// Namespace to copy; the destination namespace gets the same name
    #[arg(short, long, env = "KOPY_NAMESPACE")]
    pub namespace: String,

    /// Context to copy into
    #[arg(short, long, env = "KOPY_DESTINATION_CONTEXT")]
    pub destination_context: String,

    /// Context to copy from; defaults to the kubeconfig's current context
    #[arg(short, long, env = "KOPY_SOURCE_CONTEXT")]
    pub source_context: Option<String>,

    /// Also copy cluster-scoped resources (ClusterRole, ClusterRoleBinding)
    #[arg(short, long)]
    pub all: bool,

    /// Only copy these kinds (repeatable)
    #[arg(short, long = "kind", value_enum)]
    pub kinds: Vec<ResourceKind>,

    /// Fetch and plan, but write nothing to the destination
    #[arg(long)]
    pub dry_run: bool,

    /// Per-request timeout in seconds
    #[arg(long, env = "KOPY_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Report format written to stdout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}
