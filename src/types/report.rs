// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-object outcomes and the end-of-run report.

use crate::error::Result;
use crate::types::ResourceKind;
use serde::Serialize;
use std::fmt;

/// How the report is written to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Whether a namespace was found when queried at the start of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum NamespaceState {
    Absent,
    Present,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutcomeStatus {
    Created,
    Skipped { reason: String },
    Failed { reason: String },
}

/// The recorded result of replicating one object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReplicationOutcome {
    pub kind: ResourceKind,
    pub name: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl ReplicationOutcome {
    pub fn created(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            status: OutcomeStatus::Created,
        }
    }

    pub fn skipped(kind: ResourceKind, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            status: OutcomeStatus::Skipped {
                reason: reason.into(),
            },
        }
    }

    pub fn failed(kind: ResourceKind, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            status: OutcomeStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self.status, OutcomeStatus::Created)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, OutcomeStatus::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }
}

impl fmt::Display for ReplicationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            OutcomeStatus::Created => write!(f, "created  {}/{}", self.kind, self.name),
            OutcomeStatus::Skipped { reason } => {
                write!(f, "skipped  {}/{} ({})", self.kind, self.name, reason)
            }
            OutcomeStatus::Failed { reason } => {
                write!(f, "failed   {}/{}: {}", self.kind, self.name, reason)
            }
        }
    }
}

/// Everything a completed run has to say: outcomes in creation order and any
/// warnings raised on the way.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReplicationReport {
    pub namespace: String,
    pub dry_run: bool,
    pub outcomes: Vec<ReplicationOutcome>,
    pub warnings: Vec<String>,
    /// Shutdown was requested while objects were still being created.
    pub cancelled: bool,
    /// The run-level condition that stopped the run, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReplicationReport {
    pub fn new(namespace: impl Into<String>, dry_run: bool) -> Self {
        Self {
            namespace: namespace.into(),
            dry_run,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: ReplicationOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    /// Record the condition that stopped the run.
    pub fn abort(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    /// A run succeeded when it ran to completion and nothing failed,
    /// regardless of how many objects were skipped.
    pub fn is_success(&self) -> bool {
        !self.cancelled
            && self.error.is_none()
            && !self.outcomes.iter().any(ReplicationOutcome::is_failed)
    }

    pub fn created_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_created()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReplicationOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        Ok(match format {
            OutputFormat::Text => self.to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(self)?,
            OutputFormat::Yaml => serde_yaml::to_string(self)?,
        })
    }
}

impl fmt::Display for ReplicationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for warning in &self.warnings {
            writeln!(f, "warning: {}", warning)?;
        }
        for outcome in &self.outcomes {
            writeln!(f, "{}", outcome)?;
        }
        if let Some(error) = &self.error {
            writeln!(f, "error: {}", error)?;
        }
        write!(
            f,
            "namespace {}{}{}: {} created, {} skipped, {} failed",
            self.namespace,
            if self.dry_run { " (dry run)" } else { "" },
            if self.cancelled { " (cancelled)" } else { "" },
            self.created_count(),
            self.skipped_count(),
            self.failed_count()
        )
    }
}
