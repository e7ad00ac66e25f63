// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::cli::Cli;
use crate::replication::ReplicationOptions;
use crate::types::{OutputFormat, ResourceKind};
use anyhow::{bail, Result};
use std::time::Duration;

/// Run configuration resolved from the command line and environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub namespace: String,
    /// `None` means the kubeconfig's current context
    pub source_context: Option<String>,
    pub destination_context: String,
    /// Kinds to copy, in catalogue order
    pub kinds: Vec<ResourceKind>,
    pub dry_run: bool,
    pub request_timeout: Duration,
    pub output: OutputFormat,
}

impl Config {
    /// Validate the parsed arguments and resolve the kind catalogue
    pub fn from_cli(cli: Cli) -> Result<Self> {
        validate_namespace(&cli.namespace)?;

        if cli.destination_context.is_empty() {
            bail!("destination context must not be empty");
        }
        if cli.source_context.as_deref() == Some(cli.destination_context.as_str()) {
            bail!(
                "source and destination context are both {}; namespace {} would be copied onto itself",
                cli.destination_context,
                cli.namespace
            );
        }
        if cli.kinds.contains(&ResourceKind::Namespace) {
            bail!("the namespace is always copied; --kind namespace is not needed");
        }
        if cli.timeout == 0 {
            bail!("timeout must be at least one second");
        }

        if !cli.all {
            if let Some(kind) = cli.kinds.iter().find(|k| !k.is_namespaced()) {
                bail!("{} is cluster-scoped; pass --all to copy it", kind);
            }
        }

        let catalogue = ResourceKind::catalogue(cli.all);
        let kinds: Vec<ResourceKind> = if cli.kinds.is_empty() {
            catalogue
        } else {
            catalogue
                .into_iter()
                .filter(|k| cli.kinds.contains(k))
                .collect()
        };

        Ok(Config {
            namespace: cli.namespace,
            source_context: cli.source_context,
            destination_context: cli.destination_context,
            kinds,
            dry_run: cli.dry_run,
            request_timeout: Duration::from_secs(cli.timeout),
            output: cli.output,
        })
    }

    pub fn replication_options(&self) -> ReplicationOptions {
        ReplicationOptions::new(self.kinds.iter().copied(), self.dry_run)
    }
}

/// Namespace names are DNS-1123 labels.
fn validate_namespace(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 63 {
        bail!("namespace must be between 1 and 63 characters, got {:?}", name);
    }
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars || name.starts_with('-') || name.ends_with('-') {
        bail!(
            "invalid namespace {:?}: use lowercase letters, digits and '-', starting and ending with an alphanumeric character",
            name
        );
    }
    Ok(())
}
