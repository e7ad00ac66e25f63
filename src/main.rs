// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use kopy::cli::Cli;
use kopy::config::Config;
use kopy::kubernetes::connect;
use kopy::replication::{shutdown_channel, Replicator};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout only carries the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_cli(Cli::parse())?;
    info!(
        "Copying namespace {} to context {} ({} kinds{})",
        config.namespace,
        config.destination_context,
        config.kinds.len(),
        if config.dry_run { ", dry run" } else { "" }
    );

    let (source, destination) = tokio::try_join!(
        connect(config.source_context.as_deref(), config.request_timeout),
        connect(Some(config.destination_context.as_str()), config.request_timeout),
    )?;
    if source.context() == destination.context() {
        bail!(
            "source and destination context are both {}; namespace {} would be copied onto itself",
            source.context(),
            config.namespace
        );
    }

    let (trigger, shutdown) = shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing in-flight requests");
            trigger.trigger();
        }
    });

    let replicator = Replicator::new(
        source.accessor(&config.namespace),
        destination.accessor(&config.namespace),
        config.replication_options(),
    );

    let report = replicator.run_to_report(shutdown).await?;
    println!("{}", report.render(config.output)?);

    if let Some(condition) = &report.error {
        error!("{}", condition);
        Ok(ExitCode::FAILURE)
    } else if report.cancelled {
        error!("Replication cancelled, namespace {} is incomplete", config.namespace);
        Ok(ExitCode::FAILURE)
    } else if !report.is_success() {
        error!("{} objects failed to copy", report.failed_count());
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
