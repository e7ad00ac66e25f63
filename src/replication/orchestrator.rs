// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Drives one replication run from the source namespace to the destination.
//!
//! A run validates the source namespace, fetches every catalogued kind,
//! refuses to touch a destination namespace that already exists, and then
//! creates the namespace followed by each kind in dependency-tier order.
//! Phase-level failures abort the run; per-object failures are recorded in
//! the report and the run carries on.

use crate::constants::managed;
use crate::error::{KopyError, Result};
use crate::kubernetes::{NamespaceCheck, NamespaceGuard, ResourceAccessor};
use crate::replication::sanitize::sanitize;
use crate::replication::shutdown::Shutdown;
use crate::types::{
    creation_tiers, ReplicationOutcome, ReplicationReport, ResourceKind, ResourceObject,
    ResourceSet,
};
use futures::future::{join_all, try_join_all};
use tracing::{debug, error, info, instrument, warn};

/// What to copy and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationOptions {
    kinds: Vec<ResourceKind>,
    pub dry_run: bool,
}

impl ReplicationOptions {
    /// Kinds are put in catalogue order. `Namespace` is always handled by the
    /// namespace guard and is dropped from the list.
    pub fn new(kinds: impl IntoIterator<Item = ResourceKind>, dry_run: bool) -> Self {
        let mut kinds: Vec<ResourceKind> = kinds
            .into_iter()
            .filter(|k| *k != ResourceKind::Namespace)
            .collect();
        kinds.sort();
        kinds.dedup();
        Self { kinds, dry_run }
    }

    pub fn kinds(&self) -> &[ResourceKind] {
        &self.kinds
    }
}

impl Default for ReplicationOptions {
    fn default() -> Self {
        Self::new(ResourceKind::catalogue(false), false)
    }
}

/// Copies the namespace bound to `source` into the namespace bound to
/// `destination`.
pub struct Replicator<S: ResourceAccessor, D: ResourceAccessor> {
    source: S,
    destination: D,
    options: ReplicationOptions,
}

impl<S: ResourceAccessor, D: ResourceAccessor> Replicator<S, D> {
    pub fn new(source: S, destination: D, options: ReplicationOptions) -> Self {
        Self {
            source,
            destination,
            options,
        }
    }

    pub async fn run(&self, shutdown: Shutdown) -> Result<ReplicationReport> {
        let mut report = ReplicationReport::new(self.source.namespace(), self.options.dry_run);
        self.execute(&shutdown, &mut report).await?;
        Ok(report)
    }

    /// Like `run`, but a run-level condition (missing source, conflicting
    /// destination, failed fetch, cancellation) ends up in the report's
    /// `error` together with anything recorded before it. Setup failures are
    /// still returned as errors.
    pub async fn run_to_report(&self, shutdown: Shutdown) -> Result<ReplicationReport> {
        let mut report = ReplicationReport::new(self.source.namespace(), self.options.dry_run);
        match self.execute(&shutdown, &mut report).await {
            Ok(()) => Ok(report),
            Err(e) if e.is_reported() => {
                report.abort(e.to_string());
                Ok(report)
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(
        skip(self, shutdown, report),
        fields(
            namespace = %self.source.namespace(),
            source = %self.source.context(),
            destination = %self.destination.context()
        )
    )]
    async fn execute(&self, shutdown: &Shutdown, report: &mut ReplicationReport) -> Result<()> {
        let namespace = self.source.namespace();

        let source_namespace = self.validate_source().await?;

        info!(
            "Fetching {} kinds from context {}",
            self.options.kinds.len(),
            self.source.context()
        );
        let resources = tokio::select! {
            biased;
            _ = shutdown.triggered() => {
                warn!("Replication cancelled while fetching, nothing was written");
                return Err(KopyError::Cancelled);
            }
            fetched = self.fetch() => fetched?,
        };
        info!("Fetched {} objects", resources.len());

        self.validate_destination(report).await?;

        if self.options.dry_run {
            self.plan(resources, report);
        } else {
            if shutdown.is_triggered() {
                warn!("Replication cancelled before creating, nothing was written");
                return Err(KopyError::Cancelled);
            }
            self.create(&source_namespace, resources, shutdown, report)
                .await?;
        }

        info!(
            "Replication of namespace {} finished: {} created, {} skipped, {} failed{}",
            namespace,
            report.created_count(),
            report.skipped_count(),
            report.failed_count(),
            if report.cancelled { " (cancelled)" } else { "" }
        );
        Ok(())
    }

    /// The source namespace must exist; its object is the template for the
    /// destination namespace.
    async fn validate_source(&self) -> Result<ResourceObject> {
        let namespace = self.source.namespace();
        match NamespaceGuard::new(&self.source).check().await {
            NamespaceCheck::Present(ns) => Ok(ns),
            NamespaceCheck::Absent => {
                error!(
                    "No namespace {} found in source context {}",
                    namespace,
                    self.source.context()
                );
                Err(KopyError::NamespaceNotFound(namespace.to_string()))
            }
            NamespaceCheck::Unknown(reason) => {
                warn!(
                    "Could not look up namespace {} in source context {}: {}",
                    namespace,
                    self.source.context(),
                    reason
                );
                Err(KopyError::NamespaceNotFound(namespace.to_string()))
            }
        }
    }

    /// List every kind concurrently. The first failure drops the remaining
    /// in-flight requests and fails the whole fetch.
    async fn fetch(&self) -> Result<ResourceSet> {
        let lists = try_join_all(self.options.kinds.iter().map(|&kind| async move {
            let objects = self.source.list(kind).await.map_err(|e| match e {
                e @ KopyError::FetchError { .. } => e,
                other => KopyError::FetchError {
                    kind,
                    reason: other.to_string(),
                },
            })?;
            debug!("Fetched {} {} objects", objects.len(), kind);
            Ok::<_, KopyError>((kind, objects))
        }))
        .await
        .map_err(|e| {
            error!("Fetch failed, nothing will be copied: {}", e);
            e
        })?;

        let mut resources = ResourceSet::new();
        for (kind, objects) in lists {
            resources.insert(kind, objects)?;
        }
        Ok(resources)
    }

    /// The destination namespace must not exist yet. A failed lookup is
    /// treated as absent and surfaced as a warning.
    async fn validate_destination(&self, report: &mut ReplicationReport) -> Result<()> {
        let namespace = self.destination.namespace();
        match NamespaceGuard::new(&self.destination).check().await {
            NamespaceCheck::Present(_) => {
                warn!(
                    "Namespace {} exists in destination context {}; resources would be overwritten",
                    namespace,
                    self.destination.context()
                );
                Err(KopyError::NamespaceConflict(namespace.to_string()))
            }
            NamespaceCheck::Absent => {
                info!(
                    "No namespace {} found in destination context {}, namespace and resources will be created",
                    namespace,
                    self.destination.context()
                );
                Ok(())
            }
            NamespaceCheck::Unknown(reason) => {
                let warning = format!(
                    "Could not determine whether namespace {} exists in destination context {} ({}); assuming it does not",
                    namespace,
                    self.destination.context(),
                    reason
                );
                warn!("{}", warning);
                report.warn(warning);
                Ok(())
            }
        }
    }

    /// Dry run: record what would happen without writing anything.
    fn plan(&self, mut resources: ResourceSet, report: &mut ReplicationReport) {
        for tier in creation_tiers(&self.options.kinds) {
            for kind in tier {
                for object in resources.take(kind) {
                    let reason = skip_reason(&object).unwrap_or("dry run");
                    report.record(ReplicationOutcome::skipped(kind, object.name(), reason));
                }
            }
        }
    }

    async fn create(
        &self,
        source_namespace: &ResourceObject,
        mut resources: ResourceSet,
        shutdown: &Shutdown,
        report: &mut ReplicationReport,
    ) -> Result<()> {
        NamespaceGuard::new(&self.destination)
            .ensure(source_namespace)
            .await
            .map_err(|e| match e {
                KopyError::Conflict { .. } => {
                    KopyError::NamespaceConflict(self.destination.namespace().to_string())
                }
                other => KopyError::CreateError {
                    kind: ResourceKind::Namespace,
                    name: self.destination.namespace().to_string(),
                    reason: other.to_string(),
                },
            })?;

        for tier in creation_tiers(&self.options.kinds) {
            let batches: Vec<(ResourceKind, Vec<ResourceObject>)> = tier
                .into_iter()
                .map(|kind| (kind, resources.take(kind)))
                .collect();

            let results = join_all(
                batches
                    .into_iter()
                    .map(|(kind, objects)| self.create_kind(kind, objects, shutdown)),
            )
            .await;

            for outcome in results.into_iter().flatten() {
                report.record(outcome);
            }
        }

        if shutdown.is_triggered() {
            warn!("Replication cancelled, the destination namespace is incomplete");
            report.mark_cancelled();
        }

        Ok(())
    }

    /// Create the objects of one kind in order. Failures are recorded and do
    /// not stop the remaining objects.
    async fn create_kind(
        &self,
        kind: ResourceKind,
        objects: Vec<ResourceObject>,
        shutdown: &Shutdown,
    ) -> Vec<ReplicationOutcome> {
        let mut outcomes = Vec::with_capacity(objects.len());

        for object in objects {
            let name = object.name();

            if let Some(reason) = skip_reason(&object) {
                debug!("Skipping {} {}: {}", kind, name, reason);
                outcomes.push(ReplicationOutcome::skipped(kind, name, reason));
                continue;
            }

            if shutdown.is_triggered() {
                outcomes.push(ReplicationOutcome::skipped(kind, name, "cancelled"));
                continue;
            }

            match self.destination.create(&sanitize(object)).await {
                Ok(_) => {
                    info!("Created {} {}", kind, name);
                    outcomes.push(ReplicationOutcome::created(kind, name));
                }
                Err(e) => {
                    error!("Failed to create {} {}: {}", kind, name, e);
                    outcomes.push(ReplicationOutcome::failed(kind, name, e.to_string()));
                }
            }
        }

        outcomes
    }
}

/// Objects the destination control plane publishes into every new namespace.
/// Copying them would always conflict.
fn skip_reason(object: &ResourceObject) -> Option<&'static str> {
    match object.kind() {
        ResourceKind::ConfigMap if object.name() == managed::ROOT_CA_CONFIG_MAP => {
            Some("published by the destination control plane")
        }
        ResourceKind::Secret
            if object.payload().get("type").and_then(|t| t.as_str())
                == Some(managed::SERVICE_ACCOUNT_TOKEN_TYPE) =>
        {
            Some("service account token issued by the destination control plane")
        }
        ResourceKind::ClusterRole | ResourceKind::ClusterRoleBinding
            if is_bootstrap_rbac(&object.name()) =>
        {
            Some("default RBAC object of the destination control plane")
        }
        _ => None,
    }
}

fn is_bootstrap_rbac(name: &str) -> bool {
    name.starts_with(managed::SYSTEM_RBAC_PREFIX) || managed::DEFAULT_CLUSTER_ROLES.contains(&name)
}
