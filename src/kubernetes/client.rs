// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client creation for a named kubeconfig context

use crate::error::{KopyError, Result};
use crate::kubernetes::KubeAccessor;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config as KConfig};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// An authenticated client for one context.
#[derive(Clone)]
pub struct ClusterHandle {
    client: Client,
    context: String,
}

impl ClusterHandle {
    pub fn new(client: Client, context: impl Into<String>) -> Self {
        Self {
            client,
            context: context.into(),
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// An accessor bound to `namespace` in this context.
    pub fn accessor(&self, namespace: &str) -> KubeAccessor {
        KubeAccessor::new(self.client.clone(), self.context.clone(), namespace)
    }
}

impl std::fmt::Debug for ClusterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterHandle")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Connect to `context`, or to the kubeconfig's current context when `None`.
///
/// Every request made through the returned client is bounded by `timeout`.
#[instrument(skip(timeout))]
pub async fn connect(context: Option<&str>, timeout: Duration) -> Result<ClusterHandle> {
    let kubeconfig = Kubeconfig::read().map_err(|e| KopyError::ConnectionError {
        context: context.unwrap_or("<current>").to_string(),
        reason: format!("Failed to read kubeconfig: {}", e),
    })?;
    connect_with_kubeconfig(kubeconfig, context, timeout).await
}

/// Connect using an already loaded kubeconfig.
pub async fn connect_with_kubeconfig(
    kubeconfig: Kubeconfig,
    context: Option<&str>,
    timeout: Duration,
) -> Result<ClusterHandle> {
    let context_name = resolve_context(&kubeconfig, context)?;
    let connection_error = |reason: String| KopyError::ConnectionError {
        context: context_name.clone(),
        reason,
    };

    let mut config = KConfig::from_custom_kubeconfig(
        kubeconfig,
        &KubeConfigOptions {
            context: Some(context_name.clone()),
            ..Default::default()
        },
    )
    .await
    .map_err(|e| connection_error(format!("Failed to create config: {}", e)))?;

    config.connect_timeout = Some(timeout);
    config.read_timeout = Some(timeout);
    config.write_timeout = Some(timeout);
    debug!("Using cluster {} for context {}", config.cluster_url, context_name);

    let client = Client::try_from(config)
        .map_err(|e| connection_error(format!("Failed to create client: {}", e)))?;

    // Fail here rather than halfway through a run if the context is
    // unreachable or the credentials are rejected.
    let version = client
        .apiserver_version()
        .await
        .map_err(|e| connection_error(format!("API server unreachable: {}", e)))?;

    info!(
        "Connected to context {} (Kubernetes {})",
        context_name, version.git_version
    );
    Ok(ClusterHandle::new(client, context_name))
}

/// Pick the context to use: the requested one, which must exist, or the
/// kubeconfig's current context.
pub fn resolve_context(kubeconfig: &Kubeconfig, requested: Option<&str>) -> Result<String> {
    let name = match requested {
        Some(name) => name.to_string(),
        None => kubeconfig
            .current_context
            .clone()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| KopyError::ConnectionError {
                context: "<current>".to_string(),
                reason: "kubeconfig has no current context".to_string(),
            })?,
    };

    if !kubeconfig.contexts.iter().any(|c| c.name == name) {
        return Err(KopyError::ConnectionError {
            context: name,
            reason: "context not found in kubeconfig".to_string(),
        });
    }

    Ok(name)
}
