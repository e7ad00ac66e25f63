// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace existence checks and creation

use crate::error::{KopyError, Result};
use crate::kubernetes::ResourceAccessor;
use crate::replication::sanitize;
use crate::types::{NamespaceState, ResourceKind, ResourceObject};
use tracing::{debug, info, instrument, warn};

/// Result of looking up the bound namespace.
#[derive(Debug, Clone, PartialEq)]
pub enum NamespaceCheck {
    Present(ResourceObject),
    Absent,
    /// The lookup itself failed; whether the namespace exists is unknown.
    Unknown(String),
}

/// Checks for, and creates, the namespace an accessor is bound to.
pub struct NamespaceGuard<'a, A: ResourceAccessor + ?Sized> {
    accessor: &'a A,
}

impl<'a, A: ResourceAccessor + ?Sized> NamespaceGuard<'a, A> {
    pub fn new(accessor: &'a A) -> Self {
        Self { accessor }
    }

    #[instrument(skip(self), fields(context = %self.accessor.context(), namespace = %self.accessor.namespace()))]
    pub async fn check(&self) -> NamespaceCheck {
        let namespace = self.accessor.namespace();
        match self.accessor.get(ResourceKind::Namespace, namespace).await {
            Ok(ns) => {
                debug!("Namespace {} exists", namespace);
                NamespaceCheck::Present(ns)
            }
            Err(KopyError::NotFound { .. }) => {
                debug!("Namespace {} does not exist", namespace);
                NamespaceCheck::Absent
            }
            Err(e) => {
                warn!("Failed to look up namespace {}: {}", namespace, e);
                NamespaceCheck::Unknown(e.to_string())
            }
        }
    }

    /// Whether the namespace exists. A failed lookup counts as absent.
    pub async fn exists(&self) -> bool {
        matches!(self.check().await, NamespaceCheck::Present(_))
    }

    pub async fn state(&self) -> NamespaceState {
        if self.exists().await {
            NamespaceState::Present
        } else {
            NamespaceState::Absent
        }
    }

    /// Return the namespace, creating it from `template` if it does not
    /// exist. The template is sanitized and renamed to the bound namespace.
    #[instrument(skip(self, template), fields(context = %self.accessor.context(), namespace = %self.accessor.namespace()))]
    pub async fn ensure(&self, template: &ResourceObject) -> Result<ResourceObject> {
        let namespace = self.accessor.namespace();

        if let NamespaceCheck::Present(ns) = self.check().await {
            debug!("Namespace {} already exists", namespace);
            return Ok(ns);
        }

        info!("Creating namespace {}", namespace);
        let mut payload = sanitize(template.clone());
        payload.metadata_mut().name = Some(namespace.to_string());

        let created = self.accessor.create(&payload).await?;
        info!("Namespace {} created successfully", namespace);
        Ok(created)
    }
}
