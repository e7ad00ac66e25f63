// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::types::ResourceKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KopyError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Cannot connect to context {context}: {reason}")]
    ConnectionError { context: String, reason: String },

    #[error("Namespace {0} not found in source context")]
    NamespaceNotFound(String),

    #[error("{kind} {name} already exists")]
    Conflict { kind: ResourceKind, name: String },

    #[error("Namespace {0} exists in destination; resources would be overwritten")]
    NamespaceConflict(String),

    #[error("{kind} {name} not found")]
    NotFound { kind: ResourceKind, name: String },

    #[error("Failed to list {kind}: {reason}")]
    FetchError { kind: ResourceKind, reason: String },

    #[error("Failed to create {kind} {name}: {reason}")]
    CreateError {
        kind: ResourceKind,
        name: String,
        reason: String,
    },

    #[error("Failed to delete {kind} {name}: {reason}")]
    DeleteError {
        kind: ResourceKind,
        name: String,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Replication cancelled")]
    Cancelled,
}

impl KopyError {
    /// Run-level conditions that are reported to the operator rather than
    /// treated as setup failures.
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            KopyError::NamespaceNotFound(_)
                | KopyError::NamespaceConflict(_)
                | KopyError::FetchError { .. }
                | KopyError::CreateError { .. }
                | KopyError::Cancelled
        )
    }
}

pub type Result<T> = std::result::Result<T, KopyError>;
