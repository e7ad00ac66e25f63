// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for context connection, resource access, and namespace management.

pub mod accessor;
pub mod client;
pub mod namespaces;

pub use accessor::{KubeAccessor, ResourceAccessor};
pub use client::{connect, ClusterHandle};
pub use namespaces::{NamespaceCheck, NamespaceGuard};
