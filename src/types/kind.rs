// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The fixed catalogue of resource kinds kopy knows how to copy.

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Secret, Service};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::api::rbac::v1::{ClusterRole, ClusterRoleBinding, Role, RoleBinding};
use kube::discovery::ApiResource;
use serde::Serialize;
use std::fmt;

/// A supported object type.
///
/// Variants are declared in fetch order: the namespace itself, cluster-scoped
/// kinds, then namespaced kinds. The derived `Ord` follows that order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, clap::ValueEnum)]
pub enum ResourceKind {
    #[value(name = "namespace")]
    Namespace,
    #[value(name = "clusterrole")]
    ClusterRole,
    #[value(name = "clusterrolebinding")]
    ClusterRoleBinding,
    #[value(name = "role")]
    Role,
    #[value(name = "rolebinding")]
    RoleBinding,
    #[value(name = "configmap")]
    ConfigMap,
    #[value(name = "secret")]
    Secret,
    #[value(name = "service")]
    Service,
    #[value(name = "deployment")]
    Deployment,
    #[value(name = "ingress")]
    Ingress,
}

impl ResourceKind {
    /// Kinds fetched from the source namespace, in fetch order.
    pub const CATALOGUE: [ResourceKind; 9] = [
        ResourceKind::ClusterRole,
        ResourceKind::ClusterRoleBinding,
        ResourceKind::Role,
        ResourceKind::RoleBinding,
        ResourceKind::ConfigMap,
        ResourceKind::Secret,
        ResourceKind::Service,
        ResourceKind::Deployment,
        ResourceKind::Ingress,
    ];

    /// The default catalogue. Cluster-scoped kinds are only copied when asked for.
    pub fn catalogue(include_cluster_scoped: bool) -> Vec<ResourceKind> {
        Self::CATALOGUE
            .into_iter()
            .filter(|k| include_cluster_scoped || k.is_namespaced())
            .collect()
    }

    pub fn is_namespaced(self) -> bool {
        match self {
            ResourceKind::Namespace | ResourceKind::ClusterRole | ResourceKind::ClusterRoleBinding => {
                false
            }
            ResourceKind::Role
            | ResourceKind::RoleBinding
            | ResourceKind::ConfigMap
            | ResourceKind::Secret
            | ResourceKind::Service
            | ResourceKind::Deployment
            | ResourceKind::Ingress => true,
        }
    }

    /// Dependency tier. A kind is only created once every kind of a lower
    /// tier has been created.
    pub fn tier(self) -> u8 {
        match self {
            ResourceKind::Namespace => 0,
            ResourceKind::ClusterRole
            | ResourceKind::Role
            | ResourceKind::ConfigMap
            | ResourceKind::Secret => 1,
            ResourceKind::ClusterRoleBinding
            | ResourceKind::RoleBinding
            | ResourceKind::Service
            | ResourceKind::Deployment => 2,
            ResourceKind::Ingress => 3,
        }
    }

    /// API coordinates used to build a dynamic `Api` for this kind.
    pub fn api_resource(self) -> ApiResource {
        match self {
            ResourceKind::Namespace => ApiResource::erase::<Namespace>(&()),
            ResourceKind::ClusterRole => ApiResource::erase::<ClusterRole>(&()),
            ResourceKind::ClusterRoleBinding => ApiResource::erase::<ClusterRoleBinding>(&()),
            ResourceKind::Role => ApiResource::erase::<Role>(&()),
            ResourceKind::RoleBinding => ApiResource::erase::<RoleBinding>(&()),
            ResourceKind::ConfigMap => ApiResource::erase::<ConfigMap>(&()),
            ResourceKind::Secret => ApiResource::erase::<Secret>(&()),
            ResourceKind::Service => ApiResource::erase::<Service>(&()),
            ResourceKind::Deployment => ApiResource::erase::<Deployment>(&()),
            ResourceKind::Ingress => ApiResource::erase::<Ingress>(&()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Namespace => "Namespace",
            ResourceKind::ClusterRole => "ClusterRole",
            ResourceKind::ClusterRoleBinding => "ClusterRoleBinding",
            ResourceKind::Role => "Role",
            ResourceKind::RoleBinding => "RoleBinding",
            ResourceKind::ConfigMap => "ConfigMap",
            ResourceKind::Secret => "Secret",
            ResourceKind::Service => "Service",
            ResourceKind::Deployment => "Deployment",
            ResourceKind::Ingress => "Ingress",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group `kinds` by dependency tier, lowest tier first. Within a tier kinds
/// keep catalogue order.
pub fn creation_tiers(kinds: &[ResourceKind]) -> Vec<Vec<ResourceKind>> {
    let mut sorted: Vec<ResourceKind> = kinds.to_vec();
    sorted.sort_by_key(|k| (k.tier(), *k));
    sorted.dedup();

    let mut tiers: Vec<Vec<ResourceKind>> = Vec::new();
    for kind in sorted {
        match tiers.last_mut() {
            Some(tier) if tier[0].tier() == kind.tier() => tier.push(kind),
            _ => tiers.push(vec![kind]),
        }
    }
    tiers
}
