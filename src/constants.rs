// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Default deadline for a single Kubernetes API request, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Objects the control plane publishes into every namespace by itself
pub mod managed {
    /// Cluster CA bundle published by the root CA publisher controller
    pub const ROOT_CA_CONFIG_MAP: &str = "kube-root-ca.crt";
    /// Secret type of legacy service account tokens issued by the token controller
    pub const SERVICE_ACCOUNT_TOKEN_TYPE: &str = "kubernetes.io/service-account-token";
    /// Name prefix of the RBAC objects the API server bootstraps
    pub const SYSTEM_RBAC_PREFIX: &str = "system:";
    /// User-facing cluster roles (and the cluster-admin binding) the API server bootstraps
    pub const DEFAULT_CLUSTER_ROLES: [&str; 4] = ["cluster-admin", "admin", "edit", "view"];
}
