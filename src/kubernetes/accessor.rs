// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Uniform list/get/create/delete over every supported kind, bound to one
//! context and namespace.

use crate::error::{KopyError, Result};
use crate::types::{ResourceKind, ResourceObject};
use async_trait::async_trait;
use kube::{
    api::{DeleteParams, DynamicObject, ListParams, PostParams},
    Api, Client,
};
use tracing::{debug, instrument};

/// Access to the objects of one (context, namespace) pair.
///
/// Implementations hold no per-call state and may be used by concurrent
/// callers. Cluster-scoped kinds ignore the bound namespace.
#[async_trait]
pub trait ResourceAccessor: Send + Sync {
    /// Name of the context this accessor talks to.
    fn context(&self) -> &str;

    /// The bound namespace.
    fn namespace(&self) -> &str;

    /// All objects of `kind`. Fails with `FetchError`.
    async fn list(&self, kind: ResourceKind) -> Result<Vec<ResourceObject>>;

    /// A single object. Fails with `NotFound` if it does not exist.
    async fn get(&self, kind: ResourceKind, name: &str) -> Result<ResourceObject>;

    /// Create `object` under its own kind. Fails with `Conflict` if an object
    /// with the same kind and name exists, `CreateError` otherwise.
    async fn create(&self, object: &ResourceObject) -> Result<ResourceObject>;

    /// Remove an object. Fails with `NotFound` if it does not exist.
    async fn delete(&self, kind: ResourceKind, name: &str) -> Result<()>;
}

/// A `ResourceAccessor` backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeAccessor {
    client: Client,
    context: String,
    namespace: String,
}

impl KubeAccessor {
    pub fn new(client: Client, context: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            client,
            context: context.into(),
            namespace: namespace.into(),
        }
    }

    fn api(&self, kind: ResourceKind) -> Api<DynamicObject> {
        let ar = kind.api_resource();
        if kind.is_namespaced() {
            Api::namespaced_with(self.client.clone(), &self.namespace, &ar)
        } else {
            Api::all_with(self.client.clone(), &ar)
        }
    }
}

#[async_trait]
impl ResourceAccessor for KubeAccessor {
    fn context(&self) -> &str {
        &self.context
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    #[instrument(skip(self), fields(context = %self.context, namespace = %self.namespace))]
    async fn list(&self, kind: ResourceKind) -> Result<Vec<ResourceObject>> {
        let list = self
            .api(kind)
            .list(&ListParams::default())
            .await
            .map_err(|e| KopyError::FetchError {
                kind,
                reason: e.to_string(),
            })?;

        debug!("Listed {} {} objects", list.items.len(), kind);

        Ok(list
            .items
            .into_iter()
            .map(|o| ResourceObject::new(kind, o))
            .collect())
    }

    #[instrument(skip(self), fields(context = %self.context, namespace = %self.namespace))]
    async fn get(&self, kind: ResourceKind, name: &str) -> Result<ResourceObject> {
        match self.api(kind).get(name).await {
            Ok(object) => Ok(ResourceObject::new(kind, object)),
            Err(kube::Error::Api(err)) if err.code == 404 => Err(KopyError::NotFound {
                kind,
                name: name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(
        skip(self, object),
        fields(
            context = %self.context,
            namespace = %self.namespace,
            kind = %object.kind(),
            name = %object.name()
        )
    )]
    async fn create(&self, object: &ResourceObject) -> Result<ResourceObject> {
        let kind = object.kind();
        let name = object.name();

        match self
            .api(kind)
            .create(&PostParams::default(), object.object())
            .await
        {
            Ok(created) => Ok(ResourceObject::new(kind, created)),
            Err(kube::Error::Api(err)) if err.code == 409 => Err(KopyError::Conflict { kind, name }),
            Err(e) => Err(KopyError::CreateError {
                kind,
                name,
                reason: e.to_string(),
            }),
        }
    }

    #[instrument(skip(self), fields(context = %self.context, namespace = %self.namespace))]
    async fn delete(&self, kind: ResourceKind, name: &str) -> Result<()> {
        match self.api(kind).delete(name, &DeleteParams::default()).await {
            Ok(_) => {
                debug!("Deleted {} {}", kind, name);
                Ok(())
            }
            Err(kube::Error::Api(err)) if err.code == 404 => Err(KopyError::NotFound {
                kind,
                name: name.to_string(),
            }),
            Err(e) => Err(KopyError::DeleteError {
                kind,
                name: name.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
