// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Fetched objects and the per-run set they are collected into.

use crate::error::{KopyError, Result};
use crate::types::ResourceKind;
use kube::api::{DynamicObject, ObjectMeta};
use kube::core::TypeMeta;
use kube::ResourceExt;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single object of a supported kind, carried as the platform's dynamic
/// representation so its payload passes through untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceObject {
    kind: ResourceKind,
    object: DynamicObject,
}

impl ResourceObject {
    /// Wrap a dynamic object, filling in its type meta from `kind` when the
    /// server left it out (list responses omit it on items).
    pub fn new(kind: ResourceKind, mut object: DynamicObject) -> Self {
        if object.types.is_none() {
            let ar = kind.api_resource();
            object.types = Some(TypeMeta {
                api_version: ar.api_version,
                kind: ar.kind,
            });
        }
        Self { kind, object }
    }

    /// Build from a typed k8s-openapi object.
    pub fn from_typed<K: Serialize>(kind: ResourceKind, typed: &K) -> Result<Self> {
        let object: DynamicObject = serde_json::from_value(serde_json::to_value(typed)?)?;
        Ok(Self::new(kind, object))
    }

    /// A bare namespace object, used when no source template is available.
    pub fn namespace(name: &str) -> Self {
        let object = DynamicObject {
            types: None,
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            data: serde_json::Value::Object(Default::default()),
        };
        Self::new(ResourceKind::Namespace, object)
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn name(&self) -> String {
        self.object.name_any()
    }

    pub fn namespace_name(&self) -> Option<String> {
        self.object.namespace()
    }

    /// Server-assigned version token.
    pub fn resource_version(&self) -> Option<String> {
        self.object.resource_version()
    }

    pub fn metadata(&self) -> &ObjectMeta {
        &self.object.metadata
    }

    pub(crate) fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.object.metadata
    }

    /// Kind-specific content (spec, data, rules, ...).
    pub fn payload(&self) -> &serde_json::Value {
        &self.object.data
    }

    pub fn object(&self) -> &DynamicObject {
        &self.object
    }
}

/// Objects fetched from the source, keyed by kind in catalogue order.
///
/// A kind that is absent was not fetched; a kind mapped to an empty sequence
/// was fetched and had no objects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceSet {
    objects: BTreeMap<ResourceKind, Vec<ResourceObject>>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the fetched objects of `kind`. Every object must be of that kind.
    pub fn insert(&mut self, kind: ResourceKind, objects: Vec<ResourceObject>) -> Result<()> {
        if let Some(stray) = objects.iter().find(|o| o.kind() != kind) {
            return Err(KopyError::FetchError {
                kind,
                reason: format!("listing returned {} {}", stray.kind(), stray.name()),
            });
        }
        self.objects.insert(kind, objects);
        Ok(())
    }

    /// Objects of `kind`, or `None` if the kind was not fetched.
    pub fn get(&self, kind: ResourceKind) -> Option<&[ResourceObject]> {
        self.objects.get(&kind).map(Vec::as_slice)
    }

    pub fn contains(&self, kind: ResourceKind) -> bool {
        self.objects.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.objects.keys().copied()
    }

    /// Remove and return the objects of `kind`.
    pub fn take(&mut self, kind: ResourceKind) -> Vec<ResourceObject> {
        self.objects.remove(&kind).unwrap_or_default()
    }

    /// Total number of objects across all kinds.
    pub fn len(&self) -> usize {
        self.objects.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
