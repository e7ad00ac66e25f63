// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: a mock Kubernetes HTTP service and an in-memory accessor.

use crate::error::{KopyError, Result};
use crate::kubernetes::ResourceAccessor;
use crate::replication::ShutdownTrigger;
use crate::types::{ResourceKind, ResourceObject};
use async_trait::async_trait;
use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

/// A mock HTTP service that returns predefined responses for exact
/// (method, path) pairs and records every request it sees.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Requests seen so far, as (method, path).
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let key = (req.method().to_string(), req.uri().path().to_string());
        self.requests.lock().unwrap().push(key.clone());

        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| (404, not_found_json("resource", &key.1)));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock namespace JSON response
pub fn namespace_json(name: &str) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid",
            "resourceVersion": "1"
        }
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Create a 409 already exists response
pub fn already_exists_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" already exists", resource, name),
        "reason": "AlreadyExists",
        "code": 409
    })
    .to_string()
}

/// A call made against an `InMemoryAccessor`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    List(ResourceKind),
    Get(ResourceKind, String),
    Create(ResourceKind, String),
    Delete(ResourceKind, String),
}

impl Call {
    pub fn is_create(&self) -> bool {
        matches!(self, Call::Create(..))
    }
}

#[derive(Default)]
struct State {
    objects: BTreeMap<(ResourceKind, String), ResourceObject>,
    calls: Vec<Call>,
    created: Vec<(ResourceKind, String)>,
    received: Vec<ResourceObject>,
    failing_lists: HashSet<ResourceKind>,
    failing_creates: HashSet<(ResourceKind, String)>,
    list_delays: HashMap<ResourceKind, Duration>,
    unreachable: bool,
    cancel_after: Option<(usize, ShutdownTrigger)>,
    next_version: u64,
}

/// A `ResourceAccessor` over an in-memory store that records every call.
///
/// Like the API server it rejects creation payloads that still carry a
/// resource version.
#[derive(Clone)]
pub struct InMemoryAccessor {
    context: String,
    namespace: String,
    state: Arc<Mutex<State>>,
}

impl InMemoryAccessor {
    pub fn new(context: &str, namespace: &str) -> Self {
        Self {
            context: context.to_string(),
            namespace: namespace.to_string(),
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Seed the bound namespace itself.
    pub fn with_namespace(self) -> Self {
        let ns = self.namespace.clone();
        self.with_object(ResourceObject::namespace(&ns))
    }

    pub fn with_object(self, object: ResourceObject) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_version += 1;
            let mut object = object;
            object.metadata_mut().resource_version = Some(state.next_version.to_string());
            state
                .objects
                .insert((object.kind(), object.name()), object);
        }
        self
    }

    pub fn failing_list(self, kind: ResourceKind) -> Self {
        self.state.lock().unwrap().failing_lists.insert(kind);
        self
    }

    pub fn failing_create(self, kind: ResourceKind, name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_creates
            .insert((kind, name.to_string()));
        self
    }

    pub fn with_list_delay(self, kind: ResourceKind, delay: Duration) -> Self {
        self.state.lock().unwrap().list_delays.insert(kind, delay);
        self
    }

    /// Namespace lookups fail with a transport error instead of answering.
    pub fn unreachable(self) -> Self {
        self.state.lock().unwrap().unreachable = true;
        self
    }

    /// Fire `trigger` once `creates` objects have been created.
    pub fn cancel_after_creates(self, creates: usize, trigger: ShutdownTrigger) -> Self {
        self.state.lock().unwrap().cancel_after = Some((creates, trigger));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Kind and name of every successful create, in order.
    pub fn created(&self) -> Vec<(ResourceKind, String)> {
        self.state.lock().unwrap().created.clone()
    }

    /// Creation payloads exactly as they were handed to `create`.
    pub fn received(&self) -> Vec<ResourceObject> {
        self.state.lock().unwrap().received.clone()
    }

    pub fn contains(&self, kind: ResourceKind, name: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .objects
            .contains_key(&(kind, name.to_string()))
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl ResourceAccessor for InMemoryAccessor {
    fn context(&self) -> &str {
        &self.context
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn list(&self, kind: ResourceKind) -> Result<Vec<ResourceObject>> {
        self.record(Call::List(kind));

        let delay = self.state.lock().unwrap().list_delays.get(&kind).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.lock().unwrap();
        if state.failing_lists.contains(&kind) {
            return Err(KopyError::FetchError {
                kind,
                reason: "connection reset by peer".to_string(),
            });
        }

        Ok(state
            .objects
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, o)| o.clone())
            .collect())
    }

    async fn get(&self, kind: ResourceKind, name: &str) -> Result<ResourceObject> {
        self.record(Call::Get(kind, name.to_string()));

        let state = self.state.lock().unwrap();
        if state.unreachable && kind == ResourceKind::Namespace {
            return Err(KopyError::ConnectionError {
                context: self.context.clone(),
                reason: "connection refused".to_string(),
            });
        }

        state
            .objects
            .get(&(kind, name.to_string()))
            .cloned()
            .ok_or_else(|| KopyError::NotFound {
                kind,
                name: name.to_string(),
            })
    }

    async fn create(&self, object: &ResourceObject) -> Result<ResourceObject> {
        let kind = object.kind();
        let name = object.name();
        self.record(Call::Create(kind, name.clone()));

        let mut state = self.state.lock().unwrap();
        state.received.push(object.clone());

        if state.failing_creates.contains(&(kind, name.clone())) {
            return Err(KopyError::CreateError {
                kind,
                name,
                reason: "admission webhook denied the request".to_string(),
            });
        }
        if object.resource_version().is_some() {
            return Err(KopyError::CreateError {
                kind,
                name,
                reason: "resourceVersion should not be set on objects to be created".to_string(),
            });
        }
        if state.objects.contains_key(&(kind, name.clone())) {
            return Err(KopyError::Conflict { kind, name });
        }

        state.next_version += 1;
        let mut created = object.clone();
        created.metadata_mut().resource_version = Some(state.next_version.to_string());
        state.objects.insert((kind, name.clone()), created.clone());
        state.created.push((kind, name));

        let creates = state.calls.iter().filter(|c| c.is_create()).count();
        if let Some((after, trigger)) = &state.cancel_after {
            if creates >= *after {
                trigger.trigger();
            }
        }

        Ok(created)
    }

    async fn delete(&self, kind: ResourceKind, name: &str) -> Result<()> {
        self.record(Call::Delete(kind, name.to_string()));

        self.state
            .lock()
            .unwrap()
            .objects
            .remove(&(kind, name.to_string()))
            .map(|_| ())
            .ok_or_else(|| KopyError::NotFound {
                kind,
                name: name.to_string(),
            })
    }
}
