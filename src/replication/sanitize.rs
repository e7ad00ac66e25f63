// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Turn a fetched object into a valid creation payload.

use crate::types::ResourceObject;

/// Clear the server-assigned resource version so the destination accepts the
/// object as new. Everything else is left untouched. The rule is the same for
/// every kind.
pub fn sanitize(mut object: ResourceObject) -> ResourceObject {
    object.metadata_mut().resource_version = None;
    object
}
