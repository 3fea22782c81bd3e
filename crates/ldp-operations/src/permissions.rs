//! Permission extraction: which access modes an operation needs.

use std::sync::Arc;

use async_trait::async_trait;
use ldp_types::{AccessMode, AsyncHandler, Dispatcher, LdpError, LdpResult, Patch, PermissionSet};

use crate::operation::{OperationSummary, DELETE, GET, HEAD, PATCH, POST, PUT};

/// Anything that computes the permissions an operation requires.
pub type PermissionsExtractor = dyn AsyncHandler<OperationSummary, PermissionSet>;

/// Permissions implied by the method alone.
///
/// Reads need `Read`. `POST`, `PUT` and `DELETE` need both `Append` and
/// `Write`.
pub struct MethodPermissionsExtractor;

#[async_trait]
impl AsyncHandler<OperationSummary, PermissionSet> for MethodPermissionsExtractor {
    fn can_handle(&self, operation: &OperationSummary) -> LdpResult<()> {
        match operation.method.as_str() {
            GET | HEAD | POST | PUT | DELETE => Ok(()),
            other => Err(LdpError::UnsupportedOperation(format!(
                "cannot determine permissions of {other}"
            ))),
        }
    }

    async fn handle(&self, operation: OperationSummary) -> LdpResult<PermissionSet> {
        let mut permissions = PermissionSet::default();
        if matches!(operation.method.as_str(), GET | HEAD) {
            permissions.set(AccessMode::Read, true);
        } else {
            permissions.set(AccessMode::Append, true);
            permissions.set(AccessMode::Write, true);
        }
        Ok(permissions)
    }
}

/// Permissions of a SPARQL Update patch: `Append` for any insert clause,
/// `Write` for any delete clause, whether or not the clause names quads.
/// An update without operations is rejected.
pub struct SparqlPatchPermissionsExtractor;

#[async_trait]
impl AsyncHandler<OperationSummary, PermissionSet> for SparqlPatchPermissionsExtractor {
    fn can_handle(&self, operation: &OperationSummary) -> LdpResult<()> {
        if operation.method != PATCH {
            return Err(LdpError::UnsupportedOperation(format!(
                "only PATCH carries a patch, got {}",
                operation.method
            )));
        }
        match &operation.patch {
            Some(Patch::SparqlUpdate { update, .. }) if update.is_empty() => Err(
                LdpError::UnsupportedOperation("SPARQL update contains no operations".into()),
            ),
            Some(Patch::SparqlUpdate { .. }) => Ok(()),
            Some(other) => Err(LdpError::UnsupportedOperation(format!(
                "cannot determine permissions of a {} patch",
                other.grammar()
            ))),
            None => Err(LdpError::UnsupportedOperation("PATCH without a patch body".into())),
        }
    }

    async fn handle(&self, operation: OperationSummary) -> LdpResult<PermissionSet> {
        let mut permissions = PermissionSet::default();
        if let Some(Patch::SparqlUpdate { update, .. }) = &operation.patch {
            permissions.set(AccessMode::Append, update.has_inserts());
            permissions.set(AccessMode::Write, update.has_deletes());
        }
        Ok(permissions)
    }
}

/// Both built-in extractors behind one dispatcher.
pub fn permissions_dispatcher() -> Dispatcher<OperationSummary, PermissionSet> {
    let extractors: Vec<Arc<PermissionsExtractor>> = vec![
        Arc::new(MethodPermissionsExtractor),
        Arc::new(SparqlPatchPermissionsExtractor),
    ];
    Dispatcher::new("permissions", extractors)
}
