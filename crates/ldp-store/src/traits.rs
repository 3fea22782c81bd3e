use async_trait::async_trait;
use ldp_types::{
    LdpError, LdpResult, Patch, Representation, RepresentationPreferences, ResourceIdentifier,
};

/// Storage of resources keyed by identifier.
///
/// All implementations must satisfy these invariants:
/// - Unknown identifiers fail with [`LdpError::NotFound`].
/// - Failures of underlying collaborators are propagated, never swallowed.
/// - A write either fully succeeds or leaves the previous state in place.
///
/// Decorators implement this same trait, so callers cannot tell a wrapped
/// store from a base one.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Read a resource. `preferences` describe the representation wanted.
    async fn get_representation(
        &self,
        identifier: &ResourceIdentifier,
        preferences: &RepresentationPreferences,
    ) -> LdpResult<Representation>;

    /// Create a new member of `container` and return its identifier.
    async fn add_resource(
        &self,
        container: &ResourceIdentifier,
        representation: Representation,
    ) -> LdpResult<ResourceIdentifier>;

    /// Create or replace a resource.
    async fn set_representation(
        &self,
        identifier: &ResourceIdentifier,
        representation: Representation,
    ) -> LdpResult<()>;

    /// Remove a resource.
    async fn delete_resource(&self, identifier: &ResourceIdentifier) -> LdpResult<()>;

    /// Apply a patch to a resource.
    ///
    /// Default implementation reports the operation as unsupported.
    async fn modify_resource(&self, identifier: &ResourceIdentifier, patch: Patch) -> LdpResult<()> {
        Err(LdpError::UnsupportedOperation(format!(
            "this store cannot apply {} patches to {identifier}",
            patch.grammar()
        )))
    }

    /// Media type every stored representation is kept in, if the store has
    /// one.
    fn canonical_content_type(&self) -> Option<&str> {
        None
    }
}
