use std::sync::Arc;

use async_trait::async_trait;
use ldp_graph::Graph;
use ldp_types::media::INTERNAL_QUADS;
use ldp_types::{
    AsyncHandler, LdpError, LdpResult, Patch, Representation, RepresentationMetadata,
    RepresentationPreferences, ResourceIdentifier,
};

use crate::locker::ResourceLocker;
use crate::traits::ResourceStore;

/// Input of a patch handler.
#[derive(Debug)]
pub struct PatchArgs {
    pub identifier: ResourceIdentifier,
    pub patch: Patch,
}

/// Anything that applies patches to stored resources.
pub type PatchHandler = dyn AsyncHandler<PatchArgs, ()>;

/// Applies SPARQL updates as an atomic read-modify-write.
///
/// The resource is locked for the whole cycle, read as quads, updated in
/// memory, and written back only once the new graph is complete.
pub struct SparqlUpdatePatcher {
    store: Arc<dyn ResourceStore>,
    locker: Arc<dyn ResourceLocker>,
}

impl SparqlUpdatePatcher {
    /// `store` must be able to produce and accept `internal/quads`, which a
    /// converting store does.
    pub fn new(store: Arc<dyn ResourceStore>, locker: Arc<dyn ResourceLocker>) -> Self {
        Self { store, locker }
    }
}

#[async_trait]
impl AsyncHandler<PatchArgs, ()> for SparqlUpdatePatcher {
    fn can_handle(&self, args: &PatchArgs) -> LdpResult<()> {
        match &args.patch {
            Patch::SparqlUpdate { .. } => Ok(()),
            other => Err(LdpError::UnsupportedOperation(format!(
                "only SPARQL Update patches are supported, got {}",
                other.grammar()
            ))),
        }
    }

    async fn handle(&self, args: PatchArgs) -> LdpResult<()> {
        let PatchArgs { identifier, patch } = args;
        let update = match patch {
            Patch::SparqlUpdate { update, .. } => update,
            other => {
                return Err(LdpError::UnsupportedOperation(format!(
                    "only SPARQL Update patches are supported, got {}",
                    other.grammar()
                )))
            }
        };

        let _lock = self.locker.acquire(&identifier).await?;

        let preferences = RepresentationPreferences::media_type(INTERNAL_QUADS);
        let mut graph: Graph = match self.store.get_representation(&identifier, &preferences).await {
            Ok(current) => current.into_quads().await?.into_iter().collect(),
            Err(LdpError::NotFound(_)) if !update.has_inserts() => {
                return Err(LdpError::NotFound(identifier.to_string()));
            }
            Err(LdpError::NotFound(_)) => Graph::new(),
            Err(e) => return Err(e),
        };

        let before = graph.len();
        update.apply(&mut graph);
        tracing::debug!(%identifier, before, after = graph.len(), "applied update");

        let metadata = RepresentationMetadata::new(INTERNAL_QUADS).with_identifier(identifier.clone());
        let mut representation = Representation::quads(graph.into_quads());
        representation.metadata = metadata;
        self.store.set_representation(&identifier, representation).await
    }
}

/// Store decorator that adds patch support.
///
/// Patches go to the wrapped store first; if it reports them unsupported
/// they are applied by the patch handler instead. Everything else passes
/// through.
pub struct PatchingStore {
    source: Arc<dyn ResourceStore>,
    patcher: Arc<PatchHandler>,
}

impl PatchingStore {
    pub fn new(source: Arc<dyn ResourceStore>, patcher: Arc<PatchHandler>) -> Self {
        Self { source, patcher }
    }
}

#[async_trait]
impl ResourceStore for PatchingStore {
    async fn get_representation(
        &self,
        identifier: &ResourceIdentifier,
        preferences: &RepresentationPreferences,
    ) -> LdpResult<Representation> {
        self.source.get_representation(identifier, preferences).await
    }

    async fn add_resource(
        &self,
        container: &ResourceIdentifier,
        representation: Representation,
    ) -> LdpResult<ResourceIdentifier> {
        self.source.add_resource(container, representation).await
    }

    async fn set_representation(
        &self,
        identifier: &ResourceIdentifier,
        representation: Representation,
    ) -> LdpResult<()> {
        self.source.set_representation(identifier, representation).await
    }

    async fn delete_resource(&self, identifier: &ResourceIdentifier) -> LdpResult<()> {
        self.source.delete_resource(identifier).await
    }

    async fn modify_resource(&self, identifier: &ResourceIdentifier, patch: Patch) -> LdpResult<()> {
        match self.source.modify_resource(identifier, patch.clone()).await {
            Err(e) if e.is_unsupported() => {
                self.patcher
                    .handle_safe(PatchArgs {
                        identifier: identifier.clone(),
                        patch,
                    })
                    .await
            }
            result => result,
        }
    }

    fn canonical_content_type(&self) -> Option<&str> {
        self.source.canonical_content_type()
    }
}
