use std::sync::Arc;

use ldp_auth::{
    public_container_policy, AclAuthorizer, AclManager, AuthorizerConfig, UrlBasedAclManager,
};
use ldp_conversion::{SharedConverter, TurtleQuadConverter};
use ldp_operations::{
    body_parser_dispatcher, operation_dispatcher, permissions_dispatcher, AuthenticatedLdpHandler,
    BodyParser, LdpRequest, ResponseDescription,
};
use ldp_store::{
    ConvertingStore, InMemoryResourceLocker, InMemoryResourceStore, LockerConfig, PatchingStore,
    ResourceStore, SparqlUpdatePatcher, UrlContainerManager,
};
use ldp_types::media::TEXT_TURTLE;
use ldp_types::{
    AsyncHandler, LdpError, LdpResult, Representation, RepresentationPreferences,
    ResourceIdentifier,
};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Everything a request needs, wired from a [`ServerConfig`].
///
/// Stores are layered as patching over converting over the in-memory base,
/// so patches work on any stored format and every write lands in the
/// canonical type.
pub struct LdpApp {
    root: ResourceIdentifier,
    store: Arc<dyn ResourceStore>,
    acl_manager: Arc<dyn AclManager>,
    body_parser: Arc<BodyParser>,
    handler: Arc<dyn AsyncHandler<LdpRequest, ResponseDescription>>,
}

impl LdpApp {
    pub fn from_config(config: &ServerConfig) -> ServerResult<Self> {
        let root = ResourceIdentifier::parse(&config.base_url)?;
        if !root.is_container() {
            return Err(ServerError::Config(format!(
                "base_url must end with '/', got {}",
                config.base_url
            )));
        }

        let mut base = InMemoryResourceStore::new(root.clone())?;
        if let Some(canonical) = config.canonical_type() {
            base = base.with_canonical_content_type(canonical);
        }
        let converter: SharedConverter = Arc::new(TurtleQuadConverter);
        let converting: Arc<dyn ResourceStore> =
            Arc::new(ConvertingStore::new(Arc::new(base), converter));

        let locker = Arc::new(InMemoryResourceLocker::new(LockerConfig {
            timeout: config.lock_timeout(),
        }));
        let patcher = Arc::new(SparqlUpdatePatcher::new(converting.clone(), locker));
        let store: Arc<dyn ResourceStore> = Arc::new(PatchingStore::new(converting, patcher));

        let acl_manager: Arc<dyn AclManager> = Arc::new(UrlBasedAclManager::new());
        let authorizer = AclAuthorizer::new(
            acl_manager.clone(),
            Arc::new(UrlContainerManager::new(root.clone())),
            store.clone(),
            AuthorizerConfig {
                max_depth: config.max_acl_depth,
            },
        );
        let handler = AuthenticatedLdpHandler::new(
            Arc::new(permissions_dispatcher()),
            Arc::new(authorizer),
            Arc::new(operation_dispatcher(store.clone(), acl_manager.clone())),
        );

        tracing::debug!(%root, canonical = ?config.canonical_type(), "wired resource stores");
        Ok(Self {
            root,
            store,
            acl_manager,
            body_parser: Arc::new(body_parser_dispatcher()),
            handler: Arc::new(handler),
        })
    }

    pub fn root(&self) -> &ResourceIdentifier {
        &self.root
    }

    /// The fully decorated store requests run against.
    pub fn store(&self) -> &Arc<dyn ResourceStore> {
        &self.store
    }

    pub fn body_parser(&self) -> &BodyParser {
        self.body_parser.as_ref()
    }

    /// Identifier for a request path.
    pub fn target(&self, path: &str) -> LdpResult<ResourceIdentifier> {
        let base = self.root.as_str().trim_end_matches('/');
        ResourceIdentifier::parse(&format!("{base}{path}"))
    }

    pub async fn handle(&self, request: LdpRequest) -> LdpResult<ResponseDescription> {
        self.handler.handle_safe(request).await
    }

    /// Write a policy granting everyone full access to the root container,
    /// unless one exists. Returns whether it was written.
    pub async fn bootstrap_root_acl(&self) -> LdpResult<bool> {
        let acl = self.acl_manager.get_acl(&self.root)?;
        match self
            .store
            .get_representation(&acl, &RepresentationPreferences::any())
            .await
        {
            Ok(_) => return Ok(false),
            Err(LdpError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let mut policy = Representation::binary(TEXT_TURTLE, public_container_policy(&self.root, &acl));
        policy.metadata.identifier = Some(acl.clone());
        self.store.set_representation(&acl, policy).await?;
        tracing::info!(%acl, "created public root policy");
        Ok(true)
    }
}
