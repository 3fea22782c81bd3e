use std::sync::Arc;

use async_trait::async_trait;
use ldp_graph::{Graph, Term};
use ldp_store::{ContainerManager, ResourceStore};
use ldp_types::media::INTERNAL_QUADS;
use ldp_types::{
    AccessMode, AsyncHandler, Credentials, LdpError, LdpResult, PermissionSet,
    RepresentationPreferences, ResourceIdentifier,
};

use crate::manager::AclManager;
use crate::policy::{
    mode_iri, ACL_ACCESS_TO, ACL_AGENT, ACL_AGENT_CLASS, ACL_DEFAULT, ACL_MODE,
    AUTHENTICATED_AGENTS, PUBLIC_AGENT,
};

/// Input of an authorization check.
#[derive(Clone, Debug)]
pub struct AuthorizerArgs {
    pub identifier: ResourceIdentifier,
    pub credentials: Credentials,
    pub permissions: PermissionSet,
}

/// Anything that decides whether a request may proceed.
pub type Authorizer = dyn AsyncHandler<AuthorizerArgs, ()>;

/// Authorizer configuration.
#[derive(Clone, Debug)]
pub struct AuthorizerConfig {
    /// Most parent-container lookups made while searching for a policy.
    pub max_depth: usize,
}

impl Default for AuthorizerConfig {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

/// Web Access Control authorizer.
///
/// The policy for a resource is its own policy document, filtered to the
/// authorizations whose `acl:accessTo` names it. When that document does not
/// exist, the search moves up one container at a time, filtering on
/// `acl:default` for the container the document was found for. Only a
/// missing document moves the search up; any other failure ends it.
///
/// Group agents, origins and trusted apps are not evaluated.
pub struct AclAuthorizer {
    acl_manager: Arc<dyn AclManager>,
    container_manager: Arc<dyn ContainerManager>,
    store: Arc<dyn ResourceStore>,
    config: AuthorizerConfig,
}

impl AclAuthorizer {
    pub fn new(
        acl_manager: Arc<dyn AclManager>,
        container_manager: Arc<dyn ContainerManager>,
        store: Arc<dyn ResourceStore>,
        config: AuthorizerConfig,
    ) -> Self {
        Self {
            acl_manager,
            container_manager,
            store,
            config,
        }
    }

    /// Succeed if `credentials` hold every mode in `permissions` on
    /// `identifier`.
    ///
    /// Policy documents only ever require `Control`. Their policy is resolved
    /// like any other resource's: a document governs itself through
    /// authorizations whose `acl:accessTo` names it, and a missing one
    /// inherits the defaults of its container.
    pub async fn check(
        &self,
        identifier: &ResourceIdentifier,
        credentials: &Credentials,
        permissions: PermissionSet,
    ) -> LdpResult<()> {
        let required = if self.acl_manager.is_acl(identifier) {
            PermissionSet::only(AccessMode::Control)
        } else {
            permissions
        };

        let policy = self.resolve_policy(identifier).await?;
        for mode in required.modes() {
            if !Self::grants(&policy, credentials, mode) {
                tracing::debug!(%identifier, %mode, web_id = ?credentials.web_id, "access denied");
                let message = format!("{mode} access to {identifier}");
                return Err(match &credentials.web_id {
                    Some(_) => LdpError::Forbidden(message),
                    None => LdpError::Unauthorized(message),
                });
            }
        }
        Ok(())
    }

    /// Authorizations that apply to `identifier`, directly or inherited.
    async fn resolve_policy(&self, identifier: &ResourceIdentifier) -> LdpResult<Graph> {
        let preferences = RepresentationPreferences::media_type(INTERNAL_QUADS);
        let mut target = identifier.clone();
        let mut predicate = ACL_ACCESS_TO;
        let mut lookups = 0;

        loop {
            let acl = self.acl_manager.get_acl(&target)?;
            match self.store.get_representation(&acl, &preferences).await {
                Ok(representation) => {
                    let document: Graph = representation.into_quads().await?.into_iter().collect();
                    let authorizations = document
                        .subjects_with(&Term::named(predicate), &Term::named(target.as_str()));
                    tracing::debug!(
                        %identifier,
                        %acl,
                        lookups,
                        authorizations = authorizations.len(),
                        "resolved policy document"
                    );
                    return Ok(document.describe(&authorizations));
                }
                Err(LdpError::NotFound(_)) => {
                    if lookups >= self.config.max_depth {
                        return Err(LdpError::Internal(format!(
                            "no policy found for {identifier} within {} containers",
                            self.config.max_depth
                        )));
                    }
                    target = self.container_manager.get_container(&target)?;
                    predicate = ACL_DEFAULT;
                    lookups += 1;
                    tracing::trace!(%acl, parent = %target, "policy document missing, checking parent");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Whether any authorization in `policy` grants `mode` to `credentials`.
    fn grants(policy: &Graph, credentials: &Credentials, mode: AccessMode) -> bool {
        policy
            .subjects_with(&Term::named(ACL_MODE), &Term::named(mode_iri(mode)))
            .iter()
            .any(|authorization| Self::matches_agent(policy, authorization, credentials))
    }

    fn matches_agent(policy: &Graph, authorization: &Term, credentials: &Credentials) -> bool {
        let agent_class = Term::named(ACL_AGENT_CLASS);
        let names_class = |class: &str| {
            policy.has_match(Some(authorization), Some(&agent_class), Some(&Term::named(class)))
        };

        if names_class(PUBLIC_AGENT) {
            return true;
        }
        let Some(web_id) = &credentials.web_id else {
            return false;
        };
        AUTHENTICATED_AGENTS.into_iter().any(names_class)
            || policy.has_match(
                Some(authorization),
                Some(&Term::named(ACL_AGENT)),
                Some(&Term::named(web_id.as_str())),
            )
    }
}

#[async_trait]
impl AsyncHandler<AuthorizerArgs, ()> for AclAuthorizer {
    fn can_handle(&self, _args: &AuthorizerArgs) -> LdpResult<()> {
        Ok(())
    }

    async fn handle(&self, args: AuthorizerArgs) -> LdpResult<()> {
        self.check(&args.identifier, &args.credentials, args.permissions)
            .await
    }
}
