use std::sync::Arc;

use async_trait::async_trait;
use ldp_auth::AclManager;
use ldp_store::ResourceStore;
use ldp_types::{AsyncHandler, LdpResult, ResourceIdentifier};

use crate::operation::{Operation, ResponseDescription, POST};

/// Creates a new member of the target container.
///
/// Creating a member only needs `Append` and `Write` on the container, so a
/// slug that would name a policy document is dropped and the store picks a
/// fresh name instead.
pub struct PostOperationHandler {
    store: Arc<dyn ResourceStore>,
    acl_manager: Arc<dyn AclManager>,
}

impl PostOperationHandler {
    pub fn new(store: Arc<dyn ResourceStore>, acl_manager: Arc<dyn AclManager>) -> Self {
        Self { store, acl_manager }
    }

    fn names_policy(&self, container: &ResourceIdentifier, slug: &str) -> bool {
        container
            .child(slug, false)
            .map(|candidate| self.acl_manager.is_acl(&candidate))
            .unwrap_or(false)
    }
}

#[async_trait]
impl AsyncHandler<Operation, ResponseDescription> for PostOperationHandler {
    fn can_handle(&self, operation: &Operation) -> LdpResult<()> {
        operation.expect_method(POST)
    }

    async fn handle(&self, operation: Operation) -> LdpResult<ResponseDescription> {
        let (container, mut representation) = operation.into_representation()?;
        if let Some(slug) = representation.metadata.slug.as_deref() {
            if self.names_policy(&container, slug) {
                tracing::debug!(%container, slug, "ignoring slug naming a policy document");
                representation.metadata.slug = None;
            }
        }
        let created = self.store.add_resource(&container, representation).await?;
        tracing::debug!(%container, %created, "created resource");
        Ok(ResponseDescription::created(created))
    }
}
