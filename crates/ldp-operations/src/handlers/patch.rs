use std::sync::Arc;

use async_trait::async_trait;
use ldp_store::ResourceStore;
use ldp_types::{AsyncHandler, LdpResult};

use crate::operation::{Operation, ResponseDescription, PATCH};

/// Applies the request patch to the target.
pub struct PatchOperationHandler {
    store: Arc<dyn ResourceStore>,
}

impl PatchOperationHandler {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AsyncHandler<Operation, ResponseDescription> for PatchOperationHandler {
    fn can_handle(&self, operation: &Operation) -> LdpResult<()> {
        operation.expect_method(PATCH)
    }

    async fn handle(&self, operation: Operation) -> LdpResult<ResponseDescription> {
        let (target, patch) = operation.into_patch()?;
        self.store.modify_resource(&target, patch).await?;
        Ok(ResponseDescription::reset(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{RequestBody, ResponseKind};
    use ldp_graph::Update;
    use ldp_store::InMemoryResourceStore;
    use ldp_types::{LdpError, Patch, Representation, ResourceIdentifier};

    fn id(path: &str) -> ResourceIdentifier {
        ResourceIdentifier::parse(&format!("http://test.com{path}")).unwrap()
    }

    #[tokio::test]
    async fn requires_a_patch_body() {
        let store = Arc::new(InMemoryResourceStore::new(id("/")).unwrap());
        let handler = PatchOperationHandler::new(store);
        let op = Operation::new(PATCH, id("/doc")).with_body(RequestBody::Representation(
            Representation::binary("text/plain", "x"),
        ));
        let err = handler.handle(op).await.unwrap_err();
        assert!(matches!(err, LdpError::UnsupportedOperation(_)));
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        // The bare in-memory store has no patch support.
        let store = Arc::new(InMemoryResourceStore::new(id("/")).unwrap());
        let op = Operation::new(PATCH, id("/doc"))
            .with_body(RequestBody::Patch(Patch::sparql_update(Update::default())));
        let err = PatchOperationHandler::new(store).handle(op).await.unwrap_err();
        assert!(matches!(err, LdpError::UnsupportedOperation(_)));
    }

    #[tokio::test]
    async fn successful_patches_reset() {
        struct Accepting;

        #[async_trait]
        impl ResourceStore for Accepting {
            async fn get_representation(
                &self,
                identifier: &ResourceIdentifier,
                _preferences: &ldp_types::RepresentationPreferences,
            ) -> LdpResult<Representation> {
                Err(LdpError::NotFound(identifier.to_string()))
            }

            async fn add_resource(
                &self,
                container: &ResourceIdentifier,
                _representation: Representation,
            ) -> LdpResult<ResourceIdentifier> {
                Ok(container.clone())
            }

            async fn set_representation(
                &self,
                _identifier: &ResourceIdentifier,
                _representation: Representation,
            ) -> LdpResult<()> {
                Ok(())
            }

            async fn delete_resource(&self, _identifier: &ResourceIdentifier) -> LdpResult<()> {
                Ok(())
            }

            async fn modify_resource(&self, _identifier: &ResourceIdentifier, _patch: Patch) -> LdpResult<()> {
                Ok(())
            }
        }

        let op = Operation::new(PATCH, id("/doc"))
            .with_body(RequestBody::Patch(Patch::sparql_update(Update::default())));
        let response = PatchOperationHandler::new(Arc::new(Accepting)).handle(op).await.unwrap();
        assert_eq!(response.identifier, id("/doc"));
        assert!(matches!(response.kind, ResponseKind::Reset));
    }
}
