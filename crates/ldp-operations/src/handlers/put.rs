use std::sync::Arc;

use async_trait::async_trait;
use ldp_auth::AclManager;
use ldp_graph::{turtle, GraphError};
use ldp_store::ResourceStore;
use ldp_types::media::TEXT_TURTLE;
use ldp_types::{AsyncHandler, LdpResult, Representation, ResourceIdentifier};

use crate::operation::{Operation, ResponseDescription, PUT};

/// Replaces the representation of the target with the request body.
///
/// Turtle written to a policy document is parsed first, so a broken policy
/// is refused instead of failing every later authorization below it.
pub struct PutOperationHandler {
    store: Arc<dyn ResourceStore>,
    acl_manager: Arc<dyn AclManager>,
}

impl PutOperationHandler {
    pub fn new(store: Arc<dyn ResourceStore>, acl_manager: Arc<dyn AclManager>) -> Self {
        Self { store, acl_manager }
    }
}

async fn checked_policy(
    target: &ResourceIdentifier,
    representation: Representation,
) -> LdpResult<Representation> {
    let metadata = representation.metadata.clone();
    let bytes = representation.into_bytes().await?;
    let text = std::str::from_utf8(&bytes).map_err(|e| GraphError::Encoding {
        valid_up_to: e.valid_up_to(),
    })?;
    let quads = turtle::parse(text, Some(target.as_str()))?;
    tracing::debug!(%target, quads = quads.len(), "validated policy document");

    let mut checked = Representation::binary(TEXT_TURTLE, bytes);
    checked.metadata = metadata;
    Ok(checked)
}

#[async_trait]
impl AsyncHandler<Operation, ResponseDescription> for PutOperationHandler {
    fn can_handle(&self, operation: &Operation) -> LdpResult<()> {
        operation.expect_method(PUT)
    }

    async fn handle(&self, operation: Operation) -> LdpResult<ResponseDescription> {
        let (target, mut representation) = operation.into_representation()?;
        if self.acl_manager.is_acl(&target)
            && representation.is_binary()
            && representation.metadata.media_type().as_deref() == Some(TEXT_TURTLE)
        {
            representation = checked_policy(&target, representation).await?;
        }
        self.store.set_representation(&target, representation).await?;
        Ok(ResponseDescription::reset(target))
    }
}
