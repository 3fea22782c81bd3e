use std::sync::Arc;

use async_trait::async_trait;
use ldp_store::ResourceStore;
use ldp_types::{AsyncHandler, LdpResult};

use crate::operation::{Operation, ResponseDescription, HEAD};

/// Like `GET`, but only the metadata is returned. The data stream is dropped
/// unread.
pub struct HeadOperationHandler {
    store: Arc<dyn ResourceStore>,
}

impl HeadOperationHandler {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AsyncHandler<Operation, ResponseDescription> for HeadOperationHandler {
    fn can_handle(&self, operation: &Operation) -> LdpResult<()> {
        operation.expect_method(HEAD)
    }

    async fn handle(&self, operation: Operation) -> LdpResult<ResponseDescription> {
        let representation = self
            .store
            .get_representation(&operation.target, &operation.preferences)
            .await?;
        Ok(ResponseDescription::metadata(operation.target, representation.metadata))
    }
}
