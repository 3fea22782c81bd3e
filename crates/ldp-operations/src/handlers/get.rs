use std::sync::Arc;

use async_trait::async_trait;
use ldp_store::ResourceStore;
use ldp_types::{AsyncHandler, LdpResult};

use crate::operation::{Operation, ResponseDescription, GET};

/// Reads a representation in the preferred type.
pub struct GetOperationHandler {
    store: Arc<dyn ResourceStore>,
}

impl GetOperationHandler {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AsyncHandler<Operation, ResponseDescription> for GetOperationHandler {
    fn can_handle(&self, operation: &Operation) -> LdpResult<()> {
        operation.expect_method(GET)
    }

    async fn handle(&self, operation: Operation) -> LdpResult<ResponseDescription> {
        let representation = self
            .store
            .get_representation(&operation.target, &operation.preferences)
            .await?;
        Ok(ResponseDescription::representation(operation.target, representation))
    }
}
