use std::sync::Arc;

use async_trait::async_trait;
use ldp_store::ResourceStore;
use ldp_types::{AsyncHandler, LdpResult};

use crate::operation::{Operation, ResponseDescription, DELETE};

pub struct DeleteOperationHandler {
    store: Arc<dyn ResourceStore>,
}

impl DeleteOperationHandler {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AsyncHandler<Operation, ResponseDescription> for DeleteOperationHandler {
    fn can_handle(&self, operation: &Operation) -> LdpResult<()> {
        operation.expect_method(DELETE)
    }

    async fn handle(&self, operation: Operation) -> LdpResult<ResponseDescription> {
        self.store.delete_resource(&operation.target).await?;
        Ok(ResponseDescription::reset(operation.target))
    }
}
