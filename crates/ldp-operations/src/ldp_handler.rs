use std::sync::Arc;

use async_trait::async_trait;
use ldp_auth::{Authorizer, AuthorizerArgs};
use ldp_types::{AsyncHandler, Credentials, LdpResult};

use crate::handlers::OperationHandler;
use crate::operation::{Operation, ResponseDescription};
use crate::permissions::PermissionsExtractor;

/// An operation together with the caller that issued it.
#[derive(Debug)]
pub struct LdpRequest {
    pub credentials: Credentials,
    pub operation: Operation,
}

/// Runs an operation only after the caller has been authorized for it.
///
/// The required permissions are extracted first, then checked by the
/// authorizer, and only then is the operation handed to the operation
/// handler. A failure at any step ends the request with that error.
pub struct AuthenticatedLdpHandler {
    permissions: Arc<PermissionsExtractor>,
    authorizer: Arc<Authorizer>,
    operations: Arc<OperationHandler>,
}

impl AuthenticatedLdpHandler {
    pub fn new(
        permissions: Arc<PermissionsExtractor>,
        authorizer: Arc<Authorizer>,
        operations: Arc<OperationHandler>,
    ) -> Self {
        Self {
            permissions,
            authorizer,
            operations,
        }
    }
}

#[async_trait]
impl AsyncHandler<LdpRequest, ResponseDescription> for AuthenticatedLdpHandler {
    fn can_handle(&self, request: &LdpRequest) -> LdpResult<()> {
        self.operations.can_handle(&request.operation)
    }

    async fn handle(&self, request: LdpRequest) -> LdpResult<ResponseDescription> {
        let LdpRequest {
            credentials,
            operation,
        } = request;

        let permissions = self.permissions.handle_safe(operation.summary()).await?;
        tracing::debug!(
            method = %operation.method,
            target = %operation.target,
            ?permissions,
            "authorizing operation"
        );
        self.authorizer
            .handle_safe(AuthorizerArgs {
                identifier: operation.target.clone(),
                credentials,
                permissions,
            })
            .await?;

        self.operations.handle_safe(operation).await
    }
}
