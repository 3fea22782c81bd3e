//! Request body parsing.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use ldp_graph::Update;
use ldp_types::media::SPARQL_UPDATE;
use ldp_types::{
    AsyncHandler, ByteStream, Dispatcher, LdpError, LdpResult, Patch, Representation,
    RepresentationMetadata,
};

use crate::operation::RequestBody;

/// A request body as the transport received it.
///
/// `metadata` carries the content type, the slug, and the request target as
/// identifier.
pub struct RawBody {
    pub metadata: RepresentationMetadata,
    pub data: ByteStream,
}

impl fmt::Debug for RawBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBody")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Anything that turns a raw body into a request body.
pub type BodyParser = dyn AsyncHandler<RawBody, RequestBody>;

/// Parses `application/sparql-update` bodies into patches.
///
/// The whole body is read before parsing; relative IRIs resolve against the
/// request target.
pub struct SparqlUpdateBodyParser;

#[async_trait]
impl AsyncHandler<RawBody, RequestBody> for SparqlUpdateBodyParser {
    fn can_handle(&self, body: &RawBody) -> LdpResult<()> {
        match body.metadata.media_type() {
            Some(ty) if ty == SPARQL_UPDATE => Ok(()),
            Some(ty) => Err(LdpError::UnsupportedMediaType(format!(
                "{ty} is not a SPARQL update"
            ))),
            None => Err(LdpError::MissingContentType),
        }
    }

    async fn handle(&self, body: RawBody) -> LdpResult<RequestBody> {
        let base = body.metadata.identifier.as_ref().map(|id| id.as_str().to_string());
        let bytes = Representation::from_byte_stream(body.metadata, body.data)
            .into_bytes()
            .await?;
        let text = std::str::from_utf8(&bytes).map_err(|e| {
            LdpError::UnsupportedOperation(format!("SPARQL update is not valid UTF-8: {e}"))
        })?;
        let update = Update::parse(text, base.as_deref())
            .map_err(|e| LdpError::UnsupportedOperation(format!("invalid SPARQL update: {e}")))?;
        if update.is_empty() {
            return Err(LdpError::UnsupportedOperation(
                "SPARQL update contains no operations".into(),
            ));
        }
        tracing::debug!(operations = update.operations.len(), "parsed SPARQL update");
        Ok(RequestBody::Patch(Patch::sparql_update(update)))
    }
}

/// Passes any typed body through as a binary representation.
pub struct RawBodyParser;

#[async_trait]
impl AsyncHandler<RawBody, RequestBody> for RawBodyParser {
    fn can_handle(&self, body: &RawBody) -> LdpResult<()> {
        match &body.metadata.content_type {
            Some(_) => Ok(()),
            None => Err(LdpError::MissingContentType),
        }
    }

    async fn handle(&self, body: RawBody) -> LdpResult<RequestBody> {
        Ok(RequestBody::Representation(Representation::from_byte_stream(
            body.metadata,
            body.data,
        )))
    }
}

/// SPARQL updates first, anything else with a content type as a
/// representation.
pub fn body_parser_dispatcher() -> Dispatcher<RawBody, RequestBody> {
    let parsers: Vec<Arc<BodyParser>> = vec![Arc::new(SparqlUpdateBodyParser), Arc::new(RawBodyParser)];
    Dispatcher::new("body parsers", parsers)
}

/// Parse `body` if there is one. A body without a content type is rejected
/// before any parser sees it.
pub async fn parse_body(
    parser: &BodyParser,
    body: Option<RawBody>,
) -> LdpResult<Option<RequestBody>> {
    let Some(body) = body else {
        return Ok(None);
    };
    if body.metadata.content_type.is_none() {
        return Err(LdpError::MissingContentType);
    }
    parser.handle_safe(body).await.map(Some)
}
