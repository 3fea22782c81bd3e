use std::collections::BTreeMap;
use std::fmt;

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use ldp_graph::Quad;

use crate::error::{LdpError, LdpResult};
use crate::identifier::ResourceIdentifier;
use crate::media;

/// Stream of raw body chunks.
pub type ByteStream = BoxStream<'static, LdpResult<Bytes>>;

/// Stream of parsed statements.
pub type QuadStream = BoxStream<'static, LdpResult<Quad>>;

/// Descriptive data attached to a representation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepresentationMetadata {
    /// Declared media type. Required by every converter and store write.
    pub content_type: Option<String>,
    /// Resource the data belongs to. Used as base IRI when parsing.
    pub identifier: Option<ResourceIdentifier>,
    /// Requested member name for container appends.
    pub slug: Option<String>,
    /// Additional headers and descriptors carried along unchanged.
    pub extra: BTreeMap<String, String>,
}

impl RepresentationMetadata {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            ..Self::default()
        }
    }

    pub fn with_identifier(mut self, identifier: ResourceIdentifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Content type essence, if declared.
    pub fn media_type(&self) -> Option<String> {
        self.content_type.as_deref().map(media::essence)
    }
}

/// The payload of a representation.
pub enum RepresentationData {
    Binary(ByteStream),
    Quads(QuadStream),
}

/// Data plus metadata. The data is a lazy stream consumed at most once.
pub struct Representation {
    pub metadata: RepresentationMetadata,
    pub data: RepresentationData,
}

impl Representation {
    pub fn new(metadata: RepresentationMetadata, data: RepresentationData) -> Self {
        Self { metadata, data }
    }

    /// A binary representation holding a single chunk.
    pub fn binary(content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self::from_byte_stream(
            RepresentationMetadata::new(content_type),
            stream::once(async move { Ok(body) }).boxed(),
        )
    }

    pub fn from_byte_stream(metadata: RepresentationMetadata, data: ByteStream) -> Self {
        Self::new(metadata, RepresentationData::Binary(data))
    }

    /// An `internal/quads` representation over an in-memory statement list.
    pub fn quads(quads: Vec<Quad>) -> Self {
        Self::from_quad_stream(
            RepresentationMetadata::new(media::INTERNAL_QUADS),
            stream::iter(quads.into_iter().map(Ok)).boxed(),
        )
    }

    pub fn from_quad_stream(metadata: RepresentationMetadata, data: QuadStream) -> Self {
        Self::new(metadata, RepresentationData::Quads(data))
    }

    pub fn content_type(&self) -> Option<&str> {
        self.metadata.content_type.as_deref()
    }

    pub fn is_binary(&self) -> bool {
        matches!(self.data, RepresentationData::Binary(_))
    }

    pub fn into_byte_stream(self) -> LdpResult<ByteStream> {
        match self.data {
            RepresentationData::Binary(data) => Ok(data),
            RepresentationData::Quads(_) => Err(LdpError::Internal(format!(
                "expected binary data, found quads ({})",
                self.metadata.content_type.unwrap_or_default()
            ))),
        }
    }

    pub fn into_quad_stream(self) -> LdpResult<QuadStream> {
        match self.data {
            RepresentationData::Quads(data) => Ok(data),
            RepresentationData::Binary(_) => Err(LdpError::Internal(format!(
                "expected quad data, found binary ({})",
                self.metadata.content_type.unwrap_or_default()
            ))),
        }
    }

    /// Drain a binary representation into one buffer.
    pub async fn into_bytes(self) -> LdpResult<Bytes> {
        let buffer = self
            .into_byte_stream()?
            .try_fold(BytesMut::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await?;
        Ok(buffer.freeze())
    }

    /// Drain a quad representation.
    pub async fn into_quads(self) -> LdpResult<Vec<Quad>> {
        self.into_quad_stream()?.try_collect().await
    }
}

impl fmt::Debug for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.data {
            RepresentationData::Binary(_) => "binary",
            RepresentationData::Quads(_) => "quads",
        };
        f.debug_struct("Representation")
            .field("metadata", &self.metadata)
            .field("data", &kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldp_graph::Term;

    #[tokio::test]
    async fn binary_roundtrip() {
        let rep = Representation::binary(media::TEXT_TURTLE, "hello");
        assert!(rep.is_binary());
        assert_eq!(rep.content_type(), Some(media::TEXT_TURTLE));
        assert_eq!(rep.into_bytes().await.unwrap(), Bytes::from("hello"));
    }

    #[tokio::test]
    async fn chunks_are_concatenated() {
        let chunks = stream::iter(vec![Ok(Bytes::from("ab")), Ok(Bytes::from("cd"))]).boxed();
        let rep = Representation::from_byte_stream(RepresentationMetadata::new("text/plain"), chunks);
        assert_eq!(rep.into_bytes().await.unwrap(), Bytes::from("abcd"));
    }

    #[tokio::test]
    async fn stream_errors_propagate() {
        let chunks = stream::iter(vec![
            Ok(Bytes::from("ab")),
            Err(LdpError::Internal("disconnected".into())),
        ])
        .boxed();
        let rep = Representation::from_byte_stream(RepresentationMetadata::new("text/plain"), chunks);
        assert!(matches!(rep.into_bytes().await, Err(LdpError::Internal(_))));
    }

    #[tokio::test]
    async fn data_kind_mismatch_is_an_error() {
        let quad = Quad::new(Term::named("http://a/s"), Term::named("http://a/p"), Term::literal("o"));
        let rep = Representation::quads(vec![quad.clone()]);
        assert_eq!(rep.content_type(), Some(media::INTERNAL_QUADS));
        assert!(Representation::quads(vec![]).into_byte_stream().is_err());
        assert_eq!(rep.into_quads().await.unwrap(), vec![quad]);
    }

    #[test]
    fn metadata_builders() {
        let id = ResourceIdentifier::parse("http://test.com/foo").unwrap();
        let meta = RepresentationMetadata::new("Text/Turtle; charset=utf-8")
            .with_identifier(id.clone())
            .with_slug("bar");
        assert_eq!(meta.media_type().as_deref(), Some(media::TEXT_TURTLE));
        assert_eq!(meta.identifier, Some(id));
        assert_eq!(meta.slug.as_deref(), Some("bar"));
    }
}
