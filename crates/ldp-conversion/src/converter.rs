use std::sync::Arc;

use async_stream::try_stream;
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt, TryStreamExt};
use ldp_graph::turtle::write_quad;
use ldp_graph::{Quad, TurtleParser};
use ldp_types::media::{self, INTERNAL_QUADS, TEXT_TURTLE};
use ldp_types::{
    AsyncHandler, ByteStream, LdpError, LdpResult, QuadStream, Representation,
    RepresentationPreferences,
};

use crate::negotiation::PreferenceNegotiator;

/// Input of a conversion: what is there and what the caller wants.
#[derive(Debug)]
pub struct ConversionArgs {
    pub representation: Representation,
    pub preferences: RepresentationPreferences,
}

impl ConversionArgs {
    pub fn new(representation: Representation, preferences: RepresentationPreferences) -> Self {
        Self {
            representation,
            preferences,
        }
    }
}

/// Anything that converts representations. Several converters compose into
/// one with a [`Dispatcher`](ldp_types::Dispatcher).
pub type RepresentationConverter = dyn AsyncHandler<ConversionArgs, Representation>;

/// Shared converter handle.
pub type SharedConverter = Arc<RepresentationConverter>;

/// Converts between `text/turtle` and `internal/quads`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TurtleQuadConverter;

impl TurtleQuadConverter {
    pub const SUPPORTED: [&'static str; 2] = [TEXT_TURTLE, INTERNAL_QUADS];

    pub fn new() -> Self {
        Self
    }

    fn input_type(representation: &Representation) -> LdpResult<&'static str> {
        let declared = representation
            .metadata
            .media_type()
            .ok_or(LdpError::MissingContentType)?;
        Self::SUPPORTED
            .into_iter()
            .find(|t| *t == declared)
            .ok_or_else(|| {
                LdpError::UnsupportedMediaType(format!(
                    "can only convert from {} and {}, got {declared}",
                    TEXT_TURTLE, INTERNAL_QUADS
                ))
            })
    }
}

#[async_trait]
impl AsyncHandler<ConversionArgs, Representation> for TurtleQuadConverter {
    fn can_handle(&self, args: &ConversionArgs) -> LdpResult<()> {
        Self::input_type(&args.representation)?;
        PreferenceNegotiator::match_type(&args.preferences, &Self::SUPPORTED)?;
        Ok(())
    }

    async fn handle(&self, args: ConversionArgs) -> LdpResult<Representation> {
        let input = Self::input_type(&args.representation)?;
        let output = PreferenceNegotiator::match_type(&args.preferences, &Self::SUPPORTED)?;

        if input == output {
            return Ok(args.representation);
        }
        tracing::debug!(from = input, to = output, "converting representation");
        if input == TEXT_TURTLE {
            turtle_to_quads(args.representation)
        } else {
            quads_to_turtle(args.representation)
        }
    }
}

fn turtle_to_quads(representation: Representation) -> LdpResult<Representation> {
    let base = representation.metadata.identifier.as_ref().map(ToString::to_string);
    let mut metadata = representation.metadata.clone();
    metadata.content_type = Some(INTERNAL_QUADS.to_string());
    let input = representation.into_byte_stream()?;
    Ok(Representation::from_quad_stream(
        metadata,
        parse_turtle(input, base).boxed(),
    ))
}

/// Parse statements as their chunks arrive. The first error ends the stream.
fn parse_turtle(
    input: ByteStream,
    base: Option<String>,
) -> impl Stream<Item = LdpResult<Quad>> + Send + 'static {
    try_stream! {
        let mut parser = TurtleParser::new(base);
        for await chunk in input {
            let chunk: Bytes = chunk?;
            for quad in parser.push(&chunk)? {
                yield quad;
            }
        }
        for quad in parser.finish()? {
            yield quad;
        }
    }
}

fn quads_to_turtle(representation: Representation) -> LdpResult<Representation> {
    let mut metadata = representation.metadata.clone();
    metadata.content_type = Some(TEXT_TURTLE.to_string());
    let input: QuadStream = representation.into_quad_stream()?;
    let output = input.map_ok(|quad| Bytes::from(write_quad(&quad))).boxed();
    Ok(Representation::from_byte_stream(metadata, output))
}

/// Whether a representation already has the given media type.
pub fn has_media_type(representation: &Representation, wanted: &str) -> bool {
    representation
        .metadata
        .media_type()
        .is_some_and(|declared| declared == media::essence(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use ldp_graph::{turtle, Graph, Term};
    use ldp_types::{Dispatcher, RepresentationMetadata, ResourceIdentifier};

    const TRIPLE: &str = "<http://test.com/s> <http://test.com/p> <http://test.com/o>.";

    fn spo() -> Quad {
        Quad::new(
            Term::named("http://test.com/s"),
            Term::named("http://test.com/p"),
            Term::named("http://test.com/o"),
        )
    }

    fn args(representation: Representation, wanted: &str) -> ConversionArgs {
        ConversionArgs::new(representation, RepresentationPreferences::media_type(wanted))
    }

    #[test]
    fn missing_content_type_is_rejected() {
        let mut rep = Representation::binary(TEXT_TURTLE, TRIPLE);
        rep.metadata.content_type = None;
        let err = TurtleQuadConverter.can_handle(&args(rep, INTERNAL_QUADS)).unwrap_err();
        assert!(matches!(err, LdpError::MissingContentType));
    }

    #[test]
    fn unsupported_types_are_rejected() {
        let plain = Representation::binary("text/plain", "hi");
        assert!(matches!(
            TurtleQuadConverter.can_handle(&args(plain, TEXT_TURTLE)),
            Err(LdpError::UnsupportedMediaType(_))
        ));
        let turtle = Representation::binary(TEXT_TURTLE, TRIPLE);
        assert!(matches!(
            TurtleQuadConverter.can_handle(&args(turtle, "application/json")),
            Err(LdpError::UnsupportedMediaType(_))
        ));
    }

    #[tokio::test]
    async fn turtle_to_quads() {
        let rep = Representation::binary(TEXT_TURTLE, TRIPLE);
        let converted = TurtleQuadConverter
            .handle_safe(args(rep, INTERNAL_QUADS))
            .await
            .unwrap();
        assert_eq!(converted.content_type(), Some(INTERNAL_QUADS));
        assert_eq!(converted.into_quads().await.unwrap(), vec![spo()]);
    }

    #[tokio::test]
    async fn quads_to_turtle() {
        let converted = TurtleQuadConverter
            .handle_safe(args(Representation::quads(vec![spo()]), TEXT_TURTLE))
            .await
            .unwrap();
        assert_eq!(converted.content_type(), Some(TEXT_TURTLE));
        let body = converted.into_bytes().await.unwrap();
        let text = std::str::from_utf8(&body).unwrap();
        assert!(text.contains("<http://test.com/s> <http://test.com/p> <http://test.com/o>"));
    }

    #[tokio::test]
    async fn identity_returns_the_input_untouched() {
        // Not valid Turtle: any transcoding attempt would fail.
        let mut rep = Representation::binary("text/turtle; charset=utf-8", "not turtle at all");
        rep.metadata.slug = Some("keep".into());
        let converted = TurtleQuadConverter
            .handle_safe(args(rep, TEXT_TURTLE))
            .await
            .unwrap();
        assert_eq!(converted.content_type(), Some("text/turtle; charset=utf-8"));
        assert_eq!(converted.metadata.slug.as_deref(), Some("keep"));
        assert_eq!(converted.into_bytes().await.unwrap(), Bytes::from("not turtle at all"));
    }

    #[tokio::test]
    async fn metadata_is_copied_with_the_new_type() {
        let id = ResourceIdentifier::parse("http://test.com/doc").unwrap();
        let mut rep = Representation::binary(TEXT_TURTLE, "<#me> <http://test.com/p> <x>.");
        rep.metadata.identifier = Some(id.clone());
        rep.metadata.extra.insert("etag".into(), "1".into());

        let converted = TurtleQuadConverter
            .handle(args(rep, INTERNAL_QUADS))
            .await
            .unwrap();
        assert_eq!(converted.metadata.identifier, Some(id));
        assert_eq!(converted.metadata.extra.get("etag").map(String::as_str), Some("1"));
        let quads = converted.into_quads().await.unwrap();
        assert_eq!(quads[0].subject, Term::named("http://test.com/doc#me"));
        assert_eq!(quads[0].object, Term::named("http://test.com/x"));
    }

    #[tokio::test]
    async fn parse_errors_surface_as_unsupported_media() {
        let rep = Representation::binary(
            TEXT_TURTLE,
            "<http://test.com/s> <http://test.com/p> <http://test.co",
        );
        let converted = TurtleQuadConverter
            .handle(args(rep, INTERNAL_QUADS))
            .await
            .unwrap();
        match converted.into_quads().await {
            Err(LdpError::UnsupportedMediaType(message)) => assert!(message.contains("line 1")),
            other => panic!("expected UnsupportedMediaType, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn statements_stream_before_the_input_ends() {
        let chunks: ByteStream = stream::iter(vec![
            Ok(Bytes::from("<http://test.com/s> <http://test.com/p> <http://test.com/o> .\n")),
            Err(LdpError::Internal("connection reset".into())),
        ])
        .boxed();
        let rep = Representation::from_byte_stream(RepresentationMetadata::new(TEXT_TURTLE), chunks);
        let mut quads = TurtleQuadConverter
            .handle(args(rep, INTERNAL_QUADS))
            .await
            .unwrap()
            .into_quad_stream()
            .unwrap();

        assert_eq!(quads.next().await.unwrap().unwrap(), spo());
        assert!(matches!(quads.next().await, Some(Err(LdpError::Internal(_)))));
        assert!(quads.next().await.is_none());
    }

    #[tokio::test]
    async fn roundtrip_preserves_the_triple_set() {
        let doc = r#"
            @prefix ex: <http://example.org/> .
            ex:a ex:name "A \"quoted\" name"@en ; ex:knows ex:b, _:c .
            _:c ex:age 7 .
        "#;
        let original: Graph = turtle::parse(doc, None).unwrap().into_iter().collect();

        let quads = TurtleQuadConverter
            .handle(args(Representation::binary(TEXT_TURTLE, doc), INTERNAL_QUADS))
            .await
            .unwrap();
        let turtle = TurtleQuadConverter
            .handle(args(quads, TEXT_TURTLE))
            .await
            .unwrap();
        let back = TurtleQuadConverter
            .handle(args(turtle, INTERNAL_QUADS))
            .await
            .unwrap();
        let result: Graph = back.into_quads().await.unwrap().into_iter().collect();
        assert_eq!(result, original);

        let turtle = TurtleQuadConverter
            .handle(args(Representation::quads(original.clone().into_quads()), TEXT_TURTLE))
            .await
            .unwrap();
        let again: Graph = TurtleQuadConverter
            .handle(args(turtle, INTERNAL_QUADS))
            .await
            .unwrap()
            .into_quads()
            .await
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(again, original);
    }

    #[tokio::test]
    async fn converters_compose_through_a_dispatcher() {
        let converter: Dispatcher<ConversionArgs, Representation> =
            Dispatcher::new("converters", vec![Arc::new(TurtleQuadConverter)]);
        let out = converter
            .handle(args(Representation::binary(TEXT_TURTLE, TRIPLE), INTERNAL_QUADS))
            .await
            .unwrap();
        assert!(has_media_type(&out, INTERNAL_QUADS));

        let err = converter
            .handle(args(Representation::binary("image/png", "x"), TEXT_TURTLE))
            .await
            .unwrap_err();
        assert!(matches!(err, LdpError::NoApplicableHandler { .. }));
    }
}
