//! Incremental Turtle reader and line-oriented writer.

use crate::error::{GraphError, GraphResult};
use crate::lexer::{last_statement_end, tokenize, TokenKind};
use crate::syntax::{Context, Dialect, TermReader};
use crate::term::Quad;

/// Streaming Turtle parser.
///
/// Bytes are pushed in arbitrary chunks; every complete statement buffered so
/// far is parsed and returned immediately, and only the unfinished tail is
/// kept. Prefix and base declarations persist across chunks.
#[derive(Debug, Default)]
pub struct TurtleParser {
    pending: Vec<u8>,
    text: String,
    line: usize,
    context: Context,
}

impl TurtleParser {
    /// Create a parser. `base` resolves relative IRIs until an `@base`
    /// directive replaces it.
    pub fn new(base: Option<String>) -> Self {
        Self {
            pending: Vec::new(),
            text: String::new(),
            line: 1,
            context: Context::with_base(base),
        }
    }

    /// Feed a chunk and return the quads of every statement it completed.
    pub fn push(&mut self, chunk: &[u8]) -> GraphResult<Vec<Quad>> {
        self.pending.extend_from_slice(chunk);
        self.decode_pending()?;

        match last_statement_end(&self.text) {
            Some(end) => {
                let complete: String = self.text.drain(..end).collect();
                let quads = self.parse_statements(&complete)?;
                tracing::trace!(count = quads.len(), "parsed turtle statements");
                Ok(quads)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Signal end of input and return the quads of the remaining statements.
    pub fn finish(mut self) -> GraphResult<Vec<Quad>> {
        if !self.pending.is_empty() {
            return Err(GraphError::Encoding { valid_up_to: 0 });
        }
        let rest = std::mem::take(&mut self.text);
        self.parse_statements(&rest)
    }

    /// Move the longest valid UTF-8 prefix of `pending` into `text`, keeping
    /// a split multi-byte sequence for the next chunk.
    fn decode_pending(&mut self) -> GraphResult<()> {
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                self.text.push_str(text);
                self.pending.len()
            }
            Err(e) if e.error_len().is_none() => {
                let valid = e.valid_up_to();
                // The prefix was just validated by `from_utf8`.
                let text = std::str::from_utf8(&self.pending[..valid])
                    .map_err(|_| GraphError::Encoding { valid_up_to: valid })?;
                self.text.push_str(text);
                valid
            }
            Err(e) => {
                return Err(GraphError::Encoding {
                    valid_up_to: e.valid_up_to(),
                })
            }
        };
        self.pending.drain(..valid);
        Ok(())
    }

    fn parse_statements(&mut self, text: &str) -> GraphResult<Vec<Quad>> {
        let tokens = tokenize(text, self.line)?;
        self.line += text.matches('\n').count();

        let mut quads = Vec::new();
        let mut reader = TermReader::new(&tokens, &mut self.context, Dialect::Turtle);
        while !reader.at_end() {
            if reader.directive()? {
                continue;
            }
            reader.triples(&mut quads)?;
            reader.expect(&TokenKind::Dot, "'.' at end of statement")?;
        }
        Ok(quads)
    }
}

/// Parse a complete Turtle document.
pub fn parse(document: &str, base: Option<&str>) -> GraphResult<Vec<Quad>> {
    let mut parser = TurtleParser::new(base.map(str::to_string));
    let mut quads = parser.push(document.as_bytes())?;
    quads.extend(parser.finish()?);
    Ok(quads)
}

/// Serialize one quad as a self-contained Turtle statement line.
///
/// Graph names are dropped: Turtle only describes the default graph.
pub fn write_quad(quad: &Quad) -> String {
    format!("{} {} {} .\n", quad.subject, quad.predicate, quad.object)
}

/// Serialize quads as a Turtle document.
pub fn serialize<'a>(quads: impl IntoIterator<Item = &'a Quad>) -> String {
    quads.into_iter().map(write_quad).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::term::{Literal, Term, RDF_TYPE, XSD};
    use proptest::prelude::*;

    fn spo(s: &str, p: &str, o: &str) -> Quad {
        Quad::new(Term::named(s), Term::named(p), Term::named(o))
    }

    #[test]
    fn parses_a_simple_triple() {
        let quads = parse("<http://test.com/s> <http://test.com/p> <http://test.com/o>.", None)
            .unwrap();
        assert_eq!(
            quads,
            vec![spo("http://test.com/s", "http://test.com/p", "http://test.com/o")]
        );
    }

    #[test]
    fn parses_prefixes_lists_and_literals() {
        let doc = r#"
            @prefix ex: <http://example.org/> .
            PREFIX foaf: <http://xmlns.com/foaf/0.1/>
            ex:alice a foaf:Person ;
                foaf:name "Alice"@en, "Alicia" ;
                ex:age 42 ;
                ex:ok true .
        "#;
        let graph: Graph = parse(doc, None).unwrap().into_iter().collect();
        let alice = Term::named("http://example.org/alice");
        assert_eq!(graph.len(), 5);
        assert!(graph.contains(&Quad::new(
            alice.clone(),
            Term::named(RDF_TYPE),
            Term::named("http://xmlns.com/foaf/0.1/Person"),
        )));
        assert!(graph.contains(&Quad::new(
            alice.clone(),
            Term::named("http://xmlns.com/foaf/0.1/name"),
            Term::Literal(Literal::language_tagged("Alice", "en")),
        )));
        assert!(graph.contains(&Quad::new(
            alice,
            Term::named("http://example.org/age"),
            Term::Literal(Literal::typed("42", format!("{XSD}integer"))),
        )));
    }

    #[test]
    fn resolves_relative_iris_against_the_base() {
        let quads = parse("<#auth> <p> <./>.", Some("http://test.com/foo/.acl")).unwrap();
        assert_eq!(
            quads,
            vec![spo(
                "http://test.com/foo/.acl#auth",
                "http://test.com/foo/p",
                "http://test.com/foo/"
            )]
        );
    }

    #[test]
    fn relative_iri_without_base_is_an_error() {
        let err = parse("<s> <p> <o>.", None).unwrap_err();
        assert!(matches!(err, GraphError::RelativeIri(_)));
    }

    #[test]
    fn yields_statements_as_chunks_complete_them() {
        let mut parser = TurtleParser::new(None);
        assert!(parser.push(b"<http://a/s> <http://a/p> ").unwrap().is_empty());
        let first = parser.push(b"<http://a/o> .\n<http://a/s> <http://a/p> <http://a/o2>").unwrap();
        assert_eq!(first, vec![spo("http://a/s", "http://a/p", "http://a/o")]);
        let rest = {
            let mut q = parser.push(b" .").unwrap();
            q.extend(parser.finish().unwrap());
            q
        };
        assert_eq!(rest, vec![spo("http://a/s", "http://a/p", "http://a/o2")]);
    }

    #[test]
    fn handles_multibyte_characters_split_across_chunks() {
        let doc = "<http://a/s> <http://a/p> \"caf\u{e9}\" .\n".as_bytes();
        let split = doc.iter().position(|&b| b == 0xc3).unwrap() + 1;
        let mut parser = TurtleParser::new(None);
        let mut quads = parser.push(&doc[..split]).unwrap();
        quads.extend(parser.push(&doc[split..]).unwrap());
        quads.extend(parser.finish().unwrap());
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].object, Term::literal("caf\u{e9}"));
    }

    #[test]
    fn truncated_input_fails_on_finish() {
        let mut parser = TurtleParser::new(None);
        parser
            .push(b"<http://test.com/s> <http://test.com/p> <http://test.co")
            .unwrap();
        assert!(matches!(
            parser.finish(),
            Err(GraphError::Syntax { .. })
        ));
    }

    #[test]
    fn reports_the_failing_line() {
        let err = parse("<http://a/s> <http://a/p> <http://a/o> .\n<http://a/s> <http://a/p> .", None)
            .unwrap_err();
        assert!(matches!(err, GraphError::Syntax { line: 2, .. }));
    }

    #[test]
    fn writer_output_contains_the_triple() {
        let text = serialize(&[spo("http://test.com/s", "http://test.com/p", "http://test.com/o")]);
        assert!(text.contains("<http://test.com/s> <http://test.com/p> <http://test.com/o>"));
    }

    fn arb_term() -> impl Strategy<Value = Term> {
        prop_oneof![
            "[a-z]{1,6}".prop_map(|s| Term::named(format!("http://example.org/{s}"))),
            "[a-z][a-z0-9]{0,4}".prop_map(Term::blank),
            "[ -~\n\t]{0,12}".prop_map(Term::literal),
            ("[a-z ]{0,6}", "[a-z]{2}").prop_map(|(v, l)| Term::Literal(Literal::language_tagged(v, l))),
        ]
    }

    proptest! {
        #[test]
        fn serialize_then_parse_preserves_the_triple_set(
            triples in proptest::collection::vec(
                ("[a-z]{1,6}", "[a-z]{1,6}", arb_term()),
                0..8,
            )
        ) {
            let graph: Graph = triples
                .into_iter()
                .map(|(s, p, o)| Quad::new(
                    Term::named(format!("http://example.org/{s}")),
                    Term::named(format!("http://example.org/{p}")),
                    o,
                ))
                .collect();
            let text = serialize(graph.iter());
            let reparsed: Graph = parse(&text, None).unwrap().into_iter().collect();
            prop_assert_eq!(reparsed, graph);
        }
    }
}
