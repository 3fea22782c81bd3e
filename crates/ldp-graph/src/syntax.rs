//! Recursive-descent reader for the triple grammar shared by Turtle
//! documents and SPARQL Update data blocks.

use std::collections::HashMap;

use crate::error::{GraphError, GraphResult};
use crate::iri;
use crate::lexer::{Token, TokenKind};
use crate::term::{Literal, Quad, Term, RDF_TYPE, XSD};

/// Which grammar the reader is serving. Only affects how constructs outside
/// the shared subset are reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Dialect {
    Turtle,
    Update,
}

/// Prefix and base state that persists across statements.
#[derive(Clone, Debug, Default)]
pub(crate) struct Context {
    pub prefixes: HashMap<String, String>,
    pub base: Option<String>,
}

impl Context {
    pub fn with_base(base: Option<String>) -> Self {
        Self {
            prefixes: HashMap::new(),
            base,
        }
    }
}

pub(crate) struct TermReader<'t, 'c> {
    tokens: &'t [Token],
    pos: usize,
    context: &'c mut Context,
    dialect: Dialect,
}

impl<'t, 'c> TermReader<'t, 'c> {
    pub fn new(tokens: &'t [Token], context: &'c mut Context, dialect: Dialect) -> Self {
        Self {
            tokens,
            pos: 0,
            context,
            dialect,
        }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn peek(&self) -> Option<&'t TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    pub fn advance(&mut self) -> Option<&'t TokenKind> {
        let token = self.tokens.get(self.pos).map(|t| &t.kind);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Line of the current token, or of the last token at end of input.
    pub fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    pub fn error(&self, message: impl Into<String>) -> GraphError {
        GraphError::syntax(self.line(), message)
    }

    pub fn expect(&mut self, expected: &TokenKind, what: &str) -> GraphResult<()> {
        match self.advance() {
            Some(kind) if kind == expected => Ok(()),
            Some(other) => Err(self.error(format!("expected {what}, found {other:?}"))),
            None => Err(self.error(format!("expected {what}, found end of input"))),
        }
    }

    /// Whether the current token is the given case-insensitive keyword.
    pub fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(TokenKind::Word(w)) if w.eq_ignore_ascii_case(keyword))
    }

    /// Parse a directive if one starts here. Returns `false` otherwise.
    pub fn directive(&mut self) -> GraphResult<bool> {
        let (sparql_style, is_prefix) = match self.peek() {
            Some(TokenKind::AtWord(w)) if w == "prefix" => (false, true),
            Some(TokenKind::AtWord(w)) if w == "base" => (false, false),
            Some(TokenKind::AtWord(w)) => {
                return Err(self.error(format!("unknown directive @{w}")));
            }
            Some(TokenKind::Word(w)) if w.eq_ignore_ascii_case("prefix") => (true, true),
            Some(TokenKind::Word(w)) if w.eq_ignore_ascii_case("base") => (true, false),
            _ => return Ok(false),
        };
        self.advance();

        if is_prefix {
            let prefix = match self.advance() {
                Some(TokenKind::PrefixedName { prefix, local }) if local.is_empty() => {
                    prefix.clone()
                }
                _ => return Err(self.error("expected a prefix name ending in ':'")),
            };
            let namespace = self.iri_ref()?;
            self.context.prefixes.insert(prefix, namespace);
        } else {
            let base = self.iri_ref()?;
            self.context.base = Some(base);
        }

        if !sparql_style {
            self.expect(&TokenKind::Dot, "'.' after directive")?;
        }
        Ok(true)
    }

    /// Parse `subject predicateObjectList`, appending the statements to `out`.
    pub fn triples(&mut self, out: &mut Vec<Quad>) -> GraphResult<()> {
        let subject = self.subject()?;
        loop {
            let predicate = self.verb()?;
            loop {
                let object = self.object()?;
                out.push(Quad::new(subject.clone(), predicate.clone(), object));
                if self.peek() == Some(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }

            if self.peek() != Some(&TokenKind::Semicolon) {
                return Ok(());
            }
            while self.peek() == Some(&TokenKind::Semicolon) {
                self.advance();
            }
            if !self.starts_verb() {
                return Ok(());
            }
        }
    }

    fn starts_verb(&self) -> bool {
        match self.peek() {
            Some(TokenKind::Iri(_)) | Some(TokenKind::PrefixedName { .. }) => true,
            Some(TokenKind::Word(w)) => w == "a",
            _ => false,
        }
    }

    fn iri_ref(&mut self) -> GraphResult<String> {
        match self.advance() {
            Some(TokenKind::Iri(raw)) => self.resolve(raw),
            _ => Err(self.error("expected an IRI")),
        }
    }

    fn resolve(&self, raw: &str) -> GraphResult<String> {
        iri::resolve(self.context.base.as_deref(), raw)
    }

    fn expand(&self, prefix: &str, local: &str) -> GraphResult<String> {
        match self.context.prefixes.get(prefix) {
            Some(namespace) => Ok(format!("{namespace}{local}")),
            None => Err(self.error(format!("undefined prefix '{prefix}:'"))),
        }
    }

    fn unsupported(&self, construct: &str) -> GraphError {
        match self.dialect {
            Dialect::Turtle => self.error(format!("{construct} are not supported")),
            Dialect::Update => GraphError::UnsupportedUpdate(format!("{construct} are not supported")),
        }
    }

    fn node(&mut self, position: &str) -> GraphResult<Term> {
        match self.advance() {
            Some(TokenKind::Iri(raw)) => Ok(Term::NamedNode(self.resolve(raw)?)),
            Some(TokenKind::PrefixedName { prefix, local }) => {
                Ok(Term::NamedNode(self.expand(prefix, local)?))
            }
            Some(TokenKind::BlankNode(label)) => Ok(Term::BlankNode(label.clone())),
            Some(TokenKind::Variable(_)) => Err(self.unsupported("variables")),
            Some(TokenKind::OpenBracket) | Some(TokenKind::OpenParen) => {
                Err(self.unsupported("anonymous blank nodes and collections"))
            }
            Some(other) => Err(self.error(format!("unexpected {other:?} in {position} position"))),
            None => Err(self.error(format!("expected {position}, found end of input"))),
        }
    }

    fn subject(&mut self) -> GraphResult<Term> {
        self.node("subject")
    }

    fn verb(&mut self) -> GraphResult<Term> {
        if self.peek() == Some(&TokenKind::Word("a".into())) {
            self.advance();
            return Ok(Term::named(RDF_TYPE));
        }
        self.node("predicate")
    }

    fn object(&mut self) -> GraphResult<Term> {
        let literal = match self.peek() {
            Some(TokenKind::String(value)) => {
                self.advance();
                match self.peek() {
                    Some(TokenKind::LangTag(lang)) => {
                        self.advance();
                        Literal::language_tagged(value.clone(), lang.clone())
                    }
                    Some(TokenKind::DoubleCaret) => {
                        self.advance();
                        let datatype = match self.node("datatype")? {
                            Term::NamedNode(iri) => iri,
                            _ => return Err(self.error("datatype must be an IRI")),
                        };
                        Literal::typed(value.clone(), datatype)
                    }
                    _ => Literal::simple(value.clone()),
                }
            }
            Some(TokenKind::Integer(n)) => {
                self.advance();
                Literal::typed(n.clone(), format!("{XSD}integer"))
            }
            Some(TokenKind::Decimal(n)) => {
                self.advance();
                Literal::typed(n.clone(), format!("{XSD}decimal"))
            }
            Some(TokenKind::Double(n)) => {
                self.advance();
                Literal::typed(n.clone(), format!("{XSD}double"))
            }
            Some(TokenKind::Word(w)) if w == "true" || w == "false" => {
                self.advance();
                Literal::typed(w.clone(), format!("{XSD}boolean"))
            }
            _ => return self.node("object"),
        };
        Ok(Term::Literal(literal))
    }
}
