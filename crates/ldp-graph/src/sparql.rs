//! The SPARQL Update subset used for resource patches.
//!
//! Supported: `INSERT DATA`, `DELETE DATA`, and `DELETE`/`INSERT` templates
//! with an empty `WHERE {}` clause, optionally preceded by `PREFIX`/`BASE`
//! declarations and chained with `;`. Anything that would need pattern
//! matching (variables, non-empty `WHERE`, `DELETE WHERE`) or graph management
//! is rejected as [`GraphError::UnsupportedUpdate`].

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;
use crate::lexer::{tokenize, TokenKind};
use crate::syntax::{Context, Dialect, TermReader};
use crate::term::Quad;

/// One delete/insert step. Deletions apply before insertions.
///
/// A clause that is present but empty is `Some(vec![])`, which still counts
/// as an insert or a delete.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateOperation {
    pub delete: Option<Vec<Quad>>,
    pub insert: Option<Vec<Quad>>,
}

/// A parsed update request: a sequence of operations applied in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Update {
    pub operations: Vec<UpdateOperation>,
}

const UNSUPPORTED_OPERATIONS: &[&str] = &[
    "LOAD", "CLEAR", "CREATE", "DROP", "COPY", "MOVE", "ADD", "WITH",
];

impl Update {
    /// Parse an update request. `base` resolves relative IRIs.
    pub fn parse(text: &str, base: Option<&str>) -> GraphResult<Self> {
        let tokens = tokenize(text, 1)?;
        let mut context = Context::with_base(base.map(str::to_string));
        let mut reader = TermReader::new(&tokens, &mut context, Dialect::Update);
        let mut operations = Vec::new();

        loop {
            while reader.directive()? {}
            if reader.at_end() {
                break;
            }
            operations.push(operation(&mut reader)?);
            match reader.peek() {
                Some(TokenKind::Semicolon) => {
                    reader.advance();
                }
                None => break,
                Some(other) => {
                    return Err(reader.error(format!("expected ';' between operations, found {other:?}")))
                }
            }
        }

        Ok(Self { operations })
    }

    /// Whether any operation has an insert clause, empty or not.
    pub fn has_inserts(&self) -> bool {
        self.operations.iter().any(|op| op.insert.is_some())
    }

    /// Whether any operation has a delete clause, empty or not.
    pub fn has_deletes(&self) -> bool {
        self.operations.iter().any(|op| op.delete.is_some())
    }

    /// Whether the request contains no operations at all.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Apply every operation to `graph`. Deleting an absent statement is a
    /// no-op.
    pub fn apply(&self, graph: &mut Graph) {
        for op in &self.operations {
            for quad in op.delete.iter().flatten() {
                graph.remove(quad);
            }
            graph.extend(op.insert.iter().flatten().cloned());
        }
    }
}

fn keyword<'t>(reader: &TermReader<'t, '_>) -> Option<&'t str> {
    match reader.peek() {
        Some(TokenKind::Word(w)) => Some(w.as_str()),
        _ => None,
    }
}

fn operation(reader: &mut TermReader<'_, '_>) -> GraphResult<UpdateOperation> {
    let Some(word) = keyword(reader) else {
        return Err(reader.error("expected INSERT or DELETE"));
    };
    let upper = word.to_ascii_uppercase();
    if UNSUPPORTED_OPERATIONS.contains(&upper.as_str()) {
        return Err(GraphError::UnsupportedUpdate(format!(
            "{upper} operations are not supported"
        )));
    }
    reader.advance();

    match upper.as_str() {
        "INSERT" if reader.peek_keyword("DATA") => {
            reader.advance();
            Ok(UpdateOperation {
                delete: None,
                insert: Some(block(reader)?),
            })
        }
        "INSERT" => {
            let insert = block(reader)?;
            empty_where(reader)?;
            Ok(UpdateOperation {
                delete: None,
                insert: Some(insert),
            })
        }
        "DELETE" if reader.peek_keyword("DATA") => {
            reader.advance();
            Ok(UpdateOperation {
                delete: Some(block(reader)?),
                insert: None,
            })
        }
        "DELETE" if reader.peek_keyword("WHERE") => Err(GraphError::UnsupportedUpdate(
            "DELETE WHERE is not supported".into(),
        )),
        "DELETE" => {
            let delete = Some(block(reader)?);
            let insert = if reader.peek_keyword("INSERT") {
                reader.advance();
                Some(block(reader)?)
            } else {
                None
            };
            empty_where(reader)?;
            Ok(UpdateOperation { delete, insert })
        }
        _ => Err(reader.error(format!("unknown update operation '{word}'"))),
    }
}

/// `{ triples (. triples)* .? }`
fn block(reader: &mut TermReader<'_, '_>) -> GraphResult<Vec<Quad>> {
    reader.expect(&TokenKind::OpenBrace, "'{'")?;
    let mut quads = Vec::new();
    loop {
        if reader.peek() == Some(&TokenKind::CloseBrace) {
            reader.advance();
            return Ok(quads);
        }
        if reader.peek_keyword("GRAPH") {
            return Err(GraphError::UnsupportedUpdate(
                "GRAPH blocks are not supported".into(),
            ));
        }
        reader.triples(&mut quads)?;
        match reader.peek() {
            Some(TokenKind::Dot) => {
                reader.advance();
            }
            Some(TokenKind::CloseBrace) => {}
            _ => return Err(reader.error("expected '.' or '}' after triples")),
        }
    }
}

fn empty_where(reader: &mut TermReader<'_, '_>) -> GraphResult<()> {
    if !reader.peek_keyword("WHERE") {
        return Err(reader.error("expected WHERE clause"));
    }
    reader.advance();
    reader.expect(&TokenKind::OpenBrace, "'{'")?;
    if reader.peek() != Some(&TokenKind::CloseBrace) {
        return Err(GraphError::UnsupportedUpdate(
            "only empty WHERE clauses are supported".into(),
        ));
    }
    reader.advance();
    Ok(())
}
