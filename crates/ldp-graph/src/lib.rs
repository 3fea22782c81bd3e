//! RDF graph model for the LDP server.
//!
//! Provides the in-memory statement model used when representations are
//! handled as quads, the Turtle codec used to move between quads and their
//! textual form, and the SPARQL Update subset used by patches.
//!
//! # Key Types
//!
//! - [`Term`], [`Literal`], [`Quad`] -- RDF statements
//! - [`Graph`] -- an ordered quad set with simple pattern matching
//! - [`TurtleParser`] -- incremental Turtle reader fed in byte chunks
//! - [`Update`] -- a parsed delete/insert update request

pub mod error;
pub mod graph;
pub mod iri;
mod lexer;
pub mod sparql;
mod syntax;
pub mod term;
pub mod turtle;

pub use error::{GraphError, GraphResult};
pub use graph::Graph;
pub use sparql::{Update, UpdateOperation};
pub use term::{Literal, Quad, Term, RDF_TYPE, XSD};
pub use turtle::TurtleParser;
