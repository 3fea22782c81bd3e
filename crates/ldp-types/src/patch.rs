use ldp_graph::Update;

use crate::media;
use crate::representation::RepresentationMetadata;

/// A parsed modification request.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum Patch {
    /// A SPARQL Update request.
    SparqlUpdate {
        metadata: RepresentationMetadata,
        update: Update,
    },
}

impl Patch {
    pub fn sparql_update(update: Update) -> Self {
        Self::SparqlUpdate {
            metadata: RepresentationMetadata::new(media::SPARQL_UPDATE),
            update,
        }
    }

    pub fn metadata(&self) -> &RepresentationMetadata {
        match self {
            Self::SparqlUpdate { metadata, .. } => metadata,
        }
    }

    /// Name of the patch grammar, for diagnostics.
    pub fn grammar(&self) -> &'static str {
        match self {
            Self::SparqlUpdate { .. } => "SPARQL Update",
        }
    }
}
