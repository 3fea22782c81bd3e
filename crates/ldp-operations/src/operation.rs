use std::fmt;

use ldp_types::{
    LdpError, LdpResult, Patch, Representation, RepresentationMetadata, RepresentationPreferences,
    ResourceIdentifier,
};

pub const GET: &str = "GET";
pub const HEAD: &str = "HEAD";
pub const PUT: &str = "PUT";
pub const POST: &str = "POST";
pub const DELETE: &str = "DELETE";
pub const PATCH: &str = "PATCH";

/// A parsed request body.
#[derive(Debug)]
pub enum RequestBody {
    Representation(Representation),
    Patch(Patch),
}

/// A single LDP operation: method, target, preferences, and optional body.
#[derive(Debug)]
pub struct Operation {
    pub method: String,
    pub target: ResourceIdentifier,
    pub preferences: RepresentationPreferences,
    pub body: Option<RequestBody>,
}

impl Operation {
    pub fn new(method: impl Into<String>, target: ResourceIdentifier) -> Self {
        Self {
            method: method.into(),
            target,
            preferences: RepresentationPreferences::any(),
            body: None,
        }
    }

    pub fn with_preferences(mut self, preferences: RepresentationPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// The parts of the operation permission extraction looks at.
    pub fn summary(&self) -> OperationSummary {
        OperationSummary {
            method: self.method.clone(),
            target: self.target.clone(),
            patch: match &self.body {
                Some(RequestBody::Patch(patch)) => Some(patch.clone()),
                _ => None,
            },
        }
    }

    /// Fail unless the method is `method`.
    pub fn expect_method(&self, method: &str) -> LdpResult<()> {
        if self.method == method {
            Ok(())
        } else {
            Err(LdpError::UnsupportedOperation(format!(
                "this handler only supports {method} operations, got {}",
                self.method
            )))
        }
    }

    /// Take the body as a representation.
    pub fn into_representation(self) -> LdpResult<(ResourceIdentifier, Representation)> {
        match self.body {
            Some(RequestBody::Representation(representation)) => Ok((self.target, representation)),
            Some(RequestBody::Patch(_)) => Err(LdpError::UnsupportedOperation(format!(
                "{} requires a representation body, got a patch",
                self.method
            ))),
            None => Err(LdpError::UnsupportedOperation(format!(
                "{} operations require a body",
                self.method
            ))),
        }
    }

    /// Take the body as a patch.
    pub fn into_patch(self) -> LdpResult<(ResourceIdentifier, Patch)> {
        match self.body {
            Some(RequestBody::Patch(patch)) => Ok((self.target, patch)),
            _ => Err(LdpError::UnsupportedOperation(format!(
                "{} operations require a patch body",
                self.method
            ))),
        }
    }
}

/// Body-free view of an operation.
#[derive(Clone, Debug)]
pub struct OperationSummary {
    pub method: String,
    pub target: ResourceIdentifier,
    pub patch: Option<Patch>,
}

/// What an operation produced.
pub enum ResponseKind {
    /// A representation to send back.
    Representation(Representation),
    /// Metadata only, for `HEAD`.
    Metadata(RepresentationMetadata),
    /// A new resource was created at the response identifier.
    Created,
    /// The resource changed; nothing to send back.
    Reset,
}

/// Outcome of an operation, ready for the transport to write.
pub struct ResponseDescription {
    pub identifier: ResourceIdentifier,
    pub kind: ResponseKind,
}

impl ResponseDescription {
    pub fn representation(identifier: ResourceIdentifier, representation: Representation) -> Self {
        Self {
            identifier,
            kind: ResponseKind::Representation(representation),
        }
    }

    pub fn metadata(identifier: ResourceIdentifier, metadata: RepresentationMetadata) -> Self {
        Self {
            identifier,
            kind: ResponseKind::Metadata(metadata),
        }
    }

    pub fn created(identifier: ResourceIdentifier) -> Self {
        Self {
            identifier,
            kind: ResponseKind::Created,
        }
    }

    pub fn reset(identifier: ResourceIdentifier) -> Self {
        Self {
            identifier,
            kind: ResponseKind::Reset,
        }
    }
}

impl fmt::Debug for ResponseDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            ResponseKind::Representation(rep) => format!("Representation({:?})", rep.content_type()),
            ResponseKind::Metadata(meta) => format!("Metadata({:?})", meta.content_type),
            ResponseKind::Created => "Created".into(),
            ResponseKind::Reset => "Reset".into(),
        };
        f.debug_struct("ResponseDescription")
            .field("identifier", &self.identifier)
            .field("kind", &kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldp_graph::Update;

    fn target() -> ResourceIdentifier {
        ResourceIdentifier::parse("http://test.com/doc").unwrap()
    }

    #[test]
    fn summary_keeps_the_patch() {
        let op = Operation::new(PATCH, target())
            .with_body(RequestBody::Patch(Patch::sparql_update(Update::default())));
        let summary = op.summary();
        assert_eq!(summary.method, PATCH);
        assert!(summary.patch.is_some());
        assert!(Operation::new(GET, target()).summary().patch.is_none());
    }

    #[test]
    fn method_checks() {
        let op = Operation::new(GET, target());
        assert!(op.expect_method(GET).is_ok());
        assert!(matches!(
            op.expect_method(PUT),
            Err(LdpError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn body_accessors() {
        assert!(Operation::new(PUT, target()).into_representation().is_err());
        let op = Operation::new(PUT, target())
            .with_body(RequestBody::Representation(Representation::binary("text/turtle", "")));
        let (id, rep) = op.into_representation().unwrap();
        assert_eq!(id, target());
        assert_eq!(rep.content_type(), Some("text/turtle"));

        let op = Operation::new(PATCH, target())
            .with_body(RequestBody::Representation(Representation::binary("text/turtle", "")));
        assert!(op.into_patch().is_err());
    }
}
