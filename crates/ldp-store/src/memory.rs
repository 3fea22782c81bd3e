use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use ldp_graph::{Quad, Term, RDF_TYPE};
use ldp_types::media;
use ldp_types::{
    LdpError, LdpResult, Representation, RepresentationMetadata,
    RepresentationPreferences, ResourceIdentifier,
};

use crate::traits::ResourceStore;

/// The LDP vocabulary namespace.
pub const LDP: &str = "http://www.w3.org/ns/ldp#";

#[derive(Clone, Debug)]
enum StoredData {
    Bytes(Bytes),
    Quads(Vec<Quad>),
}

#[derive(Clone, Debug)]
enum Entry {
    Container,
    Document {
        metadata: RepresentationMetadata,
        data: StoredData,
    },
}

/// In-memory resource store.
///
/// Intended for tests and single-process deployments. The root container
/// exists from the start; writing a document creates any missing ancestor
/// containers. Document bodies are buffered on write and replayed as a
/// stream on read. Containers are described by `ldp:contains` statements.
pub struct InMemoryResourceStore {
    root: ResourceIdentifier,
    canonical: Option<String>,
    entries: RwLock<BTreeMap<ResourceIdentifier, Entry>>,
}

impl InMemoryResourceStore {
    /// Create a store whose root container is `root`.
    pub fn new(root: ResourceIdentifier) -> LdpResult<Self> {
        if !root.is_container() {
            return Err(LdpError::UnsupportedOperation(format!(
                "store root must be a container: {root}"
            )));
        }
        let mut entries = BTreeMap::new();
        entries.insert(root.clone(), Entry::Container);
        Ok(Self {
            root,
            canonical: None,
            entries: RwLock::new(entries),
        })
    }

    /// Only accept representations of `content_type`.
    pub fn with_canonical_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.canonical = Some(media::essence(&content_type.into()));
        self
    }

    pub fn root(&self) -> &ResourceIdentifier {
        &self.root
    }

    /// Number of stored resources, including the root container.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    pub fn contains(&self, identifier: &ResourceIdentifier) -> bool {
        self.entries
            .read()
            .expect("lock poisoned")
            .contains_key(identifier)
    }

    fn check_within_root(&self, identifier: &ResourceIdentifier) -> LdpResult<()> {
        if identifier.is_within(&self.root) {
            Ok(())
        } else {
            Err(LdpError::NotFound(identifier.to_string()))
        }
    }

    /// Buffer an incoming representation, enforcing the canonical type.
    async fn buffer(&self, representation: Representation) -> LdpResult<Entry> {
        let declared = representation
            .metadata
            .media_type()
            .ok_or(LdpError::MissingContentType)?;
        if let Some(canonical) = &self.canonical {
            if &declared != canonical {
                return Err(LdpError::UnsupportedMediaType(format!(
                    "store only accepts {canonical}, got {declared}"
                )));
            }
        }

        let mut metadata = representation.metadata.clone();
        metadata.identifier = None;
        let data = if representation.is_binary() {
            StoredData::Bytes(representation.into_bytes().await?)
        } else {
            StoredData::Quads(representation.into_quads().await?)
        };
        Ok(Entry::Document { metadata, data })
    }

    /// The same path with the trailing slash toggled: `/a` for `/a/` and
    /// `/a/` for `/a`. A container and a document may not share a name.
    fn twin(identifier: &ResourceIdentifier) -> LdpResult<ResourceIdentifier> {
        match identifier.as_str().strip_suffix('/') {
            Some(document) => ResourceIdentifier::parse(document),
            None => ResourceIdentifier::parse(&format!("{identifier}/")),
        }
    }

    fn check_name_free(
        entries: &BTreeMap<ResourceIdentifier, Entry>,
        identifier: &ResourceIdentifier,
    ) -> LdpResult<()> {
        let twin = Self::twin(identifier)?;
        if &twin != identifier && entries.contains_key(&twin) {
            return Err(LdpError::UnsupportedOperation(format!(
                "{twin} already exists"
            )));
        }
        Ok(())
    }

    /// Create every missing ancestor container of `identifier`. Fails if an
    /// ancestor's name is taken by a document.
    fn ensure_ancestors(
        entries: &mut BTreeMap<ResourceIdentifier, Entry>,
        identifier: &ResourceIdentifier,
    ) -> LdpResult<()> {
        let mut ancestors = Vec::new();
        let mut current = identifier.parent();
        while let Some(container) = current {
            if !entries.contains_key(&container) {
                Self::check_name_free(entries, &container)?;
            }
            current = container.parent();
            ancestors.push(container);
        }
        for container in ancestors {
            entries.entry(container).or_insert(Entry::Container);
        }
        Ok(())
    }

    fn members<'a>(
        entries: &'a BTreeMap<ResourceIdentifier, Entry>,
        container: &'a ResourceIdentifier,
    ) -> impl Iterator<Item = &'a ResourceIdentifier> + 'a {
        entries
            .keys()
            .filter(move |id| *id != container && id.parent().as_ref() == Some(container))
    }

    fn describe_container(
        entries: &BTreeMap<ResourceIdentifier, Entry>,
        container: &ResourceIdentifier,
    ) -> Vec<Quad> {
        let subject = Term::named(container.as_str());
        let mut quads = vec![
            Quad::new(
                subject.clone(),
                Term::named(RDF_TYPE),
                Term::named(format!("{LDP}Container")),
            ),
            Quad::new(
                subject.clone(),
                Term::named(RDF_TYPE),
                Term::named(format!("{LDP}BasicContainer")),
            ),
        ];
        quads.extend(Self::members(entries, container).map(|member| {
            Quad::new(
                subject.clone(),
                Term::named(format!("{LDP}contains")),
                Term::named(member.as_str()),
            )
        }));
        quads
    }
}

#[async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn get_representation(
        &self,
        identifier: &ResourceIdentifier,
        _preferences: &RepresentationPreferences,
    ) -> LdpResult<Representation> {
        let entries = self.entries.read().expect("lock poisoned");
        let entry = entries
            .get(identifier)
            .ok_or_else(|| LdpError::NotFound(identifier.to_string()))?;

        let representation = match entry {
            Entry::Container => {
                let mut rep = Representation::quads(Self::describe_container(&entries, identifier));
                rep.metadata.identifier = Some(identifier.clone());
                rep
            }
            Entry::Document { metadata, data } => {
                let metadata = metadata.clone().with_identifier(identifier.clone());
                match data {
                    StoredData::Bytes(bytes) => {
                        let bytes = bytes.clone();
                        Representation::from_byte_stream(
                            metadata,
                            stream::once(async move { Ok(bytes) }).boxed(),
                        )
                    }
                    StoredData::Quads(quads) => Representation::from_quad_stream(
                        metadata,
                        stream::iter(quads.clone().into_iter().map(Ok)).boxed(),
                    ),
                }
            }
        };
        Ok(representation)
    }

    async fn add_resource(
        &self,
        container: &ResourceIdentifier,
        representation: Representation,
    ) -> LdpResult<ResourceIdentifier> {
        self.check_within_root(container)?;
        match self.entries.read().expect("lock poisoned").get(container) {
            Some(Entry::Container) => {}
            Some(Entry::Document { .. }) => {
                return Err(LdpError::UnsupportedOperation(format!(
                    "{container} is not a container"
                )))
            }
            None => return Err(LdpError::NotFound(container.to_string())),
        }

        let slug = representation.metadata.slug.clone();
        let entry = self.buffer(representation).await?;

        let mut entries = self.entries.write().expect("lock poisoned");
        let identifier = match slug.as_deref().map(|s| container.child(s, false)) {
            Some(Ok(candidate))
                if !entries.contains_key(&candidate)
                    && Self::check_name_free(&entries, &candidate).is_ok() =>
            {
                candidate
            }
            _ => container.child(&uuid::Uuid::now_v7().to_string(), false)?,
        };
        Self::ensure_ancestors(&mut entries, &identifier)?;
        entries.insert(identifier.clone(), entry);
        tracing::debug!(%identifier, "added resource");
        Ok(identifier)
    }

    async fn set_representation(
        &self,
        identifier: &ResourceIdentifier,
        representation: Representation,
    ) -> LdpResult<()> {
        self.check_within_root(identifier)?;

        if identifier.is_container() {
            let mut entries = self.entries.write().expect("lock poisoned");
            if entries.contains_key(identifier) {
                return Err(LdpError::UnsupportedOperation(format!(
                    "container {identifier} already exists"
                )));
            }
            Self::check_name_free(&entries, identifier)?;
            Self::ensure_ancestors(&mut entries, identifier)?;
            entries.insert(identifier.clone(), Entry::Container);
            tracing::debug!(%identifier, "created container");
            return Ok(());
        }

        let entry = self.buffer(representation).await?;
        let mut entries = self.entries.write().expect("lock poisoned");
        Self::check_name_free(&entries, identifier)?;
        Self::ensure_ancestors(&mut entries, identifier)?;
        entries.insert(identifier.clone(), entry);
        tracing::debug!(%identifier, "stored representation");
        Ok(())
    }

    async fn delete_resource(&self, identifier: &ResourceIdentifier) -> LdpResult<()> {
        if identifier == &self.root {
            return Err(LdpError::UnsupportedOperation(
                "cannot delete the root container".into(),
            ));
        }
        let mut entries = self.entries.write().expect("lock poisoned");
        match entries.get(identifier) {
            None => return Err(LdpError::NotFound(identifier.to_string())),
            Some(Entry::Container) if Self::members(&entries, identifier).next().is_some() => {
                return Err(LdpError::UnsupportedOperation(format!(
                    "container {identifier} is not empty"
                )))
            }
            Some(_) => {}
        }
        entries.remove(identifier);
        tracing::debug!(%identifier, "deleted resource");
        Ok(())
    }

    fn canonical_content_type(&self) -> Option<&str> {
        self.canonical.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ldp_types::media::{INTERNAL_QUADS, TEXT_TURTLE};

    fn id(path: &str) -> ResourceIdentifier {
        ResourceIdentifier::parse(&format!("http://test.com{path}")).unwrap()
    }

    fn store() -> InMemoryResourceStore {
        InMemoryResourceStore::new(id("/")).unwrap()
    }

    fn any() -> RepresentationPreferences {
        RepresentationPreferences::any()
    }

    #[tokio::test]
    async fn root_exists_from_the_start() {
        let store = store();
        assert_eq!(store.len(), 1);
        let root = store.get_representation(&id("/"), &any()).await.unwrap();
        assert_eq!(root.content_type(), Some(INTERNAL_QUADS));
        assert_eq!(root.into_quads().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn set_then_get() {
        let store = store();
        store
            .set_representation(&id("/foo/bar"), Representation::binary(TEXT_TURTLE, "data"))
            .await
            .unwrap();
        let rep = store.get_representation(&id("/foo/bar"), &any()).await.unwrap();
        assert_eq!(rep.metadata.identifier, Some(id("/foo/bar")));
        assert_eq!(rep.content_type(), Some(TEXT_TURTLE));
        assert_eq!(rep.into_bytes().await.unwrap(), Bytes::from("data"));
        assert!(store.contains(&id("/foo/")), "ancestor container created");
    }

    #[tokio::test]
    async fn unknown_resources_are_not_found() {
        let store = store();
        assert!(matches!(
            store.get_representation(&id("/nope"), &any()).await,
            Err(LdpError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_resource(&id("/nope")).await,
            Err(LdpError::NotFound(_))
        ));
        let other = ResourceIdentifier::parse("http://elsewhere.com/x").unwrap();
        assert!(matches!(
            store
                .set_representation(&other, Representation::binary(TEXT_TURTLE, ""))
                .await,
            Err(LdpError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn add_resource_uses_the_slug() {
        let store = store();
        let mut rep = Representation::binary(TEXT_TURTLE, "a");
        rep.metadata.slug = Some("note".into());
        let created = store.add_resource(&id("/"), rep).await.unwrap();
        assert_eq!(created, id("/note"));

        let mut again = Representation::binary(TEXT_TURTLE, "b");
        again.metadata.slug = Some("note".into());
        let second = store.add_resource(&id("/"), again).await.unwrap();
        assert_ne!(second, created);
        assert_eq!(second.parent(), Some(id("/")));
    }

    #[tokio::test]
    async fn add_resource_requires_a_container() {
        let store = store();
        assert!(matches!(
            store
                .add_resource(&id("/missing/"), Representation::binary(TEXT_TURTLE, ""))
                .await,
            Err(LdpError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn containers_list_their_members() {
        let store = store();
        store
            .set_representation(&id("/a/b"), Representation::binary(TEXT_TURTLE, ""))
            .await
            .unwrap();
        let quads = store
            .get_representation(&id("/"), &any())
            .await
            .unwrap()
            .into_quads()
            .await
            .unwrap();
        let contains = Term::named(format!("{LDP}contains"));
        let members: Vec<&Term> = quads
            .iter()
            .filter(|q| q.predicate == contains)
            .map(|q| &q.object)
            .collect();
        assert_eq!(members, vec![&Term::named("http://test.com/a/")]);
    }

    #[tokio::test]
    async fn delete_rules() {
        let store = store();
        store
            .set_representation(&id("/a/b"), Representation::binary(TEXT_TURTLE, ""))
            .await
            .unwrap();
        assert!(matches!(
            store.delete_resource(&id("/")).await,
            Err(LdpError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            store.delete_resource(&id("/a/")).await,
            Err(LdpError::UnsupportedOperation(_))
        ));
        store.delete_resource(&id("/a/b")).await.unwrap();
        store.delete_resource(&id("/a/")).await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn canonical_type_is_enforced() {
        let store = store().with_canonical_content_type("text/turtle; charset=utf-8");
        assert_eq!(store.canonical_content_type(), Some(TEXT_TURTLE));
        let err = store
            .set_representation(&id("/x"), Representation::quads(vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, LdpError::UnsupportedMediaType(_)));
        assert!(!store.contains(&id("/x")));
    }

    #[tokio::test]
    async fn quads_are_stored_as_quads() {
        let store = store();
        let quad = Quad::new(Term::named("http://a/s"), Term::named("http://a/p"), Term::literal("o"));
        store
            .set_representation(&id("/q"), Representation::quads(vec![quad.clone()]))
            .await
            .unwrap();
        let rep = store.get_representation(&id("/q"), &any()).await.unwrap();
        assert_eq!(rep.into_quads().await.unwrap(), vec![quad]);
    }

    #[tokio::test]
    async fn documents_cannot_have_members() {
        let store = store();
        store
            .set_representation(&id("/doc"), Representation::binary(TEXT_TURTLE, ""))
            .await
            .unwrap();
        assert!(matches!(
            store
                .set_representation(&id("/doc/child"), Representation::binary(TEXT_TURTLE, ""))
                .await,
            Err(LdpError::UnsupportedOperation(_))
        ));
    }

    #[tokio::test]
    async fn containers_are_created_once() {
        let store = store();
        store
            .set_representation(&id("/c/"), Representation::binary(TEXT_TURTLE, ""))
            .await
            .unwrap();
        assert!(store.contains(&id("/c/")));
        assert!(store
            .set_representation(&id("/c/"), Representation::binary(TEXT_TURTLE, ""))
            .await
            .is_err());
    }
}
