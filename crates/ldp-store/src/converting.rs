use std::sync::Arc;

use async_trait::async_trait;
use ldp_conversion::{ConversionArgs, SharedConverter};
use ldp_types::{
    AsyncHandler, LdpResult, Patch, Representation, RepresentationPreferences, ResourceIdentifier,
};

use crate::traits::ResourceStore;

/// Store decorator that converts representations on the way in and out.
///
/// Reads are converted to the caller's preferences. Writes are converted to
/// the wrapped store's canonical content type when it has one, so a failed
/// conversion never reaches the wrapped store.
pub struct ConvertingStore {
    source: Arc<dyn ResourceStore>,
    converter: SharedConverter,
}

impl ConvertingStore {
    pub fn new(source: Arc<dyn ResourceStore>, converter: SharedConverter) -> Self {
        Self { source, converter }
    }

    async fn to_canonical(&self, representation: Representation) -> LdpResult<Representation> {
        match self.source.canonical_content_type() {
            Some(canonical) => {
                let preferences = RepresentationPreferences::media_type(canonical);
                self.converter
                    .handle_safe(ConversionArgs::new(representation, preferences))
                    .await
            }
            None => Ok(representation),
        }
    }
}

#[async_trait]
impl ResourceStore for ConvertingStore {
    async fn get_representation(
        &self,
        identifier: &ResourceIdentifier,
        preferences: &RepresentationPreferences,
    ) -> LdpResult<Representation> {
        let representation = self.source.get_representation(identifier, preferences).await?;
        self.converter
            .handle_safe(ConversionArgs::new(representation, preferences.clone()))
            .await
    }

    async fn add_resource(
        &self,
        container: &ResourceIdentifier,
        representation: Representation,
    ) -> LdpResult<ResourceIdentifier> {
        let representation = self.to_canonical(representation).await?;
        self.source.add_resource(container, representation).await
    }

    async fn set_representation(
        &self,
        identifier: &ResourceIdentifier,
        representation: Representation,
    ) -> LdpResult<()> {
        let representation = self.to_canonical(representation).await?;
        self.source.set_representation(identifier, representation).await
    }

    async fn delete_resource(&self, identifier: &ResourceIdentifier) -> LdpResult<()> {
        self.source.delete_resource(identifier).await
    }

    async fn modify_resource(&self, identifier: &ResourceIdentifier, patch: Patch) -> LdpResult<()> {
        self.source.modify_resource(identifier, patch).await
    }

    fn canonical_content_type(&self) -> Option<&str> {
        self.source.canonical_content_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryResourceStore;
    use ldp_conversion::TurtleQuadConverter;
    use ldp_graph::{Quad, Term};
    use ldp_types::media::{INTERNAL_QUADS, TEXT_TURTLE};
    use ldp_types::LdpError;

    fn id(path: &str) -> ResourceIdentifier {
        ResourceIdentifier::parse(&format!("http://test.com{path}")).unwrap()
    }

    fn setup(canonical: bool) -> (Arc<InMemoryResourceStore>, ConvertingStore) {
        let mut base = InMemoryResourceStore::new(id("/")).unwrap();
        if canonical {
            base = base.with_canonical_content_type(TEXT_TURTLE);
        }
        let base = Arc::new(base);
        let store = ConvertingStore::new(base.clone(), Arc::new(TurtleQuadConverter));
        (base, store)
    }

    fn spo() -> Quad {
        Quad::new(
            Term::named("http://test.com/s"),
            Term::named("http://test.com/p"),
            Term::named("http://test.com/o"),
        )
    }

    #[tokio::test]
    async fn writes_are_converted_to_the_canonical_type() {
        let (base, store) = setup(true);
        store
            .set_representation(&id("/doc"), Representation::quads(vec![spo()]))
            .await
            .unwrap();
        let raw = base
            .get_representation(&id("/doc"), &RepresentationPreferences::any())
            .await
            .unwrap();
        assert_eq!(raw.content_type(), Some(TEXT_TURTLE));
    }

    #[tokio::test]
    async fn reads_are_converted_to_preferences() {
        let (_, store) = setup(true);
        store
            .set_representation(
                &id("/doc"),
                Representation::binary(TEXT_TURTLE, "<http://test.com/s> <http://test.com/p> <http://test.com/o>."),
            )
            .await
            .unwrap();
        let rep = store
            .get_representation(&id("/doc"), &RepresentationPreferences::media_type(INTERNAL_QUADS))
            .await
            .unwrap();
        assert_eq!(rep.into_quads().await.unwrap(), vec![spo()]);
    }

    #[tokio::test]
    async fn failed_conversion_writes_nothing() {
        let (base, store) = setup(true);
        let err = store
            .set_representation(&id("/doc"), Representation::binary("image/png", vec![0u8, 1, 2]))
            .await
            .unwrap_err();
        assert!(err.is_unsupported());
        assert!(!base.contains(&id("/doc")));
    }

    #[tokio::test]
    async fn without_canonical_type_writes_pass_through() {
        let (base, store) = setup(false);
        store
            .set_representation(&id("/png"), Representation::binary("image/png", vec![0u8, 1, 2]))
            .await
            .unwrap();
        assert!(base.contains(&id("/png")));
    }

    #[tokio::test]
    async fn errors_from_the_source_propagate() {
        let (_, store) = setup(true);
        assert!(matches!(
            store
                .get_representation(&id("/missing"), &RepresentationPreferences::any())
                .await,
            Err(LdpError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_resource(&id("/missing")).await,
            Err(LdpError::NotFound(_))
        ));
        assert!(matches!(
            store
                .modify_resource(&id("/missing"), Patch::sparql_update(Default::default()))
                .await,
            Err(LdpError::UnsupportedOperation(_))
        ));
    }

    #[tokio::test]
    async fn exposes_the_source_canonical_type() {
        let (_, store) = setup(true);
        assert_eq!(store.canonical_content_type(), Some(TEXT_TURTLE));
    }
}
