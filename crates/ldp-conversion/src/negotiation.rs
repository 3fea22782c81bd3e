use ldp_types::media;
use ldp_types::{LdpError, LdpResult, Preference, RepresentationPreferences};

/// Picks a concrete media type from weighted preferences.
pub struct PreferenceNegotiator;

impl PreferenceNegotiator {
    /// Best supported type for `preferences`.
    ///
    /// Preferences are tried in list order and zero-weight entries are
    /// skipped. The first preference matching any supported type wins; for
    /// that preference an exact match beats a wildcard match.
    pub fn match_type<'s>(
        preferences: &RepresentationPreferences,
        supported: &[&'s str],
    ) -> LdpResult<&'s str> {
        if preferences.types.is_empty() {
            return Err(LdpError::UnsupportedMediaType(
                "output type required for conversion".into(),
            ));
        }

        for preference in preferences.types.iter().filter(|p| p.is_acceptable()) {
            let wanted = media::essence(preference.value());
            let exact = supported.iter().find(|t| media::essence(t) == wanted);
            if let Some(found) = exact.or_else(|| {
                supported
                    .iter()
                    .find(|t| media::matches(preference.value(), t))
            }) {
                return Ok(*found);
            }
        }

        let requested: Vec<&str> = preferences.types.iter().map(Preference::value).collect();
        Err(LdpError::UnsupportedMediaType(format!(
            "can only produce {}; requested {}",
            supported.join(", "),
            requested.join(", ")
        )))
    }
}
