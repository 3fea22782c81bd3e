use serde::{Deserialize, Serialize};

use crate::error::{LdpError, LdpResult};

/// One weighted preference, such as an `Accept` entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    value: String,
    weight: f32,
}

impl Preference {
    /// Create a preference. The weight must lie in `[0, 1]`.
    pub fn new(value: impl Into<String>, weight: f32) -> LdpResult<Self> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(LdpError::UnsupportedOperation(format!(
                "preference weight must be between 0 and 1, got {weight}"
            )));
        }
        Ok(Self {
            value: value.into(),
            weight,
        })
    }

    /// A preference with full weight.
    pub fn preferred(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            weight: 1.0,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// A zero weight means "not acceptable".
    pub fn is_acceptable(&self) -> bool {
        self.weight > 0.0
    }
}

/// Preferences describing the representation a caller wants back.
///
/// Entries are evaluated in list order; earlier entries win.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RepresentationPreferences {
    pub types: Vec<Preference>,
}

impl RepresentationPreferences {
    pub fn new(types: Vec<Preference>) -> Self {
        Self { types }
    }

    /// Ask for exactly one media type.
    pub fn media_type(value: impl Into<String>) -> Self {
        Self::new(vec![Preference::preferred(value)])
    }

    /// Accept any media type.
    pub fn any() -> Self {
        Self::media_type("*/*")
    }

    /// Parse an `Accept` header value. Entries with an invalid `q` are
    /// dropped; entries are ordered by descending weight, keeping header
    /// order among equal weights.
    ///
    /// Negotiation tries preferences in list order, so for a parsed header
    /// the header order only breaks ties between entries of equal weight.
    /// A higher-weighted entry wins even when it comes later in the header.
    pub fn from_accept_header(header: &str) -> Self {
        let mut types: Vec<Preference> = header
            .split(',')
            .filter_map(|entry| {
                let mut parts = entry.split(';');
                let value = parts.next()?.trim();
                if value.is_empty() {
                    return None;
                }
                let mut weight = 1.0;
                for param in parts {
                    if let Some((key, raw)) = param.split_once('=') {
                        if key.trim().eq_ignore_ascii_case("q") {
                            weight = raw.trim().parse::<f32>().ok()?;
                        }
                    }
                }
                Preference::new(value, weight).ok()
            })
            .collect();
        types.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        Self { types }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_are_validated() {
        assert!(Preference::new("text/turtle", 0.0).is_ok());
        assert!(Preference::new("text/turtle", 1.0).is_ok());
        assert!(Preference::new("text/turtle", 1.5).is_err());
        assert!(Preference::new("text/turtle", -0.1).is_err());
        assert!(Preference::new("text/turtle", f32::NAN).is_err());
        assert!(!Preference::new("text/turtle", 0.0).unwrap().is_acceptable());
    }

    #[test]
    fn accept_header_is_ordered_by_weight() {
        let prefs = RepresentationPreferences::from_accept_header(
            "text/html;q=0.2, text/turtle, application/ld+json;q=0.8, */*;q=bogus",
        );
        let values: Vec<&str> = prefs.types.iter().map(Preference::value).collect();
        assert_eq!(values, vec!["text/turtle", "application/ld+json", "text/html"]);
        assert_eq!(prefs.types[2].weight(), 0.2);
    }

    #[test]
    fn equal_weights_keep_header_order() {
        let prefs = RepresentationPreferences::from_accept_header("b/b, a/a");
        assert_eq!(prefs.types[0].value(), "b/b");
        assert_eq!(prefs.types[1].value(), "a/a");
    }
}
