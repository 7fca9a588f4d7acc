//! Startup configuration: the two secret API keys the remote services
//! require. Missing keys fail fast with a clear message instead of letting
//! the app proceed to make doomed requests.

use crate::{MapError, Result};

pub const GEOCODER_KEY_VAR: &str = "MAPVIEW_GEOCODER_KEY";
pub const SEARCH_KEY_VAR: &str = "MAPVIEW_SEARCH_KEY";

/// API keys for the geocoder and business-search services. The static-map
/// renderer needs no key.
#[derive(Debug, Clone)]
pub struct ApiKeys {
    pub geocoder: String,
    pub search: String,
}

impl ApiKeys {
    /// Reads both keys from the process environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            geocoder: read_key(GEOCODER_KEY_VAR)?,
            search: read_key(SEARCH_KEY_VAR)?,
        })
    }

    pub fn new(geocoder: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            geocoder: geocoder.into(),
            search: search.into(),
        }
    }
}

fn read_key(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(MapError::Config(format!(
            "missing API key: set the {var} environment variable"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_names_the_variable() {
        // Env-var-free path: read a variable that cannot exist.
        let err = read_key("MAPVIEW_TEST_KEY_THAT_IS_NEVER_SET").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("MAPVIEW_TEST_KEY_THAT_IS_NEVER_SET"));
        assert!(matches!(err, MapError::Config(_)));
    }

    #[test]
    fn test_explicit_keys() {
        let keys = ApiKeys::new("geo-key", "search-key");
        assert_eq!(keys.geocoder, "geo-key");
        assert_eq!(keys.search, "search-key");
    }
}
