//! Language and internationalization types

use serde::{Deserialize, Serialize};

/// Language used for API messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

impl Language {
    /// Extract language from Accept-Language header
    ///
    /// The first listed language wins; anything that is not Arabic falls back
    /// to English.
    pub fn from_accept_language(header: &str) -> Self {
        let first = header
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if first.starts_with("ar") {
            Language::Arabic
        } else {
            Language::English
        }
    }

    /// Get language code (ISO 639-1)
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Arabic => "ar",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_header() {
        assert_eq!(Language::from_accept_language("en-US,en;q=0.9"), Language::English);
        assert_eq!(Language::from_accept_language("ar-IL,ar;q=0.9"), Language::Arabic);
        assert_eq!(Language::from_accept_language("he-IL"), Language::English);
        assert_eq!(Language::from_accept_language("AR"), Language::Arabic);
        assert_eq!(Language::from_accept_language(""), Language::English);
    }

    #[test]
    fn test_language_properties() {
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::Arabic.code(), "ar");
    }
}
