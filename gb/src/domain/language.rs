//! Output language for generated plans

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Language the natural-language fields of a plan are rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    #[default]
    En,
    /// Amharic
    Am,
}

impl Language {
    /// Normalize a free-form language tag
    ///
    /// Anything that case-insensitively starts with "am" is Amharic; everything
    /// else, including empty input, is English.
    pub fn normalize(raw: &str) -> Self {
        debug!(%raw, "Language::normalize: called");
        if raw.trim().to_lowercase().starts_with("am") {
            debug!("Language::normalize: matched Amharic");
            Self::Am
        } else {
            debug!("Language::normalize: defaulting to English");
            Self::En
        }
    }

    /// Short tag ("en" or "am")
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Am => "am",
        }
    }
}

impl From<&str> for Language {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
