use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages offered to the user, identified by BCP 47 locale tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "hi-IN")]
    Hindi,
    #[serde(rename = "te-IN")]
    Telugu,
    #[serde(rename = "mr-IN")]
    Marathi,
    #[serde(rename = "kn-IN")]
    Kannada,
    #[serde(rename = "en-IN")]
    English,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Hindi,
        Language::Telugu,
        Language::Marathi,
        Language::Kannada,
        Language::English,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Language::Hindi => "hi-IN",
            Language::Telugu => "te-IN",
            Language::Marathi => "mr-IN",
            Language::Kannada => "kn-IN",
            Language::English => "en-IN",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::Hindi => "Hindi",
            Language::Telugu => "Telugu",
            Language::Marathi => "Marathi",
            Language::Kannada => "Kannada",
            Language::English => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported language '{0}', expected one of hi-IN, te-IN, mr-IN, kn-IN, en-IN")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    /// Accepts tags case-insensitively, with `-` or `_` as separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', "-").to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.tag().to_lowercase() == normalized)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hindi_is_default() {
        assert_eq!(Language::default(), Language::Hindi);
        assert_eq!(Language::default().tag(), "hi-IN");
    }

    #[test]
    fn parses_tags_loosely() {
        assert_eq!("te-IN".parse::<Language>().unwrap(), Language::Telugu);
        assert_eq!("KN_in".parse::<Language>().unwrap(), Language::Kannada);
        assert_eq!(" en-in ".parse::<Language>().unwrap(), Language::English);
    }

    #[test]
    fn rejects_unknown_tags() {
        assert_eq!(
            "ta-IN".parse::<Language>(),
            Err(UnknownLanguage("ta-IN".to_string()))
        );
    }

    #[test]
    fn serializes_as_tag() {
        assert_eq!(
            serde_json::to_string(&Language::Marathi).unwrap(),
            "\"mr-IN\""
        );
        for lang in Language::ALL {
            assert_eq!(lang.to_string(), lang.tag());
        }
    }
}
