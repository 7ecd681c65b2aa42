use std::fmt;

use serde::{Deserialize, Serialize};

/// Language + optional region, e.g. `pl`, `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into().to_lowercase(),
            region: None,
        }
    }

    pub fn with_region(language: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            language: language.into().to_lowercase(),
            region: Some(region.into().to_uppercase()),
        }
    }

    /// Parse POSIX (`en_US.UTF-8`) or BCP 47 style (`en-US`) tags.
    pub fn parse(tag: &str) -> Option<Self> {
        // Strip encoding and modifier suffixes
        let tag = tag.split(['.', '@']).next()?.trim();
        if tag.is_empty() || tag.eq_ignore_ascii_case("C") || tag.eq_ignore_ascii_case("POSIX") {
            return None;
        }

        let mut parts = tag.split(['-', '_']);
        let language = parts.next()?;
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }

        match parts.next().filter(|r| !r.is_empty()) {
            Some(region) => Some(Self::with_region(language, region)),
            None => Some(Self::new(language)),
        }
    }

    /// ISO 639 language code, always lowercase
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}
