//! Parser configuration types
//!
//! This module defines the options that control how introspection documents
//! are turned into descriptions. Bus access and presentation are handled by
//! the application layer.

use serde::{Deserialize, Serialize};

/// Configuration for the introspection parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Preferred language for `<description>` elements (None = first one found)
    #[serde(default)]
    pub language: Option<String>,

    /// Drop members that carry no human-readable description
    #[serde(default)]
    pub require_descriptions: bool,

    /// Reject unrecognised attribute values instead of logging a warning
    #[serde(default = "default_true")]
    pub strict: bool,

    /// Collect `<node>` children as paths to introspect next
    #[serde(default = "default_true")]
    pub follow_child_nodes: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            language: None,
            require_descriptions: false,
            strict: true,
            follow_child_nodes: true,
        }
    }
}

impl ParserConfig {
    /// Create a new parser configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the preferred description language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Builder method: only keep members that have a description
    pub fn with_required_descriptions(mut self, required: bool) -> Self {
        self.require_descriptions = required;
        self
    }

    /// Builder method: enable or disable strict attribute checking
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Builder method: enable or disable child node collection
    pub fn with_child_nodes(mut self, follow: bool) -> Self {
        self.follow_child_nodes = follow;
        self
    }

    /// Check if a `<description>` in `language` matches the preference
    pub fn prefers_language(&self, language: Option<&str>) -> bool {
        match (&self.language, language) {
            (Some(wanted), Some(found)) => wanted.eq_ignore_ascii_case(found),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_config_builder() {
        let config = ParserConfig::new()
            .with_language("de")
            .with_required_descriptions(true)
            .with_strict(false)
            .with_child_nodes(false);

        assert_eq!(config.language.as_deref(), Some("de"));
        assert!(config.require_descriptions);
        assert!(!config.strict);
        assert!(!config.follow_child_nodes);
    }

    #[test]
    fn test_defaults() {
        let config = ParserConfig::new();
        assert!(config.language.is_none());
        assert!(!config.require_descriptions);
        assert!(config.strict);
        assert!(config.follow_child_nodes);
    }

    #[test]
    fn test_language_preference() {
        let config = ParserConfig::new().with_language("en");
        assert!(config.prefers_language(Some("EN")));
        assert!(!config.prefers_language(Some("fr")));
        assert!(!config.prefers_language(None));

        let no_pref = ParserConfig::new();
        assert!(!no_pref.prefers_language(Some("en")));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ParserConfig = serde_json::from_str(r#"{"language": "en"}"#).unwrap();
        assert_eq!(config.language.as_deref(), Some("en"));
        assert!(config.strict);
        assert!(config.follow_child_nodes);
        assert!(!config.require_descriptions);
    }
}
