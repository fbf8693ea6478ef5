//! Null value handling for data loading

use serde::{Deserialize, Serialize};

/// Tokens read as missing values unless configured otherwise
const DEFAULT_NULL_TOKENS: &[&str] = &[
    "",
    "#N/A",
    "#N/A N/A",
    "#NA",
    "-1.#IND",
    "-1.#QNAN",
    "-NaN",
    "-nan",
    "1.#IND",
    "1.#QNAN",
    "<NA>",
    "N/A",
    "NA",
    "NULL",
    "NaN",
    "None",
    "n/a",
    "nan",
    "null",
];

/// Null value configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NullConfig {
    /// Patterns to treat as null
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_NULL_TOKENS.iter().map(|t| t.to_string()).collect(),
            trim_whitespace: true,
            case_sensitive: true,
        }
    }
}

impl NullConfig {
    /// Check if a value should be treated as null
    pub fn is_null(&self, value: &str) -> bool {
        let test_value = if self.trim_whitespace {
            value.trim()
        } else {
            value
        };

        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                test_value == pattern
            } else {
                test_value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// Add a null pattern
    pub fn add_pattern(&mut self, pattern: String) {
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tokens() {
        let config = NullConfig::default();
        assert!(config.is_null(""));
        assert!(config.is_null("  "));
        assert!(config.is_null("NaN"));
        assert!(config.is_null(" N/A "));
        assert!(!config.is_null("Nan"));
        assert!(!config.is_null("0"));
    }

    #[test]
    fn test_case_insensitive_patterns() {
        let mut config = NullConfig::default();
        config.case_sensitive = false;
        config.add_pattern("missing".to_string());
        config.add_pattern("missing".to_string());

        assert!(config.is_null("MISSING"));
        assert!(config.is_null("Nan"));
        assert_eq!(config.patterns.iter().filter(|p| *p == "missing").count(), 1);
    }
}
