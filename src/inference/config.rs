//! Configuration for data-type inference

use serde::{Deserialize, Serialize};

/// Configuration for data-type inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceConfig {
    /// Candidate date patterns (chrono `strftime` syntax), tried in order
    /// before any guessing
    pub date_patterns: Vec<String>,

    /// Guess a date pattern from the value's layout when no candidate matches
    pub guess_date_patterns: bool,

    /// Trim surrounding whitespace before numeric and date matching
    pub trim_values: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            date_patterns: Vec::new(),
            guess_date_patterns: true,
            trim_values: true,
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Append a candidate date pattern
    pub fn date_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.date_patterns.push(pattern.into());
        self
    }

    /// Replace the candidate date patterns
    pub fn date_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.date_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable date pattern guessing
    pub fn guess_date_patterns(mut self, guess: bool) -> Self {
        self.config.guess_date_patterns = guess;
        self
    }

    /// Enable or disable whitespace trimming
    pub fn trim_values(mut self, trim: bool) -> Self {
        self.config.trim_values = trim;
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}
