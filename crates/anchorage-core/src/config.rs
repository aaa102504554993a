//! Library-wide style configuration and the class service built on it.

use crate::merge::{self, ClassList};
use serde::Deserialize;
use std::time::Duration;

/// Errors produced while loading a [`StyleConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration text was not valid JSON for a `StyleConfig`.
    #[error("invalid style config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Classes for each named color variant.
///
/// Unset variants resolve to an empty class string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub success: Option<String>,
    pub warning: Option<String>,
    pub danger: Option<String>,
    pub info: Option<String>,
    pub neutral: Option<String>,
}

impl ThemeConfig {
    /// The built-in palette.
    pub fn tailwind() -> Self {
        let some = |s: &str| Some(s.to_string());
        Self {
            primary: some("bg-blue-600 hover:bg-blue-700 text-white"),
            secondary: some("bg-slate-600 hover:bg-slate-700 text-white"),
            success: some("bg-emerald-600 hover:bg-emerald-700 text-white"),
            warning: some("bg-amber-500 hover:bg-amber-600 text-white"),
            danger: some("bg-rose-600 hover:bg-rose-700 text-white"),
            info: some("bg-cyan-600 hover:bg-cyan-700 text-white"),
            neutral: some("bg-slate-200 hover:bg-slate-300 text-slate-900"),
        }
    }

    /// Look up a variant by name.
    pub fn get(&self, variant: &str) -> Option<&str> {
        let classes = match variant {
            "primary" => &self.primary,
            "secondary" => &self.secondary,
            "success" => &self.success,
            "warning" => &self.warning,
            "danger" => &self.danger,
            "info" => &self.info,
            "neutral" => &self.neutral,
            _ => return None,
        };
        classes.as_deref()
    }
}

/// Configuration shared by every component.
///
/// Fields missing from a loaded configuration keep their defaults; a `theme`
/// that is present replaces the default palette as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Prefix for component-specific class names.
    pub prefix: String,
    /// Enter/exit animation length in milliseconds.
    pub animation_duration_ms: u64,
    /// Color variant classes.
    pub theme: ThemeConfig,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            prefix: "tw".to_string(),
            animation_duration_ms: 200,
            theme: ThemeConfig::tailwind(),
        }
    }
}

impl StyleConfig {
    /// Parse a JSON configuration, filling in defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }
}

/// Class composition bound to a [`StyleConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClassService {
    config: StyleConfig,
}

impl ClassService {
    pub fn new(config: StyleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// See [`merge::merge`].
    pub fn merge<'a, I, S>(&self, classes: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: Into<Option<&'a str>>,
    {
        merge::merge(classes)
    }

    /// Merge into the structured form.
    pub fn merge_list<'a, I, S>(&self, classes: I) -> ClassList
    where
        I: IntoIterator<Item = S>,
        S: Into<Option<&'a str>>,
    {
        classes.into_iter().filter_map(Into::into).collect()
    }

    /// See [`merge::conditional`].
    pub fn conditional(&self, base: &str, conditionals: &[(&str, bool)]) -> String {
        merge::conditional(base, conditionals)
    }

    /// See [`merge::join`].
    pub fn join<'a, I, S>(&self, classes: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: Into<Option<&'a str>>,
    {
        merge::join(classes)
    }

    /// Classes for a named color variant; unknown or unset variants are empty.
    pub fn variant_classes(&self, variant: &str) -> &str {
        self.config.theme.get(variant).unwrap_or("")
    }
}
