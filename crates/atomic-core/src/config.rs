//! Configuration schema.
//!
//! The configuration selects which members of each definition family end up
//! in the build. It is validated once, when loaded (see [`crate::load`]);
//! the engine then reads it without further shape checks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{ConfigGroup, PatternRule};

/// The reserved top-level key holding [`Settings`].
pub const SETTINGS_KEY: &str = "config";

/// Global settings under the reserved `config` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Selector wrapping the entire build.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Replacement for `__START__` in emitted CSS.
    #[serde(default)]
    pub start: Option<String>,
    /// Replacement for `__END__` in emitted CSS.
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
}

impl Settings {
    pub fn start(&self) -> &str {
        self.start.as_deref().unwrap_or("left")
    }

    pub fn end(&self) -> &str {
        self.end.as_deref().unwrap_or("right")
    }
}

/// What the configuration says about one definition id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEntry {
    /// Whole-definition gate (`rule` kind).
    Toggle(bool),
    /// Per-suffix gates, plus optional custom entries (`pattern` kind).
    Suffixes {
        enabled: BTreeMap<String, bool>,
        custom: Option<Vec<PatternRule>>,
    },
    /// Value-override groups (`custom-pattern` kind).
    Groups(Vec<ConfigGroup>),
}

impl ConfigEntry {
    /// Whether the whole definition is switched on.
    pub fn is_on(&self) -> bool {
        matches!(self, ConfigEntry::Toggle(true))
    }

    /// Whether `suffix` is switched on. Only suffix maps enable anything.
    pub fn suffix_on(&self, suffix: &str) -> bool {
        match self {
            ConfigEntry::Suffixes { enabled, .. } => enabled.get(suffix).copied().unwrap_or(false),
            _ => false,
        }
    }

    pub fn custom(&self) -> Option<&[PatternRule]> {
        match self {
            ConfigEntry::Suffixes { custom, .. } => custom.as_deref(),
            _ => None,
        }
    }

    pub fn groups(&self) -> &[ConfigGroup] {
        match self {
            ConfigEntry::Groups(groups) => groups,
            _ => &[],
        }
    }
}

/// A loaded configuration object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub entries: BTreeMap<String, ConfigEntry>,
    pub settings: Option<Settings>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, mostly for tests and embedders.
    pub fn with_entry(mut self, id: impl Into<String>, entry: ConfigEntry) -> Self {
        self.entries.insert(id.into(), entry);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn entry(&self, id: &str) -> Option<&ConfigEntry> {
        self.entries.get(id)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.settings.as_ref()?.namespace.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.settings.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn suffixes(pairs: &[(&str, bool)]) -> ConfigEntry {
        ConfigEntry::Suffixes {
            enabled: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            custom: None,
        }
    }

    #[test]
    fn test_toggle_gate() {
        assert!(ConfigEntry::Toggle(true).is_on());
        assert!(!ConfigEntry::Toggle(false).is_on());
        assert!(!suffixes(&[("b", true)]).is_on());
    }

    #[test]
    fn test_suffix_gate() {
        let entry = suffixes(&[("b", true), ("n", false)]);
        assert!(entry.suffix_on("b"));
        assert!(!entry.suffix_on("n"));
        assert!(!entry.suffix_on("missing"));
        assert!(!ConfigEntry::Toggle(true).suffix_on("b"));
    }

    #[test]
    fn test_groups_default_empty() {
        assert!(ConfigEntry::Toggle(true).groups().is_empty());
        assert!(suffixes(&[]).custom().is_none());
    }

    #[test]
    fn test_namespace() {
        let config = Config::new().with_settings(Settings {
            namespace: Some("#atomic".into()),
            ..Settings::default()
        });
        assert_eq!(config.namespace(), Some("#atomic"));
        assert_eq!(Config::new().namespace(), None);
    }

    #[test]
    fn test_settings_direction_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.start(), "left");
        assert_eq!(settings.end(), "right");

        let rtl = Settings {
            start: Some("right".into()),
            end: Some("left".into()),
            ..Settings::default()
        };
        assert_eq!(rtl.start(), "right");
        assert_eq!(rtl.end(), "left");
    }

    #[test]
    fn test_settings_ignore_unknown_keys() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "namespace": "#atomic",
            "breakPoints": {"sm": "@media (min-width: 700px)"}
        }))
        .unwrap();
        assert_eq!(settings.namespace.as_deref(), Some("#atomic"));
    }

    #[test]
    fn test_is_empty() {
        assert!(Config::new().is_empty());
        assert!(!Config::new()
            .with_entry("foo", ConfigEntry::Toggle(false))
            .is_empty());
        assert!(!Config::new().with_settings(Settings::default()).is_empty());
    }
}
