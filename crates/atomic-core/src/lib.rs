//! Atomic CSS rule-expansion engine.
//!
//! Expands a catalog of atomic object definitions into a flat table mapping
//! CSS selectors to declaration blocks, gated by a configuration object.
//! Handles plain rules, parameterized patterns (with optional custom
//! entries), and custom patterns whose values come from labeled config groups.
//!
//! ```text
//! JSON → Catalog / Config → Engine::new() → run() → build_view() → emitter
//! ```
//!
//! # Example
//!
//! ```
//! use atomic_core::{Catalog, Config, Engine};
//!
//! let catalog = Catalog::from_json(
//!     r#"[{"type": "pattern", "id": "font-weight", "prefix": ".Fw-",
//!          "properties": ["font-weight"],
//!          "rules": [{"suffix": "b", "values": ["bold"]}]}]"#,
//! ).unwrap();
//! let config = Config::from_json(r#"{"font-weight": {"b": true}}"#).unwrap();
//!
//! let engine = Engine::new(catalog, config).unwrap();
//! assert_eq!(engine.build()[".Fw-b"]["font-weight"], "bold");
//! ```

pub mod config;
pub mod engine;
pub mod format;
pub mod label;
pub mod load;
pub mod model;

pub use config::{Config, ConfigEntry, Settings};
pub use engine::{BuildView, Engine};
pub use format::ValueFormat;
pub use label::{Alphabet, LabelScheme, Numeric, SchemeRegistry};
pub use model::{
    Build, Catalog, ConfigGroup, CustomPatternDefinition, Declarations, Definition, Kind,
    PatternDefinition, PatternRule, RuleDefinition,
};

/// Classification of a [`BuildError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong shape or type for an input, or a missing configuration.
    Type,
    /// More custom groups than the label scheme can name.
    Range,
    /// Well-typed input that is semantically invalid.
    Invalid,
}

/// Error raised while loading inputs or expanding rules.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("Type error: {0}")]
    Type(String),
    #[error("Range error: {0}")]
    Range(String),
    #[error("Build error: {0}")]
    Invalid(String),
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::Type(_) => ErrorKind::Type,
            BuildError::Range(_) => ErrorKind::Range,
            BuildError::Invalid(_) => ErrorKind::Invalid,
        }
    }

    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        BuildError::Type(message.into())
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        BuildError::Invalid(message.into())
    }
}
