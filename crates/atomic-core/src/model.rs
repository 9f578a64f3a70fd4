//! Atomic object definitions and the build table.
//!
//! A catalog is an ordered list of definitions. Each definition describes
//! one family of generated rules and is one of three kinds: a literal rule
//! block, a pattern zipping properties against per-suffix values, or a
//! custom pattern whose values come from configuration groups.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::format::ValueFormat;

/// CSS property → value.
pub type Declarations = BTreeMap<String, String>;

/// CSS selector → declaration block.
///
/// Sorted so that repeated builds emit identical output.
pub type Build = BTreeMap<String, Declarations>;

/// One value-override group for a custom pattern: rule suffix → values.
pub type ConfigGroup = BTreeMap<String, Vec<String>>;

/// The kind tag of a definition (`type` in catalog JSON).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Rule,
    Pattern,
    CustomPattern,
}

impl Kind {
    pub fn parse(tag: &str) -> Option<Kind> {
        match tag {
            "rule" => Some(Kind::Rule),
            "pattern" => Some(Kind::Pattern),
            "custom-pattern" => Some(Kind::CustomPattern),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Rule => "rule",
            Kind::Pattern => "pattern",
            Kind::CustomPattern => "custom-pattern",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `{suffix, values}` entry of a pattern.
///
/// For `pattern` definitions `values` are declaration values, zipped against
/// the definition's properties. For `custom-pattern` definitions `values`
/// are the property names that receive the group's override values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub suffix: String,
    pub values: Vec<String>,
}

impl PatternRule {
    pub fn new(suffix: impl Into<String>, values: &[&str]) -> Self {
        Self {
            suffix: suffix.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// A pre-formed rule block gated by a single boolean.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDefinition {
    pub id: String,
    pub name: Option<String>,
    pub rule: Build,
}

/// A prefix + suffix family zipping `properties` against each rule's values.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternDefinition {
    pub id: String,
    pub name: Option<String>,
    pub prefix: String,
    pub properties: Vec<String>,
    pub rules: Vec<PatternRule>,
    pub allow_custom: bool,
}

/// A family expanded once per configuration group, labeled by `suffix_type`.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomPatternDefinition {
    pub id: String,
    pub name: Option<String>,
    pub prefix: String,
    pub suffix_type: String,
    pub format: Vec<ValueFormat>,
    pub rules: Vec<PatternRule>,
}

/// An atomic object definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Rule(RuleDefinition),
    Pattern(PatternDefinition),
    CustomPattern(CustomPatternDefinition),
}

impl Definition {
    pub fn id(&self) -> &str {
        match self {
            Definition::Rule(d) => &d.id,
            Definition::Pattern(d) => &d.id,
            Definition::CustomPattern(d) => &d.id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Definition::Rule(d) => d.name.as_deref(),
            Definition::Pattern(d) => d.name.as_deref(),
            Definition::CustomPattern(d) => d.name.as_deref(),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Definition::Rule(_) => Kind::Rule,
            Definition::Pattern(_) => Kind::Pattern,
            Definition::CustomPattern(_) => Kind::CustomPattern,
        }
    }
}

/// An ordered catalog of definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub definitions: Vec<Definition>,
}

impl Catalog {
    pub fn new(definitions: Vec<Definition>) -> Self {
        Self { definitions }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Definition> {
        self.definitions.iter()
    }
}
