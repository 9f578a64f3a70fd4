//! Value formats for custom-pattern overrides.
//!
//! A custom pattern declares one format per whitespace-separated token of
//! its override values, e.g. `[length, border-style, color]` for a border
//! shorthand like `1px solid #000`. Catalog JSON names formats by string;
//! programmatic callers may supply their own predicate.

use std::fmt;
use std::sync::Arc;

type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A predicate over a single value token.
#[derive(Clone)]
pub enum ValueFormat {
    Any,
    Length,
    Number,
    Percentage,
    Color,
    BorderStyle,
    Keyword,
    Custom { name: String, check: Predicate },
}

const LENGTH_UNITS: &[&str] = &[
    "px", "em", "rem", "ex", "ch", "vw", "vh", "vmin", "vmax", "cm", "mm", "in", "pt", "pc",
];

const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

const NAMED_COLORS: &[&str] = &[
    "transparent",
    "currentcolor",
    "inherit",
    "black",
    "white",
    "red",
    "green",
    "blue",
    "yellow",
    "orange",
    "purple",
    "gray",
    "grey",
    "silver",
    "maroon",
    "navy",
    "teal",
    "olive",
    "lime",
    "aqua",
    "fuchsia",
];

const COLOR_FUNCTIONS: &[&str] = &["rgb(", "rgba(", "hsl(", "hsla("];

impl ValueFormat {
    /// Resolve a format by its catalog name.
    pub fn from_name(name: &str) -> Option<ValueFormat> {
        match name {
            "any" => Some(ValueFormat::Any),
            "length" => Some(ValueFormat::Length),
            "number" => Some(ValueFormat::Number),
            "percentage" => Some(ValueFormat::Percentage),
            "color" => Some(ValueFormat::Color),
            "border-style" => Some(ValueFormat::BorderStyle),
            "keyword" => Some(ValueFormat::Keyword),
            _ => None,
        }
    }

    /// Wrap an arbitrary predicate.
    pub fn custom<F>(name: impl Into<String>, check: F) -> ValueFormat
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        ValueFormat::Custom {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ValueFormat::Any => "any",
            ValueFormat::Length => "length",
            ValueFormat::Number => "number",
            ValueFormat::Percentage => "percentage",
            ValueFormat::Color => "color",
            ValueFormat::BorderStyle => "border-style",
            ValueFormat::Keyword => "keyword",
            ValueFormat::Custom { name, .. } => name,
        }
    }

    /// Check a single token against this format.
    pub fn matches(&self, token: &str) -> bool {
        match self {
            ValueFormat::Any => !token.is_empty(),
            ValueFormat::Length => is_length(token),
            ValueFormat::Number => is_number(token),
            ValueFormat::Percentage => token
                .strip_suffix('%')
                .is_some_and(is_number),
            ValueFormat::Color => is_color(token),
            ValueFormat::BorderStyle => BORDER_STYLES.contains(&token),
            ValueFormat::Keyword => is_keyword(token),
            ValueFormat::Custom { check, .. } => check(token),
        }
    }
}

impl fmt::Debug for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueFormat::Custom { name, .. } => write!(f, "Custom({name})"),
            other => write!(f, "{}", other.name()),
        }
    }
}

impl PartialEq for ValueFormat {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueFormat::Custom { check: a, .. }, ValueFormat::Custom { check: b, .. }) => {
                Arc::ptr_eq(a, b)
            }
            (ValueFormat::Custom { .. }, _) | (_, ValueFormat::Custom { .. }) => false,
            (a, b) => a.name() == b.name(),
        }
    }
}

fn is_number(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    let mut seen_digit = false;
    let mut seen_dot = false;
    for ch in digits.chars() {
        match ch {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

fn is_length(s: &str) -> bool {
    if s == "0" {
        return true;
    }
    LENGTH_UNITS.iter().any(|unit| {
        s.strip_suffix(unit)
            .is_some_and(|n| !n.is_empty() && is_number(n))
    })
}

fn is_color(s: &str) -> bool {
    if let Some(hex) = s.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    let lower = s.to_ascii_lowercase();
    if NAMED_COLORS.contains(&lower.as_str()) {
        return true;
    }
    COLOR_FUNCTIONS
        .iter()
        .any(|func| lower.starts_with(func) && lower.ends_with(')'))
}

fn is_keyword(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '-' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Built-in formats
    // =========================================================================

    #[test]
    fn test_length() {
        assert!(ValueFormat::Length.matches("1px"));
        assert!(ValueFormat::Length.matches("0"));
        assert!(ValueFormat::Length.matches("-1.5em"));
        assert!(ValueFormat::Length.matches(".5rem"));
        assert!(!ValueFormat::Length.matches("px"));
        assert!(!ValueFormat::Length.matches("10"));
        assert!(!ValueFormat::Length.matches("solid"));
    }

    #[test]
    fn test_number() {
        assert!(ValueFormat::Number.matches("42"));
        assert!(ValueFormat::Number.matches("-0.25"));
        assert!(!ValueFormat::Number.matches("1.2.3"));
        assert!(!ValueFormat::Number.matches("NaN"));
        assert!(!ValueFormat::Number.matches(""));
    }

    #[test]
    fn test_percentage() {
        assert!(ValueFormat::Percentage.matches("50%"));
        assert!(!ValueFormat::Percentage.matches("%"));
        assert!(!ValueFormat::Percentage.matches("50"));
    }

    #[test]
    fn test_color() {
        assert!(ValueFormat::Color.matches("#000001"));
        assert!(ValueFormat::Color.matches("#fff"));
        assert!(ValueFormat::Color.matches("currentColor"));
        assert!(ValueFormat::Color.matches("rgba(0,0,0,.5)"));
        assert!(!ValueFormat::Color.matches("#ggg"));
        assert!(!ValueFormat::Color.matches("#12345"));
        assert!(!ValueFormat::Color.matches("1px"));
    }

    #[test]
    fn test_border_style() {
        assert!(ValueFormat::BorderStyle.matches("solid"));
        assert!(ValueFormat::BorderStyle.matches("dashed"));
        assert!(!ValueFormat::BorderStyle.matches("wavy"));
    }

    #[test]
    fn test_keyword() {
        assert!(ValueFormat::Keyword.matches("inline-block"));
        assert!(!ValueFormat::Keyword.matches("1px"));
        assert!(!ValueFormat::Keyword.matches(""));
    }

    #[test]
    fn test_any_rejects_empty() {
        assert!(ValueFormat::Any.matches("whatever"));
        assert!(!ValueFormat::Any.matches(""));
    }

    // =========================================================================
    // Names and custom predicates
    // =========================================================================

    #[test]
    fn test_from_name_round_trips() {
        for name in [
            "any",
            "length",
            "number",
            "percentage",
            "color",
            "border-style",
            "keyword",
        ] {
            assert_eq!(ValueFormat::from_name(name).unwrap().name(), name);
        }
        assert!(ValueFormat::from_name("angle").is_none());
    }

    #[test]
    fn test_custom_predicate() {
        let even = ValueFormat::custom("even", |s| s.len() % 2 == 0);
        assert!(even.matches("ab"));
        assert!(!even.matches("abc"));
        assert_eq!(even.name(), "even");
        assert_eq!(format!("{even:?}"), "Custom(even)");
    }

    #[test]
    fn test_custom_equality_is_identity() {
        let a = ValueFormat::custom("t", |_| true);
        let b = ValueFormat::custom("t", |_| true);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_ne!(a, ValueFormat::Any);
        assert_eq!(ValueFormat::Color, ValueFormat::Color);
    }
}
