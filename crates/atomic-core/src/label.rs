//! Label schemes for custom-pattern groups.
//!
//! A scheme maps a group index to a short, selector-safe label appended
//! after `--`. Schemes must be injective over `0..capacity()`.

use std::collections::BTreeMap;
use std::sync::Arc;

/// Most groups any custom pattern may declare.
pub const MAX_GROUPS: usize = 26;

pub trait LabelScheme: Send + Sync {
    /// Number of distinct labels this scheme can produce.
    fn capacity(&self) -> usize;

    /// Label for `index`, or `None` past capacity.
    fn label(&self, index: usize) -> Option<String>;
}

/// `0..26` → `a..z`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alphabet;

impl LabelScheme for Alphabet {
    fn capacity(&self) -> usize {
        26
    }

    fn label(&self, index: usize) -> Option<String> {
        if index >= self.capacity() {
            return None;
        }
        Some(char::from(b'a' + index as u8).to_string())
    }
}

/// `0..26` → `1..26`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Numeric;

impl LabelScheme for Numeric {
    fn capacity(&self) -> usize {
        MAX_GROUPS
    }

    fn label(&self, index: usize) -> Option<String> {
        (index < self.capacity()).then(|| (index + 1).to_string())
    }
}

/// Label schemes addressable by `suffixType`.
#[derive(Clone)]
pub struct SchemeRegistry {
    schemes: BTreeMap<String, Arc<dyn LabelScheme>>,
}

impl SchemeRegistry {
    /// A registry with no schemes.
    pub fn empty() -> Self {
        Self {
            schemes: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, scheme: Arc<dyn LabelScheme>) {
        self.schemes.insert(name.into(), scheme);
    }

    pub fn get(&self, name: &str) -> Option<&dyn LabelScheme> {
        self.schemes.get(name).map(|s| s.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemes.keys().map(String::as_str)
    }
}

impl Default for SchemeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("alphabet", Arc::new(Alphabet));
        registry.register("numeric", Arc::new(Numeric));
        registry
    }
}

impl std::fmt::Debug for SchemeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
