//! Element identity and text direction.
//!
//! Widgets refer to each other (a tab to its panel, a tooltip to its anchor,
//! an animation to its surface) through [`ElementId`] handles rather than
//! references, so ownership stays with whoever holds the element.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A stable, opaque handle for one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Allocate a fresh, process-unique id.
    pub fn new() -> Self {
        ElementId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value, useful as a subscription discriminant.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el-{}", self.0)
    }
}

/// Text direction of the surrounding document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Direction {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

impl Direction {
    /// Whether this is right-to-left.
    pub fn is_rtl(self) -> bool {
        self == Direction::Rtl
    }
}

/// Localization queries widgets make while rendering and navigating.
pub trait Localize: Send + Sync + 'static {
    /// The current text direction.
    fn dir(&self) -> Direction;

    /// Look up a translated term, e.g. an accessible label.
    fn term(&self, key: &str) -> String;
}

/// A fixed locale: one direction plus a term table with English fallbacks.
#[derive(Debug, Clone)]
pub struct Locale {
    dir: Direction,
    terms: HashMap<String, String>,
}

impl Locale {
    /// An English, left-to-right locale.
    pub fn new() -> Self {
        let terms = [
            ("close", "Close"),
            ("scrollToStart", "Scroll to start"),
            ("scrollToEnd", "Scroll to end"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            dir: Direction::Ltr,
            terms,
        }
    }

    /// Set the text direction.
    pub fn with_dir(mut self, dir: Direction) -> Self {
        self.dir = dir;
        self
    }

    /// Override or add a term.
    pub fn with_term(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.terms.insert(key.into(), value.into());
        self
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new()
    }
}

impl Localize for Locale {
    fn dir(&self) -> Direction {
        self.dir
    }

    fn term(&self, key: &str) -> String {
        self.terms
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
