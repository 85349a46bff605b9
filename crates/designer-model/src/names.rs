//! Field-name normalization.
//!
//! All case-insensitive name comparisons in the model go through
//! [`normalize_name`], which lowercases with Unicode rules.

use std::collections::BTreeMap;

/// Canonical comparison key for a field name.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

/// Case-insensitive name equality.
pub fn names_match(left: &str, right: &str) -> bool {
    normalize_name(left) == normalize_name(right)
}

/// A set of field names compared case-insensitively, remembering the first
/// spelling seen for each name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseInsensitiveSet {
    map: BTreeMap<String, String>,
}

impl CaseInsensitiveSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            map.entry(normalize_name(name))
                .or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    /// Original spelling of a name, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(&normalize_name(name)).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&normalize_name(name))
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Names as first spelled, ordered by normalized name.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.map.values().map(String::as_str)
    }

    /// Normalized (lowercased) names in sorted order.
    pub fn normalized(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }
}
