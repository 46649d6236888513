//! Requirement tag aggregation and group display names.

use std::collections::{BTreeMap, HashSet};

use crate::grouping::TestRecord;

/// Built-in display names for raw group keys (matched ignoring case).
const BUILTIN_DISPLAY_NAMES: [(&str, &str); 3] = [
    ("generate", "Generator"),
    ("compile", "Compiler"),
    ("validate", "Validator"),
];

/// Keep the first occurrence of every item, in input order.
pub fn dedup_first_occurrence<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let item = item.as_ref().trim();
        if !item.is_empty() && seen.insert(item.to_string()) {
            out.push(item.to_string());
        }
    }
    out
}

/// Group tags: a first-occurrence scan over records in their sorted order.
pub fn aggregate(records: &[TestRecord]) -> Vec<String> {
    dedup_first_occurrence(records.iter().flat_map(|r| r.body.tags()))
}

/// Maps raw group keys to the names used in titles and file names.
#[derive(Debug, Clone, Default)]
pub struct DisplayNames {
    /// Lowercased raw key -> display name.
    overrides: BTreeMap<String, String>,
}

impl DisplayNames {
    /// Extend the built-in table; keys are matched ignoring case.
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self {
            overrides: overrides
                .into_iter()
                .map(|(k, v)| {
                    let key = k.as_ref().trim().to_lowercase();
                    (key, v.as_ref().trim().to_string())
                })
                .filter(|(k, v)| !k.is_empty() && !v.is_empty())
                .collect(),
        }
    }

    /// Display name for `raw`, or `raw` itself when unmapped.
    pub fn display(&self, raw: &str) -> String {
        let lower = raw.to_lowercase();
        if let Some(name) = self.overrides.get(&lower) {
            return name.clone();
        }
        BUILTIN_DISPLAY_NAMES
            .iter()
            .find(|(key, _)| *key == lower)
            .map(|(_, name)| name.to_string())
            .unwrap_or_else(|| raw.to_string())
    }
}
