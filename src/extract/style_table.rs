//! Selector table built from one document's stylesheet.
//!
//! Each rule contributes its selector name(s) and every `url(#id)`
//! reference in its body. The table drives both unused-style filtering
//! and identifier uniquification, and is scratch state for exactly one
//! document.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// One rule: text from a `.` up to the next `}`.
static RE_RULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\.[^{}]+\{[^}]*\}").unwrap());

/// Selector part and body of a rule.
static RE_RULE_PARTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\.([^{}]+)\{([^}]*)\}").unwrap());

/// An identifier referenced via `url(#id)`.
static RE_URL_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"url\(#([^)]+)\)").unwrap());

/// Selector name of the form `prefix` + trailing digits.
static RE_PREFIXED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^0-9]+)[0-9]+$").unwrap());

/// Mapping from selector name to the identifiers its rule references,
/// plus the shared selector-name prefix.
#[derive(Debug, Default)]
pub struct StyleTable {
    /// selector name -> referenced ids, in rule order, deduplicated by append
    selectors: BTreeMap<String, Vec<String>>,
    /// Common leading name shared by the document's selectors
    /// (`st` for `st0`, `st1`, …), taken from the first rule
    prefix: Option<String>,
}

impl StyleTable {
    /// Build the table from a stylesheet body.
    pub fn build(style: &str) -> Self {
        let mut table = Self::default();

        for rule in RE_RULE.find_iter(style) {
            let Some(parts) = RE_RULE_PARTS.captures(rule.as_str()) else {
                continue;
            };
            let selector_part = &parts[1];
            let body = &parts[2];

            let refs: Vec<String> = RE_URL_REF
                .captures_iter(body)
                .map(|caps| caps[1].to_string())
                .collect();

            for name in split_selector_names(selector_part) {
                if table.prefix.is_none()
                    && let Some(caps) = RE_PREFIXED_NAME.captures(&name)
                {
                    table.prefix = Some(caps[1].to_string());
                }
                table.register(name, &refs);
            }
        }

        table
    }

    /// Register references for a selector.
    ///
    /// First sight copies the list; later sights append. The list is
    /// never aliased between selectors, so multi-selector rules cannot
    /// share a backing array.
    fn register(&mut self, name: String, refs: &[String]) {
        match self.selectors.get_mut(&name) {
            Some(existing) => existing.extend(refs.iter().cloned()),
            None => {
                self.selectors.insert(name, refs.to_vec());
            }
        }
    }

    /// Selector names with their referenced ids, in name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.selectors
            .iter()
            .map(|(name, refs)| (name.as_str(), refs.as_slice()))
    }

    /// Every referenced id, in name order.
    pub fn referenced_ids(&self) -> impl Iterator<Item = &str> {
        self.selectors
            .values()
            .flat_map(|refs| refs.iter().map(String::as_str))
    }

    /// Shared selector-name prefix, if the first rule followed the
    /// `prefixN` convention.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

/// Split a selector part into individual names.
///
/// Handles comma-separated multi-selector rules; each name is trimmed
/// and stripped of its leading dot.
fn split_selector_names(selector_part: &str) -> Vec<String> {
    selector_part
        .split(',')
        .map(|name| name.trim().trim_start_matches('.').trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
