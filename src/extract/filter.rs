//! Unused-style detection and removal.
//!
//! A selector is unused when the rewritten path content neither carries
//! its class nor references any of its ids. The check runs against the
//! REWRITTEN path content, after attribute names have been translated,
//! so it looks for `className` and `xlinkHref` rather than the source
//! spellings.

use super::style_table::StyleTable;
use regex::Regex;
use std::sync::LazyLock;

static RE_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\r?\n").unwrap());

/// Selectors not referenced from the rewritten path content.
pub fn unused_selectors(table: &StyleTable, rewritten_path: &str) -> Vec<String> {
    let mut unused = Vec::new();
    for (name, ids) in table.entries() {
        let class_used = rewritten_path.contains(&format!("className=\"{name}\""));
        let any_id_used = ids.iter().any(|id| {
            rewritten_path.contains(&format!("id=\"{id}\""))
                || rewritten_path.contains(&format!("xlinkHref=\"#{id}\""))
        });
        if !class_used && !any_id_used {
            unused.push(name.to_string());
        }
    }
    unused
}

/// Excise the rules of unused selectors from scoped style text.
///
/// Selectors following the shared-prefix convention have already been
/// scoped (` .${name} .sel{...}`); off-convention selectors have not,
/// so the scope part of the match is optional. Multi-selector rules are
/// left in place. Blank lines left behind are trimmed.
pub fn filter_style(style: &str, unused: &[String]) -> String {
    let scope = regex::escape(" .${name} ");
    let mut filtered = style.to_string();
    for selector in unused {
        let sel = regex::escape(selector);
        let pattern = format!(r"(?s)({scope})?\.{sel}[ \t]*\{{[^}}]*\}}");
        let re = Regex::new(&pattern).unwrap();
        filtered = re.replace(&filtered, "").into_owned();
    }
    RE_BLANK_LINES.replace_all(&filtered, "").into_owned()
}
