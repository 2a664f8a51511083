//! Per-document pipeline: extraction, rewriting, case wrapping.
//!
//! Everything here is scratch state for one document. The style table,
//! the unused-selector set and the selector prefix are built fresh per
//! call and dropped at the end, so no decision for one document can leak
//! into the next.
//!
//! Ordering matters twice:
//! - the path branch is rewritten BEFORE the unused-selector set is
//!   computed, because the set is checked against translated attribute
//!   names (`className`, `xlinkHref`);
//! - selector scoping and tint run before unused filtering, which runs
//!   before identifier uniquification.

use crate::extract::{self, filter, style_table::StyleTable};
use crate::rewrite::{syntax, unique};

/// Generated case fragments for one document. Each part is optional:
/// a document without a viewBox or stylesheet simply contributes no
/// fragment to that bucket.
#[derive(Debug, Default)]
pub struct CaseFragments {
    pub view_box: Option<String>,
    pub style: Option<String>,
    pub path: Option<String>,
}

impl CaseFragments {
    pub fn is_empty(&self) -> bool {
        self.view_box.is_none() && self.style.is_none() && self.path.is_none()
    }
}

/// Run the full extraction-and-rewrite pipeline for one document.
pub fn process_document(name: &str, source: &str, tint: bool) -> CaseFragments {
    let parts = extract::raw_parts(source);

    let table = parts
        .style
        .as_deref()
        .map(StyleTable::build)
        .unwrap_or_default();

    // Path branch: syntax translation first, uniquification last.
    let rewritten_path = parts.path.map(|path| {
        let path = syntax::convert_inline_styles(&path);
        let path = syntax::remove_empty_defs(&path);
        syntax::map_attributes(&path)
    });

    // The unused set is only meaningful against the rewritten path.
    let unused = rewritten_path
        .as_deref()
        .map(|path| filter::unused_selectors(&table, path))
        .unwrap_or_default();

    // Style branch: scope, tint, filter, uniquify.
    let style = parts.style.map(|style| {
        let style = match table.prefix() {
            Some(prefix) => syntax::scope_selectors(&style, prefix),
            None => style,
        };
        let style = if tint { syntax::apply_tint(&style) } else { style };
        let style = filter::filter_style(&style, &unused);
        unique::uniquify_style(&style, &table, name)
    });

    let path = rewritten_path.map(|path| unique::uniquify_path(&path, name));

    CaseFragments {
        view_box: parts
            .view_box
            .map(|value| format!("case \"{name}\": return \"{value}\";")),
        style: style.map(|style| format!("case \"{name}\": \nreturn `{style}`;")),
        path: path.map(|path| format!("case \"{name}\": \nreturn (<g {{...props}}>{path}</g>);")),
    }
}
