//! Structural extraction from raw SVG documents.
//!
//! Pulls the three interesting substrings out of one document: the root
//! element's viewBox, the stylesheet body, and the path content between
//! the root tags. Each part is optional; a missing part just means that
//! branch is skipped for the document.
//!
//! This is pattern matching over raw text, not XML parsing. The input is
//! a constrained, well-formed subset: single root element, at most one
//! style block.

pub mod filter;
pub mod style_table;

use regex::Regex;
use std::sync::LazyLock;

/// Containers that carry no visual content and are dropped from path output.
pub const DECORATIVE_TAGS: [&str; 3] = ["metadata", "title", "desc"];

static RE_VIEWBOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"viewBox=["']([^"']*)["']"#).unwrap());

static RE_STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<style[^>]*>(.*?)</style>").unwrap());

static RE_SVG_INNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<svg[^>]*>(.*?)</svg>").unwrap());

/// The three optional structural parts of one SVG document.
#[derive(Debug, Default)]
pub struct RawParts {
    /// Value of the root element's viewBox attribute
    pub view_box: Option<String>,
    /// Inner text of the first style block
    pub style: Option<String>,
    /// Content between the root tags, style block and decorative
    /// containers removed
    pub path: Option<String>,
}

/// Extract all structural parts from one document.
pub fn raw_parts(source: &str) -> RawParts {
    RawParts {
        view_box: view_box(source),
        style: style_body(source),
        path: path_content(source),
    }
}

/// Value of the root element's viewBox attribute, if present.
pub fn view_box(source: &str) -> Option<String> {
    RE_VIEWBOX
        .captures(source)
        .map(|caps| caps[1].to_string())
}

/// Inner text of the (at most one) style block, if present.
pub fn style_body(source: &str) -> Option<String> {
    RE_STYLE_BLOCK
        .captures(source)
        .map(|caps| caps[1].to_string())
}

/// Inner content of the root element, with the style block and
/// decorative containers removed.
pub fn path_content(source: &str) -> Option<String> {
    let inner = RE_SVG_INNER.captures(source).map(|caps| caps[1].to_string())?;

    let mut content = inner;
    for tag in DECORATIVE_TAGS {
        let pattern = format!("(?s)<{tag}>.*?</{tag}>");
        let re = Regex::new(&pattern).unwrap();
        content = re.replace_all(&content, "").into_owned();
    }
    content = RE_STYLE_BLOCK.replace(&content, "").into_owned();

    Some(content)
}
