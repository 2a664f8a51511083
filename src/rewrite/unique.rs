//! Identifier uniquification across merged documents.
//!
//! Source identifiers are only unique within one document; once many
//! documents land in a single generated module, every identifier and
//! identifier-reference is rewritten to embed the document's symbolic
//! name plus a render-time `${prefix}` placeholder. The caller-supplied
//! prefix value makes the final id unique per mounted instance as well
//! (two copies of one id in the same page would lose the reference).
//!
//! Path content has five distinct reference shapes, each with its own
//! boundary rule. Every rewrite turns a static string attribute into a
//! templated-expression attribute; `replace_all` visits each source
//! occurrence exactly once, so an already-rewritten span is never
//! touched again.

use crate::extract::style_table::StyleTable;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_ID_ATTR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"id="([^"]+)""#).unwrap());

static RE_XLINK_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##"xlinkHref="#([^"]+)""##).unwrap());

static RE_CLIP_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##"clipPath="url\(#([^")]+)\)""##).unwrap());

static RE_FILL_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##"fill="url\(#([^")]+)\)""##).unwrap());

static RE_BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##""url\(#([^")]+)\)""##).unwrap());

/// Rewrite hash references in style text for every id known from the
/// style table.
///
/// `url(#grad_1)` becomes `url(#<name>-${prefix}-grad_1)`. Matching the
/// full `url(#...)` form keeps `grad_1` from eating `grad_1b`.
pub fn uniquify_style(style: &str, table: &StyleTable, name: &str) -> String {
    let mut output = style.to_string();
    for id in table.referenced_ids() {
        let from = format!("url(#{id})");
        let to = format!("url(#{name}-${{prefix}}-{id})");
        output = output.replace(&from, &to);
    }
    output
}

/// Rewrite all five reference shapes in path content.
///
/// Some ids are declared directly in the path rather than in any style
/// rule, so this pass matches shapes rather than consulting the table.
pub fn uniquify_path(path: &str, name: &str) -> String {
    // id="X" -> id={`name-${prefix}-X`}
    let output = RE_ID_ATTR.replace_all(path, |caps: &Captures| {
        format!("id={{`{name}-${{prefix}}-{}`}}", &caps[1])
    });

    // xlinkHref="#X" -> xlinkHref={`#name-${prefix}-X`}
    let output = RE_XLINK_HREF.replace_all(&output, |caps: &Captures| {
        format!("xlinkHref={{`#{name}-${{prefix}}-{}`}}", &caps[1])
    });

    // clipPath="url(#X)" -> clipPath={`url(#name-${prefix}-X)`}
    let output = RE_CLIP_PATH.replace_all(&output, |caps: &Captures| {
        format!("clipPath={{`url(#{name}-${{prefix}}-{})`}}", &caps[1])
    });

    // fill="url(#X)" -> fill={`url(#name-${prefix}-X)`}
    // fill can also carry a plain color, hence the url-specific shape
    let output = RE_FILL_URL.replace_all(&output, |caps: &Captures| {
        format!("fill={{`url(#{name}-${{prefix}}-{})`}}", &caps[1])
    });

    // remaining quoted "url(#X)" -> `url(#name-${prefix}-X)`
    let output = RE_BARE_URL.replace_all(&output, |caps: &Captures| {
        format!("`url(#{name}-${{prefix}}-{})`", &caps[1])
    });

    output.into_owned()
}
