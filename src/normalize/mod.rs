//! In-place normalization of SVG source documents.
//!
//! Independent of the merge pipeline: each document is rewritten on disk
//! before it is ever merged anywhere. A normalized document carries a
//! unique wrapper class on its root element, and every stylesheet rule
//! is scoped to that class, so dropping many normalized documents into
//! one page cannot cross-style them.
//!
//! Per-document failures are logged and the batch continues. Writes go
//! through a temp file and rename, so an interrupted run leaves each
//! source either untouched or fully rewritten.

use crate::config::Config;
use crate::utils::fs as fsx;
use crate::{debug, log};
use anyhow::{Context, Result, anyhow};
use rand::Rng;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static RE_STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(<style[^>]*>)(.*?)(</style>)").unwrap());

static RE_RULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\.[^{}]+\{[^}]*\}").unwrap());

static RE_CLASS_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"class="([^"]*)""#).unwrap());

static RE_ROOT_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[ \t]*class="([^"]*)""#).unwrap());

/// Normalize every document in the source directory, best effort.
pub fn run(config: &Config) -> Result<()> {
    let files = fsx::read_dir_sorted(&config.paths.source, "svg")?;
    log!("normalize"; "processing {} file(s)", files.len());

    let mut rng = rand::rng();
    for file in &files {
        if let Err(err) = normalize_file(file, config.options.strip_legacy_class, &mut rng) {
            log!("error"; "normalization failed: {err:#}");
            log!("error"; "offending file: {}", file.display());
        }
    }
    Ok(())
}

/// Normalize one file and write it back when anything changed.
fn normalize_file(path: &Path, strip_legacy: bool, rng: &mut impl Rng) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let Some(stem) = fsx::file_stem(path) else {
        return Ok(());
    };

    let wrapper = wrapper_class(stem, rng);
    match normalize_document(&raw, &wrapper, strip_legacy)? {
        Some(updated) => {
            fsx::write_atomic(path, &updated)?;
            log!("normalize"; "writing {}", path.display());
        }
        None => debug!("normalize"; "unchanged {}", path.display()),
    }
    Ok(())
}

// ============================================================================
// Document rewriting
// ============================================================================

/// Normalize one document's text.
///
/// Returns `None` when the file must stay untouched: already normalized
/// (root class present), no stylesheet, or no style rules survive the
/// unused-rule removal.
pub fn normalize_document(
    raw: &str,
    wrapper: &str,
    strip_legacy: bool,
) -> Result<Option<String>> {
    let open_tag = root_open_tag(raw).ok_or_else(|| anyhow!("no root <svg> element"))?;

    let mut doc = raw.to_string();
    if RE_ROOT_CLASS.is_match(&raw[open_tag.clone()]) {
        if !strip_legacy {
            // Root class means the document was already normalized.
            return Ok(None);
        }
        doc = strip_root_class(&doc);
    }

    // Unused-rule removal needs a stylesheet to act on.
    let Some(style_caps) = RE_STYLE_BLOCK.captures(&doc) else {
        return Ok(None);
    };
    let style_body = style_caps[2].to_string();

    let referenced = referenced_classes(&doc);
    let kept: Vec<&str> = RE_RULE
        .find_iter(&style_body)
        .map(|rule| rule.as_str())
        .filter(|rule| rule_is_referenced(rule, &referenced))
        .collect();
    if kept.is_empty() {
        return Ok(None);
    }

    // Scope every surviving rule to the wrapper class.
    let scoped: Vec<String> = kept
        .iter()
        .map(|rule| {
            if rule_selector(rule).contains(wrapper) {
                (*rule).to_string()
            } else {
                format!(".{wrapper} {rule}")
            }
        })
        .collect();
    let new_body = scoped.join(" ");
    doc = RE_STYLE_BLOCK
        .replace(&doc, |caps: &regex::Captures| {
            format!("{}{}{}", &caps[1], new_body, &caps[3])
        })
        .into_owned();

    Ok(Some(inject_root_class(&doc, wrapper)?))
}

/// Byte range of the root element's opening tag, `<svg` through `>`.
fn root_open_tag(doc: &str) -> Option<std::ops::Range<usize>> {
    let start = doc.find("<svg")?;
    let end = doc[start..].find('>')? + start;
    Some(start..end + 1)
}

/// Remove the root element's class attribute and strip the matching
/// selector text from the stylesheet, leaving an unscoped baseline.
fn strip_root_class(doc: &str) -> String {
    let Some(range) = root_open_tag(doc) else {
        return doc.to_string();
    };
    let open_tag = &doc[range.clone()];
    let Some(caps) = RE_ROOT_CLASS.captures(open_tag) else {
        return doc.to_string();
    };
    let legacy_value = caps[1].to_string();
    let stripped_tag = RE_ROOT_CLASS.replace(open_tag, "").into_owned();

    let mut output = String::with_capacity(doc.len());
    output.push_str(&doc[..range.start]);
    output.push_str(&stripped_tag);
    output.push_str(&doc[range.end..]);

    // Drop the selector occurrences of the legacy class from the style
    // block only.
    RE_STYLE_BLOCK
        .replace(&output, |caps: &regex::Captures| {
            let body = caps[2].replace(&format!(".{legacy_value}"), "");
            format!("{}{}{}", &caps[1], body, &caps[3])
        })
        .into_owned()
}

/// Every class attribute value referenced in the body (style block
/// excluded), deduplicated in first-seen order.
fn referenced_classes(doc: &str) -> Vec<String> {
    let body = RE_STYLE_BLOCK.replace(doc, "").into_owned();
    let inner = match root_open_tag(&body) {
        Some(range) => &body[range.end..],
        None => body.as_str(),
    };

    let mut values = Vec::new();
    for caps in RE_CLASS_ATTR.captures_iter(inner) {
        let value = caps[1].to_string();
        if !values.contains(&value) {
            values.push(value);
        }
    }
    values
}

/// Whether any of the rule's selector names appears inside a referenced
/// class value.
fn rule_is_referenced(rule: &str, referenced: &[String]) -> bool {
    let selector = rule_selector(rule);
    selector
        .split([',', ' ', '\t', '\n'])
        .map(|name| name.trim().trim_start_matches('.'))
        .filter(|name| !name.is_empty())
        .any(|name| referenced.iter().any(|value| value.contains(name)))
}

/// Selector part of a rule (text before the `{`).
fn rule_selector(rule: &str) -> &str {
    rule.split('{').next().unwrap_or(rule).trim()
}

/// Merge the wrapper class into the root element's class attribute,
/// creating the attribute when absent.
fn inject_root_class(doc: &str, wrapper: &str) -> Result<String> {
    let range = root_open_tag(doc).ok_or_else(|| anyhow!("no root <svg> element"))?;
    let open_tag = &doc[range.clone()];

    let new_tag = if let Some(caps) = RE_CLASS_ATTR.captures(open_tag) {
        let value = &caps[1];
        if value.contains(wrapper) {
            open_tag.to_string()
        } else {
            open_tag.replace(&caps[0], &format!("class=\"{value} {wrapper}\""))
        }
    } else {
        let insert_at = if open_tag.ends_with("/>") {
            open_tag.len() - 2
        } else {
            open_tag.len() - 1
        };
        format!(
            "{} class=\"{}\"{}",
            &open_tag[..insert_at],
            wrapper,
            &open_tag[insert_at..]
        )
    };

    let mut output = String::with_capacity(doc.len() + wrapper.len() + 16);
    output.push_str(&doc[..range.start]);
    output.push_str(&new_tag);
    output.push_str(&doc[range.end..]);
    Ok(output)
}

// ============================================================================
// Wrapper class naming
// ============================================================================

/// Derive a try-to-be-unique wrapper class from a file's base name.
///
/// Base name (spaces to underscores) plus six random bytes hex-encoded,
/// Fisher-Yates shuffled, with a leading non-digit character. Practical
/// uniqueness within one project's asset set, not a guarantee.
pub fn wrapper_class(stem: &str, rng: &mut impl Rng) -> String {
    let base = stem.replace(' ', "_");
    let mut bytes = [0u8; 6];
    rng.fill(&mut bytes[..]);

    let mut chars: Vec<char> = format!("{base}{}", hex::encode(bytes)).chars().collect();
    for i in (1..chars.len()).rev() {
        let j = rng.random_range(0..=i);
        chars.swap(i, j);
    }

    let shuffled: String = chars.into_iter().collect();
    format!("h{shuffled}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const DOC: &str = r#"<?xml version="1.0"?>
<svg viewBox="0 0 24 24">
<style>.used{fill:#fff;} .ghost{fill:#000;}</style>
<path class="used" d="M0 0"/>
</svg>"#;

    #[test]
    fn test_already_normalized_is_skipped() {
        let doc = r#"<svg class="hx12ab" viewBox="0 0 24 24"><style>.a{}</style><path class="a"/></svg>"#;
        let result = normalize_document(doc, "hnew", false).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_inner_class_does_not_trip_guard() {
        // Only a ROOT class attribute marks a document as normalized
        let result = normalize_document(DOC, "hw1", false).unwrap();
        assert!(result.is_some());
    }

    #[test]
    fn test_unused_rules_dropped_and_wrapper_injected() {
        let updated = normalize_document(DOC, "hw1", false).unwrap().unwrap();
        assert!(!updated.contains(".ghost"));
        assert!(updated.contains(".hw1 .used{fill:#fff;}"));
        assert!(updated.contains(r#"<svg viewBox="0 0 24 24" class="hw1">"#));
    }

    #[test]
    fn test_no_stylesheet_leaves_file_untouched() {
        let doc = r#"<svg viewBox="0 0 24 24"><path class="x"/></svg>"#;
        assert!(normalize_document(doc, "hw1", false).unwrap().is_none());
    }

    #[test]
    fn test_all_rules_unused_leaves_file_untouched() {
        let doc = r#"<svg><style>.a{fill:#fff;}</style><path d="M0 0"/></svg>"#;
        assert!(normalize_document(doc, "hw1", false).unwrap().is_none());
    }

    #[test]
    fn test_strip_legacy_class_renormalizes() {
        let doc = r#"<svg class="hold1"><style>.hold1 .used{fill:#fff;}</style><path class="used"/></svg>"#;
        let updated = normalize_document(doc, "hnew2", true).unwrap().unwrap();
        assert!(!updated.contains("hold1"));
        assert!(updated.contains("class=\"hnew2\""));
        assert!(updated.contains(".hnew2  .used{fill:#fff;}") || updated.contains(".hnew2 .used{fill:#fff;}"));
    }

    #[test]
    fn test_missing_root_element_is_an_error() {
        assert!(normalize_document("just text", "hw1", false).is_err());
    }

    #[test]
    fn test_wrapper_class_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let class = wrapper_class("top banner", &mut rng);
        assert!(class.starts_with('h'));
        // "top_banner" + 12 hex chars + leading 'h'
        assert_eq!(class.chars().count(), 1 + "top_banner".len() + 12);
        assert!(!class.contains(' '));
        assert!(!class.chars().next().unwrap().is_ascii_digit());
    }

    #[test]
    fn test_wrapper_class_varies_with_rng() {
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(2);
        assert_ne!(wrapper_class("icon", &mut a), wrapper_class("icon", &mut b));
    }
}
