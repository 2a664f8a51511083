//! Attribute-syntax translation from SVG to JSX.
//!
//! Three independent rewrites over path content, applied after style and
//! decorative blocks are already gone (the table substitution is a blind
//! string replace and would otherwise also corrupt text inside removed
//! sections):
//!
//! 1. inline `style="a:b;c:d;"` attributes become object literals
//! 2. empty `<defs>` containers left behind by stylesheet extraction
//!    are dropped
//! 3. a closed table of attribute names is mapped to camelCase
//!
//! Plus two style-text rewrites used by the style branch: selector
//! scoping and tint parametrization.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Closed mapping of source attribute names to the JSX dialect.
pub const ATTRIBUTE_MAP: [(&str, &str); 12] = [
    ("class", "className"),
    ("stop-color", "stopColor"),
    ("stop-opacity", "stopOpacity"),
    ("xlink:href", "xlinkHref"),
    ("clip-path", "clipPath"),
    ("enable-background", "enableBackground"),
    ("font-family", "fontFamily"),
    ("font-size", "fontSize"),
    ("fill-rule", "fillRule"),
    ("clip-rule", "clipRule"),
    ("stroke-width", "strokeWidth"),
    ("stroke-miterlimit", "strokeMiterlimit"),
];

/// Style properties whose hex colors the tint option parametrizes.
const TINT_PROPS: [&str; 3] = ["fill", "stroke", "stop-color"];

static RE_STYLE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"style="[^"]*""#).unwrap());

static RE_EMPTY_DEFS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<defs>[ \t\r\n]*</defs>").unwrap());

/// Map source attribute names onto the JSX dialect.
///
/// Blind literal substitution over the whole content; run it last.
pub fn map_attributes(content: &str) -> String {
    let mut output = content.to_string();
    for (svg, jsx) in ATTRIBUTE_MAP {
        output = output.replace(svg, jsx);
    }
    output
}

/// Convert every inline style attribute into an object-literal form.
///
/// `style="fill:#fff;stroke:#000;"` becomes
/// `style={{ fill: "#fff", stroke: "#000",  }}`. A value whose colon and
/// semicolon counts mismatch is a single non-terminated declaration, so
/// the quote is closed instead of the object.
pub fn convert_inline_styles(content: &str) -> String {
    let mut seen = Vec::new();
    for found in RE_STYLE_ATTR.find_iter(content) {
        let text = found.as_str().to_string();
        if !seen.contains(&text) {
            seen.push(text);
        }
    }

    let mut output = content.to_string();
    for svg in seen {
        let jsx = style_attr_to_object(&svg);
        output = output.replace(&svg, &jsx);
    }
    output
}

/// Rewrite one `style="..."` attribute into the object-literal form.
fn style_attr_to_object(svg: &str) -> String {
    let mut jsx = svg.to_string();

    if let Some(first_quote) = jsx.find('"') {
        jsx.replace_range(first_quote..=first_quote, "{{ ");
    }

    let colons = jsx.matches(':').count();
    let semicolons = jsx.matches(';').count();
    let terminated = semicolons > 0 && colons == semicolons;
    if let Some(last_quote) = jsx.rfind('"') {
        let closer = if terminated { " }}" } else { "\" }}" };
        jsx.replace_range(last_quote..=last_quote, closer);
    }

    jsx = jsx.replace(':', ": \"");
    jsx.replace(';', "\", ")
}

/// Remove `<defs>` containers left empty after stylesheet extraction.
pub fn remove_empty_defs(content: &str) -> String {
    RE_EMPTY_DEFS.replace_all(content, "").into_owned()
}

/// Scope every selector occurrence with the render-time wrapper class.
///
/// `.st0{...}` becomes ` .${name} .st0{...}`, so the emitted CSS only
/// applies inside the component that rendered it.
pub fn scope_selectors(style: &str, prefix: &str) -> String {
    let from = format!(".{prefix}");
    let to = format!(" .${{name}} .{prefix}");
    style.replace(&from, &to)
}

/// Rewrite fixed color-bearing properties into a `${color}` placeholder.
pub fn apply_tint(style: &str) -> String {
    let mut output = style.to_string();
    for prop in TINT_PROPS {
        let pattern = format!("{}:#[0-9A-Fa-f]+;", regex::escape(prop));
        let re = Regex::new(&pattern).unwrap();
        output = re
            .replace_all(&output, |_: &Captures| format!("{prop}:${{color}};"))
            .into_owned();
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_attributes_exactness() {
        assert_eq!(
            map_attributes(r#"<path stroke-width="2"/>"#),
            r#"<path strokeWidth="2"/>"#
        );
        assert_eq!(
            map_attributes(r#"<g class="a b"/>"#),
            r#"<g className="a b"/>"#
        );
        assert_eq!(
            map_attributes(r##"<use xlink:href="#x" clip-path="url(#c)"/>"##),
            r##"<use xlinkHref="#x" clipPath="url(#c)"/>"##
        );
    }

    #[test]
    fn test_inline_style_two_declarations() {
        let converted = convert_inline_styles(r#"<path style="fill:#fff;stroke:#000;"/>"#);
        assert_eq!(
            converted,
            r##"<path style={{ fill: "#fff", stroke: "#000",  }}/>"##
        );
    }

    #[test]
    fn test_inline_style_non_terminated_closes_quote() {
        // One colon, zero semicolons: close the quote, not the object
        let converted = convert_inline_styles(r#"<stop style="stop-color:#FFFFFF"/>"#);
        assert_eq!(converted, r##"<stop style={{ stop-color: "#FFFFFF" }}/>"##);
    }

    #[test]
    fn test_inline_style_repeated_attribute_rewritten_everywhere() {
        let converted = convert_inline_styles(
            r#"<a style="fill:#fff;"/><b style="fill:#fff;"/>"#,
        );
        assert!(!converted.contains(r#"style="fill"#));
        assert_eq!(converted.matches("style={{").count(), 2);
    }

    #[test]
    fn test_remove_empty_defs() {
        assert_eq!(remove_empty_defs("<defs>\n  </defs><path/>"), "<path/>");
        // Non-empty defs stay
        let kept = "<defs><mask id=\"m\"/></defs>";
        assert_eq!(remove_empty_defs(kept), kept);
    }

    #[test]
    fn test_scope_selectors() {
        let scoped = scope_selectors(".st0{fill:#fff;}.st1{}", "st");
        assert_eq!(scoped, " .${name} .st0{fill:#fff;} .${name} .st1{}");
    }

    #[test]
    fn test_apply_tint() {
        let tinted = apply_tint(".st0{fill:#FF0000;stroke:#00ff00;}");
        assert_eq!(tinted, ".st0{fill:${color};stroke:${color};}");
    }

    #[test]
    fn test_apply_tint_leaves_other_props() {
        let tinted = apply_tint(".st0{stroke-width:2;fill:#abc123;}");
        assert_eq!(tinted, ".st0{stroke-width:2;fill:${color};}");
    }
}
