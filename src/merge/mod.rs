//! Aggregation of per-document fragments and splicing into the target
//! module.
//!
//! Three content buckets (viewBox, style, path) accumulate case
//! fragments across all documents in directory-listing order; one final
//! splice inserts each bucket right after its marker comment in the
//! target. Any fatal condition aborts before anything is written to the
//! target, so a failed run never commits partial output.

use crate::config::Config;
use crate::pipeline::{self, CaseFragments};
use crate::utils::{exec, fs as fsx};
use crate::{log, logger};
use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use std::fs;
use thiserror::Error;

/// Marker comments in the target module, one per content bucket.
/// Index order matches the buckets: viewBox, style, path.
pub const MARKERS: [&str; 3] = [
    "// NOTE: (SVG2JSX) DO NOT DELETE, ADD VIEWBOX.",
    "// NOTE: (SVG2JSX) DO NOT DELETE, ADD STYLE.",
    "// NOTE: (SVG2JSX) DO NOT DELETE, ADD PATH.",
];

/// Generated code computes ids from a caller-supplied `prefix` value;
/// a wired-up target mentions it at least this many times.
const MIN_PREFIX_OCCURRENCES: usize = 5;

/// Merge-pipeline errors. All of these are fatal for the whole run.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("switch case `{name}` already exists in the target file")]
    CaseConflict { name: String },

    #[error("none of the insertion marker comments exist in the target file")]
    MarkersMissing,

    #[error(
        "`prefix` integration incomplete in the target file \
         (found {found} occurrences, expected at least 5), refer to the template module"
    )]
    PrefixIntegration { found: usize },
}

/// Preview index artifact consumed by the preview UI.
#[derive(Debug, Serialize)]
struct PreviewIndex {
    #[serde(rename = "svgPreviews")]
    svg_previews: Vec<String>,
}

// ============================================================================
// MergeContext
// ============================================================================

/// Per-run accumulation state: the target text being mutated plus the
/// three content buckets and the preview list.
#[derive(Debug)]
pub struct MergeContext {
    target: String,
    buckets: [String; 3],
    previews: Vec<String>,
}

impl MergeContext {
    /// Start a merge run against the target module's current text.
    ///
    /// Fails when the target is not wired for prefix-based id
    /// generation at all; refer to the template module.
    pub fn new(target: String) -> Result<Self, MergeError> {
        let found = target.matches("prefix").count();
        if found < MIN_PREFIX_OCCURRENCES {
            return Err(MergeError::PrefixIntegration { found });
        }
        Ok(Self {
            target,
            buckets: [String::new(), String::new(), String::new()],
            previews: Vec::new(),
        })
    }

    /// Check whether the target already carries a case for this name.
    ///
    /// With overwrite permitted the existing case block is purged from
    /// the target text; otherwise the whole run fails.
    pub fn resolve_conflict(&mut self, name: &str, force_replace: bool) -> Result<(), MergeError> {
        let exists = self.target.contains(&format!("case \"{name}\""))
            || self.target.contains(&format!("case '{name}'"));
        if !exists {
            return Ok(());
        }
        if !force_replace {
            return Err(MergeError::CaseConflict {
                name: name.to_string(),
            });
        }

        // Case label through the `;` that ends its return statement.
        // Best effort: assumes the block follows the emission shape.
        let pattern = format!(
            r#"(?s)case ["'`]{}["'`].*?["'`)];[ \t\r\n]"#,
            regex::escape(name)
        );
        let re = Regex::new(&pattern).unwrap();
        self.target = re.replace_all(&self.target, "").into_owned();
        Ok(())
    }

    /// Accumulate one document's fragments into the buckets.
    pub fn push(&mut self, name: String, fragments: CaseFragments) {
        if let Some(view_box) = fragments.view_box {
            self.buckets[0].push_str(&format!("{view_box}\n\n"));
        }
        if let Some(style) = fragments.style {
            self.buckets[1].push_str(&format!("{style}\n\n"));
        }
        if let Some(path) = fragments.path {
            self.buckets[2].push_str(&format!("{path}\n\n"));
        }
        self.previews.push(name);
    }

    /// Splice the buckets into the target text after their markers.
    ///
    /// A strict subset of missing markers is reported and skipped; all
    /// three missing makes the run fail, since there is no place left
    /// to insert generated code.
    pub fn splice(self) -> Result<(String, Vec<String>), MergeError> {
        let mut content = self.target;
        let mut missing = 0;

        for (marker, bucket) in MARKERS.iter().zip(&self.buckets) {
            match content.find(marker) {
                Some(index) => {
                    let after = index + marker.len();
                    content.insert_str(after, &format!("\n{bucket}"));
                }
                None => {
                    log!(
                        "warning";
                        "append \"{marker}\" under the relevant switch case to add data into your target file"
                    );
                    missing += 1;
                }
            }
        }

        if missing == MARKERS.len() {
            return Err(MergeError::MarkersMissing);
        }
        Ok((content, self.previews))
    }
}

// ============================================================================
// Merge run
// ============================================================================

/// Run the whole merge pipeline: process every source document, splice,
/// write artifacts, invoke the formatter.
pub fn run(config: &Config) -> Result<()> {
    let target_path = &config.paths.target;
    let target = fs::read_to_string(target_path)
        .with_context(|| format!("failed to read target {}", target_path.display()))?;
    let mut ctx = MergeContext::new(target)?;

    // Stale preview module from an earlier run
    let preview_module = config.preview_module();
    if preview_module.exists() {
        fs::remove_file(&preview_module)
            .with_context(|| format!("failed to remove {}", preview_module.display()))?;
    }

    let files = fsx::read_dir_sorted(&config.paths.source, "svg")?;
    for file in &files {
        let Some(name) = fsx::file_stem(file) else {
            continue;
        };
        let name = name.to_string();
        let raw = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;

        ctx.resolve_conflict(&name, config.options.force_replace)?;

        log!("merge"; "processing {}", name);
        let fragments = pipeline::process_document(&name, &raw, config.options.tint);
        ctx.push(name, fragments);
    }

    let (content, previews) = ctx.splice()?;

    fs::create_dir_all(&config.paths.preview).with_context(|| {
        format!(
            "failed to create preview directory {}",
            config.paths.preview.display()
        )
    })?;

    // The preview UI reads this copy; it also doubles as a demo of the
    // final result without touching the real target.
    fsx::write_atomic(&preview_module, &content)?;

    if !config.options.demo {
        fsx::write_atomic(target_path, &content)?;
        exec::format_file(target_path);
    }

    write_preview_index(config, previews)?;

    logger::success("\ncompleted");
    logger::success(
        "\nclick the link to raise issue & feedback: \nhttps://github.com/svgcase/svgcase/issues",
    );
    Ok(())
}

/// Write the ordered list of processed symbolic names for the preview UI.
fn write_preview_index(config: &Config, previews: Vec<String>) -> Result<()> {
    let index = PreviewIndex {
        svg_previews: previews,
    };
    let json = serde_json::to_string(&index)?;
    fsx::write_atomic(&config.preview_index(), &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal target wired the way the template module is.
    const TARGET: &str = "\
const getViewBox = (name) => {
    switch (name) {
        // NOTE: (SVG2JSX) DO NOT DELETE, ADD VIEWBOX.
        default:
            return '0 0 0 0';
    }
};

const getStyle = (name, color, prefix) => {
    switch (name) {
        // NOTE: (SVG2JSX) DO NOT DELETE, ADD STYLE.
        default:
            return;
    }
};

const getPath = (name, props, prefix) => {
    switch (name) {
        // NOTE: (SVG2JSX) DO NOT DELETE, ADD PATH.
        default:
            return <path prefix={prefix} a={prefix} b={prefix} />;
    }
};
";

    fn fragments(name: &str) -> CaseFragments {
        CaseFragments {
            view_box: Some(format!("case \"{name}\": return \"0 0 24 24\";")),
            style: Some(format!("case \"{name}\": \nreturn `.a{{}}`;")),
            path: Some(format!("case \"{name}\": \nreturn (<g {{...props}}><rect/></g>);")),
        }
    }

    #[test]
    fn test_prefix_integration_check() {
        let err = MergeContext::new("no integration here".to_string()).unwrap_err();
        assert!(matches!(err, MergeError::PrefixIntegration { found: 0 }));
        assert!(MergeContext::new(TARGET.to_string()).is_ok());
    }

    #[test]
    fn test_splice_inserts_after_each_marker() {
        let mut ctx = MergeContext::new(TARGET.to_string()).unwrap();
        ctx.push("arrow".to_string(), fragments("arrow"));
        let (content, previews) = ctx.splice().unwrap();

        assert_eq!(previews, vec!["arrow".to_string()]);
        for marker in MARKERS {
            let idx = content.find(marker).unwrap();
            let after = &content[idx + marker.len()..];
            assert!(after.starts_with("\ncase \"arrow\""));
        }
    }

    #[test]
    fn test_splice_all_markers_missing_aborts() {
        let target = format!("{}{}", "prefix ".repeat(5), "switch (name) {}");
        let mut ctx = MergeContext::new(target).unwrap();
        ctx.push("arrow".to_string(), fragments("arrow"));
        assert!(matches!(ctx.splice(), Err(MergeError::MarkersMissing)));
    }

    #[test]
    fn test_splice_subset_missing_proceeds() {
        let target = TARGET.replace("// NOTE: (SVG2JSX) DO NOT DELETE, ADD STYLE.", "");
        let mut ctx = MergeContext::new(target).unwrap();
        ctx.push("arrow".to_string(), fragments("arrow"));
        let (content, _) = ctx.splice().unwrap();
        assert!(content.contains("case \"arrow\": return \"0 0 24 24\";"));
        assert!(content.contains("<g {...props}><rect/></g>"));
    }

    #[test]
    fn test_conflict_without_force_fails() {
        let target = format!("{TARGET}\ncase \"arrow\": return \"0 0 24 24\";\n");
        let mut ctx = MergeContext::new(target).unwrap();
        let err = ctx.resolve_conflict("arrow", false).unwrap_err();
        assert!(matches!(err, MergeError::CaseConflict { name } if name == "arrow"));
    }

    #[test]
    fn test_conflict_with_force_purges_existing_block() {
        let target = format!("{TARGET}\ncase \"arrow\": return \"0 0 24 24\";\nrest");
        let mut ctx = MergeContext::new(target).unwrap();
        ctx.resolve_conflict("arrow", true).unwrap();
        assert!(!ctx.target.contains("case \"arrow\""));
        assert!(ctx.target.contains("rest"));
    }

    #[test]
    fn test_no_conflict_is_noop() {
        let mut ctx = MergeContext::new(TARGET.to_string()).unwrap();
        ctx.resolve_conflict("arrow", false).unwrap();
        assert_eq!(ctx.target, TARGET);
    }

    #[test]
    fn test_rerun_without_force_is_rejected() {
        // First run merges, second run against the spliced output conflicts
        let mut ctx = MergeContext::new(TARGET.to_string()).unwrap();
        ctx.push("arrow".to_string(), fragments("arrow"));
        let (merged, _) = ctx.splice().unwrap();

        let mut second = MergeContext::new(merged).unwrap();
        assert!(second.resolve_conflict("arrow", false).is_err());
    }

    // ------------------------------------------------------------------------
    // Full run
    // ------------------------------------------------------------------------

    use crate::config::Config;
    use tempfile::TempDir;

    fn demo_config(dir: &TempDir) -> Config {
        let mut config = Config::from_str("").unwrap();
        config.paths.source = dir.path().join("svg");
        config.paths.target = dir.path().join("svg.js");
        config.paths.preview = dir.path().join("public");
        config.options.demo = true;
        config
    }

    #[test]
    fn test_run_demo_writes_preview_artifacts_only() {
        let dir = TempDir::new().unwrap();
        let config = demo_config(&dir);

        fs::create_dir_all(&config.paths.source).unwrap();
        fs::write(
            config.paths.source.join("arrow.svg"),
            "<svg viewBox=\"0 0 24 24\"><path d=\"M0 0\"/></svg>",
        )
        .unwrap();
        fs::write(&config.paths.target, TARGET).unwrap();

        run(&config).unwrap();

        // Target untouched in demo mode
        assert_eq!(fs::read_to_string(&config.paths.target).unwrap(), TARGET);

        let preview = fs::read_to_string(config.preview_module()).unwrap();
        assert!(preview.contains("case \"arrow\": return \"0 0 24 24\";"));

        let index = fs::read_to_string(config.preview_index()).unwrap();
        assert_eq!(index, r#"{"svgPreviews":["arrow"]}"#);
    }

    #[test]
    fn test_run_aborts_before_any_write_when_markers_missing() {
        let dir = TempDir::new().unwrap();
        let config = demo_config(&dir);

        fs::create_dir_all(&config.paths.source).unwrap();
        fs::write(
            config.paths.source.join("arrow.svg"),
            "<svg viewBox=\"0 0 24 24\"><path d=\"M0 0\"/></svg>",
        )
        .unwrap();
        let no_markers = format!("{}{}", "prefix ".repeat(5), "switch (name) {}");
        fs::write(&config.paths.target, &no_markers).unwrap();

        assert!(run(&config).is_err());

        // Nothing was written anywhere
        assert_eq!(fs::read_to_string(&config.paths.target).unwrap(), no_markers);
        assert!(!config.preview_module().exists());
        assert!(!config.preview_index().exists());
    }
}
