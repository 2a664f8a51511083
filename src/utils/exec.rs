//! External command execution for the code formatter.
//!
//! The formatter is an external collaborator: its failure is reported but
//! never fails the run.

use crate::log;
use std::path::Path;
use std::process::Command;

/// Run `npx prettier --write` on the generated module, when available.
///
/// Skipped silently when `npx` is not on PATH.
pub fn format_file(path: &Path) {
    if which::which("npx").is_err() {
        log!("format"; "npx not found, skipping prettier for {}", path.display());
        return;
    }

    let status = Command::new("npx")
        .args(["prettier", "--write"])
        .arg(path)
        .status();

    match status {
        Ok(status) if status.success() => {
            log!("format"; "formatted {}", path.display());
        }
        Ok(status) => {
            log!("format"; "prettier exited with {status} for {}", path.display());
        }
        Err(err) => {
            log!("format"; "failed to spawn prettier: {err}");
        }
    }
}
