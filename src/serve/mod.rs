//! Static preview server.
//!
//! Serves the preview directory (preview module, preview index, any UI
//! assets) after a successful merge run. Single-threaded request loop;
//! the preview is a local, one-user tool.

use crate::config::Config;
use crate::log;
use crate::utils::mime;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tiny_http::{Header, Request, Response, Server};

/// Bind and run the preview server (blocking).
pub fn run(config: &Config) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.serve.port);
    let server = Server::http(&addr)
        .map_err(|err| anyhow::anyhow!("failed to bind {addr}: {err}"))?;

    ctrlc::set_handler(|| std::process::exit(0))
        .context("failed to register shutdown handler")?;

    log!("serve"; "click the link to see the preview: http://localhost:{}", config.serve.port);

    for request in server.incoming_requests() {
        if let Err(err) = handle_request(request, &config.paths.preview) {
            log!("serve"; "request error: {err}");
        }
    }
    Ok(())
}

/// Handle a single request against the preview directory.
fn handle_request(request: Request, root: &Path) -> Result<()> {
    match resolve(root, request.url()) {
        Some(path) => {
            let content_type = mime::from_path(&path);
            let body = fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let header = Header::from_bytes("Content-Type", content_type)
                .expect("static header is valid");
            request.respond(Response::from_data(body).with_header(header))?;
        }
        None => {
            request.respond(Response::from_string("404 Not Found").with_status_code(404))?;
        }
    }
    Ok(())
}

/// Map a request URL onto a file inside the preview directory.
///
/// `/` falls back to `index.html`. Parent components are rejected so a
/// request cannot escape the preview root.
fn resolve(root: &Path, url: &str) -> Option<PathBuf> {
    let trimmed = url.split('?').next().unwrap_or(url).trim_start_matches('/');
    let relative = if trimmed.is_empty() { "index.html" } else { trimmed };

    let candidate = Path::new(relative);
    if candidate
        .components()
        .any(|component| matches!(component, Component::ParentDir))
    {
        return None;
    }

    let path = root.join(candidate);
    path.is_file().then_some(path)
}
