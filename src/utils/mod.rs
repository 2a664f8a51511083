//! Shared utilities: filesystem helpers, external commands, MIME detection.

pub mod exec;
pub mod fs;
pub mod mime;
