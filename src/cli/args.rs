//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// svgcase CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path
    #[arg(short = 'C', long, default_value = "svgcase.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Merge the source documents into the target module
    #[command(visible_alias = "m")]
    Merge {
        /// Overwrite existing case labels in the target module
        #[arg(short, long)]
        force_replace: bool,

        /// Parametrize fixed colors as a `${color}` placeholder
        #[arg(short, long)]
        tint: bool,

        /// Write only the preview module, never the real target
        #[arg(short, long)]
        demo: bool,

        /// Port number for the preview server
        #[arg(short, long)]
        port: Option<u16>,

        /// Skip starting the preview server after merging
        #[arg(long)]
        no_serve: bool,

        /// Enable verbose output for debugging
        #[arg(short = 'V', long)]
        verbose: bool,
    },

    /// Normalize source documents in place (unique scoping classes)
    #[command(visible_alias = "n")]
    Normalize {
        /// Enable verbose output for debugging
        #[arg(short = 'V', long)]
        verbose: bool,
    },

    /// Serve the preview directory without merging
    #[command(visible_alias = "s")]
    Serve {
        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_merge(&self) -> bool {
        matches!(self.command, Commands::Merge { .. })
    }
    pub const fn is_normalize(&self) -> bool {
        matches!(self.command, Commands::Normalize { .. })
    }
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }

    /// Whether the selected command asked for verbose output.
    pub const fn verbose(&self) -> bool {
        match &self.command {
            Commands::Merge { verbose, .. } | Commands::Normalize { verbose } => *verbose,
            Commands::Serve { .. } => false,
        }
    }
}
