//! svgcase - convert a directory of SVG sources into generated JSX
//! switch-case modules.

#![allow(dead_code)]

mod cli;
mod config;
mod extract;
mod logger;
mod merge;
mod normalize;
mod pipeline;
mod rewrite;
mod serve;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::Config;

fn main() {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose());

    if let Err(err) = run(&cli) {
        log!("error"; "{err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli)?;

    match &cli.command {
        Commands::Merge { no_serve, .. } => {
            // The config file can route a whole project to the
            // normalization pipeline without changing the invocation.
            if config.options.direct {
                return normalize::run(&config);
            }
            merge::run(&config)?;
            if *no_serve {
                return Ok(());
            }
            serve::run(&config)
        }
        Commands::Normalize { .. } => normalize::run(&config),
        Commands::Serve { .. } => serve::run(&config),
    }
}
