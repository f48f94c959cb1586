//! Medialink - course media publishing for markdown lessons.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod logger;
mod store;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = Config::load(cli)?;

    match &cli.command {
        Commands::Reconcile { args } => cli::reconcile::run(&config, args),
        Commands::Embed { args } => cli::embed::run(&config, args),
        Commands::Fix { args } => cli::fix::run(&config, args),
        Commands::Upload { args } => cli::upload::run(&config, args),
        Commands::Bucket { args } => cli::bucket::run(&config, args),
    }
}
