//! pkgdeps CLI - rebuild tracking from the command line.
//!
//! Loads the eopkg repository index into a local `SQLite` database and
//! answers dependency and rebuild-queue queries against it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// pkgdeps: Dependency tracking and rebuild queue for package repositories.
#[derive(Parser)]
#[command(name = "pkgdeps")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Database file (defaults to the configured or cached location)
    #[arg(long, global = true, env = "PKGDEPS_DB")]
    db: Option<PathBuf>,

    /// Repository index XML (defaults to the system eopkg index)
    #[arg(long, global = true, env = "PKGDEPS_INDEX")]
    index: Option<PathBuf>,

    /// Configuration file
    #[arg(long, global = true, env = "PKGDEPS_CONFIG")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(short = 'N', long, global = true)]
    no_color: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the database from the repository index
    #[command(visible_aliases = ["rbd", "update", "up"])]
    Rebuild,

    /// Show the packages a package depends on
    #[command(visible_alias = "fwd")]
    Forward {
        /// Package name
        package: String,
    },

    /// Show the packages that depend on a package
    #[command(visible_alias = "rev")]
    Reverse {
        /// Package name
        package: String,
    },

    /// Show every package a full recursive rebuild would touch
    #[command(visible_alias = "ow")]
    Worst {
        /// Package name
        package: String,
    },

    /// Queue a package for rebuild
    #[command(visible_alias = "to")]
    Start {
        /// Package name
        package: String,
    },

    /// Mark a package as rebuilt
    #[command(visible_alias = "do")]
    Done {
        /// Package name
        package: String,

        /// Queue its reverse dependencies too (yes/no)
        #[arg(value_parser = cli::parse_yes_no, action = clap::ArgAction::Set)]
        cascade: bool,
    },

    /// Show the packages that are ready to rebuild
    #[command(visible_alias = "td")]
    Todo,

    /// Clear the rebuild list
    #[command(visible_alias = "clr")]
    Reset,

    /// Print the index dependency graph in Graphviz DOT format
    Graph,

    /// Show database statistics
    Stats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let result = cli::Paths::resolve(cli.config.as_deref(), cli.db, cli.index).and_then(|paths| {
        match cli.command {
            Commands::Rebuild => cli::rebuild::run(&paths),
            Commands::Forward { package } => cli::query::forward(&paths, &package),
            Commands::Reverse { package } => cli::query::reverse(&paths, &package),
            Commands::Worst { package } => cli::query::worst(&paths, &package),
            Commands::Start { package } => cli::queue::start(&paths, &package),
            Commands::Done { package, cascade } => cli::queue::done(&paths, &package, cascade),
            Commands::Todo => cli::queue::todo(&paths),
            Commands::Reset => cli::queue::reset(&paths),
            Commands::Graph => cli::graph::run(&paths),
            Commands::Stats => cli::stats::run(&paths),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
