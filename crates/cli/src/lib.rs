mod check;
mod export;
mod find;
mod fmt;
mod locate;
mod source;
mod stats;
mod tree;
mod view;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "navtree",
    version,
    about = "Inspect, check and rewrite Doxygen navigation tree data",
    long_about = "navtree reads the navtreedata.js file Doxygen writes next to its HTML output, \
                  together with the deferred child scripts and navtreeindex chunks it refers to. \
                  It checks the structure, prints and searches the tree, and rewrites the data \
                  in canonical form."
)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check the structure of navigation data
    #[command(
        long_about = "Validates titles, links, child lists and the index sequence. When PATH is a \
                      directory, deferred scripts and index chunks are checked as well. Exits with \
                      status 1 when errors are found."
    )]
    Check {
        /// HTML output directory or navtreedata.js file
        #[arg(value_name = "PATH")]
        path: PathBuf,
        /// Treat missing deferred scripts as fatal
        #[arg(long)]
        strict: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the navigation tree
    Tree {
        #[arg(value_name = "PATH")]
        path: PathBuf,
        /// Stop below this depth
        #[arg(short, long)]
        depth: Option<usize>,
        /// Show link targets
        #[arg(short, long)]
        links: bool,
        /// Do not load deferred child scripts
        #[arg(long)]
        no_resolve: bool,
    },
    /// Dump the parsed model as JSON
    Json {
        #[arg(value_name = "PATH")]
        path: PathBuf,
        /// Single-line output
        #[arg(long)]
        compact: bool,
        /// Include index chunks
        #[arg(long)]
        with_index: bool,
    },
    /// Rewrite a data script in canonical form
    #[command(
        long_about = "Accepts navtreedata.js, a deferred child script or a navtreeindex chunk. \
                      Output goes to stdout unless --output is given."
    )]
    Fmt {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only report whether the file is already canonical
        #[arg(long)]
        check: bool,
    },
    /// Find the tree position of a page URL
    Locate {
        /// HTML output directory
        #[arg(value_name = "PATH")]
        path: PathBuf,
        /// Page, optionally with an anchor (group__adc.html#ga12)
        #[arg(value_name = "URL")]
        url: String,
    },
    /// Resolve a title path or search titles
    Find {
        #[arg(value_name = "PATH")]
        path: PathBuf,
        /// `/A/B` absolute, `../B` relative to --from, or a title fragment
        #[arg(value_name = "QUERY")]
        query: String,
        /// Title path used as the base of relative queries
        #[arg(long)]
        from: Option<String>,
    },
    /// Show tree statistics
    Stats {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

pub fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let _guard = navtree_core::logging::init_logging("cli", true, level);

    match cli.command {
        Commands::Check { path, strict, json } => check::run(&path, strict, json),
        Commands::Tree {
            path,
            depth,
            links,
            no_resolve,
        } => tree::run(&path, depth, links, no_resolve),
        Commands::Json {
            path,
            compact,
            with_index,
        } => export::run(&path, compact, with_index),
        Commands::Fmt {
            file,
            output,
            check,
        } => fmt::run(&file, output.as_deref(), check),
        Commands::Locate { path, url } => locate::run(&path, &url),
        Commands::Find { path, query, from } => find::run(&path, &query, from.as_deref()),
        Commands::Stats { path } => stats::run(&path),
    }
}
