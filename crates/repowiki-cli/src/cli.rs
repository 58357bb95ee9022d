//! # CLI structure and argument parsing
//!
//! The command-line interface for `repowiki`, built with `clap` derive
//! macros. Global options select the repository and logging verbosity;
//! subcommands map one-to-one onto the views of the wiki:
//!
//! ```bash
//! # Rebuild the local scan of the repository
//! repowiki --repo octocat/wiki scan
//!
//! # Search pages (content-enriched scoring)
//! repowiki --repo octocat/wiki search "getting started"
//!
//! # Render one page as markup
//! repowiki --repo octocat/wiki show guides/intro
//!
//! # Browse and inspect
//! repowiki --repo octocat/wiki list --category guides
//! repowiki --repo octocat/wiki random
//! repowiki --repo octocat/wiki stats --output json
//! ```
//!
//! The repository can also come from the config file, in which case
//! `--repo` is optional.

use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Top-level CLI for the `repowiki` command.
#[derive(Debug, Parser)]
#[command(name = "repowiki", version, about = "Browse and search a repository-hosted Markdown wiki")]
pub struct Cli {
    /// Repository to browse, as owner/name. Overrides the config file.
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Branch raw content is served from.
    #[arg(long, global = true)]
    pub branch: Option<String>,

    /// Directory inside the repository holding the wiki pages.
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// Enable verbose logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug-level logging.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The wiki views exposed as subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan the repository now, bypassing the cached result.
    Scan,

    /// Search the wiki.
    Search {
        /// Free-text query.
        query: String,

        /// Maximum number of results to print.
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Metadata-only substring search; skips content fetching.
        #[arg(long)]
        fast: bool,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Render a page as markup.
    Show {
        /// Logical path of the page (as printed by `list`).
        page: String,

        /// Print the raw Markdown body instead of rendered markup.
        #[arg(long)]
        raw: bool,
    },

    /// Print the navigation tree of the scanned structure.
    Tree,

    /// List all pages.
    List {
        /// Only list pages in this category.
        #[arg(short, long)]
        category: Option<String>,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Restore a deep-linked view from a `?page=…` or `?search=…` query
    /// string (as printed by `show` and `search`).
    Open {
        /// The query string to restore.
        link: String,
    },

    /// Render an arbitrary page.
    Random,

    /// Show scan statistics.
    Stats {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
