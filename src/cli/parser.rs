//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::core::{DEFAULT_MAX_RESULTS, DEFAULT_MAX_TOKENS_PER_CHUNK};
use crate::fetch::FetchConfig;

/// sitesift: search a web page for the passages that answer a question.
///
/// Fetches a page, strips it down to prose, splits it into chunks, and
/// ranks the chunks against a natural-language query. Searches and their
/// results are kept in a local `SQLite` database.
#[derive(Parser, Debug)]
#[command(name = "sitesift")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the sitesift database file.
    ///
    /// Defaults to `.sitesift/sitesift.db` in the current directory.
    #[arg(short, long, env = "SITESIFT_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Enable verbose output (debug logging on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// Reader service prefix used for script-rendered pages.
    #[arg(long, env = "SITESIFT_READER_ENDPOINT", global = true)]
    pub reader_endpoint: Option<String>,

    /// User agent for page requests.
    #[arg(long, env = "SITESIFT_USER_AGENT", global = true)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, env = "SITESIFT_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Never fall back to the reader service.
    #[arg(long, global = true)]
    pub no_reader: bool,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the sitesift database.
    ///
    /// Creates the database file and schema if they don't exist.
    Init {
        /// Force re-initialization (destroys existing data).
        #[arg(short, long)]
        force: bool,
    },

    /// Search a web page.
    ///
    /// Records the search, runs it, and stores the ranked chunks.
    Search {
        /// Absolute http(s) URL of the page.
        url: String,

        /// What to look for.
        query: String,

        /// Maximum number of chunks to return.
        #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: usize,

        /// Token budget per chunk.
        #[arg(short = 't', long, default_value_t = DEFAULT_MAX_TOKENS_PER_CHUNK)]
        max_tokens: usize,
    },

    /// List past searches.
    #[command(name = "history", alias = "ls")]
    History {
        /// Maximum number of searches to list.
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show a search and its stored results.
    Show {
        /// Search ID.
        id: i64,
    },

    /// Delete a search and its results.
    #[command(name = "delete", alias = "rm")]
    Delete {
        /// Search ID.
        id: i64,

        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show aggregate statistics.
    Stats,

    /// Rank the chunks of a local HTML file (no network, no database).
    Extract {
        /// Path to the HTML file.
        file: PathBuf,

        /// What to look for.
        query: String,

        /// Maximum number of chunks to return.
        #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: usize,

        /// Token budget per chunk.
        #[arg(short = 't', long, default_value_t = DEFAULT_MAX_TOKENS_PER_CHUNK)]
        max_tokens: usize,
    },
}

impl Cli {
    /// Returns the database path, using the default if not specified.
    #[must_use]
    pub fn get_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::storage::DEFAULT_DB_PATH))
    }

    /// Builds the fetcher configuration from flags and environment.
    #[must_use]
    pub fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig::new().with_reader_enabled(!self.no_reader);
        if let Some(endpoint) = &self.reader_endpoint {
            config = config.with_reader_endpoint(endpoint.as_str());
        }
        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent.as_str());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}
