//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::chunking::default_chunker;
use crate::cli::output::{
    OutputFormat, format_analysis, format_outcome, format_search_detail, format_search_list,
    format_stats,
};
use crate::cli::parser::{Cli, Commands};
use crate::core::SearchRequest;
use crate::error::{CommandError, Result, StorageError};
use crate::fetch::HttpFetcher;
use crate::pipeline::{Pipeline, analyze_page};
use crate::storage::{SqliteStorage, Storage};
use std::path::Path;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let db_path = cli.get_db_path();

    match &cli.command {
        Commands::Init { force } => cmd_init(&db_path, *force),
        Commands::Search {
            url,
            query,
            max_results,
            max_tokens,
        } => {
            let request = SearchRequest::new(url.as_str(), query.as_str())
                .with_max_results(*max_results)
                .with_max_tokens_per_chunk(*max_tokens);
            cmd_search(cli, &db_path, &request, format)
        }
        Commands::History { limit } => cmd_history(&db_path, *limit, format),
        Commands::Show { id } => cmd_show(&db_path, *id, format),
        Commands::Delete { id, yes } => cmd_delete(&db_path, *id, *yes),
        Commands::Stats => cmd_stats(&db_path, format),
        Commands::Extract {
            file,
            query,
            max_results,
            max_tokens,
        } => cmd_extract(file, query, *max_results, *max_tokens, format),
    }
}

fn open_storage(db_path: &Path) -> Result<SqliteStorage> {
    if !db_path.exists() {
        return Err(StorageError::NotInitialized.into());
    }

    let storage = SqliteStorage::open(db_path)?;

    if !storage.is_initialized()? {
        return Err(StorageError::NotInitialized.into());
    }

    Ok(storage)
}

// ==================== Command Implementations ====================

fn cmd_init(db_path: &Path, force: bool) -> Result<String> {
    if db_path.exists() && !force {
        return Err(CommandError::ExecutionFailed(
            "Database already exists. Use --force to reinitialize.".to_string(),
        )
        .into());
    }

    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            CommandError::ExecutionFailed(format!("Failed to create directory: {e}"))
        })?;
    }

    if force && db_path.exists() {
        std::fs::remove_file(db_path).map_err(|e| {
            CommandError::ExecutionFailed(format!("Failed to remove existing database: {e}"))
        })?;
    }

    let mut storage = SqliteStorage::open(db_path)?;
    storage.init()?;

    Ok(format!(
        "Initialized sitesift database at: {}\n",
        db_path.display()
    ))
}

fn cmd_search(
    cli: &Cli,
    db_path: &Path,
    request: &SearchRequest,
    format: OutputFormat,
) -> Result<String> {
    let mut storage = open_storage(db_path)?;
    let fetcher = HttpFetcher::new(&cli.fetch_config())?;
    let pipeline = Pipeline::new(fetcher);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CommandError::ExecutionFailed(format!("Failed to start runtime: {e}")))?;

    let (search_id, result) = runtime.block_on(pipeline.submit(&mut storage, request))?;
    let outcome = result?;

    Ok(format_outcome(
        search_id,
        &request.search_query,
        &outcome,
        format,
    ))
}

fn cmd_history(db_path: &Path, limit: usize, format: OutputFormat) -> Result<String> {
    let storage = open_storage(db_path)?;
    let records = storage.list_searches(limit)?;
    Ok(format_search_list(&records, format))
}

fn cmd_show(db_path: &Path, id: i64, format: OutputFormat) -> Result<String> {
    let storage = open_storage(db_path)?;
    let record = storage
        .get_search(id)?
        .ok_or(StorageError::SearchNotFound { id })?;
    let results = storage.get_results(id)?;
    Ok(format_search_detail(&record, &results, format))
}

fn cmd_delete(db_path: &Path, id: i64, yes: bool) -> Result<String> {
    if !yes {
        return Err(
            CommandError::ExecutionFailed("Use --yes to confirm deletion.".to_string()).into(),
        );
    }

    let mut storage = open_storage(db_path)?;
    storage.delete_search(id)?;

    Ok(format!("Deleted search: {id}\n"))
}

fn cmd_stats(db_path: &Path, format: OutputFormat) -> Result<String> {
    let storage = open_storage(db_path)?;
    let stats = storage.stats()?;
    Ok(format_stats(&stats, format))
}

fn cmd_extract(
    file: &Path,
    query: &str,
    max_results: usize,
    max_tokens: usize,
    format: OutputFormat,
) -> Result<String> {
    if query.trim().is_empty() {
        return Err(CommandError::InvalidArgument("query must not be empty".to_string()).into());
    }
    if max_results == 0 || max_tokens == 0 {
        return Err(CommandError::InvalidArgument(
            "--max-results and --max-tokens must be at least 1".to_string(),
        )
        .into());
    }

    let html = std::fs::read_to_string(file)?;
    let analysis = analyze_page(&html, &default_chunker(), query, max_results, max_tokens);
    Ok(format_analysis(query, &analysis, format))
}
