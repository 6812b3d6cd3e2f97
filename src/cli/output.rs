//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::{Chunk, SearchRecord};
use crate::error::Error;
use crate::pipeline::{PageAnalysis, SearchOutcome};
use crate::storage::StorageStats;
use serde::Serialize;
use std::fmt::Write;

/// Characters of chunk content shown per result in text mode.
const PREVIEW_CHARS: usize = 240;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats aggregate statistics.
#[must_use]
pub fn format_stats(stats: &StorageStats, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_stats_text(stats),
        OutputFormat::Json => format_json(stats),
    }
}

fn format_stats_text(stats: &StorageStats) -> String {
    let mut output = String::new();
    output.push_str("sitesift statistics\n");
    output.push_str("===================\n\n");
    let _ = writeln!(output, "  Searches:      {}", stats.search_count);
    let _ = writeln!(output, "    pending:     {}", stats.pending_count);
    let _ = writeln!(output, "    processing:  {}", stats.processing_count);
    let _ = writeln!(output, "    completed:   {}", stats.completed_count);
    let _ = writeln!(output, "    failed:      {}", stats.failed_count);
    let _ = writeln!(output, "  Results:       {}", stats.result_count);
    if let Some(avg) = stats.avg_processing_time_ms {
        let _ = writeln!(output, "  Avg time:      {avg:.0} ms");
    }
    let _ = writeln!(output, "  Schema:        v{}", stats.schema_version);
    if let Some(size) = stats.db_size {
        let _ = writeln!(output, "  DB size:       {}", format_size(size));
    }
    output
}

/// Formats a list of search records.
#[must_use]
pub fn format_search_list(records: &[SearchRecord], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_search_list_text(records),
        OutputFormat::Json => format_json(&records),
    }
}

fn format_search_list_text(records: &[SearchRecord]) -> String {
    if records.is_empty() {
        return "No searches found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str("Searches:\n");
    let _ = writeln!(
        output,
        "{:<6} {:<11} {:<8} {:<30} Query",
        "ID", "Status", "Results", "URL"
    );
    output.push_str(&"-".repeat(72));
    output.push('\n');

    for record in records {
        let results = record
            .results_count
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let _ = writeln!(
            output,
            "{:<6} {:<11} {:<8} {:<30} {}",
            record.id,
            record.status.as_str(),
            results,
            truncate(&record.website_url, 30),
            truncate(&record.search_query, 40)
        );
    }

    output
}

/// Formats one search record with its stored results.
#[must_use]
pub fn format_search_detail(
    record: &SearchRecord,
    results: &[Chunk],
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "Search {}", record.id);
            let _ = writeln!(output, "  URL:        {}", record.website_url);
            let _ = writeln!(output, "  Query:      {}", record.search_query);
            let _ = writeln!(output, "  Status:     {}", record.status);
            if let Some(ms) = record.processing_time_ms {
                let _ = writeln!(output, "  Time:       {ms} ms");
            }
            if let Some(total) = record.total_chunks {
                let _ = writeln!(output, "  Chunks:     {total}");
            }
            if let Some(tier) = &record.scoring_tier {
                let _ = writeln!(output, "  Tier:       {tier}");
            }
            if let Some(source) = &record.fetch_source {
                let _ = writeln!(output, "  Source:     {source}");
            }
            if let Some(error) = &record.error_message {
                let _ = writeln!(output, "  Error:      {error}");
            }
            if !results.is_empty() {
                output.push('\n');
                write_chunks_text(&mut output, results);
            }
            output
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "search": record,
                "results": results,
            });
            format_json(&json)
        }
    }
}

/// Formats the outcome of a `search` command.
#[must_use]
pub fn format_outcome(
    search_id: i64,
    query: &str,
    outcome: &SearchOutcome,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let tier = outcome.tier.map_or("none", |t| t.as_str());
            let _ = writeln!(
                output,
                "Search {search_id}: {} of {} chunks for \"{query}\" ({tier} tier, {} source, {} ms)\n",
                outcome.results_count,
                outcome.total_chunks,
                outcome.fetch_source,
                outcome.processing_time_ms
            );
            if outcome.chunks.is_empty() {
                output.push_str("No content found on the page.\n");
            } else {
                write_chunks_text(&mut output, &outcome.chunks);
            }
            output
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "search_id": search_id,
                "outcome": outcome,
            });
            format_json(&json)
        }
    }
}

/// Formats the result of an offline `extract`.
#[must_use]
pub fn format_analysis(query: &str, analysis: &PageAnalysis, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let tier = analysis.ranked.tier.map_or("none", |t| t.as_str());
            let _ = writeln!(
                output,
                "{} of {} chunks for \"{query}\" ({tier} tier)\n",
                analysis.ranked.len(),
                analysis.total_chunks
            );
            if analysis.ranked.is_empty() {
                output.push_str("No content found.\n");
            } else {
                write_chunks_text(&mut output, &analysis.ranked.chunks);
            }
            output
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "query": query,
                "total_chunks": analysis.total_chunks,
                "tier": analysis.ranked.tier,
                "results_count": analysis.ranked.len(),
                "chunks": analysis.ranked.chunks,
            });
            format_json(&json)
        }
    }
}

/// Formats an error for the given output format.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => format_json(&serde_json::json!({ "error": error.to_string() })),
    }
}

fn write_chunks_text(output: &mut String, chunks: &[Chunk]) {
    for (rank, chunk) in chunks.iter().enumerate() {
        let _ = writeln!(
            output,
            "#{} [chunk {}, {}, score {}, ~{} tokens]",
            rank + 1,
            chunk.chunk_index,
            chunk.content_context,
            format_score(chunk.relevance_score),
            chunk.estimated_tokens
        );
        let _ = writeln!(output, "{}\n", truncate(&chunk.content, PREVIEW_CHARS));
    }
}

/// Formats a score for display, using scientific notation for very small values.
fn format_score(score: f64) -> String {
    if score == 0.0 {
        "0".to_string()
    } else if score.abs() < 0.0001 {
        format!("{score:.2e}")
    } else {
        format!("{score:.4}")
    }
}

fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a byte size as human-readable.
#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Truncates to `max_chars` characters with an ellipsis.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        s.chars().take(max_chars).collect()
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{head}...")
    }
}
