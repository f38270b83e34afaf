//! Output formatting for CLI results.

use console::style;

use crate::models::{Classification, SearchResponse};
use crate::services::IndexSummary;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// Machine-parseable JSON format
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_search(query: &str, response: &SearchResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(response).unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            if response.hits.is_empty() {
                println!("No results for \"{}\"", query);
            }
            for hit in &response.hits {
                match hit.score {
                    Some(score) => println!(
                        "{:>3}. {}  {}",
                        hit.rank,
                        style(&hit.transcript_id).cyan(),
                        style(format!("(score {:.4})", score)).dim()
                    ),
                    None => println!("{:>3}. {}", hit.rank, style(&hit.transcript_id).cyan()),
                }
            }
            for warning in &response.warnings {
                eprintln!("{} {}", style("warning:").yellow().bold(), warning);
            }
        }
    }
}

pub fn print_topics(topics: &[String], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "topics": topics }))
                    .unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            if topics.is_empty() {
                println!("No topics extracted.");
            } else {
                for topic in topics {
                    println!("- {}", topic);
                }
            }
        }
    }
}

pub fn print_classification(result: Option<&Classification>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "classification": result }))
                    .unwrap_or_default()
            );
        }
        OutputFormat::Text => match result {
            Some(Classification::Category(category)) => {
                println!("Category: {}", style(category.label()).green())
            }
            Some(Classification::Unverified(raw)) => {
                println!(
                    "{} {} (does not match any category; review manually)",
                    style("Unverified response:").yellow().bold(),
                    raw
                );
            }
            None => println!("No classification produced."),
        },
    }
}

pub fn print_index_summary(summary: &IndexSummary, collection: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(summary).unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            println!();
            println!("Indexing summary for '{}':", collection);
            println!("  Indexed:            {}", style(summary.indexed).green());
            if summary.embedding_failures > 0 {
                println!(
                    "  Embedding failures: {}",
                    style(summary.embedding_failures).red()
                );
            }
            if summary.upsert_failures > 0 {
                println!(
                    "  Upsert failures:    {}",
                    style(summary.upsert_failures).red()
                );
            }
            if summary.cancelled {
                println!("  {}", style("Job was cancelled before completion.").yellow());
            }
            println!("  Duration:           {:.2}s", summary.duration_ms as f64 / 1000.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
