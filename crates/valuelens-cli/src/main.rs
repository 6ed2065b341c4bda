//! valuelens CLI
//!
//! Command-line interface for lexical value and context analysis.
//!
//! ## Usage
//!
//! ```bash
//! # Detect taxonomy values in a text
//! valuelens values --taxonomy taxonomy.yaml --input statement.txt
//!
//! # Pipe from stdin
//! cat statement.txt | valuelens context --explain
//!
//! # Profile values scored upstream, with a curated conflict table
//! valuelens profile --scored scored.json --conflicts conflicts.yaml --format json
//!
//! # Validate a taxonomy
//! valuelens taxonomy validate taxonomy.yaml
//! ```
//!
//! ## Exit Codes
//!
//! - 0: Success
//! - 1: Invalid configuration (`taxonomy validate` only)
//! - 3: Error

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use valuelens_core::{
    ConflictTable, ContextAnalyzer, DetectedValue, EthicalProfiler, Profile, ProfileOptions,
    ScoredValue, Taxonomy, ValueDefinition, ValueMatcher,
};

/// valuelens: lexical ethics analysis
#[derive(Parser)]
#[command(name = "valuelens")]
#[command(version)]
#[command(about = "Detect ethical values, score context and build value profiles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect taxonomy values in a text
    Values {
        /// Path to the value taxonomy (YAML or JSON)
        #[arg(short, long)]
        taxonomy: PathBuf,

        /// Path to the text to analyze (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Score the twelve context dimensions of a text
    Context {
        /// Path to the text to analyze (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Show the tier and keyword behind each score
        #[arg(long)]
        explain: bool,
    },

    /// Build a profile from salience-scored values (JSON array)
    Profile {
        /// Path to the scored values
        #[arg(short, long)]
        scored: PathBuf,

        /// Curated conflict table (YAML or JSON)
        #[arg(short, long)]
        conflicts: Option<PathBuf>,

        /// Number of top values to report
        #[arg(long, default_value_t = 5)]
        top: usize,

        /// Include evidence and boost statistics
        #[arg(long)]
        verbose: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Taxonomy management commands
    Taxonomy {
        #[command(subcommand)]
        action: TaxonomyAction,
    },
}

#[derive(Subcommand)]
enum TaxonomyAction {
    /// Validate a taxonomy file
    Validate {
        /// Path to the taxonomy file
        path: PathBuf,
    },

    /// Show taxonomy details
    Show {
        /// Path to the taxonomy file
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(3)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Values {
            taxonomy,
            input,
            format,
        } => values_command(taxonomy, input, format),

        Commands::Context {
            input,
            format,
            explain,
        } => context_command(input, format, explain),

        Commands::Profile {
            scored,
            conflicts,
            top,
            verbose,
            format,
        } => profile_command(scored, conflicts, top, verbose, format),

        Commands::Taxonomy { action } => match action {
            TaxonomyAction::Validate { path } => validate_taxonomy(path),
            TaxonomyAction::Show { path } => show_taxonomy(path),
        },
    }
}

fn read_input(path: Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read input from {:?}", path)),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

fn load_taxonomy(path: &Path) -> Result<Taxonomy> {
    Taxonomy::from_file(path).with_context(|| format!("Failed to load taxonomy from {:?}", path))
}

fn values_command(taxonomy_path: PathBuf, input: Option<PathBuf>, format: OutputFormat) -> Result<ExitCode> {
    let matcher = ValueMatcher::new(load_taxonomy(&taxonomy_path)?);
    let text = read_input(input)?;
    let detected = matcher.match_values(&text);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&detected)?);
        }
        OutputFormat::Text => print_values(&detected),
    }

    Ok(ExitCode::from(0))
}

fn print_values(detected: &[DetectedValue]) {
    if detected.is_empty() {
        println!("No values detected");
        return;
    }

    for value in detected {
        println!(
            "{} [{}] polarity {} ({:?}), {} marker hit(s)",
            value.name, value.domain, value.polarity, value.stance, value.keyword_count
        );
        println!("  evidence: {}", value.evidence.join(", "));
    }
}

fn context_command(input: Option<PathBuf>, format: OutputFormat, explain: bool) -> Result<ExitCode> {
    let analyzer = ContextAnalyzer::new();
    let text = read_input(input)?;

    match (format, explain) {
        (OutputFormat::Json, false) => {
            println!("{}", serde_json::to_string_pretty(&analyzer.analyze(&text))?);
        }
        (OutputFormat::Json, true) => {
            println!("{}", serde_json::to_string_pretty(&analyzer.explain(&text))?);
        }
        (OutputFormat::Text, _) => {
            let mut category = None;
            for reading in analyzer.explain(&text) {
                if category != Some(reading.category) {
                    println!("{:?}", reading.category);
                    category = Some(reading.category);
                }
                print!("  {:<26} {:.2}", reading.dimension.as_str(), reading.score);
                if explain {
                    match (&reading.tier, &reading.keyword) {
                        (Some(tier), Some(keyword)) => print!("  ({} via \"{}\")", tier, keyword),
                        _ => print!("  (default)"),
                    }
                }
                println!();
            }
        }
    }

    Ok(ExitCode::from(0))
}

fn profile_command(
    scored_path: PathBuf,
    conflicts_path: Option<PathBuf>,
    top: usize,
    verbose: bool,
    format: OutputFormat,
) -> Result<ExitCode> {
    let content = std::fs::read_to_string(&scored_path)
        .with_context(|| format!("Failed to read scored values from {:?}", scored_path))?;
    let scored: Vec<ScoredValue> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse scored values from {:?}", scored_path))?;

    let profiler = match conflicts_path {
        Some(path) => EthicalProfiler::with_conflict_table(
            ConflictTable::from_file(&path)
                .with_context(|| format!("Failed to load conflict table from {:?}", path))?,
        ),
        None => EthicalProfiler::default(),
    };

    let options = ProfileOptions {
        top_values_count: top,
        verbose,
    };
    let profile = profiler.generate_profile(&scored, &options);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        OutputFormat::Text => print_profile(&profile),
    }

    Ok(ExitCode::from(0))
}

fn print_profile(profile: &Profile) {
    println!("Dominant domain: {}", profile.dominant_domain);
    println!("Confidence: {:.0}%", profile.confidence * 100.0);
    println!();

    println!("Domain scores:");
    for (domain, score) in &profile.domain_scores {
        println!("  {:<14} {:.2}", domain, score);
    }
    println!();

    println!("Top values:");
    for (i, value) in profile.top_values.iter().enumerate() {
        print!(
            "  {}. {} [{}] {:.2} polarity {}",
            i + 1,
            value.name,
            value.domain,
            value.salience,
            value.polarity
        );
        if !value.boosted_by.is_empty() {
            print!(" ({})", value.boosted_by.join(", "));
        }
        println!();
    }

    if !profile.conflicts.is_empty() {
        println!();
        println!("Conflicts (max tension {:.2}):", profile.conflict_score);
        for conflict in &profile.conflicts {
            println!(
                "  - {} vs {}: {:.2} ({:?})",
                conflict.value1, conflict.value2, conflict.tension, conflict.source
            );
            if !conflict.description.is_empty() {
                println!("    {}", conflict.description);
            }
        }
    }

    if let Some(metadata) = &profile.metadata {
        println!();
        println!("Evidence items: {}", metadata.total_evidence);
        println!(
            "Keyword/entailed values: {}/{}",
            metadata.keyword_values, metadata.entailed_values
        );
        println!(
            "Frame/role boosted: {}/{}",
            metadata.frame_boosted, metadata.role_boosted
        );
        println!("Average score: {:.2}", metadata.average_score);
    }
}

fn validate_taxonomy(path: PathBuf) -> Result<ExitCode> {
    match Taxonomy::from_file(&path) {
        Ok(taxonomy) => {
            println!("Taxonomy is valid: {} value(s)", taxonomy.values.len());
            println!("Domains: {}", taxonomy.domains().join(", "));
            Ok(ExitCode::from(0))
        }
        Err(e) => {
            eprintln!("Taxonomy validation failed: {}", e);
            Ok(ExitCode::from(1))
        }
    }
}

/// Values whose domain matches `domain` under the grouping used by
/// [`Taxonomy::domains`].
fn values_in_domain<'a>(
    taxonomy: &'a Taxonomy,
    domain: &str,
) -> impl Iterator<Item = &'a ValueDefinition> {
    let key = domain.to_lowercase();
    taxonomy
        .values
        .iter()
        .filter(move |value| value.domain.to_lowercase() == key)
}

fn show_taxonomy(path: PathBuf) -> Result<ExitCode> {
    let taxonomy = load_taxonomy(&path)?;

    for domain in taxonomy.domains() {
        println!("{}:", domain);
        for value in values_in_domain(&taxonomy, domain) {
            println!("  {}", value.name);
            println!("    markers: {}", value.semantic_markers.join(", "));
            let indicators = &value.polarity_indicators;
            if !indicators.upholding.is_empty() {
                println!("    upholding: {}", indicators.upholding.join(", "));
            }
            if !indicators.violating.is_empty() {
                println!("    violating: {}", indicators.violating.join(", "));
            }
        }
        println!();
    }

    Ok(ExitCode::from(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_listing_groups_non_ascii_case() {
        let taxonomy = Taxonomy::new(vec![
            ValueDefinition::new("Würde", "ÉTHIQUE", &["würde"]),
            ValueDefinition::new("Soin", "éthique", &["soin"]),
        ])
        .unwrap();

        let domains = taxonomy.domains();
        assert_eq!(domains, vec!["ÉTHIQUE"]);
        let names: Vec<&str> = values_in_domain(&taxonomy, domains[0])
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(names, vec!["Würde", "Soin"]);
    }
}
