use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Progress and phase summaries (default)
    Info,
    /// Per-entity decisions
    Debug,
    /// Everything
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// How command results are printed to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Wiring policy override
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    Permissive,
    Defensive,
}

#[derive(Parser)]
#[command(name = "lexis")]
#[command(about = "lexis - build and enrich a lexical graph from a WordNet-style corpus")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, RUST_LOG is honoured and defaults to 'info'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/lexis/config.toml)
    #[arg(short = 'C', long, global = true, env = "LEXIS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for command results
    #[arg(short = 'f', long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub overrides: Overrides,
}

/// Config overrides shared by every command
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// JSON-lines corpus export (overrides corpus.path)
    #[arg(long, global = true)]
    pub corpus: Option<PathBuf>,

    /// Restrict passes to these parts of speech, comma separated
    #[arg(long = "pos", global = true, value_delimiter = ',')]
    pub parts_of_speech: Vec<String>,

    /// Restrict passes to the first N in-scope concepts
    #[arg(long, global = true)]
    pub limit: Option<usize>,

    /// Concepts per bulk upsert (overrides ingest.batch_size)
    #[arg(long, global = true)]
    pub batch_size: Option<usize>,

    /// Graph database path, or ':memory:' (overrides store.path)
    #[arg(long = "db", global = true)]
    pub db_path: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load, wire, aggregate and classify the corpus
    Ingest {
        /// Wire straight from the corpus, creating nodes as they are reached
        #[arg(long)]
        skip_load: bool,
    },

    /// Bulk-load concept and lemma identities only
    LoadNodes,

    /// Wire relationships over already-loaded nodes
    Wire {
        /// Override the configured wiring policy
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
    },

    /// Collapse lemmas into root words
    Aggregate,

    /// Tag Object concepts and RootWordObject root words
    Classify,

    /// Connect RootWordObjects to their embedding nearest neighbours
    Similarity {
        /// Neighbours per root word
        #[arg(long)]
        top_k: Option<usize>,

        /// Skip root words that already have similar-to edges
        #[arg(long)]
        resume: bool,

        /// Word-vector file (overrides similarity.embeddings.vectors_path)
        #[arg(long)]
        vectors: Option<PathBuf>,
    },

    /// Extract category relations with the fill-mask service
    Relations {
        /// Template table, one '<sentence>;<CATEGORY>' per line
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Candidates per sentence
        #[arg(long)]
        top_k: Option<usize>,

        /// Restrict candidates to these tokens, comma separated
        #[arg(long, value_delimiter = ',')]
        targets: Vec<String>,

        /// Reprocess root words finished by an earlier run
        #[arg(long)]
        no_resume: bool,

        /// Revisit root words whose last attempt failed
        #[arg(long)]
        retry_failed: bool,
    },

    /// Show entity, edge and tag counts
    Stats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_with_shared_overrides() {
        let cli = Cli::try_parse_from([
            "lexis",
            "ingest",
            "--skip-load",
            "--corpus",
            "wordnet.jsonl",
            "--pos",
            "n,v",
            "--limit",
            "50",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Ingest { skip_load: true }));
        assert_eq!(cli.overrides.corpus, Some(PathBuf::from("wordnet.jsonl")));
        assert_eq!(cli.overrides.parts_of_speech, vec!["n", "v"]);
        assert_eq!(cli.overrides.limit, Some(50));
    }

    #[test]
    fn test_wire_policy_parses() {
        let cli = Cli::try_parse_from(["lexis", "wire", "--policy", "defensive"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Wire {
                policy: Some(PolicyArg::Defensive)
            }
        ));
    }

    #[test]
    fn test_relations_flags() {
        let cli = Cli::try_parse_from([
            "lexis",
            "relations",
            "--templates",
            "relations.txt",
            "--targets",
            "tool,weapon",
            "--retry-failed",
            "-f",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Relations {
                templates,
                targets,
                no_resume,
                retry_failed,
                ..
            } => {
                assert_eq!(templates, Some(PathBuf::from("relations.txt")));
                assert_eq!(targets, vec!["tool", "weapon"]);
                assert!(!no_resume);
                assert!(retry_failed);
            }
            _ => panic!("expected relations command"),
        }
    }

    #[test]
    fn test_verbose_and_log_level_are_global() {
        let cli = Cli::try_parse_from(["lexis", "stats", "-v", "-l", "warn"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.log_level, Some(LogLevel::Warn));
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["lexis"]).is_err());
    }
}
