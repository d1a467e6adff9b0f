use std::path::PathBuf;

use clap::Parser;

use crate::config::Provider;
use crate::pipeline::DEFAULT_LANGUAGE;

/// Generate Anki flashcards from Obsidian Markdown notes using a local LLM.
#[derive(Parser)]
#[command(name = "ankigen", version, about)]
pub struct Args {
    /// Path to the Obsidian vault directory
    pub vault_path: PathBuf,

    /// Output CSV file path
    #[arg(short, long, default_value = "flashcards_anki.csv")]
    pub output: PathBuf,

    /// LLM provider
    #[arg(short, long, value_enum, default_value = "ollama")]
    pub provider: Provider,

    /// Model name (default depends on provider)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Custom base URL for the LLM server
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// Content language code used to phrase the prompt
    #[arg(short, long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Maximum number of files to process (for testing)
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
