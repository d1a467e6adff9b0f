use std::fs;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ankigen::cli::Args;
use ankigen::config::Config;
use ankigen::export::export_csv;
use ankigen::pipeline::FlashcardGenerator;
use ankigen::vault::{clean_markdown, find_markdown_files, should_process};

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "ankigen=debug"
    } else {
        "ankigen=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new(args.provider, args.url, args.model, args.verbose);
    tracing::info!(
        provider = ?config.provider,
        model = %config.model,
        endpoint = %config.endpoint(),
        "starting flashcard generation"
    );

    let mut files = find_markdown_files(&args.vault_path)?;
    println!("Found {} Markdown files", files.len());

    if let Some(max) = args.max_files {
        files.truncate(max);
        println!("Processing only first {max} files");
    }
    let total = files.len();

    let generator = FlashcardGenerator::new(config.backend(), &config.model);

    let mut all_cards = Vec::new();
    let mut processed = 0usize;

    for (i, path) in files.iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("[{}/{}] Processing: {}", i + 1, total, name);

        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read file");
                continue;
            }
        };

        let cleaned = clean_markdown(&raw);
        if !should_process(path, &cleaned) {
            continue;
        }

        let mut cards = generator.generate(&cleaned, &name, &args.language);
        if cards.is_empty() {
            tracing::info!(file = %name, "no flashcards generated");
            continue;
        }

        // Tag every card with its source note for organization in Anki.
        let tag = format!(
            "obsidian {}",
            path.file_stem()
                .map(|s| s.to_string_lossy().replace(' ', "_"))
                .unwrap_or_default()
        );
        for card in &mut cards {
            card.tags = tag.clone();
        }

        println!("  Generated {} flashcards", cards.len());
        processed += 1;
        all_cards.append(&mut cards);
    }

    if all_cards.is_empty() {
        return Err("no flashcards were generated".into());
    }

    let written = export_csv(&all_cards, &args.output)?;
    println!(
        "\nExported {written} flashcards to {}",
        args.output.display()
    );
    println!("Import the file in Anki using 'File > Import' with ';' as the field separator");
    println!("Processed {processed} out of {total} files");
    Ok(())
}
