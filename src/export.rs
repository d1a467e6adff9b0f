use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::pipeline::Flashcard;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No flashcards to export")]
    Empty,

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write flashcards as an Anki-importable CSV: one `question;answer;tags`
/// row per card, semicolon-delimited. Rows whose question or answer clean
/// down to nothing are skipped. Returns the number of rows written.
pub fn export_csv(cards: &[Flashcard], output: &Path) -> Result<usize, ExportError> {
    if cards.is_empty() {
        return Err(ExportError::Empty);
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(output)?;

    let mut written = 0;
    for card in cards {
        let question = clean_field(&card.question);
        let answer = clean_field(&card.answer);
        if question.is_empty() || answer.is_empty() {
            continue;
        }
        writer.write_record([question.as_str(), answer.as_str(), card.tags.as_str()])?;
        written += 1;
    }
    writer.flush()?;

    tracing::debug!(rows = written, path = %output.display(), "exported flashcards");
    Ok(written)
}

/// Clean one field for Anki: newlines become `<br>`, whitespace is
/// normalized, and `<`/`>` are HTML-escaped while the inserted `<br>`
/// markers are kept literal.
fn clean_field(text: &str) -> String {
    let text = text.replace('\n', "<br>");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let text = text.replace('<', "&lt;").replace('>', "&gt;");
    text.replace("&lt;br&gt;", "<br>").trim().to_string()
}
