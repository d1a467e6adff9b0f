use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use super::VaultError;

/// Minimum meaningful characters a note must carry to be worth a
/// generation call.
const MIN_CONTENT_CHARS: usize = 100;

/// Path fragments (lowercased) that mark system, template or trash files.
const IGNORED_PATH_FRAGMENTS: &[&str] = &[".obsidian", "template", "trash"];

static PLACEHOLDER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"LATEX_EXPRESSION: .*|LATEX_BLOCK: .*|CODE_BLOCK: .*|CODE: .*").unwrap()
});
static NON_TEXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s.,:;?!()]").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Recursively collect all Markdown files under the vault root, in
/// deterministic (sorted) order.
pub fn find_markdown_files(vault: &Path) -> Result<Vec<PathBuf>, VaultError> {
    if !vault.exists() {
        return Err(VaultError::NotFound(vault.display().to_string()));
    }
    if !vault.is_dir() {
        return Err(VaultError::NotADirectory(vault.display().to_string()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(vault)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    Ok(files)
}

/// Decide whether a note is worth a generation call.
///
/// Skips system/template/trash paths, notes that are too short, and notes
/// whose text is mostly placeholder or symbol residue after cleanup.
pub fn should_process(path: &Path, cleaned: &str) -> bool {
    if cleaned.trim().chars().count() < MIN_CONTENT_CHARS {
        tracing::debug!(path = %path.display(), "skipped: content too short");
        return false;
    }

    let path_str = path.to_string_lossy().to_lowercase();
    if IGNORED_PATH_FRAGMENTS
        .iter()
        .any(|fragment| path_str.contains(fragment))
    {
        tracing::debug!(path = %path.display(), "skipped: system or template file");
        return false;
    }

    // Strip placeholders and symbols; what remains must still be real text.
    let text = PLACEHOLDER_LINE.replace_all(cleaned, "");
    let text = NON_TEXT.replace_all(&text, "");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    if text.trim().chars().count() < MIN_CONTENT_CHARS {
        tracing::debug!(path = %path.display(), "skipped: insufficient meaningful content");
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn long_text() -> String {
        "This note discusses the fundamentals of thermodynamics in enough detail \
         to justify generating study flashcards from its content."
            .to_string()
    }

    #[test]
    fn finds_markdown_files_recursively_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.md"), "b").unwrap();
        fs::write(dir.path().join("a.md"), "a").unwrap();
        fs::write(dir.path().join("sub/c.MD"), "c").unwrap();
        fs::write(dir.path().join("notes.txt"), "not markdown").unwrap();

        let files = find_markdown_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md", "c.MD"]);
    }

    #[test]
    fn missing_vault_is_an_error() {
        let result = find_markdown_files(Path::new("/nonexistent/vault/path"));
        assert!(matches!(result, Err(VaultError::NotFound(_))));
    }

    #[test]
    fn file_as_vault_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("note.md");
        fs::write(&file, "x").unwrap();
        let result = find_markdown_files(&file);
        assert!(matches!(result, Err(VaultError::NotADirectory(_))));
    }

    #[test]
    fn short_content_is_skipped() {
        assert!(!should_process(Path::new("note.md"), "too short"));
    }

    #[test]
    fn template_and_system_paths_are_skipped() {
        let text = long_text();
        assert!(!should_process(Path::new("vault/.obsidian/config.md"), &text));
        assert!(!should_process(Path::new("vault/Templates/daily.md"), &text));
        assert!(!should_process(Path::new("vault/.trash/old.md"), &text));
    }

    #[test]
    fn placeholder_only_content_is_skipped() {
        let text = "CODE_BLOCK: fn main() { println!(); }\n".repeat(10);
        assert!(!should_process(Path::new("snippets.md"), &text));
    }

    #[test]
    fn real_prose_is_processed() {
        assert!(should_process(Path::new("vault/physics.md"), &long_text()));
    }
}
