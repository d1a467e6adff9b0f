use std::sync::LazyLock;

use regex::Regex;

// Markup stripped or substituted before text reaches the prompt. LaTeX and
// code are replaced with literal placeholders rather than removed, so the
// model can still describe their concepts in prose.
static FRONTMATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^---\n.*?\n---\n").unwrap());
static WIKILINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").unwrap());
static INLINE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").unwrap());
static HTML_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static LATEX_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\$\$(.*?)\$\$").unwrap());
static LATEX_INLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$([^$]+)\$").unwrap());
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[a-zA-Z]*\n(.*?)```").unwrap());
static CODE_INLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());
static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// Normalize raw Obsidian Markdown into plain text for the prompt.
///
/// Removes YAML frontmatter, unwraps `[[wikilinks]]`, drops inline `#tags`
/// and HTML comments, substitutes LaTeX and code spans with literal
/// placeholders, and collapses runs of whitespace.
pub fn clean_markdown(raw: &str) -> String {
    let text = FRONTMATTER.replace(raw, "");
    let text = WIKILINK.replace_all(&text, "$1");
    let text = INLINE_TAG.replace_all(&text, "");
    let text = HTML_COMMENT.replace_all(&text, "");
    let text = LATEX_BLOCK.replace_all(&text, "LATEX_BLOCK: $1");
    let text = LATEX_INLINE.replace_all(&text, "LATEX_EXPRESSION: $1");
    let text = CODE_FENCE.replace_all(&text, "CODE_BLOCK: $1");
    let text = CODE_INLINE.replace_all(&text, "CODE: $1");
    let text = BLANK_RUN.replace_all(&text, "\n\n");
    let text = SPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontmatter_is_removed() {
        let raw = "---\ntitle: My Note\ntags: [a, b]\n---\nThe actual content.";
        assert_eq!(clean_markdown(raw), "The actual content.");
    }

    #[test]
    fn frontmatter_only_at_document_start() {
        let raw = "Intro text.\n---\nnot: frontmatter\n---\nMore text.";
        let cleaned = clean_markdown(raw);
        assert!(cleaned.contains("not: frontmatter"));
    }

    #[test]
    fn wikilinks_keep_their_text() {
        assert_eq!(
            clean_markdown("See [[Linear Algebra]] for details."),
            "See Linear Algebra for details."
        );
    }

    #[test]
    fn inline_tags_are_dropped() {
        assert_eq!(clean_markdown("Some text #university #math2026 more"), "Some text more");
    }

    #[test]
    fn html_comments_are_dropped() {
        assert_eq!(
            clean_markdown("Before <!-- hidden\nnote --> after."),
            "Before after."
        );
    }

    #[test]
    fn latex_becomes_placeholders() {
        let cleaned = clean_markdown("Euler: $e^{i\\pi} + 1 = 0$ and\n\n$$\\int_0^1 x dx$$");
        assert!(cleaned.contains("LATEX_EXPRESSION: e^{i\\pi} + 1 = 0"));
        assert!(cleaned.contains("LATEX_BLOCK: \\int_0^1 x dx"));
    }

    #[test]
    fn code_becomes_placeholders() {
        let cleaned = clean_markdown("```python\nprint(1)\n```\nUse CODE tags like `x += 1` inline.");
        assert!(cleaned.contains("CODE_BLOCK: print(1)"));
        assert!(cleaned.contains("CODE: x += 1"));
    }

    #[test]
    fn whitespace_runs_are_collapsed() {
        let cleaned = clean_markdown("a\t\t b\n\n\n\nc   d");
        assert_eq!(cleaned, "a b\n\nc d");
    }

    #[test]
    fn result_is_trimmed() {
        assert_eq!(clean_markdown("\n\n  hello  \n\n"), "hello");
    }
}
