use serde_json::Value;

use super::types::Flashcard;

/// Line prefixes that mark a question in free-form model output.
/// Tuned for English and Italian responses; other languages are only
/// recovered through the structured JSON path.
const QUESTION_MARKERS: &[&str] = &["Q:", "Question:", "Domanda:"];
/// Line prefixes that mark an answer.
const ANSWER_MARKERS: &[&str] = &["A:", "Answer:", "Risposta:"];

/// Extract flashcards from raw model output.
///
/// Never fails: tries the structured JSON path first, and on any failure
/// there falls back to line-by-line Q/A scanning. An empty result means
/// the response held nothing usable, which the retry loop treats as a
/// failed attempt.
pub fn extract_flashcards(raw: &str) -> Vec<Flashcard> {
    match parse_structured(raw) {
        Some(cards) => cards,
        None => parse_qa_fallback(raw),
    }
}

/// Structured path: parse the widest `{...}` span as JSON and read its
/// `flashcards` array, keeping only entries with a non-blank question and
/// answer. Returns `None` when there is no parsable span at all; a span
/// that parses but holds no valid entries is an empty (not failed) result.
fn parse_structured(raw: &str) -> Option<Vec<Flashcard>> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }

    let value: Value = serde_json::from_str(&raw[start..=end]).ok()?;

    let cards = match value.get("flashcards").and_then(Value::as_array) {
        Some(entries) => entries.iter().filter_map(card_from_entry).collect(),
        None => Vec::new(),
    };
    Some(cards)
}

/// Read one flashcard entry leniently — anything that is not an object with
/// non-blank string `question` and `answer` fields is skipped.
fn card_from_entry(entry: &Value) -> Option<Flashcard> {
    let question = entry.get("question")?.as_str()?;
    let answer = entry.get("answer")?.as_str()?;
    Flashcard::from_candidate(question, answer)
}

/// Heuristic fallback: scan for prefix-marked question/answer lines.
///
/// Unmarked non-blank lines continue the current answer unless they look
/// like bullet items. Best effort by design — it only has to avoid emitting
/// spurious entries, not to recover every pair from malformed text.
fn parse_qa_fallback(raw: &str) -> Vec<Flashcard> {
    let mut cards = Vec::new();
    let mut current_question: Option<String> = None;
    let mut answer_lines: Vec<String> = Vec::new();

    for line in raw.lines() {
        let line = line.trim();

        if let Some(question) = strip_marker(line, QUESTION_MARKERS) {
            seal_pair(&mut cards, current_question.as_deref(), &answer_lines);
            current_question = (!question.is_empty()).then(|| question.to_string());
            answer_lines.clear();
        } else if let Some(answer) = strip_marker(line, ANSWER_MARKERS) {
            // A fresh answer marker discards any unsealed partial answer.
            answer_lines.clear();
            if !answer.is_empty() {
                answer_lines.push(answer.to_string());
            }
        } else if current_question.is_some()
            && !line.is_empty()
            && !line.starts_with(['-', '*', '+'])
        {
            answer_lines.push(line.to_string());
        }
    }
    seal_pair(&mut cards, current_question.as_deref(), &answer_lines);

    cards
}

/// Match a marker prefix (with optional `**` bold markup) and return the
/// trimmed remainder of the line.
fn strip_marker<'a>(line: &'a str, markers: &[&str]) -> Option<&'a str> {
    let unbolded = line.strip_prefix("**").unwrap_or(line);
    markers
        .iter()
        .find_map(|marker| unbolded.strip_prefix(marker))
        .map(str::trim)
}

fn seal_pair(cards: &mut Vec<Flashcard>, question: Option<&str>, answer_lines: &[String]) {
    let Some(question) = question else { return };
    if answer_lines.is_empty() {
        return;
    }
    if let Some(card) = Flashcard::from_candidate(question, &answer_lines.join(" ")) {
        cards.push(card);
    }
}
