use serde::{Deserialize, Serialize};

use super::GenerationError;

/// A validated question/answer pair ready for spaced-repetition import.
///
/// Only ever constructed with a non-empty question and answer (after
/// trimming); candidates missing either side are discarded during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
    /// Free-text label set by the caller after generation (e.g. source file).
    #[serde(default)]
    pub tags: String,
}

impl Flashcard {
    /// Build a flashcard from raw candidate text.
    /// Returns `None` if either side is blank after trimming.
    pub fn from_candidate(question: &str, answer: &str) -> Option<Self> {
        let question = question.trim();
        let answer = answer.trim();
        if question.is_empty() || answer.is_empty() {
            return None;
        }
        Some(Self {
            question: question.to_string(),
            answer: answer.to_string(),
            tags: String::new(),
        })
    }
}

/// Generation backend abstraction (allows mocking).
///
/// Implementations send one prompt to a locally hosted model and return the
/// raw response text. Transport failure is an error here, never empty text —
/// "model returned nothing useful" is the parser's concern.
pub trait LlmBackend {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError>;
}
