use std::thread;
use std::time::Duration;

use super::chunker::chunk_text;
use super::parser::extract_flashcards;
use super::prompt::{build_prompt, REINFORCEMENT_CLAUSE};
use super::types::{Flashcard, LlmBackend};

/// Maximum generation attempts per chunk.
pub const MAX_ATTEMPTS: u32 = 3;
/// Base delay for exponential backoff between failed attempts.
pub const RETRY_BASE_DELAY: Duration = Duration::from_secs(2);
/// Documents longer than this many characters are split before generation.
pub const MAX_CHUNK_CHARS: usize = 6000;

/// Retry state for one chunk's extraction: the evolving prompt, the attempt
/// counter and bound, and the backoff base. Scoped to a single chunk and
/// never shared across chunks.
#[derive(Debug, Clone)]
pub struct GenerationAttempt {
    prompt: String,
    attempt: u32,
    max_attempts: u32,
    base_delay: Duration,
    reinforced: bool,
}

impl GenerationAttempt {
    pub fn new(prompt: String, max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            prompt,
            attempt: 1,
            max_attempts,
            base_delay,
            reinforced: false,
        }
    }

    /// Prompt to send on the current attempt.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// 1-based index of the current attempt.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Record a failed attempt and advance.
    ///
    /// Returns the backoff to wait before the next attempt
    /// (`base * 2^(failed_attempt - 1)`), or `None` once the attempt budget
    /// is exhausted. The first failure also appends the JSON reinforcement
    /// clause to the prompt; the prompt mutates at most once.
    pub fn record_failure(&mut self) -> Option<Duration> {
        let failed = self.attempt;
        self.attempt += 1;
        if self.attempt > self.max_attempts {
            return None;
        }
        if !self.reinforced {
            self.prompt.push_str(REINFORCEMENT_CLAUSE);
            self.reinforced = true;
        }
        Some(self.base_delay * 2u32.pow(failed - 1))
    }
}

/// Drives prompt building, backend calls and response parsing for whole
/// documents, chunking oversized input and retrying unusable responses.
///
/// All failures internal to generation are absorbed here: the caller only
/// ever sees a (possibly empty) list of flashcards.
pub struct FlashcardGenerator {
    backend: Box<dyn LlmBackend>,
    model: String,
    max_attempts: u32,
    base_delay: Duration,
    max_chunk_chars: usize,
}

impl FlashcardGenerator {
    pub fn new(backend: Box<dyn LlmBackend>, model: &str) -> Self {
        Self {
            backend,
            model: model.to_string(),
            max_attempts: MAX_ATTEMPTS,
            base_delay: RETRY_BASE_DELAY,
            max_chunk_chars: MAX_CHUNK_CHARS,
        }
    }

    /// Override retry tuning (tests use a zero base delay).
    pub fn with_retry(mut self, max_attempts: u32, base_delay: Duration) -> Self {
        self.max_attempts = max_attempts;
        self.base_delay = base_delay;
        self
    }

    /// Override the chunking threshold.
    pub fn with_chunk_limit(mut self, max_chars: usize) -> Self {
        self.max_chunk_chars = max_chars;
        self
    }

    /// Generate flashcards for one document.
    ///
    /// Documents over the chunk threshold are split and processed chunk by
    /// chunk, sequentially; a chunk that exhausts its retries contributes
    /// nothing and never aborts its siblings.
    pub fn generate(&self, text: &str, label: &str, language: &str) -> Vec<Flashcard> {
        let total_chars = text.chars().count();
        if total_chars <= self.max_chunk_chars {
            return self.generate_for_chunk(text, label, language);
        }

        tracing::debug!(label, chars = total_chars, "content is large, splitting into chunks");
        let chunks = chunk_text(text, self.max_chunk_chars);
        let total = chunks.len();

        let mut all_cards = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let chunk_label = format!("{} (part {}/{})", label, i + 1, total);
            tracing::debug!(label = %chunk_label, chars = chunk.chars().count(), "processing chunk");
            all_cards.extend(self.generate_for_chunk(chunk, &chunk_label, language));
        }
        all_cards
    }

    /// Run the attempt loop for a single chunk.
    ///
    /// A backend error or a response with no extractable flashcards both
    /// count as a failed attempt; the first non-empty parse wins
    /// immediately. Exhaustion degrades to an empty list.
    pub fn generate_for_chunk(&self, chunk: &str, label: &str, language: &str) -> Vec<Flashcard> {
        let mut attempt = GenerationAttempt::new(
            build_prompt(chunk, label, language),
            self.max_attempts,
            self.base_delay,
        );

        loop {
            match self.backend.generate(&self.model, attempt.prompt()) {
                Ok(raw) => {
                    let cards = extract_flashcards(&raw);
                    if !cards.is_empty() {
                        return cards;
                    }
                    tracing::warn!(
                        label,
                        attempt = attempt.attempt(),
                        "no valid flashcards in response"
                    );
                }
                Err(e) => {
                    tracing::warn!(label, attempt = attempt.attempt(), error = %e, "backend call failed");
                }
            }

            match attempt.record_failure() {
                Some(delay) => thread::sleep(delay),
                None => {
                    tracing::warn!(
                        label,
                        attempts = self.max_attempts,
                        "exhausted all attempts, skipping chunk"
                    );
                    return Vec::new();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::super::GenerationError;
    use super::*;

    const GOOD_RESPONSE: &str =
        r#"{"flashcards":[{"question":"What is X?","answer":"X is Y."}]}"#;

    /// Scripted backend: pops one canned outcome per call and records every
    /// prompt it was sent. Once the script runs dry it keeps replaying the
    /// last outcome.
    struct ScriptedBackend {
        script: Mutex<VecDeque<Result<String, ()>>>,
        last: Result<String, ()>,
        prompts: Arc<Mutex<Vec<String>>>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedBackend {
        fn new(
            script: Vec<Result<String, ()>>,
            prompts: Arc<Mutex<Vec<String>>>,
            calls: Arc<AtomicUsize>,
        ) -> Self {
            let last = script.last().cloned().unwrap_or(Err(()));
            Self {
                script: Mutex::new(script.into()),
                last,
                prompts,
                calls,
            }
        }
    }

    impl LlmBackend for ScriptedBackend {
        fn generate(&self, _model: &str, prompt: &str) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            let outcome = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.last.clone());
            outcome.map_err(|_| GenerationError::HttpClient("scripted failure".into()))
        }
    }

    fn generator(script: Vec<Result<String, ()>>) -> (FlashcardGenerator, Arc<Mutex<Vec<String>>>, Arc<AtomicUsize>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = ScriptedBackend::new(script, Arc::clone(&prompts), Arc::clone(&calls));
        let generator = FlashcardGenerator::new(Box::new(backend), "test-model")
            .with_retry(3, Duration::ZERO);
        (generator, prompts, calls)
    }

    #[test]
    fn success_on_first_attempt_short_circuits() {
        let (generator, _, calls) = generator(vec![Ok(GOOD_RESPONSE.into())]);
        let cards = generator.generate_for_chunk("some text", "notes.md", "en");

        assert_eq!(cards.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn retries_then_succeeds_with_reinforced_prompt() {
        let (generator, prompts, calls) = generator(vec![
            Ok("no cards here".into()),
            Err(()),
            Ok(GOOD_RESPONSE.into()),
        ]);
        let cards = generator.generate_for_chunk("some text", "notes.md", "en");

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "What is X?");
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        let prompts = prompts.lock().unwrap();
        assert!(!prompts[0].contains(REINFORCEMENT_CLAUSE.trim()));
        assert!(prompts[1].contains(REINFORCEMENT_CLAUSE.trim()));
        assert!(prompts[2].contains(REINFORCEMENT_CLAUSE.trim()));
    }

    #[test]
    fn exhaustion_returns_empty_after_exactly_max_attempts() {
        let (generator, _, calls) = generator(vec![Ok("still nothing".into())]);
        let cards = generator.generate_for_chunk("some text", "notes.md", "en");

        assert!(cards.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn backend_errors_count_as_failed_attempts() {
        let (generator, _, calls) = generator(vec![Err(())]);
        let cards = generator.generate_for_chunk("some text", "notes.md", "en");

        assert!(cards.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn reinforcement_is_appended_exactly_once() {
        let mut attempt =
            GenerationAttempt::new("base prompt".into(), 5, Duration::from_secs(1));
        attempt.record_failure();
        attempt.record_failure();
        attempt.record_failure();

        let occurrences = attempt
            .prompt()
            .matches(REINFORCEMENT_CLAUSE.trim())
            .count();
        assert_eq!(occurrences, 1);
        assert!(attempt.prompt().starts_with("base prompt"));
    }

    #[test]
    fn backoff_delays_double_per_failure() {
        let base = Duration::from_secs(2);
        let mut attempt = GenerationAttempt::new("p".into(), 4, base);

        assert_eq!(attempt.record_failure(), Some(base));
        assert_eq!(attempt.record_failure(), Some(base * 2));
        assert_eq!(attempt.record_failure(), Some(base * 4));
        assert_eq!(attempt.record_failure(), None);
    }

    #[test]
    fn attempt_budget_of_three_allows_two_waits() {
        let base = Duration::from_secs(2);
        let mut attempt = GenerationAttempt::new("p".into(), 3, base);

        assert_eq!(attempt.record_failure(), Some(base));
        assert_eq!(attempt.record_failure(), Some(base * 2));
        assert_eq!(attempt.record_failure(), None);
    }

    #[test]
    fn small_document_is_processed_unchunked() {
        let (generator, prompts, calls) = generator(vec![Ok(GOOD_RESPONSE.into())]);
        let cards = generator.generate("a short note", "notes.md", "en");

        assert_eq!(cards.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!prompts.lock().unwrap()[0].contains("(part"));
    }

    #[test]
    fn large_document_is_chunked_with_part_labels() {
        let paras: Vec<String> = (0..6).map(|i| format!("para {i} ").repeat(20)).collect();
        let text = paras.join("\n\n");

        let (generator, prompts, _) = generator(vec![Ok(GOOD_RESPONSE.into())]);
        let generator = generator.with_chunk_limit(300);
        let cards = generator.generate(&text, "big.md", "en");

        let prompts = prompts.lock().unwrap();
        let total = prompts.len();
        assert!(total > 1, "expected multiple chunks, got {total}");
        assert_eq!(cards.len(), total);
        for (i, prompt) in prompts.iter().enumerate() {
            assert!(prompt.contains(&format!("(part {}/{})", i + 1, total)));
        }
    }

    #[test]
    fn thirteen_thousand_char_document_keeps_chunk_order() {
        let paras: Vec<String> = (0..13).map(|i| format!("t{i:02} ").repeat(250)).collect();
        let text = paras.join("\n\n");
        assert!(text.chars().count() >= 13_000);

        let response = |q: &str| format!(r#"{{"flashcards":[{{"question":"{q}","answer":"ok"}}]}}"#);
        let (generator, prompts, _) = generator(vec![
            Ok(response("first")),
            Ok(response("second")),
            Ok(response("third")),
        ]);
        let cards = generator.generate(&text, "big.md", "en");

        assert_eq!(prompts.lock().unwrap().len(), 3);
        let questions: Vec<&str> = cards.iter().map(|c| c.question.as_str()).collect();
        assert_eq!(questions, vec!["first", "second", "third"]);
    }

    #[test]
    fn exhausted_chunk_does_not_abort_siblings() {
        // Chunk 1 succeeds immediately, chunk 2 burns all three attempts,
        // chunk 3 succeeds: two cards total, 1 + 3 + 1 calls.
        let (generator, _, calls) = generator(vec![
            Ok(GOOD_RESPONSE.into()),
            Ok("junk".into()),
            Ok("junk".into()),
            Ok("junk".into()),
            Ok(GOOD_RESPONSE.into()),
        ]);
        let generator = generator.with_chunk_limit(100);

        let chunk = "words ".repeat(15);
        let text = format!("{chunk}\n\n{chunk}\n\n{chunk}");
        let cards = generator.generate(&text, "mixed.md", "en");

        assert_eq!(cards.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }
}
