/// Default content language. Notes in this language get instructions phrased
/// in it; any other code gets a generic same-language directive.
pub const DEFAULT_LANGUAGE: &str = "it";

/// Appended to the prompt after the first failed attempt to push the model
/// back toward the required JSON shape. Applied at most once per chunk.
pub const REINFORCEMENT_CLAUSE: &str =
    "\n\nPLEASE ENSURE TO GENERATE VALID FLASHCARDS IN THE SPECIFIED JSON FORMAT.";

/// Build the flashcard-generation prompt for one chunk of note text.
///
/// Pure and deterministic: the label is interpolated for traceability only
/// and has no effect on how the response is parsed.
pub fn build_prompt(content: &str, label: &str, language: &str) -> String {
    let lang_instruction = if language == DEFAULT_LANGUAGE {
        "Crea delle flashcards in ITALIANO per lo studio.\n\
         Le domande e risposte devono essere in italiano."
            .to_string()
    } else {
        format!(
            "Create flashcards in the same language as the content ({}).\n\
             Questions and answers should be in {}.",
            language.to_uppercase(),
            language
        )
    };

    format!(
        r#"Analyze the following content from file "{label}" and create study flashcards.
{lang_instruction}

RULES:
1. Create as many high-quality flashcards as you can extract from the content
2. Questions must be clear and specific, but can also be tricky (to test real knowledge)
3. Answers must not be too concise, but they have to explain the concept in detail
4. Avoid questions that are too obvious or too vague
5. Focus on key concepts, definitions, important examples
6. Use the same language as the source content
7. Of course, fix any grammar or spelling mistakes in the content
8. If you see LaTeX expressions or code blocks, incorporate their concepts but without using LaTeX syntax
9. Always respond with flashcards even if the content contains complex formulas or code

OUTPUT FORMAT:
You MUST return ONLY a valid JSON with this format. No markdown formatting, no backticks, just the raw JSON:
{{
  "flashcards": [
    {{"question": "Question 1?", "answer": "Answer 1"}},
    {{"question": "Question 2?", "answer": "Answer 2"}}
  ]
}}

IMPORTANT: Your entire response must be valid JSON that can be parsed with JSON.parse() or json.loads()

CONTENT TO ANALYZE:
{content}"#
    )
}
