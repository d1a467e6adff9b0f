use regex::Regex;

/// Split document text into bounded-size, paragraph-aligned chunks.
///
/// Text at or under `max_chars` comes back as a single trimmed chunk.
/// Longer text is split on blank-line boundaries, then consecutive
/// paragraphs are greedily packed until the next one would push the chunk
/// past `max_chars`. A single paragraph larger than the bound becomes its
/// own oversized chunk rather than being cut mid-sentence.
///
/// If paragraph packing yields nothing (no blank lines anywhere), the text
/// is force-sliced into `max_chars`-sized pieces. No returned chunk is
/// empty, and every chunk is trimmed.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    if char_len(text) <= max_chars {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }
        return vec![trimmed.to_string()];
    }

    let paragraph_break = Regex::new(r"\n\s*\n").expect("paragraph break regex");

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for para in paragraph_break.split(text) {
        if !current.is_empty() && char_len(&current) + char_len(para) > max_chars {
            push_trimmed(&mut chunks, &current);
            current = para.to_string();
        } else if current.is_empty() {
            current = para.to_string();
        } else {
            current.push_str("\n\n");
            current.push_str(para);
        }
    }
    push_trimmed(&mut chunks, &current);

    // No usable paragraph structure: fall back to fixed-size slicing.
    if chunks.is_empty() {
        let all: Vec<char> = text.chars().collect();
        for slice in all.chunks(max_chars) {
            let piece: String = slice.iter().collect();
            push_trimmed(&mut chunks, &piece);
        }
    }

    chunks
}

fn push_trimmed(chunks: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
