// Prompt text for quote generation.
// Nothing is validated here; the extractor copes with whatever comes back.

use crate::quotes::request::{non_blank, GenerationRequest};

pub const DEFAULT_TONE: &str = "sincere";

/// System prompt: demands a bare JSON array of strings.
pub const QUOTE_SYSTEM: &str = "You are a concise greeting quote generator. \
    Always respond with a pure JSON array of strings only. \
    No backticks, no markdown, no keys, no commentary.";

const FORMAT_INSTRUCTION: &str = "Each quote should be 1-2 sentences and free of leading numbers, \
    bullets, or quotes. Return JSON array only.";

/// Builds the user prompt. Optional directives keep their line even when empty.
pub fn build_user_prompt(request: &GenerationRequest) -> String {
    let recipient = non_blank(request.recipient.as_deref()).unwrap_or("N/A");
    let tone = non_blank(request.tone.as_deref()).unwrap_or(DEFAULT_TONE);
    let style = non_blank(request.style_person.as_deref())
        .map(|person| format!("Write in the recognizable style of {person}."))
        .unwrap_or_default();
    let language = non_blank(request.language.as_deref())
        .map(|lang| format!("Language: {lang}."))
        .unwrap_or_default();

    format!(
        "Generate {count} unique greeting quotes for the occasion: \"{occasion}\".\n\
         Recipient details: {recipient}.\n\
         Tone: {tone}.\n\
         {style}\n\
         {language}\n\
         {FORMAT_INSTRUCTION}",
        count = request.count,
        occasion = request.effective_occasion(),
    )
}
