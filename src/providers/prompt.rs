//! Prompt construction for provider calls.
//!
//! Maps the structured request onto a system/user message pair: the rating
//! becomes a qualitative tone descriptor, the voice a style instruction,
//! highlights a joined clause, and a non-default language an explicit
//! language instruction.

use serde::Serialize;

use crate::GenerationRequest;
use crate::template::highlights_clause;

/// One chat message in the gateway wire format.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: &'static str,
    pub content: String,
}

/// Qualitative tone descriptor for a 1-5 rating.
pub fn tone_descriptor(rating: u8) -> &'static str {
    match rating {
        1 => "very negative and disappointed",
        2 => "negative with some reservations",
        3 => "balanced and matter-of-fact",
        4 => "positive and satisfied",
        _ => "glowing and delighted",
    }
}

/// Build the system + user message pair for a request.
pub fn build_messages(request: &GenerationRequest) -> Vec<PromptMessage> {
    let mut system = format!(
        "You are a guest writing a hotel review. The overall tone is {}. {}",
        tone_descriptor(request.rating),
        request.voice.style_instruction(),
    );
    if request.language != "en" {
        system.push_str(&format!(" Write the review in the language '{}'.", request.language));
    }

    let user = format!(
        "Write a short review of {} after a {}-night {} for {} guest(s). \
         Rating: {}/5. In your words, {}.",
        request.subject_name,
        request.stay_length,
        request.trip_type.phrase(),
        request.guest_count,
        request.rating,
        highlights_clause(&request.highlights),
    );

    vec![
        PromptMessage {
            role: "system",
            content: system,
        },
        PromptMessage {
            role: "user",
            content: user,
        },
    ]
}
