//! Keyword/regex intent detection for incoming chat messages.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    HelpRequest,
    Gratitude,
    Question,
    Statement,
}

static GREETING: Lazy<Regex> = Lazy::new(|| Regex::new(r"hello|hi|hey").unwrap());
static HELP: Lazy<Regex> = Lazy::new(|| Regex::new(r"help|support").unwrap());
static GRATITUDE: Lazy<Regex> = Lazy::new(|| Regex::new(r"thanks|thank you").unwrap());

/// Classify the user's intent. Rules are checked in priority order; a
/// trailing '?' only counts when no keyword rule matched first.
pub fn detect_intent(text: &str) -> Intent {
    let lower = text.to_lowercase();

    if GREETING.is_match(&lower) {
        Intent::Greeting
    } else if HELP.is_match(&lower) {
        Intent::HelpRequest
    } else if GRATITUDE.is_match(&lower) {
        Intent::Gratitude
    } else if text.contains('?') {
        Intent::Question
    } else {
        Intent::Statement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_intent() {
        assert_eq!(detect_intent("Hello there"), Intent::Greeting);
        assert_eq!(detect_intent("I need some support"), Intent::HelpRequest);
        assert_eq!(detect_intent("thanks a lot"), Intent::Gratitude);
        assert_eq!(detect_intent("What time is it?"), Intent::Question);
        assert_eq!(detect_intent("The sky is blue."), Intent::Statement);
    }

    #[test]
    fn keyword_rules_outrank_question_mark() {
        // "hi" matches the greeting rule even though the text is a question.
        assert_eq!(detect_intent("hi, are you there?"), Intent::Greeting);
    }
}
