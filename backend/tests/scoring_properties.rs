//! Property tests for the scoring engine and text validation.

use proptest::prelude::*;

use text_compliance::services::validation::{validate_text, MAX_TEXT_CHARS};
use text_compliance::services::ScoringEngine;

fn engine() -> ScoringEngine {
    ScoringEngine::with_defaults().unwrap()
}

const FORBIDDEN: [&str; 6] = ["fraude", "illégal", "faux", "illegal", "fraud", "fake"];

proptest! {
    #[test]
    fn prop_score_in_bounds(text in any::<String>()) {
        let score = engine().score(&text);
        prop_assert!((0..=100).contains(&score));
    }

    #[test]
    fn prop_score_is_deterministic(text in ".{0,300}") {
        let engine = engine();
        prop_assert_eq!(engine.score(&text), engine.score(&text));
    }

    #[test]
    fn prop_score_matches_breakdown(text in ".{0,300}") {
        let engine = engine();
        let breakdown = engine.analyze(&text);
        prop_assert_eq!(engine.score(&text), breakdown.score);
        prop_assert!(breakdown.forbidden_words_found.len() <= FORBIDDEN.len());
    }

    #[test]
    fn prop_default_scores_are_multiples_of_ten(text in ".{0,300}") {
        prop_assert_eq!(engine().score(&text) % 10, 0);
    }

    #[test]
    fn prop_clean_text_scores_by_length(text in "[a-e ]{0,250}") {
        let expected = if text.chars().count() > 100 { 70 } else { 50 };
        prop_assert_eq!(engine().score(&text), expected);
    }

    #[test]
    fn prop_ascii_case_does_not_matter(text in "[a-zA-Z ]{0,200}") {
        let engine = engine();
        prop_assert_eq!(engine.score(&text), engine.score(&text.to_ascii_uppercase()));
        prop_assert_eq!(engine.score(&text), engine.score(&text.to_ascii_lowercase()));
    }

    #[test]
    fn prop_adding_forbidden_word_never_raises_score(
        text in "[a-z ]{0,90}",
        idx in 0..FORBIDDEN.len(),
    ) {
        let engine = engine();
        let with_word = format!("{} {}", text, FORBIDDEN[idx]);
        prop_assert!(engine.score(&with_word) <= engine.score(&text));
        prop_assert!(engine
            .analyze(&with_word)
            .forbidden_words_found
            .contains(&FORBIDDEN[idx].to_string()));
    }

    #[test]
    fn prop_repeating_a_term_costs_once(idx in 0..FORBIDDEN.len(), times in 1usize..8) {
        let text = vec![FORBIDDEN[idx]; times].join(" ");
        let breakdown = engine().analyze(&text);
        prop_assert_eq!(breakdown.forbidden_words_penalty, 10);
    }

    #[test]
    fn prop_validated_text_is_trimmed_and_bounded(text in ".{0,200}") {
        if let Ok(valid) = validate_text(&text) {
            prop_assert_eq!(valid.as_str(), text.trim());
            prop_assert!(!valid.is_empty());
            prop_assert!(valid.chars().count() <= MAX_TEXT_CHARS);
        } else {
            prop_assert!(text.trim().is_empty());
        }
    }
}
