//! Text compliance scoring engine.
//!
//! Scores a text against a fixed set of business rules:
//!
//! - start from a base score
//! - add a flat bonus when the text is longer than a threshold
//! - deduct a penalty once for every forbidden term found as a whole word
//! - clamp the result into `[min_score, max_score]`
//!
//! The engine is pure: it holds an immutable [`ScoringConfig`] plus the
//! regexes compiled from it, and the same text always yields the same score.

use std::collections::HashMap;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Errors raised while building a [`ScoringEngine`].
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    /// One or more configuration values are out of range.
    #[error("Invalid scoring configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    /// A forbidden term could not be compiled into a matcher.
    #[error("Invalid forbidden word pattern '{word}': {source}")]
    InvalidPattern {
        word: String,
        #[source]
        source: regex::Error,
    },

    /// The configuration file could not be read or parsed.
    #[error("Failed to load scoring configuration: {0}")]
    Load(String),
}

/// Scoring rules configuration.
///
/// Every field has a default, so a TOML file only needs to list the values
/// it overrides:
///
/// ```toml
/// [scoring]
/// length_threshold = 200
/// forbidden_words = ["fraude", "fraud"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Starting score before any rule is applied (default: 50)
    pub base_score: i32,
    /// Length in characters the text must strictly exceed to earn the bonus (default: 100)
    pub length_threshold: usize,
    /// Flat bonus for long texts (default: 20)
    pub length_bonus: i32,
    /// Ordered list of terms matched as whole words, case-insensitively
    pub forbidden_words: Vec<String>,
    /// Deduction per distinct forbidden term found (default: 10)
    pub forbidden_word_penalty: i32,
    /// Lower clamp (default: 0)
    pub min_score: i32,
    /// Upper clamp (default: 100)
    pub max_score: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 50,
            length_threshold: 100,
            length_bonus: 20,
            forbidden_words: ["fraude", "illégal", "faux", "illegal", "fraud", "fake"]
                .into_iter()
                .map(String::from)
                .collect(),
            forbidden_word_penalty: 10,
            min_score: 0,
            max_score: 100,
        }
    }
}

#[derive(Deserialize)]
struct ScoringFile {
    #[serde(default)]
    scoring: ScoringConfig,
}

impl ScoringConfig {
    /// Parse a `[scoring]` table from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ScoringError> {
        let file: ScoringFile =
            toml::from_str(content).map_err(|e| ScoringError::Load(e.to_string()))?;
        Ok(file.scoring)
    }

    /// Load a `[scoring]` table from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScoringError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ScoringError::Load(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Check every value and return all problems at once (not just the first).
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.min_score < 0 || self.max_score > 100 {
            errors.push(format!(
                "scoring.min_score/max_score ({}, {}) must lie within [0, 100]",
                self.min_score, self.max_score
            ));
        }

        if self.min_score > self.max_score {
            errors.push(format!(
                "scoring.min_score ({}) must not exceed scoring.max_score ({})",
                self.min_score, self.max_score
            ));
        } else if !(self.min_score..=self.max_score).contains(&self.base_score) {
            errors.push(format!(
                "scoring.base_score ({}) must lie within [{}, {}]",
                self.base_score, self.min_score, self.max_score
            ));
        }

        if self.length_bonus < 0 {
            errors.push("scoring.length_bonus: must be non-negative".to_string());
        }

        if self.forbidden_word_penalty < 0 {
            errors.push("scoring.forbidden_word_penalty: must be non-negative".to_string());
        }

        let mut first_seen: HashMap<String, usize> = HashMap::new();
        for (i, word) in self.forbidden_words.iter().enumerate() {
            // Case variants match the same text
            if let Some(first) = first_seen.get(&word.to_lowercase()) {
                errors.push(format!(
                    "scoring.forbidden_words[{}]: '{}' duplicates forbidden_words[{}]",
                    i, word, first
                ));
            } else {
                first_seen.insert(word.to_lowercase(), i);
            }

            if word.is_empty() {
                errors.push(format!("scoring.forbidden_words[{}]: must not be empty", i));
            } else if word.trim() != word {
                errors.push(format!(
                    "scoring.forbidden_words[{}]: '{}' has surrounding whitespace",
                    i, word
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Per-rule contributions behind a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Final clamped score
    pub score: i32,
    pub base_score: i32,
    /// Either 0 or the configured bonus
    pub length_bonus: i32,
    /// Total deducted for forbidden terms, before clamping
    pub forbidden_words_penalty: i32,
    /// Matching terms, in configuration order, each listed once
    pub forbidden_words_found: Vec<String>,
}

#[derive(Debug, Clone)]
struct ForbiddenTerm {
    word: String,
    pattern: Regex,
}

/// Deterministic rule evaluator.
///
/// Cheap to share: wrap it in an `Arc` and call it from any task.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
    terms: Vec<ForbiddenTerm>,
}

impl ScoringEngine {
    /// Validate `config` and compile one whole-word matcher per forbidden term.
    ///
    /// `\b` in the `regex` crate is Unicode-aware, so accented letters count
    /// as word characters on both sides of a term.
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        config.validate().map_err(ScoringError::InvalidConfig)?;

        let terms = config
            .forbidden_words
            .iter()
            .map(|word| {
                let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word)))
                    .map_err(|source| ScoringError::InvalidPattern {
                        word: word.clone(),
                        source,
                    })?;
                Ok(ForbiddenTerm {
                    word: word.clone(),
                    pattern,
                })
            })
            .collect::<Result<Vec<_>, ScoringError>>()?;

        Ok(Self { config, terms })
    }

    /// Engine with the default rules.
    pub fn with_defaults() -> Result<Self, ScoringError> {
        Self::new(ScoringConfig::default())
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Compliance score of `text`, in `[min_score, max_score]`.
    pub fn score(&self, text: &str) -> i32 {
        self.analyze(text).score
    }

    /// Score `text` and report how each rule contributed.
    pub fn analyze(&self, text: &str) -> ScoreBreakdown {
        let cfg = &self.config;

        let length_bonus = if text.chars().count() > cfg.length_threshold {
            cfg.length_bonus
        } else {
            0
        };

        let forbidden_words_found: Vec<String> = self
            .terms
            .iter()
            .filter(|term| term.pattern.is_match(text))
            .map(|term| term.word.clone())
            .collect();

        let forbidden_words_penalty = cfg
            .forbidden_word_penalty
            .saturating_mul(forbidden_words_found.len() as i32);

        let raw = cfg
            .base_score
            .saturating_add(length_bonus)
            .saturating_sub(forbidden_words_penalty);

        ScoreBreakdown {
            score: raw.clamp(cfg.min_score, cfg.max_score),
            base_score: cfg.base_score,
            length_bonus,
            forbidden_words_penalty,
            forbidden_words_found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ScoringEngine {
        ScoringEngine::with_defaults().unwrap()
    }

    #[test]
    fn test_normal_text_gets_base_score() {
        let text = "Ceci est un texte tout à fait normal et conforme aux attentes.";
        assert_eq!(engine().score(text), 50);
    }

    #[test]
    fn test_long_text_gets_bonus() {
        let text = "Cet exemple de texte est volontairement très long pour vérifier que le bonus de longueur de cent caractères est bien appliqué par notre service d'analyse de texte IA.";
        assert!(text.chars().count() > 100);
        assert_eq!(engine().score(text), 70);
    }

    #[test]
    fn test_threshold_is_strict() {
        let exactly = "a".repeat(100);
        let over = "a".repeat(101);
        assert_eq!(engine().score(&exactly), 50);
        assert_eq!(engine().score(&over), 70);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 60 chars, 120 bytes
        let text = "é".repeat(60);
        assert_eq!(engine().score(&text), 50);
    }

    #[test]
    fn test_two_forbidden_words() {
        let text = "Ce texte parle de fraude et de contenu illégal.";
        assert_eq!(engine().score(text), 30);
    }

    #[test]
    fn test_bonus_and_penalties_combine() {
        let text = "Ceci est un texte très long qui dépasse largement les cent caractères pour tester le cumul des règles incluant le mot fraude et aussi le mot illégal dans une même analyse.";
        assert_eq!(engine().score(text), 50);
    }

    #[test]
    fn test_clamped_to_zero() {
        assert_eq!(engine().score("fraude illégal faux illegal fraud fake"), 0);
    }

    #[test]
    fn test_case_insensitive_including_accents() {
        assert_eq!(engine().score("Une FRAUDE manifeste et un acte ILLÉGAL."), 30);
        assert_eq!(engine().score("FRAUDE"), engine().score("fraude"));
    }

    #[test]
    fn test_repeated_term_penalized_once() {
        assert_eq!(engine().score("fraude fraude fraude"), 40);
    }

    #[test]
    fn test_substrings_do_not_match() {
        assert_eq!(engine().score("Le fraudeur a des fakes et une illegality."), 50);
        assert_eq!(engine().score("illégalement"), 50);
    }

    #[test]
    fn test_accented_neighbours_are_word_characters() {
        // "éfake" is one word under Unicode boundaries
        assert_eq!(engine().score("éfake"), 50);
        assert_eq!(engine().score("(fake)"), 40);
    }

    #[test]
    fn test_accented_and_plain_variants_are_independent() {
        let breakdown = engine().analyze("illégal et illegal");
        assert_eq!(breakdown.forbidden_words_found, vec!["illégal", "illegal"]);
        assert_eq!(breakdown.score, 30);
    }

    #[test]
    fn test_breakdown_reports_contributions() {
        let long = format!("{} fraud", "x".repeat(120));
        let breakdown = engine().analyze(&long);
        assert_eq!(breakdown.base_score, 50);
        assert_eq!(breakdown.length_bonus, 20);
        assert_eq!(breakdown.forbidden_words_penalty, 10);
        assert_eq!(breakdown.forbidden_words_found, vec!["fraud"]);
        assert_eq!(breakdown.score, 60);
    }

    #[test]
    fn test_breakdown_penalty_is_unclamped() {
        let breakdown = engine().analyze("fraude illégal faux illegal fraud fake");
        assert_eq!(breakdown.forbidden_words_penalty, 60);
        assert_eq!(breakdown.score, 0);
    }

    #[test]
    fn test_upper_clamp() {
        let config = ScoringConfig {
            base_score: 95,
            length_bonus: 20,
            ..ScoringConfig::default()
        };
        let engine = ScoringEngine::new(config).unwrap();
        assert_eq!(engine.score(&"a".repeat(200)), 100);
    }

    #[test]
    fn test_regex_metacharacters_are_escaped() {
        let config = ScoringConfig {
            forbidden_words: vec!["a.b".to_string()],
            ..ScoringConfig::default()
        };
        let engine = ScoringEngine::new(config).unwrap();
        assert_eq!(engine.score("axb"), 50);
        assert_eq!(engine.score("say a.b now"), 40);
    }

    #[test]
    fn test_default_config_values() {
        let config = engine().config().clone();
        assert_eq!(config.base_score, 50);
        assert_eq!(config.length_threshold, 100);
        assert_eq!(config.length_bonus, 20);
        assert_eq!(config.forbidden_word_penalty, 10);
        assert_eq!((config.min_score, config.max_score), (0, 100));
        assert!(config.forbidden_words.contains(&"fraude".to_string()));
    }

    #[test]
    fn test_invalid_config_lists_every_problem() {
        let config = ScoringConfig {
            min_score: 10,
            max_score: 0,
            length_bonus: -1,
            forbidden_words: vec!["".to_string(), " fake".to_string()],
            ..ScoringConfig::default()
        };
        match ScoringEngine::new(config) {
            Err(ScoringError::InvalidConfig(errors)) => assert_eq!(errors.len(), 4),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_base_score_outside_bounds_rejected() {
        let config = ScoringConfig {
            base_score: 150,
            ..ScoringConfig::default()
        };
        assert!(ScoringEngine::new(config).is_err());
    }

    #[test]
    fn test_case_insensitive_duplicate_words_rejected() {
        let config = ScoringConfig {
            forbidden_words: vec![
                "fraude".to_string(),
                "spam".to_string(),
                "FRAUDE".to_string(),
            ],
            ..ScoringConfig::default()
        };
        match ScoringEngine::new(config) {
            Err(ScoringError::InvalidConfig(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("forbidden_words[2]"));
                assert!(errors[0].contains("forbidden_words[0]"));
            }
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_accented_and_plain_words_are_not_duplicates() {
        let config = ScoringConfig {
            forbidden_words: vec!["illégal".to_string(), "ILLEGAL".to_string()],
            ..ScoringConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
[scoring]
length_threshold = 10
forbidden_words = ["spam"]
"#;
        let config = ScoringConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.length_threshold, 10);
        assert_eq!(config.base_score, 50);
        assert_eq!(config.forbidden_words, vec!["spam"]);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(ScoringConfig::from_toml_str("").unwrap(), ScoringConfig::default());
    }

    #[test]
    fn test_unknown_toml_key_rejected() {
        let toml = "[scoring]\nbonus = 5\n";
        assert!(matches!(
            ScoringConfig::from_toml_str(toml),
            Err(ScoringError::Load(_))
        ));
    }
}
