//! Deterministic rule-based name generation
//!
//! The non-model tier: tokenize the ticket text, score every token for
//! relevance, and assemble the highest-ranked tokens into a short slug.
//! Produces a result for any input without network access.

use crate::lexicon::Lexicon;
use crate::{slug, Result};
use std::collections::HashSet;

/// Maximum number of name parts taken from the ranked token list.
const MAX_NAME_PARTS: usize = 4;

/// Character budget for the assembled (pre-ticket-id) name.
const MAX_NAME_LENGTH: usize = 30;

/// Last-resort name when no usable token survives filtering.
const ULTIMATE_FALLBACK: &str = "update";

/// Intermediate classification of the ticket text, discarded after use.
#[derive(Debug, Clone)]
pub struct TokenAnalysis {
    pub tokens: Vec<String>,
    pub actions: Vec<String>,
    pub tech_terms: Vec<String>,
    pub entities: Vec<String>,
    pub primary_action: Option<String>,
    pub ranked_tokens: Vec<String>,
}

/// Rule-based branch name generator used when the model tier is
/// unavailable. Total: always returns a non-empty slug.
pub struct FallbackGenerator {
    lexicon: Lexicon,
}

impl FallbackGenerator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            lexicon: Lexicon::new()?,
        })
    }

    /// Generate a branch name from ticket data without any model call.
    ///
    /// Identical inputs always produce identical output.
    pub fn generate(
        &self,
        ticket_id: &str,
        summary: &str,
        description: Option<&str>,
        prefix: Option<&str>,
    ) -> String {
        let analysis = self.analyze(summary, description);
        let name = self.assemble_name(&analysis, summary);

        let mut composed = format!("{}-{}", ticket_id, name);
        if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
            composed = format!("{}/{}", prefix, composed);
        }

        slug::sanitize(&slug::enforce_length(&composed, ticket_id))
    }

    /// Classify and rank the ticket's tokens.
    pub fn analyze(&self, summary: &str, description: Option<&str>) -> TokenAnalysis {
        let text = match description {
            Some(desc) => format!("{} {}", summary, desc),
            None => summary.to_string(),
        };
        let tokens = self.lexicon.tokenize(&text);

        let mut actions = Vec::new();
        let mut tech_terms = Vec::new();
        let mut entities = Vec::new();
        for token in &tokens {
            if self.lexicon.is_action_word(token) {
                if !actions.contains(token) {
                    actions.push(token.clone());
                }
            } else if self.lexicon.is_tech_keyword(token) {
                if !tech_terms.contains(token) {
                    tech_terms.push(token.clone());
                }
            } else if Self::is_entity(token) && !entities.contains(token) {
                entities.push(token.clone());
            }
        }

        let primary_action = self
            .find_primary_action(summary)
            .or_else(|| actions.first().cloned());

        let ranked_tokens = self.rank_tokens(&tokens, &entities);

        TokenAnalysis {
            tokens,
            actions,
            tech_terms,
            entities,
            primary_action,
            ranked_tokens,
        }
    }

    /// Scan the summary's own word order for the first action word.
    fn find_primary_action(&self, summary: &str) -> Option<String> {
        summary
            .split_whitespace()
            .map(|word| self.lexicon.normalize_word(word))
            .find(|word| self.lexicon.is_action_word(word))
    }

    /// Nouns worth surfacing: longer unclassified tokens and common
    /// nominal suffixes.
    fn is_entity(token: &str) -> bool {
        token.len() > 4
            || token.ends_with("ing")
            || token.ends_with("tion")
            || token.ends_with("ment")
    }

    /// Score distinct tokens and order them by descending relevance.
    /// Ties keep first-occurrence order (stable sort).
    fn rank_tokens(&self, tokens: &[String], entities: &[String]) -> Vec<String> {
        let mut distinct: Vec<&String> = Vec::new();
        for token in tokens {
            if !distinct.contains(&token) {
                distinct.push(token);
            }
        }

        let mut scored: Vec<(i32, &String)> = distinct
            .into_iter()
            .map(|token| (self.score_token(token, entities), token))
            .collect();
        scored.sort_by_key(|(score, _)| -score);

        scored.into_iter().map(|(_, token)| token.clone()).collect()
    }

    fn score_token(&self, token: &str, entities: &[String]) -> i32 {
        let mut score = 1;
        if self.lexicon.is_action_word(token) {
            score += 5;
        }
        if self.lexicon.is_tech_keyword(token) {
            score += 4;
        }
        if entities.iter().any(|e| e == token) {
            score += 2;
        }
        if token.len() > 6 {
            score += 1;
        }
        if self.lexicon.is_generic_term(token) {
            score -= 1;
        }
        score
    }

    /// Assemble ranked tokens into the hyphenated name portion.
    fn assemble_name(&self, analysis: &TokenAnalysis, summary: &str) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut used: HashSet<String> = HashSet::new();

        if let Some(action) = &analysis.primary_action {
            parts.push(action.clone());
            used.insert(action.clone());
        }

        for token in &analysis.ranked_tokens {
            if parts.len() >= MAX_NAME_PARTS || joined_len(&parts) >= MAX_NAME_LENGTH {
                break;
            }
            if used.insert(token.clone()) {
                parts.push(token.clone());
            }
        }

        // Thin summaries still need at least two parts
        if parts.len() < 2 {
            for word in self.backfill_words(summary, &used) {
                used.insert(word.clone());
                parts.push(word);
            }
        }

        let mut name = parts.join("-");
        while name.contains("--") {
            name = name.replace("--", "-");
        }
        let name: String = name.trim_matches('-').chars().take(MAX_NAME_LENGTH).collect();

        if name.is_empty() {
            ULTIMATE_FALLBACK.to_string()
        } else {
            name
        }
    }

    /// Raw summary words usable as padding when ranking produced too few
    /// parts: longer than 3 chars, not stop words, not already used.
    fn backfill_words(&self, summary: &str, used: &HashSet<String>) -> Vec<String> {
        self.lexicon
            .split_words(summary)
            .into_iter()
            .filter(|word| {
                word.len() > 3 && !self.lexicon.is_stop_word(word) && !used.contains(word)
            })
            .take(3)
            .collect()
    }
}

fn joined_len(parts: &[String]) -> usize {
    if parts.is_empty() {
        return 0;
    }
    parts.iter().map(|p| p.len()).sum::<usize>() + parts.len() - 1
}
