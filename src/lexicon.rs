//! Tokenization and word classification for the deterministic engine

use crate::Result;
use regex::Regex;
use std::collections::HashSet;

/// Common English function words excluded from token streams.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "get", "has", "him", "his", "how", "its", "new", "now", "old", "see", "two",
    "way", "who", "did", "let", "put", "say", "she", "too", "use", "with", "this", "that", "from",
    "they", "will", "have", "been", "when", "what", "your", "than", "then", "them", "should",
];

/// Verbs that signal the primary intent of a ticket.
const ACTION_WORDS: &[&str] = &[
    "add", "create", "fix", "update", "remove", "delete", "implement", "refactor", "optimize",
    "improve", "enable", "disable", "migrate", "upgrade", "integrate", "validate", "resolve",
    "handle", "support", "configure", "setup", "build", "deploy", "merge", "rename", "move",
    "replace", "extend", "cleanup", "redesign",
];

/// Domain terms that carry high relevance for branch naming.
const TECH_KEYWORDS: &[&str] = &[
    "api", "database", "auth", "authentication", "authorization", "login", "logout", "token",
    "session", "cache", "migration", "endpoint", "service", "server", "client", "config",
    "deployment", "docker", "frontend", "backend", "css", "html", "javascript", "typescript",
    "react", "component", "module", "function", "method", "class", "interface", "schema", "query",
    "index", "table", "column", "webhook", "queue", "worker", "cron", "email", "notification",
    "payment", "security", "encryption", "validation", "logging", "metrics", "monitoring",
    "gateway",
];

/// Words too generic to be worth a slot in a short branch name.
const GENERIC_TERMS: &[&str] = &["user", "system", "page", "form", "button", "field"];

/// Closed word sets plus the tokenizer's precompiled pattern.
pub struct Lexicon {
    non_word_regex: Regex,
    stop_words: HashSet<&'static str>,
    action_words: HashSet<&'static str>,
    tech_keywords: HashSet<&'static str>,
    generic_terms: HashSet<&'static str>,
}

impl Lexicon {
    pub fn new() -> Result<Self> {
        Ok(Self {
            non_word_regex: Regex::new(r"[^\w\s-]")?,
            stop_words: STOP_WORDS.iter().copied().collect(),
            action_words: ACTION_WORDS.iter().copied().collect(),
            tech_keywords: TECH_KEYWORDS.iter().copied().collect(),
            generic_terms: GENERIC_TERMS.iter().copied().collect(),
        })
    }

    /// Tokenize free text into lower-cased, filtered words.
    ///
    /// Drops tokens that are too short, pure digits, or stop words.
    /// Deterministic for identical input.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let cleaned = self.non_word_regex.replace_all(&lowered, " ");

        cleaned
            .split_whitespace()
            .filter(|token| {
                token.len() > 2
                    && !self.stop_words.contains(token)
                    && !token.chars().all(|c| c.is_ascii_digit())
            })
            .map(|token| token.to_string())
            .collect()
    }

    /// Split text into lower-cased words with punctuation stripped, but
    /// without the tokenizer's length/stop-word/digit filtering. Used to
    /// backfill thin summaries.
    pub fn split_words(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.non_word_regex
            .replace_all(&lowered, " ")
            .split_whitespace()
            .map(|word| word.to_string())
            .collect()
    }

    /// Lower-case and strip a single word the way `tokenize` would,
    /// without length or stop-word filtering. Used when scanning the
    /// summary's own word order for the primary action.
    pub fn normalize_word(&self, word: &str) -> String {
        let lowered = word.to_lowercase();
        self.non_word_regex
            .replace_all(&lowered, "")
            .trim_matches('-')
            .to_string()
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    pub fn is_action_word(&self, token: &str) -> bool {
        self.action_words.contains(token)
    }

    pub fn is_tech_keyword(&self, token: &str) -> bool {
        self.tech_keywords.contains(token)
    }

    pub fn is_generic_term(&self, token: &str) -> bool {
        self.generic_terms.contains(token)
    }
}
