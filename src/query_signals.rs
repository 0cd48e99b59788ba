use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::config;
use crate::matching::contains_word;

static FILLER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let words = config::FILLER_WORDS.join("|");
    // The word list is static and alternation-safe, so compilation cannot
    // fail at runtime.
    Regex::new(&format!(r"\b(?:{})\b", words)).unwrap()
});

static GROUND_BEEF_PHRASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:ground beef|minced beef|beef mince)\b").unwrap());

/// Lowercases, strips filler words and collapses whitespace.
pub fn clean_query(raw_query: &str) -> String {
    let lowered = raw_query.to_lowercase();
    let stripped = FILLER_PATTERN.replace_all(&lowered, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compound intents that a single required term cannot express.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialMatcher {
    /// Any ground/minced beef variant: the text must mention beef and one of
    /// the mince forms.
    GroundBeef,
}

impl SpecialMatcher {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            SpecialMatcher::GroundBeef => {
                contains_word(text, "beef")
                    && (contains_word(text, "mince")
                        || contains_word(text, "minced")
                        || contains_word(text, "ground beef")
                        || contains_word(text, "beef mince")
                        || contains_word(text, "minced beef"))
            }
        }
    }
}

/// Signals derived from the raw query; recomputed per search, never stored.
#[derive(Debug, Clone, Default)]
pub struct QuerySignals {
    /// Cleaned lowercase query with filler words removed.
    pub raw: String,
    /// Deduplicated terms a displayed result should cover. The bare word
    /// "ground" is excluded; it only qualifies other terms.
    pub required_terms: Vec<String>,
    pub special_matchers: Vec<SpecialMatcher>,
}

impl QuerySignals {
    pub fn from_query(raw_query: &str) -> Self {
        let cleaned = clean_query(raw_query);

        let mut seen = HashSet::new();
        let required_terms: Vec<String> = cleaned
            .split_whitespace()
            .filter(|word| word.len() > 1 && *word != "ground")
            .filter(|word| seen.insert(word.to_string()))
            .map(|word| word.to_string())
            .collect();

        let mut special_matchers = Vec::new();
        if GROUND_BEEF_PHRASE.is_match(&cleaned)
            || (cleaned.contains("ground") && cleaned.contains("beef"))
        {
            special_matchers.push(SpecialMatcher::GroundBeef);
        }

        Self {
            raw: cleaned,
            required_terms,
            special_matchers,
        }
    }

    /// A broad query narrows nothing at display time.
    pub fn is_broad(&self) -> bool {
        self.required_terms.len() < 2 && self.special_matchers.is_empty()
    }

    /// Required terms plausible as API ingredient filters. The intersection
    /// strategy only runs when at least two exist.
    pub fn ingredient_intent(&self) -> Vec<&str> {
        self.required_terms
            .iter()
            .map(String::as_str)
            .filter(|term| term.len() > 2)
            .collect()
    }

    /// Terms the user explicitly asked for, expanded with configured aliases.
    /// A blocked term in this set is exempt from the strict filter.
    pub fn user_requested_terms(&self) -> HashSet<String> {
        let mut requested: HashSet<String> =
            self.required_terms.iter().cloned().collect();
        for term in &self.required_terms {
            if let Some(aliases) = config::aliases_for(term) {
                for alias in aliases {
                    requested.insert((*alias).to_string());
                }
            }
        }
        if self.raw.contains("ground") && self.raw.contains("beef") {
            for term in ["ground beef", "minced beef", "beef mince", "mince"] {
                requested.insert(term.to_string());
            }
        }
        requested
    }
}

/// Derives the expanded search-term set driving the retriever's name and
/// ingredient passes: the cleaned phrase, each word, configured synonyms,
/// adjacent bigrams and two compound expansions. Single-character terms are
/// dropped. Insertion order is preserved so retrieval visits terms
/// deterministically.
pub fn build_search_terms(raw_query: &str) -> Vec<String> {
    let cleaned = clean_query(raw_query);

    let mut terms: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let push = |term: &str, terms: &mut Vec<String>, seen: &mut HashSet<String>| {
        if term.len() > 1 && seen.insert(term.to_string()) {
            terms.push(term.to_string());
        }
    };

    if !cleaned.is_empty() {
        push(&cleaned, &mut terms, &mut seen);
    }

    let words: Vec<&str> = cleaned.split_whitespace().collect();
    for word in &words {
        push(word, &mut terms, &mut seen);
        for synonym in config::synonyms_for(word) {
            push(synonym, &mut terms, &mut seen);
        }
    }

    for pair in words.windows(2) {
        push(&format!("{} {}", pair[0], pair[1]), &mut terms, &mut seen);
    }

    if words.contains(&"ground") && words.contains(&"beef") {
        push("beef mince", &mut terms, &mut seen);
        push("mince", &mut terms, &mut seen);
    }
    if words.contains(&"pasta") && words.contains(&"chicken") {
        push("chicken pasta", &mut terms, &mut seen);
        push("chicken", &mut terms, &mut seen);
        push("pasta", &mut terms, &mut seen);
    }

    terms
}
