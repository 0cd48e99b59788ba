use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::config;

// Word-boundary patterns are compiled once per distinct term; the term
// vocabulary is small and fixed so the cache never grows past a few dozen
// entries.
static WORD_PATTERNS: Lazy<Mutex<HashMap<String, Regex>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// True when `text` contains `word` as a whole word (case-sensitive; callers
/// pass lowercased text and terms). A bare substring is not enough:
/// "overpriced" does not contain the word "rice".
pub fn contains_word(text: &str, word: &str) -> bool {
    let mut cache = match WORD_PATTERNS.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(pattern) = cache.get(word) {
        return pattern.is_match(text);
    }
    match Regex::new(&format!(r"\b{}\b", regex::escape(word))) {
        Ok(pattern) => {
            let hit = pattern.is_match(text);
            cache.insert(word.to_string(), pattern);
            hit
        }
        Err(_) => false,
    }
}

/// Alias-aware term match: `term` matches `text` when the term itself or any
/// configured alias appears as a whole word.
pub fn term_matches(text: &str, term: &str) -> bool {
    match config::aliases_for(term) {
        Some(aliases) => aliases.iter().any(|alias| contains_word(text, alias)),
        None => contains_word(text, term),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_boundary_is_respected() {
        assert!(!contains_word("overpriced groceries", "rice"));
        assert!(contains_word("fried rice with egg", "rice"));
        assert!(contains_word("rice", "rice"));
    }

    #[test]
    fn test_term_matches_through_aliases() {
        assert!(term_matches("creamy spaghetti bake", "pasta"));
        assert!(term_matches("beef mince and onions", "ground beef"));
        assert!(!term_matches("roast chicken", "pasta"));
    }

    #[test]
    fn test_term_without_aliases_matches_itself() {
        assert!(term_matches("garlic butter", "garlic"));
        assert!(!term_matches("garlicky butter", "garlic"));
    }

    #[test]
    fn test_multi_word_alias() {
        assert!(term_matches("easy one pot dinner", "onepot"));
        assert!(term_matches("weeknight skillet lasagna", "onepot"));
        assert!(!term_matches("potluck favourite", "onepot"));
    }
}
