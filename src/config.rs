use std::env;

/// Default public TheMealDB endpoint; override with `MEALDB_API_BASE`.
pub const DEFAULT_API_BASE: &str = "https://www.themealdb.com/api/json/v1/1";
pub const API_BASE_ENV_VAR: &str = "MEALDB_API_BASE";

/// Query words that carry no search intent and are stripped before term
/// derivation.
pub const FILLER_WORDS: &[&str] = &[
    "with", "and", "for", "recipe", "recipes", "idea", "ideas", "dinner", "supper",
];

/// Single-word synonyms folded into the expanded name-search pass.
const TERM_SYNONYMS: &[(&str, &[&str])] = &[
    ("ground", &["minced"]),
    ("minced", &["ground"]),
    ("beef", &["beef", "mince"]),
    ("chicken", &["chicken", "chicken_breast"]),
    ("pasta", &["pasta"]),
    ("pork", &["pork"]),
    ("turkey", &["turkey"]),
    ("rice", &["rice"]),
    ("curry", &["curry"]),
    ("tomato", &["tomato"]),
    ("potato", &["potato"]),
];

/// Interchangeable surface forms for a concept. Term matching treats a hit on
/// any alias as a hit on the term itself.
const TERM_ALIASES: &[(&str, &[&str])] = &[
    (
        "pasta",
        &[
            "pasta",
            "spaghetti",
            "penne",
            "macaroni",
            "noodle",
            "noodles",
            "fettuccine",
            "linguine",
            "tagliatelle",
        ],
    ),
    ("rice", &["rice", "risotto"]),
    ("beef", &["beef", "steak"]),
    (
        "ground beef",
        &["ground beef", "minced beef", "beef mince", "mince"],
    ),
    ("chicken", &["chicken"]),
    (
        "ground pork",
        &["ground pork", "pork mince", "minced pork"],
    ),
    ("pork", &["pork"]),
    (
        "ground turkey",
        &["ground turkey", "turkey mince", "minced turkey"],
    ),
    ("turkey", &["turkey"]),
    ("sausage", &["sausage", "sausages"]),
    ("tacos", &["taco", "tacos"]),
    ("chili", &["chili", "chilli"]),
    ("casserole", &["casserole", "bake"]),
    (
        "stirfry",
        &["stir fry", "stir-fry", "stirfried", "stir-fried"],
    ),
    (
        "onepot",
        &["one pot", "one-pot", "one pan", "one-pan", "skillet"],
    ),
];

pub fn synonyms_for(word: &str) -> &'static [&'static str] {
    TERM_SYNONYMS
        .iter()
        .find(|(key, _)| *key == word)
        .map(|(_, synonyms)| *synonyms)
        .unwrap_or(&[])
}

/// Returns the configured aliases for `term`, or `None` when the term has no
/// alias entry (callers then match the bare term).
pub fn aliases_for(term: &str) -> Option<&'static [&'static str]> {
    TERM_ALIASES
        .iter()
        .find(|(key, _)| *key == term)
        .map(|(_, aliases)| *aliases)
}

/// Ingredient seeds used to build the recommendation pool. Not derived from
/// user input.
pub const RECOMMENDATION_SEED_INGREDIENTS: &[&str] = &[
    "chicken", "beef", "pork", "turkey", "sausage", "pasta", "rice",
];

/// Hard inclusion/exclusion term lists for weeknight-friendly results.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub allowed_protein_terms: &'static [&'static str],
    pub blocked_expensive_terms: &'static [&'static str],
    pub blocked_niche_terms: &'static [&'static str],
    pub preferred_dinner_formats: &'static [&'static str],
    pub seafood_terms: &'static [&'static str],
    pub budget_staple_terms: &'static [&'static str],
    /// Budget-proxy score a record must reach to pass the budget toggle.
    pub budget_score_floor: f64,
    /// Estimated cook-time ceiling for the under-30 toggle, in minutes.
    pub quick_minutes_ceiling: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            allowed_protein_terms: &[
                "chicken",
                "beef",
                "ground beef",
                "pork",
                "ground pork",
                "turkey",
                "ground turkey",
                "sausage",
            ],
            blocked_expensive_terms: &[
                "prawn", "lobster", "crab", "scallop", "duck", "saffron", "truffle",
            ],
            blocked_niche_terms: &[
                "baba ganoush",
                "pho",
                "tagine",
                "rendang",
                "yakitori",
                "sashimi",
            ],
            preferred_dinner_formats: &[
                "pasta", "tacos", "chili", "casserole", "rice", "stirfry", "onepot",
            ],
            seafood_terms: &[
                "fish", "salmon", "shrimp", "prawn", "tuna", "cod", "seafood", "crab",
                "lobster",
            ],
            budget_staple_terms: &[
                "rice",
                "pasta",
                "potato",
                "onion",
                "garlic",
                "canned tomato",
                "ground beef",
                "ground pork",
                "ground turkey",
            ],
            budget_score_floor: 55.0,
            quick_minutes_ceiling: 30,
        }
    }
}

/// Fixed sub-score weights; must sum to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct RankingWeights {
    pub familiarity: f64,
    pub budget_proxy: f64,
    pub simplicity: f64,
    pub query_intent: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            familiarity: 0.32,
            budget_proxy: 0.24,
            simplicity: 0.20,
            query_intent: 0.24,
        }
    }
}

/// Fan-out bounds for the candidate retriever and result caps for display.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    /// Candidate-map ceiling for the search path.
    pub candidate_pool_size: usize,
    /// Detail lookups issued per ingredient-filter batch.
    pub ingredient_lookup_limit: usize,
    /// Ingredient-intent terms used for the intersection strategy.
    pub intersection_term_limit: usize,
    /// Identity cap for the recommendation pool.
    pub recommendation_pool_size: usize,
    /// Matches taken per recommendation seed ingredient.
    pub recommendation_seed_take: usize,
    pub max_search_results: usize,
    pub recommended_count: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            candidate_pool_size: 60,
            ingredient_lookup_limit: 20,
            intersection_term_limit: 3,
            recommendation_pool_size: 70,
            recommendation_seed_take: 10,
            max_search_results: 8,
            recommended_count: 6,
        }
    }
}

/// Immutable per-process configuration, built once and injected into the
/// pipeline stages.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub filter: FilterConfig,
    pub weights: RankingWeights,
    pub limits: SearchLimits,
    pub debug_score_breakdown: bool,
}

/// Resolves the API base URL, honoring `.env` files and the process
/// environment.
pub fn api_base_from_env() -> String {
    dotenv::dotenv().ok();
    env::var(API_BASE_ENV_VAR).unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
}
