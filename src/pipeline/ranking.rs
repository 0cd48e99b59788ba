use std::cmp::Ordering;

use crate::api_connection::endpoints::MealRecord;
use crate::config::{AppConfig, FilterConfig, RankingWeights};
use crate::matching::term_matches;
use crate::query_signals::QuerySignals;

/// Per-candidate sub-scores, each clamped to [0, 100]. Ephemeral; never
/// mutates the record it describes.
#[derive(Debug, Clone, Copy)]
pub struct ScoreBreakdown {
    pub familiarity: f64,
    pub budget_proxy: f64,
    pub simplicity: f64,
    pub query_intent: f64,
}

impl ScoreBreakdown {
    pub fn weighted(&self, weights: &RankingWeights) -> f64 {
        self.familiarity * weights.familiarity
            + self.budget_proxy * weights.budget_proxy
            + self.simplicity * weights.simplicity
            + self.query_intent * weights.query_intent
    }
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn score_familiarity(text: &str, title: &str, config: &FilterConfig) -> f64 {
    let mut score = 20.0;
    for format_term in config.preferred_dinner_formats {
        if term_matches(text, format_term) {
            score += 10.0;
        }
        if term_matches(title, format_term) {
            score += 4.0;
        }
    }
    for protein_term in config.allowed_protein_terms {
        if term_matches(text, protein_term) {
            score += 4.0;
        }
    }
    clamp_score(score)
}

/// Cheap-to-cook heuristic; also backs the budget toggle.
pub fn score_budget_proxy(text: &str, config: &FilterConfig) -> f64 {
    let mut score = 65.0;
    let expensive_hits = config
        .blocked_expensive_terms
        .iter()
        .filter(|term| term_matches(text, term))
        .count();
    score -= expensive_hits as f64 * 18.0;

    for staple in config.budget_staple_terms {
        if term_matches(text, staple) {
            score += 5.0;
        }
    }
    clamp_score(score)
}

fn score_simplicity(meal: &MealRecord) -> f64 {
    let ingredient_count = meal.ingredient_count() as f64;
    let step_count = meal.instruction_steps().len() as f64;

    let mut score = 100.0;
    score -= (ingredient_count - 8.0).max(0.0) * 5.0;
    score -= (step_count - 7.0).max(0.0) * 4.0;
    clamp_score(score)
}

fn score_query_intent(text: &str, title: &str, signals: &QuerySignals) -> f64 {
    if signals.required_terms.is_empty() && signals.special_matchers.is_empty() {
        // Recommendation context: no intent to reward or punish.
        return 60.0;
    }

    let mut score = 0.0;
    for term in &signals.required_terms {
        if term_matches(text, term) {
            score += 16.0;
        }
        if term_matches(title, term) {
            score += 6.0;
        }
    }

    if has_all_required_terms(text, signals) {
        score += 25.0;
    }
    if !signals.special_matchers.is_empty() {
        score += if has_all_special_matches(text, signals) {
            25.0
        } else {
            -18.0
        };
    }
    clamp_score(score)
}

pub fn build_score_breakdown(
    meal: &MealRecord,
    signals: &QuerySignals,
    config: &FilterConfig,
) -> ScoreBreakdown {
    let text = meal.searchable_text();
    let title = meal.title.to_lowercase();
    ScoreBreakdown {
        familiarity: score_familiarity(&text, &title, config),
        budget_proxy: score_budget_proxy(&text, config),
        simplicity: score_simplicity(meal),
        query_intent: score_query_intent(&text, &title, signals),
    }
}

pub fn count_matched_required_terms(text: &str, signals: &QuerySignals) -> usize {
    signals
        .required_terms
        .iter()
        .filter(|term| term_matches(text, term))
        .count()
}

pub fn has_all_required_terms(text: &str, signals: &QuerySignals) -> bool {
    signals
        .required_terms
        .iter()
        .all(|term| term_matches(text, term))
}

pub fn has_all_special_matches(text: &str, signals: &QuerySignals) -> bool {
    signals
        .special_matchers
        .iter()
        .all(|matcher| matcher.matches(text))
}

struct ScoredMeal {
    meal: MealRecord,
    index: usize,
    breakdown: ScoreBreakdown,
    weighted: f64,
    matched_count: usize,
    all_terms_match: bool,
    special_match: bool,
}

/// Ranks candidates descending by query fit. The comparison chain ends on
/// title, numeric id and input index, so the order is a strict total order:
/// the same candidate set ranks identically regardless of input order.
pub fn rank_meals_for_query(
    meals: Vec<MealRecord>,
    signals: &QuerySignals,
    config: &AppConfig,
) -> Vec<MealRecord> {
    let mut scored: Vec<ScoredMeal> = meals
        .into_iter()
        .enumerate()
        .map(|(index, meal)| {
            let breakdown = build_score_breakdown(&meal, signals, &config.filter);
            let text = meal.searchable_text();
            ScoredMeal {
                weighted: breakdown.weighted(&config.weights),
                matched_count: count_matched_required_terms(&text, signals),
                all_terms_match: has_all_required_terms(&text, signals),
                special_match: has_all_special_matches(&text, signals),
                meal,
                index,
                breakdown,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.special_match
            .cmp(&a.special_match)
            .then(b.all_terms_match.cmp(&a.all_terms_match))
            .then(b.matched_count.cmp(&a.matched_count))
            .then(
                b.weighted
                    .partial_cmp(&a.weighted)
                    .unwrap_or(Ordering::Equal),
            )
            .then_with(|| a.meal.title.to_lowercase().cmp(&b.meal.title.to_lowercase()))
            .then_with(|| numeric_id(&a.meal).cmp(&numeric_id(&b.meal)))
            .then(a.index.cmp(&b.index))
    });

    if config.debug_score_breakdown {
        print_score_table(&scored);
    }

    scored.into_iter().map(|item| item.meal).collect()
}

fn numeric_id(meal: &MealRecord) -> u64 {
    meal.id.parse().unwrap_or(0)
}

fn print_score_table(scored: &[ScoredMeal]) {
    println!("{:<40} {:>8} {:>6} {:>6} {:>6} {:>6}", "meal", "weighted", "fam", "budget", "simpl", "intent");
    for item in scored.iter().take(12) {
        println!(
            "{:<40} {:>8.2} {:>6.0} {:>6.0} {:>6.0} {:>6.0}",
            item.meal.title,
            item.weighted,
            item.breakdown.familiarity,
            item.breakdown.budget_proxy,
            item.breakdown.simplicity,
            item.breakdown.query_intent,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn meal(id: &str, title: &str, ingredients: &[&str]) -> MealRecord {
        let mut slots = HashMap::new();
        for (i, ingredient) in ingredients.iter().enumerate() {
            slots.insert(
                format!("strIngredient{}", i + 1),
                Some((*ingredient).to_string()),
            );
        }
        MealRecord {
            id: id.to_string(),
            title: title.to_string(),
            slots,
            ..Default::default()
        }
    }

    #[test]
    fn test_sub_scores_are_clamped() {
        let config = FilterConfig::default();

        // 18 ingredients and a wall of steps drive simplicity far below zero
        // before clamping.
        let names: Vec<String> = (0..18).map(|i| format!("item{i}")).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut overloaded = meal("1", "Everything Stew", &name_refs);
        overloaded.instructions = Some(
            (0..50)
                .map(|i| format!("Step {i}."))
                .collect::<Vec<_>>()
                .join(" "),
        );
        let signals = QuerySignals::from_query("beef");
        let breakdown = build_score_breakdown(&overloaded, &signals, &config);
        for sub in [
            breakdown.familiarity,
            breakdown.budget_proxy,
            breakdown.simplicity,
            breakdown.query_intent,
        ] {
            assert!((0.0..=100.0).contains(&sub), "out of range: {sub}");
        }
        assert_eq!(breakdown.simplicity, 30.0); // steps capped at 12

        // A pool of expensive terms floors budget-proxy at 0.
        let fancy = meal(
            "2",
            "Decadence",
            &["lobster", "truffle", "saffron", "scallop", "duck"],
        );
        let breakdown = build_score_breakdown(&fancy, &signals, &config);
        assert_eq!(breakdown.budget_proxy, 0.0);
    }

    #[test]
    fn test_neutral_intent_for_empty_signals() {
        let config = FilterConfig::default();
        let signals = QuerySignals::from_query("dinner");
        let breakdown =
            build_score_breakdown(&meal("1", "Chicken Rice", &["chicken"]), &signals, &config);
        assert_eq!(breakdown.query_intent, 60.0);
    }

    #[test]
    fn test_all_terms_matched_ranks_first() {
        let config = AppConfig::default();
        let signals = QuerySignals::from_query("chicken pasta");
        let pool = vec![
            meal("1", "Beef Chili", &["beef"]),
            meal("2", "Chicken Alfredo", &["chicken", "spaghetti"]),
            meal("3", "Chicken Soup", &["chicken"]),
        ];
        let ranked = rank_meals_for_query(pool, &signals, &config);
        assert_eq!(ranked[0].id, "2");
        assert_eq!(ranked[1].id, "3");
        assert_eq!(ranked[2].id, "1");
    }

    #[test]
    fn test_special_match_outranks_weighted_score() {
        let config = AppConfig::default();
        let signals = QuerySignals::from_query("ground beef");
        let pool = vec![
            meal("1", "Beef Wellington", &["beef", "pastry"]),
            meal("2", "Beef Mince Ragu", &["beef mince", "tomato"]),
        ];
        let ranked = rank_meals_for_query(pool, &signals, &config);
        assert_eq!(ranked[0].id, "2");
    }

    #[test]
    fn test_ranking_is_input_order_independent() {
        let config = AppConfig::default();
        let signals = QuerySignals::from_query("chicken pasta");
        let pool = vec![
            meal("11", "Chicken Alfredo", &["chicken", "spaghetti"]),
            meal("7", "Chicken Penne", &["chicken", "penne"]),
            meal("23", "Beef Chili", &["beef"]),
            meal("4", "Chicken Soup", &["chicken"]),
        ];

        let baseline: Vec<String> = rank_meals_for_query(pool.clone(), &signals, &config)
            .iter()
            .map(|m| m.id.clone())
            .collect();

        let mut reversed = pool;
        reversed.reverse();
        let again: Vec<String> = rank_meals_for_query(reversed, &signals, &config)
            .iter()
            .map(|m| m.id.clone())
            .collect();
        assert_eq!(baseline, again);
    }

    #[test]
    fn test_title_then_numeric_id_break_ties() {
        let config = AppConfig::default();
        let signals = QuerySignals::from_query("");
        let pool = vec![
            meal("20", "Chicken Rice", &["chicken", "rice"]),
            meal("3", "Chicken Rice", &["chicken", "rice"]),
            meal("5", "Beef Rice", &["beef", "rice"]),
        ];
        let ranked = rank_meals_for_query(pool, &signals, &config);
        // Identical scores: "beef rice" sorts before "chicken rice"; equal
        // titles order by numeric id.
        assert_eq!(ranked[0].id, "5");
        assert_eq!(ranked[1].id, "3");
        assert_eq!(ranked[2].id, "20");
    }
}
