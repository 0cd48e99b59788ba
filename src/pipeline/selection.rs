use std::collections::{BTreeMap, HashSet, VecDeque};

use crate::api_connection::endpoints::MealRecord;
use crate::config::{AppConfig, FilterConfig};
use crate::matching::term_matches;
use crate::pipeline::ranking::{
    has_all_required_terms, has_all_special_matches, rank_meals_for_query,
};
use crate::query_signals::QuerySignals;

/// Narrows ranked candidates to those that literally cover the query, with
/// graduated fallback: broad queries pass through unchanged; otherwise
/// require all terms plus all special matchers, then all terms only, then
/// give up with an empty list (the caller renders an empty state rather than
/// guessing).
pub fn select_meals_for_display(
    meals: Vec<MealRecord>,
    signals: &QuerySignals,
) -> Vec<MealRecord> {
    if signals.is_broad() {
        return meals;
    }

    let strong: Vec<MealRecord> = meals
        .iter()
        .filter(|meal| {
            let text = meal.searchable_text();
            has_all_required_terms(&text, signals) && has_all_special_matches(&text, signals)
        })
        .cloned()
        .collect();
    if !strong.is_empty() {
        return strong;
    }

    meals
        .into_iter()
        .filter(|meal| has_all_required_terms(&meal.searchable_text(), signals))
        .collect()
}

fn primary_protein_label(meal: &MealRecord, config: &FilterConfig) -> String {
    let text = meal.searchable_text();
    config
        .allowed_protein_terms
        .iter()
        .find(|term| term_matches(&text, term))
        .map(|term| (*term).to_string())
        .unwrap_or_else(|| "other".to_string())
}

fn primary_format_label(meal: &MealRecord, config: &FilterConfig) -> String {
    let text = meal.searchable_text();
    config
        .preferred_dinner_formats
        .iter()
        .find(|term| term_matches(&text, term))
        .map(|term| (*term).to_string())
        .unwrap_or_else(|| "general".to_string())
}

/// Assembles a varied recommendation set: ranks the pool with neutral
/// signals, buckets by (protein, format), then round-robins one pick per
/// bucket in lexicographic key order until the limit is reached or a full
/// round makes no progress. Never returns duplicate identities and never
/// exceeds `limit`.
pub fn pick_varied_recommendations(
    meals: Vec<MealRecord>,
    limit: usize,
    config: &AppConfig,
) -> Vec<MealRecord> {
    let neutral = QuerySignals::from_query("dinner");
    let ranked = rank_meals_for_query(meals, &neutral, config);

    let mut buckets: BTreeMap<(String, String), VecDeque<MealRecord>> = BTreeMap::new();
    for meal in ranked {
        let key = (
            primary_protein_label(&meal, &config.filter),
            primary_format_label(&meal, &config.filter),
        );
        buckets.entry(key).or_default().push_back(meal);
    }

    let mut selected: Vec<MealRecord> = Vec::new();
    let mut selected_ids: HashSet<String> = HashSet::new();

    while selected.len() < limit {
        let mut progressed = false;
        for queue in buckets.values_mut() {
            if selected.len() >= limit {
                break;
            }
            let Some(candidate) = queue.pop_front() else {
                continue;
            };
            if selected_ids.insert(candidate.id.clone()) {
                selected.push(candidate);
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    selected
}
