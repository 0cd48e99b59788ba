use std::collections::BTreeMap;

use crate::api_connection::endpoints::MealRecord;
use crate::config::FilterConfig;
use crate::matching::term_matches;
use crate::pipeline::ranking::score_budget_proxy;
use crate::query_signals::QuerySignals;

/// Snapshot of the host's filter toggles. Owned by the host and read-only to
/// the pipeline; consumed once per invocation.
#[derive(Debug, Clone)]
pub struct UiFilters {
    pub under_30: bool,
    pub one_pot: bool,
    pub budget_mode: bool,
    pub exclude_seafood: bool,
    pub comfort_classics_only: bool,
    /// Per-protein chips; an enabled entry narrows results to that protein.
    pub proteins: BTreeMap<String, bool>,
}

impl Default for UiFilters {
    fn default() -> Self {
        let proteins = ["chicken", "beef", "pork", "turkey", "sausage"]
            .into_iter()
            .map(|p| (p.to_string(), false))
            .collect();
        Self {
            under_30: false,
            one_pot: false,
            budget_mode: false,
            exclude_seafood: true,
            comfort_classics_only: false,
            proteins,
        }
    }
}

impl UiFilters {
    pub fn active_proteins(&self) -> Vec<&str> {
        self.proteins
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(protein, _)| protein.as_str())
            .collect()
    }
}

/// Strict weeknight pass: requires an allowed protein, rejects blocked
/// expensive/niche terms unless the user explicitly asked for them, and
/// prefers recognizable dinner formats when any survivor has one.
///
/// An empty result stays empty; the caller decides whether to offer the
/// relaxed escape hatch, which bypasses this stage entirely.
pub fn apply_strict_pre_filters(
    meals: Vec<MealRecord>,
    signals: &QuerySignals,
    config: &FilterConfig,
    relaxed: bool,
) -> Vec<MealRecord> {
    if relaxed {
        return meals;
    }

    let user_requested = signals.user_requested_terms();

    let strict_matches: Vec<MealRecord> = meals
        .into_iter()
        .filter(|meal| {
            let text = meal.searchable_text();

            let has_allowed_protein = config
                .allowed_protein_terms
                .iter()
                .any(|term| term_matches(&text, term));
            if !has_allowed_protein {
                return false;
            }

            let blocked = config
                .blocked_expensive_terms
                .iter()
                .chain(config.blocked_niche_terms.iter())
                .any(|term| term_matches(&text, term) && !user_requested.contains(*term));
            !blocked
        })
        .collect();

    if strict_matches.is_empty() {
        return Vec::new();
    }

    let preferred: Vec<MealRecord> = strict_matches
        .iter()
        .filter(|meal| {
            let text = meal.searchable_text();
            config
                .preferred_dinner_formats
                .iter()
                .any(|term| term_matches(&text, term))
        })
        .cloned()
        .collect();

    if preferred.is_empty() {
        strict_matches
    } else {
        preferred
    }
}

/// User-toggle pass: each active toggle is an independent predicate and the
/// result is their conjunction, so application order never matters.
pub fn apply_ui_toggles(
    meals: Vec<MealRecord>,
    ui: &UiFilters,
    config: &FilterConfig,
) -> Vec<MealRecord> {
    let active_proteins = ui.active_proteins();

    meals
        .into_iter()
        .filter(|meal| {
            let text = meal.searchable_text();

            if ui.exclude_seafood
                && config
                    .seafood_terms
                    .iter()
                    .any(|term| term_matches(&text, term))
            {
                return false;
            }
            if ui.one_pot && !term_matches(&text, "onepot") {
                return false;
            }
            if ui.comfort_classics_only
                && !config
                    .preferred_dinner_formats
                    .iter()
                    .any(|term| term_matches(&text, term))
            {
                return false;
            }
            if !active_proteins.is_empty()
                && !active_proteins.iter().any(|p| term_matches(&text, p))
            {
                return false;
            }
            if ui.under_30
                && meal.estimate_cook_time_minutes() > config.quick_minutes_ceiling
            {
                return false;
            }
            if ui.budget_mode && score_budget_proxy(&text, config) < config.budget_score_floor {
                return false;
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
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

    fn ids(meals: &[MealRecord]) -> Vec<&str> {
        meals.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_strict_requires_allowed_protein() {
        let config = FilterConfig::default();
        let pool = vec![
            meal("1", "Chicken Curry", &["chicken", "onion"]),
            meal("2", "Vegetable Soup", &["carrot", "celery"]),
        ];
        let signals = QuerySignals::from_query("");
        let out = apply_strict_pre_filters(pool, &signals, &config, false);
        assert_eq!(ids(&out), vec!["1"]);
    }

    #[test]
    fn test_strict_output_is_subset_of_input() {
        let config = FilterConfig::default();
        let pool = vec![
            meal("1", "Chicken Pasta", &["chicken", "spaghetti"]),
            meal("2", "Lobster Roll", &["lobster"]),
            meal("3", "Beef Stew", &["beef", "potato"]),
        ];
        let input_ids: Vec<String> = pool.iter().map(|m| m.id.clone()).collect();
        let signals = QuerySignals::from_query("beef");
        let out = apply_strict_pre_filters(pool, &signals, &config, false);
        assert!(out.iter().all(|m| input_ids.contains(&m.id)));
    }

    #[test]
    fn test_strict_all_blocked_pool_yields_empty() {
        let config = FilterConfig::default();
        let pool = vec![
            meal("1", "Lobster Bisque", &["lobster", "cream"]),
            meal("2", "Lobster Mac", &["lobster", "macaroni"]),
        ];
        let signals = QuerySignals::from_query("chicken pasta");
        let out = apply_strict_pre_filters(pool, &signals, &config, false);
        assert!(out.is_empty());
    }

    #[test]
    fn test_blocked_term_exempt_when_explicitly_requested() {
        let config = FilterConfig::default();
        let pool = vec![meal("1", "Crispy Duck", &["duck", "chicken stock"])];

        let unrelated = QuerySignals::from_query("chicken");
        assert!(apply_strict_pre_filters(pool.clone(), &unrelated, &config, false).is_empty());

        let explicit = QuerySignals::from_query("duck");
        let out = apply_strict_pre_filters(pool, &explicit, &config, false);
        assert_eq!(ids(&out), vec!["1"]);
    }

    #[test]
    fn test_preferred_format_narrows_but_never_empties() {
        let config = FilterConfig::default();
        let signals = QuerySignals::from_query("");

        let mixed = vec![
            meal("1", "Chicken Casserole", &["chicken"]),
            meal("2", "Roast Chicken", &["chicken"]),
        ];
        let out = apply_strict_pre_filters(mixed, &signals, &config, false);
        assert_eq!(ids(&out), vec!["1"]);

        let no_format = vec![meal("2", "Roast Chicken", &["chicken"])];
        let out = apply_strict_pre_filters(no_format, &signals, &config, false);
        assert_eq!(ids(&out), vec!["2"]);
    }

    #[test]
    fn test_relaxed_bypasses_strict_stage() {
        let config = FilterConfig::default();
        let pool = vec![meal("1", "Lobster Bisque", &["lobster"])];
        let signals = QuerySignals::from_query("dinner");
        let out = apply_strict_pre_filters(pool, &signals, &config, true);
        assert_eq!(ids(&out), vec!["1"]);
    }

    #[test]
    fn test_seafood_toggle() {
        let config = FilterConfig::default();
        let pool = vec![
            meal("1", "Salmon Bake", &["salmon"]),
            meal("2", "Chicken Bake", &["chicken"]),
        ];
        let mut ui = UiFilters::default();
        ui.exclude_seafood = true;
        let out = apply_ui_toggles(pool, &ui, &config);
        assert_eq!(ids(&out), vec!["2"]);
    }

    #[test]
    fn test_protein_chips_match_any_enabled() {
        let config = FilterConfig::default();
        let pool = vec![
            meal("1", "Beef Tacos", &["beef"]),
            meal("2", "Chicken Rice", &["chicken", "rice"]),
            meal("3", "Mushroom Risotto", &["mushroom", "rice"]),
        ];
        let mut ui = UiFilters::default();
        ui.exclude_seafood = false;
        ui.proteins.insert("beef".to_string(), true);
        ui.proteins.insert("chicken".to_string(), true);
        let out = apply_ui_toggles(pool, &ui, &config);
        assert_eq!(ids(&out), vec!["1", "2"]);
    }

    #[test]
    fn test_toggles_compose_as_conjunction() {
        let config = FilterConfig::default();
        let pool = vec![
            meal("1", "One Pot Chicken Pasta", &["chicken", "pasta"]),
            meal("2", "Chicken Pasta Bake", &["chicken", "pasta"]),
        ];
        let mut ui = UiFilters::default();
        ui.exclude_seafood = false;
        ui.one_pot = true;
        ui.comfort_classics_only = true;
        let out = apply_ui_toggles(pool, &ui, &config);
        assert_eq!(ids(&out), vec!["1"]);
    }

    #[test]
    fn test_under_30_uses_cook_time_estimate() {
        let config = FilterConfig::default();
        let quick = meal("1", "Quick Chicken", &["chicken"]);
        let mut slow = meal("2", "Slow Chicken", &["chicken"]);
        slow.instructions = Some(
            "One. Two. Three. Four. Five. Six. Seven. Eight. Nine. Ten.".to_string(),
        );
        let mut ui = UiFilters::default();
        ui.exclude_seafood = false;
        ui.under_30 = true;
        let out = apply_ui_toggles(vec![quick, slow], &ui, &config);
        assert_eq!(ids(&out), vec!["1"]);
    }

    #[test]
    fn test_budget_toggle_uses_budget_proxy_floor() {
        let config = FilterConfig::default();
        // Truffle and saffron: 65 - 2*18 = 29, below the floor.
        let fancy = meal("1", "Truffle Chicken", &["chicken", "truffle", "saffron"]);
        let humble = meal("2", "Chicken and Rice", &["chicken", "rice", "onion"]);
        let mut ui = UiFilters::default();
        ui.exclude_seafood = false;
        ui.budget_mode = true;
        let out = apply_ui_toggles(vec![fancy, humble], &ui, &config);
        assert_eq!(ids(&out), vec!["2"]);
    }

    #[test]
    fn test_toggle_filter_never_reorders() {
        let config = FilterConfig::default();
        let pool = vec![
            meal("3", "Chicken A", &["chicken"]),
            meal("1", "Chicken B", &["chicken"]),
            meal("2", "Chicken C", &["chicken"]),
        ];
        let mut ui = UiFilters::default();
        ui.exclude_seafood = false;
        let out = apply_ui_toggles(pool, &ui, &config);
        assert_eq!(ids(&out), vec!["3", "1", "2"]);
    }
}
