pub mod filters;
pub mod ranking;
pub mod retrieval;
pub mod selection;

use crate::api_connection::connection::MealApiClient;
use crate::api_connection::endpoints::MealRecord;
use crate::config::AppConfig;
use crate::query_signals::QuerySignals;

use filters::{apply_strict_pre_filters, apply_ui_toggles, UiFilters};
use ranking::rank_meals_for_query;
use retrieval::{find_meals, recommendation_pool, GenerationCounter};
use selection::{pick_varied_recommendations, select_meals_for_display};

/// Why a run produced nothing, plus what the host should suggest next.
#[derive(Debug, Clone)]
pub struct EmptyState {
    pub reason: String,
    /// Up to three example queries or follow-up actions.
    pub suggestions: Vec<String>,
    /// Whether a "show relaxed matches" affordance makes sense.
    pub offer_relaxed: bool,
}

/// Stage counts for the host's status line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    pub linked_total: usize,
    pub strict_filtered_out: usize,
    pub toggle_filtered_out: usize,
    pub shown: usize,
}

/// A record ready to render: resolved link, metric ingredient lines, split
/// steps.
#[derive(Debug, Clone)]
pub struct DisplayMeal {
    pub id: String,
    pub title: String,
    pub category: Option<String>,
    pub area: Option<String>,
    pub thumbnail: Option<String>,
    pub source_url: String,
    pub ingredient_lines: Vec<String>,
    pub steps: Vec<String>,
}

impl DisplayMeal {
    fn from_record(meal: &MealRecord, source_url: String) -> Self {
        Self {
            id: meal.id.clone(),
            title: meal.title.clone(),
            category: meal.category.clone(),
            area: meal.area.clone(),
            thumbnail: meal.thumbnail.clone(),
            source_url,
            ingredient_lines: meal.ingredient_lines(),
            steps: meal.instruction_steps(),
        }
    }
}

/// Result of one pipeline run. `meals` is empty exactly when `empty_state`
/// is set.
#[derive(Debug)]
pub struct SearchOutcome {
    pub meals: Vec<DisplayMeal>,
    pub stats: SearchStats,
    pub empty_state: Option<EmptyState>,
}

impl SearchOutcome {
    fn empty(stats: SearchStats, empty_state: EmptyState) -> Self {
        Self {
            meals: Vec::new(),
            stats,
            empty_state: Some(empty_state),
        }
    }
}

fn suggestions(items: &[&str]) -> Vec<String> {
    items.iter().take(3).map(|s| (*s).to_string()).collect()
}

/// Keeps only linkable records, pairing each with its resolved source URL.
fn resolve_links(candidates: Vec<MealRecord>) -> Vec<(MealRecord, String)> {
    candidates
        .into_iter()
        .filter_map(|meal| {
            let url = meal.resolved_source_url()?;
            Some((meal, url))
        })
        .collect()
}

fn to_display(meals: Vec<MealRecord>, cap: usize) -> Vec<DisplayMeal> {
    meals
        .iter()
        .take(cap)
        .filter_map(|meal| {
            let url = meal.resolved_source_url()?;
            Some(DisplayMeal::from_record(meal, url))
        })
        .collect()
}

/// Runs the full search pipeline for `raw_query`. Returns `None` when a
/// newer query superseded this one; the caller must then render nothing.
pub async fn run_search(
    client: &MealApiClient,
    config: &AppConfig,
    raw_query: &str,
    ui: &UiFilters,
    relaxed: bool,
    counter: &GenerationCounter,
) -> Option<SearchOutcome> {
    let generation = counter.begin();
    let signals = QuerySignals::from_query(raw_query);
    let mut stats = SearchStats::default();

    let retrieved = find_meals(client, &config.limits, raw_query, counter, generation).await?;
    let any_fetch_succeeded = retrieved.any_fetch_succeeded;

    let linked = resolve_links(retrieved.candidates);
    stats.linked_total = linked.len();
    if linked.is_empty() {
        let reason = if any_fetch_succeeded {
            "No linked recipes found for that search.".to_string()
        } else {
            "Could not load recipes right now. Check your connection and try again."
                .to_string()
        };
        return Some(SearchOutcome::empty(
            stats,
            EmptyState {
                reason,
                suggestions: suggestions(&["chicken pasta", "beef mince", "curry"]),
                offer_relaxed: false,
            },
        ));
    }

    let candidates: Vec<MealRecord> = linked.into_iter().map(|(meal, _)| meal).collect();
    let strict = apply_strict_pre_filters(candidates, &signals, &config.filter, relaxed);
    stats.strict_filtered_out = stats.linked_total - strict.len();
    if strict.is_empty() {
        return Some(SearchOutcome::empty(
            stats,
            EmptyState {
                reason: "Weeknight filters removed every match.".to_string(),
                suggestions: suggestions(&[
                    "chicken casserole",
                    "beef mince pasta",
                    "sausage rice",
                ]),
                offer_relaxed: !relaxed,
            },
        ));
    }

    let strict_count = strict.len();
    let toggled = apply_ui_toggles(strict, ui, &config.filter);
    stats.toggle_filtered_out = strict_count - toggled.len();
    if toggled.is_empty() {
        return Some(SearchOutcome::empty(
            stats,
            EmptyState {
                reason: "Your filter toggles removed every match.".to_string(),
                suggestions: suggestions(&[
                    "turn off the under-30-minutes filter",
                    "clear the protein chips",
                    "disable budget mode",
                ]),
                offer_relaxed: false,
            },
        ));
    }

    let ranked = rank_meals_for_query(toggled, &signals, config);
    let display = select_meals_for_display(ranked, &signals);
    if display.is_empty() {
        return Some(SearchOutcome::empty(
            stats,
            EmptyState {
                reason: "No recipe covered every word of the query.".to_string(),
                suggestions: suggestions(&["try fewer words", "chicken pasta", "beef mince"]),
                offer_relaxed: false,
            },
        ));
    }

    let meals = to_display(display, config.limits.max_search_results);
    stats.shown = meals.len();
    Some(SearchOutcome {
        meals,
        stats,
        empty_state: None,
    })
}

/// Runs the recommendation pipeline: seeded pool, strict + toggle filters,
/// then the diversity picker. `None` when superseded.
pub async fn run_recommendations(
    client: &MealApiClient,
    config: &AppConfig,
    ui: &UiFilters,
    counter: &GenerationCounter,
) -> Option<SearchOutcome> {
    let generation = counter.begin();
    let neutral = QuerySignals::default();
    let mut stats = SearchStats::default();

    let retrieved = recommendation_pool(client, &config.limits, counter, generation).await?;
    let any_fetch_succeeded = retrieved.any_fetch_succeeded;

    let linked = resolve_links(retrieved.candidates);
    stats.linked_total = linked.len();
    if linked.is_empty() {
        let reason = if any_fetch_succeeded {
            "No linked recipes available to recommend right now.".to_string()
        } else {
            "Could not load recipes right now. Check your connection and try again."
                .to_string()
        };
        return Some(SearchOutcome::empty(
            stats,
            EmptyState {
                reason,
                suggestions: suggestions(&["search for chicken pasta", "search for beef mince"]),
                offer_relaxed: false,
            },
        ));
    }

    let candidates: Vec<MealRecord> = linked.into_iter().map(|(meal, _)| meal).collect();
    let strict = apply_strict_pre_filters(candidates, &neutral, &config.filter, false);
    stats.strict_filtered_out = stats.linked_total - strict.len();

    let strict_count = strict.len();
    let toggled = apply_ui_toggles(strict, ui, &config.filter);
    stats.toggle_filtered_out = strict_count - toggled.len();
    if toggled.is_empty() {
        return Some(SearchOutcome::empty(
            stats,
            EmptyState {
                reason: "Filters removed every recommendation.".to_string(),
                suggestions: suggestions(&[
                    "clear the protein chips",
                    "turn off the under-30-minutes filter",
                ]),
                offer_relaxed: false,
            },
        ));
    }

    let varied =
        pick_varied_recommendations(toggled, config.limits.recommended_count, config);
    let meals = to_display(varied, config.limits.recommended_count);
    stats.shown = meals.len();
    Some(SearchOutcome {
        meals,
        stats,
        empty_state: None,
    })
}
