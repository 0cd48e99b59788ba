use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::api_connection::connection::MealApiClient;
use crate::api_connection::endpoints::MealRecord;
use crate::config::{self, SearchLimits};
use crate::query_signals::{build_search_terms, QuerySignals};

/// Monotonically increasing query generation. Each top-level query takes a
/// generation at start and re-checks it after every batch of fetches; work
/// belonging to a superseded generation is abandoned silently.
#[derive(Debug, Default)]
pub struct GenerationCounter(AtomicU64);

impl GenerationCounter {
    pub fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.0.load(Ordering::SeqCst) == generation
    }
}

/// Candidate pool keyed by recipe id: last write wins, first-insertion order
/// is preserved so downstream tie-breaking sees a stable input index.
#[derive(Debug, Default)]
struct CandidateMap {
    order: Vec<String>,
    by_id: HashMap<String, MealRecord>,
}

impl CandidateMap {
    fn insert(&mut self, meal: MealRecord) {
        if meal.id.is_empty() {
            return;
        }
        if !self.by_id.contains_key(&meal.id) {
            self.order.push(meal.id.clone());
        }
        self.by_id.insert(meal.id.clone(), meal);
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn into_values(mut self) -> Vec<MealRecord> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.remove(id))
            .collect()
    }
}

/// Result of one retrieval pass. `any_fetch_succeeded` lets the caller
/// distinguish an unreachable API from a query that genuinely matched
/// nothing.
#[derive(Debug)]
pub struct RetrievalOutcome {
    pub candidates: Vec<MealRecord>,
    pub any_fetch_succeeded: bool,
}

/// Populates a deduplicated candidate pool for `raw_query` using the
/// strategies in order: multi-ingredient intersection, direct name search,
/// expanded name searches, ingredient fallback. Later strategies are skipped
/// once the pool ceiling is reached. Returns `None` when a newer query
/// superseded this one.
pub async fn find_meals(
    client: &MealApiClient,
    limits: &SearchLimits,
    raw_query: &str,
    counter: &GenerationCounter,
    generation: u64,
) -> Option<RetrievalOutcome> {
    let normalized = raw_query.to_lowercase().trim().to_string();
    let search_terms = build_search_terms(&normalized);
    let signals = QuerySignals::from_query(&normalized);

    let mut pool = CandidateMap::default();
    let mut any_ok = false;

    let intent = signals.ingredient_intent();
    if intent.len() >= 2 {
        add_intersection_matches(client, limits, &intent, &mut pool, &mut any_ok).await;
        if !counter.is_current(generation) {
            return None;
        }
    }

    add_from_name_search(client, &normalized, &mut pool, &mut any_ok).await;
    if !counter.is_current(generation) {
        return None;
    }

    for term in &search_terms {
        if pool.len() >= limits.candidate_pool_size {
            break;
        }
        add_from_name_search(client, term, &mut pool, &mut any_ok).await;
        if !counter.is_current(generation) {
            return None;
        }
    }

    for term in &search_terms {
        if pool.len() >= limits.candidate_pool_size {
            break;
        }
        add_from_ingredient_search(client, limits, term, &mut pool, &mut any_ok).await;
        if !counter.is_current(generation) {
            return None;
        }
    }

    Some(RetrievalOutcome {
        candidates: pool.into_values(),
        any_fetch_succeeded: any_ok,
    })
}

/// Seeds a recommendation pool from fixed staple ingredients rather than
/// user input: up to `recommendation_seed_take` matches per seed, capped at
/// `recommendation_pool_size` identities, resolved concurrently with
/// partial-failure tolerance.
pub async fn recommendation_pool(
    client: &MealApiClient,
    limits: &SearchLimits,
    counter: &GenerationCounter,
    generation: u64,
) -> Option<RetrievalOutcome> {
    let mut any_ok = false;

    let filter_batches = join_all(
        config::RECOMMENDATION_SEED_INGREDIENTS
            .iter()
            .map(|seed| client.filter_by_ingredient(seed)),
    )
    .await;
    if !counter.is_current(generation) {
        return None;
    }

    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for batch in filter_batches.into_iter().flatten() {
        any_ok = true;
        for summary in batch.into_iter().take(limits.recommendation_seed_take) {
            if !summary.id.is_empty() && seen.insert(summary.id.clone()) {
                ids.push(summary.id);
            }
        }
    }
    ids.truncate(limits.recommendation_pool_size);

    let details = join_all(ids.iter().map(|id| client.lookup_by_id(id))).await;
    if !counter.is_current(generation) {
        return None;
    }

    let mut pool = CandidateMap::default();
    for meal in details.into_iter().flatten() {
        any_ok = true;
        pool.insert(meal);
    }

    Some(RetrievalOutcome {
        candidates: pool.into_values(),
        any_fetch_succeeded: any_ok,
    })
}

/// Intersection strategy: ingredient-filter the first few intent terms
/// concurrently and keep only recipes matching all of them. Fail-soft: any
/// failed or empty filter fetch skips the whole strategy rather than
/// producing a partial intersection.
async fn add_intersection_matches(
    client: &MealApiClient,
    limits: &SearchLimits,
    intent_terms: &[&str],
    pool: &mut CandidateMap,
    any_ok: &mut bool,
) {
    let terms: Vec<&str> = intent_terms
        .iter()
        .take(limits.intersection_term_limit)
        .copied()
        .collect();

    let batches = join_all(terms.iter().map(|term| client.filter_by_ingredient(term))).await;

    let mut id_sets: Vec<(Vec<String>, HashSet<String>)> = Vec::new();
    for batch in batches {
        let Some(summaries) = batch else {
            eprintln!("warning: intersection search skipped, an ingredient filter failed");
            return;
        };
        *any_ok = true;
        let ordered: Vec<String> = summaries.into_iter().map(|s| s.id).collect();
        if ordered.is_empty() {
            return;
        }
        let set: HashSet<String> = ordered.iter().cloned().collect();
        id_sets.push((ordered, set));
    }

    let Some((first_ordered, _)) = id_sets.first() else {
        return;
    };
    let common_ids: Vec<&String> = first_ordered
        .iter()
        .filter(|id| id_sets.iter().all(|(_, set)| set.contains(*id)))
        .take(limits.ingredient_lookup_limit)
        .collect();

    let details = join_all(common_ids.iter().map(|id| client.lookup_by_id(id))).await;
    for meal in details.into_iter().flatten() {
        *any_ok = true;
        pool.insert(meal);
    }
}

async fn add_from_name_search(
    client: &MealApiClient,
    term: &str,
    pool: &mut CandidateMap,
    any_ok: &mut bool,
) {
    if let Some(meals) = client.search_by_name(term).await {
        *any_ok = true;
        for meal in meals {
            pool.insert(meal);
        }
    }
}

async fn add_from_ingredient_search(
    client: &MealApiClient,
    limits: &SearchLimits,
    ingredient: &str,
    pool: &mut CandidateMap,
    any_ok: &mut bool,
) {
    let Some(matches) = client.filter_by_ingredient(ingredient).await else {
        return;
    };
    *any_ok = true;

    let ids: Vec<String> = matches
        .into_iter()
        .take(limits.ingredient_lookup_limit)
        .map(|summary| summary.id)
        .filter(|id| !id.is_empty())
        .collect();

    let details = join_all(ids.iter().map(|id| client.lookup_by_id(id))).await;
    for meal in details.into_iter().flatten() {
        pool.insert(meal);
    }
}
