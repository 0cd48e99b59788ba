use anyhow::Result;
use weeknight_meals::api_connection::connection::MealApiClient;
use weeknight_meals::cli::parse_args;
use weeknight_meals::config::{api_base_from_env, AppConfig};
use weeknight_meals::pipeline::retrieval::GenerationCounter;
use weeknight_meals::pipeline::{run_recommendations, run_search, SearchOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_args();

    let config = AppConfig {
        debug_score_breakdown: cli.debug_scores,
        ..AppConfig::default()
    };
    let client = MealApiClient::new(api_base_from_env())?;
    let ui_filters = cli.ui_filters();
    let counter = GenerationCounter::default();

    let outcome = if cli.recommend {
        println!("Loading varied recipe ideas…");
        run_recommendations(&client, &config, &ui_filters, &counter).await
    } else {
        let query = cli.query.join(" ");
        // Empty query falls back to a broad default at this layer, never
        // inside the pipeline.
        let query = if query.trim().is_empty() {
            "dinner".to_string()
        } else {
            query
        };
        println!("Loading recipe ideas for \"{query}\"…");
        run_search(&client, &config, &query, &ui_filters, cli.relaxed, &counter).await
    };

    // A single-shot CLI run is never superseded, but the pipeline contract
    // still allows it.
    let Some(outcome) = outcome else {
        return Ok(());
    };
    render(&outcome);
    Ok(())
}

fn render(outcome: &SearchOutcome) {
    if let Some(empty) = &outcome.empty_state {
        println!("{}", empty.reason);
        if !empty.suggestions.is_empty() {
            println!("Try: {}", empty.suggestions.join(", "));
        }
        if empty.offer_relaxed {
            println!("Re-run with --relaxed to include matches outside the weeknight rules.");
        }
        return;
    }

    for meal in &outcome.meals {
        println!();
        println!("== {} ==", meal.title);
        let meta: Vec<&str> = [meal.category.as_deref(), meal.area.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !meta.is_empty() {
            println!("{}", meta.join(" • "));
        }
        println!("Ingredients:");
        for line in &meal.ingredient_lines {
            println!("  - {line}");
        }
        if !meal.steps.is_empty() {
            println!("Steps:");
            for (i, step) in meal.steps.iter().enumerate() {
                println!("  {}. {step}", i + 1);
            }
        }
        println!("Source: {}", meal.source_url);
    }

    let stats = &outcome.stats;
    println!();
    println!(
        "Showing {} of {} linked recipe idea(s) ({} removed by weeknight rules, {} by your toggles). Ingredient amounts are shown in metric where possible.",
        stats.shown, stats.linked_total, stats.strict_filtered_out, stats.toggle_filtered_out
    );
}
