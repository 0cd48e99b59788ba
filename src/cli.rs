use clap::Parser;

use crate::pipeline::filters::UiFilters;

/// Weeknight recipe finder backed by TheMealDB.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Free-text query, e.g. "ground beef tacos". Empty falls back to
    /// "dinner".
    pub query: Vec<String>,

    /// Show a varied recommendation set instead of searching
    #[arg(long)]
    pub recommend: bool,

    /// Relax the strict weeknight filters for this run
    #[arg(long)]
    pub relaxed: bool,

    /// Only recipes estimated at 30 minutes or less
    #[arg(long = "under-30")]
    pub under_30: bool,

    /// Only one-pot / one-pan / skillet recipes
    #[arg(long = "one-pot")]
    pub one_pot: bool,

    /// Only budget-friendly recipes
    #[arg(long = "budget")]
    pub budget_mode: bool,

    /// Include seafood results (excluded by default)
    #[arg(long = "include-seafood")]
    pub include_seafood: bool,

    /// Only recognizable dinner formats (pasta, tacos, casserole, ...)
    #[arg(long = "comfort-classics")]
    pub comfort_classics_only: bool,

    /// Narrow to a protein; repeatable (chicken, beef, pork, turkey, sausage)
    #[arg(long = "protein")]
    pub proteins: Vec<String>,

    /// Print the score breakdown for the top-ranked candidates
    #[arg(long = "debug-scores")]
    pub debug_scores: bool,
}

impl Cli {
    pub fn ui_filters(&self) -> UiFilters {
        let mut ui = UiFilters {
            under_30: self.under_30,
            one_pot: self.one_pot,
            budget_mode: self.budget_mode,
            exclude_seafood: !self.include_seafood,
            comfort_classics_only: self.comfort_classics_only,
            ..UiFilters::default()
        };
        for protein in &self.proteins {
            ui.proteins.insert(protein.to_lowercase(), true);
        }
        ui
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_map_onto_ui_filters() {
        let cli = Cli::parse_from([
            "weeknight_meals",
            "chicken",
            "pasta",
            "--under-30",
            "--include-seafood",
            "--protein",
            "beef",
        ]);
        assert_eq!(cli.query, vec!["chicken", "pasta"]);
        let ui = cli.ui_filters();
        assert!(ui.under_30);
        assert!(!ui.exclude_seafood);
        assert_eq!(ui.proteins.get("beef"), Some(&true));
        assert_eq!(ui.proteins.get("chicken"), Some(&false));
    }

    #[test]
    fn test_defaults_exclude_seafood() {
        let cli = Cli::parse_from(["weeknight_meals", "curry"]);
        let ui = cli.ui_filters();
        assert!(ui.exclude_seafood);
        assert!(ui.active_proteins().is_empty());
    }
}
