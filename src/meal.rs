use crate::api_connection::endpoints::MealRecord;
use crate::units::convert_to_metric;

/// Numbered ingredient/measure slots per record on the wire.
pub const INGREDIENT_SLOTS: usize = 20;

/// Rendered instruction steps are capped; recipe sites front-load the
/// substance.
pub const MAX_INSTRUCTION_STEPS: usize = 12;

const CANONICAL_MEAL_URL: &str = "https://www.themealdb.com/meal";

impl MealRecord {
    fn slot_value(&self, prefix: &str, index: usize) -> Option<&str> {
        self.slots
            .get(&format!("{prefix}{index}"))
            .and_then(|value| value.as_deref())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// The non-empty (ingredient, measure) pairs in slot order. A measure
    /// without an ingredient is ignored; an ingredient without a measure
    /// yields an empty measure.
    pub fn ingredient_pairs(&self) -> Vec<(String, String)> {
        (1..=INGREDIENT_SLOTS)
            .filter_map(|i| {
                let ingredient = self.slot_value("strIngredient", i)?;
                let measure = self.slot_value("strMeasure", i).unwrap_or("");
                Some((ingredient.to_string(), measure.to_string()))
            })
            .collect()
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredient_pairs().len()
    }

    /// Display lines with metric-converted measures, e.g. `"~480 ml milk"`.
    pub fn ingredient_lines(&self) -> Vec<String> {
        self.ingredient_pairs()
            .into_iter()
            .map(|(ingredient, measure)| {
                let metric = convert_to_metric(&measure);
                if metric.is_empty() {
                    ingredient
                } else {
                    format!("{metric} {ingredient}")
                }
            })
            .collect()
    }

    /// Lowercased title + category + ingredient names; the single haystack
    /// for all term matching. Derived on demand, never stored.
    pub fn searchable_text(&self) -> String {
        let mut text = format!(
            "{} {}",
            self.title,
            self.category.as_deref().unwrap_or("")
        );
        for (ingredient, _) in self.ingredient_pairs() {
            text.push(' ');
            text.push_str(&ingredient);
        }
        text.to_lowercase()
    }

    /// Source URL, else video URL, else the canonical site link. `None`
    /// means the record is unlinkable and must be dropped before
    /// filtering/ranking.
    pub fn resolved_source_url(&self) -> Option<String> {
        if let Some(source) = self.source.as_deref().filter(|s| !s.trim().is_empty()) {
            return Some(source.to_string());
        }
        if let Some(youtube) = self.youtube.as_deref().filter(|s| !s.trim().is_empty()) {
            return Some(youtube.to_string());
        }
        if !self.id.is_empty() {
            return Some(format!("{CANONICAL_MEAL_URL}/{}", self.id));
        }
        None
    }

    pub fn instruction_steps(&self) -> Vec<String> {
        split_instructions(self.instructions.as_deref().unwrap_or(""))
    }

    /// Rough minutes estimate from step and ingredient counts; floors at 12.
    pub fn estimate_cook_time_minutes(&self) -> u32 {
        let steps = self.instruction_steps().len() as u32;
        let ingredients = self.ingredient_count() as u32;
        (steps * 4 + ingredients * 2).max(12)
    }
}

/// Splits instruction prose into steps: first on line breaks, then after
/// sentence punctuation followed by whitespace. Trimmed, empties dropped,
/// capped at [`MAX_INSTRUCTION_STEPS`].
pub fn split_instructions(text: &str) -> Vec<String> {
    let mut steps = Vec::new();
    for line in text.split(['\r', '\n']) {
        for sentence in split_sentences(line) {
            let step = sentence.trim();
            if !step.is_empty() {
                steps.push(step.to_string());
            }
            if steps.len() == MAX_INSTRUCTION_STEPS {
                return steps;
            }
        }
    }
    steps
}

/// Splits after `.`, `!` or `?` when followed by whitespace.
fn split_sentences(line: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = line.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            if let Some((next_index, next_ch)) = chars.peek() {
                if next_ch.is_whitespace() {
                    sentences.push(&line[start..index + ch.len_utf8()]);
                    start = *next_index;
                }
            }
        }
    }
    if start < line.len() {
        sentences.push(&line[start..]);
    }
    sentences
}
