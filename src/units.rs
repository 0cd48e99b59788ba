use once_cell::sync::Lazy;
use regex::Regex;

static ALREADY_METRIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:g|kg|ml|l|gram|grams|litre|liter|millilitre|milliliter)s?\b").unwrap()
});

static MEASURE_PARTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\d./]+)\s*([a-z]+)?").unwrap());

/// (unit spelling, factor, metric unit)
const CONVERSIONS: &[(&str, f64, &str)] = &[
    ("tsp", 5.0, "ml"),
    ("tsps", 5.0, "ml"),
    ("tablespoon", 15.0, "ml"),
    ("tablespoons", 15.0, "ml"),
    ("tbsp", 15.0, "ml"),
    ("tbsps", 15.0, "ml"),
    ("cup", 240.0, "ml"),
    ("cups", 240.0, "ml"),
    ("ounce", 28.35, "g"),
    ("ounces", 28.35, "g"),
    ("oz", 28.35, "g"),
    ("pound", 453.59, "g"),
    ("pounds", 453.59, "g"),
    ("lb", 453.59, "g"),
    ("lbs", 453.59, "g"),
];

/// Converts an imperial/informal measure to an approximate metric one, e.g.
/// `"2 cups"` → `"~480 ml"`. Measures that are empty, already metric, or not
/// parseable are returned unchanged. Rounding is half-up.
pub fn convert_to_metric(measure: &str) -> String {
    if measure.is_empty() {
        return String::new();
    }

    let clean = measure
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if ALREADY_METRIC.is_match(&clean) {
        return measure.to_string();
    }

    let Some(parts) = MEASURE_PARTS.captures(&clean) else {
        return measure.to_string();
    };
    let Some(amount) = parts.get(1).and_then(|m| parse_fraction(m.as_str())) else {
        return measure.to_string();
    };
    let unit = parts.get(2).map(|m| m.as_str()).unwrap_or("");

    let Some((_, factor, metric_unit)) =
        CONVERSIONS.iter().find(|(name, _, _)| *name == unit)
    else {
        return measure.to_string();
    };

    let converted = (amount * factor).round() as i64;
    format!("~{} {}", converted, metric_unit)
}

/// Parses `"1/2"` or `"2"`; `None` on a zero denominator or non-numeric
/// input.
fn parse_fraction(value: &str) -> Option<f64> {
    if let Some((top, bottom)) = value.split_once('/') {
        let top: f64 = top.parse().ok()?;
        let bottom: f64 = bottom.parse().ok()?;
        if bottom == 0.0 {
            return None;
        }
        Some(top / bottom)
    } else {
        value.parse().ok()
    }
}
