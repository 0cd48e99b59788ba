use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A full recipe record as returned by `search.php` and `lookup.php`.
///
/// The API delivers the up-to-20 ordered (ingredient, measure) pairs as
/// numbered fields (`strIngredient1`..`strIngredient20`, `strMeasure1`..);
/// those land in `slots` via `#[serde(flatten)]` and are read through the
/// accessors in `crate::meal`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealRecord {
    #[serde(rename = "idMeal", default)]
    pub id: String,
    #[serde(rename = "strMeal", default)]
    pub title: String,
    #[serde(rename = "strCategory", default)]
    pub category: Option<String>,
    #[serde(rename = "strArea", default)]
    pub area: Option<String>,
    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
    #[serde(rename = "strSource", default)]
    pub source: Option<String>,
    #[serde(rename = "strYoutube", default)]
    pub youtube: Option<String>,
    #[serde(flatten)]
    pub slots: HashMap<String, Option<String>>,
}

/// Partial record from `filter.php`: identity plus display minimum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealSummary {
    #[serde(rename = "idMeal", default)]
    pub id: String,
    #[serde(rename = "strMeal", default)]
    pub title: String,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
}

/// Every endpoint wraps its payload the same way; a null `meals` means no
/// matches.
#[derive(Debug, Deserialize)]
pub struct MealsEnvelope<T> {
    pub meals: Option<Vec<T>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_record_deserializes_numbered_slots() {
        let raw = r#"{
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken Casserole",
            "strCategory": "Chicken",
            "strArea": "Japanese",
            "strInstructions": "Preheat oven to 350.\nCook the rice.",
            "strMealThumb": "https://example.test/thumb.jpg",
            "strSource": null,
            "strYoutube": "https://youtube.test/watch",
            "strIngredient1": "soy sauce",
            "strMeasure1": "3/4 cup",
            "strIngredient2": "chicken breasts",
            "strMeasure2": "2",
            "strIngredient3": "",
            "strMeasure3": ""
        }"#;
        let meal: MealRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(meal.id, "52772");
        assert_eq!(meal.title, "Teriyaki Chicken Casserole");
        assert_eq!(meal.source, None);
        assert_eq!(
            meal.slots.get("strIngredient1"),
            Some(&Some("soy sauce".to_string()))
        );
    }

    #[test]
    fn test_envelope_null_meals_is_no_matches() {
        let envelope: MealsEnvelope<MealSummary> =
            serde_json::from_str(r#"{"meals": null}"#).unwrap();
        assert!(envelope.meals.is_none());
    }
}
