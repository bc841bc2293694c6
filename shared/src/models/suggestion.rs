//! Meal Suggestion Model

use serde::{Deserialize, Serialize};

/// Payload for `POST ai/suggestion`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub user_demand: String,
}

/// Suggested meal composition returned by the backend assistant.
///
/// Dish names are free text and must be matched against the catalog;
/// the backend keeps these keys in snake_case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealSuggestion {
    pub main_dish: String,
    pub side_dish: String,
    pub drink: String,
    pub reason: String,
}
