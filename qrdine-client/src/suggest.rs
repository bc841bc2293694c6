//! Meal-suggestion resolution
//!
//! The assistant endpoint returns free-text dish names; they must be
//! matched back onto the live catalog before anything is shown. The
//! assistant is best-effort by contract, so every failure path lands on a
//! catalog fallback instead of an empty panel.

use crate::error::ClientResult;
use shared::{MealSuggestion, Product};

/// Which part of the meal a dish fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DishSlot {
    MainDish,
    SideDish,
    Drink,
}

/// A catalog product resolved for one slot
#[derive(Debug, Clone)]
pub struct SuggestedDish {
    pub product: Product,
    pub slot: DishSlot,
}

/// Suggestion outcome handed to the UI
#[derive(Debug, Clone)]
pub struct ResolvedSuggestion {
    pub dishes: Vec<SuggestedDish>,
    /// The assistant's reasoning; absent when the fallback was used
    pub reason: Option<String>,
}

/// Match a suggestion's dish names onto the catalog.
///
/// Case-insensitive exact match first, then substring in either
/// direction. Slots whose name matches nothing are dropped.
pub fn resolve_suggestion(suggestion: &MealSuggestion, catalog: &[Product]) -> Vec<SuggestedDish> {
    let slots = [
        (DishSlot::MainDish, suggestion.main_dish.as_str()),
        (DishSlot::SideDish, suggestion.side_dish.as_str()),
        (DishSlot::Drink, suggestion.drink.as_str()),
    ];

    slots
        .into_iter()
        .filter_map(|(slot, name)| {
            find_product(catalog, name).map(|product| SuggestedDish {
                product: product.clone(),
                slot,
            })
        })
        .collect()
}

/// One product per distinct category, in catalog order, filling the
/// three slots. Used when the assistant fails or matches nothing.
pub fn fallback_dishes(catalog: &[Product]) -> Vec<SuggestedDish> {
    let slots = [DishSlot::MainDish, DishSlot::SideDish, DishSlot::Drink];
    let mut seen_categories = Vec::new();
    let mut dishes = Vec::new();

    for product in catalog {
        if dishes.len() == slots.len() {
            break;
        }
        if seen_categories.contains(&product.category.category_id) {
            continue;
        }
        seen_categories.push(product.category.category_id);
        dishes.push(SuggestedDish {
            product: product.clone(),
            slot: slots[dishes.len()],
        });
    }
    dishes
}

/// Turn a gateway result into something displayable, falling back to the
/// catalog on any error or when no suggested name matches.
pub fn resolve_or_fallback(
    result: ClientResult<MealSuggestion>,
    catalog: &[Product],
) -> ResolvedSuggestion {
    match result {
        Ok(suggestion) => {
            let dishes = resolve_suggestion(&suggestion, catalog);
            if dishes.is_empty() {
                tracing::debug!("Suggestion matched nothing in the catalog, using fallback");
                ResolvedSuggestion {
                    dishes: fallback_dishes(catalog),
                    reason: None,
                }
            } else {
                ResolvedSuggestion {
                    dishes,
                    reason: Some(suggestion.reason),
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Suggestion request failed, using fallback");
            ResolvedSuggestion {
                dishes: fallback_dishes(catalog),
                reason: None,
            }
        }
    }
}

fn find_product<'a>(catalog: &'a [Product], name: &str) -> Option<&'a Product> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    if let Some(exact) = catalog.iter().find(|p| p.name.to_lowercase() == needle) {
        return Some(exact);
    }
    catalog.iter().find(|p| {
        let hay = p.name.to_lowercase();
        hay.contains(&needle) || needle.contains(&hay)
    })
}
