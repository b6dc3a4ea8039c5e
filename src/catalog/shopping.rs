use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::{
    error::Error,
    schema::{Cocktail, UserId},
    store::CatalogStore,
};

use super::makeable::owned_ingredient_names;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingList {
    pub missing_ingredients: Vec<String>,
    pub total_items: usize,
}

/// Ingredient names used by `favorites` that are not owned. Ownership is
/// checked case-insensitively, but names keep their original spelling and
/// are deduplicated by exact string.
pub fn missing_ingredients(favorites: &[Cocktail], owned: &HashSet<String>) -> BTreeSet<String> {
    favorites
        .iter()
        .flat_map(|cocktail| cocktail.ingredients.iter())
        .filter(|ingredient| !owned.contains(&ingredient.name.to_lowercase()))
        .map(|ingredient| ingredient.name.to_owned())
        .collect()
}

pub async fn shopping_list(
    user_id: UserId,
    store: &dyn CatalogStore,
) -> Result<ShoppingList, Error> {
    let shelf = store.list_bar_shelf(user_id).await?;
    let owned = owned_ingredient_names(&shelf);
    let favorites = store.favorite_cocktails(user_id).await?;

    let missing: Vec<String> = missing_ingredients(&favorites, &owned)
        .into_iter()
        .collect();

    Ok(ShoppingList {
        total_items: missing.len(),
        missing_ingredients: missing,
    })
}
